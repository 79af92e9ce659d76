//! `vigil` command line: tool tester, one-shot query runs and report rendering.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vigil::{
    QueryRecord, Termination, ToolCall, ToolExecutionContext, ToolRuntime, VigilConfig,
    build_runtime, monitoring_tool_runtime, open_store, parse_arguments, render, render_report,
    substitute,
};

#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(author, version, about = "Query agent for store monitoring data")]
#[command(long_about = r#"
Turns a natural-language query plan into monitoring tool calls and renders the results.

Configuration is layered (later wins):
1. built-in defaults
2. ./vigil.toml
3. --config <path>
4. VIGIL_* environment variables, e.g. VIGIL_PROVIDER__MODEL=qwen-plus

Examples:
  vigil tool flow_query --args '{"time_ranges": "2024-05-27 09:00:00 - 2024-05-27 12:00:00"}'
  vigil ask "Passenger flow between 9am and noon today, and any intrusion events"
  vigil render --records records.json --text "Morning flow: [e4afea46]"
"#)]
struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace); RUST_LOG applies otherwise
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dispatch one tool against the configured store and print its fragment
    Tool {
        /// Tool name, e.g. flow_query
        name: String,

        /// JSON object of arguments
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// List the available tools and their arguments
    Tools,

    /// Run the query loop for a plan and print the results
    Ask {
        /// The query plan to execute
        plan: String,
    },

    /// Substitute [query_id] placeholders using records from a JSON file
    Render {
        /// JSON array of query records
        #[arg(long, value_name = "PATH")]
        records: PathBuf,

        /// Text containing placeholders
        #[arg(long)]
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Tool { name, args } => run_tool(cli.config, name, &args).await,
        Command::Tools => list_tools(cli.config),
        Command::Ask { plan } => ask(cli.config, &plan).await,
        Command::Render { records, text } => render_file(&records, &text),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<VigilConfig> {
    VigilConfig::load(path.as_deref()).context("failed to load configuration")
}

async fn run_tool(config: Option<PathBuf>, name: String, args: &str) -> Result<()> {
    let config = load_config(config)?;
    let store = open_store(&config.store).context("failed to open monitoring store")?;
    let tools = monitoring_tool_runtime(store);

    let arguments = parse_arguments(args).context("invalid --args")?;
    let call = ToolCall::new(name).with_arguments(arguments);
    let record = tools
        .execute(call, ToolExecutionContext::new("cli"))
        .await
        .context("tool call failed")?;

    print!("{}", render(&record));
    Ok(())
}

fn list_tools(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let store = open_store(&config.store).context("failed to open monitoring store")?;
    print!("{}", monitoring_tool_runtime(store).instructions());
    Ok(())
}

async fn ask(config: Option<PathBuf>, plan: &str) -> Result<()> {
    let config = load_config(config)?;
    let runtime = build_runtime(&config).context("failed to build runtime")?;
    let outcome = runtime.agent.run(plan).await.context("query run failed")?;

    println!(
        "== results ({} after {} iterations) ==",
        outcome.termination.as_str(),
        outcome.iterations
    );
    print!("{}", outcome.output);
    println!("== report ==");
    println!("{}", render_report(&outcome));

    if let Termination::ProviderFailed(error) = &outcome.termination {
        bail!("reasoning provider failed: {error}");
    }
    Ok(())
}

fn render_file(path: &Path, text: &str) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records: Vec<QueryRecord> =
        serde_json::from_str(&raw).context("records file must hold a JSON array of query records")?;

    println!("{}", substitute(&records, text));
    Ok(())
}
