//! Unified facade over the vigil workspace crates.
//!
//! Re-exports the query loop, the monitoring store and tools, the report substitution
//! engine and observability hooks, and adds configuration loading and runtime wiring.

mod config;
mod error;

pub mod prelude;
pub mod providers;
pub mod runtime;

pub use vagent;
pub use vcommon;
pub use vobserve;
pub use vprovider;
pub use vreport;
pub use vstore;
pub use vtooling;

pub use config::{
    AgentSection, ENV_PREFIX, PROJECT_CONFIG_FILE, ProviderKind, ProviderSection, StoreSection,
    VigilConfig,
};
pub use error::{ConfigError, ConfigErrorKind, VigilError, VigilErrorKind};

pub use vagent::{
    AgentError, AgentErrorKind, AgentLoopHooks, AgentPolicy, Decision, DecisionValidator,
    LoopOutcome, LoopState, ParsingError, QueryAgent, QueryAgentBuilder, Termination,
    ValidatedDecision,
};
pub use vcommon::{BoxFuture, GenerationOptions, MetadataMap, RunId, TraceId};
pub use vobserve::{
    MetricsObservabilityHooks, SafeLoopHooks, SafeProviderHooks, SafeToolHooks,
    TracingObservabilityHooks,
};
pub use vprovider::{
    Message, ModelProvider, ModelRequest, ModelResponse, ProviderError, ProviderErrorKind,
    ProviderFuture, ProviderId, RetryPolicy, Role, StopReason, TokenUsage,
};
pub use vreport::{
    QueryKind, QueryPayload, QueryRecord, ReportContext, extract_records, render, substitute,
};
pub use vstore::{SqliteMonitoringStore, StoreError, StoreErrorKind, register_monitoring_tools};
pub use vtooling::{
    DefaultToolRuntime, Tool, ToolCall, ToolError, ToolErrorKind, ToolExecutionContext,
    ToolRegistry, ToolRuntime, parse_arguments,
};

pub use providers::{ProviderBuildConfig, build_provider_from_api_key, build_provider_with_config};
pub use runtime::{
    RuntimeBundle, build_runtime, build_runtime_with_provider, monitoring_tool_runtime,
    open_store, render_report, report_template,
};
