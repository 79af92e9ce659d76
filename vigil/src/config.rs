//! Layered configuration: defaults, `vigil.toml`, an explicit file, then `VIGIL_*` variables.
//!
//! ```rust
//! use vigil::VigilConfig;
//!
//! let config = VigilConfig::from_toml_str(
//!     r#"
//!     [agent]
//!     max_iters = 4
//!
//!     [provider]
//!     kind = "ollama"
//!     model = "qwen2.5:7b"
//!     "#,
//! )
//! .expect("config should load");
//!
//! assert_eq!(config.agent.max_iters, 4);
//! assert_eq!(config.provider.model, "qwen2.5:7b");
//! assert!(!config.store.seed_demo_data);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use vagent::{AgentPolicy, DEFAULT_MAX_ITERS, DEFAULT_SYSTEM_PROMPT, DEFAULT_TODAY};
use vcommon::GenerationOptions;
use vprovider::{ProviderId, RetryPolicy};
use vreport::time::parse_timestamp;

use crate::ConfigError;

pub const PROJECT_CONFIG_FILE: &str = "vigil.toml";
pub const ENV_PREFIX: &str = "VIGIL_";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    pub agent: AgentSection,
    pub provider: ProviderSection,
    pub store: StoreSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    pub max_iters: u32,
    pub verbose: bool,
    pub fallback_text: Option<String>,
    pub system_prompt: String,
    /// Reference time written into the prompt, `YYYY-MM-DD hh:mm:ss`.
    pub today: String,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            max_iters: DEFAULT_MAX_ITERS,
            verbose: true,
            fallback_text: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            today: DEFAULT_TODAY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    DashScope,
    Ollama,
}

impl From<ProviderKind> for ProviderId {
    fn from(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::OpenAi => ProviderId::OpenAi,
            ProviderKind::DashScope => ProviderId::DashScope,
            ProviderKind::Ollama => ProviderId::Ollama,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    pub kind: ProviderKind,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Total attempts per reasoning call; 2 allows one retry.
    pub retry_attempts: u32,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            kind: ProviderKind::DashScope,
            model: "qwen-max".to_string(),
            base_url: None,
            api_key: None,
            timeout_secs: 90,
            temperature: None,
            max_tokens: None,
            retry_attempts: 2,
        }
    }
}

impl ProviderSection {
    pub fn provider_id(&self) -> ProviderId {
        self.kind.into()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured key, else the provider's conventional environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                conventional_key_variable(self.kind).and_then(|name| std::env::var(name).ok())
            })
    }

    pub fn generation(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn conventional_key_variable(kind: ProviderKind) -> Option<&'static str> {
    match kind {
        ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
        ProviderKind::DashScope => Some("DASHSCOPE_API_KEY"),
        ProviderKind::Ollama => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// SQLite file; in-memory when absent.
    pub path: Option<PathBuf>,
    pub seed_demo_data: bool,
}

impl VigilConfig {
    /// Loads every layer; an explicit path must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit
            && !path.exists()
        {
            return Err(ConfigError::load(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let mut figment = Self::defaults();
        let project = Path::new(PROJECT_CONFIG_FILE);
        if project.exists() {
            figment = figment.merge(Toml::file(project));
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(figment)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Self::extract(Self::defaults().merge(Toml::string(raw)))
    }

    fn defaults() -> Figment {
        Figment::new().merge(Serialized::defaults(Self::default()))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.max_iters == 0 {
            return Err(ConfigError::invalid("agent.max_iters must be at least 1"));
        }
        parse_timestamp(&self.agent.today)
            .map_err(|error| ConfigError::invalid(format!("agent.today: {}", error.message)))?;
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::invalid("provider.model must not be empty"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::invalid("provider.timeout_secs must be at least 1"));
        }
        if self.provider.retry_attempts == 0 {
            return Err(ConfigError::invalid("provider.retry_attempts must be at least 1"));
        }
        Ok(())
    }

    pub fn agent_policy(&self) -> AgentPolicy {
        let mut policy = AgentPolicy::default()
            .with_max_iters(self.agent.max_iters)
            .with_verbose(self.agent.verbose)
            .with_system_prompt(self.agent.system_prompt.clone())
            .with_today(self.agent.today.clone())
            .with_model(self.provider.model.clone())
            .with_generation(self.provider.generation())
            .with_retry(RetryPolicy::new(self.provider.retry_attempts));
        if let Some(fallback) = &self.agent.fallback_text {
            policy = policy.with_fallback_text(fallback.clone());
        }
        policy
    }
}
