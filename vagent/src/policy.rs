//! Loop policy: budget, verbosity, fallback text, retry, and prompt settings.
//!
//! ```rust
//! use vagent::{AgentErrorKind, AgentPolicy};
//!
//! let policy = AgentPolicy::default().with_max_iters(3).with_fallback_text("No data.");
//! assert!(policy.validate().is_ok());
//!
//! let error = AgentPolicy::default().with_max_iters(0).validate().expect_err("zero budget");
//! assert_eq!(error.kind, AgentErrorKind::InvalidRequest);
//! ```

use vcommon::GenerationOptions;
use vprovider::RetryPolicy;

use crate::AgentError;
use crate::prompt::DEFAULT_SYSTEM_PROMPT;

pub const DEFAULT_MAX_ITERS: u32 = 10;
pub const DEFAULT_TODAY: &str = "2024-05-27 23:59:59";

#[derive(Debug, Clone, PartialEq)]
pub struct AgentPolicy {
    pub max_iters: u32,
    pub verbose: bool,
    /// Appended on termination only when nothing else was produced.
    pub fallback_text: Option<String>,
    pub system_prompt: String,
    /// Reference time written into the prompt for relative dates.
    pub today: String,
    pub model: String,
    pub generation: GenerationOptions,
    pub retry: RetryPolicy,
}

impl Default for AgentPolicy {
    fn default() -> Self {
        Self {
            max_iters: DEFAULT_MAX_ITERS,
            verbose: true,
            fallback_text: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            today: DEFAULT_TODAY.to_string(),
            model: "qwen-max".to_string(),
            generation: GenerationOptions::default(),
            retry: RetryPolicy::single_retry(),
        }
    }
}

impl AgentPolicy {
    pub fn with_max_iters(mut self, max_iters: u32) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_fallback_text(mut self, fallback_text: impl Into<String>) -> Self {
        self.fallback_text = Some(fallback_text.into());
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_today(mut self, today: impl Into<String>) -> Self {
        self.today = today.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_generation(mut self, generation: GenerationOptions) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn validate(&self) -> Result<(), AgentError> {
        if self.max_iters == 0 {
            return Err(AgentError::invalid_request(
                "agent policy requires max_iters >= 1",
            ));
        }

        if self.model.trim().is_empty() {
            return Err(AgentError::invalid_request("agent policy requires a model"));
        }

        if self.retry.max_attempts == 0 {
            return Err(AgentError::invalid_request(
                "agent policy requires at least one provider attempt",
            ));
        }

        Ok(())
    }
}
