//! Facade errors for configuration loading and runtime assembly.

use std::error::Error;
use std::fmt::{Display, Formatter};

use vagent::AgentError;
use vprovider::ProviderError;
use vstore::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Load,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Load, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Invalid, message)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ConfigError {}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::load(error.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VigilErrorKind {
    Config,
    Store,
    Provider,
    Agent,
}

/// Failure to assemble a runtime from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VigilError {
    pub kind: VigilErrorKind,
    pub message: String,
}

impl VigilError {
    pub fn new(kind: VigilErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Display for VigilError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for VigilError {}

impl From<ConfigError> for VigilError {
    fn from(error: ConfigError) -> Self {
        Self::new(VigilErrorKind::Config, error.to_string())
    }
}

impl From<StoreError> for VigilError {
    fn from(error: StoreError) -> Self {
        Self::new(VigilErrorKind::Store, error.to_string())
    }
}

impl From<ProviderError> for VigilError {
    fn from(error: ProviderError) -> Self {
        Self::new(VigilErrorKind::Provider, error.to_string())
    }
}

impl From<AgentError> for VigilError {
    fn from(error: AgentError) -> Self {
        Self::new(VigilErrorKind::Agent, error.to_string())
    }
}
