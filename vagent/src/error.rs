//! Agent-layer errors and the decision parsing error.

use std::error::Error;
use std::fmt::{Display, Formatter};

use vprovider::{ProviderError, ProviderErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentErrorKind {
    InvalidRequest,
    Provider,
}

/// A run that could not start, or whose provider is misconfigured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentError {
    pub kind: AgentErrorKind,
    pub message: String,
}

impl AgentError {
    pub fn new(kind: AgentErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::InvalidRequest, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::Provider, message)
    }
}

impl Display for AgentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for AgentError {}

impl From<ProviderError> for AgentError {
    fn from(value: ProviderError) -> Self {
        match value.kind {
            ProviderErrorKind::InvalidRequest => AgentError::invalid_request(value.to_string()),
            _ => AgentError::provider(value.to_string()),
        }
    }
}

/// Reasoning output that does not form a valid decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsingError {
    pub message: String,
    pub raw_response: String,
}

impl ParsingError {
    pub fn new(message: impl Into<String>, raw_response: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raw_response: raw_response.into(),
        }
    }
}

impl Display for ParsingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to parse decision: {}", self.message)
    }
}

impl Error for ParsingError {}
