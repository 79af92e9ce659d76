//! Shared provider error kinds and error value helpers.
//!
//! ```rust
//! use vprovider::ProviderError;
//!
//! let auth = ProviderError::authentication("bad key");
//! assert!(!auth.retryable);
//!
//! let timeout = ProviderError::timeout("temporary timeout");
//! assert!(timeout.retryable);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Authentication,
    RateLimited,
    InvalidRequest,
    Timeout,
    Transport,
    Unavailable,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Authentication, message, false)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message, true)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message, true)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message, true)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message, true)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message, false)
    }

    /// Classifies a non-success HTTP status from a chat-completions endpoint.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::authentication(message),
            429 => Self::rate_limited(message),
            408 | 504 => Self::timeout(message),
            400 | 404 | 413 | 422 => Self::invalid_request(message),
            502 | 503 => Self::unavailable(message),
            _ => Self::transport(message),
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_kinds_and_retryability() {
        let cases = [
            (401, ProviderErrorKind::Authentication, false),
            (403, ProviderErrorKind::Authentication, false),
            (429, ProviderErrorKind::RateLimited, true),
            (504, ProviderErrorKind::Timeout, true),
            (400, ProviderErrorKind::InvalidRequest, false),
            (503, ProviderErrorKind::Unavailable, true),
            (500, ProviderErrorKind::Transport, true),
        ];

        for (status, kind, retryable) in cases {
            let error = ProviderError::from_status(status, "failed");
            assert_eq!(error.kind, kind, "status {status}");
            assert_eq!(error.retryable, retryable, "status {status}");
        }
    }

    #[test]
    fn display_includes_kind_and_message() {
        let error = ProviderError::unavailable("model overloaded");
        assert_eq!(error.to_string(), "Unavailable: model overloaded");
    }
}
