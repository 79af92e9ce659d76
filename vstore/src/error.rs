//! Data-source errors for monitoring queries.

use std::error::Error;
use std::fmt::{Display, Formatter};

use vreport::ReportError;
use vtooling::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Storage,
    InvalidRequest,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Storage, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound, message)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for StoreError {}

/// Time strings supplied by callers are request errors.
impl From<ReportError> for StoreError {
    fn from(error: ReportError) -> Self {
        Self::invalid_request(error.message)
    }
}

impl From<StoreError> for ToolError {
    fn from(error: StoreError) -> Self {
        match error.kind {
            StoreErrorKind::InvalidRequest => ToolError::invalid_arguments(error.message),
            StoreErrorKind::Storage | StoreErrorKind::NotFound => {
                ToolError::execution(error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use vtooling::ToolErrorKind;

    use super::*;

    #[test]
    fn request_errors_become_argument_errors() {
        let error: ToolError =
            StoreError::invalid_request("num_segments must be greater than 0").into();
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
        assert_eq!(error.message, "num_segments must be greater than 0");

        let error: ToolError = StoreError::storage("disk gone").into();
        assert_eq!(error.kind, ToolErrorKind::Execution);
        assert_eq!(error.message, "Storage: disk gone");
    }
}
