//! Report-layer errors for record decoding and time parsing.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportErrorKind {
    InvalidRecord,
    InvalidTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportError {
    pub kind: ReportErrorKind,
    pub message: String,
}

impl ReportError {
    pub fn new(kind: ReportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::new(ReportErrorKind::InvalidRecord, message)
    }

    pub fn invalid_time(message: impl Into<String>) -> Self {
        Self::new(ReportErrorKind::InvalidTime, message)
    }
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ReportError {}

impl From<serde_json::Error> for ReportError {
    fn from(value: serde_json::Error) -> Self {
        Self::invalid_record(value.to_string())
    }
}
