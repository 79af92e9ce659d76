//! Tool dispatch errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    UnknownTool,
    InvalidArguments,
    Execution,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub tool_name: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tool_name: None,
        }
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            ToolErrorKind::UnknownTool,
            format!("tool '{name}' is not registered"),
        )
        .with_tool_name(name)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Other, message)
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    /// Errors the planner can fix by issuing a different call.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::UnknownTool | ToolErrorKind::InvalidArguments
        )
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.tool_name {
            Some(tool_name) => write!(f, "{:?} [tool={}]: {}", self.kind, tool_name, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ToolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tool_names_the_tool() {
        let error = ToolError::unknown_tool("weather");
        assert_eq!(error.kind, ToolErrorKind::UnknownTool);
        assert_eq!(error.tool_name.as_deref(), Some("weather"));
        assert_eq!(
            error.to_string(),
            "UnknownTool [tool=weather]: tool 'weather' is not registered"
        );
        assert!(error.is_user_error());
    }

    #[test]
    fn execution_errors_are_not_user_errors() {
        let error = ToolError::execution("database is locked");
        assert!(!error.is_user_error());
        assert_eq!(error.to_string(), "Execution: database is locked");
    }
}
