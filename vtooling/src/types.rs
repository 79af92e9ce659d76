//! Tool call, definition, argument schema, and execution context types.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vcommon::{MetadataMap, RunId, TraceId};

use crate::ToolError;
use crate::args::{ToolArguments, coerce_id_list, coerce_integer, coerce_text};

/// One requested invocation: a tool name and its argument mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: ToolArguments,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: ToolArguments::new(),
        }
    }

    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_arguments(mut self, arguments: ToolArguments) -> Self {
        self.arguments = arguments;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Text,
    Integer,
    IdList,
}

impl ArgKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::IdList => "list of integer ids",
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Text => coerce_text(value).is_some(),
            Self::Integer => coerce_integer(value).is_some(),
            Self::IdList => coerce_id_list(value).is_some(),
        }
    }
}

impl Display for ArgKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ArgKind,
    pub required: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArgumentSchema {
    params: Vec<ParamSpec>,
}

impl ArgumentSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(
        mut self,
        name: impl Into<String>,
        kind: ArgKind,
        description: impl Into<String>,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            required: true,
            description: description.into(),
        });
        self
    }

    pub fn optional(
        mut self,
        name: impl Into<String>,
        kind: ArgKind,
        description: impl Into<String>,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            required: false,
            description: description.into(),
        });
        self
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|param| param.name == name)
    }

    /// Checks presence, absence of extras, and kind coercibility in declaration order.
    pub fn validate(&self, arguments: &ToolArguments) -> Result<(), ToolError> {
        for param in &self.params {
            match arguments.get(&param.name) {
                None if param.required => {
                    return Err(ToolError::invalid_arguments(format!(
                        "missing required argument: '{}'",
                        param.name
                    )));
                }
                Some(value) if !param.kind.accepts(value) => {
                    return Err(ToolError::invalid_arguments(format!(
                        "argument '{}' must be {}",
                        param.name, param.kind
                    )));
                }
                _ => {}
            }
        }

        let mut unexpected = arguments
            .keys()
            .filter(|key| self.param(key).is_none())
            .map(String::as_str)
            .collect::<Vec<_>>();
        if !unexpected.is_empty() {
            unexpected.sort_unstable();
            return Err(ToolError::invalid_arguments(format!(
                "unexpected argument(s): {}",
                unexpected.join(", ")
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub schema: ArgumentSchema,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ArgumentSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionContext {
    pub run_id: RunId,
    pub iteration: u32,
    pub call_index: usize,
    pub trace_id: Option<TraceId>,
    pub metadata: MetadataMap,
}

impl ToolExecutionContext {
    pub fn new(run_id: impl Into<RunId>) -> Self {
        Self {
            run_id: run_id.into(),
            iteration: 0,
            call_index: 0,
            trace_id: None,
            metadata: MetadataMap::new(),
        }
    }

    pub fn with_position(mut self, iteration: u32, call_index: usize) -> Self {
        self.iteration = iteration;
        self.call_index = call_index;
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
