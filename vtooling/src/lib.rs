//! Capability layer for registering, validating, and dispatching query tools.

mod args;
mod error;
mod hooks;
mod registry;
mod runtime;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        ArgKind, ArgumentSchema, DefaultToolRuntime, Tool, ToolArguments, ToolCall,
        ToolDefinition, ToolError, ToolErrorKind, ToolExecutionContext, ToolFuture, ToolRegistry,
        ToolRuntime, ToolRuntimeHooks,
    };
}

pub use args::{ToolArguments, id_list_arg, integer_arg, parse_arguments, text_arg};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use registry::ToolRegistry;
pub use runtime::{DefaultToolRuntime, ToolRuntime};
pub use tool::{FunctionTool, Tool, ToolFuture};
pub use types::{ArgKind, ArgumentSchema, ParamSpec, ToolCall, ToolDefinition, ToolExecutionContext};
