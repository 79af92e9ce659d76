//! Tool trait contract for registry-managed query capabilities.
//!
//! ```rust
//! use vreport::{QueryPayload, QueryRecord};
//! use vtooling::{ArgumentSchema, FunctionTool, Tool, ToolDefinition};
//!
//! let tool = FunctionTool::new(
//!     ToolDefinition::new(
//!         "no_leaves",
//!         "Always reports no leave-post records",
//!         ArgumentSchema::new(),
//!     ),
//!     |_args, _ctx| async move {
//!         Ok(QueryRecord::generate(QueryPayload::leave_post_records(Vec::new())))
//!     },
//! );
//!
//! assert_eq!(tool.definition().name, "no_leaves");
//! ```

use std::future::Future;
use std::sync::Arc;

use vcommon::BoxFuture;
use vreport::QueryRecord;

use crate::{ToolArguments, ToolDefinition, ToolError, ToolExecutionContext};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Arguments have already passed the definition's schema when called through a registry.
    fn invoke<'a>(
        &'a self,
        arguments: &'a ToolArguments,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<QueryRecord, ToolError>>;
}

type ToolHandler = dyn Fn(
        ToolArguments,
        ToolExecutionContext,
    ) -> ToolFuture<'static, Result<QueryRecord, ToolError>>
    + Send
    + Sync;

pub struct FunctionTool {
    definition: ToolDefinition,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F, Fut>(definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<QueryRecord, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> =
            Arc::new(move |arguments, context| Box::pin(handler(arguments, context)));

        Self {
            definition,
            handler,
        }
    }
}

impl Tool for FunctionTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    fn invoke<'a>(
        &'a self,
        arguments: &'a ToolArguments,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<QueryRecord, ToolError>> {
        (self.handler)(arguments.clone(), context.clone())
    }
}
