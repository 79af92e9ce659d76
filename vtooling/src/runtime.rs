//! Tool runtime trait and default registry-backed executor.

use std::sync::Arc;
use std::time::Instant;

use vreport::QueryRecord;

use crate::{
    NoopToolRuntimeHooks, ToolCall, ToolError, ToolExecutionContext, ToolFuture, ToolRegistry,
    ToolRuntimeHooks,
};

pub trait ToolRuntime: Send + Sync {
    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<QueryRecord, ToolError>>;

    /// Prompt listing of whatever this runtime can dispatch.
    fn instructions(&self) -> String;
}

#[derive(Clone)]
pub struct DefaultToolRuntime {
    registry: Arc<ToolRegistry>,
    hooks: Arc<dyn ToolRuntimeHooks>,
}

impl Default for DefaultToolRuntime {
    fn default() -> Self {
        Self::new(Arc::new(ToolRegistry::new()))
    }
}

impl DefaultToolRuntime {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }
}

impl ToolRuntime for DefaultToolRuntime {
    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<QueryRecord, ToolError>> {
        Box::pin(async move {
            self.hooks.on_execution_start(&tool_call, &context);
            let started = Instant::now();

            match self.registry.dispatch(&tool_call, &context).await {
                Ok(record) => {
                    self.hooks
                        .on_execution_success(&tool_call, &context, &record, started.elapsed());
                    Ok(record)
                }
                Err(error) => {
                    self.hooks
                        .on_execution_failure(&tool_call, &context, &error, started.elapsed());
                    Err(error)
                }
            }
        })
    }

    fn instructions(&self) -> String {
        self.registry.instructions()
    }
}
