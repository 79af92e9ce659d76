//! Tool registry for lookup, schema-checked dispatch, and prompt listings.

use std::fmt::Write as _;
use std::future::Future;
use std::sync::Arc;

use vcommon::Registry;
use vreport::QueryRecord;

use crate::{
    FunctionTool, Tool, ToolArguments, ToolCall, ToolDefinition, ToolError, ToolExecutionContext,
};

#[derive(Default)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a name twice replaces the earlier tool.
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.register_shared(Arc::new(tool));
    }

    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name;
        self.tools.insert(name, tool);
    }

    pub fn register_fn<F, Fut>(&mut self, definition: ToolDefinition, handler: F)
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<QueryRecord, ToolError>> + Send + 'static,
    {
        self.register(FunctionTool::new(definition, handler));
    }

    pub fn register_sync_fn<F>(&mut self, definition: ToolDefinition, handler: F)
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Result<QueryRecord, ToolError>
            + Send
            + Sync
            + 'static,
    {
        self.register_fn(definition, move |arguments, context| {
            let output = handler(arguments, context);
            async move { output }
        });
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Looks up the tool, checks the arguments against its schema, then runs the handler.
    ///
    /// Handler errors come back unchanged apart from the tool name being attached.
    pub async fn dispatch(
        &self,
        call: &ToolCall,
        context: &ToolExecutionContext,
    ) -> Result<QueryRecord, ToolError> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| ToolError::unknown_tool(call.name.clone()))?;

        tool.definition()
            .schema
            .validate(&call.arguments)
            .map_err(|error| error.with_tool_name(call.name.clone()))?;

        tool.invoke(&call.arguments, context).await.map_err(|error| {
            if error.tool_name.is_some() {
                error
            } else {
                error.with_tool_name(call.name.clone())
            }
        })
    }

    /// Name-ordered listing of tools and their arguments for system prompts.
    pub fn instructions(&self) -> String {
        let mut listing = String::new();
        for definition in self.definitions() {
            let _ = writeln!(listing, "- {}: {}", definition.name, definition.description);
            if definition.schema.params().is_empty() {
                let _ = writeln!(listing, "    (no arguments)");
            }
            for param in definition.schema.params() {
                let presence = if param.required { "required" } else { "optional" };
                let _ = writeln!(
                    listing,
                    "    {} ({}, {}): {}",
                    param.name, param.kind, presence, param.description
                );
            }
        }
        listing
    }
}
