//! Common imports for vigil applications.

pub use crate::{
    AgentPolicy, LoopOutcome, ModelProvider, ProviderId, QueryAgent, QueryRecord, RuntimeBundle,
    SqliteMonitoringStore, Termination, ToolCall, ToolRegistry, ToolRuntime, VigilConfig,
    VigilError, build_runtime, build_runtime_with_provider, render, render_report, substitute,
};
