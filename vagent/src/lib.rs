//! Query orchestration: validates reasoning output and dispatches tool calls in a bounded loop.

mod agent;
mod decision;
mod error;
mod hooks;
mod policy;
mod prompt;
mod state;

pub mod prelude {
    pub use crate::{
        AgentError, AgentErrorKind, AgentLoopHooks, AgentPolicy, Decision, DecisionValidator,
        LoopOutcome, LoopState, ParsingError, QueryAgent, QueryAgentBuilder, Termination,
        ValidatedDecision,
    };
    pub use vtooling::{DefaultToolRuntime, ToolCall, ToolRegistry, ToolRuntime};
}

pub use agent::{QueryAgent, QueryAgentBuilder};
pub use decision::{
    Decision, DecisionValidator, FORMAT_INSTRUCTION, ValidatedDecision, parse_decision,
};
pub use error::{AgentError, AgentErrorKind, ParsingError};
pub use hooks::{AgentLoopHooks, NoopAgentLoopHooks};
pub use policy::{AgentPolicy, DEFAULT_MAX_ITERS, DEFAULT_TODAY};
pub use prompt::DEFAULT_SYSTEM_PROMPT;
pub use state::{LoopOutcome, LoopState, Termination};
