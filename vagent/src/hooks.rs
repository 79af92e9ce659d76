//! Hook contracts for observing the query loop.
//!
//! ```rust
//! use vagent::{AgentLoopHooks, NoopAgentLoopHooks};
//!
//! fn accepts_hooks(_hooks: &dyn AgentLoopHooks) {}
//!
//! let hooks = NoopAgentLoopHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use vcommon::RunId;

use crate::{LoopOutcome, ParsingError, ValidatedDecision};

pub trait AgentLoopHooks: Send + Sync {
    fn on_run_start(&self, _run_id: &RunId, _max_iters: u32) {}

    fn on_iteration_start(&self, _run_id: &RunId, _iteration: u32) {}

    fn on_decision(&self, _run_id: &RunId, _iteration: u32, _decision: &ValidatedDecision) {}

    fn on_parse_failure(&self, _run_id: &RunId, _iteration: u32, _error: &ParsingError) {}

    fn on_run_complete(&self, _run_id: &RunId, _outcome: &LoopOutcome, _elapsed: Duration) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAgentLoopHooks;

impl AgentLoopHooks for NoopAgentLoopHooks {}
