use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use vagent::{AgentLoopHooks, LoopOutcome, ParsingError, ValidatedDecision};
use vcommon::RunId;
use vprovider::{ProviderError, ProviderId, ProviderOperationHooks};
use vreport::QueryRecord;
use vtooling::{ToolCall, ToolError, ToolExecutionContext, ToolRuntimeHooks};

/// Provider hooks wrapper that contains panics raised by `inner`.
pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, attempt: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_attempt_start(provider, operation, attempt)
        }));
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_retry_scheduled(provider, operation, attempt, delay, error)
        }));
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(provider, operation, attempts)
        }));
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_failure(provider, operation, attempts, error)
        }));
    }
}

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_start(tool_call, context)
        }));
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        record: &QueryRecord,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_success(tool_call, context, record, elapsed)
        }));
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_failure(tool_call, context, error, elapsed)
        }));
    }
}

pub struct SafeLoopHooks<H> {
    inner: H,
}

impl<H> SafeLoopHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> AgentLoopHooks for SafeLoopHooks<H>
where
    H: AgentLoopHooks,
{
    fn on_run_start(&self, run_id: &RunId, max_iters: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_run_start(run_id, max_iters)
        }));
    }

    fn on_iteration_start(&self, run_id: &RunId, iteration: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_iteration_start(run_id, iteration)
        }));
    }

    fn on_decision(&self, run_id: &RunId, iteration: u32, decision: &ValidatedDecision) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_decision(run_id, iteration, decision)
        }));
    }

    fn on_parse_failure(&self, run_id: &RunId, iteration: u32, error: &ParsingError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_parse_failure(run_id, iteration, error)
        }));
    }

    fn on_run_complete(&self, run_id: &RunId, outcome: &LoopOutcome, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_run_complete(run_id, outcome, elapsed)
        }));
    }
}
