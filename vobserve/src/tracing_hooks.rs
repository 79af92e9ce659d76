//! `tracing` events for every hook callback.
//!
//! ```rust
//! use vagent::AgentLoopHooks;
//! use vobserve::TracingObservabilityHooks;
//!
//! fn accepts_loop_hooks(_hooks: &dyn AgentLoopHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_loop_hooks(&hooks);
//! ```

use std::time::Duration;

use vagent::{AgentLoopHooks, LoopOutcome, ParsingError, Termination, ValidatedDecision};
use vcommon::RunId;
use vprovider::{ProviderError, ProviderId, ProviderOperationHooks};
use vreport::QueryRecord;
use vtooling::{ToolCall, ToolError, ToolExecutionContext, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, attempt: u32) {
        tracing::info!(
            phase = "provider",
            event = "attempt_start",
            provider = %provider,
            operation,
            attempt
        );
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        tracing::warn!(
            phase = "provider",
            event = "retry_scheduled",
            provider = %provider,
            operation,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        tracing::info!(
            phase = "provider",
            event = "success",
            provider = %provider,
            operation,
            attempts
        );
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            operation,
            attempts,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_name = tool_call.name,
            run_id = %context.run_id,
            iteration = context.iteration,
            call_index = context.call_index
        );
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        record: &QueryRecord,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "execution_success",
            tool_name = tool_call.name,
            run_id = %context.run_id,
            query_id = record.query_id,
            query_type = %record.kind(),
            items = record.payload.item_count(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::warn!(
            phase = "tool",
            event = "execution_failure",
            tool_name = tool_call.name,
            run_id = %context.run_id,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            user_error = error.is_user_error(),
            error = %error
        );
    }
}

impl AgentLoopHooks for TracingObservabilityHooks {
    fn on_run_start(&self, run_id: &RunId, max_iters: u32) {
        tracing::info!(phase = "loop", event = "run_start", run_id = %run_id, max_iters);
    }

    fn on_iteration_start(&self, run_id: &RunId, iteration: u32) {
        tracing::debug!(phase = "loop", event = "iteration_start", run_id = %run_id, iteration);
    }

    fn on_decision(&self, run_id: &RunId, iteration: u32, decision: &ValidatedDecision) {
        tracing::info!(
            phase = "loop",
            event = "decision",
            run_id = %run_id,
            iteration,
            calls = decision.decision.function_calls.len(),
            is_final = decision.decision.is_final()
        );
    }

    fn on_parse_failure(&self, run_id: &RunId, iteration: u32, error: &ParsingError) {
        tracing::warn!(
            phase = "loop",
            event = "parse_failure",
            run_id = %run_id,
            iteration,
            error = %error
        );
    }

    fn on_run_complete(&self, run_id: &RunId, outcome: &LoopOutcome, elapsed: Duration) {
        match &outcome.termination {
            Termination::ProviderFailed(error) => tracing::error!(
                phase = "loop",
                event = "run_complete",
                run_id = %run_id,
                termination = outcome.termination.as_str(),
                iterations = outcome.iterations,
                records = outcome.records.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                error = %error
            ),
            _ => tracing::info!(
                phase = "loop",
                event = "run_complete",
                run_id = %run_id,
                termination = outcome.termination.as_str(),
                iterations = outcome.iterations,
                records = outcome.records.len(),
                elapsed_ms = elapsed.as_millis() as u64
            ),
        }
    }
}
