//! `metrics` counters and histograms for every hook callback.
//!
//! ```rust
//! use vobserve::MetricsObservabilityHooks;
//! use vprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use vagent::{AgentLoopHooks, LoopOutcome, ParsingError, ValidatedDecision};
use vcommon::RunId;
use vprovider::{ProviderError, ProviderId, ProviderOperationHooks};
use vreport::QueryRecord;
use vtooling::{ToolCall, ToolError, ToolExecutionContext, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, _attempt: u32) {
        metrics::counter!(
            "vigil_provider_attempt_start_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        _attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "vigil_provider_retry_scheduled_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "vigil_provider_retry_delay_seconds",
            "provider" => provider.to_string()
        )
        .record(delay.as_secs_f64());
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        metrics::counter!(
            "vigil_provider_success_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "vigil_provider_attempts_per_success",
            "provider" => provider.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        _attempts: u32,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "vigil_provider_failure_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, _context: &ToolExecutionContext) {
        metrics::counter!(
            "vigil_tool_execution_start_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        record: &QueryRecord,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "vigil_tool_execution_success_total",
            "tool_name" => tool_call.name.clone(),
            "query_type" => record.kind().as_str()
        )
        .increment(1);
        metrics::histogram!(
            "vigil_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "vigil_tool_execution_failure_total",
            "tool_name" => tool_call.name.clone(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "vigil_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl AgentLoopHooks for MetricsObservabilityHooks {
    fn on_run_start(&self, _run_id: &RunId, _max_iters: u32) {
        metrics::counter!("vigil_loop_run_start_total").increment(1);
    }

    fn on_decision(&self, _run_id: &RunId, _iteration: u32, decision: &ValidatedDecision) {
        metrics::histogram!("vigil_loop_calls_per_decision")
            .record(decision.decision.function_calls.len() as f64);
    }

    fn on_parse_failure(&self, _run_id: &RunId, _iteration: u32, _error: &ParsingError) {
        metrics::counter!("vigil_loop_parse_failure_total").increment(1);
    }

    fn on_run_complete(&self, _run_id: &RunId, outcome: &LoopOutcome, elapsed: Duration) {
        let termination = outcome.termination.as_str();
        metrics::counter!("vigil_loop_run_complete_total", "termination" => termination)
            .increment(1);
        metrics::histogram!("vigil_loop_iterations_per_run", "termination" => termination)
            .record(f64::from(outcome.iterations));
        metrics::histogram!("vigil_loop_run_duration_seconds", "termination" => termination)
            .record(elapsed.as_secs_f64());
    }
}
