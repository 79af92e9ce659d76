use std::sync::{Arc, Mutex};
use std::time::Duration;

use vagent::{
    AgentLoopHooks, DecisionValidator, LoopOutcome, ParsingError, Termination, ValidatedDecision,
};
use vcommon::RunId;
use vprovider::{ProviderError, ProviderId, ProviderOperationHooks};
use vreport::{QueryPayload, QueryRecord};
use vtooling::{ToolCall, ToolError, ToolExecutionContext, ToolRuntimeHooks};

use crate::{
    MetricsObservabilityHooks, SafeLoopHooks, SafeProviderHooks, SafeToolHooks,
    TracingObservabilityHooks,
};

fn sample_tool_call() -> ToolCall {
    ToolCall::new("leave_records_query")
        .with_argument("start_time", "2024-05-27 00:00:00")
        .with_argument("end_time", "2024-05-27 23:59:59")
}

fn sample_tool_context() -> ToolExecutionContext {
    ToolExecutionContext::new("run-1")
        .with_position(1, 0)
        .with_trace_id("trace-1")
}

fn sample_record() -> QueryRecord {
    QueryRecord::new("abc1", QueryPayload::leave_post_records(Vec::new()))
}

fn sample_decision() -> ValidatedDecision {
    DecisionValidator::new(true)
        .validate(r#"{"thought":"Done","function":[]}"#)
        .expect("decision should validate")
}

fn sample_outcome(termination: Termination) -> LoopOutcome {
    LoopOutcome {
        output: String::new(),
        records: vec![sample_record()],
        history: Vec::new(),
        iterations: 2,
        termination,
    }
}

fn exercise_provider_hooks(hooks: &dyn ProviderOperationHooks) {
    let error = ProviderError::timeout("provider timeout");
    hooks.on_attempt_start(ProviderId::DashScope, "complete", 1);
    hooks.on_retry_scheduled(
        ProviderId::DashScope,
        "complete",
        1,
        Duration::from_millis(10),
        &error,
    );
    hooks.on_success(ProviderId::DashScope, "complete", 2);
    hooks.on_failure(ProviderId::DashScope, "complete", 2, &error);
}

fn exercise_tool_hooks(hooks: &dyn ToolRuntimeHooks) {
    hooks.on_execution_start(&sample_tool_call(), &sample_tool_context());
    hooks.on_execution_success(
        &sample_tool_call(),
        &sample_tool_context(),
        &sample_record(),
        Duration::from_millis(20),
    );
    hooks.on_execution_failure(
        &sample_tool_call(),
        &sample_tool_context(),
        &ToolError::execution("tool failed"),
        Duration::from_millis(20),
    );
}

fn exercise_loop_hooks(hooks: &dyn AgentLoopHooks) {
    let run_id = RunId::new("run-1");
    hooks.on_run_start(&run_id, 10);
    hooks.on_iteration_start(&run_id, 1);
    hooks.on_decision(&run_id, 1, &sample_decision());
    hooks.on_parse_failure(
        &run_id,
        1,
        &ParsingError::new("missing required key(s): thought", "{}"),
    );
    hooks.on_run_complete(&run_id, &sample_outcome(Termination::Done), Duration::from_millis(30));
    hooks.on_run_complete(
        &run_id,
        &sample_outcome(Termination::ProviderFailed(ProviderError::unavailable("down"))),
        Duration::from_millis(30),
    );
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    let hooks = TracingObservabilityHooks;
    exercise_provider_hooks(&hooks);
    exercise_tool_hooks(&hooks);
    exercise_loop_hooks(&hooks);
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    let hooks = MetricsObservabilityHooks;
    exercise_provider_hooks(&hooks);
    exercise_tool_hooks(&hooks);
    exercise_loop_hooks(&hooks);
}

#[derive(Default, Clone)]
struct RecordingHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingHooks {
    fn push(&self, event: &'static str) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl ProviderOperationHooks for RecordingHooks {
    fn on_attempt_start(&self, _provider: ProviderId, _operation: &str, _attempt: u32) {
        self.push("attempt_start");
    }

    fn on_retry_scheduled(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _delay: Duration,
        _error: &ProviderError,
    ) {
        self.push("retry_scheduled");
    }

    fn on_success(&self, _provider: ProviderId, _operation: &str, _attempts: u32) {
        self.push("success");
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
        self.push("failure");
    }
}

impl ToolRuntimeHooks for RecordingHooks {
    fn on_execution_start(&self, _tool_call: &ToolCall, _context: &ToolExecutionContext) {
        self.push("execution_start");
    }

    fn on_execution_success(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _record: &QueryRecord,
        _elapsed: Duration,
    ) {
        self.push("execution_success");
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        self.push("execution_failure");
    }
}

impl AgentLoopHooks for RecordingHooks {
    fn on_run_start(&self, _run_id: &RunId, _max_iters: u32) {
        self.push("run_start");
    }

    fn on_iteration_start(&self, _run_id: &RunId, _iteration: u32) {
        self.push("iteration_start");
    }

    fn on_decision(&self, _run_id: &RunId, _iteration: u32, _decision: &ValidatedDecision) {
        self.push("decision");
    }

    fn on_parse_failure(&self, _run_id: &RunId, _iteration: u32, _error: &ParsingError) {
        self.push("parse_failure");
    }

    fn on_run_complete(&self, _run_id: &RunId, _outcome: &LoopOutcome, _elapsed: Duration) {
        self.push("run_complete");
    }
}

struct PanicHooks;

impl ProviderOperationHooks for PanicHooks {
    fn on_attempt_start(&self, _provider: ProviderId, _operation: &str, _attempt: u32) {
        panic!("attempt_start panic");
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
        panic!("failure panic");
    }
}

impl ToolRuntimeHooks for PanicHooks {
    fn on_execution_start(&self, _tool_call: &ToolCall, _context: &ToolExecutionContext) {
        panic!("start panic");
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        panic!("failure panic");
    }
}

impl AgentLoopHooks for PanicHooks {
    fn on_decision(&self, _run_id: &RunId, _iteration: u32, _decision: &ValidatedDecision) {
        panic!("decision panic");
    }

    fn on_run_complete(&self, _run_id: &RunId, _outcome: &LoopOutcome, _elapsed: Duration) {
        panic!("run_complete panic");
    }
}

#[test]
fn safe_wrappers_delegate_when_inner_succeeds() {
    let inner = RecordingHooks::default();
    let events = Arc::clone(&inner.events);

    exercise_provider_hooks(&SafeProviderHooks::new(inner.clone()));
    exercise_tool_hooks(&SafeToolHooks::new(inner.clone()));
    exercise_loop_hooks(&SafeLoopHooks::new(inner));

    let events = events.lock().expect("events lock");
    assert_eq!(events.len(), 4 + 3 + 6);
    assert_eq!(events.first(), Some(&"attempt_start"));
    assert_eq!(events.last(), Some(&"run_complete"));
}

#[test]
fn safe_wrappers_swallow_panics() {
    exercise_provider_hooks(&SafeProviderHooks::new(PanicHooks));
    exercise_tool_hooks(&SafeToolHooks::new(PanicHooks));
    exercise_loop_hooks(&SafeLoopHooks::new(PanicHooks));
}
