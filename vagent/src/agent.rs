//! The bounded THINK / VALIDATE / ACT query loop.

use std::sync::Arc;
use std::time::Instant;

use vcommon::RunId;
use vprovider::{
    Message, ModelProvider, ModelRequest, NoopOperationHooks, ProviderError, ProviderErrorKind,
    ProviderOperationHooks, RetryingProvider,
};
use vreport::observation;
use vtooling::{ToolCall, ToolExecutionContext, ToolRuntime};

use crate::prompt::system_prompt;
use crate::{
    AgentError, AgentLoopHooks, AgentPolicy, DecisionValidator, LoopOutcome, LoopState,
    NoopAgentLoopHooks, Termination,
};

pub struct QueryAgentBuilder {
    provider: Arc<dyn ModelProvider>,
    tools: Arc<dyn ToolRuntime>,
    policy: AgentPolicy,
    hooks: Arc<dyn AgentLoopHooks>,
    provider_hooks: Arc<dyn ProviderOperationHooks>,
}

impl QueryAgentBuilder {
    pub fn new(provider: Arc<dyn ModelProvider>, tools: Arc<dyn ToolRuntime>) -> Self {
        Self {
            provider,
            tools,
            policy: AgentPolicy::default(),
            hooks: Arc::new(NoopAgentLoopHooks),
            provider_hooks: Arc::new(NoopOperationHooks),
        }
    }

    pub fn policy(mut self, policy: AgentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn AgentLoopHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn provider_hooks(mut self, provider_hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.provider_hooks = provider_hooks;
        self
    }

    pub fn build(self) -> Result<QueryAgent, AgentError> {
        self.policy.validate()?;

        let provider = RetryingProvider::new(self.provider, self.policy.retry.clone())
            .with_hooks(self.provider_hooks);

        Ok(QueryAgent {
            provider,
            tools: self.tools,
            validator: DecisionValidator::new(self.policy.verbose),
            policy: self.policy,
            hooks: self.hooks,
        })
    }
}

/// Turns a plan into a bounded sequence of tool calls and collects their records.
pub struct QueryAgent {
    provider: RetryingProvider,
    tools: Arc<dyn ToolRuntime>,
    validator: DecisionValidator,
    policy: AgentPolicy,
    hooks: Arc<dyn AgentLoopHooks>,
}

enum Validation {
    Act(Vec<ToolCall>),
    Finish,
    Retry,
}

impl QueryAgent {
    pub fn builder(
        provider: Arc<dyn ModelProvider>,
        tools: Arc<dyn ToolRuntime>,
    ) -> QueryAgentBuilder {
        QueryAgentBuilder::new(provider, tools)
    }

    pub fn policy(&self) -> &AgentPolicy {
        &self.policy
    }

    pub fn validator(&self) -> &DecisionValidator {
        &self.validator
    }

    pub fn system_prompt(&self) -> String {
        system_prompt(
            &self.policy.system_prompt,
            &self.tools.instructions(),
            &self.policy.today,
        )
    }

    /// Fresh state holding the system prompt and the plan.
    pub fn initial_state(&self, plan: &str) -> Result<LoopState, AgentError> {
        if plan.trim().is_empty() {
            return Err(AgentError::invalid_request("plan must not be empty"));
        }

        Ok(LoopState::new(vec![
            Message::system(self.system_prompt()),
            Message::user(plan),
        ]))
    }

    pub async fn run(&self, plan: &str) -> Result<LoopOutcome, AgentError> {
        let state = self.initial_state(plan)?;
        self.resume(state).await
    }

    /// Drives the loop from `state` until done, exhausted, or the provider gives up.
    ///
    /// Provider errors that retrying cannot fix (bad credentials, rejected requests)
    /// abort the run while nothing has been collected yet. Any other provider failure
    /// ends it with whatever was collected.
    pub async fn resume(&self, mut state: LoopState) -> Result<LoopOutcome, AgentError> {
        let run_id = RunId::generate();
        let started = Instant::now();
        self.hooks.on_run_start(&run_id, self.policy.max_iters);

        let termination = loop {
            if state.iteration() >= self.policy.max_iters {
                break Termination::Exhausted;
            }

            state.advance();
            let iteration = state.iteration();
            self.hooks.on_iteration_start(&run_id, iteration);

            let raw = match self.think(&run_id, &state).await {
                Ok(raw) => raw,
                Err(error) if is_configuration_error(&error) && !state.has_results() => {
                    return Err(error.into());
                }
                Err(error) => break Termination::ProviderFailed(error),
            };

            match self.validate(&run_id, iteration, raw, &mut state) {
                Validation::Finish => {
                    if state.buffer().is_empty()
                        && let Some(fallback) = &self.policy.fallback_text
                    {
                        state.push_result(fallback.clone());
                    }
                    break Termination::Done;
                }
                Validation::Retry => continue,
                Validation::Act(calls) => self.act(&run_id, iteration, calls, &mut state).await,
            }
        };

        let outcome = state.finish(termination);
        self.hooks.on_run_complete(&run_id, &outcome, started.elapsed());
        Ok(outcome)
    }

    async fn think(&self, run_id: &RunId, state: &LoopState) -> Result<String, ProviderError> {
        let request = ModelRequest::builder(self.policy.model.clone())
            .messages(state.history().iter().cloned())
            .message(Message::system(self.validator.format_instruction()))
            .options(self.policy.generation)
            .metadata("run_id", run_id.as_str())
            .build()?;

        let response = self.provider.complete(request).await?;
        Ok(response.content)
    }

    fn validate(
        &self,
        run_id: &RunId,
        iteration: u32,
        raw: String,
        state: &mut LoopState,
    ) -> Validation {
        match self.validator.validate(&raw) {
            Ok(validated) => {
                self.hooks.on_decision(run_id, iteration, &validated);
                tracing::debug!(
                    run_id = %run_id,
                    iteration,
                    calls = validated.decision.function_calls.len(),
                    "decision validated"
                );
                state.push_history(Message::assistant(raw));

                if validated.decision.is_final() {
                    Validation::Finish
                } else {
                    Validation::Act(validated.decision.function_calls)
                }
            }
            Err(error) => {
                self.hooks.on_parse_failure(run_id, iteration, &error);
                tracing::debug!(
                    run_id = %run_id,
                    iteration,
                    error = %error,
                    "decision rejected"
                );
                let feedback = error.to_string();
                let raw_response = if error.raw_response.trim().is_empty() {
                    "(empty response)".to_string()
                } else {
                    error.raw_response
                };
                state.push_history(Message::assistant(raw_response));
                state.push_history(Message::system(feedback));
                Validation::Retry
            }
        }
    }

    async fn act(
        &self,
        run_id: &RunId,
        iteration: u32,
        calls: Vec<ToolCall>,
        state: &mut LoopState,
    ) {
        for (index, call) in calls.into_iter().enumerate() {
            let context = ToolExecutionContext::new(run_id.clone()).with_position(iteration, index);
            let name = call.name.clone();

            match self.tools.execute(call, context).await {
                Ok(record) => {
                    let record = state.admit(record);
                    match observation(&record) {
                        Ok(entry) => {
                            state.push_history(Message::system(format!(
                                "Obtained results from {name}: {}",
                                entry.trim_end()
                            )));
                            state.push_result(entry);
                        }
                        Err(error) => state.push_history(Message::system(format!(
                            "Function {name} returned a result that could not be recorded: {error}"
                        ))),
                    }
                }
                Err(error) => {
                    state.push_history(Message::system(format!(
                        "Function {name} failed: {error}"
                    )));
                }
            }
        }
    }
}

fn is_configuration_error(error: &ProviderError) -> bool {
    matches!(
        error.kind,
        ProviderErrorKind::Authentication | ProviderErrorKind::InvalidRequest
    )
}
