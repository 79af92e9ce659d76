//! Per-run loop state and the outcome handed back to callers.

use std::collections::HashSet;

use vprovider::{Message, ProviderError};
use vreport::QueryRecord;

/// Mutable state of one bounded run; discarded when the run ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopState {
    iteration: u32,
    buffer: Vec<String>,
    history: Vec<Message>,
    records: Vec<QueryRecord>,
    seen_ids: HashSet<String>,
}

impl LoopState {
    pub fn new(history: Vec<Message>) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }

    /// Pre-populates the result buffer, e.g. when continuing a previous round.
    pub fn with_result(mut self, entry: impl Into<String>) -> Self {
        self.buffer.push(entry.into());
        self
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn buffer(&self) -> &[String] {
        &self.buffer
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn records(&self) -> &[QueryRecord] {
        &self.records
    }

    /// True once a record or buffer entry exists.
    pub fn has_results(&self) -> bool {
        !self.buffer.is_empty() || !self.records.is_empty()
    }

    pub fn joined_output(&self) -> String {
        self.buffer.concat()
    }

    pub(crate) fn advance(&mut self) {
        self.iteration += 1;
    }

    pub(crate) fn push_history(&mut self, message: Message) {
        self.history.push(message);
    }

    pub(crate) fn push_result(&mut self, entry: String) {
        self.buffer.push(entry);
    }

    /// Re-keys the record when its id was already used in this run.
    pub(crate) fn admit(&mut self, mut record: QueryRecord) -> QueryRecord {
        while self.seen_ids.contains(&record.query_id) {
            record.query_id = vcommon::short_id();
        }
        self.seen_ids.insert(record.query_id.clone());
        self.records.push(record.clone());
        record
    }

    pub(crate) fn finish(self, termination: Termination) -> LoopOutcome {
        LoopOutcome {
            output: self.joined_output(),
            iterations: self.iteration,
            records: self.records,
            history: self.history,
            termination,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The reasoning step returned an empty call list.
    Done,
    /// The iteration budget ran out.
    Exhausted,
    /// The provider kept failing after its retry budget.
    ProviderFailed(ProviderError),
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Exhausted => "exhausted",
            Self::ProviderFailed(_) => "provider_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopOutcome {
    /// Concatenated result buffer, possibly empty.
    pub output: String,
    pub records: Vec<QueryRecord>,
    pub history: Vec<Message>,
    pub iterations: u32,
    pub termination: Termination,
}

impl LoopOutcome {
    pub fn is_done(&self) -> bool {
        self.termination == Termination::Done
    }
}

#[cfg(test)]
mod tests {
    use vreport::QueryPayload;

    use super::*;

    #[test]
    fn admit_rekeys_colliding_ids() {
        let mut state = LoopState::default();
        let first =
            state.admit(QueryRecord::new("abc1", QueryPayload::leave_post_records(Vec::new())));
        let second =
            state.admit(QueryRecord::new("abc1", QueryPayload::leave_post_records(Vec::new())));

        assert_eq!(first.query_id, "abc1");
        assert_ne!(second.query_id, "abc1");
        assert_eq!(second.query_id.len(), vcommon::ids::SHORT_ID_LEN);
        assert_eq!(state.records().len(), 2);
    }

    #[test]
    fn results_are_tracked_from_records_or_buffer() {
        let mut state = LoopState::default();
        assert!(!state.has_results());

        state.admit(QueryRecord::new("abc1", QueryPayload::leave_post_records(Vec::new())));
        assert!(state.has_results());
        assert!(LoopState::default().with_result("flow=10").has_results());
    }

    #[test]
    fn outcome_joins_buffer_in_order() {
        let mut state = LoopState::default().with_result("a");
        state.push_result("b\n".to_string());
        state.advance();

        let outcome = state.finish(Termination::Exhausted);
        assert_eq!(outcome.output, "ab\n");
        assert_eq!(outcome.iterations, 1);
        assert!(!outcome.is_done());
    }
}
