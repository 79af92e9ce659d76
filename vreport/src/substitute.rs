//! Placeholder substitution over free text.
//!
//! Tokens of the form `[query_id]` are replaced with the rendered fragment of the
//! matching record. Unknown ids become `[Query ID not found: <id>]`, which does not
//! itself match the placeholder syntax, so a second pass leaves it alone.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{QueryRecord, render};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([a-zA-Z0-9-]+)\]").expect("placeholder pattern is a valid regex")
});

pub fn not_found_marker(query_id: &str) -> String {
    format!("[Query ID not found: {query_id}]")
}

/// Fragments keyed by query id, rendered once and reused for every token.
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    fragments: HashMap<String, String>,
}

impl ReportContext {
    pub fn new<'a>(records: impl IntoIterator<Item = &'a QueryRecord>) -> Self {
        let mut context = Self::default();
        for record in records {
            context.insert(record);
        }
        context
    }

    /// A later record with the same id replaces the earlier fragment.
    pub fn insert(&mut self, record: &QueryRecord) {
        self.fragments.insert(record.query_id.clone(), render(record));
    }

    pub fn fragment(&self, query_id: &str) -> Option<&str> {
        self.fragments.get(query_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn substitute(&self, text: &str) -> String {
        PLACEHOLDER
            .replace_all(text, |captures: &Captures<'_>| {
                let query_id = &captures[1];
                match self.fragments.get(query_id) {
                    Some(fragment) => fragment.clone(),
                    None => not_found_marker(query_id),
                }
            })
            .into_owned()
    }
}

/// Replaces every `[query_id]` token in `text`; never fails.
///
/// ```rust
/// use vreport::{QueryPayload, QueryRecord, substitute};
///
/// let records = vec![QueryRecord::new("abc1", QueryPayload::leave_post_records(Vec::new()))];
/// let output = substitute(&records, "see [abc1] and [zzz]");
///
/// assert!(output.starts_with("see Query ID: abc1 (leave-post records)\n"));
/// assert!(output.ends_with(" and [Query ID not found: zzz]"));
/// ```
pub fn substitute(records: &[QueryRecord], text: &str) -> String {
    ReportContext::new(records).substitute(text)
}

/// Ids referenced by placeholder tokens, in order of appearance.
pub fn placeholder_ids(text: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|captures| captures.get(1).map(|id| id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LeavePostRecord, QueryPayload};

    fn leave_record(query_id: &str) -> QueryRecord {
        QueryRecord::new(
            query_id,
            QueryPayload::leave_post_records(vec![LeavePostRecord {
                time_slot_start: "080000".to_string(),
                time_slot_end: "082000".to_string(),
                interval_time: Some("20".to_string()),
            }]),
        )
    }

    #[test]
    fn resolves_known_ids_and_marks_unknown_ones() {
        let records = vec![leave_record("abc1"), leave_record("abc2")];
        let output = substitute(&records, "[abc1] and [abc2] and [zzz]");

        let expected = format!(
            "{} and {} and [Query ID not found: zzz]",
            render(&records[0]),
            render(&records[1])
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn text_without_tokens_is_unchanged() {
        let records = vec![leave_record("abc1")];
        assert_eq!(substitute(&records, "flow=10"), "flow=10");
        assert_eq!(substitute(&[], ""), "");
    }

    #[test]
    fn single_token_reproduces_fragment_byte_for_byte() {
        let records = vec![leave_record("abc1")];
        let first = substitute(&records, "[abc1]");
        let second = substitute(&records, "[abc1]");

        assert_eq!(first, render(&records[0]));
        assert_eq!(first, second);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let records = vec![leave_record("abc1")];
        let once = substitute(&records, "report: [abc1] missing: [nope-1]");
        let twice = substitute(&records, &once);

        assert_eq!(once, twice);
        assert!(once.contains("[Query ID not found: nope-1]"));
    }

    #[test]
    fn repeated_tokens_all_resolve() {
        let records = vec![leave_record("abc1")];
        let output = substitute(&records, "[abc1][abc1]");
        assert_eq!(output, render(&records[0]).repeat(2));
    }

    #[test]
    fn tokens_outside_the_id_alphabet_are_left_alone() {
        let records = vec![leave_record("abc1")];
        let text = "[abc 1] [abc_1] [] [abc1";
        assert_eq!(substitute(&records, text), text);
    }

    #[test]
    fn later_record_with_same_id_wins() {
        let first = leave_record("dup");
        let second = QueryRecord::new("dup", QueryPayload::intrusion_events(Vec::new()));
        let context = ReportContext::new([&first, &second]);

        assert_eq!(context.len(), 1);
        assert_eq!(context.fragment("dup"), Some(render(&second).as_str()));
    }

    #[test]
    fn placeholder_ids_are_listed_in_order() {
        assert_eq!(
            placeholder_ids("[b2] then [a-1] then [b2]"),
            vec!["b2", "a-1", "b2"]
        );
    }
}
