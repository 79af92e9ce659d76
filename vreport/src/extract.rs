//! `RESULT:` observation lines carrying serialized records.
//!
//! The prefix never forms an `[id]` placeholder, so substitution leaves these lines intact.

use std::sync::LazyLock;

use regex::Regex;

use crate::{QueryRecord, ReportError};

pub const RESULT_PREFIX: &str = "RESULT: ";

static RESULT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^RESULT: (.*)$").expect("result line pattern is a valid regex")
});

/// Single-line observation for a record, newline terminated.
pub fn observation(record: &QueryRecord) -> Result<String, ReportError> {
    Ok(format!("{RESULT_PREFIX}{}\n", record.to_json()?))
}

/// Recovers records from observation lines; lines that do not decode are skipped.
///
/// ```rust
/// use vreport::{QueryPayload, QueryRecord, extract_records, observation};
///
/// let record = QueryRecord::new("abc1", QueryPayload::intrusion_events(Vec::new()));
/// let buffer = format!("noise\n{}", observation(&record).expect("record serializes"));
///
/// assert_eq!(extract_records(&buffer), vec![record]);
/// ```
pub fn extract_records(text: &str) -> Vec<QueryRecord> {
    RESULT_LINE
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .filter_map(|payload| QueryRecord::from_json(payload.as_str().trim()).ok())
        .collect()
}
