//! `start - end` time range parsing and segmentation.
//!
//! ```rust
//! use vstore::TimeRange;
//!
//! let range = TimeRange::parse("2024-05-27 09:00:00 - 2024-05-27 12:00:00").expect("valid range");
//! let segments = range.split(3).expect("positive segment count");
//!
//! assert_eq!(segments.len(), 3);
//! assert_eq!(segments[1].to_string(), "2024-05-27 10:00:00 - 2024-05-27 11:00:00");
//! ```

use std::fmt::{Display, Formatter};

use chrono::{NaiveDateTime, TimeDelta};
use vreport::time::{format_timestamp, parse_timestamp};

use crate::StoreError;

pub const RANGE_SEPARATOR: &str = " - ";

/// Upper bound on distribution segments per query.
pub const MAX_SEGMENTS: i64 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, StoreError> {
        if end < start {
            return Err(StoreError::invalid_request(format!(
                "time range ends before it starts: {} - {}",
                format_timestamp(&start),
                format_timestamp(&end)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn from_bounds(start: &str, end: &str) -> Result<Self, StoreError> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let (start, end) = raw.trim().split_once(RANGE_SEPARATOR).ok_or_else(|| {
            StoreError::invalid_request(format!(
                "expected 'YYYY-MM-DD hh:mm:ss - YYYY-MM-DD hh:mm:ss', got '{raw}'"
            ))
        })?;
        Self::from_bounds(start, end)
    }

    /// Parses a comma-separated list of ranges, ignoring empty entries.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, StoreError> {
        let ranges = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if ranges.is_empty() {
            return Err(StoreError::invalid_request("no time ranges given"));
        }
        Ok(ranges)
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Splits the range into `segments` equal windows; the last window ends exactly at `end`.
    pub fn split(&self, segments: i64) -> Result<Vec<Self>, StoreError> {
        if segments <= 0 {
            return Err(StoreError::invalid_request("num_segments must be greater than 0"));
        }
        if segments > MAX_SEGMENTS {
            return Err(StoreError::invalid_request(format!(
                "num_segments must be at most {MAX_SEGMENTS}"
            )));
        }

        let count = segments as i32;
        let step = self.duration() / count;
        let mut windows = Vec::with_capacity(segments as usize);
        for index in 0..count {
            let start = self.start + step * index;
            let end = if index + 1 == count {
                self.end
            } else {
                start + step
            };
            windows.push(Self { start, end });
        }
        Ok(windows)
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{RANGE_SEPARATOR}{}",
            format_timestamp(&self.start),
            format_timestamp(&self.end)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreErrorKind;

    #[test]
    fn parses_lists_with_whitespace() {
        let raw = concat!(
            " 2024-05-27 11:00:00 - 2024-05-27 12:00:00 ,",
            " 2024-05-27 13:00:00 - 2024-05-27 14:00:00,",
        );
        let ranges = TimeRange::parse_list(raw).expect("ranges should parse");

        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].to_string(), "2024-05-27 13:00:00 - 2024-05-27 14:00:00");
    }

    #[test]
    fn rejects_malformed_and_reversed_ranges() {
        let error = TimeRange::parse("2024-05-27 11:00:00").expect_err("missing separator");
        assert_eq!(error.kind, StoreErrorKind::InvalidRequest);

        let error = TimeRange::parse("yesterday - today").expect_err("bad timestamps");
        assert_eq!(error.kind, StoreErrorKind::InvalidRequest);

        let error = TimeRange::parse("2024-05-27 12:00:00 - 2024-05-27 11:00:00")
            .expect_err("reversed range");
        assert!(error.message.contains("ends before it starts"));

        assert!(TimeRange::parse_list(" , ").is_err());
    }

    #[test]
    fn split_requires_positive_count() {
        let range = TimeRange::parse("2024-05-27 11:00:00 - 2024-05-27 12:00:00").expect("range");
        assert!(range.split(0).is_err());
        assert!(range.split(-2).is_err());
        assert!(range.split(MAX_SEGMENTS + 1).is_err());
    }

    #[test]
    fn uneven_split_ends_on_range_end() {
        let range = TimeRange::parse("2024-05-27 11:00:00 - 2024-05-27 11:00:10").expect("range");
        let windows = range.split(3).expect("windows");

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].start, range.start);
        assert_eq!(windows[2].end, range.end);
        assert!(windows.windows(2).all(|pair| pair[0].end == pair[1].start));
    }
}
