//! Timestamp and packed time-of-day helpers shared by records and renderers.
//!
//! ```rust
//! use vreport::time::{PackedTime, slot_duration};
//!
//! let start = PackedTime::parse("235000").expect("valid time");
//! let end = PackedTime::parse("001000").expect("valid time");
//!
//! assert_eq!(start.to_string(), "23:50:00");
//! assert_eq!(slot_duration(start, end).to_string(), "0 hours 20 minutes 0 seconds");
//! ```

use std::fmt::{Display, Formatter};

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::ReportError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ReportError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|error| {
        ReportError::invalid_time(format!(
            "expected 'YYYY-MM-DD hh:mm:ss', got '{value}': {error}"
        ))
    })
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Serde adapter for `YYYY-MM-DD HH:MM:SS` timestamps.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A time of day carried on the wire as six packed digits (`HHMMSS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PackedTime(NaiveTime);

impl PackedTime {
    pub fn parse(raw: &str) -> Result<Self, ReportError> {
        if raw.len() != 6 || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(ReportError::invalid_time(format!(
                "expected packed HHMMSS digits, got '{raw}'"
            )));
        }

        NaiveTime::parse_from_str(raw, "%H%M%S")
            .map(Self)
            .map_err(|error| ReportError::invalid_time(format!("invalid time '{raw}': {error}")))
    }

    pub fn seconds_from_midnight(self) -> u32 {
        self.0.num_seconds_from_midnight()
    }
}

impl Display for PackedTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDuration {
    seconds: u32,
}

impl SlotDuration {
    pub fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    pub fn as_seconds(self) -> u32 {
        self.seconds
    }
}

impl Display for SlotDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.seconds / 3600;
        let minutes = (self.seconds % 3600) / 60;
        let seconds = self.seconds % 60;
        write!(f, "{hours} hours {minutes} minutes {seconds} seconds")
    }
}

/// Same-day interval length; an end earlier than the start wraps past midnight.
pub fn slot_duration(start: PackedTime, end: PackedTime) -> SlotDuration {
    let start = start.seconds_from_midnight();
    let end = end.seconds_from_midnight();
    let seconds = if end < start {
        end + SECONDS_PER_DAY - start
    } else {
        end - start
    };

    SlotDuration::from_seconds(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportErrorKind;

    fn packed(raw: &str) -> PackedTime {
        PackedTime::parse(raw).expect("packed time should parse")
    }

    #[test]
    fn same_day_duration_is_plain_difference() {
        let duration = slot_duration(packed("080000"), packed("082000"));
        assert_eq!(duration.to_string(), "0 hours 20 minutes 0 seconds");
    }

    #[test]
    fn end_before_start_wraps_past_midnight() {
        let duration = slot_duration(packed("235000"), packed("001000"));
        assert_eq!(duration.as_seconds(), 20 * 60);
        assert_eq!(duration.to_string(), "0 hours 20 minutes 0 seconds");
    }

    #[test]
    fn equal_times_have_zero_duration() {
        let duration = slot_duration(packed("120000"), packed("120000"));
        assert_eq!(duration.to_string(), "0 hours 0 minutes 0 seconds");
    }

    #[test]
    fn duration_decomposes_into_hours_minutes_seconds() {
        let duration = slot_duration(packed("090507"), packed("113512"));
        assert_eq!(duration.to_string(), "2 hours 30 minutes 5 seconds");
    }

    #[test]
    fn packed_time_rejects_malformed_values() {
        for raw in ["", "0800", "08:00:00", "2460000", "246000", "08x000"] {
            let error = PackedTime::parse(raw).expect_err("malformed time should fail");
            assert_eq!(error.kind, ReportErrorKind::InvalidTime);
        }
    }

    #[test]
    fn timestamps_parse_and_format_with_seconds() {
        let parsed = parse_timestamp("2024-05-27 11:07:31").expect("timestamp should parse");
        assert_eq!(format_timestamp(&parsed), "2024-05-27 11:07:31");

        let error = parse_timestamp("2024-05-27T11:07").expect_err("iso form is rejected");
        assert_eq!(error.kind, ReportErrorKind::InvalidTime);
    }
}
