//! Tagged query records produced by monitoring tools.
//!
//! ```rust
//! use vreport::{QueryKind, QueryRecord};
//!
//! let raw = r#"{"query_id":"abc1","query_type":"leave_post_records",
//!     "total_records":0,"leave_post_records":[]}"#;
//! let record = QueryRecord::from_json(raw).expect("record should decode");
//!
//! assert_eq!(record.query_id, "abc1");
//! assert_eq!(record.kind(), QueryKind::LeavePostRecords);
//! ```

use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ReportError;
use crate::time::timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub query_id: String,
    #[serde(flatten)]
    pub payload: QueryPayload,
}

impl QueryRecord {
    pub fn new(query_id: impl Into<String>, payload: QueryPayload) -> Self {
        Self {
            query_id: query_id.into(),
            payload,
        }
    }

    /// Builds a record under a freshly generated short id.
    pub fn generate(payload: QueryPayload) -> Self {
        Self::new(vcommon::short_id(), payload)
    }

    pub fn kind(&self) -> QueryKind {
        self.payload.kind()
    }

    pub fn with_query_id(mut self, query_id: impl Into<String>) -> Self {
        self.query_id = query_id.into();
        self
    }

    pub fn from_json(raw: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query_type", rename_all = "snake_case")]
pub enum QueryPayload {
    PassengerFlowStatistics {
        total_periods: usize,
        periods: Vec<FlowWindow>,
    },
    PassengerFlowDistribution {
        total_segments: usize,
        segments: Vec<FlowWindow>,
    },
    IntrusionEventsInTimeRange {
        total_events: usize,
        events: Vec<IntrusionEvent>,
    },
    IntrusionEventImagesById {
        events: Vec<IntrusionImage>,
    },
    MultipleIntrusionEventImages {
        events: Vec<IdentifiedIntrusionImage>,
    },
    LeavePostRecords {
        total_records: usize,
        leave_post_records: Vec<LeavePostRecord>,
    },
}

impl QueryPayload {
    pub fn flow_statistics(periods: Vec<FlowWindow>) -> Self {
        Self::PassengerFlowStatistics {
            total_periods: periods.len(),
            periods,
        }
    }

    pub fn flow_distribution(segments: Vec<FlowWindow>) -> Self {
        Self::PassengerFlowDistribution {
            total_segments: segments.len(),
            segments,
        }
    }

    pub fn intrusion_events(events: Vec<IntrusionEvent>) -> Self {
        Self::IntrusionEventsInTimeRange {
            total_events: events.len(),
            events,
        }
    }

    pub fn intrusion_images(events: Vec<IntrusionImage>) -> Self {
        Self::IntrusionEventImagesById { events }
    }

    pub fn multiple_intrusion_images(events: Vec<IdentifiedIntrusionImage>) -> Self {
        Self::MultipleIntrusionEventImages { events }
    }

    pub fn leave_post_records(records: Vec<LeavePostRecord>) -> Self {
        Self::LeavePostRecords {
            total_records: records.len(),
            leave_post_records: records,
        }
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            Self::PassengerFlowStatistics { .. } => QueryKind::PassengerFlowStatistics,
            Self::PassengerFlowDistribution { .. } => QueryKind::PassengerFlowDistribution,
            Self::IntrusionEventsInTimeRange { .. } => QueryKind::IntrusionEventsInTimeRange,
            Self::IntrusionEventImagesById { .. } => QueryKind::IntrusionEventImagesById,
            Self::MultipleIntrusionEventImages { .. } => QueryKind::MultipleIntrusionEventImages,
            Self::LeavePostRecords { .. } => QueryKind::LeavePostRecords,
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            Self::PassengerFlowStatistics { periods, .. } => periods.len(),
            Self::PassengerFlowDistribution { segments, .. } => segments.len(),
            Self::IntrusionEventsInTimeRange { events, .. } => events.len(),
            Self::IntrusionEventImagesById { events } => events.len(),
            Self::MultipleIntrusionEventImages { events } => events.len(),
            Self::LeavePostRecords {
                leave_post_records, ..
            } => leave_post_records.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    PassengerFlowStatistics,
    PassengerFlowDistribution,
    IntrusionEventsInTimeRange,
    IntrusionEventImagesById,
    MultipleIntrusionEventImages,
    LeavePostRecords,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PassengerFlowStatistics => "passenger_flow_statistics",
            Self::PassengerFlowDistribution => "passenger_flow_distribution",
            Self::IntrusionEventsInTimeRange => "intrusion_events_in_time_range",
            Self::IntrusionEventImagesById => "intrusion_event_images_by_id",
            Self::MultipleIntrusionEventImages => "multiple_intrusion_event_images",
            Self::LeavePostRecords => "leave_post_records",
        }
    }

    /// Human-readable label used in report headers.
    pub fn label(self) -> &'static str {
        match self {
            Self::PassengerFlowStatistics => "passenger flow statistics",
            Self::PassengerFlowDistribution => "passenger flow distribution",
            Self::IntrusionEventsInTimeRange => "intrusion events in time range",
            Self::IntrusionEventImagesById => "intrusion event images by id",
            Self::MultipleIntrusionEventImages => "multiple intrusion event images",
            Self::LeavePostRecords => "leave-post records",
        }
    }
}

impl Display for QueryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Passenger flow summed over one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowWindow {
    #[serde(with = "timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub end_time: NaiveDateTime,
    pub passenger_flow: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrusionEvent {
    #[serde(with = "timestamp")]
    pub alarm_time: NaiveDateTime,
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrusionImage {
    #[serde(with = "timestamp")]
    pub alarm_time: NaiveDateTime,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedIntrusionImage {
    pub id: i64,
    #[serde(with = "timestamp")]
    pub alarm_time: NaiveDateTime,
    pub url: String,
}

/// Leave-post slot; start and end are packed `HHMMSS` strings as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePostRecord {
    pub time_slot_start: String,
    pub time_slot_end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::time::parse_timestamp;

    #[test]
    fn record_serializes_with_flat_query_type_tag() {
        let record = QueryRecord::new(
            "e4afea46",
            QueryPayload::intrusion_events(vec![IntrusionEvent {
                alarm_time: parse_timestamp("2024-05-27 11:07:31").expect("timestamp"),
                id: 66406,
            }]),
        );

        let value = serde_json::to_value(&record).expect("record should serialize");
        assert_eq!(
            value,
            json!({
                "query_id": "e4afea46",
                "query_type": "intrusion_events_in_time_range",
                "total_events": 1,
                "events": [{"alarm_time": "2024-05-27 11:07:31", "id": 66406}],
            })
        );
    }

    #[test]
    fn leave_post_record_decodes_without_interval_time() {
        let record = QueryRecord::from_json(
            r#"{"query_id":"a1b2c3","query_type":"leave_post_records","total_records":1,
                "leave_post_records":[{"time_slot_start":"090000","time_slot_end":"093000"}]}"#,
        )
        .expect("record should decode");

        match record.payload {
            QueryPayload::LeavePostRecords {
                total_records,
                leave_post_records,
            } => {
                assert_eq!(total_records, 1);
                assert_eq!(leave_post_records[0].interval_time, None);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn unknown_query_type_is_rejected() {
        let error = QueryRecord::from_json(r#"{"query_id":"x","query_type":"weather"}"#)
            .expect_err("unknown type should fail");
        assert_eq!(error.kind, crate::ReportErrorKind::InvalidRecord);
    }

    #[test]
    fn generated_records_get_short_ids_and_counted_payloads() {
        let record = QueryRecord::generate(QueryPayload::flow_distribution(Vec::new()));
        assert_eq!(record.query_id.len(), 8);
        assert_eq!(record.kind(), QueryKind::PassengerFlowDistribution);
        assert_eq!(record.payload.item_count(), 0);
        assert_eq!(record.kind().label(), "passenger flow distribution");
    }
}
