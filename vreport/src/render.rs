//! Type-specific text fragments for query records.

use std::fmt::{Display, Formatter};

use crate::time::{PackedTime, format_timestamp, slot_duration};
use crate::{LeavePostRecord, QueryPayload, QueryRecord};

pub fn render(record: &QueryRecord) -> String {
    Fragment(record).to_string()
}

/// Display adapter that writes the report fragment for one record.
pub struct Fragment<'a>(pub &'a QueryRecord);

impl Display for Fragment<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let record = self.0;
        let (noun, total) = match &record.payload {
            QueryPayload::PassengerFlowStatistics { total_periods, .. } => {
                ("periods", *total_periods)
            }
            QueryPayload::PassengerFlowDistribution { total_segments, .. } => {
                ("segments", *total_segments)
            }
            QueryPayload::IntrusionEventsInTimeRange { total_events, .. } => {
                ("events", *total_events)
            }
            QueryPayload::IntrusionEventImagesById { events } => ("images", events.len()),
            QueryPayload::MultipleIntrusionEventImages { events } => ("events", events.len()),
            QueryPayload::LeavePostRecords { total_records, .. } => ("records", *total_records),
        };

        writeln!(f, "Query ID: {} ({})", record.query_id, record.kind().label())?;
        writeln!(f, "Total {noun}: {total}")?;
        writeln!(f, "Details:")?;

        match &record.payload {
            QueryPayload::PassengerFlowStatistics { periods, .. } => {
                for (index, period) in periods.iter().enumerate() {
                    writeln!(f, "  Period {}:", index + 1)?;
                    writeln!(f, "    Start: {}", format_timestamp(&period.start_time))?;
                    writeln!(f, "    End: {}", format_timestamp(&period.end_time))?;
                    writeln!(f, "    Passenger flow: {}\n", period.passenger_flow)?;
                }
            }
            QueryPayload::PassengerFlowDistribution { segments, .. } => {
                for (index, segment) in segments.iter().enumerate() {
                    writeln!(
                        f,
                        "  Segment {}: {} - {}, Passenger flow: {}",
                        index + 1,
                        format_timestamp(&segment.start_time),
                        format_timestamp(&segment.end_time),
                        segment.passenger_flow
                    )?;
                }
            }
            QueryPayload::IntrusionEventsInTimeRange { events, .. } => {
                for (index, event) in events.iter().enumerate() {
                    writeln!(f, "  Event {}:", index + 1)?;
                    writeln!(f, "    Alarm time: {}", format_timestamp(&event.alarm_time))?;
                    writeln!(f, "    ID: {}\n", event.id)?;
                }
            }
            QueryPayload::IntrusionEventImagesById { events } => {
                for (index, image) in events.iter().enumerate() {
                    writeln!(f, "  Image {}:", index + 1)?;
                    writeln!(f, "    Alarm time: {}", format_timestamp(&image.alarm_time))?;
                    writeln!(f, "    Image URL: {}\n", image.url)?;
                }
            }
            QueryPayload::MultipleIntrusionEventImages { events } => {
                for (index, image) in events.iter().enumerate() {
                    writeln!(f, "  Event {}:", index + 1)?;
                    writeln!(f, "    ID: {}", image.id)?;
                    writeln!(f, "    Alarm time: {}", format_timestamp(&image.alarm_time))?;
                    writeln!(f, "    Image URL: {}\n", image.url)?;
                }
            }
            QueryPayload::LeavePostRecords {
                leave_post_records,
                ..
            } => {
                for (index, slot) in leave_post_records.iter().enumerate() {
                    write_leave_post_slot(f, index + 1, slot)?;
                }
            }
        }

        Ok(())
    }
}

// Unparseable slot times are shown as stored and the duration is left out.
fn write_leave_post_slot(
    f: &mut Formatter<'_>,
    position: usize,
    slot: &LeavePostRecord,
) -> std::fmt::Result {
    writeln!(f, "  Record {position}:")?;

    match (
        PackedTime::parse(&slot.time_slot_start),
        PackedTime::parse(&slot.time_slot_end),
    ) {
        (Ok(start), Ok(end)) => {
            writeln!(f, "    Start: {start}")?;
            writeln!(f, "    End: {end}")?;
            writeln!(f, "    Duration: {}\n", slot_duration(start, end))
        }
        _ => {
            writeln!(f, "    Start: {}", slot.time_slot_start)?;
            writeln!(f, "    End: {}", slot.time_slot_end)?;
            writeln!(f, "    Duration: unavailable\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;
    use crate::{FlowWindow, IdentifiedIntrusionImage, IntrusionEvent, IntrusionImage};

    fn ts(raw: &str) -> chrono::NaiveDateTime {
        parse_timestamp(raw).expect("timestamp should parse")
    }

    fn slot(start: &str, end: &str) -> LeavePostRecord {
        LeavePostRecord {
            time_slot_start: start.to_string(),
            time_slot_end: end.to_string(),
            interval_time: None,
        }
    }

    #[test]
    fn leave_post_fragment_lists_each_slot_with_duration() {
        let record = QueryRecord::new(
            "a1b2c3",
            QueryPayload::leave_post_records(vec![
                slot("080000", "082000"),
                slot("235000", "001000"),
            ]),
        );

        assert_eq!(
            render(&record),
            "Query ID: a1b2c3 (leave-post records)\n\
             Total records: 2\n\
             Details:\n\
             \x20 Record 1:\n\
             \x20   Start: 08:00:00\n\
             \x20   End: 08:20:00\n\
             \x20   Duration: 0 hours 20 minutes 0 seconds\n\n\
             \x20 Record 2:\n\
             \x20   Start: 23:50:00\n\
             \x20   End: 00:10:00\n\
             \x20   Duration: 0 hours 20 minutes 0 seconds\n\n"
        );
    }

    #[test]
    fn malformed_slot_times_render_raw_without_failing() {
        let record = QueryRecord::new(
            "bad1",
            QueryPayload::leave_post_records(vec![slot("8am", "082000")]),
        );

        let fragment = render(&record);
        assert!(fragment.contains("    Start: 8am\n"));
        assert!(fragment.contains("    End: 082000\n"));
        assert!(fragment.contains("    Duration: unavailable\n"));
    }

    #[test]
    fn distribution_fragment_uses_one_line_per_segment() {
        let record = QueryRecord::new(
            "5a823393",
            QueryPayload::flow_distribution(vec![
                FlowWindow {
                    start_time: ts("2024-05-27 00:00:00"),
                    end_time: ts("2024-05-27 02:24:00"),
                    passenger_flow: 36,
                },
                FlowWindow {
                    start_time: ts("2024-05-27 02:24:00"),
                    end_time: ts("2024-05-27 04:48:00"),
                    passenger_flow: 26,
                },
            ]),
        );

        assert_eq!(
            render(&record),
            "Query ID: 5a823393 (passenger flow distribution)\n\
             Total segments: 2\n\
             Details:\n\
             \x20 Segment 1: 2024-05-27 00:00:00 - 2024-05-27 02:24:00, Passenger flow: 36\n\
             \x20 Segment 2: 2024-05-27 02:24:00 - 2024-05-27 04:48:00, Passenger flow: 26\n"
        );
    }

    #[test]
    fn flow_statistics_fragment_lists_periods() {
        let record = QueryRecord::new(
            "f90efeff",
            QueryPayload::flow_statistics(vec![FlowWindow {
                start_time: ts("2024-05-27 00:00:00"),
                end_time: ts("2024-05-27 23:59:59"),
                passenger_flow: 349,
            }]),
        );

        assert_eq!(
            render(&record),
            "Query ID: f90efeff (passenger flow statistics)\n\
             Total periods: 1\n\
             Details:\n\
             \x20 Period 1:\n\
             \x20   Start: 2024-05-27 00:00:00\n\
             \x20   End: 2024-05-27 23:59:59\n\
             \x20   Passenger flow: 349\n\n"
        );
    }

    #[test]
    fn intrusion_fragments_keep_stored_order() {
        let range = QueryRecord::new(
            "e4afea46",
            QueryPayload::intrusion_events(vec![
                IntrusionEvent {
                    alarm_time: ts("2024-05-27 11:13:50"),
                    id: 66414,
                },
                IntrusionEvent {
                    alarm_time: ts("2024-05-27 11:07:31"),
                    id: 66406,
                },
            ]),
        );
        let fragment = render(&range);
        let later = fragment.find("ID: 66414").expect("first event rendered");
        let earlier = fragment.find("ID: 66406").expect("second event rendered");
        assert!(later < earlier);
        assert!(fragment.starts_with("Query ID: e4afea46 (intrusion events in time range)\n"));

        let by_id = QueryRecord::new(
            "g7h8i9",
            QueryPayload::intrusion_images(vec![IntrusionImage {
                alarm_time: ts("2023-05-01 15:45:00"),
                url: "http://example.com/image3.jpg".to_string(),
            }]),
        );
        assert_eq!(
            render(&by_id),
            "Query ID: g7h8i9 (intrusion event images by id)\n\
             Total images: 1\n\
             Details:\n\
             \x20 Image 1:\n\
             \x20   Alarm time: 2023-05-01 15:45:00\n\
             \x20   Image URL: http://example.com/image3.jpg\n\n"
        );

        let multi = QueryRecord::new(
            "d4e5f6",
            QueryPayload::multiple_intrusion_images(vec![IdentifiedIntrusionImage {
                id: 1,
                alarm_time: ts("2023-05-01 10:00:00"),
                url: "http://example.com/image1.jpg".to_string(),
            }]),
        );
        assert!(
            render(&multi).contains("  Event 1:\n    ID: 1\n    Alarm time: 2023-05-01 10:00:00\n")
        );
    }

    #[test]
    fn empty_payload_renders_header_only() {
        let record = QueryRecord::new("empty1", QueryPayload::intrusion_events(Vec::new()));
        assert_eq!(
            render(&record),
            "Query ID: empty1 (intrusion events in time range)\nTotal events: 0\nDetails:\n"
        );
    }
}
