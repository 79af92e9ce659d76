use serde_json::json;
use vreport::{QueryKind, QueryRecord, ReportContext, extract_records, observation, substitute};

fn sample_records() -> Vec<QueryRecord> {
    let raw = json!([
        {
            "query_id": "a1b2c3",
            "query_type": "leave_post_records",
            "total_records": 2,
            "leave_post_records": [
                {"time_slot_start": "090000", "time_slot_end": "093000"},
                {"time_slot_start": "140000", "time_slot_end": "141500"}
            ]
        },
        {
            "query_id": "d4e5f6",
            "query_type": "multiple_intrusion_event_images",
            "events": [
                {
                    "id": 1,
                    "alarm_time": "2023-05-01 10:00:00",
                    "url": "http://example.com/image1.jpg"
                },
                {
                    "id": 2,
                    "alarm_time": "2023-05-01 11:30:00",
                    "url": "http://example.com/image2.jpg"
                }
            ]
        },
        {
            "query_id": "e4afea46",
            "query_type": "intrusion_events_in_time_range",
            "total_events": 3,
            "events": [
                {"alarm_time": "2024-05-27 11:07:31", "id": 66406},
                {"alarm_time": "2024-05-27 11:13:50", "id": 66414},
                {"alarm_time": "2024-05-27 11:25:39", "id": 66428}
            ]
        },
        {
            "query_id": "f90efeff",
            "query_type": "passenger_flow_statistics",
            "total_periods": 1,
            "periods": [
                {
                    "start_time": "2024-05-27 00:00:00",
                    "end_time": "2024-05-27 23:59:59",
                    "passenger_flow": 349
                }
            ]
        }
    ]);

    serde_json::from_value(raw).expect("sample records should decode")
}

#[test]
fn mixed_report_resolves_every_known_placeholder() {
    let records = sample_records();
    let kinds = records.iter().map(QueryRecord::kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            QueryKind::LeavePostRecords,
            QueryKind::MultipleIntrusionEventImages,
            QueryKind::IntrusionEventsInTimeRange,
            QueryKind::PassengerFlowStatistics,
        ]
    );

    let text = "Leave: [a1b2c3]. Images: [d4e5f6]. Events: [e4afea46]. \
                Flow: [f90efeff]. Unknown: [x1y2z3].";
    let report = substitute(&records, text);

    assert!(report.contains("Query ID: a1b2c3 (leave-post records)\nTotal records: 2\n"));
    assert!(report.contains("    Duration: 0 hours 30 minutes 0 seconds\n"));
    assert!(report.contains("    Duration: 0 hours 15 minutes 0 seconds\n"));
    assert!(
        report.contains("Query ID: d4e5f6 (multiple intrusion event images)\nTotal events: 2\n")
    );
    assert!(report.contains("    ID: 66428\n"));
    assert!(report.contains("    Passenger flow: 349\n"));
    assert!(report.ends_with("Unknown: [Query ID not found: x1y2z3]."));
    assert!(!report.contains("[a1b2c3]"));
}

#[test]
fn context_reuse_matches_free_function() {
    let records = sample_records();
    let context = ReportContext::new(&records);
    let text = "[f90efeff] / [e4afea46] / [missing]";

    assert_eq!(context.substitute(text), substitute(&records, text));
    assert_eq!(context.len(), records.len());
}

#[test]
fn observation_buffer_feeds_substitution() {
    let records = sample_records();
    let buffer = records
        .iter()
        .map(|record| observation(record).expect("record serializes"))
        .collect::<String>();

    let recovered = extract_records(&buffer);
    assert_eq!(recovered, records);
    assert_eq!(
        substitute(&recovered, "[a1b2c3]"),
        substitute(&records, "[a1b2c3]")
    );
}

#[test]
fn raw_buffer_survives_substitution_alongside_narrative() {
    let records = sample_records();
    let buffer = records
        .iter()
        .map(|record| observation(record).expect("record serializes"))
        .collect::<String>();
    let text = format!("Raw data follows:\n{buffer}Summary: [a1b2c3]");

    let report = substitute(&records, &text);

    assert!(!report.contains("Query ID not found"));
    assert!(report.contains(&buffer));
    assert!(report.contains("Summary: Query ID: a1b2c3 (leave-post records)"));
    assert_eq!(extract_records(&report), records);
}
