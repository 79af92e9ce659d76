use std::sync::Arc;

use chrono::TimeDelta;
use serde_json::json;
use vreport::time::parse_timestamp;
use vreport::{QueryKind, QueryPayload, QueryRecord, render, substitute};
use vstore::{IntrusionAlarm, SqliteMonitoringStore, register_monitoring_tools};
use vtooling::{ToolCall, ToolErrorKind, ToolExecutionContext, ToolRegistry};

fn seeded_store() -> Arc<SqliteMonitoringStore> {
    let store = SqliteMonitoringStore::new_in_memory().expect("store should open");
    store.seed_demo_data().expect("seed should succeed");
    Arc::new(store)
}

fn registry_for(store: Arc<SqliteMonitoringStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_monitoring_tools(&mut registry, store);
    registry
}

async fn call(registry: &ToolRegistry, call: ToolCall) -> QueryRecord {
    registry
        .dispatch(&call, &ToolExecutionContext::new("run-test"))
        .await
        .expect("tool call should succeed")
}

#[tokio::test]
async fn flow_query_sums_each_range() {
    let registry = registry_for(seeded_store());
    let record = call(
        &registry,
        ToolCall::new("flow_query").with_argument(
            "time_ranges",
            "2024-05-27 08:00:00 - 2024-05-27 08:05:00,2024-05-28 08:00:00 - 2024-05-28 09:00:00",
        ),
    )
    .await;

    assert_eq!(record.kind(), QueryKind::PassengerFlowStatistics);
    assert_eq!(record.query_id.len(), 8);
    let QueryPayload::PassengerFlowStatistics { total_periods, periods } = &record.payload else {
        panic!("unexpected payload: {:?}", record.payload);
    };
    assert_eq!(*total_periods, 2);
    assert_eq!(periods[0].passenger_flow, 21);
    assert_eq!(periods[1].passenger_flow, 0);
}

#[tokio::test]
async fn flow_distribution_splits_into_inclusive_segments() {
    let registry = registry_for(seeded_store());
    let record = call(
        &registry,
        ToolCall::new("flow_distribution")
            .with_argument("time_range", "2024-05-27 08:00:00 - 2024-05-27 08:20:00")
            .with_argument("num_segments", "2"),
    )
    .await;

    let QueryPayload::PassengerFlowDistribution {
        total_segments,
        segments,
    } = &record.payload
    else {
        panic!("unexpected payload: {:?}", record.payload);
    };
    assert_eq!(*total_segments, 2);
    assert_eq!(segments[0].passenger_flow, 10 + 11 + 12);
    assert_eq!(segments[1].passenger_flow, 12 + 13 + 14);
    assert!(render(&record).contains(
        "Segment 2: 2024-05-27 08:10:00 - 2024-05-27 08:20:00, Passenger flow: 39"
    ));
}

#[tokio::test]
async fn flow_distribution_rejects_zero_segments() {
    let registry = registry_for(seeded_store());
    let error = registry
        .dispatch(
            &ToolCall::new("flow_distribution")
                .with_argument("time_range", "2024-05-27 08:00:00 - 2024-05-27 08:20:00")
                .with_argument("num_segments", 0),
            &ToolExecutionContext::new("run-test"),
        )
        .await
        .expect_err("zero segments should fail");

    assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    assert_eq!(error.tool_name.as_deref(), Some("flow_distribution"));
    assert!(error.message.contains("greater than 0"));
}

#[tokio::test]
async fn intrusion_events_drop_alarms_within_two_minutes() {
    let store = seeded_store();
    store
        .insert_intrusion(&IntrusionAlarm {
            id: 70000,
            alarm_time: parse_timestamp("2024-05-27 11:08:30").expect("time"),
            url: "http://example.com/repeat.jpg".to_string(),
        })
        .expect("insert should succeed");
    let registry = registry_for(store);

    let record = call(
        &registry,
        ToolCall::new("intrusion_events_query")
            .with_argument("start_time", "2024-05-27 11:00:00")
            .with_argument("end_time", "2024-05-27 12:00:00"),
    )
    .await;

    let QueryPayload::IntrusionEventsInTimeRange { events, .. } = &record.payload else {
        panic!("unexpected payload: {:?}", record.payload);
    };
    let ids = events.iter().map(|event| event.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![66406, 66414, 66428]);
}

#[tokio::test]
async fn intrusion_images_sample_the_leading_burst() {
    let store = seeded_store();
    let burst_start = parse_timestamp("2024-05-27 15:00:00").expect("time");
    for index in 0..9i64 {
        store
            .insert_intrusion(&IntrusionAlarm {
                id: 90000 + index,
                alarm_time: burst_start + TimeDelta::seconds(30 * index),
                url: format!("http://example.com/burst-{index}.jpg"),
            })
            .expect("insert should succeed");
    }
    store
        .insert_intrusion(&IntrusionAlarm {
            id: 90100,
            alarm_time: parse_timestamp("2024-05-27 15:09:30").expect("time"),
            url: "http://example.com/late.jpg".to_string(),
        })
        .expect("insert should succeed");
    let registry = registry_for(store);

    let record = call(
        &registry,
        ToolCall::new("intrusion_images_query").with_argument("id", "90000"),
    )
    .await;

    let QueryPayload::IntrusionEventImagesById { events } = &record.payload else {
        panic!("unexpected payload: {:?}", record.payload);
    };
    let urls = events.iter().map(|image| image.url.as_str()).collect::<Vec<_>>();
    assert_eq!(
        urls,
        vec![
            "http://example.com/burst-0.jpg",
            "http://example.com/burst-2.jpg",
            "http://example.com/burst-4.jpg",
            "http://example.com/burst-6.jpg",
            "http://example.com/burst-8.jpg",
        ]
    );
}

#[tokio::test]
async fn unknown_event_id_yields_an_empty_record() {
    let registry = registry_for(seeded_store());
    let record = call(
        &registry,
        ToolCall::new("intrusion_images_query").with_argument("id", 1),
    )
    .await;

    assert_eq!(record.kind(), QueryKind::IntrusionEventImagesById);
    assert_eq!(record.payload.item_count(), 0);
}

#[tokio::test]
async fn multi_images_accept_comma_separated_ids() {
    let registry = registry_for(seeded_store());
    let record = call(
        &registry,
        ToolCall::new("multi_intrusion_images_query").with_argument("ids", "66428, 66406"),
    )
    .await;

    let QueryPayload::MultipleIntrusionEventImages { events } = &record.payload else {
        panic!("unexpected payload: {:?}", record.payload);
    };
    let ids = events.iter().map(|image| image.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![66406, 66428]);
}

#[tokio::test]
async fn leave_records_resolve_in_a_report() {
    let registry = registry_for(seeded_store());
    let record = call(
        &registry,
        ToolCall::new("leave_records_query").with_arguments(
            json!({"start_time": "2024-05-27 00:00:00", "end_time": "2024-05-27 23:59:59"})
                .as_object()
                .cloned()
                .expect("object"),
        ),
    )
    .await;

    let QueryPayload::LeavePostRecords { leave_post_records, .. } = &record.payload else {
        panic!("unexpected payload: {:?}", record.payload);
    };
    assert_eq!(leave_post_records.len(), 2);
    assert_eq!(leave_post_records[0].interval_time.as_deref(), Some("20"));

    let report = substitute(
        std::slice::from_ref(&record),
        &format!("Leave posts: [{}]", record.query_id),
    );
    assert!(report.starts_with("Leave posts: Query ID: "));
    assert!(!report.contains(&format!("[{}]", record.query_id)));
}

#[tokio::test]
async fn malformed_times_are_argument_errors() {
    let registry = registry_for(seeded_store());
    let error = registry
        .dispatch(
            &ToolCall::new("leave_records_query")
                .with_argument("start_time", "this morning")
                .with_argument("end_time", "2024-05-27 12:00:00"),
            &ToolExecutionContext::new("run-test"),
        )
        .await
        .expect_err("bad time should fail");

    assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    assert!(error.message.contains("this morning"));
}

#[test]
fn instructions_list_every_tool() {
    let registry = registry_for(seeded_store());
    let instructions = registry.instructions();
    for name in [
        "flow_distribution",
        "flow_query",
        "intrusion_events_query",
        "intrusion_images_query",
        "leave_records_query",
        "multi_intrusion_images_query",
    ] {
        assert!(instructions.contains(&format!("- {name}: ")), "missing {name}");
    }
    assert!(instructions.contains("num_segments (integer, required)"));
}
