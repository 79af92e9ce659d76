use std::sync::Arc;

use chrono::TimeDelta;
use vreport::{IdentifiedIntrusionImage, IntrusionEvent, IntrusionImage, QueryPayload, QueryRecord};
use vtooling::{
    ArgKind, ArgumentSchema, Tool, ToolArguments, ToolDefinition, ToolError,
    ToolExecutionContext, ToolFuture, id_list_arg, integer_arg, text_arg,
};

use super::{INTRUSION_EVENTS_QUERY, INTRUSION_IMAGES_QUERY, MULTI_INTRUSION_IMAGES_QUERY};
use crate::{
    SqliteMonitoringStore, StoreErrorKind, TimeRange, five_point_sample, leading_burst,
    thin_by_gap,
};

/// Alarms closer than this to the previous listed alarm belong to the same event.
const EVENT_SEPARATION: TimeDelta = TimeDelta::minutes(2);

/// How far after an event its follow-up images are searched.
const IMAGE_WINDOW: TimeDelta = TimeDelta::minutes(10);

pub struct IntrusionEventsTool {
    store: Arc<SqliteMonitoringStore>,
}

impl IntrusionEventsTool {
    pub fn new(store: Arc<SqliteMonitoringStore>) -> Self {
        Self { store }
    }
}

impl Tool for IntrusionEventsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            INTRUSION_EVENTS_QUERY,
            "Intrusion event ids and times within a time range. Widening the range by 10-60 \
             minutes helps avoid missing events.",
            ArgumentSchema::new()
                .required("start_time", ArgKind::Text, "'YYYY-MM-DD hh:mm:ss'")
                .required("end_time", ArgKind::Text, "'YYYY-MM-DD hh:mm:ss'"),
        )
    }

    fn invoke<'a>(
        &'a self,
        arguments: &'a ToolArguments,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<QueryRecord, ToolError>> {
        Box::pin(async move {
            let range = TimeRange::from_bounds(
                &text_arg(arguments, "start_time")?,
                &text_arg(arguments, "end_time")?,
            )?;
            let alarms = self.store.intrusions_between(&range)?;
            let events = thin_by_gap(alarms, EVENT_SEPARATION, |alarm| alarm.alarm_time)
                .into_iter()
                .map(|alarm| IntrusionEvent {
                    alarm_time: alarm.alarm_time,
                    id: alarm.id,
                })
                .collect();
            Ok(QueryRecord::generate(QueryPayload::intrusion_events(events)))
        })
    }
}

pub struct IntrusionImagesTool {
    store: Arc<SqliteMonitoringStore>,
}

impl IntrusionImagesTool {
    pub fn new(store: Arc<SqliteMonitoringStore>) -> Self {
        Self { store }
    }
}

impl Tool for IntrusionImagesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            INTRUSION_IMAGES_QUERY,
            "Up to five images of one intrusion event. Prefer this when only one event id is needed.",
            ArgumentSchema::new().required("id", ArgKind::Integer, "intrusion event id"),
        )
    }

    fn invoke<'a>(
        &'a self,
        arguments: &'a ToolArguments,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<QueryRecord, ToolError>> {
        Box::pin(async move {
            let id = integer_arg(arguments, "id")?;
            let alarms = match self.store.intrusion_followers(id, IMAGE_WINDOW) {
                Ok(alarms) => alarms,
                Err(error) if error.kind == StoreErrorKind::NotFound => Vec::new(),
                Err(error) => return Err(error.into()),
            };

            let burst = leading_burst(alarms, EVENT_SEPARATION, |alarm| alarm.alarm_time);
            let images = five_point_sample(burst)
                .into_iter()
                .map(|alarm| IntrusionImage {
                    alarm_time: alarm.alarm_time,
                    url: alarm.url,
                })
                .collect();
            Ok(QueryRecord::generate(QueryPayload::intrusion_images(images)))
        })
    }
}

pub struct MultiIntrusionImagesTool {
    store: Arc<SqliteMonitoringStore>,
}

impl MultiIntrusionImagesTool {
    pub fn new(store: Arc<SqliteMonitoringStore>) -> Self {
        Self { store }
    }
}

impl Tool for MultiIntrusionImagesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            MULTI_INTRUSION_IMAGES_QUERY,
            "One image per intrusion event for several event ids.",
            ArgumentSchema::new().required("ids", ArgKind::IdList, "intrusion event ids"),
        )
    }

    fn invoke<'a>(
        &'a self,
        arguments: &'a ToolArguments,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<QueryRecord, ToolError>> {
        Box::pin(async move {
            let ids = id_list_arg(arguments, "ids")?;
            let images = self
                .store
                .intrusions_by_ids(&ids)?
                .into_iter()
                .map(|alarm| IdentifiedIntrusionImage {
                    id: alarm.id,
                    alarm_time: alarm.alarm_time,
                    url: alarm.url,
                })
                .collect();
            Ok(QueryRecord::generate(QueryPayload::multiple_intrusion_images(images)))
        })
    }
}
