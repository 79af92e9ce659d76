use std::sync::Arc;

use vreport::{LeavePostRecord, QueryPayload, QueryRecord};
use vtooling::{
    ArgKind, ArgumentSchema, Tool, ToolArguments, ToolDefinition, ToolError,
    ToolExecutionContext, ToolFuture, text_arg,
};

use super::LEAVE_RECORDS_QUERY;
use crate::{SqliteMonitoringStore, TimeRange};

pub struct LeaveRecordsTool {
    store: Arc<SqliteMonitoringStore>,
}

impl LeaveRecordsTool {
    pub fn new(store: Arc<SqliteMonitoringStore>) -> Self {
        Self { store }
    }
}

impl Tool for LeaveRecordsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            LEAVE_RECORDS_QUERY,
            "Leave-post records (staff away from their post) within a time range.",
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
            let records = self
                .store
                .leave_posts_between(&range)?
                .into_iter()
                .map(|alarm| LeavePostRecord {
                    time_slot_start: alarm.time_slot_start,
                    time_slot_end: alarm.time_slot_end,
                    interval_time: alarm.interval_time.map(|minutes| minutes.to_string()),
                })
                .collect();
            Ok(QueryRecord::generate(QueryPayload::leave_post_records(records)))
        })
    }
}
