use std::sync::Arc;

use vreport::{FlowWindow, QueryPayload, QueryRecord};
use vtooling::{
    ArgKind, ArgumentSchema, Tool, ToolArguments, ToolDefinition, ToolError,
    ToolExecutionContext, ToolFuture, integer_arg, text_arg,
};

use super::{FLOW_DISTRIBUTION, FLOW_QUERY};
use crate::{SqliteMonitoringStore, StoreError, TimeRange};

const RANGE_FORMAT: &str = "'YYYY-MM-DD hh:mm:ss - YYYY-MM-DD hh:mm:ss'";

/// Sums passenger flow over one or more time ranges.
pub struct FlowQueryTool {
    store: Arc<SqliteMonitoringStore>,
}

impl FlowQueryTool {
    pub fn new(store: Arc<SqliteMonitoringStore>) -> Self {
        Self { store }
    }
}

impl Tool for FlowQueryTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            FLOW_QUERY,
            "Total passenger flow for each of several time ranges.",
            ArgumentSchema::new().required(
                "time_ranges",
                ArgKind::Text,
                format!("comma-separated ranges, each {RANGE_FORMAT}"),
            ),
        )
    }

    fn invoke<'a>(
        &'a self,
        arguments: &'a ToolArguments,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<QueryRecord, ToolError>> {
        Box::pin(async move {
            let ranges = TimeRange::parse_list(&text_arg(arguments, "time_ranges")?)?;
            let periods = flow_windows(&self.store, &ranges)?;
            Ok(QueryRecord::generate(QueryPayload::flow_statistics(periods)))
        })
    }
}

/// Splits one range into equal segments and sums passenger flow in each.
pub struct FlowDistributionTool {
    store: Arc<SqliteMonitoringStore>,
}

impl FlowDistributionTool {
    pub fn new(store: Arc<SqliteMonitoringStore>) -> Self {
        Self { store }
    }
}

impl Tool for FlowDistributionTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            FLOW_DISTRIBUTION,
            "Passenger flow per equal segment of one time range. Prefer flow_query for totals.",
            ArgumentSchema::new()
                .required("time_range", ArgKind::Text, format!("one range {RANGE_FORMAT}"))
                .required("num_segments", ArgKind::Integer, "number of segments, at least 1"),
        )
    }

    fn invoke<'a>(
        &'a self,
        arguments: &'a ToolArguments,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<QueryRecord, ToolError>> {
        Box::pin(async move {
            let range = TimeRange::parse(&text_arg(arguments, "time_range")?)?;
            let segments = range.split(integer_arg(arguments, "num_segments")?)?;
            let windows = flow_windows(&self.store, &segments)?;
            Ok(QueryRecord::generate(QueryPayload::flow_distribution(windows)))
        })
    }
}

fn flow_windows(
    store: &SqliteMonitoringStore,
    ranges: &[TimeRange],
) -> Result<Vec<FlowWindow>, StoreError> {
    ranges
        .iter()
        .map(|range| {
            Ok(FlowWindow {
                start_time: range.start,
                end_time: range.end,
                passenger_flow: store.passenger_flow_between(range)?,
            })
        })
        .collect()
}
