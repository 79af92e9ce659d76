//! Monitoring data source for the vigil query agent.
//!
//! A SQLite store holds passenger flow, intrusion and leave-post alarms; six tools expose
//! it to the query loop and return tagged `QueryRecord`s.

mod error;
mod range;
mod sampling;
mod store;
mod tools;

pub mod prelude {
    pub use crate::{
        SqliteMonitoringStore, StoreError, StoreErrorKind, TimeRange, monitoring_tools,
        register_monitoring_tools,
    };
}

pub use error::{StoreError, StoreErrorKind};
pub use range::{MAX_SEGMENTS, RANGE_SEPARATOR, TimeRange};
pub use sampling::{five_point_sample, leading_burst, thin_by_gap};
pub use store::{IntrusionAlarm, LeavePostAlarm, SqliteMonitoringStore};
pub use tools::{
    FLOW_DISTRIBUTION, FLOW_QUERY, FlowDistributionTool, FlowQueryTool, INTRUSION_EVENTS_QUERY,
    INTRUSION_IMAGES_QUERY, IntrusionEventsTool, IntrusionImagesTool, LEAVE_RECORDS_QUERY,
    LeaveRecordsTool, MULTI_INTRUSION_IMAGES_QUERY, MultiIntrusionImagesTool, monitoring_tools,
    register_monitoring_tools,
};
