//! The six monitoring query tools.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use vstore::{SqliteMonitoringStore, register_monitoring_tools};
//! use vtooling::ToolRegistry;
//!
//! let store = Arc::new(SqliteMonitoringStore::new_in_memory().expect("store should open"));
//! let mut registry = ToolRegistry::new();
//! register_monitoring_tools(&mut registry, store);
//!
//! assert_eq!(registry.len(), 6);
//! assert!(registry.contains("flow_query"));
//! ```

mod flow;
mod intrusion;
mod leave;

use std::sync::Arc;

use vtooling::{Tool, ToolRegistry};

use crate::SqliteMonitoringStore;

pub use flow::{FlowDistributionTool, FlowQueryTool};
pub use intrusion::{IntrusionEventsTool, IntrusionImagesTool, MultiIntrusionImagesTool};
pub use leave::LeaveRecordsTool;

pub const FLOW_QUERY: &str = "flow_query";
pub const FLOW_DISTRIBUTION: &str = "flow_distribution";
pub const INTRUSION_EVENTS_QUERY: &str = "intrusion_events_query";
pub const INTRUSION_IMAGES_QUERY: &str = "intrusion_images_query";
pub const MULTI_INTRUSION_IMAGES_QUERY: &str = "multi_intrusion_images_query";
pub const LEAVE_RECORDS_QUERY: &str = "leave_records_query";

pub fn monitoring_tools(store: Arc<SqliteMonitoringStore>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(FlowQueryTool::new(Arc::clone(&store))),
        Arc::new(FlowDistributionTool::new(Arc::clone(&store))),
        Arc::new(IntrusionEventsTool::new(Arc::clone(&store))),
        Arc::new(IntrusionImagesTool::new(Arc::clone(&store))),
        Arc::new(MultiIntrusionImagesTool::new(Arc::clone(&store))),
        Arc::new(LeaveRecordsTool::new(store)),
    ]
}

pub fn register_monitoring_tools(registry: &mut ToolRegistry, store: Arc<SqliteMonitoringStore>) {
    for tool in monitoring_tools(store) {
        registry.register_shared(tool);
    }
}
