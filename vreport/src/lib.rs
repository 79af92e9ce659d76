//! Query record model and the report substitution pass.
//!
//! ```rust
//! use vreport::{LeavePostRecord, QueryPayload, QueryRecord, substitute};
//!
//! let record = QueryRecord::new(
//!     "abc1",
//!     QueryPayload::leave_post_records(vec![LeavePostRecord {
//!         time_slot_start: "080000".to_string(),
//!         time_slot_end: "082000".to_string(),
//!         interval_time: None,
//!     }]),
//! );
//!
//! let report = substitute(&[record], "Leave-post summary:\n[abc1]");
//! assert!(report.contains("Duration: 0 hours 20 minutes 0 seconds"));
//! ```

mod error;
mod extract;
mod record;
mod render;
mod substitute;
pub mod time;

pub mod prelude {
    pub use crate::{
        QueryKind, QueryPayload, QueryRecord, ReportContext, ReportError, ReportErrorKind,
        extract_records, observation, render, substitute,
    };
}

pub use error::{ReportError, ReportErrorKind};
pub use extract::{RESULT_PREFIX, extract_records, observation};
pub use record::{
    FlowWindow, IdentifiedIntrusionImage, IntrusionEvent, IntrusionImage, LeavePostRecord,
    QueryKind, QueryPayload, QueryRecord,
};
pub use render::{Fragment, render};
pub use substitute::{ReportContext, not_found_marker, placeholder_ids, substitute};
