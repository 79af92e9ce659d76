//! Tracing and metrics hooks for provider calls, tool execution and the query loop.
//!
//! ```rust
//! use vobserve::{MetricsObservabilityHooks, SafeLoopHooks, TracingObservabilityHooks};
//!
//! let _loop_hooks = SafeLoopHooks::new(TracingObservabilityHooks);
//! let _metrics = MetricsObservabilityHooks;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeLoopHooks, SafeProviderHooks, SafeToolHooks};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeLoopHooks, SafeProviderHooks, SafeToolHooks,
        TracingObservabilityHooks,
    };
}

#[cfg(test)]
mod tests;
