//! Logging facilities for swipedeck.
//!
//! swipedeck uses the `tracing` crate for instrumentation. Install a
//! subscriber in the host application to see output:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("swipedeck=debug,swipedeck_core=trace")
//!     .init();
//! ```
//!
//! Every silent no-op in the deck (disabled direction, missing card handle,
//! nothing to undo) is logged at `trace` level with its reason, so filtering
//! on the targets below explains why a swipe did nothing.

/// Target names for log filtering.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "swipedeck_core::signal";
    /// Host dispatch target.
    pub const DISPATCH: &str = "swipedeck_core::dispatch";
    /// Performance spans target.
    pub const PERF: &str = "swipedeck::perf";
}

/// RAII guard for a performance span.
///
/// The span is entered on creation and exited when the guard drops.
///
/// ```
/// use swipedeck_core::logging::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("reconcile_window");
///     // measured work
/// }
/// ```
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

impl std::fmt::Debug for PerfSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerfSpan").finish_non_exhaustive()
    }
}
