//! # playerwatch-types
//!
//! Core types shared by the playerwatch collector: the samples it records,
//! the trailing windows it aggregates over, the per-window statistics and the
//! report handed to a notification sink.
//!
//! ## Features
//!
//! - `serde`: JSON serialization of samples and the persisted stats file layout
//!
//! ## Example
//!
//! ```rust
//! use playerwatch_types::{Report, Sample, StatsResult, Window, WindowStats};
//!
//! let sample = Sample::now(42);
//!
//! let report = Report::new("Misty Mountain", sample.value, sample.timestamp)
//!     .with_window(WindowStats::new(Window::Day, StatsResult::new(38.5, 51, 12)));
//!
//! assert_eq!(report.windows.len(), 1);
//! assert_eq!(report.description(), "**42** players online");
//! ```

mod report;
mod sample;
mod stats;
mod window;

pub use report::*;
pub use sample::*;
pub use stats::*;
pub use window::*;

/// Maximum age of a sample kept in the series log.
///
/// Equal to the longest [`Window`], so every window can always be answered
/// from the log alone.
pub fn retention() -> chrono::TimeDelta {
    Window::Month.duration()
}
