//! Report - what a cycle hands to the notification sink.

use chrono::{DateTime, Utc};

use crate::{StatsResult, Window};

/// Statistics for one window, as carried in a report.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowStats {
    pub window: Window,
    pub stats: StatsResult,
}

impl WindowStats {
    pub const fn new(window: Window, stats: StatsResult) -> Self {
        Self { window, stats }
    }
}

/// A formatted-ready summary of one cycle.
///
/// Sinks decide how to render it; [`Report::title`] and
/// [`Report::description`] provide the canonical wording.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    /// Display name of the monitored server.
    pub server_name: String,
    /// Count observed in this cycle.
    pub current: u64,
    /// When the count was observed.
    pub timestamp: DateTime<Utc>,
    /// Per-window statistics, in [`Window::ALL`] order.
    pub windows: Vec<WindowStats>,
}

impl Report {
    /// Create a report with no window statistics yet.
    pub fn new(server_name: impl Into<String>, current: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            server_name: server_name.into(),
            current,
            timestamp,
            windows: Vec::with_capacity(Window::ALL.len()),
        }
    }

    /// Append statistics for a window.
    pub fn with_window(mut self, stats: WindowStats) -> Self {
        self.windows.push(stats);
        self
    }

    /// Report heading.
    pub fn title(&self) -> String {
        format!("{} - Current player count", self.server_name)
    }

    /// One-line summary of the current count.
    pub fn description(&self) -> String {
        format!("**{}** players online", self.current)
    }

    /// Statistics for a specific window, if present.
    pub fn get(&self, window: Window) -> Option<&StatsResult> {
        self.windows
            .iter()
            .find(|w| w.window == window)
            .map(|w| &w.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_description() {
        let report = Report::new("Misty Mountain", 17, Utc::now());
        assert_eq!(report.title(), "Misty Mountain - Current player count");
        assert_eq!(report.description(), "**17** players online");
    }

    #[test]
    fn test_get_window() {
        let report = Report::new("srv", 0, Utc::now())
            .with_window(WindowStats::new(Window::Day, StatsResult::new(1.5, 2, 1)))
            .with_window(WindowStats::new(Window::Week, StatsResult::zero()));

        assert_eq!(report.get(Window::Day).unwrap().maximum, 2);
        assert_eq!(report.get(Window::Week), Some(&StatsResult::zero()));
        assert!(report.get(Window::Month).is_none());
    }
}
