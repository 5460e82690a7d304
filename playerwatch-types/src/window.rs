//! Trailing time windows used for aggregation.

use core::fmt;

use chrono::TimeDelta;

/// A trailing window over which samples are aggregated.
///
/// Windows are derived views and never persisted; each cycle recomputes
/// every window from the series log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Window {
    /// The last 24 hours.
    Day,
    /// The last 7 days.
    Week,
    /// The last 30 days.
    Month,
}

impl Window {
    /// All windows, shortest first. This is also the report order.
    pub const ALL: [Window; 3] = [Window::Day, Window::Week, Window::Month];

    /// Length of the window.
    pub fn duration(&self) -> TimeDelta {
        match self {
            Window::Day => TimeDelta::hours(24),
            Window::Week => TimeDelta::days(7),
            Window::Month => TimeDelta::days(30),
        }
    }

    /// Short key, e.g. `24h`.
    pub fn key(&self) -> &'static str {
        match self {
            Window::Day => "24h",
            Window::Week => "7d",
            Window::Month => "30d",
        }
    }

    /// Human-readable label used as a report field name.
    pub fn label(&self) -> &'static str {
        match self {
            Window::Day => "24 Hours",
            Window::Week => "7 Days",
            Window::Month => "30 Days",
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(Window::Day.duration().num_seconds(), 86_400);
        assert_eq!(Window::Week.duration().num_seconds(), 604_800);
        assert_eq!(Window::Month.duration().num_seconds(), 2_592_000);
    }

    #[test]
    fn test_all_is_ordered_shortest_first() {
        let durations: Vec<_> = Window::ALL.iter().map(|w| w.duration()).collect();
        assert!(durations.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_display_uses_key() {
        assert_eq!(Window::Week.to_string(), "7d");
        assert_eq!(Window::Month.label(), "30 Days");
    }
}
