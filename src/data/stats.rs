//! Window statistics over the series log.

use chrono::{DateTime, Utc};

use playerwatch_types::{StatsResult, Window, WindowStats};

use super::store::TimeSeriesStore;

/// Summarize a sequence of values.
///
/// Empty input gives all zeros. The average is rounded to one decimal
/// place, half away from zero (so `2.25` becomes `2.3`).
pub fn summarize(values: &[u64]) -> StatsResult {
    let (Some(&maximum), Some(&minimum)) = (values.iter().max(), values.iter().min()) else {
        return StatsResult::zero();
    };

    let sum: u128 = values.iter().map(|&v| v as u128).sum();
    let mean = sum as f64 / values.len() as f64;

    StatsResult::new(round_one_decimal(mean), maximum, minimum)
}

/// Statistics for every [`Window`], in report order.
pub fn summarize_windows(store: &TimeSeriesStore, now: DateTime<Utc>) -> Vec<WindowStats> {
    Window::ALL
        .iter()
        .map(|&window| {
            let values = store.windowed_at(window.duration(), now);
            WindowStats::new(window, summarize(&values))
        })
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
