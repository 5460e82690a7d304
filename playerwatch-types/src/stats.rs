//! Aggregate statistics for one window.

use core::fmt;

/// Average, maximum and minimum of the samples in one window.
///
/// An empty window is represented by all-zero fields rather than an
/// error, so a report can always be produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsResult {
    /// Arithmetic mean, rounded to one decimal place.
    pub average: f64,
    /// Largest value in the window.
    pub maximum: u64,
    /// Smallest value in the window.
    pub minimum: u64,
}

impl StatsResult {
    /// Create a result from already computed fields.
    pub const fn new(average: f64, maximum: u64, minimum: u64) -> Self {
        Self {
            average,
            maximum,
            minimum,
        }
    }

    /// The all-zero result used for empty windows.
    pub const fn zero() -> Self {
        Self::new(0.0, 0, 0)
    }
}

/// Renders the three fields on separate lines, as shown in a report field:
///
/// ```text
/// Average: 25.0
/// Maximum: 30
/// Minimum: 20
/// ```
impl fmt::Display for StatsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Average: {:.1}\nMaximum: {}\nMinimum: {}",
            self.average, self.maximum, self.minimum
        )
    }
}
