//! Sample storage and statistics.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "1h", "20s")
//! - [`stats`]: The statistics engine ([`summarize`], [`summarize_windows`])
//! - [`store`]: The file-backed series log ([`TimeSeriesStore`])
//!
//! ## Data Flow
//!
//! ```text
//! Sample (one per cycle)
//!        │
//!        ▼
//! TimeSeriesStore::append()
//!        │
//!        ├──▶ windowed(24h | 7d | 30d) ──▶ summarize() ──▶ StatsResult
//!        │
//!        └──▶ save() then prune(30d)
//! ```

pub mod duration;
pub mod stats;
pub mod store;

pub use stats::{summarize, summarize_windows};
pub use store::{StoreError, TimeSeriesStore};
