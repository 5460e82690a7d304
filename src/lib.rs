//! # playerwatch
//!
//! Watches a game server's live player count and posts rolling statistics
//! to a webhook.
//!
//! The count is only visible on a JavaScript-rendered page, so it is read
//! through a headless browser driven over WebDriver. Every observation is
//! appended to a JSON-backed log, and each cycle reports the current count
//! together with the 24 hour, 7 day and 30 day average, maximum and minimum.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Scheduler                           │
//! │  ┌───────────┐    ┌────────────┐    ┌───────┐    ┌────────┐  │
//! │  │ extract   │───▶│ data::store│───▶│ stats │───▶│ notify │  │
//! │  │ (browser) │    │  (sample)  │    │       │    │ (sink) │  │
//! │  └───────────┘    └────────────┘    └───────┘    └────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`extract`]**: [`Extractor`] over a [`Session`] trait, with a
//!   WebDriver implementation; never fails, degrades to 0
//! - **[`data`]**: [`TimeSeriesStore`] and the statistics engine
//! - **[`notify`]**: [`NotificationSink`] trait with webhook and log sinks
//! - **[`scheduler`]**: the cycle and its timer
//! - **[`config`]**: layered settings (file, environment)
//!
//! ## Usage
//!
//! ```bash
//! chromedriver --port=4444 &
//! PLAYERWATCH_WEBHOOK_URL=https://discord.com/api/webhooks/... playerwatch
//! ```
//!
//! ## As a library
//!
//! ```no_run
//! use playerwatch::{
//!     Extractor, ExtractorConfig, LogSink, Scheduler, SchedulerConfig, TimeSeriesStore,
//!     WebDriverLauncher,
//! };
//!
//! # tokio_test::block_on(async {
//! let launcher = WebDriverLauncher::builder().build();
//! let extractor = Extractor::new(Box::new(launcher), ExtractorConfig::default());
//! let store = TimeSeriesStore::load("stats_db.json");
//!
//! let mut scheduler = Scheduler::new(
//!     extractor,
//!     store,
//!     Box::new(LogSink),
//!     "https://servers.redm.gg/servers/detail/bzy79l",
//!     "Misty Mountain",
//!     SchedulerConfig::default(),
//! );
//!
//! let report = scheduler.run_cycle().await;
//! println!("{} players", report.current);
//! scheduler.shutdown().await;
//! # });
//! ```

pub mod config;
pub mod data;
pub mod extract;
pub mod notify;
pub mod scheduler;

// Re-export main types for convenience
pub use config::Settings;
pub use data::{summarize, summarize_windows, StoreError, TimeSeriesStore};
pub use extract::{
    ExtractError, Extractor, ExtractorConfig, Session, SessionFactory, WebDriverLauncher,
};
pub use notify::{LogSink, NotificationSink, NotifyError, WebhookSink};
pub use playerwatch_types::{Report, Sample, StatsResult, Window, WindowStats};
pub use scheduler::{Scheduler, SchedulerConfig};
