//! The measurement cycle and the timer that drives it.
//!
//! ```text
//!            start
//!              │ run one cycle immediately
//!              ▼
//!   ┌──────▶ Idle ──tick──▶ Running ──┐
//!   │                                 │
//!   └─────────────────────────────────┘
//!              │ shutdown signal
//!              ▼
//!   release session, flush store
//! ```
//!
//! One cycle: measure, append, summarize, deliver, save, prune. At most one
//! cycle is in flight, so the scheduler owns its extractor, store and sink
//! outright.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use playerwatch_types::{retention, Report, Sample};

use crate::data::duration::format_duration;
use crate::data::{summarize_windows, TimeSeriesStore};
use crate::extract::Extractor;
use crate::notify::{NotificationSink, NotifyError};

/// Timing for the periodic loop.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Period between cycle starts.
    pub interval: Duration,
    /// A cycle still running after this long is abandoned.
    pub cycle_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3_600),
            cycle_timeout: Duration::from_secs(120),
        }
    }
}

/// Drives measurement cycles on a fixed interval.
#[derive(Debug)]
pub struct Scheduler {
    extractor: Extractor,
    store: TimeSeriesStore,
    sink: Box<dyn NotificationSink>,
    target_url: String,
    server_name: String,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(
        extractor: Extractor,
        store: TimeSeriesStore,
        sink: Box<dyn NotificationSink>,
        target_url: impl Into<String>,
        server_name: impl Into<String>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            extractor,
            store,
            sink,
            target_url: target_url.into(),
            server_name: server_name.into(),
            config,
        }
    }

    /// The series log.
    pub fn store(&self) -> &TimeSeriesStore {
        &self.store
    }

    /// Run one full cycle and return the report that was handed to the sink.
    ///
    /// Delivery and save failures are logged, not returned: a failed
    /// delivery must not stop the history from being persisted.
    pub async fn run_cycle(&mut self) -> Report {
        let count = self.extractor.measure(&self.target_url).await;
        self.complete_cycle(count, None).await
    }

    /// Run one cycle bounded by the cycle timeout.
    ///
    /// Returns `None` if the measurement overran and the cycle was
    /// abandoned; nothing is recorded and the browser session is dropped
    /// since its state is unknown. If only delivery overruns, it counts as
    /// a failed delivery and the sample is still saved.
    pub async fn tick(&mut self) -> Option<Report> {
        let timeout = self.config.cycle_timeout;
        let deadline = Instant::now() + timeout;

        let measured =
            tokio::time::timeout_at(deadline, self.extractor.measure(&self.target_url)).await;
        match measured {
            Ok(count) => Some(self.complete_cycle(count, Some(deadline)).await),
            Err(_) => {
                error!(timeout = %format_duration(timeout), "Measurement timed out, abandoning cycle");
                self.extractor.discard_session();
                None
            }
        }
    }

    async fn complete_cycle(&mut self, count: u64, deadline: Option<Instant>) -> Report {
        let now = Utc::now();
        self.store.append(Sample::new(now, count));

        let report = summarize_windows(&self.store, now)
            .into_iter()
            .fold(Report::new(self.server_name.as_str(), count, now), Report::with_window);

        let delivery = self.sink.deliver(&report);
        let delivered = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, delivery)
                .await
                .unwrap_or(Err(NotifyError::Timeout)),
            None => delivery.await,
        };
        if let Err(e) = delivered {
            warn!(sink = self.sink.description(), error = %e, "Failed to deliver report");
        }

        if let Err(e) = self.store.save() {
            error!(path = %self.store.path().display(), error = %e, "Failed to save stats");
        }
        self.store.prune_at(retention(), now);

        info!(players = count, samples = self.store.len(), "Cycle complete");
        report
    }

    /// Run until `shutdown` flips to `true`.
    ///
    /// The first cycle runs immediately; later cycles start every
    /// `interval`. Overrunning cycles are not caught up: the next one
    /// starts right after. A running cycle is never interrupted by the
    /// shutdown signal, only by its own timeout.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let interval = self.config.interval;
        info!(
            url = %self.target_url,
            sink = self.sink.description(),
            interval = %format_duration(interval),
            "Scheduler starting"
        );

        if !*shutdown.borrow() {
            self.tick().await;
        }

        let mut timer = tokio::time::interval_at(Instant::now() + interval, interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !*shutdown.borrow() {
            tokio::select! {
                _ = timer.tick() => {
                    debug!("Tick");
                    self.tick().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        // Sender gone, nobody can ask us to stop any more
                        warn!("Shutdown channel closed, stopping");
                        break;
                    }
                }
            }
        }

        self.shutdown().await;
    }

    /// Release the browser session and flush the series log.
    pub async fn shutdown(&mut self) {
        info!("Scheduler stopping");
        self.extractor.shutdown().await;
        if let Err(e) = self.store.save() {
            error!(path = %self.store.path().display(), error = %e, "Failed to flush stats on shutdown");
        }
    }
}
