//! Log-only sink.

use async_trait::async_trait;
use tracing::info;

use playerwatch_types::Report;

use super::{NotificationSink, NotifyError};

/// Writes reports to the log instead of delivering them anywhere.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, report: &Report) -> Result<(), NotifyError> {
        info!(title = %report.title(), players = report.current, timestamp = %report.timestamp, "Report");
        for entry in &report.windows {
            info!(
                window = %entry.window,
                average = entry.stats.average,
                maximum = entry.stats.maximum,
                minimum = entry.stats.minimum,
                "Window stats"
            );
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "log"
    }
}
