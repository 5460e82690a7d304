//! Notification sinks for cycle reports.
//!
//! A sink receives one [`Report`] per cycle. Delivery problems come back as
//! a [`NotifyError`]; the scheduler logs them and carries on.
//!
//! - [`WebhookSink`]: posts a Discord-style embed to a webhook URL
//! - [`LogSink`]: writes the report to the log (dry runs)

mod error;
mod log;
mod webhook;

pub use error::NotifyError;
pub use log::LogSink;
pub use webhook::{WebhookSink, WebhookSinkBuilder};

use std::fmt::Debug;

use async_trait::async_trait;
use playerwatch_types::Report;

/// Destination for cycle reports.
#[async_trait]
pub trait NotificationSink: Send + Sync + Debug {
    /// Deliver a report.
    async fn deliver(&self, report: &Report) -> Result<(), NotifyError>;

    /// Returns a human-readable description of the sink, for logs.
    fn description(&self) -> &str;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every report; optionally fails or hangs on each delivery.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSink {
        pub reports: Arc<Mutex<Vec<Report>>>,
        pub fail: bool,
        pub hang: bool,
    }

    impl RecordingSink {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn hanging() -> Self {
            Self {
                hang: true,
                ..Self::default()
            }
        }

        pub fn delivered(&self) -> Vec<Report> {
            self.reports.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn deliver(&self, report: &Report) -> Result<(), NotifyError> {
            self.reports.lock().unwrap().push(report.clone());
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail {
                return Err(NotifyError::Connection("connection refused".to_string()));
            }
            Ok(())
        }

        fn description(&self) -> &str {
            "recording"
        }
    }
}
