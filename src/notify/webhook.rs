//! Discord-compatible webhook sink.
//!
//! Each report becomes a single embed:
//!
//! ```json
//! {"embeds": [{
//!     "title": "Misty Mountain - Current player count",
//!     "description": "**42** players online",
//!     "color": 3447003,
//!     "timestamp": "2024-05-01T18:00:00Z",
//!     "fields": [{"name": "24 Hours", "value": "Average: 38.5\nMaximum: 51\nMinimum: 12", "inline": true}]
//! }]}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use playerwatch_types::Report;

use super::{NotificationSink, NotifyError};

/// Embed accent color (blue).
const EMBED_COLOR: u32 = 0x3498DB;

/// Longest response body kept in a rejection error.
const MAX_ERROR_BODY: usize = 200;

/// Posts reports to a webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: Client,
    url: String,
    description: String,
}

impl WebhookSink {
    /// Create a new builder for configuring the sink.
    pub fn builder() -> WebhookSinkBuilder {
        WebhookSinkBuilder::default()
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn deliver(&self, report: &Report) -> Result<(), NotifyError> {
        let payload = WebhookPayload::from_report(report);

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(NotifyError::RateLimited);
        }

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(floor_char_boundary(&body, MAX_ERROR_BODY));
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Webhook accepted report");
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for WebhookSink.
#[derive(Debug, Default)]
pub struct WebhookSinkBuilder {
    url: Option<String>,
    timeout: Option<Duration>,
}

impl WebhookSinkBuilder {
    /// Set the webhook URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the sink.
    pub fn build(self) -> Result<WebhookSink, NotifyError> {
        let url = self
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| NotifyError::Config("webhook URL is not set".to_string()))?;
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Config(e.to_string()))?;

        Ok(WebhookSink {
            client,
            description: format!("webhook: {}", redact(&url)),
            url,
        })
    }
}

// Webhook URLs embed their secret token in the path; keep only the host
fn redact(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => format!(
            "{}://{}/…",
            parsed.scheme(),
            parsed.host_str().unwrap_or("unknown")
        ),
        Err(_) => "<invalid url>".to_string(),
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

#[derive(Debug, Serialize)]
struct WebhookPayload {
    embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
struct Embed {
    title: String,
    description: String,
    color: u32,
    timestamp: String,
    fields: Vec<EmbedField>,
}

#[derive(Debug, Serialize)]
struct EmbedField {
    name: String,
    value: String,
    inline: bool,
}

impl WebhookPayload {
    fn from_report(report: &Report) -> Self {
        let fields = report
            .windows
            .iter()
            .map(|entry| EmbedField {
                name: entry.window.label().to_string(),
                value: entry.stats.to_string(),
                inline: true,
            })
            .collect();

        Self {
            embeds: vec![Embed {
                title: report.title(),
                description: report.description(),
                color: EMBED_COLOR,
                timestamp: report.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
                fields,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use playerwatch_types::{StatsResult, Window, WindowStats};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn report() -> Report {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
        Report::new("Misty Mountain", 42, ts)
            .with_window(WindowStats::new(Window::Day, StatsResult::new(25.0, 30, 20)))
            .with_window(WindowStats::new(Window::Week, StatsResult::zero()))
            .with_window(WindowStats::new(Window::Month, StatsResult::new(12.3, 51, 0)))
    }

    /// Accept one HTTP request, answer with `status`, and return the raw request.
    async fn serve_once(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/webhooks/1/secret", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower.strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if request.len() >= split + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!("HTTP/1.1 {}\r\ncontent-length: 4\r\nconnection: close\r\n\r\nnope", status_line);
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (url, handle)
    }

    #[test]
    fn test_payload_shape() {
        let payload = serde_json::to_value(WebhookPayload::from_report(&report())).unwrap();
        let embed = &payload["embeds"][0];

        assert_eq!(embed["title"], "Misty Mountain - Current player count");
        assert_eq!(embed["description"], "**42** players online");
        assert_eq!(embed["color"], 0x3498DB);
        assert_eq!(embed["timestamp"], "2024-05-01T18:00:00Z");

        let fields = embed["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0]["name"], "24 Hours");
        assert_eq!(fields[0]["value"], "Average: 25.0\nMaximum: 30\nMinimum: 20");
        assert_eq!(fields[1]["value"], "Average: 0.0\nMaximum: 0\nMinimum: 0");
        assert_eq!(fields[2]["inline"], true);
    }

    #[test]
    fn test_build_requires_url() {
        assert!(matches!(WebhookSink::builder().build(), Err(NotifyError::Config(_))));
        assert!(matches!(WebhookSink::builder().url("  ").build(), Err(NotifyError::Config(_))));
    }

    #[test]
    fn test_description_hides_token() {
        let sink = WebhookSink::builder()
            .url("https://discord.com/api/webhooks/123/very-secret")
            .build()
            .unwrap();
        assert_eq!(sink.description(), "webhook: https://discord.com/…");
    }

    #[test]
    fn test_floor_char_boundary() {
        assert_eq!(floor_char_boundary("abc", 10), 3);
        assert_eq!(floor_char_boundary("aé", 2), 1);
    }

    #[tokio::test]
    async fn test_deliver_posts_json() {
        let (url, server) = serve_once("200 OK").await;
        let sink = WebhookSink::builder().url(url).build().unwrap();

        sink.deliver(&report()).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/webhooks/1/secret"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.contains("**42** players online"));
    }

    #[tokio::test]
    async fn test_deliver_maps_rate_limit() {
        let (url, server) = serve_once("429 Too Many Requests").await;
        let sink = WebhookSink::builder().url(url).build().unwrap();

        assert!(matches!(sink.deliver(&report()).await, Err(NotifyError::RateLimited)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_deliver_maps_rejection() {
        let (url, server) = serve_once("400 Bad Request").await;
        let sink = WebhookSink::builder().url(url).build().unwrap();

        match sink.deliver(&report()).await {
            Err(NotifyError::Rejected { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "nope");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_deliver_connection_refused() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = WebhookSink::builder()
            .url(format!("http://{}/hook", addr))
            .build()
            .unwrap();
        assert!(sink.deliver(&report()).await.is_err());
    }
}
