//! Player count extraction from a rendered web page.
//!
//! The page only renders its content in a real browser, so extraction goes
//! through a long-lived [`Session`] on a headless browser. Sessions crash,
//! detach and time out; the [`Extractor`] hides all of that behind
//! [`Extractor::measure`], which always returns a number and recreates the
//! session on the next call after any failure.
//!
//! ```text
//! measure(url)
//!    │
//!    ├── no session? ──▶ SessionFactory::create() ──(fails)──▶ 0
//!    │
//!    ├── navigate ─▶ wait(ready) ─▶ wait(marker) ─▶ read_text(count)
//!    │                         │
//!    │                     (any error) ──▶ destroy session ──▶ 0
//!    ▼
//! first run of digits, or 0
//! ```

mod error;
mod webdriver;

pub use error::ExtractError;
pub use webdriver::{WebDriverLauncher, WebDriverSession};

use std::fmt::Debug;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, warn};

/// Desktop Chrome identity; the target site gates rendering on the user agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.212 Safari/537.36";

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern is a valid regex"));

/// A live handle to the rendering engine.
///
/// Implemented by [`WebDriverSession`] in production and by scripted mocks
/// in tests.
#[async_trait]
pub trait Session: Send + Debug {
    /// Load `url` in the session.
    async fn navigate(&mut self, url: &str) -> Result<(), ExtractError>;

    /// Wait until an element matching the CSS `selector` is present.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), ExtractError>;

    /// Text content of the first element matching the CSS `selector`.
    async fn read_text(&mut self, selector: &str) -> Result<String, ExtractError>;

    /// Release the session. Best effort; the session is unusable afterwards.
    async fn destroy(&mut self) -> Result<(), ExtractError>;
}

/// Creates [`Session`]s.
#[async_trait]
pub trait SessionFactory: Send + Sync + Debug {
    async fn create(&self) -> Result<Box<dyn Session>, ExtractError>;
}

/// Where the count lives on the page and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Bound for each wait step.
    pub wait_timeout: Duration,
    /// Present once the page has started rendering.
    pub ready_selector: String,
    /// Icon element rendered next to the count.
    pub marker_selector: String,
    /// Element whose text contains the count.
    pub count_selector: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(20),
            ready_selector: "body".to_string(),
            marker_selector: "div.connect-bar div.right span.material-icons-outlined".to_string(),
            count_selector: "div.connect-bar div.right".to_string(),
        }
    }
}

/// Measures the player count through a self-healing browser session.
#[derive(Debug)]
pub struct Extractor {
    factory: Box<dyn SessionFactory>,
    config: ExtractorConfig,
    session: Option<Box<dyn Session>>,
}

impl Extractor {
    /// Create an extractor. No session is opened until the first measurement.
    pub fn new(factory: Box<dyn SessionFactory>, config: ExtractorConfig) -> Self {
        Self {
            factory,
            config,
            session: None,
        }
    }

    /// Whether a session is currently live.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Current count shown at `url`.
    ///
    /// Never fails: any problem is logged, yields 0, and leaves the
    /// extractor without a session so the next call starts a fresh one.
    pub async fn measure(&mut self, url: &str) -> u64 {
        let mut session = match self.session.take() {
            Some(session) => session,
            None => match self.factory.create().await {
                Ok(session) => {
                    info!("Browser session created");
                    session
                }
                Err(e) => {
                    warn!(error = %e, "Could not create browser session");
                    return 0;
                }
            },
        };

        match read_count(&self.config, session.as_mut(), url).await {
            Ok(count) => {
                self.session = Some(session);
                count
            }
            Err(e) => {
                warn!(error = %e, url, "Extraction failed, session will be recreated");
                if let Err(e) = session.destroy().await {
                    debug!(error = %e, "Failed to destroy broken session");
                }
                0
            }
        }
    }

    /// Drop the current session without a clean shutdown.
    ///
    /// Used when a measurement was abandoned midway and the session state
    /// is unknown.
    pub fn discard_session(&mut self) {
        if self.session.take().is_some() {
            debug!("Discarded browser session");
        }
    }

    /// Release the current session, if any.
    pub async fn shutdown(&mut self) {
        if let Some(mut session) = self.session.take() {
            match session.destroy().await {
                Ok(()) => info!("Browser session closed"),
                Err(e) => warn!(error = %e, "Failed to close browser session"),
            }
        }
    }
}

async fn read_count(
    config: &ExtractorConfig,
    session: &mut dyn Session,
    url: &str,
) -> Result<u64, ExtractError> {
    let timeout = config.wait_timeout;

    session.navigate(url).await?;
    session.wait_for(&config.ready_selector, timeout).await?;
    session.wait_for(&config.marker_selector, timeout).await?;

    let text = session.read_text(&config.count_selector).await?;
    let count = parse_count(&text);
    debug!(text = %text.trim(), count, "Read player count");
    Ok(count)
}

/// First run of decimal digits in `text`, or 0 if there is none.
pub fn parse_count(text: &str) -> u64 {
    DIGITS
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
