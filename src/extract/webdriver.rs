//! WebDriver-backed browser sessions.
//!
//! Talks to a WebDriver server (typically chromedriver on port 4444) and
//! drives a headless Chrome configured for containers: no sandbox, no
//! `/dev/shm`, no GPU.

use std::time::Duration;

use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;

use super::{ExtractError, Session, SessionFactory, DEFAULT_USER_AGENT};

/// Creates headless Chrome sessions through a WebDriver server.
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    webdriver_url: String,
    user_agent: String,
    window_size: (u32, u32),
}

impl WebDriverLauncher {
    /// Create a new builder for configuring the launcher.
    pub fn builder() -> WebDriverLauncherBuilder {
        WebDriverLauncherBuilder::default()
    }

    /// Chrome command line for a session.
    fn chrome_args(&self) -> Vec<String> {
        let (width, height) = self.window_size;
        vec![
            "--headless=new".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            format!("--window-size={},{}", width, height),
            format!("--user-agent={}", self.user_agent),
        ]
    }

    fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let caps = json!({
            "browserName": "chrome",
            "goog:chromeOptions": { "args": self.chrome_args() },
        });
        match caps {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        }
    }
}

#[async_trait]
impl SessionFactory for WebDriverLauncher {
    async fn create(&self) -> Result<Box<dyn Session>, ExtractError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        let client = builder.connect(&self.webdriver_url).await?;
        Ok(Box::new(WebDriverSession { client }))
    }
}

/// Builder for WebDriverLauncher.
#[derive(Debug, Default)]
pub struct WebDriverLauncherBuilder {
    webdriver_url: Option<String>,
    user_agent: Option<String>,
    window_size: Option<(u32, u32)>,
}

impl WebDriverLauncherBuilder {
    /// Set the WebDriver server URL (default: "http://localhost:4444").
    pub fn webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = Some(url.into());
        self
    }

    /// Set the browser's user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the viewport size (default: 1920x1080).
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = Some((width, height));
        self
    }

    /// Build the launcher.
    pub fn build(self) -> WebDriverLauncher {
        WebDriverLauncher {
            webdriver_url: self
                .webdriver_url
                .unwrap_or_else(|| "http://localhost:4444".to_string()),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            window_size: self.window_size.unwrap_or((1920, 1080)),
        }
    }
}

/// A live WebDriver session.
pub struct WebDriverSession {
    client: Client,
}

impl std::fmt::Debug for WebDriverSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDriverSession").finish_non_exhaustive()
    }
}

// Attach the locator to timeouts and misses so logs say what was missing
fn locate_error(selector: &str, err: CmdError) -> ExtractError {
    if matches!(err, CmdError::WaitTimeout) {
        ExtractError::Timeout(selector.to_string())
    } else if err.is_no_such_element() {
        ExtractError::MissingElement(selector.to_string())
    } else {
        err.into()
    }
}

#[async_trait]
impl Session for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), ExtractError> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), ExtractError> {
        self.client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
            .map_err(|e| locate_error(selector, e))?;
        Ok(())
    }

    async fn read_text(&mut self, selector: &str) -> Result<String, ExtractError> {
        let element = self
            .client
            .find(Locator::Css(selector))
            .await
            .map_err(|e| locate_error(selector, e))?;
        Ok(element.text().await?)
    }

    async fn destroy(&mut self) -> Result<(), ExtractError> {
        self.client.clone().close().await?;
        Ok(())
    }
}
