//! Runtime settings.
//!
//! Settings are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`playerwatch.toml` unless `--config` says otherwise)
//! 3. environment variables prefixed with `PLAYERWATCH_`
//!
//! ```toml
//! server_id = "bzy79l"
//! server_name = "Misty Mountain"
//! webhook_url = "https://discord.com/api/webhooks/..."
//! interval = "1h"
//! ```
//!
//! Durations are strings with a unit suffix (`ms`, `s`, `m`, `h`, `d`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::extract::{ExtractorConfig, DEFAULT_USER_AGENT};

/// Page listing a server's live details; `{}` is replaced by the server id.
const DEFAULT_TARGET_TEMPLATE: &str = "https://servers.redm.gg/servers/detail/{}";

/// Settings as read from the file and environment.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub server_id: String,
    pub target_url: Option<String>,
    pub server_name: String,
    pub webhook_url: Option<String>,
    pub webdriver_url: String,
    pub stats_file: PathBuf,
    pub interval: String,
    pub wait_timeout: String,
    pub cycle_timeout: String,
    pub delivery_timeout: String,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_id: "bzy79l".to_string(),
            target_url: None,
            server_name: "Game server".to_string(),
            webhook_url: None,
            webdriver_url: "http://localhost:4444".to_string(),
            stats_file: PathBuf::from("stats_db.json"),
            interval: "1h".to_string(),
            wait_timeout: "20s".to_string(),
            cycle_timeout: "2m".to_string(),
            delivery_timeout: "10s".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (if it exists) and the environment.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("PLAYERWATCH"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Page the player count is read from.
    pub fn target_url(&self) -> String {
        match &self.target_url {
            Some(url) => url.clone(),
            None => DEFAULT_TARGET_TEMPLATE.replace("{}", &self.server_id),
        }
    }

    /// The configured webhook URL, unless blank.
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    pub fn interval(&self) -> Result<Duration> {
        let interval = parse_setting("interval", &self.interval)?;
        anyhow::ensure!(!interval.is_zero(), "interval must be greater than zero");
        Ok(interval)
    }

    pub fn cycle_timeout(&self) -> Result<Duration> {
        let timeout = parse_setting("cycle_timeout", &self.cycle_timeout)?;
        anyhow::ensure!(!timeout.is_zero(), "cycle_timeout must be greater than zero");
        Ok(timeout)
    }

    pub fn delivery_timeout(&self) -> Result<Duration> {
        parse_setting("delivery_timeout", &self.delivery_timeout)
    }

    /// Extraction settings with the default page locators.
    pub fn extractor_config(&self) -> Result<ExtractorConfig> {
        Ok(ExtractorConfig {
            wait_timeout: parse_setting("wait_timeout", &self.wait_timeout)?,
            ..ExtractorConfig::default()
        })
    }
}

fn parse_setting(name: &str, value: &str) -> Result<Duration> {
    parse_duration(value).with_context(|| format!("Invalid duration for `{}`", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(
            settings.target_url(),
            "https://servers.redm.gg/servers/detail/bzy79l"
        );
        assert_eq!(settings.interval().unwrap(), Duration::from_secs(3_600));
        assert_eq!(settings.extractor_config().unwrap().wait_timeout, Duration::from_secs(20));
        assert_eq!(settings.cycle_timeout().unwrap(), Duration::from_secs(120));
        assert!(settings.webhook_url().is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/playerwatch.toml")).unwrap();
        assert_eq!(settings.server_id, Settings::default().server_id);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server_id = "abc123"
server_name = "Misty Mountain"
webhook_url = "https://discord.com/api/webhooks/1/token"
interval = "30m"
stats_file = "/var/lib/playerwatch/stats.json"
"#
        )
        .unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.server_name, "Misty Mountain");
        assert_eq!(settings.target_url(), "https://servers.redm.gg/servers/detail/abc123");
        assert_eq!(settings.interval().unwrap(), Duration::from_secs(1_800));
        assert_eq!(settings.stats_file, PathBuf::from("/var/lib/playerwatch/stats.json"));
        assert_eq!(
            settings.webhook_url(),
            Some("https://discord.com/api/webhooks/1/token")
        );
        // Untouched keys keep their defaults
        assert_eq!(settings.webdriver_url, "http://localhost:4444");
    }

    #[test]
    fn test_explicit_target_url_wins() {
        let settings = Settings {
            target_url: Some("http://localhost:8080/page".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.target_url(), "http://localhost:8080/page");
    }

    #[test]
    fn test_blank_webhook_is_unset() {
        let settings = Settings {
            webhook_url: Some("   ".to_string()),
            ..Settings::default()
        };
        assert!(settings.webhook_url().is_none());
    }

    #[test]
    fn test_invalid_durations() {
        let settings = Settings {
            interval: "hourly".to_string(),
            ..Settings::default()
        };
        let err = settings.interval().unwrap_err();
        assert!(format!("{:#}", err).contains("interval"));

        let zero = Settings {
            interval: "0s".to_string(),
            ..Settings::default()
        };
        assert!(zero.interval().is_err());

        let zero_timeout = Settings {
            cycle_timeout: "0s".to_string(),
            ..Settings::default()
        };
        let err = zero_timeout.cycle_timeout().unwrap_err();
        assert!(err.to_string().contains("cycle_timeout"));
    }
}
