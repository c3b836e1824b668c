//! Configuration module for feedrelay.

use serde::Deserialize;
use std::path::Path;

use crate::{RelayError, Result};

/// Feed source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// URL of the syndication feed to poll.
    #[serde(default)]
    pub url: String,
    /// Connection timeout in seconds.
    #[serde(default = "default_feed_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_feed_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_feed_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_feed_max_redirects")]
    pub max_redirects: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_feed_max_size")]
    pub max_feed_size_bytes: u64,
}

fn default_feed_connect_timeout() -> u64 {
    10
}

fn default_feed_read_timeout() -> u64 {
    20
}

fn default_feed_total_timeout() -> u64 {
    30
}

fn default_feed_max_redirects() -> usize {
    5
}

fn default_feed_max_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            connect_timeout_secs: default_feed_connect_timeout(),
            read_timeout_secs: default_feed_read_timeout(),
            total_timeout_secs: default_feed_total_timeout(),
            max_redirects: default_feed_max_redirects(),
            max_feed_size_bytes: default_feed_max_size(),
        }
    }
}

/// Webhook endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Webhook URL, including the access token as a query parameter.
    #[serde(default)]
    pub url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,
}

fn default_webhook_timeout() -> u64 {
    30
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_webhook_timeout(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "rss_feed.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Run mode for the reconciliation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Run one cycle and exit.
    Once,
    /// Run cycles forever on a fixed interval.
    Watch,
}

/// Reconciliation loop configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Run mode (once / watch).
    #[serde(default = "default_relay_mode")]
    pub mode: RunMode,
    /// Sleep between cycles in seconds (watch mode).
    #[serde(default = "default_relay_interval")]
    pub interval_secs: u64,
}

fn default_relay_mode() -> RunMode {
    RunMode::Once
}

fn default_relay_interval() -> u64 {
    600 // 10 minutes
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            mode: default_relay_mode(),
            interval_secs: default_relay_interval(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/feedrelay.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Feed source configuration.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Webhook endpoint configuration.
    #[serde(default)]
    pub webhook: WebhookConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Reconciliation loop configuration.
    #[serde(default)]
    pub relay: RelayConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RelayError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| RelayError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FEEDRELAY_FEED_URL`: Override the feed URL
    /// - `FEEDRELAY_WEBHOOK_URL`: Override the webhook URL (which carries
    ///   the access token, so this keeps it out of config.toml)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(feed_url) = std::env::var("FEEDRELAY_FEED_URL") {
            if !feed_url.is_empty() {
                self.feed.url = feed_url;
            }
        }
        if let Ok(webhook_url) = std::env::var("FEEDRELAY_WEBHOOK_URL") {
            if !webhook_url.is_empty() {
                self.webhook.url = webhook_url;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The feed URL or webhook URL is missing or not an http(s) URL
    /// - Watch mode is selected with a zero interval
    pub fn validate(&self) -> Result<()> {
        if self.feed.url.is_empty() {
            return Err(RelayError::Validation(
                "feed url is not set. \
                 Set it in config.toml or via FEEDRELAY_FEED_URL environment variable."
                    .to_string(),
            ));
        }
        validate_endpoint_url("feed url", &self.feed.url)?;

        if self.webhook.url.is_empty() {
            return Err(RelayError::Validation(
                "webhook url is not set. \
                 Set it in config.toml or via FEEDRELAY_WEBHOOK_URL environment variable."
                    .to_string(),
            ));
        }
        validate_endpoint_url("webhook url", &self.webhook.url)?;

        if self.relay.mode == RunMode::Watch && self.relay.interval_secs == 0 {
            return Err(RelayError::Validation(
                "relay interval_secs must be at least 1 in watch mode".to_string(),
            ));
        }

        Ok(())
    }
}

/// Check that a configured endpoint is a well-formed http(s) URL.
fn validate_endpoint_url(name: &str, url: &str) -> Result<()> {
    let parsed = url::Url::parse(url)
        .map_err(|e| RelayError::Validation(format!("invalid {}: {}", name, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(RelayError::Validation(format!(
                "unsupported {} scheme: {}",
                name, scheme
            )));
        }
    }

    if parsed.host().is_none() {
        return Err(RelayError::Validation(format!("{} has no host", name)));
    }

    Ok(())
}
