//! ==============================================================================
//! config.rs - Runtime Configuration Loader
//! ==============================================================================
//!
//! purpose:
//!     defines the schema for `monitor.toml`.
//!     loads configuration from file or falls back to defaults.
//!
//! structure:
//!     - ApiConfig: Backend base path and request timeout.
//!     - PollingConfig: How often the dashboard refreshes.
//!     - FeedbackConfig: Lifetimes of transient UI feedback.
//!     - ServerConfig: Where the surface endpoint listens.
//!     - LoggingConfig: Default log filter.
//!
//! ==============================================================================

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{Error, Result};

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MonitorConfig {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub feedback: FeedbackConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_ms: 3000 }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct FeedbackConfig {
    /// how long sensor cards keep the "updated" class
    pub refresh_flash_ms: u64,
    /// lifetime of a notification
    pub notification_ms: u64,
    /// delay before re-reading the action log after a command
    pub log_confirm_delay_ms: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            refresh_flash_ms: 500,
            notification_ms: 3000,
            log_confirm_delay_ms: 500,
        }
    }
}

impl FeedbackConfig {
    pub fn refresh_flash(&self) -> Duration {
        Duration::from_millis(self.refresh_flash_ms)
    }

    pub fn notification_lifetime(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    pub fn log_confirm_delay(&self) -> Duration {
        Duration::from_millis(self.log_confirm_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "127.0.0.1:3000".to_string() }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl MonitorConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.as_ref().display())))?;
        Self::parse(&content)
    }

    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> Result<Self> {
        let config: MonitorConfig =
            toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load with default fallback
    ///
    /// Runs before logging is configured, so it reports on stdout.
    pub fn load_or_default() -> Self {
        let paths = [
            std::path::PathBuf::from("config").join("monitor.toml"),
            std::path::PathBuf::from("..").join("config").join("monitor.toml"),
        ];

        for path in &paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        println!("[CONFIG] Loaded from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        println!("[CONFIG] Warning: Failed to load {}: {}", path.display(), e);
                    }
                }
            }
        }

        println!("[CONFIG] Warning: No config file found - using defaults");
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.polling.interval_ms == 0 {
            return Err(Error::Config("polling.interval_ms must be greater than zero".into()));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Config("api.base_url must not be empty".into()));
        }
        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("┌─────────────────────────────────────────┐");
        println!("│          MONITOR CONFIGURATION          │");
        println!("├─────────────────────────────────────────┤");
        println!("│ API: {}", self.api.base_url);
        println!("│ Poll Interval: {}ms", self.polling.interval_ms);
        println!("│ Surface: http://{}", self.server.bind);
        println!("│ Log Level: {}", self.logging.level);
        println!("└─────────────────────────────────────────┘");
    }
}
