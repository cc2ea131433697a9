//! Application configuration model.
//!
//! Loading from disk lives in `docchat-infrastructure`; this module only
//! defines the shape, the defaults and validation.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DocchatError, Result};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub pacing: PacingSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(DocchatError::config("server.base_url must not be empty"));
        }
        self.pacing.response_delay_ms.validate("pacing.response_delay_ms")?;
        self.pacing.char_delay_ms.validate("pacing.char_delay_ms")?;
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout; the single attempt fails after this long.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Timing of the answer presentation.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PacingSettings {
    /// Minimum time before a response is shown.
    #[serde(default = "default_response_delay")]
    pub response_delay_ms: DelayRange,
    /// Per-character typewriter delay.
    #[serde(default = "default_char_delay")]
    pub char_delay_ms: DelayRange,
}

impl PacingSettings {
    /// No delays at all.
    pub fn instant() -> Self {
        Self {
            response_delay_ms: DelayRange::fixed(0),
            char_delay_ms: DelayRange::fixed(0),
        }
    }
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            response_delay_ms: default_response_delay(),
            char_delay_ms: default_char_delay(),
        }
    }
}

fn default_response_delay() -> DelayRange {
    DelayRange::new(1000, 5000)
}

fn default_char_delay() -> DelayRange {
    DelayRange::new(10, 100)
}

/// Inclusive millisecond range sampled uniformly.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: u64,
    pub max: u64,
}

impl DelayRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub const fn fixed(ms: u64) -> Self {
        Self { min: ms, max: ms }
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        if self.min > self.max {
            return Err(DocchatError::config(format!(
                "{}: min ({}) is greater than max ({})",
                name, self.min, self.max
            )));
        }
        Ok(())
    }

    /// Draws one delay.
    pub fn sample(&self) -> Duration {
        if self.min >= self.max {
            return Duration::from_millis(self.min);
        }
        Duration::from_millis(rand::thread_rng().gen_range(self.min..=self.max))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Inactivity period after which the user is logged out.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_require_login")]
    pub require_login: bool,
}

impl SessionSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            require_login: default_require_login(),
        }
    }
}

fn default_idle_timeout_secs() -> u64 {
    30 * 60
}

fn default_require_login() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.base_url, DEFAULT_SERVER_URL);
        assert_eq!(config.pacing.response_delay_ms, DelayRange::new(1000, 5000));
        assert_eq!(config.pacing.char_delay_ms, DelayRange::new(10, 100));
        assert!(config.session.require_login);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            base_url = "http://search.internal:9000"

            [pacing]
            char_delay_ms = { min = 0, max = 5 }
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "http://search.internal:9000");
        assert_eq!(config.server.timeout_secs, 120);
        assert_eq!(config.pacing.char_delay_ms, DelayRange::new(0, 5));
        assert_eq!(config.pacing.response_delay_ms, DelayRange::new(1000, 5000));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let mut config = AppConfig::default();
        config.pacing.char_delay_ms = DelayRange::new(50, 10);
        assert!(config.validate().unwrap_err().to_string().contains("char_delay_ms"));
    }

    #[test]
    fn test_sample_stays_in_range() {
        let range = DelayRange::new(10, 100);
        for _ in 0..200 {
            let ms = range.sample().as_millis() as u64;
            assert!((10..=100).contains(&ms));
        }
        assert_eq!(DelayRange::fixed(0).sample(), Duration::ZERO);
    }
}
