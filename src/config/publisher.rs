use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_CHECK_INTERVAL_MS;
use crate::constants::DEFAULT_ERROR_RETRY_INTERVAL_MS;
use crate::constants::DEFAULT_REDO_INTERVAL_SECS;
use crate::constants::DEFAULT_TTL_SECS;
use crate::Error;
use crate::Result;

/// Timing parameters of the background publisher
///
/// ```toml
/// [publisher]
/// ttl_secs = 240
/// redo_interval_secs = 120
/// check_interval_ms = 1000
/// error_retry_interval_ms = 5000
/// ```
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PublisherConfig {
    /// TTL passed to every announce call, independent of the re-announce cadence
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum age of an announcement before a full pass re-announces it
    #[serde(default = "default_redo_interval_secs")]
    pub redo_interval_secs: u64,

    /// How often the idle publisher re-checks for new work or shutdown
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,

    /// Pause before the supervisor restarts a failed publisher
    #[serde(default = "default_error_retry_interval_ms")]
    pub error_retry_interval_ms: u64,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}
fn default_redo_interval_secs() -> u64 {
    DEFAULT_REDO_INTERVAL_SECS
}
fn default_check_interval_ms() -> u64 {
    DEFAULT_CHECK_INTERVAL_MS
}
fn default_error_retry_interval_ms() -> u64 {
    DEFAULT_ERROR_RETRY_INTERVAL_MS
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            redo_interval_secs: default_redo_interval_secs(),
            check_interval_ms: default_check_interval_ms(),
            error_retry_interval_ms: default_error_retry_interval_ms(),
        }
    }
}

impl PublisherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ttl_secs == 0 {
            return Err(Error::Config(ConfigError::Message(
                "ttl_secs must be greater than 0".into(),
            )));
        }

        if self.redo_interval_secs == 0 {
            return Err(Error::Config(ConfigError::Message(
                "redo_interval_secs must be greater than 0".into(),
            )));
        }

        if self.check_interval_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "check_interval_ms must be greater than 0".into(),
            )));
        }

        if self.check_interval() > self.redo_interval() {
            return Err(Error::Config(ConfigError::Message(format!(
                "check_interval_ms ({}) must not exceed redo_interval_secs ({}s)",
                self.check_interval_ms, self.redo_interval_secs
            ))));
        }

        // Records would expire between two full passes
        if self.ttl_secs < self.redo_interval_secs {
            return Err(Error::Config(ConfigError::Message(format!(
                "ttl_secs ({}) must be at least redo_interval_secs ({})",
                self.ttl_secs, self.redo_interval_secs
            ))));
        }

        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn redo_interval(&self) -> Duration {
        Duration::from_secs(self.redo_interval_secs)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    pub fn error_retry_interval(&self) -> Duration {
        Duration::from_millis(self.error_retry_interval_ms)
    }
}
