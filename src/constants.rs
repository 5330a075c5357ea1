// -
// Publication cadence defaults

/// TTL handed to every announce call
pub(crate) const DEFAULT_TTL_SECS: u64 = 240;

/// Every registered pair is re-announced at least this often
pub(crate) const DEFAULT_REDO_INTERVAL_SECS: u64 = 120;

/// Granularity at which the publisher re-evaluates its wait conditions
pub(crate) const DEFAULT_CHECK_INTERVAL_MS: u64 = 1_000;

/// Pause between a publisher failure and its restart
pub(crate) const DEFAULT_ERROR_RETRY_INTERVAL_MS: u64 = 5_000;

/// Environment variable prefix used by the config loader
pub(crate) const ENV_PREFIX: &str = "ANNOUNCE";
