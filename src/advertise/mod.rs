//! Seam to the external advertise service.
//!
//! The coalescer never talks to the network itself. Every announcement goes
//! through an [`AdvertiseService`] supplied by the embedding application, one
//! `(key, value)` pair per call.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;

use crate::AnnounceError;

/// Opaque announced key, compared by equality only
pub type Key = Bytes;

/// Opaque announced value, compared by equality only
pub type Value = Bytes;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AdvertiseService: Send + Sync + 'static {
    /// Publishes `value` under `key` for at most `ttl`.
    ///
    /// Announcing the same pair twice must be harmless; the publisher relies
    /// on that for both the fast path and periodic full passes.
    ///
    /// # Errors
    /// Any [`AnnounceError`] aborts the current publisher pass and triggers a
    /// supervised restart.
    async fn announce(
        &self,
        key: &Key,
        value: &Value,
        ttl: Duration,
    ) -> Result<(), AnnounceError>;
}
