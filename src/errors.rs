//! Announce Coalescer Error Hierarchy
//!
//! Only the publisher ever observes [`AnnounceError`]. It is caught at the
//! supervisor boundary and never reaches `enqueue`/`dequeue` callers.

use std::time::Duration;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The external advertise service rejected or failed an announcement
    #[error(transparent)]
    Announce(#[from] AnnounceError),

    /// The publisher task panicked or was cancelled by the runtime
    #[error("Publisher task aborted: {0}")]
    PublisherAborted(String),
}

/// Failures raised by an [`AdvertiseService`](crate::AdvertiseService) implementation.
#[derive(Debug, thiserror::Error)]
pub enum AnnounceError {
    /// Service endpoint is not reachable right now
    #[error("Advertise service unavailable: {0}")]
    Unavailable(String),

    /// Service refused this particular record
    #[error("Announcement of key {key:?} rejected: {reason}")]
    Rejected { key: String, reason: String },

    /// Announcement did not complete in time
    #[error("Announcement timed out after {0:?}")]
    Timeout(Duration),

    /// Opaque transport failure with source context
    #[error("Advertise transport failed: {source}")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
