use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::Mutex as SyncMutex;
use tokio::sync::Mutex;
use tokio::sync::Notify;

use crate::utils::time::get_now_as_u128;
use crate::AdvertiseService;
use crate::Key;
use crate::PublisherConfig;
use crate::Registry;
use crate::Value;

/// Most recent publisher failure, kept for observability only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    /// Milliseconds since the Unix epoch
    pub at_millis: u128,
    pub description: String,
}

/// Everything guarded by the single shared lock
#[derive(Debug, Default)]
pub(crate) struct SharedState {
    pub(crate) registry: Registry,
    /// Newly registered pairs awaiting the fast path; may hold duplicates
    pub(crate) pending: Vec<(Key, Value)>,
    /// Run flag: the publisher keeps looping while this is set
    pub(crate) running: bool,
    /// Start-once guard for the supervisor task
    pub(crate) supervisor_active: bool,
}

pub(crate) struct Shared {
    pub(crate) state: Mutex<SharedState>,
    /// Live publisher loops, never above one
    pub(crate) publishers: AtomicUsize,
    pub(crate) last_error: SyncMutex<Option<LastError>>,
    /// Wakes the idle publisher early; the check interval still bounds the wait
    pub(crate) wake: Notify,
    pub(crate) advertiser: Arc<dyn AdvertiseService>,
    pub(crate) config: PublisherConfig,
}

impl Shared {
    pub(crate) fn new(
        advertiser: Arc<dyn AdvertiseService>,
        config: PublisherConfig,
    ) -> Self {
        Self {
            state: Mutex::new(SharedState::default()),
            publishers: AtomicUsize::new(0),
            last_error: SyncMutex::new(None),
            wake: Notify::new(),
            advertiser,
            config,
        }
    }

    pub(crate) fn publisher_count(&self) -> usize {
        self.publishers.load(Ordering::Acquire)
    }

    pub(crate) fn record_error(
        &self,
        description: String,
    ) {
        *self.last_error.lock() = Some(LastError {
            at_millis: get_now_as_u128(),
            description,
        });
    }

    pub(crate) fn last_error(&self) -> Option<LastError> {
        self.last_error.lock().clone()
    }
}

impl std::fmt::Debug for Shared {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Shared")
            .field("publishers", &self.publishers)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
