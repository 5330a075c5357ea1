//! Public entry point of the coalescer.
//!
//! Many callers register the same `(key, value)` pairs; the [`Announcer`]
//! keeps one reference-counted registration per pair and lets a single
//! supervised publisher re-announce them. Neither [`Announcer::enqueue`] nor
//! [`Announcer::dequeue`] can fail: announce errors are absorbed by the
//! supervisor and surface only through [`Announcer::last_error`].


use std::sync::Arc;

use tracing::debug;

use crate::metrics::register_custom_metrics;
use crate::publisher::supervise;
use crate::publisher::Shared;
use crate::AdvertiseService;
use crate::AnnouncerConfig;
use crate::Handle;
use crate::HandleGenerator;
use crate::Key;
use crate::LastError;
use crate::NanoidHandleGenerator;
use crate::Value;

/// Cheap to clone; all clones share one registry and one publisher.
///
/// Must be used from within a tokio runtime: the first `enqueue` into an
/// empty registry spawns the supervisor task.
#[derive(Clone)]
pub struct Announcer {
    shared: Arc<Shared>,
    handles: Arc<dyn HandleGenerator>,
}

impl Announcer {
    pub fn new(
        advertiser: Arc<dyn AdvertiseService>,
        handles: Arc<dyn HandleGenerator>,
        config: AnnouncerConfig,
    ) -> Self {
        register_custom_metrics();
        Self {
            shared: Arc::new(Shared::new(advertiser, config.publisher)),
            handles,
        }
    }

    /// Default configuration with nanoid handles
    pub fn with_advertiser(advertiser: Arc<dyn AdvertiseService>) -> Self {
        Self::new(
            advertiser,
            Arc::new(NanoidHandleGenerator),
            AnnouncerConfig::default(),
        )
    }

    /// Registers `(key, value)` and returns the handle that retracts it.
    ///
    /// The pair is queued for the fast path so it is announced within one
    /// check interval instead of waiting for the next full pass. Starts the
    /// supervisor if none is running.
    pub async fn enqueue(
        &self,
        key: impl Into<Key>,
        value: impl Into<Value>,
    ) -> Handle {
        let key = key.into();
        let value = value.into();
        let handle = self.handles.next_handle();

        let mut state = self.shared.state.lock().await;
        state.registry.add(key.clone(), value.clone(), handle.clone());
        state.pending.push((key, value));
        state.running = true;

        if !state.supervisor_active {
            state.supervisor_active = true;
            debug!("starting announce supervisor");
            tokio::spawn(supervise(self.shared.clone()));
        }
        drop(state);

        self.shared.wake.notify_one();
        handle
    }

    /// Retracts one registration. Unknown handles are ignored.
    ///
    /// Never triggers an announce. When the registry becomes empty the run
    /// flag is cleared and the publisher exits within one check interval.
    pub async fn dequeue(
        &self,
        handle: &Handle,
    ) {
        let mut state = self.shared.state.lock().await;
        if state.registry.remove(handle).is_none() {
            debug!(%handle, "dequeue of unknown handle ignored");
            return;
        }
        debug_assert!(state.registry.is_pruned());

        if state.registry.is_empty() {
            state.running = false;
            drop(state);
            self.shared.wake.notify_one();
        }
    }

    /// Drops every registration and lets the publisher wind down.
    pub async fn clear(&self) {
        let mut state = self.shared.state.lock().await;
        state.registry.clear();
        state.pending.clear();
        state.running = false;
        drop(state);
        self.shared.wake.notify_one();
    }

    /// Number of distinct registered pairs
    pub async fn registered_pairs(&self) -> usize {
        self.shared.state.lock().await.registry.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.shared.state.lock().await.registry.is_empty()
    }

    pub async fn is_registered(
        &self,
        key: &Key,
        value: &Value,
    ) -> bool {
        self.shared.state.lock().await.registry.contains(key, value)
    }

    /// Whether a publisher loop is currently live
    pub fn is_publishing(&self) -> bool {
        self.shared.publisher_count() > 0
    }

    /// Number of live publisher loops, zero or one
    pub fn publisher_count(&self) -> usize {
        self.shared.publisher_count()
    }

    /// Most recent publisher failure, if any
    pub fn last_error(&self) -> Option<LastError> {
        self.shared.last_error()
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }
}

impl std::fmt::Debug for Announcer {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Announcer").field("shared", &self.shared).finish()
    }
}
