use std::collections::HashSet;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::AdvertiseService;
use crate::AnnounceError;
use crate::AnnouncerConfig;
use crate::Announcer;
use crate::Key;
use crate::NanoidHandleGenerator;
use crate::Value;

/// One observed announce call
#[derive(Debug, Clone)]
pub(crate) struct AnnounceCall {
    pub key: Key,
    pub value: Value,
    pub ttl: Duration,
    pub at: Instant,
}

/// Advertiser double that records every call and fails on demand.
#[derive(Debug, Default)]
pub(crate) struct RecordingAdvertiser {
    calls: Mutex<Vec<AnnounceCall>>,
    /// Number of upcoming calls that should fail
    fail_next: AtomicUsize,
    /// Values whose announcement always fails
    poisoned: Mutex<HashSet<Value>>,
}

impl RecordingAdvertiser {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn fail_next(
        &self,
        count: usize,
    ) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    pub(crate) fn poison(
        &self,
        value: &'static str,
    ) {
        self.poisoned.lock().insert(Bytes::from_static(value.as_bytes()));
    }

    pub(crate) fn cure(&self) {
        self.poisoned.lock().clear();
    }

    pub(crate) fn calls(&self) -> Vec<AnnounceCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// How often `(key, value)` was announced
    pub(crate) fn count_of(
        &self,
        key: &'static str,
        value: &'static str,
    ) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.key.as_ref() == key.as_bytes() && c.value.as_ref() == value.as_bytes())
            .count()
    }

    pub(crate) fn reset(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait]
impl AdvertiseService for RecordingAdvertiser {
    async fn announce(
        &self,
        key: &Key,
        value: &Value,
        ttl: Duration,
    ) -> Result<(), AnnounceError> {
        self.calls.lock().push(AnnounceCall {
            key: key.clone(),
            value: value.clone(),
            ttl,
            at: Instant::now(),
        });

        if self.poisoned.lock().contains(value) {
            return Err(AnnounceError::Rejected {
                key: String::from_utf8_lossy(key).into_owned(),
                reason: "poisoned".to_string(),
            });
        }

        let pending_failures = self.fail_next.load(Ordering::SeqCst);
        if pending_failures > 0 {
            self.fail_next.store(pending_failures - 1, Ordering::SeqCst);
            return Err(AnnounceError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

pub(crate) fn announcer_with(advertiser: Arc<RecordingAdvertiser>) -> Announcer {
    Announcer::new(
        advertiser,
        Arc::new(NanoidHandleGenerator),
        AnnouncerConfig::default(),
    )
}

/// Lets spawned tasks run without moving the paused clock.
pub(crate) async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

