use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::time::timeout;
use tokio::time::Instant;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use super::Shared;
use super::SharedState;
use crate::metrics::ANNOUNCE_CALLS;
use crate::metrics::ANNOUNCE_FAILURES;
use crate::Key;
use crate::Result;
use crate::Value;

/// Which part of the loop issued an announce call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnnouncePath {
    FullPass,
    Drain,
}

impl AnnouncePath {
    fn as_str(&self) -> &'static str {
        match self {
            AnnouncePath::FullPass => "full_pass",
            AnnouncePath::Drain => "drain",
        }
    }
}

/// The single background loop that announces registered pairs.
///
/// Each cycle:
/// 1. full pass over the registry once `redo_interval` has elapsed
/// 2. drain of the pending queue (fast path for fresh registrations)
/// 3. bounded wait for new work, shutdown, or the next full pass
pub(crate) struct Publisher {
    shared: Arc<Shared>,
    cycle_start: Instant,
}

impl Publisher {
    /// Claims the publisher slot.
    ///
    /// # Panics
    /// Panics if another publisher is already live. That can only happen
    /// through a bug in the supervisor start-once guard.
    pub(crate) fn claim(shared: Arc<Shared>) -> Self {
        if let Err(live) = shared
            .publishers
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
        {
            panic!("publisher singleton violated: {live} publisher(s) already live");
        }

        Self {
            shared,
            cycle_start: Instant::now(),
        }
    }

    /// Runs until the run flag is observed false.
    ///
    /// On a clean return the publisher slot has been released and the
    /// supervisor marked inactive, both under the shared lock. On error the
    /// slot is still held; the supervisor releases it.
    pub(crate) async fn run(mut self) -> Result<()> {
        debug!("publisher started");
        loop {
            {
                let mut state = self.shared.state.lock().await;
                if !state.running {
                    state.supervisor_active = false;
                    self.shared.publishers.fetch_sub(1, Ordering::AcqRel);
                    debug!("publisher stopping: nothing left to announce");
                    return Ok(());
                }
            }

            if self.full_pass_due() {
                self.full_pass().await?;
            }

            self.drain_pending().await?;

            self.wait_for_work().await;
        }
    }

    fn full_pass_due(&self) -> bool {
        self.cycle_start.elapsed() > self.shared.config.redo_interval()
    }

    /// Re-announces every registered pair.
    ///
    /// The shared lock is held for the whole pass so the snapshot cannot be
    /// torn; concurrent enqueue/dequeue wait until it completes.
    async fn full_pass(&mut self) -> Result<()> {
        let mut state = self.shared.state.lock().await;
        state.pending.clear();
        self.cycle_start = Instant::now();

        let pairs = state.registry.snapshot();
        debug!(pairs = pairs.len(), "full announce pass");

        for (key, value) in &pairs {
            self.announce(key, value, AnnouncePath::FullPass).await?;
        }

        drop(state);
        Ok(())
    }

    /// Announces queued pairs that are still registered.
    async fn drain_pending(&self) -> Result<()> {
        let batch = {
            let mut guard = self.shared.state.lock().await;
            let SharedState {
                registry, pending, ..
            } = &mut *guard;
            if pending.is_empty() {
                return Ok(());
            }

            let mut seen = HashSet::new();
            let batch: Vec<_> = std::mem::take(pending)
                .into_iter()
                .filter(|(key, value)| registry.contains(key, value))
                .filter(|pair| seen.insert(pair.clone()))
                .collect();
            batch
        };

        trace!(pairs = batch.len(), "draining pending queue");
        for (index, (key, value)) in batch.iter().enumerate() {
            if let Err(e) = self.announce(key, value, AnnouncePath::Drain).await {
                self.requeue_front(&batch[index..]).await;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Puts pairs that were not announced back ahead of newer pending work,
    /// so the restarted publisher fast-paths them first.
    async fn requeue_front(
        &self,
        unannounced: &[(Key, Value)],
    ) {
        let mut state = self.shared.state.lock().await;
        state.pending.splice(0..0, unannounced.iter().cloned());
        debug!(pairs = unannounced.len(), "requeued unannounced pairs");
    }

    /// Waits until a full pass is due, the run flag drops, or work is queued.
    ///
    /// Conditions are re-checked at least every `check_interval`; a wake from
    /// enqueue/dequeue only shortens the wait.
    async fn wait_for_work(&self) {
        let check_interval = self.shared.config.check_interval();
        loop {
            {
                let state = self.shared.state.lock().await;
                if !state.running || !state.pending.is_empty() {
                    return;
                }
            }
            if self.full_pass_due() {
                return;
            }

            // Elapsed and notified are handled alike: every condition is re-checked above
            timeout(check_interval, self.shared.wake.notified()).await.ok();
        }
    }

    async fn announce(
        &self,
        key: &Key,
        value: &Value,
        path: AnnouncePath,
    ) -> Result<()> {
        ANNOUNCE_CALLS.with_label_values(&[path.as_str()]).inc();

        if let Err(e) = self.shared.advertiser.announce(key, value, self.shared.config.ttl()).await {
            ANNOUNCE_FAILURES.with_label_values(&[path.as_str()]).inc();
            warn!(?path, ?key, "announce failed, aborting pass: {}", e);
            return Err(e.into());
        }
        Ok(())
    }
}
