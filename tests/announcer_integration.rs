//! End-to-end behavior through the public API only.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use d_announce::AdvertiseService;
use d_announce::AnnounceError;
use d_announce::Announcer;
use d_announce::AnnouncerConfig;
use d_announce::Key;
use d_announce::NanoidHandleGenerator;
use d_announce::Value;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// Forwards every announcement to a channel so tests can observe them.
struct ChannelAdvertiser {
    tx: mpsc::UnboundedSender<(Key, Value, Duration)>,
}

#[async_trait]
impl AdvertiseService for ChannelAdvertiser {
    async fn announce(
        &self,
        key: &Key,
        value: &Value,
        ttl: Duration,
    ) -> Result<(), AnnounceError> {
        self.tx
            .send((key.clone(), value.clone(), ttl))
            .map_err(|e| AnnounceError::Transport { source: Box::new(e) })
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<(Key, Value, Duration)>) -> Vec<(Key, Value, Duration)> {
    let mut out = Vec::new();
    while let Ok(item) = rx.try_recv() {
        out.push(item);
    }
    out
}

#[tokio::test(start_paused = true)]
async fn test_announcements_follow_registrations() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let announcer = Announcer::with_advertiser(Arc::new(ChannelAdvertiser { tx }));

    let first = announcer.enqueue("service/a", "10.0.0.1:4000").await;
    let second = announcer.enqueue("service/a", "10.0.0.2:4000").await;
    sleep(Duration::from_millis(500)).await;

    let mut fast_path = drain(&mut rx);
    fast_path.sort();
    assert_eq!(
        fast_path,
        vec![
            (Bytes::from("service/a"), Bytes::from("10.0.0.1:4000"), Duration::from_secs(240)),
            (Bytes::from("service/a"), Bytes::from("10.0.0.2:4000"), Duration::from_secs(240)),
        ]
    );

    announcer.dequeue(&first).await;
    sleep(Duration::from_secs(121)).await;
    let refreshed = drain(&mut rx);
    assert_eq!(
        refreshed,
        vec![(Bytes::from("service/a"), Bytes::from("10.0.0.2:4000"), Duration::from_secs(240))]
    );

    announcer.dequeue(&second).await;
    sleep(Duration::from_secs(2)).await;
    assert!(!announcer.is_publishing());
    sleep(Duration::from_secs(300)).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_custom_cadence_from_config() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut config = AnnouncerConfig::default();
    config.publisher.redo_interval_secs = 10;
    config.publisher.ttl_secs = 30;
    let config = config.validate().expect("valid config");

    let announcer = Announcer::new(
        Arc::new(ChannelAdvertiser { tx }),
        Arc::new(NanoidHandleGenerator),
        config,
    );
    let _handle = announcer.enqueue("k", "v").await;

    sleep(Duration::from_secs(35)).await;
    let calls = drain(&mut rx);

    // Fast path, then passes at roughly 11s, 22s and 33s
    assert_eq!(calls.len(), 4);
    assert!(calls.iter().all(|(_, _, ttl)| *ttl == Duration::from_secs(30)));
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_is_reported_through_last_error() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let announcer = Announcer::with_advertiser(Arc::new(ChannelAdvertiser { tx }));

    let handle = announcer.enqueue("k", "v").await;
    sleep(Duration::from_millis(10)).await;

    let error = announcer.last_error().expect("closed channel should fail the announce");
    assert!(error.description.contains("Advertise transport failed"));
    assert!(!announcer.is_publishing());

    announcer.dequeue(&handle).await;
    sleep(Duration::from_secs(6)).await;
    assert!(!announcer.is_publishing());
}
