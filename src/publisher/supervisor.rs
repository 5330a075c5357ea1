use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::time::sleep;
use tracing::error;
use tracing::info;
use tracing::instrument;

use super::Publisher;
use super::Shared;
use crate::metrics::PUBLISHER_RESTARTS;
use crate::Error;

/// Keeps a publisher alive while there is work.
///
/// Returns once the publisher finishes cleanly (run flag cleared). Any
/// failure, including a panic inside the publisher task, is recorded as the
/// last error and followed by a restart after `error_retry_interval`. There
/// is no retry limit.
#[instrument(skip(shared))]
pub(crate) async fn supervise(shared: Arc<Shared>) {
    let retry_interval = shared.config.error_retry_interval();
    info!("announce supervisor started");

    loop {
        let publisher = Publisher::claim(shared.clone());

        let failure = match tokio::spawn(publisher.run()).await {
            Ok(Ok(())) => {
                info!("publisher finished, supervisor exiting");
                return;
            }
            Ok(Err(e)) => e,
            Err(join_error) => Error::PublisherAborted(join_error.to_string()),
        };

        // The failed run never reached its own release step
        shared.publishers.fetch_sub(1, Ordering::AcqRel);

        error!("publisher failed, restarting in {:?}: {}", retry_interval, failure);
        shared.record_error(failure.to_string());
        PUBLISHER_RESTARTS.inc();

        sleep(retry_interval).await;
    }
}
