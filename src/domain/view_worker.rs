//! Background worker applying view-count increments.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::domain::repositories::LinkRepository;
use crate::domain::view_event::ViewEvent;

const MAX_RETRIES: usize = 3;

/// Consumes view events until every [`crate::domain::view_event::ViewQueue`] is dropped.
///
/// At most `concurrency` increments are in flight at once. Each increment is
/// retried with jittered exponential backoff; a final failure is logged and
/// counted but otherwise ignored, since the counter is approximate.
pub async fn run_view_worker(
    mut rx: mpsc::Receiver<ViewEvent>,
    repository: Arc<dyn LinkRepository>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tokio::spawn(async move {
            let _permit = permit;
            record_view(repository.as_ref(), &event).await;
        });
    }

    info!("View worker stopped");
}

/// Applies a single increment with retries. Returns whether it succeeded.
pub(crate) async fn record_view(repository: &dyn LinkRepository, event: &ViewEvent) -> bool {
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(5)
        .max_delay(Duration::from_millis(500))
        .map(jitter)
        .take(MAX_RETRIES);

    match Retry::start(strategy, || repository.increment_views(event.link_id)).await {
        Ok(()) => {
            debug!(link_id = event.link_id, keyword = %event.keyword, "View recorded");
            true
        }
        Err(e) => {
            error!(
                link_id = event.link_id,
                keyword = %event.keyword,
                error = %e,
                "Failed to record view"
            );
            metrics::counter!("golinks_view_updates_failed_total").increment(1);
            false
        }
    }
}
