//! Background fetch-aggregate-install loop

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::alerts::{AlertSource, FetchError};
use crate::metrics::{aggregate, MetricStore};

/// Periodically refreshes the metric store from an alert source.
///
/// Each cycle runs to completion, then the loop sleeps for `interval`; cycles
/// are never skipped or aligned to wall-clock time.
pub struct UpdateLoop {
    source: Arc<dyn AlertSource>,
    store: Arc<MetricStore>,
    interval: Duration,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl UpdateLoop {
    pub fn new(source: Arc<dyn AlertSource>, store: Arc<MetricStore>, interval: Duration) -> Self {
        Self {
            source,
            store,
            interval,
            shutdown_tx: None,
        }
    }

    /// Run one cycle. A failed fetch bumps the error counter and leaves the
    /// last good snapshot in place.
    pub async fn run_cycle(
        source: &dyn AlertSource,
        store: &MetricStore,
    ) -> Result<usize, FetchError> {
        match source.fetch().await {
            Ok(alerts) => {
                let snapshot = aggregate(&alerts);
                let series = snapshot.len();
                store.replace_snapshot(snapshot);
                tracing::debug!(alerts = alerts.len(), series, "Metrics updated");
                Ok(alerts.len())
            }
            Err(e) => {
                store.increment_scrape_errors();
                tracing::error!(
                    error = %e,
                    scrape_errors = store.current_scrape_errors(),
                    "Error fetching alerts"
                );
                Err(e)
            }
        }
    }

    /// Start the loop on the tokio runtime. The first cycle runs immediately.
    pub fn start(&mut self) -> tokio::task::JoinHandle<()> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        self.shutdown_tx = Some(shutdown_tx);

        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        let interval = self.interval;

        tokio::spawn(async move {
            tracing::info!("Update loop started with interval {:?}", interval);

            loop {
                let _ = Self::run_cycle(source.as_ref(), &store).await;

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    // A dropped sender disables this branch instead of stopping the loop
                    Some(()) = shutdown_rx.recv() => {
                        tracing::info!("Update loop shutting down");
                        break;
                    }
                }
            }
        })
    }

    /// Ask the loop to exit at its next sleep
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
    }
}
