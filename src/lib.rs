//! Alertmanager Exporter
//!
//! Polls an Alertmanager alerts API on a fixed interval, counts the returned
//! alerts by `(alertname, state, instance)` and republishes the counts as a
//! Prometheus scrape endpoint.
//!
//! # Components
//!
//! - **Alert source**: one HTTP request per cycle, decoded into [`AlertRecord`]s
//! - **Aggregation**: [`aggregate`] turns a record list into a fresh [`Snapshot`]
//! - **Metric store**: [`MetricStore`] swaps whole snapshots atomically and keeps a
//!   cumulative fetch error counter
//! - **Update loop**: [`UpdateLoop`] drives fetch, aggregate and install forever
//! - **HTTP API**: `GET /metrics` and `GET /health`
//!
//! # Example
//!
//! ```no_run
//! use alertmanager_exporter::{aggregate, AlertRecord, MetricStore};
//!
//! let alerts: Vec<AlertRecord> = serde_json::from_str(
//!     r#"[{"status":{"state":"firing"},"labels":{"alertname":"HighCPU","instance":"node1"}}]"#,
//! ).unwrap();
//!
//! let store = MetricStore::new();
//! store.replace_snapshot(aggregate(&alerts));
//! println!("{}", alertmanager_exporter::metrics::render(&store).unwrap());
//! ```

pub mod alerts;
pub mod api;
pub mod config;
pub mod metrics;
pub mod updater;

// Re-export commonly used types
pub use alerts::{AlertRecord, AlertSource, FetchError, HttpAlertSource, LabelKey};
pub use config::{ConfigError, ExporterConfig};
pub use metrics::{aggregate, MetricStore, Snapshot};
pub use updater::UpdateLoop;
