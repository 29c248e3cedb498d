//! Prometheus text exposition of the metric store

use prometheus::{Encoder, IntCounter, IntGaugeVec, Opts, Registry, TextEncoder};

use super::store::MetricStore;

pub const ALERTS_METRIC: &str = "alertmanager_alerts_total";
pub const SCRAPE_ERRORS_METRIC: &str = "alertmanager_scrape_errors_total";

/// Content type of the text exposition format
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render the store's current state.
///
/// A fresh registry is built per call from a single snapshot read, so the
/// gauge family always describes exactly one fetch cycle.
pub fn render(store: &MetricStore) -> Result<String, prometheus::Error> {
    let snapshot = store.snapshot();
    let scrape_errors = store.current_scrape_errors();

    let registry = Registry::new();

    let alerts = IntGaugeVec::new(
        Opts::new(ALERTS_METRIC, "Total number of alerts by status and name"),
        &["alertname", "state", "instance"],
    )?;
    let errors = IntCounter::new(SCRAPE_ERRORS_METRIC, "Total number of scrape errors")?;

    registry.register(Box::new(alerts.clone()))?;
    registry.register(Box::new(errors.clone()))?;

    for (key, count) in snapshot.iter() {
        alerts
            .get_metric_with_label_values(&key.values())?
            .set(i64::try_from(*count).unwrap_or(i64::MAX));
    }
    errors.inc_by(scrape_errors);

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
