//! Alert records as reported by the upstream Alertmanager API

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Fallback used when an alert carries no `alertname` or `instance` label
pub const UNKNOWN_LABEL: &str = "unknown";

/// One alert as returned by `GET /api/v1/alerts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: AlertStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
    /// Not used for aggregation, kept so the record mirrors the upstream shape
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub starts_at: String,
}

/// Nested status object of an alert
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub silenced_by: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inhibited_by: Vec<String>,
}

/// Decode an alerts response body. A `null` body or `null` array element is
/// read as empty, the way Go encoders write nil slices and structs.
pub fn decode_alerts(body: &[u8]) -> Result<Vec<AlertRecord>, serde_json::Error> {
    let alerts: Option<Vec<Option<AlertRecord>>> = serde_json::from_slice(body)?;
    Ok(alerts
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Bucket key for alert counts: `(alertname, state, instance)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelKey {
    pub alertname: String,
    pub state: String,
    pub instance: String,
}

impl LabelKey {
    pub fn new(
        alertname: impl Into<String>,
        state: impl Into<String>,
        instance: impl Into<String>,
    ) -> Self {
        Self {
            alertname: alertname.into(),
            state: state.into(),
            instance: instance.into(),
        }
    }

    /// Label values in the order the gauge declares them
    pub fn values(&self) -> [&str; 3] {
        [&self.alertname, &self.state, &self.instance]
    }
}

impl AlertRecord {
    /// Derive the bucket key. Missing `alertname`/`instance` become `"unknown"`;
    /// the state is taken verbatim, even when empty.
    pub fn label_key(&self) -> LabelKey {
        let label = |name: &str| {
            self.labels
                .get(name)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
        };

        LabelKey {
            alertname: label("alertname"),
            state: self.status.state.clone(),
            instance: label("instance"),
        }
    }
}
