//! Fetching the current alert set from Alertmanager

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::model::{decode_alerts, AlertRecord};

/// Anything that can produce the current list of alerts.
///
/// One call is one request; implementations must not retry.
#[async_trait]
pub trait AlertSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<AlertRecord>, FetchError>;
}

/// Alert source backed by the Alertmanager HTTP API
#[derive(Debug, Clone)]
pub struct HttpAlertSource {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl HttpAlertSource {
    pub fn new(url: reqwest::Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }
}

#[async_trait]
impl AlertSource for HttpAlertSource {
    async fn fetch(&self) -> Result<Vec<AlertRecord>, FetchError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        decode_alerts(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Reasons a single fetch cycle can fail
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("failed to fetch alerts: {0}")]
    Transport(String),

    #[error("unexpected status code: {0}")]
    BadStatus(u16),

    #[error("failed to decode response: {0}")]
    Decode(String),
}
