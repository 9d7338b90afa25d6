// HTTP client for the monitor feed.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use super::model::MonitorSnapshot;

/// Path of the monitor document below the configured base URL.
pub const MONITOR_PATH: &str = "/data/monitor.json";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("monitor feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("monitor feed returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("monitor feed is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("monitor feed document is not a JSON object")]
    NotAnObject,
}

pub type Result<T> = std::result::Result<T, FeedError>;

/// Build the feed URL, tolerating a trailing slash on the base.
pub fn monitor_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), MONITOR_PATH)
}

/// Decode a feed body. Individual sections decode leniently; only a body
/// that is not a JSON object is rejected.
pub fn parse_snapshot(body: &str) -> Result<MonitorSnapshot> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(FeedError::NotAnObject);
    }
    Ok(serde_json::from_value(value)?)
}

pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: monitor_url(base_url),
        })
    }

    /// Fetch and decode one snapshot.
    pub async fn fetch(&self) -> Result<MonitorSnapshot> {
        log::debug!("Fetching monitor feed from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.text().await?;
        parse_snapshot(&body)
    }
}
