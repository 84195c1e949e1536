use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::types::{HttpSettings, Result, SourceError};

/// Shared HTTP client used by every adapter.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    pub async fn get_text(&self, url: Url) -> Result<String> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UpstreamStatus {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    pub async fn get_json(&self, url: Url) -> Result<Value> {
        let body = self.get_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn post_json(&self, url: Url, payload: &Value) -> Result<Value> {
        debug!(%url, "POST");
        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UpstreamStatus {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

pub(crate) fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|_| SourceError::InvalidUrl {
        url: raw.to_string(),
    })
}

/// Appends percent-encoded path segments to `base`.
pub(crate) fn url_with_segments(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = parse_url(base)?;
    {
        let mut path = url.path_segments_mut().map_err(|_| SourceError::InvalidUrl {
            url: base.to_string(),
        })?;
        path.pop_if_empty().extend(segments);
    }
    Ok(url)
}
