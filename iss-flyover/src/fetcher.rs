///! HTTP fetcher shared by every resolver
///!
///! One GET per call, no retries. Transport failures and non-2xx statuses
///! are mapped onto `FlyoverError` so resolvers never see reqwest types.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::{FlyoverError, Result};

const USER_AGENT: &str = concat!("iss-flyover/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the response body as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// reqwest-backed fetcher. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher. `timeout` of `None` keeps the client's default
    /// (no overall request timeout).
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);

        let network = |source| FlyoverError::Network {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(network)?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!("HTTP {} from {}", status, url);
            // the status is the failure; an unreadable body must not mask it
            let body = response.text().await.unwrap_or_default();
            return Err(FlyoverError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(network)?;
        tracing::debug!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
