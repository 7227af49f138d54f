//! Network retrieval for non-file candidates.
//!
//! The resolver only needs "give me the body of this URL as text, or
//! fail". [`Fetcher`] is that seam; [`HttpFetcher`] is the production
//! implementation over `reqwest`, and tests substitute their own.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::CandidateError;

/// Retrieves the text body of a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issue a GET for `url` and return the body as UTF-8 text.
    ///
    /// Any non-2xx status must be reported as an error.
    async fn fetch_text(&self, url: &str) -> Result<String, CandidateError>;
}

/// [`Fetcher`] backed by a shared `reqwest::Client`.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(ref agent) = config.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, CandidateError> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CandidateError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(body)
    }
}
