//! Plain HTTP fetching for the federation APIs and static pages.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::PageFetcher;

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("harness-scraper/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

const ACCEPT: &str = "application/json, text/html;q=0.9, */*;q=0.8";

async fn body_of(request: reqwest::RequestBuilder, url: &str) -> Result<String> {
    let response = request
        .header(reqwest::header::ACCEPT, ACCEPT)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Bad status from {}", url))?;

    response
        .text()
        .await
        .with_context(|| format!("Failed to read body of {}", url))
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        body_of(self.client.get(url), url).await
    }

    async fn submit(&self, url: &str, form: &str) -> Result<String> {
        debug!("POST {} {}", url, form);

        let request = self
            .client
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(form.to_string());
        body_of(request, url).await
    }
}
