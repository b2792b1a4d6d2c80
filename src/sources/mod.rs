//! Horse sources: fetch a site's pages and turn them into horse records.
//!
//! Fetching is behind [`PageFetcher`] so the browser, the HTTP client and
//! test fixtures are interchangeable. Each [`HorseSource`] feeds raw page
//! fragments through the field pipeline and the pedigree assembler.

mod browser;
mod html;
mod http;
mod rikstoto;
mod travsport;
mod trotting;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ScrapeError;
use crate::sites::{SiteConfig, SourceKind};
use crate::types::HorseRecord;

pub use browser::Browser;
pub use html::{parse_horse, HtmlSource};
pub use http::HttpFetcher;
pub use rikstoto::RikstotoSource;
pub use travsport::TravsportSource;
pub use trotting::TrottingSource;

/// Retrieves the body of a page or API endpoint
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Post a url-encoded form and return the response body
    async fn submit(&self, url: &str, form: &str) -> Result<String> {
        let _ = form;
        Err(anyhow::anyhow!("Cannot post forms to {}", url))
    }
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Arc<F> {
    async fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url).await
    }

    async fn submit(&self, url: &str, form: &str) -> Result<String> {
        (**self).submit(url, form).await
    }
}

/// Collects one horse with its pedigree, offspring and career
#[async_trait]
pub trait HorseSource: Send + Sync {
    fn site(&self) -> &'static SiteConfig;

    async fn collect_horse(&self, link: &str) -> Result<HorseRecord>;
}

/// Fetch an endpoint and decode its JSON body
pub(crate) async fn fetch_json<F: PageFetcher + ?Sized>(fetcher: &F, url: &str) -> Result<Value> {
    let body = fetcher.fetch(url).await?;
    serde_json::from_str(&body).with_context(|| format!("Invalid JSON from {}", url))
}

/// The source matching a site's configured kind
pub fn source_for(
    site: &'static SiteConfig,
    fetcher: Arc<dyn PageFetcher>,
) -> Result<Box<dyn HorseSource>> {
    let source: Box<dyn HorseSource> = match site.source {
        SourceKind::Travsport => Box::new(TravsportSource::new(site, fetcher)),
        SourceKind::Rikstoto => Box::new(RikstotoSource::new(site, fetcher)),
        SourceKind::Html => Box::new(HtmlSource::new(site, fetcher)?),
        SourceKind::Trotting => Box::new(TrottingSource::new(site, fetcher)),
    };

    Ok(source)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned bodies and records every requested URL
    #[derive(Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
        forms: HashMap<(String, String), String>,
        pub requests: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
            self.pages.insert(url.into(), body.into());
            self
        }

        /// Answer a POST of exactly `form` to `url`
        pub fn with_form(
            mut self,
            url: impl Into<String>,
            form: impl Into<String>,
            body: impl Into<String>,
        ) -> Self {
            self.forms.insert((url.into(), form.into()), body.into());
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("No page for {}", url))
        }

        async fn submit(&self, url: &str, form: &str) -> Result<String> {
            self.requests.lock().unwrap().push(format!("{} {}", url, form));
            self.forms
                .get(&(url.to_string(), form.to_string()))
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("No form answer for {} {}", url, form))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StaticFetcher;
    use super::*;
    use crate::sites::{BELGIUM, DENMARK, GERMANY, HOLLAND, SITES, SWEDEN};

    #[test]
    fn test_source_for_kinds() {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(StaticFetcher::default());

        assert_eq!(source_for(&SWEDEN, fetcher.clone()).unwrap().site().id, "sweden");
        assert_eq!(source_for(&DENMARK, fetcher.clone()).unwrap().site().id, "denmark");
        assert_eq!(source_for(&HOLLAND, fetcher.clone()).unwrap().site().id, "holland");
        assert_eq!(source_for(&BELGIUM, fetcher.clone()).unwrap().site().id, "belgium");
        // German horse pages are not fetchable
        assert!(source_for(&GERMANY, fetcher.clone()).is_err());

        let fetchable = SITES
            .iter()
            .filter(|site| source_for(**site, fetcher.clone()).is_ok())
            .count();
        assert_eq!(fetchable, SITES.len() - 1);
    }

    #[tokio::test]
    async fn test_submit() {
        let fetcher = Arc::new(StaticFetcher::default().with_form("u", "id=1", "ok"));

        assert_eq!(fetcher.submit("u", "id=1").await.unwrap(), "ok");
        assert!(fetcher.submit("u", "id=2").await.is_err());
        assert!(fetcher.fetch("u").await.is_err());
        assert_eq!(fetcher.request_count(), 3);
    }

    #[tokio::test]
    async fn test_fetch_json() {
        let fetcher = StaticFetcher::default()
            .with_page("a", r#"{"id": 1}"#)
            .with_page("b", "<html>");

        assert_eq!(fetch_json(&fetcher, "a").await.unwrap()["id"], 1);
        assert!(fetch_json(&fetcher, "b").await.is_err());
        assert!(fetch_json(&fetcher, "c").await.is_err());
        assert_eq!(fetcher.request_count(), 3);
    }
}
