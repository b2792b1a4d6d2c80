//! Headless Chrome fetching for pages rendered by JavaScript.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as ChromeBrowser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tracing::debug;

use super::PageFetcher;

/// Browser wrapper for rendered horse pages
pub struct Browser {
    browser: ChromeBrowser,
    handle: tokio::task::JoinHandle<()>,
    page_wait: Duration,
}

impl Browser {
    /// Launch a headless browser; `page_wait` is how long a page gets to render
    pub async fn launch(page_wait: Duration) -> Result<Self> {
        let chrome_path = if cfg!(target_os = "macos") {
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"
        } else if cfg!(target_os = "windows") {
            "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe"
        } else {
            "google-chrome"
        };

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .no_sandbox()
            .disable_default_args()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--disable-extensions")
            .arg("--mute-audio")
            .window_size(1280, 1024)
            .build()
            .map_err(|e| anyhow!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) = ChromeBrowser::launch(config)
            .await
            .map_err(|e| anyhow!("Failed to launch browser: {}", e))?;

        // the handler must be polled for the browser to make progress
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handle,
            page_wait,
        })
    }

    pub async fn close(mut self) -> Result<()> {
        let _ = self.browser.close().await;
        self.handle.abort();
        Ok(())
    }
}

#[async_trait]
impl PageFetcher for Browser {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Rendering {}", url);

        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| anyhow!("Failed to open {}: {}", url, e))?;

        tokio::time::sleep(self.page_wait).await;

        let html = page
            .content()
            .await
            .map_err(|e| anyhow!("Failed to read {}: {}", url, e))?;

        let _ = page.close().await;

        Ok(html)
    }
}
