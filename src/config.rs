//! Configuration for the harness scraper.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root of the JSON store, one subdirectory per site
    #[serde(default = "default_output_root")]
    pub root: String,
}

fn default_output_root() -> String {
    "data/output".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
        }
    }
}

/// Relational mirror of collected horses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file; horses are only written to JSON when unset
    #[serde(default)]
    pub path: Option<String>,
}

/// Crawl configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// 0 is unbounded
    #[serde(default)]
    pub max_horses: usize,
    #[serde(default = "default_follow_offspring")]
    pub follow_offspring: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_follow_offspring() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_horses: 0,
            follow_offspring: default_follow_offspring(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl CrawlConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_page_wait_ms")]
    pub page_wait_ms: u64,
}

fn default_page_wait_ms() -> u64 {
    2000
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            page_wait_ms: default_page_wait_ms(),
        }
    }
}

impl BrowserConfig {
    pub fn page_wait(&self) -> Duration {
        Duration::from_millis(self.page_wait_ms)
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

impl AppConfig {
    /// Load configuration from defaults, config file and environment
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name("harness").required(false))
            // HARNESS_OUTPUT__ROOT, HARNESS_CRAWL__MAX_HORSES, ...
            .add_source(
                config::Environment::with_prefix("HARNESS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
