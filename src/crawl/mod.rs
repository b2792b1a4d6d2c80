//! Incremental horse crawl.
//!
//! A start horse is collected, emitted and, if she is a mare, her offspring
//! are queued. Only mares' produce is followed; stallions can have thousands
//! of foals. Every discovered offspring is claimed against the
//! [`CollectedSet`] before it is queued, so horses materialized by an earlier
//! run or earlier in this one are never fetched again.

mod dedup;

use anyhow::Result;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::sources::HorseSource;
use crate::storage::RecordStore;

pub use dedup::CollectedSet;

/// Pending work; each task carries everything needed to resume it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlTask {
    Horse { link: String, depth: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct CrawlOptions {
    pub follow_offspring: bool,
    /// 0 is unbounded
    pub max_horses: usize,
    /// Collect the start horse even when it is already stored
    pub force: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            follow_offspring: true,
            max_horses: 0,
            force: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub collected: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Crawler {
    source: Box<dyn HorseSource>,
    store: Arc<dyn RecordStore>,
    collected: CollectedSet,
    options: CrawlOptions,
}

impl Crawler {
    pub fn new(
        source: Box<dyn HorseSource>,
        store: Arc<dyn RecordStore>,
        options: CrawlOptions,
    ) -> Self {
        Self {
            collected: CollectedSet::new(Arc::clone(&store)),
            source,
            store,
            options,
        }
    }

    /// Crawl from one start horse
    pub async fn run(&self, start: &str) -> Result<CrawlReport> {
        let mut report = CrawlReport::default();
        let site = self.source.site().id;

        if !self.options.force && self.collected.already_collected(start).await? {
            info!("{} on {} is already collected", start, site);
            report.skipped += 1;
            return Ok(report);
        }
        self.collected.mark(start).await;

        let mut queue = VecDeque::from([CrawlTask::Horse {
            link: start.to_string(),
            depth: 0,
        }]);

        while let Some(task) = queue.pop_front() {
            if self.options.max_horses > 0 && report.collected >= self.options.max_horses {
                info!(
                    "Reached {} horses, {} tasks left unvisited",
                    self.options.max_horses,
                    queue.len() + 1
                );
                break;
            }

            let CrawlTask::Horse { link, depth } = task;
            debug!("Collecting {} (depth {})", link, depth);

            let horse = match self.source.collect_horse(&link).await {
                Ok(horse) => horse,
                Err(e) => {
                    warn!("Failed to collect {} on {}: {:#}", link, site, e);
                    report.failed += 1;
                    continue;
                }
            };

            if let Err(e) = self.store.write_horse(&horse) {
                warn!("Failed to store {}: {:#}", link, e);
                report.failed += 1;
                continue;
            }
            report.collected += 1;

            if !self.options.follow_offspring || !horse.is_mare() {
                continue;
            }

            for child in horse.offspring.iter().filter_map(|h| h.link.as_deref()) {
                if self.collected.claim(child).await? {
                    queue.push_back(CrawlTask::Horse {
                        link: child.to_string(),
                        depth: depth + 1,
                    });
                } else {
                    debug!("Skipping {}, already collected", child);
                    report.skipped += 1;
                }
            }
        }

        info!(
            "Crawl from {} on {}: {} collected, {} skipped, {} failed",
            start, site, report.collected, report.skipped, report.failed
        );
        Ok(report)
    }
}
