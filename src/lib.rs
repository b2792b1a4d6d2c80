//! Harness racing scraping core.
//!
//! Raw text from national trotting federations is normalized through
//! per-site tables into canonical racedays, races, starters and horses.
//! Horses carry an ancestor tree assembled from the site's flat pedigree
//! cells, and crawls over mares' offspring never fetch a horse twice.

pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod normalize;
pub mod pedigree;
pub mod pipeline;
pub mod sites;
pub mod sources;
pub mod storage;
pub mod types;
