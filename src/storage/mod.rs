//! Persistence of emitted records
//!
//! The JSON file store is the primary output; the SQLite repository mirrors
//! horses and their relations when a database is configured.

pub mod json;
pub mod repository;
pub mod schema;

use anyhow::Result;

use crate::types::{HorseRecord, RacedayRecord};

pub use json::JsonStore;
pub use repository::HorseRepository;
pub use schema::create_tables;

/// Where assembled records go, and what has been collected before
pub trait RecordStore: Send + Sync {
    /// Whether the horse has already been materialized
    fn exists(&self, link: &str) -> Result<bool>;

    fn write_horse(&self, horse: &HorseRecord) -> Result<()>;

    fn write_raceday(&self, raceday: &RacedayRecord) -> Result<()>;
}

/// A primary store with mirrors that receive every write
pub struct MirroredStore {
    primary: Box<dyn RecordStore>,
    mirrors: Vec<Box<dyn RecordStore>>,
}

impl MirroredStore {
    pub fn new(primary: Box<dyn RecordStore>) -> Self {
        Self {
            primary,
            mirrors: Vec::new(),
        }
    }

    pub fn with_mirror(mut self, mirror: Box<dyn RecordStore>) -> Self {
        self.mirrors.push(mirror);
        self
    }
}

impl RecordStore for MirroredStore {
    /// Answered by the primary store only
    fn exists(&self, link: &str) -> Result<bool> {
        self.primary.exists(link)
    }

    fn write_horse(&self, horse: &HorseRecord) -> Result<()> {
        self.primary.write_horse(horse)?;
        for mirror in &self.mirrors {
            mirror.write_horse(horse)?;
        }
        Ok(())
    }

    fn write_raceday(&self, raceday: &RacedayRecord) -> Result<()> {
        self.primary.write_raceday(raceday)?;
        for mirror in &self.mirrors {
            mirror.write_raceday(raceday)?;
        }
        Ok(())
    }
}
