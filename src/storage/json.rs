//! File store of emitted records.
//!
//! Layout under the root directory:
//! `{site}/horses/{link}.json` and `{site}/{status}/{date}_{track}.json`
//! with dashes in the date replaced by underscores and the track lowercased.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::RecordStore;
use crate::sites::{SiteConfig, TrackKey};
use crate::types::{HorseRecord, RacedayRecord, RacedayStatus};

const HORSES_DIR: &str = "horses";

/// Pretty JSON documents partitioned by site and status
pub struct JsonStore {
    root: PathBuf,
    site: &'static SiteConfig,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>, site: &'static SiteConfig) -> Self {
        Self {
            root: root.into(),
            site,
        }
    }

    fn site_dir(&self) -> PathBuf {
        self.root.join(self.site.id)
    }

    pub fn horse_path(&self, link: &str) -> PathBuf {
        self.site_dir()
            .join(HORSES_DIR)
            .join(format!("{}.json", link))
    }

    /// Output file of a raceday; `None` when the date or track is unknown
    pub fn raceday_path(&self, raceday: &RacedayRecord) -> Option<PathBuf> {
        let date = raceday.date.as_deref()?;
        let track = match self.site.track_key {
            TrackKey::Name => raceday.racetrack.as_deref(),
            TrackKey::Code => raceday.racetrack_code.as_deref(),
        }?;

        let status = raceday.status.unwrap_or(RacedayStatus::Startlist);
        let file = format!("{}_{}.json", date.replace('-', "_"), track.to_lowercase());

        Some(self.site_dir().join(status.as_str()).join(file))
    }

    pub fn read_horse(&self, link: &str) -> Result<Option<HorseRecord>> {
        let path = self.horse_path(link);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let horse = serde_json::from_str(&content)
            .with_context(|| format!("Invalid horse document {}", path.display()))?;
        Ok(Some(horse))
    }
}

fn write_document<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let content = serde_json::to_string_pretty(data)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    debug!("Wrote {}", path.display());
    Ok(())
}

impl RecordStore for JsonStore {
    fn exists(&self, link: &str) -> Result<bool> {
        Ok(self.horse_path(link).exists())
    }

    fn write_horse(&self, horse: &HorseRecord) -> Result<()> {
        let link = horse
            .link
            .as_deref()
            .ok_or_else(|| anyhow!("Horse without link cannot be stored"))?;
        write_document(&self.horse_path(link), horse)
    }

    fn write_raceday(&self, raceday: &RacedayRecord) -> Result<()> {
        let path = self
            .raceday_path(raceday)
            .ok_or_else(|| anyhow!("Raceday needs a date and racetrack to be stored"))?;
        write_document(&path, raceday)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::{FRANCE, NORWAY, SWEDEN};
    use tempfile::TempDir;

    fn raceday(status: Option<RacedayStatus>) -> RacedayRecord {
        RacedayRecord {
            date: Some("2024-06-01".to_string()),
            racetrack: Some("Solvalla".to_string()),
            racetrack_code: Some("BJ".to_string()),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_raceday_file_names() {
        let sweden = JsonStore::new("/data", &SWEDEN);
        let norway = JsonStore::new("/data", &NORWAY);

        assert_eq!(
            sweden.raceday_path(&raceday(Some(RacedayStatus::Result))),
            Some(PathBuf::from("/data/sweden/result/2024_06_01_solvalla.json"))
        );
        // tracks named by code on this site, startlist when unpublished
        assert_eq!(
            norway.raceday_path(&raceday(None)),
            Some(PathBuf::from("/data/norway/startlist/2024_06_01_bj.json"))
        );

        let mut undated = raceday(None);
        undated.date = None;
        assert!(sweden.raceday_path(&undated).is_none());
    }

    #[test]
    fn test_horse_round_trip_and_exists() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path(), &FRANCE);
        let horse = HorseRecord {
            link: Some("bold-eagle/ZDE".to_string()),
            name: Some("BOLD EAGLE".to_string()),
            ..Default::default()
        };

        assert!(!store.exists("bold-eagle/ZDE").unwrap());
        store.write_horse(&horse).unwrap();

        assert!(store.exists("bold-eagle/ZDE").unwrap());
        assert!(dir
            .path()
            .join("france/horses/bold-eagle/ZDE.json")
            .exists());
        assert_eq!(store.read_horse("bold-eagle/ZDE").unwrap(), Some(horse));
        assert_eq!(store.read_horse("other/ABC").unwrap(), None);
    }

    #[test]
    fn test_write_raceday() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path(), &SWEDEN);

        store.write_raceday(&raceday(Some(RacedayStatus::Startlist))).unwrap();

        let path = dir.path().join("sweden/startlist/2024_06_01_solvalla.json");
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["racetrack"], "Solvalla");
        assert_eq!(written["status"], "startlist");
    }

    #[test]
    fn test_unstorable_records() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path(), &SWEDEN);

        assert!(store.write_horse(&HorseRecord::default()).is_err());
        let mut trackless = raceday(None);
        trackless.racetrack = None;
        assert!(store.write_raceday(&trackless).is_err());
    }
}
