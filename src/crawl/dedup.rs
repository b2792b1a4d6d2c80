//! Which horses are already materialized.

use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage::RecordStore;

/// Horses collected in this run or present in the store from earlier runs
pub struct CollectedSet {
    store: Arc<dyn RecordStore>,
    seen: Mutex<HashSet<String>>,
}

impl CollectedSet {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// Lookup only, nothing is recorded
    pub async fn already_collected(&self, link: &str) -> Result<bool> {
        if self.seen.lock().await.contains(link) {
            return Ok(true);
        }
        self.store.exists(link)
    }

    /// Check and record in one step; `true` when the caller should fetch.
    ///
    /// Holding the lock across the store lookup keeps two traversals from
    /// claiming the same horse.
    pub async fn claim(&self, link: &str) -> Result<bool> {
        let mut seen = self.seen.lock().await;
        if seen.contains(link) {
            return Ok(false);
        }

        let stored = self.store.exists(link)?;
        seen.insert(link.to_string());
        Ok(!stored)
    }

    /// Record a horse without consulting the store
    pub async fn mark(&self, link: &str) {
        self.seen.lock().await.insert(link.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStore;
    use crate::sites::SWEDEN;
    use crate::types::HorseRecord;
    use tempfile::TempDir;

    fn store_with(dir: &TempDir, links: &[&str]) -> Arc<dyn RecordStore> {
        let store = JsonStore::new(dir.path(), &SWEDEN);
        for link in links {
            let horse = HorseRecord {
                link: Some(link.to_string()),
                ..Default::default()
            };
            store.write_horse(&horse).unwrap();
        }
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_lookup_has_no_side_effects() {
        let dir = TempDir::new().unwrap();
        let set = CollectedSet::new(store_with(&dir, &["100"]));

        assert!(set.already_collected("100").await.unwrap());
        assert!(!set.already_collected("200").await.unwrap());
        assert!(!set.already_collected("200").await.unwrap());
        assert!(set.claim("200").await.unwrap());
    }

    #[tokio::test]
    async fn test_claim_once() {
        let dir = TempDir::new().unwrap();
        let set = CollectedSet::new(store_with(&dir, &["100"]));

        assert!(!set.claim("100").await.unwrap());
        assert!(set.claim("200").await.unwrap());
        assert!(!set.claim("200").await.unwrap());
        assert!(set.already_collected("200").await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_claims() {
        let dir = TempDir::new().unwrap();
        let set = Arc::new(CollectedSet::new(store_with(&dir, &[])));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let set = Arc::clone(&set);
                tokio::spawn(async move { set.claim("300").await.unwrap() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
