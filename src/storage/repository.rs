//! SQLite repository for collected horses

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::schema::create_tables;
use super::RecordStore;
use crate::types::{HorseRecord, RacedayRecord, YearlySummary};

/// Repository for horses, their ancestor edges and produce
pub struct HorseRepository {
    conn: Mutex<Connection>,
}

impl HorseRepository {
    /// Create a new repository, initializing the database if needed
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(db_path).context("Failed to open database")?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        create_tables(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory repository (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        create_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Database connection lock poisoned"))
    }

    // ==================== Write Operations ====================

    /// Upsert a horse with its whole ancestor tree, produce and summaries.
    ///
    /// Known columns are never overwritten with NULL, so a horse first seen as
    /// a bare ancestor is filled in when it is collected itself.
    pub fn upsert_horse(&self, horse: &HorseRecord) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        upsert_tree(&tx, horse)?;
        tx.commit()?;
        Ok(())
    }

    // ==================== Query Operations ====================

    /// Whether the horse was collected in its own right, not only seen as a relative
    pub fn exists(&self, link: &str) -> Result<bool> {
        let count: i32 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM horses WHERE link = ?1 AND collection_date IS NOT NULL",
            params![link],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Flat horse row without relatives
    pub fn get_horse(&self, link: &str) -> Result<Option<HorseRecord>> {
        let horse = self
            .conn()?
            .query_row(
                r#"
                SELECT link, name, country, birthdate, sex, breed, registration,
                       ueln, chip, breeder, collection_date
                FROM horses WHERE link = ?1
                "#,
                params![link],
                |row| {
                    Ok(HorseRecord {
                        link: row.get(0)?,
                        name: row.get(1)?,
                        country: row.get(2)?,
                        birthdate: row.get(3)?,
                        sex: parse_enum(row.get(4)?),
                        breed: parse_enum(row.get(5)?),
                        registration: row.get(6)?,
                        ueln: row.get(7)?,
                        chip: row.get(8)?,
                        breeder: row.get(9)?,
                        collection_date: row.get(10)?,
                        ..Default::default()
                    })
                },
            )
            .optional()?;
        Ok(horse)
    }

    /// Links of the sire and dam
    pub fn parents(&self, link: &str) -> Result<(Option<String>, Option<String>)> {
        let parents = self
            .conn()?
            .query_row(
                "SELECT sire, dam FROM pedigree WHERE link = ?1",
                params![link],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(parents.unwrap_or((None, None)))
    }

    pub fn offspring_of(&self, link: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT child FROM offspring_links WHERE parent = ?1 ORDER BY child")?;
        let children = stmt
            .query_map(params![link], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(children)
    }

    pub fn get_summaries(&self, link: &str) -> Result<Vec<YearlySummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT year, starts, wins, place, show, purse, mark, standing_mark, mobile_mark
            FROM start_summaries WHERE link = ?1 ORDER BY year DESC
            "#,
        )?;

        let summaries = stmt
            .query_map(params![link], |row| {
                Ok(YearlySummary {
                    year: row.get(0)?,
                    starts: row.get(1)?,
                    wins: row.get(2)?,
                    place: row.get(3)?,
                    show: row.get(4)?,
                    purse: row.get(5)?,
                    mark: row.get(6)?,
                    standing_mark: row.get(7)?,
                    mobile_mark: row.get(8)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    /// Get total horse count, relatives included
    pub fn horse_count(&self) -> Result<i32> {
        let count: i32 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM horses", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl RecordStore for HorseRepository {
    fn exists(&self, link: &str) -> Result<bool> {
        HorseRepository::exists(self, link)
    }

    fn write_horse(&self, horse: &HorseRecord) -> Result<()> {
        self.upsert_horse(horse)
    }

    /// Starters' horses are kept; the raceday itself lives in the file store
    fn write_raceday(&self, raceday: &RacedayRecord) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for race in &raceday.races {
            for horse in race.starters.iter().filter_map(|s| s.horse.as_ref()) {
                upsert_tree(&tx, horse)?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn parse_enum<T: DeserializeOwned>(value: Option<String>) -> Option<T> {
    value.and_then(|v| serde_json::from_value(serde_json::Value::String(v)).ok())
}

fn upsert_tree(conn: &Connection, horse: &HorseRecord) -> Result<()> {
    let Some(link) = horse.link.as_deref() else {
        return Ok(());
    };

    conn.execute(
        r#"
        INSERT INTO horses
        (link, name, country, birthdate, sex, breed, registration, ueln, chip,
         breeder, collection_date)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT(link) DO UPDATE SET
            name = COALESCE(excluded.name, horses.name),
            country = COALESCE(excluded.country, horses.country),
            birthdate = COALESCE(excluded.birthdate, horses.birthdate),
            sex = COALESCE(excluded.sex, horses.sex),
            breed = COALESCE(excluded.breed, horses.breed),
            registration = COALESCE(excluded.registration, horses.registration),
            ueln = COALESCE(excluded.ueln, horses.ueln),
            chip = COALESCE(excluded.chip, horses.chip),
            breeder = COALESCE(excluded.breeder, horses.breeder),
            collection_date = COALESCE(excluded.collection_date, horses.collection_date),
            updated_at = datetime('now')
        "#,
        params![
            link,
            horse.name,
            horse.country,
            horse.birthdate,
            horse.sex.map(|s| s.as_str()),
            horse.breed.map(|b| b.as_str()),
            horse.registration,
            horse.ueln,
            horse.chip,
            horse.breeder,
            horse.collection_date,
        ],
    )?;

    // relatives need their rows before the edges pointing at them
    for parent in [&horse.sire, &horse.dam].into_iter().flatten() {
        upsert_tree(conn, parent)?;
    }

    let sire = horse.sire.as_ref().and_then(|s| s.link.as_deref());
    let dam = horse.dam.as_ref().and_then(|d| d.link.as_deref());
    if sire.is_some() || dam.is_some() {
        conn.execute(
            r#"
            INSERT INTO pedigree (link, sire, dam) VALUES (?1, ?2, ?3)
            ON CONFLICT(link) DO UPDATE SET
                sire = COALESCE(excluded.sire, pedigree.sire),
                dam = COALESCE(excluded.dam, pedigree.dam)
            "#,
            params![link, sire, dam],
        )?;
    }

    for child in &horse.offspring {
        upsert_tree(conn, child)?;
        if let Some(child_link) = child.link.as_deref() {
            conn.execute(
                "INSERT OR IGNORE INTO offspring_links (parent, child) VALUES (?1, ?2)",
                params![link, child_link],
            )?;
        }
    }

    for summary in &horse.start_summary {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO start_summaries
            (link, year, starts, wins, place, show, purse, mark, standing_mark, mobile_mark)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                link,
                summary.year,
                summary.starts,
                summary.wins,
                summary.place,
                summary.show,
                summary.purse,
                summary.mark,
                summary.standing_mark,
                summary.mobile_mark,
            ],
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RaceRecord, Sex, StarterRecord};

    fn horse(link: &str, name: &str) -> HorseRecord {
        HorseRecord {
            link: Some(link.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn create_test_mare() -> HorseRecord {
        let mut dam = horse("200", "GRAND DAM");
        dam.sex = Some(Sex::Mare);
        dam.sire = Some(Box::new(horse("300", "DAMSIRE")));

        let mut mare = horse("100", "TEST MARE");
        mare.sex = Some(Sex::Mare);
        mare.collection_date = Some("2024-06-01".to_string());
        mare.sire = Some(Box::new(horse("201", "SIRE")));
        mare.dam = Some(Box::new(dam));
        mare.offspring = vec![horse("400", "FOAL ONE"), horse("401", "FOAL TWO")];
        mare.start_summary = vec![
            YearlySummary {
                year: 0,
                starts: Some(20),
                wins: Some(4),
                purse: Some(250_000),
                ..Default::default()
            },
            YearlySummary {
                year: 2023,
                starts: Some(8),
                ..Default::default()
            },
        ];
        mare
    }

    #[test]
    fn test_upsert_and_get_horse() {
        let repo = HorseRepository::in_memory().unwrap();
        repo.upsert_horse(&create_test_mare()).unwrap();

        let mare = repo.get_horse("100").unwrap().unwrap();
        assert_eq!(mare.name.as_deref(), Some("TEST MARE"));
        assert_eq!(mare.sex, Some(Sex::Mare));
        assert!(repo.get_horse("999").unwrap().is_none());

        // subject, sire, dam, damsire and two foals
        assert_eq!(repo.horse_count().unwrap(), 6);
    }

    #[test]
    fn test_ancestor_edges() {
        let repo = HorseRepository::in_memory().unwrap();
        repo.upsert_horse(&create_test_mare()).unwrap();

        assert_eq!(
            repo.parents("100").unwrap(),
            (Some("201".to_string()), Some("200".to_string()))
        );
        assert_eq!(repo.parents("200").unwrap(), (Some("300".to_string()), None));
        assert_eq!(repo.parents("300").unwrap(), (None, None));
        assert_eq!(repo.offspring_of("100").unwrap(), vec!["400", "401"]);
    }

    #[test]
    fn test_exists_means_collected() {
        let repo = HorseRepository::in_memory().unwrap();
        repo.upsert_horse(&create_test_mare()).unwrap();

        assert!(repo.exists("100").unwrap());
        // only seen as an ancestor
        assert!(!repo.exists("200").unwrap());
        assert!(!repo.exists("999").unwrap());
    }

    #[test]
    fn test_upsert_keeps_known_columns() {
        let repo = HorseRepository::in_memory().unwrap();
        repo.upsert_horse(&create_test_mare()).unwrap();

        // the grand dam collected later, her name missing from the page
        let mut grand_dam = horse("200", "GRAND DAM");
        grand_dam.name = None;
        grand_dam.birthdate = Some("2001-01-01".to_string());
        grand_dam.collection_date = Some("2024-06-02".to_string());
        repo.upsert_horse(&grand_dam).unwrap();

        let stored = repo.get_horse("200").unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("GRAND DAM"));
        assert_eq!(stored.birthdate.as_deref(), Some("2001-01-01"));
        assert!(repo.exists("200").unwrap());
        assert_eq!(repo.parents("200").unwrap().0.as_deref(), Some("300"));
    }

    #[test]
    fn test_summaries() {
        let repo = HorseRepository::in_memory().unwrap();
        repo.upsert_horse(&create_test_mare()).unwrap();

        let summaries = repo.get_summaries("100").unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].year, 2023);
        assert_eq!(summaries[1].purse, Some(250_000));
    }

    #[test]
    fn test_raceday_starters() {
        let repo = HorseRepository::in_memory().unwrap();
        let raceday = RacedayRecord {
            date: Some("2024-06-01".to_string()),
            races: vec![RaceRecord {
                racenumber: Some(1),
                starters: vec![
                    StarterRecord {
                        horse: Some(horse("500", "STARTER")),
                        ..Default::default()
                    },
                    StarterRecord::default(),
                ],
                ..Default::default()
            }],
            ..Default::default()
        };

        repo.write_raceday(&raceday).unwrap();
        assert_eq!(repo.horse_count().unwrap(), 1);
        assert!(!repo.exists("500").unwrap());
    }
}
