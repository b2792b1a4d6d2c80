//! SQLite schema for collected horses
//!
//! Tables:
//! - horses: One row per horse identity, merged across collections
//! - pedigree: Sire and dam edges of a horse
//! - offspring_links: Produce listings as parent/child edges
//! - start_summaries: Yearly racing summaries (year 0 is lifetime)

use rusqlite::{Connection, Result};

/// Create all tables in the database
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS horses (
            link TEXT PRIMARY KEY,
            name TEXT,
            country TEXT,
            birthdate TEXT,
            sex TEXT,
            breed TEXT,
            registration TEXT,
            ueln TEXT,
            chip TEXT,
            breeder TEXT,
            collection_date TEXT,
            updated_at TEXT DEFAULT (datetime('now'))
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS pedigree (
            link TEXT PRIMARY KEY REFERENCES horses(link),
            sire TEXT REFERENCES horses(link),
            dam TEXT REFERENCES horses(link)
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS offspring_links (
            parent TEXT NOT NULL REFERENCES horses(link),
            child TEXT NOT NULL REFERENCES horses(link),
            PRIMARY KEY (parent, child)
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS start_summaries (
            link TEXT NOT NULL REFERENCES horses(link),
            year INTEGER NOT NULL,
            starts INTEGER,
            wins INTEGER,
            place INTEGER,
            show INTEGER,
            purse INTEGER,
            mark TEXT,
            standing_mark TEXT,
            mobile_mark TEXT,
            PRIMARY KEY (link, year)
        )
        "#,
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_pedigree_sire ON pedigree(sire)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_pedigree_dam ON pedigree(dam)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_offspring_child ON offspring_links(child)",
        [],
    )?;

    Ok(())
}
