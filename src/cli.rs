//! CLI commands for harness-scraper.
//!
//! Crawls horses from a site's start horse, emits raceday fragment documents
//! and exposes the field normalizers for diagnostics.

use anyhow::{anyhow, Context as _, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::crawl::{CrawlOptions, CrawlReport, Crawler};
use crate::normalize::Context;
use crate::pipeline::{Loader, RACEDAY, SCHEMAS};
use crate::sites::{self, SiteConfig, SourceKind, SITES};
use crate::sources::{source_for, Browser, HttpFetcher, PageFetcher};
use crate::storage::{HorseRepository, JsonStore, MirroredStore, RecordStore};
use crate::types::{HorseRecord, RacedayRecord};

#[derive(Parser)]
#[command(name = "harness-scraper")]
#[command(version, about = "Harness racing records normalized across federations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect a horse and, for mares, her offspring
    Horse {
        /// Site id (see `sites`)
        #[arg(short, long)]
        site: String,

        /// Horse id on the site
        #[arg(value_name = "START_ID")]
        start: String,

        /// Output root override
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Collect the start horse even if it is already stored
        #[arg(short, long)]
        force: bool,

        /// Do not follow offspring
        #[arg(long)]
        no_offspring: bool,
    },

    /// Normalize a raw raceday fragment document and store it
    Raceday {
        #[arg(short, long)]
        site: String,

        /// JSON object of raw raceday fields, races nested under "races"
        #[arg(value_name = "FRAGMENTS")]
        input: PathBuf,

        /// Output root override
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run one field's normalizer chain on a raw value
    Normalize {
        #[arg(short, long)]
        site: String,

        /// Field name, e.g. racetime, sex, birthdate
        field: String,

        raw: String,

        /// Entity owning the field when several have it (horse, start, race, starter, ...)
        #[arg(short, long)]
        entity: Option<String>,
    },

    /// Print a horse stored in the database with its parents, produce and career
    Show {
        /// Horse link on its site
        link: String,

        /// Database path override
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// List configured sites
    Sites,
}

fn open_store(config: &AppConfig, site: &'static SiteConfig) -> Result<Arc<dyn RecordStore>> {
    let mut store = MirroredStore::new(Box::new(JsonStore::new(&config.output.root, site)));

    if let Some(path) = &config.database.path {
        let repo = HorseRepository::new(Path::new(path))
            .with_context(|| format!("Failed to open database {}", path))?;
        store = store.with_mirror(Box::new(repo));
    }

    Ok(Arc::new(store))
}

fn load_config(output: Option<PathBuf>) -> Result<AppConfig> {
    let mut config = AppConfig::load()?;
    if let Some(root) = output {
        config.output.root = root.to_string_lossy().to_string();
    }
    Ok(config)
}

async fn crawl(
    site: &'static SiteConfig,
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn RecordStore>,
    options: CrawlOptions,
    start: &str,
) -> Result<CrawlReport> {
    let source = source_for(site, fetcher)?;
    Crawler::new(source, store, options).run(start).await
}

/// Run the incremental horse crawl.
pub async fn run_horse(
    site: String,
    start: String,
    output: Option<PathBuf>,
    force: bool,
    no_offspring: bool,
) -> Result<()> {
    let site = sites::site(&site)?;
    let config = load_config(output)?;
    let store = open_store(&config, site)?;

    let options = CrawlOptions {
        follow_offspring: config.crawl.follow_offspring && !no_offspring,
        max_horses: config.crawl.max_horses,
        force,
    };

    eprintln!("Crawling {} from {}", site.id, start);

    let rendered = site.html.as_ref().is_some_and(|html| html.rendered);
    let report = match site.source {
        SourceKind::Html if rendered => {
            let browser = Arc::new(Browser::launch(config.browser.page_wait()).await?);
            let report = crawl(site, browser.clone(), store, options, &start).await;
            if let Ok(browser) = Arc::try_unwrap(browser) {
                browser.close().await?;
            }
            report?
        }
        _ => {
            let fetcher = Arc::new(HttpFetcher::new(config.crawl.request_timeout())?);
            crawl(site, fetcher, store, options, &start).await?
        }
    };

    println!(
        "Collected: {}  Skipped: {}  Failed: {}",
        report.collected, report.skipped, report.failed
    );
    Ok(())
}

/// Normalize a raw raceday fragment object into a record
pub fn raceday_record(ctx: &Context, fragment: &Value) -> Result<RacedayRecord> {
    let fields = fragment
        .as_object()
        .ok_or_else(|| anyhow!("Raceday fragments must be a JSON object"))?;

    let mut raceday = Loader::new(ctx, &RACEDAY);
    for (field, raw) in fields {
        raceday.add_value(field, raw.clone());
    }
    raceday.add_value("collection_date", ctx.today.to_string());

    Ok(raceday.build()?)
}

/// Emit a raceday fragment document under the store's naming convention.
pub fn run_raceday(site: String, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let site = sites::site(&site)?;
    let config = load_config(output)?;

    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let fragment: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", input.display()))?;

    let ctx = Context::new(site);
    let raceday = raceday_record(&ctx, &fragment)?;

    let races = raceday.races.len();
    let starters: usize = raceday.races.iter().map(|r| r.starters.len()).sum();

    open_store(&config, site)?.write_raceday(&raceday)?;

    let path = JsonStore::new(&config.output.root, site).raceday_path(&raceday);
    eprintln!("Races: {}  Starters: {}", races, starters);
    if let Some(path) = path {
        println!("{}", path.display());
    }
    Ok(())
}

/// Canonical value of one raw field, `None` when it does not normalize
pub fn normalize_field(
    ctx: &Context,
    entity: Option<&str>,
    field: &str,
    raw: &str,
) -> Result<Option<Value>> {
    let schema = SCHEMAS
        .iter()
        .copied()
        .filter(|s| entity.map_or(true, |e| s.entity.eq_ignore_ascii_case(e)))
        .find(|s| s.field(field).is_some_and(|rule| rule.nested.is_none()))
        .ok_or_else(|| anyhow!("No text field named {}", field))?;

    let mut loader = Loader::new(ctx, schema);
    loader.add_value(field, raw);
    Ok(loader.get_output(field))
}

pub fn run_normalize(
    site: String,
    field: String,
    raw: String,
    entity: Option<String>,
) -> Result<()> {
    let ctx = Context::new(sites::site(&site)?);

    match normalize_field(&ctx, entity.as_deref(), &field, &raw)? {
        Some(value) => println!("{}", value),
        None => println!("(unset)"),
    }
    Ok(())
}

fn label(horse: &HorseRecord) -> String {
    format!(
        "{} ({})",
        horse.name.as_deref().unwrap_or("?"),
        horse.link.as_deref().unwrap_or("?")
    )
}

/// Plain-text view of a stored horse, `None` when it is not stored
pub fn horse_report(repo: &HorseRepository, link: &str) -> Result<Option<String>> {
    let Some(horse) = repo.get_horse(link)? else {
        return Ok(None);
    };
    let relative = |link: Option<String>| -> Result<String> {
        Ok(match link {
            Some(link) => match repo.get_horse(&link)? {
                Some(horse) => label(&horse),
                None => link,
            },
            None => "-".to_string(),
        })
    };

    let mut out = String::new();
    writeln!(out, "{}", label(&horse))?;
    writeln!(
        out,
        "  {}  born {}  {}",
        horse.sex.map_or("?", |s| s.as_str()),
        horse.birthdate.as_deref().unwrap_or("?"),
        horse.country.as_deref().unwrap_or("?")
    )?;
    if horse.collection_date.is_none() {
        writeln!(out, "  (only seen as a relative)")?;
    }

    let (sire, dam) = repo.parents(link)?;
    writeln!(out, "  Sire: {}", relative(sire)?)?;
    writeln!(out, "  Dam:  {}", relative(dam)?)?;

    let offspring = repo.offspring_of(link)?;
    if !offspring.is_empty() {
        writeln!(out)?;
        writeln!(out, "=== Offspring ===")?;
        for child in offspring {
            writeln!(out, "  {}", relative(Some(child))?)?;
        }
    }

    let summaries = repo.get_summaries(link)?;
    if !summaries.is_empty() {
        writeln!(out)?;
        writeln!(out, "=== Career ===")?;
        for s in summaries {
            let year = match s.year {
                0 => "total".to_string(),
                y => y.to_string(),
            };
            writeln!(
                out,
                "  {:>5}: {} starts, {}-{}-{}, {}",
                year,
                s.starts.unwrap_or(0),
                s.wins.unwrap_or(0),
                s.place.unwrap_or(0),
                s.show.unwrap_or(0),
                s.purse.unwrap_or(0)
            )?;
        }
    }

    Ok(Some(out))
}

pub fn run_show(link: String, database: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load()?;
    let path = database
        .or_else(|| config.database.path.map(PathBuf::from))
        .ok_or_else(|| anyhow!("No database configured, set database.path or pass --database"))?;

    let repo = HorseRepository::new(&path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    eprintln!("Horses stored: {}", repo.horse_count()?);

    match horse_report(&repo, &link)? {
        Some(report) => print!("{}", report),
        None => println!("{} is not stored", link),
    }
    Ok(())
}

pub fn run_sites() {
    println!(
        "{:<10} {:<8} {:<12} {:<14} {:>4}",
        "SITE", "COUNTRY", "SOURCE", "PEDIGREE", "GEN"
    );
    for site in SITES.iter() {
        println!(
            "{:<10} {:<8} {:<12} {:<14} {:>4}",
            site.id,
            site.country,
            format!("{:?}", site.source).to_lowercase(),
            site.pedigree.name(),
            site.pedigree.generations()
        );
    }
}
