//! Norsk Rikstoto horse API.
//!
//! Horses are keyed by registration number; career, starts, pedigree and
//! offspring are separate endpoints under `infopanel`.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chrono::Datelike;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use super::{fetch_json, HorseSource, PageFetcher};
use crate::normalize::{race, Context};
use crate::pedigree::PedigreeAssembler;
use crate::pipeline::{build_fragment, Loader, HORSE};
use crate::sites::SiteConfig;
use crate::types::HorseRecord;

const BASE_URL: &str = "https://www.rikstoto.no/api/infopanel";

/// Pedigree keys in level order, three generations
const PEDIGREE_KEYS: [&str; 14] = [
    "father",
    "mother",
    "fathersFather",
    "fathersMother",
    "mothersFather",
    "mothersMother",
    "fathersFathersFather",
    "fathersFathersMother",
    "fathersMothersFather",
    "fathersMothersMother",
    "mothersFathersFather",
    "mothersFathersMother",
    "mothersMothersFather",
    "mothersMothersMother",
];

/// Registration status of foals that were never registered
const VOID_REGISTRATION: &str = "Makulert";

pub struct RikstotoSource {
    site: &'static SiteConfig,
    fetcher: Arc<dyn PageFetcher>,
}

impl RikstotoSource {
    pub fn new(site: &'static SiteConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { site, fetcher }
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let url = format!("{}/{}", BASE_URL, path);
        let body = fetch_json(self.fetcher.as_ref(), &url).await?;
        Ok(body["result"].clone())
    }
}

#[async_trait]
impl HorseSource for RikstotoSource {
    fn site(&self) -> &'static SiteConfig {
        self.site
    }

    async fn collect_horse(&self, link: &str) -> Result<HorseRecord> {
        let ctx = Context::new(self.site);

        let life = self
            .get(&format!("liferow/horse/{}", link))
            .await
            .with_context(|| format!("Life row of {}", link))?;

        let mut horse = Loader::new(&ctx, &HORSE);
        horse
            .add_value("link", life["horseRegistrationNumber"].clone())
            .add_value("name", life["horseName"].clone())
            .add_value("country", life["horseName"].clone())
            .add_value("registration", life["horseRegistrationNumber"].clone())
            .add_value("sex", life["sex"].clone())
            .add_value("breed", life["breed"].clone())
            .add_value("breeder", life["breederName"].clone())
            .add_value("collection_date", ctx.today.to_string());

        // "12 år"
        if let Some(age) = life["age"].as_str().and_then(race::racenumber) {
            horse.add_value("birthdate", (ctx.today.year() - age as i32).to_string());
        }

        let registration = horse
            .get_output("registration")
            .and_then(|r| r.as_str().map(str::to_string))
            .unwrap_or_else(|| link.to_string());

        let career = self.get(&format!("career/horse/{}", registration)).await?;
        for year in career.as_array().into_iter().flatten() {
            horse.add_value("start_summary", summary_fragment(year));

            let Some(y) = year["year"].as_i64() else {
                continue;
            };
            let starts = self
                .get(&format!(
                    "starts/horse/{}/{}-01-01/{}-12-31",
                    registration, y, y
                ))
                .await?;

            for start in starts.as_array().into_iter().flatten() {
                if start["raceDayKey"].is_null() {
                    continue;
                }
                horse.add_value("starts", start_fragment(self.site, start));
            }
        }

        let pedigree = self.get(&format!("pedigree/{}", registration)).await?;
        let cells: Vec<Option<HorseRecord>> = PEDIGREE_KEYS
            .iter()
            .map(|key| ancestor(&ctx, &pedigree[*key]))
            .collect();
        let ancestors = PedigreeAssembler::new(self.site, link).assemble(cells);

        let is_mare = horse.get_output("sex") == Some(json!("mare"));
        let offspring = self.get(&format!("offspring/{}", registration)).await?;
        for foal in offspring.as_array().into_iter().flatten() {
            if foal["certificationStatus"] == VOID_REGISTRATION {
                continue;
            }
            horse.add_value("offspring", offspring_fragment(foal, is_mare));
        }

        let mut record: HorseRecord = horse.build()?;
        ancestors.attach_to(&mut record);

        info!(
            "Collected {} ({}) from {}",
            record.name.as_deref().unwrap_or("?"),
            link,
            self.site.id
        );
        Ok(record)
    }
}

fn ancestor(ctx: &Context, raw: &Value) -> Option<HorseRecord> {
    let fragment = json!({
        "link": raw["horseRegistrationNumber"],
        "registration": raw["horseRegistrationNumber"],
        "name": raw["name"],
        "country": raw["name"],
    });

    build_fragment(ctx, &HORSE, &fragment)
        .map_err(|e| debug!("Empty pedigree cell: {}", e))
        .ok()
}

/// Earnings are published in øre
fn kroner(value: &Value) -> Value {
    match value.as_f64() {
        Some(ore) => json!((ore / 100.0).round() as i64),
        None => Value::Null,
    }
}

fn summary_fragment(year: &Value) -> Value {
    json!({
        "year": year["year"],
        "starts": year["numberOfStarts"],
        "wins": year["numberOfFirstPlaces"],
        "place": year["numberOfSecondPlaces"],
        "show": year["numberOfThirdPlaces"],
        "mobile_mark": year["autoRecord"],
        "standing_mark": year["voltRecord"],
        "purse": kroner(&year["earnings"]),
    })
}

fn start_fragment(site: &SiteConfig, start: &Value) -> Value {
    let racedate = start["raceDate"]
        .as_str()
        .and_then(|d| d.split('T').next())
        .map(str::to_string);

    let mut fragment = json!({
        "racedate": racedate,
        "link": start["raceDayKey"],
        "racetrack": start["sportTrackName"],
        "racetrack_code": start["sportTrackCode"],
        "racetype": start["odds"],
        "driver": start["driverDisplayName"],
        "racenumber": start["raceNumber"],
        "postposition": start["postPosition"],
        "startnumber": start["startNumber"],
        "distance": start["distance"],
        "monte": start["monte"],
        "startmethod": start["startMethod"],
        "started": start["kmTime"],
    });

    let odds = start["odds"].as_str().unwrap_or_default();
    let scratched = start["kmTime"]
        .as_str()
        .is_some_and(|t| !race::started(site, t));

    if !scratched {
        fragment["finish"] = start["place"].clone();
        fragment["racetime"] = start["kmTime"].clone();
        fragment["gallop"] = start["galloped"].clone();
        fragment["purse"] = start["prize"].clone();
        fragment["disqualified"] = start["kmTime"].clone();
        fragment["disqstring"] = start["kmTime"].clone();
        if !odds.is_empty() && odds.chars().all(|c| c.is_ascii_digit()) {
            fragment["ev_odds"] = json!(odds.parse::<f64>().ok().map(|o| o / 10.0));
        }
    }

    fragment
}

fn offspring_fragment(foal: &Value, of_mare: bool) -> Value {
    let mut fragment = json!({
        "link": foal["horseRegistrationNumber"],
        "registration": foal["horseRegistrationNumber"],
        "name": foal["name"],
        "country": foal["name"],
        "sex": foal["sex"],
        "birthdate": foal["birthYear"],
    });

    if of_mare {
        fragment["sire"] = json!({
            "link": foal["fathersHorseRegistrationNumber"],
            "name": foal["fathersName"],
            "country": foal["fathersName"],
            "sex": "horse",
        });
    } else {
        fragment["dam"] = json!({
            "link": foal["mothersHorseRegistrationNumber"],
            "name": foal["mothersName"],
            "country": foal["mothersName"],
            "sex": "mare",
        });
    }

    if foal["numberOfStarts"].as_u64().unwrap_or(0) > 0 {
        fragment["start_summary"] = json!({
            "year": 0,
            "starts": foal["numberOfStarts"],
            "wins": foal["numberOfFirstPlaces"],
            "place": foal["numberOfSecondPlaces"],
            "show": foal["numberOfThirdPlaces"],
            "mobile_mark": foal["autoRecord"],
            "standing_mark": foal["voltRecord"],
            "purse": kroner(&foal["earnings"]),
        });
    }

    fragment
}
