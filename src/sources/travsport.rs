//! Svensk Travsport horse API.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use super::{fetch_json, HorseSource, PageFetcher};
use crate::normalize::Context;
use crate::pedigree::PedigreeAssembler;
use crate::pipeline::{build_fragment, Loader, HORSE};
use crate::sites::SiteConfig;
use crate::types::HorseRecord;

const BASE_URL: &str = "https://api.travsport.se/webapi/horses/";

/// Race type codes that are ordinary races (plain, monté, ...)
const ORDINARY_RACE_TYPES: [&str; 5] = ["", "r", "m", "b", "bm"];

pub struct TravsportSource {
    site: &'static SiteConfig,
    fetcher: Arc<dyn PageFetcher>,
}

impl TravsportSource {
    pub fn new(site: &'static SiteConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { site, fetcher }
    }

    fn url(endpoint: &str, link: &str) -> String {
        format!(
            "{}{}/organisation/TROT/sourceofdata/SPORT/horseid/{}",
            BASE_URL, endpoint, link
        )
    }

    async fn get(&self, url: &str) -> Result<Value> {
        fetch_json(self.fetcher.as_ref(), url).await
    }
}

#[async_trait]
impl HorseSource for TravsportSource {
    fn site(&self) -> &'static SiteConfig {
        self.site
    }

    async fn collect_horse(&self, link: &str) -> Result<HorseRecord> {
        let ctx = Context::new(self.site);

        let basic = self
            .get(&Self::url("basicinformation", link))
            .await
            .with_context(|| format!("Basic information of {}", link))?;

        let mut horse = Loader::new(&ctx, &HORSE);
        horse
            .add_value("link", basic["id"].clone())
            .add_value("name", basic["name"].clone())
            .add_value("country", basic["birthCountryCode"].clone())
            .add_value("birthdate", basic["dateOfBirth"].clone())
            .add_value("sex", basic["horseGender"]["code"].clone())
            .add_value("breed", basic["horseBreed"]["code"].clone())
            .add_value("registration", basic["registrationNumber"].clone())
            .add_value("ueln", basic["uelnNumber"].clone())
            .add_value("breeder", basic["breeder"]["name"].clone())
            .add_value("collection_date", ctx.today.to_string());

        let chip = self.get(&Self::url("pedigree/description", link)).await?;
        horse.add_value("chip", chip["chipNumber"].clone());

        let tree = self
            .get(&format!("{}?pedigreeTree=SMALL", Self::url("pedigree", link)))
            .await?;
        let mut nodes = Vec::new();
        flatten_pedigree(&ctx, &tree, 1, 0, &mut nodes);
        let ancestors =
            PedigreeAssembler::new(self.site, link).assemble(self.site.pedigree.place(nodes));

        if basic["offspringExists"].as_bool().unwrap_or(false) {
            let url = format!(
                "{}?genderCode={}",
                Self::url("offspring", link),
                basic["horseGender"]["code"].as_str().unwrap_or_default()
            );
            let listing = self.get(&url).await?;
            let is_mare = horse.get_output("sex") == Some(json!("mare"));

            for entry in listing["offspring"].as_array().into_iter().flatten() {
                horse.add_value("offspring", offspring_fragment(entry, is_mare));
            }
        }

        if basic["resultsExists"].as_bool().unwrap_or(false) {
            let results = self.get(&Self::url("results", link)).await?;
            for start in results.as_array().into_iter().flatten() {
                horse.add_value("starts", start_fragment(start));
            }

            let statistics = self.get(&Self::url("statistics", link)).await?;
            for year in statistics["statistics"].as_array().into_iter().flatten() {
                if year["numberOfStarts"] == "0" {
                    continue;
                }
                horse.add_value("start_summary", summary_fragment(year));
            }
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

/// Walk the nested father/mother tree into `(generation, position)` nodes
fn flatten_pedigree(
    ctx: &Context,
    node: &Value,
    generation: u32,
    position: u32,
    out: &mut Vec<((u32, u32), HorseRecord)>,
) {
    for (key, offset) in [("father", 0), ("mother", 1)] {
        let parent = &node[key];
        if !parent.is_object() {
            continue;
        }

        let position = position * 2 + offset;
        let fragment = json!({
            "link": known_id(&parent["horseId"]),
            "name": parent["name"],
            "country": parent["name"],
            "registration": parent["registrationNumber"],
        });

        match build_fragment::<HorseRecord>(ctx, &HORSE, &fragment) {
            Ok(ancestor) => out.push(((generation, position), ancestor)),
            Err(e) => debug!("No ancestor at ({}, {}): {}", generation, position, e),
        }

        flatten_pedigree(ctx, parent, generation + 1, position, out);
    }
}

/// Id 0 stands for an unknown horse
fn known_id(id: &Value) -> Value {
    if *id == 0 {
        Value::Null
    } else {
        id.clone()
    }
}

fn parent_fragment(parent: &Value, sex: &str) -> Value {
    json!({
        "link": known_id(&parent["id"]),
        "name": parent["name"],
        "country": parent["name"],
        "sex": sex,
    })
}

/// One offspring row; the other parent is the sire for a mare, the dam otherwise
fn offspring_fragment(entry: &Value, of_mare: bool) -> Value {
    let mut fragment = json!({
        "link": entry["horse"]["id"],
        "name": entry["horse"]["name"],
        "country": entry["horse"]["name"],
        "birthdate": entry["yearBorn"],
        "registration": entry["registrationNumber"],
        "sex": entry["gender"]["code"],
    });

    if of_mare {
        fragment["sire"] = parent_fragment(&entry["horsesParent"], "horse");
    } else {
        let mut dam = parent_fragment(&entry["horsesParent"], "mare");
        dam["sire"] = parent_fragment(&entry["horsesParentsFather"], "horse");
        fragment["dam"] = dam;
    }

    if entry["numberOfStarts"]["sortValue"].as_u64().unwrap_or(0) > 0 {
        let records = &entry["trotAdditionalInformation"];
        fragment["start_summary"] = json!({
            "year": 0,
            "starts": entry["numberOfStarts"]["sortValue"],
            "wins": entry["firstPlaces"],
            "place": entry["secondPlaces"],
            "show": entry["thirdPlaces"],
            "purse": entry["prizeMoney"]["sortValue"],
            "standing_mark": records["voltStartRecord"]["displayValue"],
            "mobile_mark": records["autoStartRecord"]["displayValue"],
        });
    }

    fragment
}

fn start_fragment(start: &Value) -> Value {
    let time = start["kilometerTime"]["displayValue"]
        .as_str()
        .unwrap_or_default();
    let placement = start["placement"]["displayValue"]
        .as_str()
        .unwrap_or_default();
    let race_type = start["raceType"]["displayValue"]
        .as_str()
        .unwrap_or_default();

    let racetype = if ORDINARY_RACE_TYPES.contains(&race_type) {
        "race".to_string()
    } else {
        race_type.chars().take(1).collect()
    };
    let started = !start["withdrawn"].as_bool().unwrap_or(false);
    let disqualified = placement == "d";

    let mut fragment = json!({
        "racedate": start["raceInformation"]["date"],
        "racetrack_code": start["trackCode"],
        "link": start["raceInformation"]["raceId"],
        "racenumber": start["raceInformation"]["raceNumber"],
        "postposition": start["startPosition"]["sortValue"],
        "distance": start["distance"]["sortValue"],
        "startmethod": start["startMethod"],
        "monte": race_type.contains('m'),
        "racetype": racetype,
        "started": started,
        "finish": start["placement"]["sortValue"],
        // compact digits, 1142 is 1:14.2
        "racetime": start["kilometerTime"]["sortValue"].as_u64().map(|t| t.to_string()),
        "gallop": time,
        "dnf": time.starts_with('u'),
        "disqualified": disqualified,
        "driver": start["driver"]["name"],
        "trainer": start["trainer"]["name"],
        "purse": start["prizeMoney"]["sortValue"],
        "ev_odds": start["odds"]["sortValue"],
    });

    if started && (racetype == "k" || racetype == "p") {
        fragment["approved"] = json!(placement);
    }
    if disqualified && !matches!(time, "ug" | "uag") {
        fragment["disqstring"] = json!(time);
    }

    fragment
}

fn summary_fragment(year: &Value) -> Value {
    let placements: Vec<&str> = year["placements"]
        .as_str()
        .unwrap_or_default()
        .split('-')
        .collect();
    let year_value = match year["year"].as_str() {
        Some("Livs") => json!(0),
        _ => year["year"].clone(),
    };

    json!({
        "year": year_value,
        "starts": year["numberOfStarts"],
        "wins": placements.first(),
        "place": placements.get(1),
        "show": placements.get(2),
        "purse": year["prizeMoney"],
        "mark": year["mark"],
    })
}
