//! Trotting Belge horse pages.
//!
//! The overview page is the only place carrying the UELN and birthdate. Ids,
//! breeders, produce, results and the pedigree tree come from the JSON
//! endpoints the page loads.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use scraper::Html;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use super::html::read_field;
use super::{fetch_json, HorseSource, PageFetcher};
use crate::normalize::{horse, Context};
use crate::pedigree::PedigreeAssembler;
use crate::pipeline::{build_fragment, Loader, HORSE};
use crate::sites::{FieldSelector, SiteConfig};
use crate::types::{HorseRecord, Sex};

const BASE_URL: &str = "https://www.trotting.be/horses";

const OVERVIEW_FIELDS: [(&str, FieldSelector); 7] = [
    ("name", FieldSelector::Css("span.h4")),
    ("sex", FieldSelector::After("span.h4")),
    ("link", FieldSelector::AfterParent("ID:")),
    ("country", FieldSelector::AfterParent("Nationalité:")),
    ("birthdate", FieldSelector::AfterParent("Date de naissance:")),
    ("registration", FieldSelector::AfterParent("Ancien id:")),
    ("ueln", FieldSelector::AfterParent("Numéro UELN:")),
];

/// Produce listings in the pedigree tree, in the site's dam slot order
const DESCENDANT_KEYS: [&str; 4] = [
    "MotherDescendants",
    "GrandMotherDescendants",
    "GreatGrandMotherDescendants",
    "GreatGreatGrandMotherDescendants",
];

/// Everything fetched for one horse
struct HorsePages {
    overview: String,
    details: Value,
    production: Value,
    results: Value,
    tree: Value,
}

pub struct TrottingSource {
    site: &'static SiteConfig,
    fetcher: Arc<dyn PageFetcher>,
}

impl TrottingSource {
    pub fn new(site: &'static SiteConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { site, fetcher }
    }

    async fn get(&self, endpoint: &str, link: &str) -> Result<Value> {
        let url = format!("{}/{}?horseId={}", BASE_URL, endpoint, link);
        fetch_json(self.fetcher.as_ref(), &url)
            .await
            .with_context(|| format!("{} of {}", endpoint, link))
    }
}

#[async_trait]
impl HorseSource for TrottingSource {
    fn site(&self) -> &'static SiteConfig {
        self.site
    }

    async fn collect_horse(&self, link: &str) -> Result<HorseRecord> {
        let url = format!("{}/Overview/?horseId={}", BASE_URL, link);
        let overview = self
            .fetcher
            .fetch(&url)
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let pages = HorsePages {
            overview,
            details: self.get("Overview", link).await?,
            production: self.get("ProductionOverview", link).await?,
            results: self.get("ResultOverview", link).await?,
            tree: self.get("PedigreeTree", link).await?,
        };

        let ctx = Context::new(self.site);
        let record = parse_horse(&ctx, link, &pages)?;

        info!(
            "Collected {} ({}) from {}",
            record.name.as_deref().unwrap_or("?"),
            link,
            self.site.id
        );
        Ok(record)
    }
}

fn parse_horse(ctx: &Context, link: &str, pages: &HorsePages) -> Result<HorseRecord> {
    let mut horse = Loader::new(ctx, &HORSE);
    horse
        .add_value("link", link)
        .add_value("collection_date", ctx.today.to_string());

    let document = Html::parse_document(&pages.overview);
    for (field, selector) in OVERVIEW_FIELDS.iter() {
        if let Some(raw) = read_field(document.root_element(), selector) {
            horse.add_value(field, raw);
        }
    }

    for breeder in pages.details["Breeders"].as_array().into_iter().flatten() {
        horse.add_value("breeder", breeder["Participant"]["Name"].clone());
    }

    for declaration in pages.production["BirthDeclarations"].as_array().into_iter().flatten() {
        horse.add_value("offspring", foal_fragment(ctx, declaration));
    }

    for result in pages.results["Results"].as_array().into_iter().flatten() {
        horse.add_value("starts", start_fragment(result));
    }

    let mut nodes = Vec::new();
    for generation in 1..=ctx.site.pedigree.generations() {
        for position in 0..1u32 << generation {
            let raw = &pages.tree[ancestor_key(generation, position)];
            if let Some(ancestor) = build_horse(ctx, &horse_fragment(raw)) {
                nodes.push(((generation, position), ancestor));
            }
        }
    }

    let mut assembler = PedigreeAssembler::new(ctx.site, link);
    for (slot, key) in ctx.site.dam_offspring_slots.iter().zip(DESCENDANT_KEYS) {
        let produce: Vec<HorseRecord> = pages.tree[key]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|foal| build_horse(ctx, &horse_fragment(foal)))
            .collect();
        if !produce.is_empty() {
            assembler = assembler.splice_offspring(*slot, produce);
        }
    }
    let ancestors = assembler.assemble(ctx.site.pedigree.place(nodes));

    let mut record: HorseRecord = horse.build()?;
    ancestors.attach_to(&mut record);
    Ok(record)
}

/// Key of the ancestor at `(generation, position)`, e.g. `GreatGrandMother4`
fn ancestor_key(generation: u32, position: u32) -> String {
    let prefix = match generation {
        1 => "",
        2 => "Grand",
        3 => "GreatGrand",
        _ => "GreatGreatGrand",
    };
    let parent = if position % 2 == 0 { "Father" } else { "Mother" };

    if generation == 1 {
        format!("{}{}", prefix, parent)
    } else {
        format!("{}{}{}", prefix, parent, position / 2 + 1)
    }
}

fn build_horse(ctx: &Context, fragment: &Value) -> Option<HorseRecord> {
    build_fragment(ctx, &HORSE, fragment)
        .map_err(|e| debug!("Skipping horse: {}", e))
        .ok()
}

fn horse_fragment(raw: &Value) -> Value {
    let birthdate = raw["DateOfBirth"]
        .as_str()
        .and_then(|d| d.split('T').next());

    json!({
        "link": raw["HorseId"],
        "name": raw["Name"],
        "country": raw["NationalityOfBirthText"],
        "registration": raw["OldHorseId"],
        "sex": raw["GenderText"],
        "breed": raw["TypeText"],
        "birthdate": birthdate,
    })
}

/// A foal with the partner hung on the side its sex says
fn foal_fragment(ctx: &Context, declaration: &Value) -> Value {
    let mut fragment = horse_fragment(&declaration["FoalHorse"]);
    let partner = &declaration["PartnerHorse"];

    let side = match partner["GenderText"].as_str().and_then(|s| horse::sex(ctx.site, s)) {
        Some(Sex::Mare) => "dam",
        _ => "sire",
    };
    fragment[side] = horse_fragment(partner);
    fragment
}

fn start_fragment(result: &Value) -> Value {
    let race = &result["Race"];
    let run = &result["Participation"];
    let racedate = race["DepartureDateTime"]
        .as_str()
        .and_then(|d| d.split('T').next());
    let time = &run["FormattedResultTime1000Txt"];

    json!({
        "link": race["RaceId"],
        "racedate": racedate,
        "racetrack": race["Track"]["Name"],
        "racenumber": race["RaceNumber"],
        "monte": race["DisciplineText"],
        "startmethod": race["StartTypeText"],
        "racetype": race["RaceCategory"]["Name"],
        "distance": run["Distance"],
        "driver": run["DriverName"],
        "trainer": run["TrainerName"],
        "finish": run["Place"],
        "racetime": time,
        "gallop": time,
        "dnf": time,
        "disqualified": time,
        "disqstring": time,
        "purse": run["TotalWinsum"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::BELGIUM;
    use crate::sources::testing::StaticFetcher;
    use crate::types::StartMethod;
    use chrono::NaiveDate;

    fn ctx() -> Context {
        Context::with_today(&BELGIUM, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn ancestor(id: u32) -> Value {
        json!({
            "HorseId": id,
            "Name": format!("Ancestor {}", id),
            "NationalityOfBirthText": "France",
            "OldHorseId": null,
            "GenderText": null,
        })
    }

    fn tree() -> Value {
        let mut tree = serde_json::Map::new();
        for generation in 1..=4u32 {
            for position in 0..1u32 << generation {
                let id = generation * 100 + position;
                tree.insert(ancestor_key(generation, position), ancestor(id));
            }
        }
        // the sire's dam is unknown
        tree.insert("GrandMother1".to_string(), json!({"HorseId": null, "Name": "Inconnu"}));
        tree.insert(
            "MotherDescendants".to_string(),
            json!([ancestor(901), {"HorseId": null}, ancestor(902)]),
        );
        tree.insert(
            "GreatGreatGrandMotherDescendants".to_string(),
            json!([ancestor(903)]),
        );
        Value::Object(tree)
    }

    fn overview() -> String {
        r#"<html><body>
            <div><span class="h4">Belle du Bois</span> Jument</div>
            <div class="row"><div><label>ID:</label></div><div><span>41234</span></div></div>
            <div class="row"><div><label>Nationalité:</label></div><div><span><span>Belgique</span></span></div></div>
            <div class="row"><div><label>Date de naissance:</label></div><div><span>12-04-2015</span></div></div>
            <div class="row"><div><label>Ancien id:</label></div><div><span>B-15-0077</span></div></div>
            <div class="row"><div><label>Numéro UELN:</label></div><div><span>056001B15000771</span></div></div>
        </body></html>"#
            .to_string()
    }

    fn fetcher() -> StaticFetcher {
        let endpoint = |name: &str| format!("{}/{}?horseId=41234", BASE_URL, name);

        StaticFetcher::default()
            .with_page(format!("{}/Overview/?horseId=41234", BASE_URL), overview())
            .with_page(
                endpoint("Overview"),
                json!({"Breeders": [{"Participant": {"Name": "Haras du Bois"}}]}).to_string(),
            )
            .with_page(
                endpoint("ProductionOverview"),
                json!({"BirthDeclarations": [{
                    "FoalHorse": {
                        "HorseId": 51000,
                        "Name": "Caprice du Bois",
                        "NationalityOfBirthText": "Belgique",
                        "GenderText": "Hongre",
                        "DateOfBirth": "2021-03-30T00:00:00",
                    },
                    "PartnerHorse": {"HorseId": 300, "Name": "Ready Cash", "GenderText": "Étalon"},
                }]})
                .to_string(),
            )
            .with_page(
                endpoint("ResultOverview"),
                json!({"Results": [{
                    "Race": {
                        "RaceId": 88001,
                        "DepartureDateTime": "2019-05-12T14:30:00",
                        "Track": {"Name": "Kuurne"},
                        "RaceNumber": 4,
                        "DisciplineText": "Attelé",
                        "StartTypeText": "Autostart",
                        "RaceCategory": {"Name": "Course"},
                    },
                    "Participation": {
                        "Distance": 2300,
                        "DriverName": "J. Verbeeck",
                        "Place": 2,
                        "FormattedResultTime1000Txt": "1'14\"25",
                        "TotalWinsum": 1200,
                    },
                }]})
                .to_string(),
            )
            .with_page(endpoint("PedigreeTree"), tree().to_string())
    }

    #[test]
    fn test_ancestor_keys() {
        assert_eq!(ancestor_key(1, 0), "Father");
        assert_eq!(ancestor_key(1, 1), "Mother");
        assert_eq!(ancestor_key(2, 1), "GrandMother1");
        assert_eq!(ancestor_key(2, 2), "GrandFather2");
        assert_eq!(ancestor_key(3, 6), "GreatGrandFather4");
        assert_eq!(ancestor_key(4, 15), "GreatGreatGrandMother8");
    }

    #[tokio::test]
    async fn test_collect_horse() {
        let fetcher = Arc::new(fetcher());
        let source = TrottingSource::new(&BELGIUM, fetcher.clone());

        let horse = source.collect_horse("41234").await.unwrap();
        assert_eq!(fetcher.request_count(), 5);

        assert_eq!(horse.link.as_deref(), Some("41234"));
        assert_eq!(horse.name.as_deref(), Some("BELLE DU BOIS"));
        assert_eq!(horse.sex, Some(Sex::Mare));
        assert_eq!(horse.country.as_deref(), Some("BE"));
        assert_eq!(horse.registration.as_deref(), Some("B-15-0077"));
        assert_eq!(horse.ueln.as_deref(), Some("056001B15000771"));
        assert_eq!(horse.breeder.as_deref(), Some("Haras du Bois"));

        assert_eq!(horse.offspring.len(), 1);
        let foal = &horse.offspring[0];
        assert_eq!(foal.link.as_deref(), Some("51000"));
        assert_eq!(foal.sex, Some(Sex::Gelding));
        assert_eq!(foal.birthdate.as_deref(), Some("2021-03-30"));
        assert_eq!(foal.sire.as_ref().unwrap().link.as_deref(), Some("300"));
        assert!(foal.dam.is_none());

        assert_eq!(horse.starts.len(), 1);
        let start = &horse.starts[0];
        assert_eq!(start.racedate.as_deref(), Some("2019-05-12"));
        assert_eq!(start.racetrack.as_deref(), Some("Kuurne"));
        assert_eq!(start.startmethod, Some(StartMethod::Mobile));
        assert_eq!(start.finish, Some(2));
        assert_eq!(start.racetime, Some(74.25));
        assert_eq!(start.purse, Some(1200));
    }

    #[tokio::test]
    async fn test_pedigree_tree() {
        let source = TrottingSource::new(&BELGIUM, Arc::new(fetcher()));
        let horse = source.collect_horse("41234").await.unwrap();

        assert_eq!(horse.ancestry_depth(), 4);

        let sire = horse.sire.as_ref().unwrap();
        assert_eq!(sire.link.as_deref(), Some("100"));
        assert_eq!(sire.sex, Some(Sex::Horse));
        assert_eq!(sire.country.as_deref(), Some("FR"));
        assert_eq!(sire.sire.as_ref().unwrap().link.as_deref(), Some("200"));
        // the unknown grandmother takes her ancestors with her
        assert!(sire.dam.is_none());

        let dam = horse.dam.as_ref().unwrap();
        assert_eq!(dam.link.as_deref(), Some("101"));
        assert_eq!(dam.sex, Some(Sex::Mare));
        let produce: Vec<_> = dam.offspring.iter().filter_map(|f| f.link.as_deref()).collect();
        assert_eq!(produce, ["901", "902"]);

        let tail_female = dam
            .dam
            .as_ref()
            .and_then(|d| d.dam.as_ref())
            .and_then(|d| d.dam.as_ref())
            .unwrap();
        assert_eq!(tail_female.link.as_deref(), Some("415"));
        assert_eq!(tail_female.offspring.len(), 1);
        assert_eq!(tail_female.offspring[0].link.as_deref(), Some("903"));
    }

    #[tokio::test]
    async fn test_missing_endpoint_fails() {
        let fetcher = StaticFetcher::default().with_page(
            format!("{}/Overview/?horseId=41234", BASE_URL),
            overview(),
        );
        let source = TrottingSource::new(&BELGIUM, Arc::new(fetcher));

        assert!(source.collect_horse("41234").await.is_err());
    }
}
