//! Canonical record shapes shared by every site.
//!
//! All optional fields are skipped when unset so that emitted documents only
//! carry the keys a source actually resolved.

use serde::{Deserialize, Serialize};

/// Horse gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Horse,
    Mare,
    Gelding,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Horse => "horse",
            Sex::Mare => "mare",
            Sex::Gelding => "gelding",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breed {
    Standardbred,
    Coldblood,
    Thoroughbred,
}

impl Breed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Breed::Standardbred => "standardbred",
            Breed::Coldblood => "coldblood",
            Breed::Thoroughbred => "thoroughbred",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartMethod {
    Standing,
    Mobile,
    Line,
}

impl StartMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            StartMethod::Standing => "standing",
            StartMethod::Mobile => "mobile",
            StartMethod::Line => "line",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaceType {
    Race,
    Qualifier,
    Premium,
}

impl RaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaceType::Race => "race",
            RaceType::Qualifier => "qualifier",
            RaceType::Premium => "premium",
        }
    }
}

/// Publication state of a raceday, also the output partition it lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RacedayStatus {
    Startlist,
    Result,
    Cancelled,
}

impl RacedayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RacedayStatus::Startlist => "startlist",
            RacedayStatus::Result => "result",
            RacedayStatus::Cancelled => "cancelled",
        }
    }
}

/// A horse with its ancestry, produce and racing career.
///
/// `sire` and `dam` are owned: the ancestor tree is built bottom-up and each
/// node belongs to exactly one child. `offspring` is a denormalized listing of
/// horses that are materialized on their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HorseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<Breed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ueln: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breeder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sire: Option<Box<HorseRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dam: Option<Box<HorseRecord>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offspring: Vec<HorseRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub starts: Vec<StartRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub start_summary: Vec<YearlySummary>,
}

impl HorseRecord {
    pub fn is_mare(&self) -> bool {
        self.sex == Some(Sex::Mare)
    }

    /// Number of generations below this node, counting the node itself as 0
    pub fn ancestry_depth(&self) -> usize {
        let sire = self.sire.as_ref().map_or(0, |s| 1 + s.ancestry_depth());
        let dam = self.dam.as_ref().map_or(0, |d| 1 + d.ancestry_depth());
        sire.max(dam)
    }
}

/// One year of racing (year 0 is the lifetime total)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    #[serde(default)]
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wins: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purse: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standing_mark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_mark: Option<String>,
}

/// A start as seen from the horse's career page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racedate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racetrack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racetrack_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racenumber: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startnumber: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postposition: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startmethod: Option<StartMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monte: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racetype: Option<RaceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racetime: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnf: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disqualified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disqstring: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purse: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ev_odds: Option<f64>,
}

/// One day's card at one track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RacedayRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racetrack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racetrack_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RacedayStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub races: Vec<RaceRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racenumber: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RacedayStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purse: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monte: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startmethod: Option<StartMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racetype: Option<RaceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub starters: Vec<StarterRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StarterRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startnumber: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postposition: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racetime: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purse: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ev_odds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_odds: Option<f64>,
    #[serde(default)]
    pub finish: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disqualified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disqstring: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnf: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horse: Option<HorseRecord>,
}
