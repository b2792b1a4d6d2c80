//! Declarative field tables for every record type.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::steps::{self, Step};
use crate::types::{
    HorseRecord, RaceRecord, RacedayRecord, StartRecord, StarterRecord, YearlySummary,
};

/// How the post-chain values of one field reduce to its final value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// First value wins
    First,
    /// All string values joined with the separator
    Join(&'static str),
    /// All values kept as a list
    Collect,
}

pub struct FieldRule {
    pub name: &'static str,
    pub chain: &'static [Step],
    pub aggregate: Aggregate,
    /// Raw values are fragments of this entity rather than text
    pub nested: Option<&'static Schema>,
}

pub struct Schema {
    pub entity: &'static str,
    /// Field that must resolve for the entity to exist
    pub identity: Option<&'static str>,
    pub fields: &'static [FieldRule],
    /// Whether a loaded entity decodes into its record type
    pub decodes: fn(&Value) -> serde_json::Result<()>,
}

fn decodes<T: DeserializeOwned>(value: &Value) -> serde_json::Result<()> {
    <T as Deserialize>::deserialize(value).map(drop)
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&'static FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }
}

macro_rules! first {
    ($name:literal, $($step:path),+) => {
        FieldRule {
            name: $name,
            chain: &[$($step),+],
            aggregate: Aggregate::First,
            nested: None,
        }
    };
}

macro_rules! one {
    ($name:literal, $schema:ident) => {
        FieldRule {
            name: $name,
            chain: &[],
            aggregate: Aggregate::First,
            nested: Some(&$schema),
        }
    };
}

macro_rules! many {
    ($name:literal, $schema:ident) => {
        FieldRule {
            name: $name,
            chain: &[],
            aggregate: Aggregate::Collect,
            nested: Some(&$schema),
        }
    };
}

static HORSE_FIELDS: [FieldRule; 16] = [
    first!("link", steps::link),
    first!("name", steps::name),
    first!("country", steps::country),
    first!("birthdate", steps::date),
    first!("sex", steps::sex),
    first!("breed", steps::breed),
    first!("registration", steps::text),
    first!("ueln", steps::ueln),
    first!("chip", steps::text),
    first!("breeder", steps::breeder),
    first!("collection_date", steps::date),
    one!("sire", HORSE),
    one!("dam", HORSE),
    many!("offspring", HORSE),
    many!("starts", START),
    many!("start_summary", SUMMARY),
];

pub static HORSE: Schema = Schema {
    entity: "horse",
    identity: Some("link"),
    fields: &HORSE_FIELDS,
    decodes: decodes::<HorseRecord>,
};

static START_FIELDS: [FieldRule; 23] = [
    first!("racedate", steps::date),
    first!("racetrack", steps::text),
    first!("racetrack_code", steps::text),
    first!("link", steps::text),
    first!("racenumber", steps::integer),
    first!("startnumber", steps::integer),
    first!("postposition", steps::postposition),
    first!("distance", steps::distance),
    first!("startmethod", steps::startmethod),
    first!("monte", steps::monte),
    first!("racetype", steps::racetype),
    first!("started", steps::started),
    first!("finish", steps::finish),
    first!("racetime", steps::racetime),
    first!("gallop", steps::gallop),
    first!("dnf", steps::dnf),
    first!("disqualified", steps::disqualified),
    first!("disqstring", steps::disqstring),
    first!("approved", steps::approved),
    first!("driver", steps::person),
    first!("trainer", steps::person),
    first!("purse", steps::purse),
    first!("ev_odds", steps::odds),
];

pub static START: Schema = Schema {
    entity: "start",
    identity: None,
    fields: &START_FIELDS,
    decodes: decodes::<StartRecord>,
};

static SUMMARY_FIELDS: [FieldRule; 9] = [
    first!("year", steps::integer),
    first!("starts", steps::integer),
    first!("wins", steps::integer),
    first!("place", steps::integer),
    first!("show", steps::integer),
    first!("purse", steps::purse),
    first!("mark", steps::text),
    first!("standing_mark", steps::text),
    first!("mobile_mark", steps::text),
];

pub static SUMMARY: Schema = Schema {
    entity: "start summary",
    identity: Some("year"),
    fields: &SUMMARY_FIELDS,
    decodes: decodes::<YearlySummary>,
};

static RACEDAY_FIELDS: [FieldRule; 8] = [
    first!("date", steps::date),
    first!("racetrack", steps::text),
    first!("racetrack_code", steps::text),
    first!("country", steps::country),
    first!("link", steps::text),
    first!("status", steps::status),
    first!("collection_date", steps::date),
    many!("races", RACE),
];

pub static RACEDAY: Schema = Schema {
    entity: "raceday",
    identity: Some("date"),
    fields: &RACEDAY_FIELDS,
    decodes: decodes::<RacedayRecord>,
};

static RACE_FIELDS: [FieldRule; 12] = [
    first!("racenumber", steps::integer),
    first!("racename", steps::text),
    first!("link", steps::text),
    first!("status", steps::status),
    first!("distance", steps::distance),
    first!("purse", steps::purse),
    first!("monte", steps::monte),
    first!("startmethod", steps::startmethod),
    first!("racetype", steps::racetype),
    first!("track_condition", steps::text),
    FieldRule {
        name: "conditions",
        chain: &[steps::text],
        aggregate: Aggregate::Join("\n"),
        nested: None,
    },
    many!("starters", STARTER),
];

pub static RACE: Schema = Schema {
    entity: "race",
    identity: Some("racenumber"),
    fields: &RACE_FIELDS,
    decodes: decodes::<RaceRecord>,
};

static STARTER_FIELDS: [FieldRule; 19] = [
    first!("order", steps::integer),
    first!("startnumber", steps::integer),
    first!("postposition", steps::postposition),
    first!("distance", steps::distance),
    first!("racetime", steps::racetime),
    first!("driver", steps::person),
    first!("trainer", steps::person),
    first!("purse", steps::purse),
    first!("odds", steps::odds),
    first!("ev_odds", steps::odds),
    first!("show_odds", steps::show_odds),
    first!("finish", steps::finish),
    first!("started", steps::started),
    first!("disqualified", steps::disqualified),
    first!("disqstring", steps::disqstring),
    first!("gallop", steps::gallop),
    first!("dnf", steps::dnf),
    first!("approved", steps::approved),
    one!("horse", HORSE),
];

pub static STARTER: Schema = Schema {
    entity: "starter",
    identity: None,
    fields: &STARTER_FIELDS,
    decodes: decodes::<StarterRecord>,
};

/// Every schema, for field lookups by name
pub static SCHEMAS: [&Schema; 6] = [&HORSE, &START, &SUMMARY, &RACEDAY, &RACE, &STARTER];
