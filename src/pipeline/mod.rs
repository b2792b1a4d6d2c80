//! Field coercion pipeline: per-field normalizer chains and record loading.

mod loader;
mod schema;
mod steps;

pub use loader::{build_fragment, load_fragment, Loader};
pub use schema::{
    Aggregate, FieldRule, Schema, HORSE, RACE, RACEDAY, SCHEMAS, START, STARTER, SUMMARY,
};
pub use steps::Step;
