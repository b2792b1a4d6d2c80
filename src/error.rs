//! Error types for the scraping core.
//!
//! Normalization misses are not errors (they resolve to `None`); the variants
//! here are the failures a caller has to react to.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// An entity's identity field did not resolve, the entity is dropped
    #[error("{entity} has no {field}")]
    MissingIdentity {
        entity: &'static str,
        field: &'static str,
    },

    /// Ancestor cells do not match the site's fixed pedigree shape
    #[error("pedigree of {link} on {site}: expected {expected} cells, found {found}")]
    PedigreeShape {
        site: String,
        link: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown site: {0}")]
    UnknownSite(String),

    #[error("site {0} has no horse pages configured")]
    NoHorseSource(String),

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
