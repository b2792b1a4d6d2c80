//! Locale text normalizers.
//!
//! Each normalizer maps one raw source string to a canonical value. They never
//! fail: input that cannot be classified resolves to `None` (or the field's
//! documented default) so partial records still come out. Site differences
//! live in [`SiteConfig`] tables, not in code paths.

pub mod horse;
pub mod race;

use chrono::{NaiveDate, Utc};
use tracing::warn;

use crate::sites::{Pattern, SiteConfig};

/// What a normalizer may depend on besides its input
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub site: &'static SiteConfig,
    /// Reference date for age-based birth years and collection dates
    pub today: NaiveDate,
}

impl Context {
    pub fn new(site: &'static SiteConfig) -> Self {
        Self {
            site,
            today: Utc::now().date_naive(),
        }
    }

    pub fn with_today(site: &'static SiteConfig, today: NaiveDate) -> Self {
        Self { site, today }
    }
}

/// Match a raw token against a vocabulary.
///
/// Exact entries are tried case-sensitively, then case-insensitively;
/// substring entries last.
pub fn lookup<T: Copy>(table: &[(Pattern, T)], raw: &str) -> Option<T> {
    let token = raw.trim();
    if token.is_empty() {
        return None;
    }

    let exact = table.iter().find_map(|(pattern, value)| match pattern {
        Pattern::Exact(text) if *text == token => Some(*value),
        _ => None,
    });
    if exact.is_some() {
        return exact;
    }

    let folded = table.iter().find_map(|(pattern, value)| match pattern {
        Pattern::Exact(text) if text.to_lowercase() == token.to_lowercase() => Some(*value),
        _ => None,
    });
    if folded.is_some() {
        return folded;
    }

    let lower = token.to_lowercase();
    table.iter().find_map(|(pattern, value)| match pattern {
        Pattern::Contains(text) if lower.contains(*text) => Some(*value),
        _ => None,
    })
}

/// [`lookup`] that logs misses against the site
pub(crate) fn classify<T: Copy>(
    site: &SiteConfig,
    field: &str,
    table: &[(Pattern, T)],
    raw: &str,
) -> Option<T> {
    let value = lookup(table, raw);
    if value.is_none() && !raw.trim().is_empty() {
        warn!("Unknown {} on {}: {:?}", field, site.id, raw.trim());
    }
    value
}

/// Cut everything from the first opening parenthesis
pub(crate) fn before_paren(raw: &str) -> &str {
    match raw.find('(') {
        Some(i) => &raw[..i],
        None => raw,
    }
}

/// Collapse runs of whitespace into single spaces
pub(crate) fn squash(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
