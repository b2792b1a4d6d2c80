//! Per-site configuration.
//!
//! Every federation site is described by one [`SiteConfig`]: the vocabularies
//! its pages use, the date/time/money conventions, the pedigree layout and
//! the selectors for its rendered horse pages. The engine has no per-site
//! code paths beyond what these tables express.

mod tables;

use crate::error::{Result, ScrapeError};
use crate::pedigree::PedigreeLayout;
use crate::types::{Breed, RaceType, Sex, StartMethod};

pub use tables::{
    BELGIUM, DENMARK, FINLAND, FRANCE, GERMANY, HOLLAND, NORWAY, SPAIN, SWEDEN,
};

/// All configured sites
pub static SITES: [&SiteConfig; 9] = [
    &SWEDEN, &NORWAY, &DENMARK, &FINLAND, &GERMANY, &FRANCE, &HOLLAND, &BELGIUM, &SPAIN,
];

/// Look up a site by id (case-insensitive)
pub fn site(id: &str) -> Result<&'static SiteConfig> {
    SITES
        .iter()
        .copied()
        .find(|s| s.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| ScrapeError::UnknownSite(id.to_string()))
}

/// How a vocabulary entry matches a raw token
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// Whole token, case-sensitive first, case-insensitive as a fallback
    Exact(&'static str),
    /// Lowercase substring of the lowercased token
    Contains(&'static str),
}

/// Marker kinds found in race time strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Gallop,
    DidNotFinish,
    Disqualified,
    Autostart,
    /// Consumed so shorter codes do not match inside it
    Ignore,
}

/// How a horse id is cut out of an href or label
#[derive(Debug, Clone, Copy)]
pub enum LinkRule {
    /// Text after `marker` up to the first `stop` character
    After {
        marker: &'static str,
        stop: &'static [char],
    },
    /// `count` path segments following the `marker` segment
    Segments { marker: &'static str, count: usize },
}

/// Which racetrack field names the raceday output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKey {
    Name,
    Code,
}

/// Where horse pages come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// api.travsport.se JSON endpoints
    Travsport,
    /// rikstoto.no JSON endpoints
    Rikstoto,
    /// HTML pages read with [`HtmlSelectors`]
    Html,
    /// trotting.be overview page plus its JSON endpoints
    Trotting,
}

#[derive(Debug, Clone, Copy)]
pub struct DateRules {
    /// Two-digit years below the pivot are 20xx, the rest 19xx
    pub two_digit_pivot: u32,
    /// A one or two digit value is an age, not a year
    pub age_is_birthyear: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct TimeRules {
    /// `"14,5"` means 1:14.5 (kilometer times published without minutes)
    pub implied_minute: bool,
    /// `"1142"` means 1:14.2
    pub compact_digits: bool,
    /// Stripped in order; longer codes must come before their substrings
    pub annotations: &'static [(&'static str, Annotation)],
}

#[derive(Debug, Clone, Copy)]
pub struct MoneyRules {
    pub thousands: &'static [char],
    pub decimal: char,
}

/// Field extraction for sites whose horse pages are HTML
#[derive(Debug, Clone, Copy)]
pub struct HtmlSelectors {
    /// Page URL templates, `{id}` is replaced with the horse id
    pub pages: &'static [&'static str],
    /// Form body posted to every page instead of a GET, `{id}` as above
    pub form: Option<&'static str>,
    /// Pages need a browser to render before they can be read
    pub rendered: bool,
    pub fields: &'static [(&'static str, FieldSelector)],
    pub pedigree: PedigreeCells,
    pub offspring: Option<OffspringRows>,
    pub offspring_list: Option<OffspringList>,
    /// Tables listing a tail-female dam's produce, in slot order
    pub produce_tables: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldSelector {
    /// Text of the first element matching the CSS selector
    Css(&'static str),
    /// Text following the element whose own text starts with the label
    AfterLabel(&'static str),
    /// Text following the first element matching the CSS selector
    After(&'static str),
    /// Text of the element after the labelled element's parent
    AfterParent(&'static str),
    /// Remainder of the first element whose own text starts with the prefix
    Prefixed(&'static str),
    /// Attribute of the first element matching the CSS selector
    Attr(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct PedigreeCells {
    pub cells: &'static str,
    /// Anchor inside the cell; `None` when the cell is the anchor
    pub anchor: Option<&'static str>,
    /// `None` when cells carry no ids; the name then stands in as the link
    pub link_attr: Option<&'static str>,
    /// Element holding the displayed name, relative to the anchor
    pub name: Option<&'static str>,
    /// Elements relative to the cell; the first one with digits is the birthdate
    pub birthdate: Option<&'static str>,
    /// Cells before the first ancestor, skipped in array order
    pub leading_cells: usize,
    /// Attribute carrying a `generation_position` key instead of array order
    pub keyed_by: Option<&'static str>,
    /// Cell text meaning "no ancestor"
    pub empty_text: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub struct OffspringRows {
    pub rows: &'static str,
    pub anchor: &'static str,
    pub link_attr: &'static str,
    /// Element holding the name, relative to the row
    pub name: &'static str,
    /// 1-based `td` columns
    pub birthdate_col: usize,
    pub sex_col: usize,
    pub registration_col: Option<usize>,
}

/// Offspring given as bare anchors next to a label
#[derive(Debug, Clone, Copy)]
pub struct OffspringList {
    pub label: &'static str,
    pub link_attr: &'static str,
}

/// Everything the engine needs to know about one source site
#[derive(Debug)]
pub struct SiteConfig {
    pub id: &'static str,
    pub country: &'static str,
    pub organisation: &'static str,
    pub source: SourceKind,

    pub sex: &'static [(Pattern, Sex)],
    pub breed: &'static [(Pattern, Breed)],
    pub startmethod: &'static [(Pattern, StartMethod)],
    pub default_startmethod: Option<StartMethod>,
    pub racetype: &'static [(Pattern, RaceType)],
    pub default_racetype: Option<RaceType>,
    pub monte_markers: &'static [&'static str],
    pub country_names: &'static [(&'static str, &'static str)],

    pub dates: DateRules,
    pub times: TimeRules,
    pub money: MoneyRules,
    pub show_odds_in_tenths: bool,
    /// Which half of a `"a/b"` distance string is the distance
    pub distance_slash_part: usize,

    pub disqualified_markers: &'static [&'static str],
    pub disqualified_exclusions: &'static [&'static str],
    pub scratch_markers: &'static [&'static str],
    pub approved_markers: &'static [&'static str],
    /// Tokens that turn an approval marker into a failed qualifier
    pub approved_negations: &'static [&'static str],
    pub unknown_breeder: &'static [&'static str],
    pub strip_licence: bool,
    pub link_rules: &'static [LinkRule],

    pub pedigree: PedigreeLayout,
    /// `(generation, position)` of dams whose produce is listed inline
    pub dam_offspring_slots: &'static [(u32, u32)],
    pub track_key: TrackKey,
    pub html: Option<HtmlSelectors>,
}

impl SiteConfig {
    /// Horses from this site whose name carries no country annotation
    pub fn home_country(&self) -> &'static str {
        self.country
    }
}
