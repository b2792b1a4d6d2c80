//! Horse attribute normalizers.

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::{before_paren, classify, squash, Context};
use crate::sites::{LinkRule, SiteConfig};
use crate::types::{Breed, Sex};

/// Backticks become apostrophes; death and import marks are dropped
pub fn clean_name(raw: &str) -> String {
    raw.replace('`', "'").replace(['†', '*'], "")
}

/// Uppercase name without its country annotation
pub fn name(raw: &str) -> Option<String> {
    let cut = raw.find(['(', '[']).map_or(raw, |i| &raw[..i]);
    let name = squash(&clean_name(cut)).to_uppercase();

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Two-letter country code from a name annotation or a country field.
///
/// Falls back to the site's home country when the text carries no country.
pub fn country(site: &SiteConfig, raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if text.chars().count() == 2 && text.chars().all(char::is_alphabetic) {
        return Some(text.to_uppercase());
    }

    let annotation_re = Regex::new(r"[(\[]\s*([^)\]]+?)\s*[)\]]").unwrap();
    if let Some(caps) = annotation_re.captures(text) {
        return code_of(site, &caps[1]);
    }

    let suffixed_re = Regex::new(r"^([A-Za-z]{2})\d+$").unwrap();
    if let Some(caps) = suffixed_re.captures(text) {
        return Some(caps[1].to_uppercase());
    }

    let lower = text.to_lowercase();
    if let Some((_, code)) = site.country_names.iter().find(|(name, _)| *name == lower) {
        return Some(code.to_string());
    }

    Some(site.home_country().to_string())
}

fn code_of(site: &SiteConfig, annotation: &str) -> Option<String> {
    let letters: String = annotation
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect::<String>()
        .trim()
        .to_string();

    if letters.chars().count() == 2 && letters.chars().all(char::is_alphabetic) {
        return Some(letters.to_uppercase());
    }

    let lower = letters.to_lowercase();
    site.country_names
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, code)| code.to_string())
}

/// ISO birthdate from a year, a day-month-year date, an ISO date or an age
pub fn birthdate(ctx: &Context, raw: &str) -> Option<String> {
    let text = before_paren(raw).trim();
    let rules = &ctx.site.dates;

    let iso_re = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").unwrap();
    if let Some(caps) = iso_re.captures(text) {
        return ymd(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?);
    }

    if text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()) {
        return ymd(text.parse().ok()?, 1, 1);
    }

    if rules.age_is_birthyear && (1..=2).contains(&text.len()) {
        if let Ok(age) = text.parse::<i32>() {
            return ymd(ctx.today.year() - age, 1, 1);
        }
    }

    let dmy_re = Regex::new(r"^(\d{1,2})[./-](\d{1,2})[./-](\d{4}|\d{2})$").unwrap();
    let caps = dmy_re.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let mut year: i32 = caps[3].parse().ok()?;

    if caps[3].len() == 2 {
        year += if (year as u32) < rules.two_digit_pivot {
            2000
        } else {
            1900
        };
    }

    ymd(year, month, day)
}

fn ymd(year: i32, month: u32, day: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%Y-%m-%d").to_string())
}

pub fn sex(site: &SiteConfig, raw: &str) -> Option<Sex> {
    let mut token = raw.trim().trim_end_matches(',').trim();

    // "Merrie (M)"
    if let (Some(open), Some(close)) = (token.find('('), token.find(')')) {
        if open < close {
            token = token[open + 1..close].trim();
        }
    }

    classify(site, "sex", site.sex, token)
}

pub fn breed(site: &SiteConfig, raw: &str) -> Option<Breed> {
    classify(site, "breed", site.breed, raw)
}

/// Universal equine life number, only when well formed
pub fn ueln(raw: &str) -> Option<String> {
    let value: String = raw.split_whitespace().collect();

    if value.chars().count() == 15 && value.chars().all(char::is_alphanumeric) {
        Some(value.to_uppercase())
    } else {
        None
    }
}

pub fn breeder(site: &SiteConfig, raw: &str) -> Option<String> {
    let value = squash(raw);
    let lower = value.to_lowercase();

    if value.is_empty() || site.unknown_breeder.iter().any(|token| *token == lower) {
        None
    } else {
        Some(value)
    }
}

/// Trimmed text, `None` when nothing is left
pub fn text(raw: &str) -> Option<String> {
    let value = squash(raw);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Site-local horse id from an id, an href or a labelled string
pub fn link(site: &SiteConfig, raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    let is_id = !value.contains(['/', '?', '=', ':']) && !value.contains(char::is_whitespace);
    if is_id {
        return Some(value.to_string());
    }

    site.link_rules
        .iter()
        .find_map(|rule| apply_link_rule(rule, value))
}

fn apply_link_rule(rule: &LinkRule, value: &str) -> Option<String> {
    let id = match rule {
        LinkRule::After { marker, stop } => {
            let start = value.find(marker)? + marker.len();
            let rest = value[start..].trim_start();
            let end = rest.find(*stop).unwrap_or(rest.len());
            rest[..end].trim().to_string()
        }
        LinkRule::Segments { marker, count } => {
            let segments: Vec<&str> = value.split('/').collect();
            let at = segments.iter().position(|s| s == marker)?;
            let taken: Vec<&str> = segments
                .iter()
                .skip(at + 1)
                .take(*count)
                .map(|s| s.split(['?', '#']).next().unwrap_or_default())
                .filter(|s| !s.is_empty())
                .collect();

            if taken.len() < *count {
                return None;
            }
            taken.join("/")
        }
    };

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::{DENMARK, FINLAND, FRANCE, GERMANY, HOLLAND, SPAIN, SWEDEN};

    fn ctx(site: &'static SiteConfig) -> Context {
        Context::with_today(site, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn test_name() {
        assert_eq!(name("Storm Bird (FR)").as_deref(), Some("STORM BIRD"));
        assert_eq!(name("Zola Boko [DE]").as_deref(), Some("ZOLA BOKO"));
        assert_eq!(name("*Ready`s  Cash†").as_deref(), Some("READY'S CASH"));
        assert_eq!(name(" (US)"), None);
    }

    #[test]
    fn test_name_idempotent() {
        let once = name("Storm Bird (FR)").unwrap();
        assert_eq!(name(&once).unwrap(), once);
    }

    #[test]
    fn test_country_from_annotation() {
        assert_eq!(country(&SWEDEN, "Storm Bird (FR)").as_deref(), Some("FR"));
        assert_eq!(country(&GERMANY, "Zola Boko [it]").as_deref(), Some("IT"));
        assert_eq!(country(&SWEDEN, "Storm Bird").as_deref(), Some("SE"));
        assert_eq!(country(&SWEDEN, "US").as_deref(), Some("US"));
    }

    #[test]
    fn test_country_suffix_digits() {
        assert_eq!(country(&HOLLAND, "NL12").as_deref(), Some("NL"));
        assert_eq!(country(&GERMANY, "Cash Hall (DE2)").as_deref(), Some("DE"));
    }

    #[test]
    fn test_country_localized() {
        assert_eq!(country(&FINLAND, "Ranska").as_deref(), Some("FR"));
        assert_eq!(country(&FINLAND, "Suomi").as_deref(), Some("FI"));
    }

    #[test]
    fn test_birthdate_year_only() {
        assert_eq!(birthdate(&ctx(&SWEDEN), "1998").as_deref(), Some("1998-01-01"));
    }

    #[test]
    fn test_birthdate_two_digit_pivot() {
        assert_eq!(birthdate(&ctx(&SWEDEN), "15.03.02").as_deref(), Some("2002-03-15"));
        assert_eq!(birthdate(&ctx(&SWEDEN), "15.03.75").as_deref(), Some("1975-03-15"));
        // Denmark pivots at 8
        assert_eq!(birthdate(&ctx(&DENMARK), "15.03.07").as_deref(), Some("2007-03-15"));
        assert_eq!(birthdate(&ctx(&DENMARK), "15.03.09").as_deref(), Some("1909-03-15"));
    }

    #[test]
    fn test_birthdate_formats() {
        let ctx = ctx(&DENMARK);
        assert_eq!(birthdate(&ctx, "2015-04-30").as_deref(), Some("2015-04-30"));
        assert_eq!(birthdate(&ctx, "2015-04-30T00:00:00").as_deref(), Some("2015-04-30"));
        assert_eq!(birthdate(&ctx, "1.2.2010").as_deref(), Some("2010-02-01"));
        assert_eq!(birthdate(&ctx, "01/02/2010").as_deref(), Some("2010-02-01"));
        assert_eq!(birthdate(&ctx, "2010 (10 år)").as_deref(), Some("2010-01-01"));
        assert_eq!(birthdate(&ctx, "31.02.2010"), None);
        assert_eq!(birthdate(&ctx, "unknown"), None);
    }

    #[test]
    fn test_birthdate_from_age() {
        assert_eq!(birthdate(&ctx(&HOLLAND), "7").as_deref(), Some("2017-01-01"));
        // only sites that publish ages
        assert_eq!(birthdate(&ctx(&SWEDEN), "7"), None);
    }

    #[test]
    fn test_sex() {
        assert_eq!(sex(&SWEDEN, "S"), Some(Sex::Mare));
        assert_eq!(sex(&SWEDEN, "mare"), Some(Sex::Mare));
        assert_eq!(sex(&FINLAND, "ruuna"), Some(Sex::Gelding));
        assert_eq!(sex(&HOLLAND, "Merrie (M)"), Some(Sex::Mare));
        assert_eq!(sex(&SPAIN, "Macho Castrado"), Some(Sex::Gelding));
        assert_eq!(sex(&DENMARK, "okänd"), None);
    }

    #[test]
    fn test_sex_case_sensitive_first() {
        // Spanish H is a mare, German H a stallion
        assert_eq!(sex(&SPAIN, "H"), Some(Sex::Mare));
        assert_eq!(sex(&GERMANY, "H"), Some(Sex::Horse));
    }

    #[test]
    fn test_breed() {
        assert_eq!(breed(&SWEDEN, "Varmblodig travare"), Some(Breed::Standardbred));
        assert_eq!(breed(&SWEDEN, "K"), Some(Breed::Coldblood));
        assert_eq!(breed(&FINLAND, "suomenhevonen"), Some(Breed::Coldblood));
        assert_eq!(breed(&FINLAND, "coldblood"), Some(Breed::Coldblood));
    }

    #[test]
    fn test_ueln() {
        assert_eq!(ueln("752004004123456").as_deref(), Some("752004004123456"));
        assert_eq!(ueln("75200400412345"), None);
        assert_eq!(ueln("752-04004123456"), None);
    }

    #[test]
    fn test_breeder() {
        assert_eq!(
            breeder(&SWEDEN, " Menhammar  Stuteri AB ").as_deref(),
            Some("Menhammar Stuteri AB")
        );
        assert_eq!(breeder(&SWEDEN, "Okänd"), None);
        assert_eq!(breeder(&SWEDEN, ""), None);
    }

    #[test]
    fn test_link() {
        assert_eq!(link(&SWEDEN, "745632").as_deref(), Some("745632"));
        assert_eq!(link(&DENMARK, "../hast/visa/12345").as_deref(), Some("12345"));
        assert_eq!(link(&DENMARK, "../54321").as_deref(), Some("54321"));
        let finnish = "/heppa/horse/FamilyInfo,$HorseLink.$DirectLink.sdirect?sp=l1234567890&sp=X";
        assert_eq!(link(&FINLAND, finnish).as_deref(), Some("1234567890"));
        assert_eq!(
            link(&FRANCE, "https://www.letrot.com/stats/fiche-cheval/bold-eagle/ZDAyMQ/courses")
                .as_deref(),
            Some("bold-eagle/ZDAyMQ")
        );
        assert_eq!(link(&GERMANY, "ID: 98765").as_deref(), Some("98765"));
        assert_eq!(link(&SPAIN, "ficha.php?idcaballo=77&x=1").as_deref(), Some("77"));
        assert_eq!(link(&SWEDEN, "https://example.org/nothing"), None);
    }
}
