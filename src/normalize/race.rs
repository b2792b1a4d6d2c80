//! Race and starter normalizers: times, money, odds, placings.

use regex::Regex;

use super::{before_paren, classify, lookup, squash};
use crate::sites::{Annotation, SiteConfig};
use crate::types::{RaceType, StartMethod};

/// A race time string split into its value and annotations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaceTime {
    /// Seconds, `None` when the string holds no usable time
    pub seconds: Option<f64>,
    pub gallop: bool,
    pub dnf: bool,
    pub disqualified: bool,
    pub autostart: bool,
    /// Disqualification codes and any letters no annotation accounted for
    pub disqstring: Option<String>,
}

/// Parse a race time such as `"1.14.2a"`, `"1'14\"2"`, `"14,5g"` or `"1142"`.
///
/// Annotation codes are stripped in the site's table order, so a code that
/// contains another one must be listed first.
pub fn parse_racetime(site: &SiteConfig, raw: &str) -> RaceTime {
    let mut result = RaceTime::default();

    let numeric: String = raw
        .chars()
        .map(|c| if is_time_char(c) { c } else { ' ' })
        .collect();
    let mut letters: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphabetic() { c } else { ' ' })
        .collect();

    let mut kept: Vec<&str> = Vec::new();
    for (code, annotation) in site.times.annotations {
        if !letters.contains(code) {
            continue;
        }

        match annotation {
            Annotation::Gallop => result.gallop = true,
            Annotation::DidNotFinish => result.dnf = true,
            Annotation::Disqualified => {
                result.disqualified = true;
                kept.push(*code);
            }
            Annotation::Autostart => result.autostart = true,
            Annotation::Ignore => {}
        }

        letters = letters.replace(code, " ");
    }

    let mut leftover: Vec<&str> = kept;
    leftover.extend(letters.split_whitespace());
    if !leftover.is_empty() {
        result.disqstring = Some(leftover.join(" "));
    }

    result.seconds = time_value(site, numeric.split_whitespace().next().unwrap_or(""));
    result
}

/// Seconds of a race time, annotations discarded
pub fn racetime(site: &SiteConfig, raw: &str) -> Option<f64> {
    parse_racetime(site, raw).seconds
}

fn is_time_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | ',' | '\'' | '"' | ':')
}

fn time_value(site: &SiteConfig, numeric: &str) -> Option<f64> {
    let parts: Vec<&str> = numeric
        .split(['.', ',', '\'', '"', ':'])
        .filter(|p| !p.is_empty())
        .collect();

    let seconds = match parts.as_slice() {
        [minutes, seconds, fraction] => {
            let minutes: u32 = minutes.parse().ok()?;
            let seconds: u32 = seconds.parse().ok()?;
            minutes.checked_mul(60)?.checked_add(seconds)? as f64 + fraction_of(fraction)?
        }
        [seconds, fraction] => {
            let seconds: u32 = seconds.parse().ok()?;
            let minute = if site.times.implied_minute && seconds < 60 {
                60
            } else {
                0
            };
            (minute + seconds) as f64 + fraction_of(fraction)?
        }
        [digits] if site.times.compact_digits && digits.len() == 4 => {
            let value: u32 = digits.parse().ok()?;
            if value > 9000 {
                return None;
            }
            let minutes = value / 1000;
            let seconds = (value % 1000) / 10;
            (minutes * 60 + seconds) as f64 + (value % 10) as f64 / 10.0
        }
        [digits] => digits.parse::<u32>().ok()? as f64,
        _ => return None,
    };

    if seconds > 0.0 {
        Some(seconds)
    } else {
        None
    }
}

fn fraction_of(digits: &str) -> Option<f64> {
    let value: u32 = digits.parse().ok()?;
    Some(value as f64 / 10f64.powi(digits.len() as i32))
}

/// Whole currency units; ranges `"a-b-c"` are summed, anything unreadable is 0
pub fn purse(site: &SiteConfig, raw: &str) -> i64 {
    let paren_re = Regex::new(r"\([^)]*\)").unwrap();
    let text = paren_re.replace_all(raw, "");
    let text = match text.rfind(':') {
        Some(i) => &text[i + 1..],
        None => &text[..],
    };

    text.split('-')
        .map(|part| amount(site, part))
        .fold(0, i64::saturating_add)
}

fn amount(site: &SiteConfig, part: &str) -> i64 {
    let cleaned: String = part
        .chars()
        .filter(|c| !site.money.thousands.contains(c))
        .collect();
    let whole = cleaned
        .split(site.money.decimal)
        .next()
        .unwrap_or_default();
    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();

    digits.parse().unwrap_or(0)
}

/// Decimal odds; a parenthesized value is unwrapped
pub fn odds(raw: &str) -> Option<f64> {
    let text = raw.trim().replace(",,", ",");
    if text.is_empty() || text == "-" {
        return None;
    }

    let text = text.trim_start_matches('(').trim_end_matches(')');
    text.trim().replace(',', ".").parse().ok()
}

/// Show odds, published in tenths by some sites
pub fn show_odds(site: &SiteConfig, raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let in_tenths = site.show_odds_in_tenths
        && !trimmed.is_empty()
        && trimmed.chars().all(|c| c.is_ascii_digit());

    let value = odds(trimmed)?;
    Some(if in_tenths { value / 10.0 } else { value })
}

/// Meters from `"2140"`, `"2140/1"`, `"Distans: 2.140 m"` or running text
pub fn distance(site: &SiteConfig, raw: &str) -> Option<u32> {
    let mut text = raw.trim();

    if let Some(i) = text.find(':') {
        text = &text[i + 1..];
    }
    if text.contains('/') {
        text = text.split('/').nth(site.distance_slash_part)?;
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '.' | 'm' | ' ' | '\u{a0}'))
        .collect();
    if !cleaned.is_empty() && cleaned.chars().all(|c| c.is_ascii_digit()) {
        return cleaned.parse().ok().filter(|d| *d > 0);
    }

    let text_re = Regex::new(r"(\d\s?\d{3})\s?m").unwrap();
    let caps = text_re.captures(raw)?;
    caps[1].replace(' ', "").parse().ok()
}

/// Post position from `"1/2140"`, `"2140:5"` or a bare number
pub fn postposition(raw: &str) -> Option<u32> {
    let text = raw.trim();

    let number = if let Some(i) = text.find(':') {
        &text[i + 1..]
    } else if let Some(i) = text.find('/') {
        &text[..i]
    } else if text.len() <= 2 {
        text
    } else {
        return None;
    };

    number.trim().parse().ok()
}

/// Placing, 0 when the horse did not place or the text is not a placing
pub fn finish(raw: &str) -> u32 {
    before_paren(raw)
        .trim()
        .trim_end_matches('.')
        .parse()
        .unwrap_or(0)
}

/// First number in the text
pub fn racenumber(raw: &str) -> Option<u32> {
    let re = Regex::new(r"\d+").unwrap();
    re.find(raw)?.as_str().parse().ok()
}

/// Whether the starter actually started
pub fn started(site: &SiteConfig, raw: &str) -> bool {
    let lower = raw.trim().to_lowercase();
    !site.scratch_markers.iter().any(|marker| {
        let marker = marker.to_lowercase();
        lower == marker || lower.starts_with(&format!("{} ", marker))
    })
}

pub fn disqualified(site: &SiteConfig, raw: &str) -> bool {
    site.disqualified_markers.iter().any(|m| raw.contains(m))
        && !site.disqualified_exclusions.iter().any(|e| raw.contains(e))
}

/// Qualifier result: passed unless negated
pub fn approved(site: &SiteConfig, raw: &str) -> bool {
    let lower = raw.to_lowercase();
    if site.approved_negations.iter().any(|n| lower.contains(n)) {
        return false;
    }

    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| site.approved_markers.contains(&token))
}

pub fn startmethod(site: &SiteConfig, raw: &str) -> Option<StartMethod> {
    lookup(site.startmethod, raw).or_else(|| {
        if site.default_startmethod.is_none() {
            classify(site, "startmethod", site.startmethod, raw)
        } else {
            site.default_startmethod
        }
    })
}

pub fn racetype(site: &SiteConfig, raw: &str) -> Option<RaceType> {
    lookup(site.racetype, raw).or(site.default_racetype)
}

/// Under-saddle race
pub fn monte(site: &SiteConfig, raw: &str) -> bool {
    let lower = raw.to_lowercase();
    site.monte_markers.iter().any(|m| lower.contains(m))
}

/// Driver or trainer name without a trailing licence letter
pub fn remove_licence(raw: &str) -> String {
    let name = squash(raw);
    let mut chars = name.chars().rev();

    match (chars.next(), chars.next()) {
        (Some(last), Some(' ')) if last.is_lowercase() => {
            name[..name.len() - last.len_utf8() - 1].to_string()
        }
        _ => name,
    }
}
