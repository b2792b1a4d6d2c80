//! Chain steps: adapters from raw JSON values to the text normalizers.
//!
//! Strings are normalized; values that already have the canonical type
//! (numbers for numeric fields, booleans for flags) pass through untouched.

use serde_json::Value;

use crate::normalize::{horse, race, Context};

/// One link of a field chain; `None` drops the value
pub type Step = fn(&Context, Value) -> Option<Value>;

/// Text of a string or number value
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string(value: Option<String>) -> Option<Value> {
    value.map(Value::String)
}

fn number<T: Into<serde_json::Number>>(value: Option<T>) -> Option<Value> {
    value.map(|v| Value::Number(v.into()))
}

/// Counts and positions fit every integer record field
fn count(value: Option<u64>) -> Option<Value> {
    number(value.filter(|v| *v <= i32::MAX as u64))
}

fn count_of(n: &serde_json::Number) -> Option<Value> {
    count(n.as_u64())
}

fn float(value: Option<f64>) -> Option<Value> {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

fn flag(value: &Value, parse: impl Fn(&str) -> bool) -> Option<Value> {
    match value {
        Value::Bool(b) => Some(Value::Bool(*b)),
        Value::String(s) => Some(Value::Bool(parse(s))),
        _ => None,
    }
}

pub fn text(_: &Context, value: Value) -> Option<Value> {
    string(horse::text(&as_text(&value)?))
}

pub fn name(_: &Context, value: Value) -> Option<Value> {
    string(horse::name(&as_text(&value)?))
}

pub fn country(ctx: &Context, value: Value) -> Option<Value> {
    string(horse::country(ctx.site, &as_text(&value)?))
}

pub fn date(ctx: &Context, value: Value) -> Option<Value> {
    string(horse::birthdate(ctx, &as_text(&value)?))
}

pub fn sex(ctx: &Context, value: Value) -> Option<Value> {
    let sex = horse::sex(ctx.site, &as_text(&value)?)?;
    Some(Value::String(sex.as_str().to_string()))
}

pub fn breed(ctx: &Context, value: Value) -> Option<Value> {
    let breed = horse::breed(ctx.site, &as_text(&value)?)?;
    Some(Value::String(breed.as_str().to_string()))
}

pub fn ueln(_: &Context, value: Value) -> Option<Value> {
    string(horse::ueln(&as_text(&value)?))
}

pub fn breeder(ctx: &Context, value: Value) -> Option<Value> {
    string(horse::breeder(ctx.site, &as_text(&value)?))
}

pub fn link(ctx: &Context, value: Value) -> Option<Value> {
    string(horse::link(ctx.site, &as_text(&value)?))
}

pub fn person(_: &Context, value: Value) -> Option<Value> {
    let name = race::remove_licence(&as_text(&value)?);
    string(horse::text(&name))
}

pub fn racetime(ctx: &Context, value: Value) -> Option<Value> {
    match value {
        Value::Number(n) => n.as_f64().filter(|t| *t > 0.0).and_then(|t| float(Some(t))),
        Value::String(s) => float(race::racetime(ctx.site, &s)),
        _ => None,
    }
}

pub fn gallop(ctx: &Context, value: Value) -> Option<Value> {
    flag(&value, |s| race::parse_racetime(ctx.site, s).gallop)
}

pub fn dnf(ctx: &Context, value: Value) -> Option<Value> {
    flag(&value, |s| race::parse_racetime(ctx.site, s).dnf)
}

pub fn disqualified(ctx: &Context, value: Value) -> Option<Value> {
    flag(&value, |s| {
        race::disqualified(ctx.site, s) || race::parse_racetime(ctx.site, s).disqualified
    })
}

pub fn disqstring(ctx: &Context, value: Value) -> Option<Value> {
    string(race::parse_racetime(ctx.site, &as_text(&value)?).disqstring)
}

pub fn started(ctx: &Context, value: Value) -> Option<Value> {
    flag(&value, |s| race::started(ctx.site, s))
}

pub fn approved(ctx: &Context, value: Value) -> Option<Value> {
    flag(&value, |s| race::approved(ctx.site, s))
}

pub fn monte(ctx: &Context, value: Value) -> Option<Value> {
    flag(&value, |s| race::monte(ctx.site, s))
}

pub fn purse(ctx: &Context, value: Value) -> Option<Value> {
    match value {
        Value::Number(n) => n.as_f64().map(|p| Value::from(p as i64)),
        Value::String(s) => Some(Value::from(race::purse(ctx.site, &s))),
        _ => None,
    }
}

pub fn odds(_: &Context, value: Value) -> Option<Value> {
    match value {
        Value::Number(n) => float(n.as_f64()),
        Value::String(s) => float(race::odds(&s)),
        _ => None,
    }
}

pub fn show_odds(ctx: &Context, value: Value) -> Option<Value> {
    match value {
        Value::Number(n) => float(n.as_f64()),
        Value::String(s) => float(race::show_odds(ctx.site, &s)),
        _ => None,
    }
}

pub fn distance(ctx: &Context, value: Value) -> Option<Value> {
    match value {
        Value::Number(n) => count(n.as_u64().filter(|d| *d > 0)),
        Value::String(s) => count(race::distance(ctx.site, &s).map(u64::from)),
        _ => None,
    }
}

pub fn postposition(_: &Context, value: Value) -> Option<Value> {
    match value {
        Value::Number(n) => count_of(&n),
        Value::String(s) => count(race::postposition(&s).map(u64::from)),
        _ => None,
    }
}

/// First integer in the value, for race and start numbers
pub fn integer(_: &Context, value: Value) -> Option<Value> {
    match value {
        Value::Number(n) => count_of(&n),
        Value::String(s) => count(race::racenumber(&s).map(u64::from)),
        _ => None,
    }
}

pub fn finish(_: &Context, value: Value) -> Option<Value> {
    match value {
        Value::Number(n) => count_of(&n),
        Value::String(s) => count(Some(u64::from(race::finish(&s)))),
        _ => None,
    }
}

pub fn startmethod(ctx: &Context, value: Value) -> Option<Value> {
    let method = race::startmethod(ctx.site, &as_text(&value)?)?;
    Some(Value::String(method.as_str().to_string()))
}

pub fn racetype(ctx: &Context, value: Value) -> Option<Value> {
    let racetype = race::racetype(ctx.site, &as_text(&value)?)?;
    Some(Value::String(racetype.as_str().to_string()))
}

pub fn status(_: &Context, value: Value) -> Option<Value> {
    let status = as_text(&value)?.trim().to_lowercase();
    match status.as_str() {
        "startlist" | "result" | "cancelled" => Some(Value::String(status)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::{GERMANY, SWEDEN};
    use chrono::NaiveDate;
    use serde_json::json;

    fn ctx() -> Context {
        Context::with_today(&SWEDEN, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn test_canonical_values_pass_through() {
        let ctx = ctx();
        let cases: [(Step, Value); 10] = [
            (sex, json!("horse")),
            (breed, json!("coldblood")),
            (country, json!("FR")),
            (date, json!("2015-01-01")),
            (racetime, json!(74.2)),
            (purse, json!(12000)),
            (odds, json!(3.5)),
            (startmethod, json!("mobile")),
            (racetype, json!("premium")),
            (started, json!(false)),
        ];

        for (step, value) in cases {
            assert_eq!(step(&ctx, value.clone()), Some(value));
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let ctx = ctx();
        let cases: [(Step, Value); 8] = [
            (name, json!("Storm Bird (FR)")),
            (country, json!("Storm Bird (FR)")),
            (sex, json!("S")),
            (date, json!("15.03.02")),
            (racetime, json!("1.14,2a")),
            (purse, json!("12 000 kr")),
            (person, json!("Örjan Kihlström a")),
            (distance, json!("2140/1")),
        ];

        for (step, raw) in cases {
            let once = step(&ctx, raw).unwrap();
            assert_eq!(step(&ctx, once.clone()), Some(once));
        }
    }

    #[test]
    fn test_numbers_as_text() {
        let ctx = ctx();
        assert_eq!(link(&ctx, json!(745632)), Some(json!("745632")));
        assert_eq!(date(&ctx, json!(1998)), Some(json!("1998-01-01")));
        assert_eq!(integer(&ctx, json!("Lopp 7")), Some(json!(7)));
    }

    #[test]
    fn test_integers_out_of_range() {
        let ctx = ctx();
        assert_eq!(integer(&ctx, json!(-1)), None);
        assert_eq!(integer(&ctx, json!(1.5)), None);
        assert_eq!(integer(&ctx, json!(5_000_000_000u64)), None);
        assert_eq!(integer(&ctx, json!("Lopp 4000000000")), None);
        assert_eq!(finish(&ctx, json!(-3)), None);
        assert_eq!(postposition(&ctx, json!(u64::MAX)), None);
        assert_eq!(distance(&ctx, json!(2140)), Some(json!(2140)));
    }

    #[test]
    fn test_flags_from_time_string() {
        let ctx = ctx();
        assert_eq!(gallop(&ctx, json!("1.16,0g")), Some(json!(true)));
        assert_eq!(dnf(&ctx, json!("u")), Some(json!(true)));
        assert_eq!(disqualified(&ctx, json!("1.16,0d")), Some(json!(true)));
        assert_eq!(disqstring(&ctx, json!("1.14,2a")), None);
    }

    #[test]
    fn test_site_specific_steps() {
        let ctx = Context::with_today(&GERMANY, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(show_odds(&ctx, json!("27")), Some(json!(2.7)));
        assert_eq!(status(&ctx, json!("Result")), Some(json!("result")));
        assert_eq!(status(&ctx, json!("other")), None);
    }
}
