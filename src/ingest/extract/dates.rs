//! Calendar-date parsing for registry payloads.

use chrono::NaiveDate;
use serde_json::Value;

/// Build a date from a `{year, month, day}` triple.
///
/// Month and day are 1-based, as in the registries and in chrono. A missing
/// or zero component, or an impossible date, yields `None`.
pub fn parse_date_parts(
    year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
) -> Option<NaiveDate> {
    let (year, month, day) = (year?, month?, day?);
    if year == 0 || month == 0 || day == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

/// Parse `YYYY-MM-DD` or compact `YYYYMMDD`. Partial dates such as `YYYY-MM`
/// lack a day and yield `None`.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit()) {
        return parse_date_parts(
            text[0..4].parse().ok(),
            text[4..6].parse().ok(),
            text[6..8].parse().ok(),
        );
    }
    let mut parts = text.splitn(3, '-').map(|p| p.trim().parse::<i64>().ok());
    parse_date_parts(
        parts.next().flatten(),
        parts.next().flatten(),
        parts.next().flatten(),
    )
}

/// Accept either a `{year, month, day}` object (numbers or numeric strings)
/// or a textual date.
pub fn parse_date_value(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(text) => parse_calendar_date(text),
        Value::Object(map) => {
            let component = |key: &str| map.get(key).and_then(as_integer);
            parse_date_parts(component("year"), component("month"), component("day"))
        }
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
