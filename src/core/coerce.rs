//! Lenient coercion of raw field values into amounts and instants.
//!
//! Both functions return `None` instead of failing: callers decide the
//! fallback (zero for totals, earliest instant for sorting, raw text for
//! display).

use crate::domain::model::FieldValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("numeric prefix pattern")
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
];

/// Coerces a value to an amount the way a lenient float parser would: the
/// longest numeric prefix of a text counts, anything else is not a number.
pub fn parse_amount(value: &FieldValue) -> Option<Decimal> {
    match value {
        FieldValue::Number(n) => parse_decimal_prefix(&n.to_string()),
        FieldValue::Text(s) => parse_decimal_prefix(s),
        FieldValue::Null | FieldValue::Bool(_) | FieldValue::Date(_) => None,
    }
}

fn parse_decimal_prefix(text: &str) -> Option<Decimal> {
    let matched = NUMERIC_PREFIX.find(text.trim_start())?.as_str();

    let (negative, body) = match matched.as_bytes()[0] {
        b'-' => (true, &matched[1..]),
        b'+' => (false, &matched[1..]),
        _ => (false, matched),
    };
    let (mantissa, exponent) = match body.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => (&body[..idx], Some(&body[idx..])),
        None => (body, None),
    };

    // Decimal parsing wants digits on both sides of the point.
    let mantissa = mantissa.strip_suffix('.').unwrap_or(mantissa);
    let mut normalized = String::with_capacity(matched.len() + 2);
    if negative {
        normalized.push('-');
    }
    if mantissa.starts_with('.') {
        normalized.push('0');
    }
    normalized.push_str(mantissa);

    let parsed = match exponent {
        Some(exp) => {
            normalized.push('e');
            normalized.push_str(&exp[1..]);
            Decimal::from_scientific(&normalized).ok()
        }
        None => Decimal::from_str(&normalized).ok(),
    };
    parsed.or_else(|| clamp_out_of_range(&normalized))
}

/// A well-formed number the decimal type cannot hold: magnitudes past its
/// range clamp to `Decimal::MAX`/`Decimal::MIN`, values below its precision
/// round to zero.
fn clamp_out_of_range(normalized: &str) -> Option<Decimal> {
    let value: f64 = normalized.parse().ok()?;
    tracing::debug!("Amount {} is outside the decimal range", normalized);

    Decimal::from_f64(value).or(Some(if value.abs() < 1.0 {
        Decimal::ZERO
    } else if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }))
}

/// Coerces a value to a point in time. Numbers are epoch milliseconds;
/// text without a zone is read as UTC.
pub fn parse_instant(value: &FieldValue) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::Date(d) => Some(*d),
        FieldValue::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?;
            DateTime::from_timestamp_millis(millis)
        }
        FieldValue::Text(s) => parse_date_text(s.trim()),
        FieldValue::Null | FieldValue::Bool(_) => None,
    }
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        return match text.len() {
            4 => NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1).map(start_of_day),
            8 => NaiveDate::parse_from_str(text, "%Y%m%d").ok().map(start_of_day),
            len if len >= 10 => DateTime::from_timestamp_millis(text.parse().ok()?),
            _ => None,
        };
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(start_of_day)
        })
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
