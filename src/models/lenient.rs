//! Lenient field parsing for rows coming from the backing store.
//!
//! Rows are edited by hand through the dashboard, so amounts may arrive as
//! numbers, numeric strings, `null` or not at all. Every money field is read
//! through [`decimal`], which never fails and falls back to zero. Times and
//! dates that cannot be parsed are read as absent.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parses any JSON value as an amount, falling back to zero.
///
/// # Examples
///
/// ```
/// use center_payroll::models::lenient::parse_amount;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// assert_eq!(parse_amount(&json!(150)), Decimal::new(150, 0));
/// assert_eq!(parse_amount(&json!("12.50")), Decimal::new(1250, 2));
/// assert_eq!(parse_amount(&json!("n/a")), Decimal::ZERO);
/// assert_eq!(parse_amount(&json!(null)), Decimal::ZERO);
/// ```
pub fn parse_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_amount_str(&n.to_string()),
        Value::String(s) => parse_amount_str(s),
        _ => Decimal::ZERO,
    }
}

/// Parses a string as an amount, falling back to zero.
pub fn parse_amount_str(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Parses a wall-clock time written as `HH:MM` or `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()
}

/// Parses a calendar date from a `YYYY-MM-DD` string or any timestamp that
/// starts with one (e.g. `2026-01-15T08:30:00+00:00`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Deserializes an amount, treating missing, null and non-numeric values as zero.
pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(parse_amount).unwrap_or(Decimal::ZERO))
}

/// Deserializes an optional wall-clock time.
pub fn opt_time<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(parse_time))
}

/// Deserializes an optional date, accepting full timestamps.
pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(parse_date))
}

/// Deserializes an identifier that may be stored as a string or a number.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_string))
}

/// Deserializes a required text field, treating null as empty.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_string).unwrap_or_default())
}

/// Deserializes an optional small integer stored as a number or a string.
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_as_string)
        .and_then(|s| s.parse().ok()))
}

/// Deserializes an optional year stored as a number or a string.
pub fn opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_as_string)
        .and_then(|s| s.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "decimal")]
        amount: Decimal,
        #[serde(default, deserialize_with = "opt_time")]
        check_in: Option<NaiveTime>,
        #[serde(default, deserialize_with = "opt_date")]
        date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "opt_string")]
        id: Option<String>,
        #[serde(default, deserialize_with = "opt_u32")]
        month: Option<u32>,
    }

    #[test]
    fn test_missing_fields_default_to_zero_and_none() {
        let row: Row = serde_json::from_value(json!({})).unwrap();
        assert_eq!(row.amount, Decimal::ZERO);
        assert!(row.check_in.is_none());
        assert!(row.date.is_none());
        assert!(row.id.is_none());
        assert!(row.month.is_none());
    }

    #[test]
    fn test_string_amount_is_parsed() {
        let row: Row = serde_json::from_value(json!({"amount": " 250.75 "})).unwrap();
        assert_eq!(row.amount, Decimal::new(25075, 2));
    }

    #[test]
    fn test_garbage_amount_becomes_zero() {
        let row: Row = serde_json::from_value(json!({"amount": "abc"})).unwrap();
        assert_eq!(row.amount, Decimal::ZERO);

        let row: Row = serde_json::from_value(json!({"amount": true})).unwrap();
        assert_eq!(row.amount, Decimal::ZERO);
    }

    #[test]
    fn test_time_with_and_without_seconds() {
        assert_eq!(parse_time("08:15"), NaiveTime::from_hms_opt(8, 15, 0));
        assert_eq!(parse_time("08:15:30"), NaiveTime::from_hms_opt(8, 15, 30));
        assert_eq!(parse_time("8am"), None);
    }

    #[test]
    fn test_timestamp_is_truncated_to_date() {
        let row: Row =
            serde_json::from_value(json!({"date": "2026-03-04T22:10:00+00:00"})).unwrap();
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2026, 3, 4));
    }

    #[test]
    fn test_numeric_id_and_month_strings() {
        let row: Row = serde_json::from_value(json!({"id": 42, "month": "7"})).unwrap();
        assert_eq!(row.id.as_deref(), Some("42"));
        assert_eq!(row.month, Some(7));
    }

    #[test]
    fn test_empty_id_is_none() {
        let row: Row = serde_json::from_value(json!({"id": "  "})).unwrap();
        assert!(row.id.is_none());
    }
}
