//! Reusable value transforms
//!
//! These transform a column's raw value before it is sent. Each one takes the
//! column name and the raw value; values of an unexpected type pass through.

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Apply `f` to string cells, pass every other value through
fn map_text<F>(f: F) -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone
where
    F: Fn(&str) -> String + Send + Sync + Clone,
{
    move |_: &str, value: Value| match value {
        Value::String(text) => Ok(Value::String(f(&text))),
        other => Ok(other),
    }
}

pub fn uppercase() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    map_text(str::to_uppercase)
}

pub fn lowercase() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    map_text(str::to_lowercase)
}

/// Shorten long text to `max_chars` characters, ending it with `…`
pub fn excerpt(max_chars: usize) -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    map_text(move |text| {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", kept.trim_end())
    })
}

/// Render a number with a fixed count of decimals, as text
///
/// Cells keep their trailing zeros (`"3.10"`), which a JSON number would lose.
pub fn fixed_decimals(
    decimals: usize,
) -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    move |field: &str, value: Value| match value {
        Value::Number(number) => number
            .as_f64()
            .map(|n| Value::String(format!("{:.*}", decimals, n)))
            .ok_or_else(|| anyhow!("'{}' is not representable as a decimal", field)),
        other => Ok(other),
    }
}

/// Transform: reformat an RFC 3339 timestamp or `YYYY-MM-DD` date
///
/// Strings that are not dates are an error: a date column holding anything
/// else points at a broken model.
pub fn date_format(
    format: &'static str,
) -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    move |field: &str, value: Value| {
        let Some(s) = value.as_str() else {
            return Ok(value);
        };

        let formatted = if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
            datetime.format(format).to_string()
        } else if let Ok(datetime) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            datetime.format(format).to_string()
        } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            date.format(format).to_string()
        } else {
            return Err(anyhow!("'{}' is not a date (value: {})", field, s));
        };

        Ok(Value::String(formatted))
    }
}
