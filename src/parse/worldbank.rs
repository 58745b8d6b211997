//! World Bank indicators API: a two-element array `[meta, [entry, ...]]`,
//! or a one-element array carrying a `message` object on API errors.

use serde_json::Value;

use super::{RawRow, RawValue};
use crate::error::SourceError;

pub(super) fn parse(provider: &'static str, payload: &Value) -> Result<Vec<RawRow>, SourceError> {
    let arr = payload
        .as_array()
        .ok_or_else(|| SourceError::format(provider, "not a top-level array"))?;
    let first = arr
        .first()
        .ok_or_else(|| SourceError::format(provider, "empty response array"))?;
    if first.get("message").is_some() {
        return Err(SourceError::format(provider, "api error payload"));
    }

    let Some(entries) = arr.get(1).and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut rows = Vec::with_capacity(entries.len());
    for e in entries {
        let Some(date) = e.get("date").and_then(Value::as_str) else {
            continue;
        };
        // Null values are unpublished periods; the API reports them for the
        // full requested range, so they are dropped rather than kept absent.
        let value = match e.get("value") {
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) => RawValue::Number(v),
                None => continue,
            },
            Some(Value::String(s)) => RawValue::Text(s.clone()),
            _ => continue,
        };
        rows.push(RawRow {
            period: date.to_string(),
            value,
        });
    }
    Ok(rows)
}
