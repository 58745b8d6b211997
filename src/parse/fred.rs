//! FRED observations endpoint: `{"observations": [{"date": "...", "value": "..."}]}`.

use serde_json::Value;

use super::{RawRow, RawValue};
use crate::error::SourceError;

pub(super) fn parse(provider: &'static str, payload: &Value) -> Result<Vec<RawRow>, SourceError> {
    let obs = payload
        .get("observations")
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::format(provider, "missing observations array"))?;

    let mut rows = Vec::with_capacity(obs.len());
    for o in obs {
        let Some(date) = o.get("date").and_then(Value::as_str) else {
            continue;
        };
        let Some(value) = o.get("value").and_then(RawValue::of) else {
            continue;
        };
        // FRED marks missing observations with a bare "." string.
        let value = match value {
            RawValue::Text(s) if s.trim() == "." || s.trim().is_empty() => RawValue::Absent,
            other => other,
        };
        rows.push(RawRow {
            period: date.to_string(),
            value,
        });
    }
    Ok(rows)
}
