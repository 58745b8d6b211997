//! Flat key-value observation map: `{"2024-01": 1.5, "2024-02": null}`.

use serde_json::Value;

use super::{RawRow, RawValue};
use crate::error::SourceError;

pub(super) fn parse(provider: &'static str, payload: &Value) -> Result<Vec<RawRow>, SourceError> {
    let map = payload
        .as_object()
        .ok_or_else(|| SourceError::format(provider, "not a key-value object"))?;

    let mut rows = Vec::with_capacity(map.len());
    for (period, value) in map {
        let Some(value) = RawValue::of(value) else {
            continue;
        };
        rows.push(RawRow {
            period: period.clone(),
            value,
        });
    }
    Ok(rows)
}
