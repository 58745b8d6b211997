//! Eurostat SDMX-compact JSON: the time dimension maps each period to a
//! flat position (`dimension.time.category.index`), and `value` is an
//! object keyed by that position. Positions missing from `value` are
//! unpublished periods and stay explicitly absent.

use serde_json::Value;

use super::{RawRow, RawValue};
use crate::error::SourceError;

pub(super) fn parse(provider: &'static str, payload: &Value) -> Result<Vec<RawRow>, SourceError> {
    let index = payload
        .pointer("/dimension/time/category/index")
        .and_then(Value::as_object)
        .ok_or_else(|| SourceError::format(provider, "missing dimension.time.category.index"))?;
    let values = payload
        .get("value")
        .and_then(Value::as_object)
        .ok_or_else(|| SourceError::format(provider, "missing value map"))?;

    let mut rows: Vec<(u64, RawRow)> = Vec::with_capacity(index.len());
    for (period, pos) in index {
        let Some(pos) = pos.as_u64() else {
            continue;
        };
        let value = match values.get(&pos.to_string()) {
            None => RawValue::Absent,
            Some(v) => match RawValue::of(v) {
                Some(v) => v,
                None => continue,
            },
        };
        rows.push((
            pos,
            RawRow {
                period: period.clone(),
                value,
            },
        ));
    }
    rows.sort_by_key(|(pos, _)| *pos);
    Ok(rows.into_iter().map(|(_, row)| row).collect())
}
