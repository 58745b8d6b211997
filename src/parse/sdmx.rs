//! Generic recursive parser for the SDMX-JSON family.
//!
//! Several agencies publish structurally different but observation-shaped
//! JSON: OECD/IMF/BIS SDMX variants, nested statistical arrays with
//! `@TIME`/`#text` fields, and tabular rows with `REF_DATE`/`VALUE`. A
//! depth-first walk emits a row from every object that carries both a
//! period field and a value field from the closed alias sets below.
//! Entries whose period or value cannot be read are skipped silently —
//! partial-data tolerance is deliberate.

use serde_json::{Map, Value};

use super::{RawRow, RawValue};
use crate::error::SourceError;

const PERIOD_ALIASES: &[&str] = &[
    "period",
    "date",
    "time",
    "TIME_PERIOD",
    "@TIME_PERIOD",
    "@TIME",
    "REF_DATE",
];

const VALUE_ALIASES: &[&str] = &[
    "value",
    "obs_value",
    "OBS_VALUE",
    "@OBS_VALUE",
    "VALUE",
    "#text",
];

pub(super) fn parse(_provider: &'static str, payload: &Value) -> Result<Vec<RawRow>, SourceError> {
    let mut rows = Vec::new();
    walk(payload, &mut rows);
    Ok(rows)
}

fn walk(v: &Value, out: &mut Vec<RawRow>) {
    match v {
        Value::Object(map) => {
            if let Some(row) = observation_of(map) {
                out.push(row);
            } else {
                for child in map.values() {
                    walk(child, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, out);
            }
        }
        _ => {}
    }
}

/// An object is an observation when it has both a period and a value
/// field. Matched objects are taken whole; the walk does not descend
/// into them further.
fn observation_of(map: &Map<String, Value>) -> Option<RawRow> {
    let period = lookup(map, PERIOD_ALIASES)?;
    let value = lookup(map, VALUE_ALIASES)?;
    let period = match period {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_i64()?.to_string(),
        _ => return None,
    };
    Some(RawRow {
        period,
        value: RawValue::of(value)?,
    })
}

fn lookup<'a>(map: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|k| map.get(*k))
}
