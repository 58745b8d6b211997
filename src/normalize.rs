//! Converts parser output into the canonical [`Series`].

use chrono::NaiveDate;

use crate::models::{Frequency, Observation, Series};
use crate::parse::{RawRow, RawValue};

/// Normalize raw rows into a series: coerce periods to calendar dates and
/// values to finite numbers (dropping rows that fail either coercion —
/// an observation is value-absent only when the parser explicitly said
/// so), sort ascending, collapse duplicate dates keeping the later
/// occurrence. Zero valid rows is a valid empty series.
pub fn normalize(source: &str, frequency: Frequency, rows: Vec<RawRow>) -> Series {
    let mut observations = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(date) = parse_period(&row.period) else {
            continue;
        };
        let value = match row.value {
            RawValue::Absent => None,
            RawValue::Number(n) if n.is_finite() => Some(n),
            RawValue::Number(_) => continue,
            RawValue::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Some(n),
                _ => continue,
            },
        };
        observations.push(Observation { date, value });
    }

    // Stable sort keeps input order within equal dates, so the later
    // occurrence ends up last and wins the collapse below.
    observations.sort_by_key(|o| o.date);
    let mut deduped: Vec<Observation> = Vec::with_capacity(observations.len());
    for o in observations {
        match deduped.last_mut() {
            Some(prev) if prev.date == o.date => *prev = o,
            _ => deduped.push(o),
        }
    }

    Series {
        source: source.to_string(),
        frequency,
        observations: deduped,
    }
}

/// Coerce a raw period string to a calendar date (first day of the
/// period). Accepted shapes: `YYYY-MM-DD`, `YYYY-MM`, SDMX monthly
/// `YYYY-M01`, quarterly `YYYY-Qn` / `YYYYQn`, and plain `YYYY`.
pub fn parse_period(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }

    if let Some((year, rest)) = s.split_once('-') {
        let year: i32 = year.parse().ok()?;
        let rest = rest.trim();
        if let Some(q) = rest.strip_prefix(['Q', 'q']) {
            return quarter_start(year, q.parse().ok()?);
        }
        let month: u32 = rest.strip_prefix(['M', 'm']).unwrap_or(rest).parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    // Compact quarterly, e.g. "2024Q1".
    if let Some(pos) = s.find(['Q', 'q']) {
        let year: i32 = s[..pos].parse().ok()?;
        return quarter_start(year, s[pos + 1..].parse().ok()?);
    }

    let year: i32 = s.parse().ok()?;
    if (1000..=9999).contains(&year) {
        NaiveDate::from_ymd_opt(year, 1, 1)
    } else {
        None
    }
}

fn quarter_start(year: i32, quarter: u32) -> Option<NaiveDate> {
    if !(1..=4).contains(&quarter) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)
}
