//! Derived-metric engine: period-over-period percentage change.

use crate::models::{Observation, Series};

/// Percentage change against the observation `lag` periods earlier:
/// `(v[i] - v[i-lag]) / v[i-lag] * 100`.
///
/// Defined only when both operands are present and the base is nonzero;
/// otherwise the output observation is absent. The first `lag` positions
/// are dropped rather than emitted as absent placeholders — downstream
/// alignment only wants periods where a computation was attempted.
///
/// Input must be an index-level series; the registry fixes the transform
/// per source mapping so an already-derived series is never passed back in.
pub fn percent_change(series: &Series, lag: usize) -> Series {
    let obs = &series.observations;
    if lag == 0 || obs.len() <= lag {
        return Series::empty(series.source.clone(), series.frequency);
    }

    let mut out = Vec::with_capacity(obs.len() - lag);
    for i in lag..obs.len() {
        let value = match (obs[i - lag].value, obs[i].value) {
            (Some(base), Some(current)) if base != 0.0 => {
                Some((current - base) / base * 100.0)
            }
            _ => None,
        };
        out.push(Observation {
            date: obs[i].date,
            value,
        });
    }

    Series {
        source: series.source.clone(),
        frequency: series.frequency,
        observations: out,
    }
}
