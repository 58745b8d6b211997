//! Format parsers, one per wire format.
//!
//! Each parser extracts `RawRow`s independently and converges on the same
//! canonical stream for the normalizer. Parsers are defensive: a payload
//! with an unexpected shape yields a `Format` error or an empty row set,
//! never a panic — "no data from provider X" is a normal, displayable
//! state once the resolver downgrades the error.

use serde_json::Value;

use crate::error::SourceError;
use crate::models::{Provider, ProviderFormat};

mod eurostat;
mod fred;
mod keyvalue;
mod sdmx;
mod worldbank;

/// Raw value as extracted from the payload, before numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
    /// The provider explicitly reported the period with no value.
    Absent,
}

impl RawValue {
    /// Scalar JSON value to raw value; non-scalar shapes get no row.
    fn of(v: &Value) -> Option<RawValue> {
        match v {
            Value::Number(n) => Some(n.as_f64().map_or(RawValue::Absent, RawValue::Number)),
            Value::String(s) => Some(RawValue::Text(s.clone())),
            Value::Null => Some(RawValue::Absent),
            _ => None,
        }
    }
}

/// One observation row as extracted by a parser; the period string is
/// coerced to a calendar date by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub period: String,
    pub value: RawValue,
}

/// Parse a raw payload with the parser for the provider's wire format.
pub fn parse(provider: Provider, payload: &Value) -> Result<Vec<RawRow>, SourceError> {
    let id = provider.id();
    match provider.format() {
        ProviderFormat::FredObservations => fred::parse(id, payload),
        ProviderFormat::WorldBankPages => worldbank::parse(id, payload),
        ProviderFormat::EurostatCompact => eurostat::parse(id, payload),
        ProviderFormat::SdmxRecursive => sdmx::parse(id, payload),
        ProviderFormat::KeyValueMap => keyvalue::parse(id, payload),
    }
}
