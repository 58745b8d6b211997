use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Native reporting frequency of a provider series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    /// Render a column/period label for a date at this frequency,
    /// e.g. "Jan 2024", "Q1 2024", "2024".
    pub fn period_label(&self, date: NaiveDate) -> String {
        match self {
            Frequency::Monthly => date.format("%b %Y").to_string(),
            Frequency::Quarterly => format!("Q{} {}", date.month0() / 3 + 1, date.year()),
            Frequency::Annual => date.year().to_string(),
        }
    }
}

/// A single dated observation.
///
/// `value` stays `None` when the provider reported the period without a
/// usable number; absence survives all the way to display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// A normalized time series: observations strictly ascending by date with
/// unique dates, tagged with the originating query and native frequency.
///
/// Once produced by the normalizer a series is never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Source tag in `provider:key` form, e.g. `fred:UNRATE`.
    pub source: String,
    pub frequency: Frequency,
    pub observations: Vec<Observation>,
}

impl Series {
    /// An empty series is a valid, meaningful result ("no usable data").
    pub fn empty(source: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            source: source.into(),
            frequency,
            observations: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Most recent observation, if any.
    pub fn latest(&self) -> Option<&Observation> {
        self.observations.last()
    }
}

/// Statistical agencies the crate can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// US Federal Reserve Economic Data (flat observation list, API key).
    Fred,
    /// World Bank indicators API (two-element array response).
    WorldBank,
    /// Eurostat dissemination API (SDMX-compact JSON).
    Eurostat,
    /// OECD SDMX-JSON data API.
    Oecd,
    /// IMF CompactData SDMX service.
    Imf,
    /// BIS statistics API (SDMX-JSON).
    Bis,
    /// Swiss National Bank data portal (key-value observation map).
    Snb,
    /// Japanese e-Stat API (nested statistical arrays, API key).
    EStat,
    /// Statistics Canada web data service (tabular REF_DATE/VALUE rows).
    StatCan,
    /// UK Office for National Statistics time-series API.
    Ons,
}

/// Wire formats understood by the format parsers. Several agencies share
/// the recursive SDMX-style parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderFormat {
    FredObservations,
    WorldBankPages,
    EurostatCompact,
    SdmxRecursive,
    KeyValueMap,
}

impl Provider {
    /// Short stable id used in source tags and log lines.
    pub fn id(&self) -> &'static str {
        match self {
            Provider::Fred => "fred",
            Provider::WorldBank => "worldbank",
            Provider::Eurostat => "eurostat",
            Provider::Oecd => "oecd",
            Provider::Imf => "imf",
            Provider::Bis => "bis",
            Provider::Snb => "snb",
            Provider::EStat => "estat",
            Provider::StatCan => "statcan",
            Provider::Ons => "ons",
        }
    }

    pub fn format(&self) -> ProviderFormat {
        match self {
            Provider::Fred => ProviderFormat::FredObservations,
            Provider::WorldBank => ProviderFormat::WorldBankPages,
            Provider::Eurostat => ProviderFormat::EurostatCompact,
            Provider::Snb => ProviderFormat::KeyValueMap,
            Provider::Oecd
            | Provider::Imf
            | Provider::Bis
            | Provider::EStat
            | Provider::StatCan
            | Provider::Ons => ProviderFormat::SdmxRecursive,
        }
    }

    /// Whether requests against this agency carry an API key.
    pub fn needs_key(&self) -> bool {
        matches!(self, Provider::Fred | Provider::EStat)
    }
}

/// An immutable provider query. This is the cache key; equality is
/// structural over all fields including filters, so distinct filter sets
/// never alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderQuery {
    pub provider: Provider,
    /// Endpoint-specific series/indicator key. World Bank keys are
    /// `COUNTRY/INDICATOR`, e.g. `CHN/SL.UEM.TOTL.ZS`.
    pub key: String,
    /// Extra query parameters, appended in order.
    pub filters: Vec<(String, String)>,
}

impl ProviderQuery {
    pub fn new(provider: Provider, key: impl Into<String>) -> Self {
        Self {
            provider,
            key: key.into(),
            filters: Vec::new(),
        }
    }

    pub fn fred(series_id: impl Into<String>) -> Self {
        Self::new(Provider::Fred, series_id)
    }

    pub fn world_bank(country: &str, indicator: &str) -> Self {
        Self::new(Provider::WorldBank, format!("{country}/{indicator}"))
    }

    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((name.into(), value.into()));
        self
    }

    /// Source tag carried on the resulting series, e.g. `fred:UNRATE`.
    pub fn source_id(&self) -> String {
        format!("{}:{}", self.provider.id(), self.key)
    }
}

/// Derived transform applied to index-level values. The registry fixes the
/// transform per source mapping, so a derived series is never re-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transform {
    None,
    /// Month-over-month percentage change.
    MonthOverMonth,
    /// Year-over-year percentage change.
    YearOverYear,
}

impl Transform {
    /// Lag in periods for the percent-change computation, `None` for the
    /// identity transform.
    pub fn lag(&self) -> Option<usize> {
        match self {
            Transform::None => None,
            Transform::MonthOverMonth => Some(1),
            Transform::YearOverYear => Some(12),
        }
    }
}
