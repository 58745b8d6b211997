//! Indicator resolver: (country, indicator) -> normalized series.
//!
//! Orchestrates cache, adapter, parser, normalizer, and the derived
//! transform. Fetches for distinct entities fan out concurrently with a
//! bounded width and an independent deadline per task; dropping the
//! resolution future cancels still-pending fetches without touching
//! cache entries already committed by completed tasks.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::api::Fetch;
use crate::cache::{DEFAULT_TTL, SeriesCache};
use crate::change::percent_change;
use crate::error::SourceError;
use crate::models::{Frequency, Series};
use crate::registry::{Country, IndicatorKind, Registry, SourceMapping};
use crate::table::{AlignedTable, CellStyle, DEFAULT_WINDOW, align};
use crate::{normalize, parse};

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub cache_ttl: Duration,
    /// Deadline for a single provider fetch; a hung agency must not
    /// stall the rest of the resolution pass.
    pub task_timeout: Duration,
    /// Maximum concurrently in-flight resolutions in `resolve_many`.
    pub max_in_flight: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
            task_timeout: Duration::from_secs(12),
            max_in_flight: 8,
        }
    }
}

pub struct Resolver {
    registry: Registry,
    fetcher: Arc<dyn Fetch>,
    cache: SeriesCache,
    opts: ResolverOptions,
}

impl Resolver {
    pub fn new(registry: Registry, fetcher: Arc<dyn Fetch>) -> Self {
        Self::with_options(registry, fetcher, ResolverOptions::default())
    }

    pub fn with_options(
        registry: Registry,
        fetcher: Arc<dyn Fetch>,
        opts: ResolverOptions,
    ) -> Self {
        Self {
            registry,
            fetcher,
            cache: SeriesCache::new(opts.cache_ttl),
            opts,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolve a (country, indicator) selection given by display name,
    /// the form the presentation layer works with. Unknown names are
    /// ordinary no-coverage outcomes.
    pub async fn resolve(&self, country: &str, indicator: &str) -> Series {
        match (
            Country::from_name(country),
            IndicatorKind::from_name(indicator),
        ) {
            (Some(c), Some(k)) => self.resolve_known(c, k).await,
            _ => {
                let err = SourceError::NoCoverage {
                    country: country.to_string(),
                    indicator: indicator.to_string(),
                };
                log::debug!("{err}");
                Series::empty(format!("{country}:{indicator}"), Frequency::Monthly)
            }
        }
    }

    /// Resolve one selection to a series.
    ///
    /// Never fails: a missing mapping, an unconfigured API key, or any
    /// transport/format/timeout error yields an empty series, so one
    /// degraded entity never aborts rendering of the others.
    pub async fn resolve_known(&self, country: Country, indicator: IndicatorKind) -> Series {
        let Some(mapping) = self
            .registry
            .get(indicator)
            .and_then(|i| i.source_for(country))
        else {
            let err = SourceError::NoCoverage {
                country: country.name().to_string(),
                indicator: indicator.name().to_string(),
            };
            log::debug!("{err}");
            return Series::empty(
                format!("{}:{}", country.name(), indicator.name()),
                Frequency::Monthly,
            );
        };

        let provider = mapping.query.provider;
        if provider.needs_key() && !self.fetcher.ready(provider) {
            log::warn!(
                "{} has no api key configured; treating {}/{} as uncovered",
                provider.id(),
                indicator.name(),
                country.name()
            );
            return Series::empty(mapping.query.source_id(), mapping.frequency);
        }

        let fetched = self
            .cache
            .get_or_fetch(&mapping.query, || self.fetch_series(mapping))
            .await;
        let series = match fetched {
            Ok(series) => series,
            Err(err) => {
                log::warn!("{err}; returning empty series");
                return Series::empty(mapping.query.source_id(), mapping.frequency);
            }
        };

        match mapping.transform.lag() {
            Some(lag) => percent_change(&series, lag),
            None => series,
        }
    }

    /// Resolve one indicator for several countries concurrently,
    /// preserving input order. Each fetch is independently
    /// timeout-bound; a slow provider delays only its own entity.
    pub async fn resolve_many(
        &self,
        indicator: &str,
        countries: &[String],
    ) -> Vec<(String, Series)> {
        stream::iter(countries.iter().map(|country| async move {
            (country.clone(), self.resolve(country, indicator).await)
        }))
        .buffered(self.opts.max_in_flight.max(1))
        .collect()
        .await
    }

    /// Resolve and align several countries into the recent-period table
    /// for an indicator.
    pub async fn resolve_table(
        &self,
        indicator: &str,
        countries: &[String],
        window: usize,
    ) -> AlignedTable {
        let style = match self.registry.get_by_name(indicator) {
            Some(i) if !i.is_percentage() => CellStyle::Grouped,
            _ => CellStyle::Percent,
        };
        let entries = self.resolve_many(indicator, countries).await;
        align(&entries, window, style)
    }

    /// Like [`resolve_table`](Self::resolve_table) over the indicator's
    /// full catalog coverage with the default window.
    pub async fn resolve_table_all(&self, indicator: &str) -> AlignedTable {
        let countries: Vec<String> = self
            .registry
            .get_by_name(indicator)
            .map(|i| i.countries().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        self.resolve_table(indicator, &countries, DEFAULT_WINDOW).await
    }

    /// adapter fetch -> parse -> normalize, under the per-task deadline.
    async fn fetch_series(&self, mapping: &SourceMapping) -> Result<Series, SourceError> {
        let query = &mapping.query;
        let raw = tokio::time::timeout(self.opts.task_timeout, self.fetcher.fetch_raw(query))
            .await
            .map_err(|_| SourceError::Timeout {
                provider: query.provider.id(),
            })??;
        let rows = parse::parse(query.provider, &raw)?;
        Ok(normalize::normalize(
            &query.source_id(),
            mapping.frequency,
            rows,
        ))
    }
}
