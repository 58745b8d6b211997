//! Read-only HTTP adapter for the statistical agency APIs.
//!
//! One [`Client`] serves every provider; per-provider knowledge is
//! limited to an endpoint URL template and, for FRED and e-Stat, an API
//! key passed through from the external configuration collaborator. The
//! crate never reads configuration storage itself.

use std::time::Duration;

use ahash::AHashMap;
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;

use crate::error::SourceError;
use crate::models::{Provider, ProviderQuery};

/// Allow -, _, . unescaped in series keys (common in indicator ids).
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(part: &str) -> String {
    percent_encoding::utf8_percent_encode(part.trim(), SAFE).to_string()
}

/// Percent-encode each `/`-separated segment of a key, keeping the
/// separators as path structure.
fn enc_path(key: &str) -> String {
    key.split('/').map(enc).collect::<Vec<_>>().join("/")
}

/// Connection settings and credentials, supplied by the caller.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub fred_api_key: Option<String>,
    pub estat_api_key: Option<String>,
    /// Total per-request deadline.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Base URL overrides, mainly for tests against a local mock server.
    pub base_overrides: Vec<(Provider, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fred_api_key: None,
            estat_api_key: None,
            request_timeout: Duration::from_secs(12),
            connect_timeout: Duration::from_secs(5),
            base_overrides: Vec::new(),
        }
    }
}

/// Seam between the resolver and the network, so tests can substitute
/// canned payloads.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Whether this provider can be queried at all (e.g. its API key is
    /// configured). An unready provider is treated as having no coverage.
    fn ready(&self, _provider: Provider) -> bool {
        true
    }

    /// Issue the read-only request for `query` and return the decoded
    /// JSON payload.
    async fn fetch_raw(&self, query: &ProviderQuery) -> Result<Value, SourceError>;
}

#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    fred_api_key: Option<String>,
    estat_api_key: Option<String>,
    base_overrides: AHashMap<Provider, String>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl Client {
    pub fn new(cfg: ClientConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(cfg.request_timeout)
            .connect_timeout(cfg.connect_timeout)
            .redirect(Policy::limited(5))
            .user_agent(concat!("mei_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build");
        Self {
            http,
            fred_api_key: cfg.fred_api_key,
            estat_api_key: cfg.estat_api_key,
            base_overrides: cfg.base_overrides.into_iter().collect(),
        }
    }

    fn base_url(&self, provider: Provider) -> &str {
        if let Some(base) = self.base_overrides.get(&provider) {
            return base;
        }
        match provider {
            Provider::Fred => "https://api.stlouisfed.org",
            Provider::WorldBank => "https://api.worldbank.org",
            Provider::Eurostat => "https://ec.europa.eu/eurostat/api/dissemination",
            Provider::Oecd => "https://sdmx.oecd.org/public/rest",
            Provider::Imf => "https://dataservices.imf.org/REST/SDMX_JSON.svc",
            Provider::Bis => "https://stats.bis.org/api/v2",
            Provider::Snb => "https://data.snb.ch/api/cube",
            Provider::EStat => "https://api.e-stat.go.jp/rest/3.0/app/json",
            Provider::StatCan => "https://www150.statcan.gc.ca/t1/wds/rest",
            Provider::Ons => "https://api.ons.gov.uk",
        }
    }

    /// Build the request URL for a query. Endpoint shapes are
    /// approximated consistently per agency rather than replicating
    /// every upstream quirk.
    fn build_url(&self, query: &ProviderQuery) -> Result<String, SourceError> {
        let id = query.provider.id();
        let base = self.base_url(query.provider);
        let key = enc_path(&query.key);

        let mut url = match query.provider {
            Provider::Fred => {
                let api_key = self
                    .fred_api_key
                    .as_deref()
                    .ok_or_else(|| SourceError::transport(id, "api key not configured"))?;
                format!(
                    "{base}/fred/series/observations?series_id={key}&api_key={}&file_type=json",
                    enc(api_key)
                )
            }
            Provider::WorldBank => {
                let (country, indicator) = query.key.split_once('/').ok_or_else(|| {
                    SourceError::format(id, "world bank key must be COUNTRY/INDICATOR")
                })?;
                format!(
                    "{base}/v2/country/{}/indicator/{}?format=json&per_page=1000",
                    enc(country),
                    enc(indicator)
                )
            }
            Provider::Eurostat => {
                format!("{base}/statistics/1.0/data/{key}?format=JSON")
            }
            Provider::Oecd => format!("{base}/data/{key}?format=jsondata"),
            Provider::Imf => format!("{base}/CompactData/{key}"),
            Provider::Bis => format!("{base}/data/{key}?format=json"),
            Provider::Snb => format!("{base}/{key}/data/json"),
            Provider::EStat => {
                let api_key = self
                    .estat_api_key
                    .as_deref()
                    .ok_or_else(|| SourceError::transport(id, "api key not configured"))?;
                format!(
                    "{base}/getStatsData?appId={}&statsDataId={key}",
                    enc(api_key)
                )
            }
            Provider::StatCan => {
                format!("{base}/getDataFromVectorsAndLatestNPeriods?vectorIds={key}&latestN=400")
            }
            Provider::Ons => format!("{base}/timeseries/{key}/data"),
        };

        for (name, value) in &query.filters {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&enc(name));
            url.push('=');
            url.push_str(&enc(value));
        }
        Ok(url)
    }

    /// GET + JSON decode with at most one retry after a short backoff,
    /// for server errors and transport failures only.
    async fn get_json(&self, provider: &'static str, url: &str) -> Result<Value, SourceError> {
        let mut last: Option<SourceError> = None;
        for attempt in 0..2 {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(250)).await;
            }
            match self.http.get(url).send().await {
                Ok(r) if r.status().is_success() => {
                    return r
                        .json()
                        .await
                        .map_err(|e| SourceError::format(provider, format!("decode json: {e}")));
                }
                Ok(r) if r.status().is_server_error() => {
                    last = Some(SourceError::transport(
                        provider,
                        format!("HTTP {}", r.status()),
                    ));
                }
                Ok(r) => {
                    return Err(SourceError::transport(
                        provider,
                        format!("HTTP {}", r.status()),
                    ));
                }
                Err(e) => last = Some(SourceError::transport(provider, e.to_string())),
            }
        }
        Err(last.unwrap_or_else(|| SourceError::transport(provider, "request failed")))
    }
}

#[async_trait]
impl Fetch for Client {
    fn ready(&self, provider: Provider) -> bool {
        match provider {
            Provider::Fred => self.fred_api_key.is_some(),
            Provider::EStat => self.estat_api_key.is_some(),
            _ => true,
        }
    }

    async fn fetch_raw(&self, query: &ProviderQuery) -> Result<Value, SourceError> {
        let url = self.build_url(query)?;
        log::debug!("GET {url}");
        self.get_json(query.provider.id(), &url).await
    }
}
