//! Immutable catalog mapping (country, indicator) to provider queries.
//!
//! Built once at startup and passed explicitly into the resolver; there
//! is no global mutable state. Countries and indicators are tagged
//! variants, so dispatch inside the crate is never on display strings;
//! names are parsed only at the presentation boundary. Coverage is
//! intentionally sparse — a country missing from an indicator's table
//! is a normal "no coverage" outcome, not a configuration error.

use serde::{Deserialize, Serialize};

use crate::models::{Frequency, Provider, ProviderQuery, Transform};

/// Entities the built-in catalog covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    Usa,
    Eurozone,
    Uk,
    Japan,
    Australia,
    Canada,
    Switzerland,
    Germany,
    China,
    NewZealand,
}

impl Country {
    pub const ALL: &'static [Country] = &[
        Country::Usa,
        Country::Eurozone,
        Country::Uk,
        Country::Japan,
        Country::Australia,
        Country::Canada,
        Country::Switzerland,
        Country::Germany,
        Country::China,
        Country::NewZealand,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Country::Usa => "USA",
            Country::Eurozone => "Eurozone",
            Country::Uk => "UK",
            Country::Japan => "Japan",
            Country::Australia => "Australia",
            Country::Canada => "Canada",
            Country::Switzerland => "Switzerland",
            Country::Germany => "Germany",
            Country::China => "China",
            Country::NewZealand => "New Zealand",
        }
    }

    /// Parse a display name, e.g. from a CLI argument. Unknown names are
    /// simply uncovered, not errors.
    pub fn from_name(name: &str) -> Option<Country> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

/// The macroeconomic concepts the built-in catalog publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    UnemploymentRate,
    MonthlyInflationRate,
    AnnualInflationRate,
    CpiIndex,
    RealGdpGrowth,
    PolicyRate,
}

impl IndicatorKind {
    pub const ALL: &'static [IndicatorKind] = &[
        IndicatorKind::UnemploymentRate,
        IndicatorKind::MonthlyInflationRate,
        IndicatorKind::AnnualInflationRate,
        IndicatorKind::CpiIndex,
        IndicatorKind::RealGdpGrowth,
        IndicatorKind::PolicyRate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IndicatorKind::UnemploymentRate => "Unemployment Rate",
            IndicatorKind::MonthlyInflationRate => "Monthly Inflation Rate",
            IndicatorKind::AnnualInflationRate => "Annual Inflation Rate",
            IndicatorKind::CpiIndex => "CPI Index",
            IndicatorKind::RealGdpGrowth => "Real GDP Growth",
            IndicatorKind::PolicyRate => "Policy Rate",
        }
    }

    pub fn from_name(name: &str) -> Option<IndicatorKind> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }
}

/// How one country's series for an indicator is obtained: the provider
/// query, the native frequency of that series, and the transform that
/// turns the fetched values into the indicator (e.g. YoY change on a CPI
/// index, identity on an already-published rate).
#[derive(Debug, Clone)]
pub struct SourceMapping {
    pub query: ProviderQuery,
    pub frequency: Frequency,
    pub transform: Transform,
}

impl SourceMapping {
    pub fn monthly(query: ProviderQuery, transform: Transform) -> Self {
        Self {
            query,
            frequency: Frequency::Monthly,
            transform,
        }
    }

    pub fn quarterly(query: ProviderQuery, transform: Transform) -> Self {
        Self {
            query,
            frequency: Frequency::Quarterly,
            transform,
        }
    }

    pub fn annual(query: ProviderQuery, transform: Transform) -> Self {
        Self {
            query,
            frequency: Frequency::Annual,
            transform,
        }
    }
}

/// A named macroeconomic concept with its per-country source table.
#[derive(Debug, Clone)]
pub struct Indicator {
    kind: IndicatorKind,
    /// Values are percentages (either published as a rate or derived),
    /// which controls table cell formatting.
    percent_units: bool,
    coverage: Vec<(Country, SourceMapping)>,
}

impl Indicator {
    pub fn new(kind: IndicatorKind, percent_units: bool) -> Self {
        Self {
            kind,
            percent_units,
            coverage: Vec::new(),
        }
    }

    pub fn with_source(mut self, country: Country, mapping: SourceMapping) -> Self {
        self.coverage.push((country, mapping));
        self
    }

    pub fn kind(&self) -> IndicatorKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_percentage(&self) -> bool {
        self.percent_units
    }

    pub fn source_for(&self, country: Country) -> Option<&SourceMapping> {
        self.coverage
            .iter()
            .find(|(c, _)| *c == country)
            .map(|(_, m)| m)
    }

    /// Covered countries in catalog order.
    pub fn countries(&self) -> impl Iterator<Item = Country> {
        self.coverage.iter().map(|(c, _)| *c)
    }
}

/// The immutable indicator catalog.
#[derive(Debug, Clone)]
pub struct Registry {
    indicators: Vec<Indicator>,
}

impl Registry {
    pub fn new(indicators: Vec<Indicator>) -> Self {
        Self { indicators }
    }

    pub fn get(&self, kind: IndicatorKind) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.kind == kind)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Indicator> {
        IndicatorKind::from_name(name).and_then(|kind| self.get(kind))
    }

    pub fn indicators(&self) -> impl Iterator<Item = &Indicator> {
        self.indicators.iter()
    }

    /// The built-in catalog: unemployment, CPI/inflation, GDP growth and
    /// policy rates for the major currency areas, sourced from FRED and
    /// the World Bank with national agencies filling gaps.
    pub fn builtin() -> Self {
        let mut unemployment = Indicator::new(IndicatorKind::UnemploymentRate, true);
        for (country, series) in FRED_UNEMPLOYMENT {
            unemployment = unemployment.with_source(
                *country,
                SourceMapping::monthly(ProviderQuery::fred(*series), Transform::None),
            );
        }
        for (country, iso3) in WB_ONLY {
            unemployment = unemployment.with_source(
                *country,
                SourceMapping::annual(
                    ProviderQuery::world_bank(iso3, "SL.UEM.TOTL.ZS"),
                    Transform::None,
                ),
            );
        }

        // Monthly inflation only exists where a monthly CPI index does.
        let mut inflation_mom = Indicator::new(IndicatorKind::MonthlyInflationRate, true);
        for (country, series) in FRED_CPI {
            inflation_mom = inflation_mom.with_source(
                *country,
                SourceMapping::monthly(ProviderQuery::fred(*series), Transform::MonthOverMonth),
            );
        }

        let mut inflation_yoy = Indicator::new(IndicatorKind::AnnualInflationRate, true);
        for (country, series) in FRED_CPI {
            inflation_yoy = inflation_yoy.with_source(
                *country,
                SourceMapping::monthly(ProviderQuery::fred(*series), Transform::YearOverYear),
            );
        }
        for (country, iso3) in WB_ONLY {
            // The World Bank publishes the annual rate directly.
            inflation_yoy = inflation_yoy.with_source(
                *country,
                SourceMapping::annual(
                    ProviderQuery::world_bank(iso3, "FP.CPI.TOTL.ZG"),
                    Transform::None,
                ),
            );
        }

        let cpi = Indicator::new(IndicatorKind::CpiIndex, false)
            .with_source(
                Country::Usa,
                SourceMapping::monthly(ProviderQuery::fred("CPIAUCSL"), Transform::None),
            )
            .with_source(
                Country::Eurozone,
                SourceMapping::monthly(
                    ProviderQuery::new(Provider::Eurostat, "prc_hicp_midx")
                        .with_filter("unit", "I15")
                        .with_filter("coicop", "CP00")
                        .with_filter("geo", "EA19"),
                    Transform::None,
                ),
            )
            .with_source(
                Country::Uk,
                SourceMapping::monthly(
                    ProviderQuery::new(Provider::Ons, "D7BT").with_filter("dataset", "mm23"),
                    Transform::None,
                ),
            )
            .with_source(
                Country::Japan,
                SourceMapping::monthly(
                    ProviderQuery::new(Provider::EStat, "0003427113"),
                    Transform::None,
                ),
            )
            .with_source(
                Country::Australia,
                SourceMapping::quarterly(
                    ProviderQuery::new(Provider::Oecd, "PRICES_CPI/AUS.CPALTT01.IXOB.Q"),
                    Transform::None,
                ),
            )
            .with_source(
                Country::Canada,
                SourceMapping::monthly(
                    ProviderQuery::new(Provider::StatCan, "41690973"),
                    Transform::None,
                ),
            )
            .with_source(
                Country::Switzerland,
                SourceMapping::monthly(ProviderQuery::new(Provider::Snb, "likpr"), Transform::None),
            )
            .with_source(
                Country::Germany,
                SourceMapping::monthly(ProviderQuery::fred("DEUCPIALLMINMEI"), Transform::None),
            );

        let mut gdp = Indicator::new(IndicatorKind::RealGdpGrowth, true);
        for (country, iso3) in [
            (Country::Usa, "USA"),
            (Country::Germany, "DEU"),
            (Country::Australia, "AUS"),
            (Country::Switzerland, "CHE"),
            (Country::China, "CHN"),
            (Country::NewZealand, "NZL"),
        ] {
            gdp = gdp.with_source(
                country,
                SourceMapping::annual(
                    ProviderQuery::world_bank(iso3, "NY.GDP.MKTP.KD.ZG"),
                    Transform::None,
                ),
            );
        }
        gdp = gdp
            .with_source(
                Country::Uk,
                SourceMapping::quarterly(
                    ProviderQuery::new(Provider::Imf, "IFS/Q.GB.NGDP_R_PC_PP_PT"),
                    Transform::None,
                ),
            )
            .with_source(
                Country::Japan,
                SourceMapping::quarterly(
                    ProviderQuery::new(Provider::Imf, "IFS/Q.JP.NGDP_R_PC_PP_PT"),
                    Transform::None,
                ),
            )
            .with_source(
                Country::Eurozone,
                SourceMapping::quarterly(
                    ProviderQuery::new(Provider::Eurostat, "namq_10_gdp")
                        .with_filter("unit", "CLV_PCH_PRE")
                        .with_filter("geo", "EA19"),
                    Transform::None,
                ),
            )
            .with_source(
                Country::Canada,
                SourceMapping::quarterly(
                    ProviderQuery::new(Provider::StatCan, "65201210"),
                    Transform::None,
                ),
            );

        let mut policy = Indicator::new(IndicatorKind::PolicyRate, true);
        for (country, code) in [
            (Country::Usa, "M.US"),
            (Country::Eurozone, "M.XM"),
            (Country::Uk, "M.GB"),
            (Country::Japan, "M.JP"),
            (Country::Australia, "M.AU"),
            (Country::Canada, "M.CA"),
        ] {
            policy = policy.with_source(
                country,
                SourceMapping::monthly(
                    ProviderQuery::new(Provider::Bis, format!("WS_CBPOL_M/{code}")),
                    Transform::None,
                ),
            );
        }
        policy = policy.with_source(
            Country::Switzerland,
            SourceMapping::monthly(ProviderQuery::new(Provider::Snb, "snboffzisa"), Transform::None),
        );

        Self::new(vec![
            unemployment,
            inflation_mom,
            inflation_yoy,
            cpi,
            gdp,
            policy,
        ])
    }
}

const FRED_UNEMPLOYMENT: &[(Country, &str)] = &[
    (Country::Usa, "UNRATE"),
    (Country::Eurozone, "LRHUTTTTEZM156S"),
    (Country::Uk, "LRHUTTTTGBM156S"),
    (Country::Japan, "LRHUTTTTJPM156S"),
    (Country::Australia, "LRUNTTTTAUM156N"),
    (Country::Canada, "LRUNTTTTCAM156S"),
    (Country::Switzerland, "LRUNTTTTCHQ156N"),
    (Country::Germany, "LRHUTTTTDEM156S"),
];

const FRED_CPI: &[(Country, &str)] = &[
    (Country::Usa, "CPIAUCSL"),
    (Country::Eurozone, "CPALTT01EZM657N"),
    (Country::Uk, "CPALTT01GBM657N"),
    (Country::Japan, "CPALTT01JPM657N"),
    (Country::Australia, "CPALTT01AUM657N"),
    (Country::Canada, "CPALTT01CAM657N"),
    (Country::Switzerland, "CPALTT01CHM657N"),
    (Country::Germany, "CPALTT01DEM657N"),
];

/// Countries covered only through the World Bank's annual series.
const WB_ONLY: &[(Country, &str)] = &[(Country::China, "CHN"), (Country::NewZealand, "NZL")];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_round_trip() {
        for country in Country::ALL {
            assert_eq!(Country::from_name(country.name()), Some(*country));
        }
        for kind in IndicatorKind::ALL {
            assert_eq!(IndicatorKind::from_name(kind.name()), Some(*kind));
        }
        assert_eq!(Country::from_name("new zealand"), Some(Country::NewZealand));
        assert_eq!(Country::from_name("Atlantis"), None);
        assert_eq!(IndicatorKind::from_name("Shoe Size"), None);
    }

    #[test]
    fn builtin_catalog_coverage() {
        let reg = Registry::builtin();
        let unemployment = reg.get(IndicatorKind::UnemploymentRate).unwrap();
        assert!(unemployment.is_percentage());
        assert_eq!(unemployment.countries().count(), 10);

        let usa = unemployment.source_for(Country::Usa).unwrap();
        assert_eq!(usa.query, ProviderQuery::fred("UNRATE"));
        assert_eq!(usa.transform, Transform::None);

        let china = unemployment.source_for(Country::China).unwrap();
        assert_eq!(china.frequency, Frequency::Annual);

        assert!(reg.get_by_name("Unemployment Rate").is_some());
        assert!(reg.get_by_name("Shoe Size").is_none());

        let mom = reg.get(IndicatorKind::MonthlyInflationRate).unwrap();
        assert_eq!(
            mom.source_for(Country::Usa).unwrap().transform,
            Transform::MonthOverMonth
        );
        // No monthly CPI index for the World-Bank-only countries.
        assert!(mom.source_for(Country::China).is_none());

        let yoy = reg.get(IndicatorKind::AnnualInflationRate).unwrap();
        assert_eq!(
            yoy.source_for(Country::Uk).unwrap().transform,
            Transform::YearOverYear
        );
        // The World Bank series is already an annual rate.
        assert_eq!(
            yoy.source_for(Country::China).unwrap().transform,
            Transform::None
        );

        // Every provider is exercised somewhere in the catalog.
        let mut providers: Vec<&str> = reg
            .indicators()
            .flat_map(|i| {
                i.countries()
                    .filter_map(|c| i.source_for(c))
                    .map(|m| m.query.provider.id())
                    .collect::<Vec<_>>()
            })
            .collect();
        providers.sort_unstable();
        providers.dedup();
        assert_eq!(providers.len(), 10);
    }
}
