//! mei-rs
//!
//! A lightweight Rust library for aggregating macroeconomic indicators
//! (unemployment, inflation, GDP growth, policy rates) from a dozen
//! national and international statistical agencies into one normalized
//! time-series shape. Pairs with the `mei` CLI.
//!
//! ### Features
//! - Per-agency wire-format parsers converging on a canonical series
//! - Tolerant normalization: malformed rows are dropped, missing values
//!   survive as explicit absences
//! - Per-query TTL caching with single-flight fetches
//! - Derived month-over-month / year-over-year percentage change
//! - Concurrent resolution of many countries with per-fetch deadlines
//! - Alignment of mixed-history series into a recent-period table
//!
//! ### Example
//! ```no_run
//! use std::sync::Arc;
//! use mei_rs::{Client, Registry, Resolver};
//!
//! # async fn demo() {
//! let resolver = Resolver::new(Registry::builtin(), Arc::new(Client::default()));
//! let series = resolver.resolve("China", "Unemployment Rate").await;
//! for obs in &series.observations {
//!     println!("{}  {:?}", obs.date, obs.value);
//! }
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod change;
pub mod error;
pub mod models;
pub mod normalize;
pub mod parse;
pub mod registry;
pub mod resolve;
pub mod table;

pub use api::{Client, ClientConfig, Fetch};
pub use error::SourceError;
pub use models::{Frequency, Observation, Provider, ProviderQuery, Series, Transform};
pub use registry::{Country, Indicator, IndicatorKind, Registry, SourceMapping};
pub use resolve::{Resolver, ResolverOptions};
pub use table::{AlignedRow, AlignedTable, CellStyle, DEFAULT_WINDOW, align};
