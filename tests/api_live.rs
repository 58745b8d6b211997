//! Tests that hit live agency APIs. Opt-in: cargo test --features online
#![cfg(feature = "online")]

use std::sync::Arc;

use mei_rs::{Client, Registry, Resolver};

#[tokio::test]
async fn worldbank_unemployment_china() {
    let resolver = Resolver::new(Registry::builtin(), Arc::new(Client::default()));
    let series = resolver.resolve("China", "Unemployment Rate").await;
    assert!(!series.is_empty());
    for pair in series.observations.windows(2) {
        assert!(pair[0].date < pair[1].date);
    }
}

#[tokio::test]
async fn aligned_table_over_worldbank_only_countries() {
    let resolver = Resolver::new(Registry::builtin(), Arc::new(Client::default()));
    let countries = vec!["China".to_string(), "New Zealand".to_string()];
    let table = resolver
        .resolve_table("Unemployment Rate", &countries, 13)
        .await;
    assert!(!table.is_blank());
    assert_eq!(table.rows.len(), 2);
}
