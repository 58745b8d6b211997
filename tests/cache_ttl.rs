use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use mei_rs::cache::SeriesCache;
use mei_rs::error::SourceError;
use mei_rs::{Frequency, Observation, ProviderQuery, Series};

fn fixture(tag: &str) -> Series {
    Series {
        source: tag.into(),
        frequency: Frequency::Monthly,
        observations: vec![Observation {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            value: Some(3.7),
        }],
    }
}

#[tokio::test]
async fn second_call_within_ttl_fetches_once() {
    let cache = SeriesCache::new(Duration::from_secs(3600));
    let q = ProviderQuery::fred("UNRATE");
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let calls = calls.clone();
        let got = cache
            .get_or_fetch(&q, || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(fixture("fred:UNRATE"))
            })
            .await
            .unwrap();
        assert_eq!(got.len(), 1);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_entry_fetches_again() {
    let cache = SeriesCache::new(Duration::from_millis(50));
    let q = ProviderQuery::fred("UNRATE");
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let calls = calls.clone();
        cache
            .get_or_fetch(&q, || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(fixture("fred:UNRATE"))
            })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_fetch_is_not_cached() {
    let cache = SeriesCache::new(Duration::from_secs(3600));
    let q = ProviderQuery::fred("UNRATE");

    let first = cache
        .get_or_fetch(&q, || async {
            Err(SourceError::transport("fred", "boom"))
        })
        .await;
    assert!(first.is_err());

    let second = cache
        .get_or_fetch(&q, || async { Ok(fixture("fred:UNRATE")) })
        .await;
    assert!(second.is_ok());
}

#[tokio::test]
async fn same_key_is_single_flight() {
    let cache = SeriesCache::new(Duration::from_secs(3600));
    let q = ProviderQuery::fred("UNRATE");
    let calls = Arc::new(AtomicUsize::new(0));

    let slow = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(fixture("fred:UNRATE"))
        }
    };
    let (a, b) = tokio::join!(
        cache.get_or_fetch(&q, slow(calls.clone())),
        cache.get_or_fetch(&q, slow(calls.clone()))
    );
    assert_eq!(a.unwrap(), b.unwrap());
    // The second caller awaited the first fetch instead of issuing its own.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn distinct_keys_proceed_in_parallel() {
    let cache = SeriesCache::new(Duration::from_secs(3600));
    let q1 = ProviderQuery::fred("UNRATE");
    let q2 = ProviderQuery::fred("CPIAUCSL");

    let slow = |tag: &'static str| async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(fixture(tag))
    };
    let started = Instant::now();
    let (a, b) = tokio::join!(
        cache.get_or_fetch(&q1, || slow("fred:UNRATE")),
        cache.get_or_fetch(&q2, || slow("fred:CPIAUCSL")),
    );
    a.unwrap();
    b.unwrap();
    assert!(started.elapsed() < Duration::from_millis(250));
}
