use sdmx_convert_core::cache::{
    CROSS_SECTIONAL_CACHE, CSV_CROSS_SECTIONAL_CACHE, CacheError, CacheRegistry,
};
use sdmx_convert_core::domain::attributes::{AttributeMap, SeriesKey};
use serial_test::serial;

fn series_key(pairs: &[(&str, &str)]) -> SeriesKey {
    pairs.iter().copied().collect()
}

fn attribute_map(pairs: &[(&str, &str)]) -> AttributeMap {
    pairs.iter().copied().collect()
}

#[test]
fn create_is_idempotent_per_namespace() {
    let registry = CacheRegistry::with_defaults();

    let first = registry.create_cache(CROSS_SECTIONAL_CACHE);
    let second = registry.create_cache(CROSS_SECTIONAL_CACHE);

    first
        .put(series_key(&[("FREQ", "A")]), attribute_map(&[("OBS", "1")]))
        .expect("open cache");

    assert_eq!(registry.cache_count(), 1);
    assert_eq!(second.len(), 1);
}

#[test]
fn put_then_get_round_trips() {
    let registry = CacheRegistry::with_defaults();
    let cache = registry.create_cache(CSV_CROSS_SECTIONAL_CACHE);

    let key = series_key(&[("FREQ", "A"), ("REF_AREA", "IT"), ("ADJUSTMENT", "N")]);
    let value = attribute_map(&[("OBS_VALUE", "3.5"), ("OBS_STATUS", "A")]);

    cache.put(key.clone(), value.clone()).expect("open cache");

    let cached = cache.get(&key).expect("open cache");
    assert_eq!(cached, Some(value));
}

#[test]
fn key_lookup_ignores_dimension_order() {
    let registry = CacheRegistry::with_defaults();
    let cache = registry.create_cache(CROSS_SECTIONAL_CACHE);

    let stored = series_key(&[("FREQ", "A"), ("REF_AREA", "IT")]);
    cache
        .put(stored, attribute_map(&[("OBS", "1")]))
        .expect("open cache");

    // Same dimensions, different insertion order.
    let reordered = series_key(&[("REF_AREA", "IT"), ("FREQ", "A")]);
    assert!(cache.get(&reordered).expect("open cache").is_some());
}

#[test]
fn never_created_namespace_yields_no_handle() {
    let registry = CacheRegistry::with_defaults();
    assert!(registry.cache("neverCreated").is_none());
}

#[test]
fn close_invalidates_all_outstanding_handles() {
    let registry = CacheRegistry::with_defaults();
    let original = registry.create_cache("teardown");
    let clone = original.clone();
    let via_lookup = registry.cache("teardown").expect("created above");

    registry.close_cache(&original);

    for handle in [&original, &clone, &via_lookup] {
        let err = handle
            .get(&series_key(&[("FREQ", "A")]))
            .expect_err("closed cache");
        assert!(matches!(err, CacheError::InvalidHandle { .. }));
        let err = handle
            .put(series_key(&[("FREQ", "A")]), attribute_map(&[("OBS", "1")]))
            .expect_err("closed cache");
        assert!(matches!(err, CacheError::InvalidHandle { .. }));
    }
    assert!(registry.cache("teardown").is_none());
}

#[test]
fn closing_twice_is_a_silent_no_op() {
    let registry = CacheRegistry::with_defaults();
    let handle = registry.create_cache("doubleClose");

    registry.close_cache(&handle);
    registry.close_cache(&handle);

    assert!(handle.is_closed());
}

#[test]
fn reopened_namespace_starts_empty() {
    let registry = CacheRegistry::with_defaults();
    let stale = registry.create_cache("recycled");
    let key = series_key(&[("FREQ", "A")]);
    stale
        .put(key.clone(), attribute_map(&[("OBS", "1")]))
        .expect("open cache");

    registry.close_cache(&stale);

    let fresh = registry.create_cache("recycled");
    assert!(fresh.is_empty());
    assert_eq!(fresh.get(&key).expect("open cache"), None);
    assert!(stale.get(&key).is_err());
}

#[test]
fn cross_sectional_lookup_lifecycle() {
    let registry = CacheRegistry::with_defaults();

    let cache = registry.create_cache(CROSS_SECTIONAL_CACHE);
    let key = series_key(&[("DIM1", "A")]);
    let value = attribute_map(&[("OBS", "10")]);

    cache.put(key.clone(), value.clone()).expect("open cache");
    assert_eq!(cache.get(&key).expect("open cache"), Some(value));

    registry.close_cache(&cache);

    let err = cache.get(&key).expect_err("closed cache");
    assert!(matches!(err, CacheError::InvalidHandle { .. }));
}

#[test]
fn statistics_track_lookup_outcomes() {
    let registry = CacheRegistry::with_defaults();
    let cache = registry.create_cache("counters");

    let present = series_key(&[("FREQ", "A")]);
    let absent = series_key(&[("FREQ", "Z")]);

    cache
        .put(present.clone(), attribute_map(&[("OBS", "1")]))
        .expect("open cache");
    cache.get(&present).expect("open cache");
    cache.get(&present).expect("open cache");
    cache.get(&absent).expect("open cache");

    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.insertions, 1);
    assert_eq!(stats.entries, 1);
    assert!((stats.hit_ratio() - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
#[serial]
fn global_registry_is_process_wide() {
    let name = "lifecycleGlobal";
    let handle = CacheRegistry::global().create_cache(name);
    handle
        .put(series_key(&[("FREQ", "A")]), attribute_map(&[("OBS", "1")]))
        .expect("open cache");

    // A second access path sees the same cache.
    let again = CacheRegistry::global().cache(name).expect("created above");
    assert_eq!(again.len(), 1);

    CacheRegistry::global().close_cache(&handle);
    assert!(CacheRegistry::global().cache(name).is_none());
}
