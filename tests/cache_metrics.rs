use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use metrics_util::debugging::DebuggingRecorder;
use sdmx_convert_core::cache::{CacheConfig, CacheRegistry};
use sdmx_convert_core::domain::attributes::{AttributeMap, SeriesKey};

fn series_key(pairs: &[(&str, &str)]) -> SeriesKey {
    pairs.iter().copied().collect()
}

fn attribute_map(pairs: &[(&str, &str)]) -> AttributeMap {
    pairs.iter().copied().collect()
}

#[test]
fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let config = CacheConfig {
        idle_expiry_ms: 100,
        enable_sweeper: false,
        ..Default::default()
    };
    let registry = CacheRegistry::new(config).expect("valid config");
    let cache = registry.create_cache("metricsExercise");

    let key = series_key(&[("FREQ", "A")]);
    let value = attribute_map(&[("OBS", "1")]);

    // Miss, insert, hit.
    assert!(cache.get(&key).expect("open cache").is_none());
    cache.put(key.clone(), value).expect("open cache");
    assert!(cache.get(&key).expect("open cache").is_some());

    // Expired lookup.
    thread::sleep(Duration::from_millis(250));
    assert!(cache.get(&key).expect("open cache").is_none());

    // Sweep latency.
    registry.purge_expired();

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "sdmx_convert_cache_hit_total",
        "sdmx_convert_cache_miss_total",
        "sdmx_convert_cache_insert_total",
        "sdmx_convert_cache_expire_total",
        "sdmx_convert_cache_entries",
        "sdmx_convert_cache_sweep_ms",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
