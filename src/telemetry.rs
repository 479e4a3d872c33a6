use std::sync::Once;

use metrics::{Unit, describe_counter, describe_gauge, describe_histogram};
use thiserror::Error;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

static METRIC_DESCRIPTIONS: Once = Once::new();

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to install tracing subscriber: {reason}")]
    Install { reason: String },
}

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), TelemetryError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| TelemetryError::Install {
            reason: err.to_string(),
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "sdmx_convert_cache_hit_total",
            Unit::Count,
            "Total number of cache lookups served from a live entry."
        );
        describe_counter!(
            "sdmx_convert_cache_miss_total",
            Unit::Count,
            "Total number of cache lookups that found nothing."
        );
        describe_counter!(
            "sdmx_convert_cache_insert_total",
            Unit::Count,
            "Total number of cache entries stored, counting overwrites."
        );
        describe_counter!(
            "sdmx_convert_cache_expire_total",
            Unit::Count,
            "Total number of cache entries dropped after their idle window elapsed."
        );
        describe_gauge!(
            "sdmx_convert_cache_entries",
            Unit::Count,
            "Current number of entries stored per named cache."
        );
        describe_histogram!(
            "sdmx_convert_cache_sweep_ms",
            Unit::Milliseconds,
            "Cache sweep latency in milliseconds."
        );
    });
}
