use std::env::{self, VarError};

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG` for filtering and `RUST_LOG_FORMAT=json` for
/// machine-readable output; defaults to a compact human format at INFO.
pub fn init() {
    try_init(LevelFilter::INFO);
}

/// Like [`init`], but tolerates an already-installed subscriber.
///
/// Tests call `init` from multiple entry points, so a second install is a
/// no-op instead of a panic.
pub fn try_init(level: LevelFilter) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_format = match env::var("RUST_LOG_FORMAT") {
        Ok(format) => format,
        Err(VarError::NotPresent) => String::new(),
        Err(error) => {
            warn!("Failed to read RUST_LOG_FORMAT, falling back to default: {error}");
            String::new()
        }
    };

    let log_layer = match log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_filter(env_filter)
            .boxed(),
    };

    let _ = tracing_subscriber::registry().with(log_layer).try_init();
}
