use std::str::FromStr;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Noisy transport crates kept at info when only a bare level is given.
const QUIET_DEFAULTS: &str = "hyper=info,hyper_util=info,reqwest=info,alloy_transport_http=info";

/// Expands a bare level such as `debug` with [`QUIET_DEFAULTS`]. Directive strings
/// (containing `,` or `=`) are used as given.
pub fn filter_spec(log_level: &str) -> String {
    let normalized = log_level.trim();
    if normalized.contains(',') || normalized.contains('=') {
        normalized.to_string()
    } else {
        format!("{normalized},{QUIET_DEFAULTS}")
    }
}

/// Human-readable progress lines on stdout.
pub fn setup_logging(log_level: &str) {
    let filter = EnvFilter::from_str(&filter_spec(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();
}
