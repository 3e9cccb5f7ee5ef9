// Logging setup (tracing + tracing-subscriber)
//
// RUST_LOG wins when set, e.g. RUST_LOG=esg_disclosure=debug;
// otherwise the configured filter is used.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber. Call once at binary startup.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Test subscriber writing through the test harness; safe to call repeatedly.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
