//! Tracing subscriber setup for hosts and tests.
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber filtered by `RUST_LOG`, falling back to `info`.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init() -> bool {
    init_with_default("info")
}

/// Like [`init`] with an explicit fallback directive such as
/// `"storage_runtime=debug"`.
pub fn init_with_default(directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Subscriber writing through the test harness so output is captured per
/// test.
pub fn init_for_tests() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("storage_core=debug,storage_runtime=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .is_ok()
}
