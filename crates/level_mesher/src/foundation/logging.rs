//! Logger setup for host tools and tests
//!
//! The pipeline only emits through the `log` macros re-exported here.

pub use log::{debug, info, warn, error, trace};

/// Install `env_logger`, reading `RUST_LOG` and falling back to `info`
pub fn init() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Install a logger that writes through the test harness
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_for_tests() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}
