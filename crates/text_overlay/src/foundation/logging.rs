//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

use crate::config::OverlayConfig;

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a fallback filter used when `RUST_LOG` is unset
///
/// Returns `false` if a global logger was already installed, which is common
/// when the host renderer set up logging before creating the overlay.
pub fn init_with_level(level: &str) -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init()
        .is_ok()
}

/// Initialize logging with `config.log_level` as the fallback filter
///
/// Returns `false` if a global logger was already installed.
pub fn init_from_config(config: &OverlayConfig) -> bool {
    init_with_level(&config.log_level)
}
