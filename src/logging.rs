//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events; applications that have no
//! subscriber of their own can call [`init`] with a [`LoggingConfig`].

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Build the level filter for the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level when it is set.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.level.to_tracing_level();
        EnvFilter::new(level.as_str().to_ascii_lowercase())
    })
}

/// Install a global fmt subscriber.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(config: &LoggingConfig) -> bool {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(false);

    // Configure timestamps
    if config.timestamps {
        subscriber.try_init().is_ok()
    } else {
        subscriber.without_time().try_init().is_ok()
    }
}
