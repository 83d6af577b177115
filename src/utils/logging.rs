use anyhow::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

// env_filter = trace|debug|info|warn|error|off, RUST_LOG takes precedence
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// init_tracing installs a global fmt subscriber for the calling application.
///
/// The library only emits events; nothing is printed until the application
/// calls this (or installs a subscriber of its own).
pub fn init_tracing(default_filter: &str) -> Result<(), Error> {
    Registry::default()
        .with(env_filter(default_filter))
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(Error::from)
}
