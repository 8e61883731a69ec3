//! Structured logging with tracing

use tracing::dispatcher::{Dispatch, SetGlobalDefaultError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level so operators can raise
/// verbosity without touching config files.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), SetGlobalDefaultError> {
    tracing::dispatcher::set_global_default(dispatch_for(config))
}

fn dispatch_for(config: &LoggingConfig) -> Dispatch {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_str() {
        "json" => Dispatch::new(registry.with(fmt::layer().json())),
        "compact" => Dispatch::new(registry.with(fmt::layer().compact())),
        _ => Dispatch::new(registry.with(fmt::layer().pretty())),
    }
}
