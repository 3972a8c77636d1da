use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// The filter used when `RUST_LOG` isn't set.
pub const DEFAULT_LOG_FILTER: &str = "warn,inventa_chat=info,inventa_chat_lib=info";

/// Builds the log filter from `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global `tracing` subscriber.
///
/// Calling this more than once is harmless: only the first call installs a subscriber.
pub fn init() {
    let installed = tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();

    if let Err(err) = installed {
        tracing::debug!(error = %err, "a tracing subscriber is already installed");
    }
}
