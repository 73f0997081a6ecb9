use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default directive when `RUST_LOG` is unset.
pub fn default_filter(level: &str) -> String {
    format!("fincast={level}")
}

/// Initialize logging to stderr.
///
/// The level can be controlled via the `level` parameter or the `RUST_LOG`
/// environment variable. Calling this more than once keeps the first subscriber.
pub fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init();

    if result.is_ok() {
        tracing::debug!(level, "logging initialized");
    }
}
