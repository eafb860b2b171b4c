use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Compose the mock backend's subscriber. `RUST_LOG` wins over `env_filter`
/// when set.
pub fn get_subscriber(env_filter: String) -> impl Subscriber + Send + Sync {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .pretty()
        .finish()
}

/// Register the subscriber globally, routing `log` records through it.
/// Only call once per process.
pub fn init_subscriber(
    subscriber: impl Subscriber + Send + Sync,
) -> anyhow::Result<()> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}

/// Log an error with its full chain of causes.
pub fn log_error(e: &anyhow::Error) {
    tracing::error!("{e:#}");
}
