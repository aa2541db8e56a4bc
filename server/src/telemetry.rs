use anyhow::Context;
use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Compose multiple layers into a `tracing` subscriber.
///
/// The filter is read from the `RUST_LOG` environment variable, falling back to
/// `default_filter` if the variable is missing or malformed.
/// Log lines are written to `sink`.
pub fn get_subscriber<Sink>(
    default_filter: String,
    sink: Sink,
) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_writer(sink))
}

/// Register a subscriber as global default to process span data.
///
/// It also redirects all `log` events to `tracing`.
/// It should only be called once!
pub fn init_telemetry(subscriber: impl Subscriber + Sync + Send) -> Result<(), anyhow::Error> {
    LogTracer::init().context("Failed to redirect `log` events to `tracing`")?;
    set_global_default(subscriber).context("Failed to set a `tracing` global subscriber")?;
    Ok(())
}
