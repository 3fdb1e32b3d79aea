use eyre::Context;
use std::env;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    layer::SubscriberExt,
    Layer, Registry,
};

fn env_filter(value: Option<&str>) -> eyre::Result<Targets> {
    let Some(targets) = value else {
        return Ok(Targets::default().with_default(LevelFilter::INFO));
    };

    targets.parse().context("Failed to parse RUST_LOG value")
}

/// Install the global tracing subscriber
///
/// Log levels are taken from `RUST_LOG`. An unset variable falls back to `INFO`.
pub fn initialise() -> eyre::Result<()> {
    let rust_log = env::var("RUST_LOG").ok();
    let env_filter = env_filter(rust_log.as_deref())?;

    let subscriber = Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber)
        .context("Couldn't install the global tracing subscriber")?;

    Ok(())
}
