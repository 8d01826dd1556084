//! Logging initialization for the tablefacets binary
//!
//! Human-readable or JSON output on stderr, so stdout stays reserved for the
//! command's own JSON. `RUST_LOG` overrides the default filter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging(json: bool) -> anyhow::Result<()> {
    let env_filter = build_env_filter();
    let subscriber = tracing_subscriber::registry().with(env_filter);

    if json {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr);
        subscriber.with(layer).try_init()?;
    } else {
        let layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
        subscriber.with(layer).try_init()?;
    }

    tracing::debug!(json, "Logging initialized");
    Ok(())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tablefacets=info,tablefacets_query=info"))
}
