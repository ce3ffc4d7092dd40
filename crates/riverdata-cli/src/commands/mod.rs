pub mod build;
pub mod fetch;
pub mod normalize;
pub mod parse_id;

use riverdata_core::config::{load_config, ClientConfig};
use riverdata_core::error::RiverDataError;
use std::path::Path;
use tracing::debug;

/// Log to stderr. `RUST_LOG` overrides the level picked by `--verbose`.
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("riverdata={level},riverdata_core={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!(level, "logging initialized");
}

/// Config file if given, else defaults, with `--base-url` applied last.
pub fn load_client_config(
    path: Option<&Path>,
    base_url: Option<String>,
) -> Result<ClientConfig, RiverDataError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    Ok(config)
}
