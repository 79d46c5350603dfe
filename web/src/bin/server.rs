//! RSVP server.
//!
//! ```bash
//! RSVP_DATA_FILE=data/rsvps.json PORT=8080 cargo run --bin rsvp-server
//! ```

use rsvp_web::{server, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        storage = ?config.storage.kind,
        data_file = %config.storage.data_file.display(),
        metrics = config.metrics.enabled,
        "Configuration loaded"
    );

    server::run(config).await
}
