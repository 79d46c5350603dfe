//! Server bootstrap: storage, metrics, listener and graceful shutdown.

use crate::config::{Config, StorageKind};
use crate::routes::build_router;
use crate::state::AppState;
use anyhow::Context;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use rsvp_core::environment::SystemClock;
use rsvp_core::{RecordBackend, RecordStore};
use rsvp_storage::{CorruptFilePolicy, InMemoryBackend, JsonFileBackend};
use std::sync::Arc;
use tracing::{info, warn};

/// Open the configured backend.
///
/// # Errors
///
/// Returns an error if the JSON document cannot be read, or is corrupt and
/// recovery is disabled.
pub async fn open_backend(config: &Config) -> anyhow::Result<Arc<dyn RecordBackend>> {
    match config.storage.kind {
        StorageKind::Memory => {
            warn!("Using in-memory storage; RSVPs will be lost on restart");
            Ok(Arc::new(InMemoryBackend::new()))
        }
        StorageKind::File => {
            let policy = if config.storage.recover_corrupt {
                CorruptFilePolicy::StartEmpty
            } else {
                CorruptFilePolicy::Fail
            };
            let backend = JsonFileBackend::open(&config.storage.data_file, policy)
                .await
                .with_context(|| {
                    format!(
                        "failed to open RSVP data file {}",
                        config.storage.data_file.display()
                    )
                })?;
            info!(path = %config.storage.data_file.display(), "Using JSON file storage");
            Ok(Arc::new(backend))
        }
    }
}

/// Install the global Prometheus recorder.
///
/// # Errors
///
/// Returns an error if a recorder is already installed.
pub fn install_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    metrics::describe_counter!(
        "rsvp_submissions_total",
        "RSVP submissions by outcome (inserted, updated, rejected)"
    );
    metrics::describe_counter!(
        "rsvp_withdrawals_total",
        "RSVP withdrawals by outcome (removed, not_found)"
    );
    metrics::describe_gauge!("rsvp_records", "Number of stored RSVPs at the last listing");

    Ok(handle)
}

/// Build application state from `config`.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or metrics cannot be
/// installed.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let backend = open_backend(config).await?;
    let clock = Arc::new(SystemClock);
    let store = RecordStore::new(backend, clock.clone());
    let state = AppState::new(store, config.event.clone(), clock);

    if config.metrics.enabled {
        Ok(state.with_metrics(install_metrics()?))
    } else {
        Ok(state)
    }
}

/// Serve the application until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if startup fails or the listener cannot bind.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = build_state(&config).await?;
    let records = state.store.len().await?;
    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    info!(
        address = %address,
        records,
        metrics = config.metrics.enabled,
        "RSVP server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("RSVP server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
///
/// If a handler cannot be installed that signal is ignored and the other
/// one still triggers shutdown.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        () = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
