//! Prometheus exposition.

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

/// Render recorded metrics in the Prometheus text format.
///
/// Only routed when a recorder handle is present; answers 404 otherwise.
#[allow(clippy::unused_async)]
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            String::new(),
        ),
    }
}
