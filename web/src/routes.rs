//! Router configuration.

use crate::handlers::{
    download_calendar, get_rsvp, health_check, list_responses, render_metrics, submit_rsvp,
    withdraw_rsvp,
};
use crate::middleware::request_id_layer;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// `/metrics` is only mounted when `state` carries a Prometheus handle.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/rsvp", post(submit_rsvp))
        .route("/rsvp/:email", get(get_rsvp).delete(withdraw_rsvp))
        .route("/responses", get(list_responses))
        .route("/calendar", get(download_calendar));

    let mut router: Router<AppState> = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes);

    if state.metrics.is_some() {
        router = router.route("/metrics", get(render_metrics));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
