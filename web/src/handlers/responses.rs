//! Summary of every RSVP received.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use rsvp_core::{summarize, RsvpRecord, Summary};
use serde::Serialize;

/// Summary totals followed by the records they were computed from.
#[derive(Debug, Serialize)]
pub struct ResponsesResponse {
    /// Headcount totals.
    #[serde(flatten)]
    pub summary: Summary,
    /// Every stored record.
    pub responses: Vec<RsvpRecord>,
}

/// List every RSVP with summary totals.
///
/// ```bash
/// curl http://localhost:8080/api/responses
/// # {"total":2,"attending":1,"not_attending":1,"total_adults":2,...,"responses":[...]}
/// ```
///
/// # Errors
///
/// Returns 500 if storage fails.
pub async fn list_responses(
    State(state): State<AppState>,
) -> Result<Json<ResponsesResponse>, AppError> {
    let responses = state.store.list().await?;
    let summary = summarize(&responses);
    tracing::debug!(total = summary.total, "listing responses");

    Ok(Json(ResponsesResponse { summary, responses }))
}
