//! RSVP endpoints.
//!
//! - POST /api/rsvp - Submit or update an RSVP
//! - GET /api/rsvp/:email - Look up an RSVP
//! - DELETE /api/rsvp/:email - Withdraw an RSVP

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use rsvp_core::{RsvpRecord, RsvpSubmission};
use serde::Serialize;

const NOT_FOUND_MESSAGE: &str = "No RSVP found for this email";

/// Response after a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: &'static str,
    /// The record as stored.
    pub rsvp: RsvpRecord,
}

/// Response to a lookup.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    /// Whether a record exists for the email.
    pub found: bool,
    /// The stored record, when found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsvp: Option<RsvpRecord>,
    /// Explanation, when not found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Response to a withdrawal.
#[derive(Debug, Serialize)]
pub struct WithdrawResponse {
    /// Whether a record was removed.
    pub success: bool,
    /// Human-readable outcome.
    pub message: &'static str,
}

/// Submit an RSVP, replacing any earlier one for the same email.
///
/// Returns 201 when the email is new and 200 when it replaced a record.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/rsvp \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Jo", "email": "jo@example.com", "attending": true, "adults": 2}'
/// ```
///
/// # Errors
///
/// - 400 `BAD_REQUEST` if the body is not a JSON object
/// - 400 `VALIDATION_ERROR` if a field is invalid
/// - 500 if storage fails
pub async fn submit_rsvp(
    State(state): State<AppState>,
    body: Result<Json<RsvpSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let Json(submission) = body?;
    let outcome = state.store.upsert(submission).await?;

    let (status, message) = if outcome.inserted {
        (StatusCode::CREATED, "RSVP received!")
    } else {
        (StatusCode::OK, "RSVP updated!")
    };

    Ok((
        status,
        Json(SubmitResponse {
            success: true,
            message,
            rsvp: outcome.record,
        }),
    ))
}

/// Look up the RSVP for `email`. Matching ignores case and surrounding
/// whitespace.
///
/// # Errors
///
/// Returns 500 if storage fails.
pub async fn get_rsvp(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<(StatusCode, Json<LookupResponse>), AppError> {
    let (status, response) = match state.store.get(&email).await? {
        Some(rsvp) => (
            StatusCode::OK,
            LookupResponse {
                found: true,
                rsvp: Some(rsvp),
                message: None,
            },
        ),
        None => (
            StatusCode::NOT_FOUND,
            LookupResponse {
                found: false,
                rsvp: None,
                message: Some(NOT_FOUND_MESSAGE),
            },
        ),
    };

    Ok((status, Json(response)))
}

/// Withdraw the RSVP for `email`.
///
/// # Errors
///
/// Returns 500 if storage fails.
pub async fn withdraw_rsvp(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<(StatusCode, Json<WithdrawResponse>), AppError> {
    let (status, response) = if state.store.delete(&email).await? {
        (
            StatusCode::OK,
            WithdrawResponse {
                success: true,
                message: "RSVP withdrawn",
            },
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            WithdrawResponse {
                success: false,
                message: NOT_FOUND_MESSAGE,
            },
        )
    };

    Ok((status, Json(response)))
}
