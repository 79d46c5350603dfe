//! Calendar download.

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use rsvp_core::render_calendar;

/// Content type of the calendar download.
pub const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Serve the configured event as an `.ics` attachment, stamped with the
/// current time.
#[allow(clippy::unused_async)]
pub async fn download_calendar(State(state): State<AppState>) -> Response {
    let body = render_calendar(&state.event, state.clock.now());
    let disposition = format!("attachment; filename=\"{}\"", state.event.filename);

    let mut response = (
        [(header::CONTENT_TYPE, HeaderValue::from_static(CALENDAR_CONTENT_TYPE))],
        body,
    )
        .into_response();

    match HeaderValue::try_from(disposition) {
        Ok(value) => {
            response.headers_mut().insert(header::CONTENT_DISPOSITION, value);
        }
        Err(err) => {
            tracing::warn!(filename = %state.event.filename, error = %err, "calendar filename is not a valid header value");
        }
    }

    response
}
