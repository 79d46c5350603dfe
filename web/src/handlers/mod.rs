//! HTTP request handlers.

pub mod calendar;
pub mod health;
pub mod metrics;
pub mod responses;
pub mod rsvp;

pub use calendar::download_calendar;
pub use health::health_check;
pub use metrics::render_metrics;
pub use responses::list_responses;
pub use rsvp::{get_rsvp, submit_rsvp, withdraw_rsvp};
