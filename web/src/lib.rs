//! Axum HTTP server for the RSVP service.
//!
//! The server is a thin shell around [`rsvp_core::RecordStore`]: handlers
//! parse the request, call the store (and the aggregator for summaries), and
//! map the result to a JSON response.
//!
//! # Routes
//!
//! ```text
//! POST   /api/rsvp           submit or update an RSVP (201 insert, 200 update)
//! GET    /api/rsvp/:email    look up an RSVP
//! DELETE /api/rsvp/:email    withdraw an RSVP
//! GET    /api/responses      summary totals plus every record
//! GET    /api/calendar       .ics download for the event
//! GET    /health             liveness
//! GET    /metrics            Prometheus exposition (when enabled)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rsvp_web::{Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     server::run(Config::from_env()).await
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

// Re-export key types for convenience
pub use config::Config;
pub use error::AppError;
pub use middleware::{request_id_layer, RequestId, REQUEST_ID_HEADER};
pub use routes::build_router;
pub use state::AppState;
