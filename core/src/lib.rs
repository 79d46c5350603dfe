//! # RSVP Core
//!
//! Domain types and the record store for the RSVP service.
//!
//! The crate is split the same way the service is:
//!
//! - [`record`]: the RSVP record, its raw submission form, and validation
//! - [`backend`]: the pluggable storage capability ([`RecordBackend`])
//! - [`store`]: the [`RecordStore`] that validates, normalizes and timestamps
//!   submissions before handing them to a backend
//! - [`summary`]: pure aggregation over a snapshot of records
//! - [`calendar`]: the iCalendar export for the event itself
//!
//! ## Example
//!
//! ```ignore
//! use rsvp_core::{RecordStore, RsvpSubmission};
//! use rsvp_core::environment::SystemClock;
//! use rsvp_storage::InMemoryBackend;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), rsvp_core::StoreError> {
//! let store = RecordStore::new(Arc::new(InMemoryBackend::new()), Arc::new(SystemClock));
//!
//! let submission: RsvpSubmission = serde_json::from_str(
//!     r#"{"name": "Jo", "email": "Jo@X.com", "attending": true, "adults": 2, "kids": 1}"#,
//! ).unwrap();
//!
//! let outcome = store.upsert(submission).await?;
//! assert!(outcome.inserted);
//! assert_eq!(outcome.record.email.as_str(), "jo@x.com");
//!
//! let summary = rsvp_core::summarize(&store.list().await?);
//! assert_eq!(summary.total_guests, 3);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod calendar;
pub mod record;
pub mod store;
pub mod summary;

pub use backend::{BackendFuture, RecordBackend, StorageError};
pub use calendar::{fold_line, render_calendar, unfold, EventDetails};
pub use record::{EmailKey, Field, RsvpRecord, RsvpSubmission, ValidationError};
pub use store::{RecordStore, StoreError, UpsertOutcome};
pub use summary::{summarize, Summary};

/// Environment traits injected into the record store.
///
/// Time is the only outside dependency of the core; it is abstracted so that
/// tests can pin or rewind it.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use rsvp_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
