//! # RSVP Testing
//!
//! Testing utilities and helpers for the RSVP service.
//!
//! This crate provides:
//! - Deterministic clocks ([`FixedClock`], [`ManualClock`])
//! - A backend that always fails ([`FailingBackend`]) for error paths
//! - Builders for submissions and records
//!
//! ## Example
//!
//! ```ignore
//! use rsvp_core::RecordStore;
//! use rsvp_storage::InMemoryBackend;
//! use rsvp_testing::{test_clock, SubmissionBuilder};
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn test_upsert() {
//!     let store = RecordStore::new(Arc::new(InMemoryBackend::new()), Arc::new(test_clock()));
//!
//!     let outcome = store
//!         .upsert(SubmissionBuilder::new("Jo", "Jo@X.com").adults(2).build())
//!         .await
//!         .unwrap();
//!     assert!(outcome.inserted);
//! }
//! ```

mod backend_mocks;

pub use backend_mocks::FailingBackend;

use chrono::{DateTime, Utc};
use rsvp_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use rsvp_testing::mocks::FixedClock;
    /// use rsvp_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }

        /// The time this clock reports.
        #[must_use]
        pub const fn time(&self) -> DateTime<Utc> {
            self.time
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to, in either direction.
    ///
    /// Used to check that record timestamps never go backwards even when
    /// the system clock does.
    #[derive(Debug)]
    pub struct ManualClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Create a clock reading `time`.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Set the current reading.
        ///
        /// # Panics
        ///
        /// Panics if a previous holder of the lock panicked.
        #[allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
        pub fn set(&self, time: DateTime<Utc>) {
            *self.time.lock().unwrap() = time;
        }

        /// Move the reading by `delta` (negative to rewind).
        ///
        /// # Panics
        ///
        /// Panics if a previous holder of the lock panicked.
        #[allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
        pub fn advance(&self, delta: chrono::Duration) {
            let mut time = self.time.lock().unwrap();
            *time += delta;
        }
    }

    impl Clock for ManualClock {
        #[allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap()
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Builders for submissions and records.
pub mod helpers {
    use super::{DateTime, Utc};
    use rsvp_core::{EmailKey, RsvpRecord, RsvpSubmission};
    use serde_json::Value;

    /// Fluent builder for [`RsvpSubmission`].
    ///
    /// Counts are taken as `i64` so that negative values can be submitted;
    /// [`raw`](Self::raw) sets any field to an arbitrary JSON value.
    ///
    /// # Example
    ///
    /// ```
    /// use rsvp_testing::SubmissionBuilder;
    ///
    /// let submission = SubmissionBuilder::new("Jo", "Jo@X.com")
    ///     .attending(true)
    ///     .adults(2)
    ///     .kids(1)
    ///     .build();
    /// assert_eq!(submission.validate().unwrap().email.as_str(), "jo@x.com");
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct SubmissionBuilder {
        submission: RsvpSubmission,
    }

    impl SubmissionBuilder {
        /// Start from a name and an email; every other field is absent.
        #[must_use]
        pub fn new(name: &str, email: &str) -> Self {
            Self {
                submission: RsvpSubmission {
                    name: Some(Value::from(name)),
                    email: Some(Value::from(email)),
                    ..RsvpSubmission::default()
                },
            }
        }

        /// Start from an entirely empty submission.
        #[must_use]
        pub fn empty() -> Self {
            Self::default()
        }

        /// Set `attending`.
        #[must_use]
        pub fn attending(mut self, attending: bool) -> Self {
            self.submission.attending = Some(Value::from(attending));
            self
        }

        /// Set `adults`.
        #[must_use]
        pub fn adults(mut self, adults: i64) -> Self {
            self.submission.adults = Some(Value::from(adults));
            self
        }

        /// Set `kids`.
        #[must_use]
        pub fn kids(mut self, kids: i64) -> Self {
            self.submission.kids = Some(Value::from(kids));
            self
        }

        /// Set `dietary`.
        #[must_use]
        pub fn dietary(mut self, dietary: &str) -> Self {
            self.submission.dietary = Some(Value::from(dietary));
            self
        }

        /// Set `comments`.
        #[must_use]
        pub fn comments(mut self, comments: &str) -> Self {
            self.submission.comments = Some(Value::from(comments));
            self
        }

        /// Set a field by its JSON name to any value. Unknown names are ignored.
        #[must_use]
        pub fn raw(mut self, field: &str, value: Value) -> Self {
            let slot = match field {
                "name" => &mut self.submission.name,
                "email" => &mut self.submission.email,
                "attending" => &mut self.submission.attending,
                "adults" => &mut self.submission.adults,
                "kids" => &mut self.submission.kids,
                "dietary" => &mut self.submission.dietary,
                "comments" => &mut self.submission.comments,
                _ => return self,
            };
            *slot = Some(value);
            self
        }

        /// Finish the submission.
        #[must_use]
        pub fn build(self) -> RsvpSubmission {
            self.submission
        }
    }

    /// A stored-form record: attending, one adult, no kids, no notes.
    ///
    /// # Panics
    ///
    /// Panics if `email` is blank.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn record(name: &str, email: &str, updated_at: DateTime<Utc>) -> RsvpRecord {
        RsvpRecord {
            name: name.to_string(),
            email: EmailKey::parse(email).expect("test records need an email"),
            attending: true,
            adults: 1,
            kids: 0,
            dietary: String::new(),
            comments: String::new(),
            updated_at,
        }
    }
}

// Re-export commonly used items
pub use helpers::{record, SubmissionBuilder};
pub use mocks::{test_clock, FixedClock, ManualClock};
