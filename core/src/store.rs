//! The RSVP record store.
//!
//! [`RecordStore`] is constructed once at startup and shared with every
//! request handler. It validates submissions, normalizes emails, stamps
//! records with the injected [`Clock`], and delegates persistence to a
//! [`RecordBackend`].

use crate::backend::{RecordBackend, StorageError};
use crate::environment::Clock;
use crate::record::{EmailKey, RsvpRecord, RsvpSubmission, ValidationError};
use metrics::{counter, gauge};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned by [`RecordStore`] operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The submission was rejected; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result of [`RecordStore::upsert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// The record as stored.
    pub record: RsvpRecord,
    /// `true` if no record existed for this email before the call.
    pub inserted: bool,
}

/// Upsert-by-email store for RSVP records.
///
/// Cloning is cheap: the backend and clock are shared.
///
/// # Concurrency
///
/// `upsert` reads the previous record and then writes the new one as two
/// backend calls. Two overlapping upserts for the same email are
/// last-writer-wins; neither call fails.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn RecordBackend>,
    clock: Arc<dyn Clock>,
}

impl RecordStore {
    /// Create a store over `backend`, timestamping writes with `clock`.
    #[must_use]
    pub fn new(backend: Arc<dyn RecordBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    /// Validate `submission` and write it under its normalized email.
    ///
    /// The stored timestamp is the clock's current time, or the previous
    /// record's timestamp if the clock reads earlier than that.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if the submission is invalid (no write happens)
    /// - [`StoreError::Storage`] if the backend cannot read or persist
    pub async fn upsert(&self, submission: RsvpSubmission) -> Result<UpsertOutcome, StoreError> {
        let valid = match submission.validate() {
            Ok(valid) => valid,
            Err(err) => {
                counter!("rsvp_submissions_total", "outcome" => "rejected").increment(1);
                warn!(field = %err.field, error = %err.message, "RSVP submission rejected");
                return Err(err.into());
            }
        };

        let previous = self.backend.get(&valid.email).await?;
        let now = self.clock.now();
        let updated_at = previous
            .as_ref()
            .map_or(now, |previous| now.max(previous.updated_at));

        let record = valid.into_record(updated_at);
        let inserted = self.backend.put(record.clone()).await?.is_none();

        let outcome = if inserted { "inserted" } else { "updated" };
        counter!("rsvp_submissions_total", "outcome" => outcome).increment(1);
        info!(
            email = %record.email,
            inserted,
            attending = record.attending,
            guests = record.guest_count(),
            "RSVP stored"
        );

        Ok(UpsertOutcome { record, inserted })
    }

    /// Look up the record for `email` (normalized first).
    ///
    /// A blank email has no record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the backend cannot be read.
    pub async fn get(&self, email: &str) -> Result<Option<RsvpRecord>, StoreError> {
        let Some(key) = EmailKey::parse(email) else {
            return Ok(None);
        };

        let record = self.backend.get(&key).await?;
        debug!(email = %key, found = record.is_some(), "RSVP lookup");
        Ok(record)
    }

    /// Remove the record for `email` (normalized first). Returns whether one
    /// was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the backend cannot persist.
    pub async fn delete(&self, email: &str) -> Result<bool, StoreError> {
        let Some(key) = EmailKey::parse(email) else {
            counter!("rsvp_withdrawals_total", "outcome" => "not_found").increment(1);
            return Ok(false);
        };

        let removed = self.backend.remove(&key).await?;
        let outcome = if removed { "removed" } else { "not_found" };
        counter!("rsvp_withdrawals_total", "outcome" => outcome).increment(1);
        info!(email = %key, removed, "RSVP withdrawal");
        Ok(removed)
    }

    /// Every stored record. Order is backend-defined.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the backend cannot be read.
    pub async fn list(&self) -> Result<Vec<RsvpRecord>, StoreError> {
        let records = self.backend.list().await?;
        #[allow(clippy::cast_precision_loss)] // record counts stay far below 2^52
        gauge!("rsvp_records").set(records.len() as f64);
        Ok(records)
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the backend cannot be read.
    pub async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.backend.list().await?.len())
    }

    /// Whether no records are stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the backend cannot be read.
    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len().await? == 0)
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}
