//! Storage backend trait for RSVP records.
//!
//! The record store owns validation, normalization and timestamps. Everything
//! it needs from storage fits in four keyed operations, which is what a
//! [`RecordBackend`] provides.
//!
//! # Implementations
//!
//! - `InMemoryBackend` (in `rsvp-storage`): volatile, for tests and demos
//! - `JsonFileBackend` (in `rsvp-storage`): one JSON document rewritten on
//!   every mutation
//!
//! # Example
//!
//! ```no_run
//! use rsvp_core::backend::{RecordBackend, StorageError};
//! use rsvp_core::EmailKey;
//!
//! async fn withdraw<B: RecordBackend>(backend: &B, raw: &str) -> Result<bool, StorageError> {
//!     match EmailKey::parse(raw) {
//!         Some(key) => backend.remove(&key).await,
//!         None => Ok(false),
//!     }
//! }
//! ```

use crate::record::{EmailKey, RsvpRecord};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by every [`RecordBackend`] operation.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing storage failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Records could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The persisted document exists but cannot be parsed.
    #[error("Corrupt data file {}: {reason}", path.display())]
    Corrupt {
        /// Path of the unreadable document.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Durable keyed storage for RSVP records.
///
/// Keys are always normalized ([`EmailKey`]). A successful return from a
/// mutating operation means the change has reached the backing storage.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the server shares one backend
/// between all request handlers behind an `Arc`. Each operation must be
/// atomic with respect to the others on the same backend, but the store makes
/// no promise across several calls.
///
/// # Dyn Compatibility
///
/// Operations return [`BackendFuture`] instead of using `async fn` so that the
/// trait can be used as `Arc<dyn RecordBackend>`.
pub trait RecordBackend: Send + Sync {
    /// Store `record` under its email, replacing any record with that key.
    ///
    /// Returns the replaced record, or `None` if the key was new. A replaced
    /// record keeps its position in [`list`](Self::list) order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the collection cannot be persisted. The
    /// backend's visible state is unchanged in that case.
    fn put(&self, record: RsvpRecord) -> BackendFuture<'_, Option<RsvpRecord>>;

    /// Look up the record for `email`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing storage cannot be read.
    fn get<'a>(&'a self, email: &'a EmailKey) -> BackendFuture<'a, Option<RsvpRecord>>;

    /// Remove the record for `email`. Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the collection cannot be persisted.
    fn remove<'a>(&'a self, email: &'a EmailKey) -> BackendFuture<'a, bool>;

    /// All stored records.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing storage cannot be read.
    fn list(&self) -> BackendFuture<'_, Vec<RsvpRecord>>;
}
