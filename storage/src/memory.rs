//! Volatile backend.

use crate::{position, upsert_in_place};
use rsvp_core::{BackendFuture, EmailKey, RecordBackend, RsvpRecord};
use tokio::sync::RwLock;

/// In-memory [`RecordBackend`].
///
/// Useful for tests and for running the server without a data file.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    records: RwLock<Vec<RsvpRecord>>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-loaded with `records`.
    ///
    /// Later duplicates of the same email replace earlier ones.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = RsvpRecord>) -> Self {
        let mut stored = Vec::new();
        for record in records {
            upsert_in_place(&mut stored, record);
        }
        Self {
            records: RwLock::new(stored),
        }
    }
}

impl RecordBackend for InMemoryBackend {
    fn put(&self, record: RsvpRecord) -> BackendFuture<'_, Option<RsvpRecord>> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            Ok(upsert_in_place(&mut records, record))
        })
    }

    fn get<'a>(&'a self, email: &'a EmailKey) -> BackendFuture<'a, Option<RsvpRecord>> {
        Box::pin(async move {
            let records = self.records.read().await;
            Ok(position(&records, email).map(|index| records[index].clone()))
        })
    }

    fn remove<'a>(&'a self, email: &'a EmailKey) -> BackendFuture<'a, bool> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            Ok(position(&records, email)
                .map(|index| records.remove(index))
                .is_some())
        })
    }

    fn list(&self) -> BackendFuture<'_, Vec<RsvpRecord>> {
        Box::pin(async move { Ok(self.records.read().await.clone()) })
    }
}
