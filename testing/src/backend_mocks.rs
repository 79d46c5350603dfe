//! Backend mocks for exercising storage error paths.

use rsvp_core::{BackendFuture, EmailKey, RecordBackend, RsvpRecord, StorageError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Backend whose every operation fails with [`StorageError::Io`].
///
/// Counts the calls it receives so tests can assert that validation
/// failures never reach storage.
///
/// # Example
///
/// ```
/// use rsvp_testing::FailingBackend;
/// use rsvp_core::RecordBackend;
///
/// # async fn example() {
/// let backend = FailingBackend::new();
/// assert!(backend.list().await.is_err());
/// assert_eq!(backend.calls(), 1);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FailingBackend {
    calls: AtomicUsize,
}

impl FailingBackend {
    /// Create a new failing backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations attempted so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self, operation: &str) -> Result<T, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Io(format!("{operation}: disk unavailable")))
    }
}

impl RecordBackend for FailingBackend {
    fn put(&self, _record: RsvpRecord) -> BackendFuture<'_, Option<RsvpRecord>> {
        let result = self.fail("put");
        Box::pin(async move { result })
    }

    fn get<'a>(&'a self, _email: &'a EmailKey) -> BackendFuture<'a, Option<RsvpRecord>> {
        let result = self.fail("get");
        Box::pin(async move { result })
    }

    fn remove<'a>(&'a self, _email: &'a EmailKey) -> BackendFuture<'a, bool> {
        let result = self.fail("remove");
        Box::pin(async move { result })
    }

    fn list(&self) -> BackendFuture<'_, Vec<RsvpRecord>> {
        let result = self.fail("list");
        Box::pin(async move { result })
    }
}
