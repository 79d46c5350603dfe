//! JSON-file backend.
//!
//! ## Layout
//!
//! ```text
//! <path>           # JSON array of record objects, rewritten on every mutation
//! <path>.tmp       # transient, renamed over <path> once fully written
//! <path>.corrupt   # an unparsable document moved aside by StartEmpty
//! ```
//!
//! The document is read once in [`JsonFileBackend::open`]. After that the
//! in-memory copy is authoritative and each mutation writes the full
//! collection back before returning.

use crate::{position, upsert_in_place};
use rsvp_core::{BackendFuture, EmailKey, RecordBackend, RsvpRecord, StorageError};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// What [`JsonFileBackend::open`] does with a document it cannot parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptFilePolicy {
    /// Refuse to open; the server does not start.
    #[default]
    Fail,
    /// Move the document to `<path>.corrupt` and start with no records.
    StartEmpty,
}

/// [`RecordBackend`] persisted as a single JSON document.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    records: Mutex<Vec<RsvpRecord>>,
}

impl JsonFileBackend {
    /// Open the document at `path`.
    ///
    /// A missing or blank file is an empty collection; the file is created on
    /// the first write. Duplicate emails in the document collapse to the last
    /// occurrence.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Io`] if the file exists but cannot be read, or cannot
    ///   be moved aside under [`CorruptFilePolicy::StartEmpty`]
    /// - [`StorageError::Corrupt`] if it cannot be parsed under
    ///   [`CorruptFilePolicy::Fail`]
    pub async fn open(path: impl Into<PathBuf>, policy: CorruptFilePolicy) -> Result<Self, StorageError> {
        let path = path.into();
        let records = load(&path, policy).await?;
        info!(path = %path.display(), records = records.len(), "RSVP data file opened");

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Location of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &[RsvpRecord]) -> Result<(), StorageError> {
        let document = serde_json::to_vec_pretty(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let staging = with_suffix(&self.path, ".tmp");
        fs::write(&staging, document).await?;
        fs::rename(&staging, &self.path).await?;

        debug!(path = %self.path.display(), records = records.len(), "RSVP data file written");
        Ok(())
    }
}

impl RecordBackend for JsonFileBackend {
    fn put(&self, record: RsvpRecord) -> BackendFuture<'_, Option<RsvpRecord>> {
        Box::pin(async move {
            let mut records = self.records.lock().await;
            let mut next = records.clone();
            let previous = upsert_in_place(&mut next, record);

            self.persist(&next).await?;
            *records = next;
            Ok(previous)
        })
    }

    fn get<'a>(&'a self, email: &'a EmailKey) -> BackendFuture<'a, Option<RsvpRecord>> {
        Box::pin(async move {
            let records = self.records.lock().await;
            Ok(position(&records, email).map(|index| records[index].clone()))
        })
    }

    fn remove<'a>(&'a self, email: &'a EmailKey) -> BackendFuture<'a, bool> {
        Box::pin(async move {
            let mut records = self.records.lock().await;
            let Some(index) = position(&records, email) else {
                return Ok(false);
            };

            let mut next = records.clone();
            next.remove(index);

            self.persist(&next).await?;
            *records = next;
            Ok(true)
        })
    }

    fn list(&self) -> BackendFuture<'_, Vec<RsvpRecord>> {
        Box::pin(async move { Ok(self.records.lock().await.clone()) })
    }
}

async fn load(path: &Path, policy: CorruptFilePolicy) -> Result<Vec<RsvpRecord>, StorageError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    match serde_json::from_slice::<Vec<RsvpRecord>>(&bytes) {
        Ok(loaded) => {
            let mut records = Vec::with_capacity(loaded.len());
            for record in loaded {
                upsert_in_place(&mut records, record);
            }
            Ok(records)
        }
        Err(err) => match policy {
            CorruptFilePolicy::Fail => Err(StorageError::Corrupt {
                path: path.to_path_buf(),
                reason: err.to_string(),
            }),
            CorruptFilePolicy::StartEmpty => {
                let aside = with_suffix(path, ".corrupt");
                fs::rename(path, &aside).await?;
                warn!(
                    path = %path.display(),
                    moved_to = %aside.display(),
                    error = %err,
                    "RSVP data file unreadable, starting empty"
                );
                Ok(Vec::new())
            }
        },
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
