//! Storage backends for the RSVP record store.
//!
//! Both backends implement [`RecordBackend`](rsvp_core::RecordBackend) and
//! keep records in insertion order:
//!
//! - [`InMemoryBackend`]: a `Vec` behind a lock, lost on restart
//! - [`JsonFileBackend`]: the same `Vec`, written through to a single JSON
//!   document on every mutation
//!
//! # Example
//!
//! ```ignore
//! use rsvp_storage::{CorruptFilePolicy, JsonFileBackend};
//!
//! async fn example() -> Result<(), rsvp_core::StorageError> {
//!     let backend = JsonFileBackend::open("data/rsvps.json", CorruptFilePolicy::Fail).await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod json_file;
mod memory;

pub use json_file::{CorruptFilePolicy, JsonFileBackend};
pub use memory::InMemoryBackend;

use rsvp_core::{EmailKey, RsvpRecord};

/// Position of `email` in `records`.
fn position(records: &[RsvpRecord], email: &EmailKey) -> Option<usize> {
    records.iter().position(|record| &record.email == email)
}

/// Replace the record with the same email in place, or append.
fn upsert_in_place(records: &mut Vec<RsvpRecord>, record: RsvpRecord) -> Option<RsvpRecord> {
    match position(records, &record.email) {
        Some(index) => Some(std::mem::replace(&mut records[index], record)),
        None => {
            records.push(record);
            None
        }
    }
}
