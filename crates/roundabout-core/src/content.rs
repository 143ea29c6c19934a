use crate::entry::RecordId;
use crate::error::StorageError;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A host-side content record paired with a ring entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: RecordId,
    /// The shortcode of the entry the record belongs to.
    pub title: String,
    pub created_at: Timestamp,
}

/// The host system's content records.
///
/// The ring creates one record per entry and deletes it with the entry. The
/// two stores are not transactional with each other, so the ring compensates
/// on partial failure instead.
#[async_trait]
pub trait ContentRecords: Send + Sync + 'static {
    /// Creates a published record titled `title`.
    async fn create_record(&self, title: &str) -> Result<RecordId, StorageError>;

    /// Deletes a record permanently.
    /// Returns `true` if the record existed and was removed.
    async fn delete_record(&self, id: RecordId) -> Result<bool, StorageError>;

    /// Retrieves a record. Returns `None` if it does not exist.
    async fn get_record(&self, id: RecordId) -> Result<Option<ContentRecord>, StorageError>;
}
