use async_trait::async_trait;
use roundabout_core::error::Result;
use roundabout_core::{Entry, EntryId, RecordId};

/// Operations over the ordered redirect ring.
///
/// Every rank-dependent operation first repairs the ranks, so callers act on a ring
/// whose `order_id` values are exactly `1..=N`.
#[async_trait]
pub trait Ring: Send + Sync + 'static {
    /// Validates the input and appends a new entry at the end of the ring.
    async fn create(&self, shortcode: &str, target_url: &str) -> Result<Entry>;

    /// Removes an entry, closes the rank gap it leaves and deletes its
    /// content record.
    async fn delete(&self, id: EntryId) -> Result<Entry>;

    /// Returns every entry in ring order.
    async fn list(&self) -> Result<Vec<Entry>>;

    async fn get_by_id(&self, id: EntryId) -> Result<Entry>;

    /// Exchanges the ranks of two entries.
    async fn swap(&self, a: EntryId, b: EntryId) -> Result<()>;

    /// Swaps an entry with its predecessor.
    async fn move_up(&self, id: EntryId) -> Result<()>;

    /// Swaps an entry with its successor.
    async fn move_down(&self, id: EntryId) -> Result<()>;

    /// Reassigns dense ranks. Returns the number of entries that moved.
    async fn repair(&self) -> Result<usize>;

    /// Returns the target URL of the entry following `shortcode`, wrapping
    /// from the last entry back to the first.
    async fn resolve_next(&self, shortcode: &str) -> Result<String>;

    /// Returns the target URL of the entry paired with a content record, or
    /// `None` when the record exists but has no entry.
    async fn target_for_record(&self, record_id: RecordId) -> Result<Option<String>>;

    /// Removes every entry together with its content record.
    async fn purge(&self) -> Result<usize>;
}
