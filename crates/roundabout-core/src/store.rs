use crate::entry::{Entry, EntryId, NewEntry, RecordId};
use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Durable table of ring entries.
///
/// Every mutating method is one atomic, isolated unit: a concurrent reader
/// never observes a duplicated or missing rank produced half-way through it.
#[async_trait]
pub trait RingStore: Send + Sync + 'static {
    /// Returns every entry ordered by `order_id` ascending, ties by `id`.
    async fn list(&self) -> Result<Vec<Entry>>;

    /// Retrieves an entry by id. Returns `None` if it does not exist.
    async fn get(&self, id: EntryId) -> Result<Option<Entry>>;

    /// Retrieves the entry holding `rank`.
    async fn find_by_rank(&self, rank: i64) -> Result<Option<Entry>>;

    /// Retrieves the entry with the given shortcode.
    async fn find_by_shortcode(&self, code: &ShortCode) -> Result<Option<Entry>>;

    /// Retrieves the entry paired with a content record.
    async fn find_by_record(&self, record_id: RecordId) -> Result<Option<Entry>>;

    /// Number of live entries.
    async fn count(&self) -> Result<u64>;

    /// Appends an entry with rank `max + 1` (or `1` on an empty store).
    /// Returns `Err(Conflict)` if the shortcode is already taken.
    async fn insert_last(&self, entry: NewEntry) -> Result<Entry>;

    /// Removes an entry and shifts every higher rank down by one.
    /// Returns the removed entry, or `None` if it did not exist.
    async fn remove(&self, id: EntryId) -> Result<Option<Entry>>;

    /// Exchanges the ranks of two entries. Returns `false` and changes nothing
    /// if either entry does not exist.
    async fn swap_ranks(&self, a: EntryId, b: EntryId) -> Result<bool>;

    /// Reassigns dense ranks following [`crate::rank::repair_plan`].
    /// Returns the number of entries whose rank changed.
    async fn repair_ranks(&self) -> Result<usize>;

    /// Removes every entry, returning them in rank order.
    async fn purge(&self) -> Result<Vec<Entry>>;
}
