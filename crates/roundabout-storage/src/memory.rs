use async_trait::async_trait;
use jiff::Timestamp;
use parking_lot::RwLock;
use roundabout_core::content::ContentRecord;
use roundabout_core::rank::repair_plan;
use roundabout_core::store::{Result, RingStore};
use roundabout_core::{
    ContentRecords, Entry, EntryId, NewEntry, RecordId, ShortCode, StorageError,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

#[derive(Debug, Default)]
struct Table {
    entries: BTreeMap<EntryId, Entry>,
    by_code: HashMap<ShortCode, EntryId>,
    next_id: i64,
}

impl Table {
    fn ranked(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self.entries.values().cloned().collect();
        entries.sort_by_key(|entry| (entry.order_id, entry.id));
        entries
    }
}

/// In-memory implementation of [`RingStore`].
///
/// The whole table sits behind a single `RwLock`. Every mutation holds the
/// write lock from its first read to its last write, which makes each rank
/// mutation atomic with respect to concurrent readers.
#[derive(Debug, Default)]
pub struct InMemoryRingStore {
    table: RwLock<Table>,
}

impl InMemoryRingStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `entries` exactly as given, ranks included.
    ///
    /// This is how rows from an older schema are imported; their ranks may be
    /// zeroed or duplicated until the next repair. Ids are not reused: the
    /// next assigned id is one past the largest imported id.
    pub fn with_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut table = Table {
            next_id: 1,
            ..Table::default()
        };

        for entry in entries {
            table.next_id = table.next_id.max(entry.id.0 + 1);
            table.by_code.insert(entry.shortcode.clone(), entry.id);
            table.entries.insert(entry.id, entry);
        }

        Self {
            table: RwLock::new(table),
        }
    }
}

#[async_trait]
impl RingStore for InMemoryRingStore {
    async fn list(&self) -> Result<Vec<Entry>> {
        Ok(self.table.read().ranked())
    }

    async fn get(&self, id: EntryId) -> Result<Option<Entry>> {
        Ok(self.table.read().entries.get(&id).cloned())
    }

    async fn find_by_rank(&self, rank: i64) -> Result<Option<Entry>> {
        Ok(self
            .table
            .read()
            .ranked()
            .into_iter()
            .find(|entry| entry.order_id == rank))
    }

    async fn find_by_shortcode(&self, code: &ShortCode) -> Result<Option<Entry>> {
        let table = self.table.read();
        Ok(table
            .by_code
            .get(code)
            .and_then(|id| table.entries.get(id))
            .cloned())
    }

    async fn find_by_record(&self, record_id: RecordId) -> Result<Option<Entry>> {
        Ok(self
            .table
            .read()
            .entries
            .values()
            .find(|entry| entry.record_id == record_id)
            .cloned())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.table.read().entries.len() as u64)
    }

    async fn insert_last(&self, new: NewEntry) -> Result<Entry> {
        let mut table = self.table.write();

        if table.by_code.contains_key(&new.shortcode) {
            return Err(StorageError::Conflict(new.shortcode.to_string()));
        }

        let max_rank = table
            .entries
            .values()
            .map(|entry| entry.order_id)
            .max()
            .unwrap_or(0);

        table.next_id = table.next_id.max(1);
        let id = EntryId(table.next_id);
        table.next_id += 1;

        let entry = Entry {
            id,
            record_id: new.record_id,
            shortcode: new.shortcode,
            target_url: new.target_url,
            order_id: max_rank + 1,
        };

        table.by_code.insert(entry.shortcode.clone(), id);
        table.entries.insert(id, entry.clone());
        Ok(entry)
    }

    async fn remove(&self, id: EntryId) -> Result<Option<Entry>> {
        let mut table = self.table.write();

        let Some(removed) = table.entries.remove(&id) else {
            return Ok(None);
        };
        table.by_code.remove(&removed.shortcode);

        for entry in table.entries.values_mut() {
            if entry.order_id > removed.order_id {
                entry.order_id -= 1;
            }
        }

        Ok(Some(removed))
    }

    async fn swap_ranks(&self, a: EntryId, b: EntryId) -> Result<bool> {
        let mut table = self.table.write();

        let (Some(rank_a), Some(rank_b)) = (
            table.entries.get(&a).map(|entry| entry.order_id),
            table.entries.get(&b).map(|entry| entry.order_id),
        ) else {
            return Ok(false);
        };

        if let Some(entry) = table.entries.get_mut(&a) {
            entry.order_id = rank_b;
        }
        if let Some(entry) = table.entries.get_mut(&b) {
            entry.order_id = rank_a;
        }

        Ok(true)
    }

    async fn repair_ranks(&self) -> Result<usize> {
        let mut table = self.table.write();

        let ranks: Vec<(EntryId, i64)> = table
            .entries
            .values()
            .map(|entry| (entry.id, entry.order_id))
            .collect();
        let plan = repair_plan(&ranks);

        for change in &plan {
            if let Some(entry) = table.entries.get_mut(&change.id) {
                debug!(id = %change.id, from = change.from, to = change.to, "reassigning rank");
                entry.order_id = change.to;
            }
        }

        Ok(plan.len())
    }

    async fn purge(&self) -> Result<Vec<Entry>> {
        let mut table = self.table.write();
        let entries = table.ranked();
        table.entries.clear();
        table.by_code.clear();
        Ok(entries)
    }
}

/// In-memory implementation of [`ContentRecords`].
#[derive(Debug)]
pub struct InMemoryContentRecords {
    records: RwLock<BTreeMap<RecordId, ContentRecord>>,
    next_id: AtomicI64,
}

impl InMemoryContentRecords {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for InMemoryContentRecords {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentRecords for InMemoryContentRecords {
    async fn create_record(&self, title: &str) -> std::result::Result<RecordId, StorageError> {
        let id = RecordId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = ContentRecord {
            id,
            title: title.to_string(),
            created_at: Timestamp::now(),
        };
        self.records.write().insert(id, record);
        Ok(id)
    }

    async fn delete_record(&self, id: RecordId) -> std::result::Result<bool, StorageError> {
        Ok(self.records.write().remove(&id).is_some())
    }

    async fn get_record(
        &self,
        id: RecordId,
    ) -> std::result::Result<Option<ContentRecord>, StorageError> {
        Ok(self.records.read().get(&id).cloned())
    }
}
