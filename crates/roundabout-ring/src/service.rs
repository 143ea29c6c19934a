use crate::ring::Ring;
use async_trait::async_trait;
use roundabout_core::error::Result;
use roundabout_core::rank::successor;
use roundabout_core::{
    ContentRecords, Entry, EntryId, NewEntry, RecordId, RingError, RingStore, ShortCode, TargetUrl,
};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// A concrete implementation of the `Ring` trait.
///
/// This service wraps a `RingStore` and a `ContentRecords` backend to handle:
/// - Input validation at the boundary
/// - Pairing every entry with a content record, with compensation when the
///   append fails
/// - Rank repair before every operation
/// - Cyclic successor lookup
///
/// The two backends share no transaction. A failure between them is undone
/// on create and surfaced as `RingError::Storage` on delete.
#[derive(Debug)]
pub struct RingService<S, C> {
    store: Arc<S>,
    records: Arc<C>,
}

impl<S, C> Clone for RingService<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            records: Arc::clone(&self.records),
        }
    }
}

impl<S: RingStore, C: ContentRecords> RingService<S, C> {
    pub fn new(store: S, records: C) -> Self {
        Self {
            store: Arc::new(store),
            records: Arc::new(records),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn records(&self) -> &C {
        &self.records
    }

    /// Runs the rank repair that precedes every ring operation.
    async fn heal(&self) -> Result<usize> {
        let repaired = self.store.repair_ranks().await?;
        if repaired > 0 {
            warn!(repaired, "ranks were not dense, reassigned");
        }
        Ok(repaired)
    }

    async fn require(&self, id: EntryId) -> Result<Entry> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| RingError::NotFound(format!("entry {id}")))
    }

    /// Swaps `entry` with the entry holding `rank`, which must exist once the
    /// ranks are dense.
    ///
    /// The ranks are read before the swap's atomic unit. A concurrent reorder
    /// may therefore exchange `entry` with a non-adjacent neighbour, though
    /// the ranks stay dense.
    async fn swap_with_rank(&self, entry: &Entry, rank: i64) -> Result<()> {
        let neighbor = self.store.find_by_rank(rank).await?.ok_or_else(|| {
            RingError::InconsistentState(format!("no entry holds rank {rank}"))
        })?;

        if !self.store.swap_ranks(entry.id, neighbor.id).await? {
            return Err(RingError::NotFound(format!("entry {}", entry.id)));
        }

        debug!(
            id = %entry.id,
            neighbor = %neighbor.id,
            from = entry.order_id,
            to = rank,
            "moved entry"
        );
        Ok(())
    }
}

#[async_trait]
impl<S: RingStore, C: ContentRecords> Ring for RingService<S, C> {
    async fn create(&self, shortcode: &str, target_url: &str) -> Result<Entry> {
        let shortcode = ShortCode::new(shortcode)?;
        let target_url = TargetUrl::parse(target_url)?;

        self.heal().await?;

        if self.store.find_by_shortcode(&shortcode).await?.is_some() {
            info!(code = %shortcode, "shortcode already taken");
            return Err(RingError::DuplicateShortcode(shortcode.to_string()));
        }

        let record_id = self.records.create_record(shortcode.as_str()).await?;

        let new = NewEntry {
            record_id,
            shortcode: shortcode.clone(),
            target_url: target_url.into_inner(),
        };

        match self.store.insert_last(new).await {
            Ok(entry) => {
                info!(
                    id = %entry.id,
                    code = %entry.shortcode,
                    rank = entry.order_id,
                    "created entry"
                );
                Ok(entry)
            }
            Err(e) => {
                warn!(code = %shortcode, record = %record_id, error = %e, "append failed, removing content record");
                if let Err(cleanup) = self.records.delete_record(record_id).await {
                    warn!(record = %record_id, error = %cleanup, "failed to remove orphaned content record");
                }
                Err(e.into())
            }
        }
    }

    async fn delete(&self, id: EntryId) -> Result<Entry> {
        self.heal().await?;

        let entry = self
            .store
            .remove(id)
            .await?
            .ok_or_else(|| RingError::NotFound(format!("entry {id}")))?;

        info!(id = %entry.id, code = %entry.shortcode, rank = entry.order_id, "deleted entry");

        match self.records.delete_record(entry.record_id).await {
            Ok(true) => Ok(entry),
            Ok(false) => {
                debug!(record = %entry.record_id, "content record already gone");
                Ok(entry)
            }
            Err(e) => {
                warn!(id = %entry.id, record = %entry.record_id, error = %e, "failed to delete content record");
                Err(e.into())
            }
        }
    }

    async fn list(&self) -> Result<Vec<Entry>> {
        self.heal().await?;
        Ok(self.store.list().await?)
    }

    async fn get_by_id(&self, id: EntryId) -> Result<Entry> {
        self.heal().await?;
        self.require(id).await
    }

    async fn swap(&self, a: EntryId, b: EntryId) -> Result<()> {
        self.heal().await?;

        if a == b {
            self.require(a).await?;
            return Ok(());
        }

        if !self.store.swap_ranks(a, b).await? {
            return Err(RingError::NotFound(format!("entry {a} or {b}")));
        }

        debug!(a = %a, b = %b, "swapped entries");
        Ok(())
    }

    async fn move_up(&self, id: EntryId) -> Result<()> {
        self.heal().await?;

        let entry = self.require(id).await?;
        if entry.order_id <= 1 {
            return Err(RingError::AlreadyFirst(id));
        }

        self.swap_with_rank(&entry, entry.order_id - 1).await
    }

    async fn move_down(&self, id: EntryId) -> Result<()> {
        self.heal().await?;

        let entry = self.require(id).await?;
        let len = self.store.count().await?;
        if entry.order_id >= len as i64 {
            return Err(RingError::AlreadyLast(id));
        }

        self.swap_with_rank(&entry, entry.order_id + 1).await
    }

    async fn repair(&self) -> Result<usize> {
        self.heal().await
    }

    async fn resolve_next(&self, shortcode: &str) -> Result<String> {
        self.heal().await?;

        let entries = self.store.list().await?;
        if entries.is_empty() {
            return Err(RingError::EmptyRing);
        }

        // A malformed shortcode can never be stored, so it simply finds no match.
        let Some(position) = entries
            .iter()
            .position(|entry| entry.shortcode.as_str() == shortcode)
        else {
            trace!(code = shortcode, "shortcode not in ring");
            return Err(RingError::NotFound(format!("shortcode {shortcode}")));
        };

        let from = &entries[position];
        let to = &entries[successor(position, entries.len())];

        debug!(
            from = %from.shortcode,
            from_rank = from.order_id,
            to = %to.shortcode,
            to_rank = to.order_id,
            "resolved next hop"
        );

        Ok(to.target_url.clone())
    }

    async fn target_for_record(&self, record_id: RecordId) -> Result<Option<String>> {
        if self.records.get_record(record_id).await?.is_none() {
            return Err(RingError::NotFound(format!("record {record_id}")));
        }

        Ok(self
            .store
            .find_by_record(record_id)
            .await?
            .map(|entry| entry.target_url))
    }

    async fn purge(&self) -> Result<usize> {
        let removed = self.store.purge().await?;
        let mut failed = 0usize;

        for entry in &removed {
            if let Err(e) = self.records.delete_record(entry.record_id).await {
                warn!(record = %entry.record_id, error = %e, "failed to delete content record");
                failed += 1;
            }
        }

        info!(removed = removed.len(), failed, "purged ring");

        if failed > 0 {
            return Err(RingError::Storage(format!(
                "{failed} of {} content records could not be deleted",
                removed.len()
            )));
        }
        Ok(removed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundabout_core::rank::is_dense;
    use roundabout_core::store;
    use roundabout_core::StorageError;
    use roundabout_storage::{InMemoryContentRecords, InMemoryRingStore};

    type TestRing = RingService<InMemoryRingStore, InMemoryContentRecords>;

    fn test_ring() -> TestRing {
        RingService::new(InMemoryRingStore::new(), InMemoryContentRecords::new())
    }

    async fn ring_of(codes: &[&str]) -> (TestRing, Vec<Entry>) {
        let ring = test_ring();
        let mut entries = vec![];
        for code in codes {
            let url = format!("https://{code}.example");
            entries.push(ring.create(code, &url).await.unwrap());
        }
        (ring, entries)
    }

    async fn codes(ring: &impl Ring) -> Vec<String> {
        ring.list()
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.shortcode.to_string())
            .collect()
    }

    async fn assert_dense(ring: &impl Ring) {
        let ranks = ring.list().await.unwrap().into_iter().map(|e| e.order_id);
        assert!(is_dense(ranks));
    }

    /// Content records that are always unavailable.
    struct BrokenRecords;

    #[async_trait]
    impl ContentRecords for BrokenRecords {
        async fn create_record(&self, _title: &str) -> std::result::Result<RecordId, StorageError> {
            Err(StorageError::Unavailable("records offline".to_string()))
        }

        async fn delete_record(&self, _id: RecordId) -> std::result::Result<bool, StorageError> {
            Err(StorageError::Unavailable("records offline".to_string()))
        }

        async fn get_record(
            &self,
            _id: RecordId,
        ) -> std::result::Result<Option<roundabout_core::ContentRecord>, StorageError> {
            Err(StorageError::Unavailable("records offline".to_string()))
        }
    }

    /// An in-memory store whose appends always fail.
    #[derive(Default)]
    struct FullStore(InMemoryRingStore);

    #[async_trait]
    impl RingStore for FullStore {
        async fn list(&self) -> store::Result<Vec<Entry>> {
            self.0.list().await
        }

        async fn get(&self, id: EntryId) -> store::Result<Option<Entry>> {
            self.0.get(id).await
        }

        async fn find_by_rank(&self, rank: i64) -> store::Result<Option<Entry>> {
            self.0.find_by_rank(rank).await
        }

        async fn find_by_shortcode(&self, code: &ShortCode) -> store::Result<Option<Entry>> {
            self.0.find_by_shortcode(code).await
        }

        async fn find_by_record(&self, record_id: RecordId) -> store::Result<Option<Entry>> {
            self.0.find_by_record(record_id).await
        }

        async fn count(&self) -> store::Result<u64> {
            self.0.count().await
        }

        async fn insert_last(&self, _entry: NewEntry) -> store::Result<Entry> {
            Err(StorageError::Timeout("append".to_string()))
        }

        async fn remove(&self, id: EntryId) -> store::Result<Option<Entry>> {
            self.0.remove(id).await
        }

        async fn swap_ranks(&self, a: EntryId, b: EntryId) -> store::Result<bool> {
            self.0.swap_ranks(a, b).await
        }

        async fn repair_ranks(&self) -> store::Result<usize> {
            self.0.repair_ranks().await
        }

        async fn purge(&self) -> store::Result<Vec<Entry>> {
            self.0.purge().await
        }
    }

    #[tokio::test]
    async fn create_appends_last() {
        let (ring, entries) = ring_of(&["a", "b"]).await;
        assert_eq!(entries[0].order_id, 1);
        assert_eq!(entries[1].order_id, 2);

        let c = ring.create("c", "https://c.example").await.unwrap();

        assert_eq!(c.order_id, 3);
        assert_eq!(codes(&ring).await, vec!["a", "b", "c"]);
        assert_eq!(ring.records().len(), 3);
    }

    #[tokio::test]
    async fn create_in_empty_ring_gets_rank_one() {
        let ring = test_ring();

        let entry = ring.create("solo", "https://solo.example").await.unwrap();

        assert_eq!(entry.order_id, 1);
        assert_eq!(ring.list().await.unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn create_pairs_a_content_record() {
        let ring = test_ring();

        let entry = ring.create("promo", "https://promo.example").await.unwrap();

        let record = ring.records().get_record(entry.record_id).await.unwrap().unwrap();
        assert_eq!(record.title, "promo");
        assert_eq!(
            ring.target_for_record(entry.record_id).await.unwrap().as_deref(),
            Some("https://promo.example")
        );
    }

    #[tokio::test]
    async fn target_for_record_without_entry() {
        let (ring, entries) = ring_of(&["promo"]).await;
        let orphan = ring.records().create_record("draft").await.unwrap();

        assert_eq!(ring.target_for_record(orphan).await.unwrap(), None);
        assert!(matches!(
            ring.target_for_record(RecordId(999)).await,
            Err(RingError::NotFound(_))
        ));

        ring.delete(entries[0].id).await.unwrap();
        assert!(matches!(
            ring.target_for_record(entries[0].record_id).await,
            Err(RingError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn create_with_duplicate_shortcode_fails() {
        let (ring, _) = ring_of(&["promo"]).await;

        let err = ring.create("promo", "https://other.example").await.unwrap_err();

        assert_eq!(err, RingError::DuplicateShortcode("promo".to_string()));
        assert_eq!(ring.list().await.unwrap().len(), 1);
        assert_eq!(ring.records().len(), 1);
    }

    #[tokio::test]
    async fn shortcodes_differ_by_case() {
        let (ring, _) = ring_of(&["promo"]).await;

        assert!(ring.create("Promo", "https://other.example").await.is_ok());
    }

    #[tokio::test]
    async fn create_with_invalid_input_fails() {
        let ring = test_ring();

        for (code, url) in [
            ("", "https://a.example"),
            ("has space", "https://a.example"),
            ("ok", ""),
            ("ok", "not-a-url"),
            ("ok", "ftp://a.example"),
        ] {
            let err = ring.create(code, url).await.unwrap_err();
            assert!(matches!(err, RingError::ValidationFailed(_)), "{code} {url}");
        }

        assert!(ring.list().await.unwrap().is_empty());
        assert!(ring.records().is_empty());
    }

    #[tokio::test]
    async fn failed_append_removes_content_record() {
        let ring = RingService::new(FullStore::default(), InMemoryContentRecords::new());

        let err = ring.create("promo", "https://promo.example").await.unwrap_err();

        assert!(matches!(err, RingError::Storage(_)));
        assert!(ring.records().is_empty());
        assert!(ring.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_content_record_writes_nothing() {
        let ring = RingService::new(InMemoryRingStore::new(), BrokenRecords);

        let err = ring.create("promo", "https://promo.example").await.unwrap_err();

        assert!(matches!(err, RingError::Storage(_)));
        assert!(ring.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_shifts_higher_ranks_down() {
        let (ring, entries) = ring_of(&["a", "b", "c", "d"]).await;

        let removed = ring.delete(entries[1].id).await.unwrap();

        assert_eq!(removed.shortcode.as_str(), "b");
        let listed = ring.list().await.unwrap();
        assert_eq!(
            listed
                .iter()
                .map(|e| (e.shortcode.as_str(), e.order_id))
                .collect::<Vec<_>>(),
            vec![("a", 1), ("c", 2), ("d", 3)]
        );
        assert_eq!(ring.records().len(), 3);
        assert!(ring
            .records()
            .get_record(removed.record_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_unknown_entry_fails() {
        let (ring, _) = ring_of(&["a"]).await;

        let err = ring.delete(EntryId(42)).await.unwrap_err();

        assert!(matches!(err, RingError::NotFound(_)));
        assert_eq!(ring.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_surfaces_content_record_failure() {
        let store = InMemoryRingStore::with_entries([Entry {
            id: EntryId(1),
            record_id: RecordId(10),
            shortcode: ShortCode::new_unchecked("a"),
            target_url: "https://a.example".to_string(),
            order_id: 1,
        }]);
        let ring = RingService::new(store, BrokenRecords);

        let err = ring.delete(EntryId(1)).await.unwrap_err();

        assert!(matches!(err, RingError::Storage(_)));
        assert!(ring.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_by_id() {
        let (ring, entries) = ring_of(&["a", "b"]).await;

        assert_eq!(ring.get_by_id(entries[1].id).await.unwrap(), entries[1]);
        assert!(matches!(
            ring.get_by_id(EntryId(99)).await,
            Err(RingError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn swap_exchanges_ranks() {
        let (ring, entries) = ring_of(&["a", "b", "c"]).await;

        ring.swap(entries[0].id, entries[2].id).await.unwrap();

        assert_eq!(codes(&ring).await, vec!["c", "b", "a"]);
        assert_dense(&ring).await;
    }

    #[tokio::test]
    async fn swapping_twice_restores_ranks() {
        let (ring, entries) = ring_of(&["a", "b", "c", "d"]).await;
        let ranks = |entries: Vec<Entry>| {
            entries
                .into_iter()
                .map(|e| (e.id, e.order_id))
                .collect::<Vec<_>>()
        };
        let before = ranks(ring.list().await.unwrap());

        ring.swap(entries[0].id, entries[2].id).await.unwrap();
        assert_ne!(ranks(ring.list().await.unwrap()), before);
        ring.swap(entries[0].id, entries[2].id).await.unwrap();

        assert_eq!(ranks(ring.list().await.unwrap()), before);
    }

    #[tokio::test]
    async fn swap_with_itself_is_a_noop() {
        let (ring, entries) = ring_of(&["a", "b"]).await;

        ring.swap(entries[0].id, entries[0].id).await.unwrap();

        assert_eq!(codes(&ring).await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn swap_with_unknown_entry_fails() {
        let (ring, entries) = ring_of(&["a", "b"]).await;

        let err = ring.swap(entries[0].id, EntryId(99)).await.unwrap_err();

        assert!(matches!(err, RingError::NotFound(_)));
        assert_eq!(codes(&ring).await, vec!["a", "b"]);
        assert!(ring.swap(EntryId(98), EntryId(98)).await.is_err());
    }

    #[tokio::test]
    async fn move_up_swaps_with_predecessor() {
        let (ring, entries) = ring_of(&["a", "b", "c"]).await;

        ring.move_up(entries[2].id).await.unwrap();

        assert_eq!(codes(&ring).await, vec!["a", "c", "b"]);
        assert_dense(&ring).await;
    }

    #[tokio::test]
    async fn move_up_first_entry_fails() {
        let (ring, entries) = ring_of(&["a", "b"]).await;

        let err = ring.move_up(entries[0].id).await.unwrap_err();

        assert_eq!(err, RingError::AlreadyFirst(entries[0].id));
        assert_eq!(codes(&ring).await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn move_down_swaps_with_successor() {
        let (ring, entries) = ring_of(&["a", "b", "c"]).await;

        ring.move_down(entries[0].id).await.unwrap();

        assert_eq!(codes(&ring).await, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn move_down_last_entry_fails() {
        let (ring, entries) = ring_of(&["a", "b"]).await;

        let err = ring.move_down(entries[1].id).await.unwrap_err();

        assert_eq!(err, RingError::AlreadyLast(entries[1].id));
        assert_eq!(ring.list().await.unwrap(), entries);
    }

    #[tokio::test]
    async fn move_single_entry_fails_both_ways() {
        let (ring, entries) = ring_of(&["solo"]).await;

        assert!(matches!(
            ring.move_up(entries[0].id).await,
            Err(RingError::AlreadyFirst(_))
        ));
        assert!(matches!(
            ring.move_down(entries[0].id).await,
            Err(RingError::AlreadyLast(_))
        ));
    }

    #[tokio::test]
    async fn move_unknown_entry_fails() {
        let (ring, _) = ring_of(&["a", "b"]).await;

        assert!(matches!(
            ring.move_up(EntryId(99)).await,
            Err(RingError::NotFound(_))
        ));
        assert!(matches!(
            ring.move_down(EntryId(99)).await,
            Err(RingError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn moves_use_repaired_ranks() {
        // Ranks 5 and 9 repair to 1 and 2 before the move reads them.
        let store = InMemoryRingStore::with_entries([
            corrupt_entry(1, "a", 5),
            corrupt_entry(2, "b", 9),
        ]);
        let ring = RingService::new(store, InMemoryContentRecords::new());

        ring.move_up(EntryId(2)).await.unwrap();

        assert_eq!(codes(&ring).await, vec!["b", "a"]);
        assert_dense(&ring).await;
    }

    fn corrupt_entry(id: i64, code: &str, rank: i64) -> Entry {
        Entry {
            id: EntryId(id),
            record_id: RecordId(id),
            shortcode: ShortCode::new_unchecked(code),
            target_url: format!("https://{code}.example"),
            order_id: rank,
        }
    }

    #[tokio::test]
    async fn repair_zeroed_ranks_follows_id_order() {
        let store = InMemoryRingStore::with_entries([
            corrupt_entry(3, "c", 0),
            corrupt_entry(1, "a", 0),
            corrupt_entry(2, "b", 0),
        ]);
        let ring = RingService::new(store, InMemoryContentRecords::new());

        assert_eq!(ring.repair().await.unwrap(), 3);
        assert_eq!(codes(&ring).await, vec!["a", "b", "c"]);
        assert_eq!(ring.repair().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn repair_moves_zeroed_entry_behind_ranked_ones() {
        let store = InMemoryRingStore::with_entries([
            corrupt_entry(1, "a", 1),
            corrupt_entry(2, "b", 2),
            corrupt_entry(3, "c", 0),
        ]);
        let ring = RingService::new(store, InMemoryContentRecords::new());

        assert_eq!(ring.repair().await.unwrap(), 1);
        assert_eq!(codes(&ring).await, vec!["a", "b", "c"]);
        assert_eq!(ring.resolve_next("b").await.unwrap(), "https://c.example");
    }

    #[tokio::test]
    async fn repair_on_healthy_ring_changes_nothing() {
        let (ring, _) = ring_of(&["a", "b", "c"]).await;

        assert_eq!(ring.repair().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_repairs_duplicated_ranks() {
        let store = InMemoryRingStore::with_entries([
            corrupt_entry(1, "a", 1),
            corrupt_entry(2, "b", 1),
            corrupt_entry(3, "c", 2),
        ]);
        let ring = RingService::new(store, InMemoryContentRecords::new());

        let listed = ring.list().await.unwrap();

        assert_eq!(
            listed
                .iter()
                .map(|e| (e.shortcode.as_str(), e.order_id))
                .collect::<Vec<_>>(),
            vec![("a", 1), ("b", 2), ("c", 3)]
        );
    }

    #[tokio::test]
    async fn resolve_next_cycles_through_ring() {
        let (ring, _) = ring_of(&["a", "b", "c"]).await;

        assert_eq!(ring.resolve_next("a").await.unwrap(), "https://b.example");
        assert_eq!(ring.resolve_next("b").await.unwrap(), "https://c.example");
        assert_eq!(ring.resolve_next("c").await.unwrap(), "https://a.example");
    }

    #[tokio::test]
    async fn resolve_next_follows_reordering() {
        let (ring, entries) = ring_of(&["a", "b", "c"]).await;

        ring.move_down(entries[0].id).await.unwrap();

        assert_eq!(ring.resolve_next("b").await.unwrap(), "https://a.example");
        assert_eq!(ring.resolve_next("c").await.unwrap(), "https://b.example");
    }

    #[tokio::test]
    async fn single_entry_resolves_to_itself() {
        let (ring, _) = ring_of(&["solo"]).await;

        assert_eq!(
            ring.resolve_next("solo").await.unwrap(),
            "https://solo.example"
        );
    }

    #[tokio::test]
    async fn resolve_next_on_empty_ring_fails() {
        let ring = test_ring();

        assert_eq!(ring.resolve_next("a").await, Err(RingError::EmptyRing));
    }

    #[tokio::test]
    async fn resolve_next_unknown_shortcode_fails() {
        let (ring, _) = ring_of(&["a"]).await;

        for code in ["missing", "A", "bad code", ""] {
            assert!(matches!(
                ring.resolve_next(code).await,
                Err(RingError::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn purge_removes_entries_and_records() {
        let (ring, _) = ring_of(&["a", "b", "c"]).await;

        assert_eq!(ring.purge().await.unwrap(), 3);
        assert!(ring.list().await.unwrap().is_empty());
        assert!(ring.records().is_empty());
    }

    #[tokio::test]
    async fn concurrent_mutations_keep_ranks_dense() {
        let ring = test_ring();
        let mut handles = vec![];

        for i in 0..16 {
            let ring = ring.clone();
            handles.push(tokio::spawn(async move {
                let entry = ring
                    .create(&format!("c{i}"), "https://c.example")
                    .await
                    .unwrap();
                let _ = ring.move_up(entry.id).await;
                if i % 3 == 0 {
                    ring.delete(entry.id).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(ring.list().await.unwrap().len(), 10);
        assert_eq!(ring.store().repair_ranks().await.unwrap(), 0);
        assert_dense(&ring).await;
    }
}
