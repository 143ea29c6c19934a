//! Pure rank algorithms shared by every ring store.
//!
//! Ranks (`order_id`) are dense when the ranks of `N` entries are exactly
//! `1..=N`. Stores apply these functions inside their own atomic unit.

use crate::entry::EntryId;

/// A single rank reassignment produced by [`repair_plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankChange {
    pub id: EntryId,
    pub from: i64,
    pub to: i64,
}

/// Returns `true` when the given ranks are exactly `1..=N`.
pub fn is_dense(ranks: impl IntoIterator<Item = i64>) -> bool {
    let mut ranks: Vec<i64> = ranks.into_iter().collect();
    ranks.sort_unstable();
    ranks
        .iter()
        .enumerate()
        .all(|(index, rank)| *rank == index as i64 + 1)
}

/// Computes the rank changes that make `entries` dense again.
///
/// Entries whose rank is already within `1..=N` keep their relative order and
/// come first, ties broken by `id`. Entries with a rank outside that range
/// (zeroed, negative or past the end) follow in ascending `id` order, so a
/// single broken row never jumps ahead of healthy ones. Only entries whose
/// rank actually changes are returned; a dense input yields an empty plan.
pub fn repair_plan(entries: &[(EntryId, i64)]) -> Vec<RankChange> {
    let len = entries.len() as i64;
    let mut ordered = entries.to_vec();
    ordered.sort_by_key(|(id, rank)| {
        if (1..=len).contains(rank) {
            (false, *rank, *id)
        } else {
            (true, 0, *id)
        }
    });

    ordered
        .into_iter()
        .enumerate()
        .filter_map(|(index, (id, from))| {
            let to = index as i64 + 1;
            (from != to).then_some(RankChange { id, from, to })
        })
        .collect()
}

/// Position of the entry following `position` in a ring of `len` entries.
///
/// # Panics
///
/// Panics if `len` is zero.
pub fn successor(position: usize, len: usize) -> usize {
    (position + 1) % len
}
