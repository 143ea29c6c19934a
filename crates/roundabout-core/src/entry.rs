use crate::shortcode::ShortCode;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Stable identifier of a ring entry. Assigned by the store, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

/// Identifier of the content record paired with an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A redirect entry as stored in the ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// The content record created alongside this entry.
    pub record_id: RecordId,
    pub shortcode: ShortCode,
    pub target_url: String,
    /// 1-based rank in the ring. Outside of a store operation the ranks of
    /// all entries are exactly `1..=N`.
    pub order_id: i64,
}

/// Input for appending a new entry to the ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub record_id: RecordId,
    pub shortcode: ShortCode,
    pub target_url: String,
}
