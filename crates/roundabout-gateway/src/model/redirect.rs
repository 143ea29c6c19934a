use roundabout_core::{Entry, EntryId, RecordId, ShortCode};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CreateRedirectRequest {
    pub shortcode: String,
    pub target_url: String,
}

#[derive(Deserialize)]
pub struct SwapRequest {
    pub a: EntryId,
    pub b: EntryId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub id: EntryId,
    pub record_id: RecordId,
    pub shortcode: ShortCode,
    pub target_url: String,
    pub order_id: i64,
    /// Public URL that redirects to the entry after this one.
    pub ghost_url: String,
}

impl RedirectResponse {
    pub fn new(entry: Entry, ghost_url: String) -> Self {
        Self {
            id: entry.id,
            record_id: entry.record_id,
            shortcode: entry.shortcode,
            target_url: entry.target_url,
            order_id: entry.order_id,
            ghost_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RepairResponse {
    pub repaired: usize,
}
