use std::sync::Arc;

use roundabout_core::{Entry, ShortCode};
use roundabout_ring::Ring;

#[derive(Clone)]
pub struct AppState {
    ring: Arc<dyn Ring>,
    base_url: String,
}

impl AppState {
    pub fn new(ring: Arc<dyn Ring>, public_base_url: impl Into<String>) -> Self {
        Self {
            ring,
            base_url: public_base_url.into(),
        }
    }

    pub fn ring(&self) -> &dyn Ring {
        self.ring.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public redirect URL of an entry.
    pub fn ghost_url(&self, shortcode: &ShortCode) -> String {
        shortcode.ghost_url(&self.base_url)
    }

    pub fn ghost_url_of(&self, entry: &Entry) -> String {
        self.ghost_url(&entry.shortcode)
    }
}
