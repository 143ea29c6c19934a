//! The round-robin redirect ring.
//!
//! This crate provides the [`Ring`] trait and [`RingService`], which combine a
//! [`RingStore`] with [`ContentRecords`] to keep entries densely ranked and to
//! resolve the cyclic successor of a shortcode. Core types are re-exported
//! from `roundabout_core`.

pub mod ring;
pub mod service;

pub use ring::Ring;
pub use roundabout_core::{
    ContentRecords, Entry, EntryId, RecordId, RingError, RingStore, ShortCode,
};
pub use service::RingService;
