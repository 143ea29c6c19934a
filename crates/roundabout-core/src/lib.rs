//! Core types and traits for the Roundabout redirect ring.
//!
//! This crate provides the entry model, input validation, the pure rank
//! algorithms and the storage traits shared by the storage backends, the
//! ring service and the HTTP gateway.

pub mod content;
pub mod entry;
pub mod error;
pub mod rank;
pub mod shortcode;
pub mod store;
pub mod target;

pub use content::{ContentRecord, ContentRecords};
pub use entry::{Entry, EntryId, NewEntry, RecordId};
pub use error::{RingError, StorageError};
pub use shortcode::ShortCode;
pub use store::RingStore;
pub use target::TargetUrl;
