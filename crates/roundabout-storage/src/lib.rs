//! Storage backends for the redirect ring.
//!
//! [`InMemoryRingStore`] keeps the whole table behind one lock and is used by
//! tests and single-process deployments. [`MySqlRingStore`] persists entries in
//! MySQL and runs every rank mutation in a single transaction.

pub mod memory;
pub mod mysql;

pub use memory::{InMemoryContentRecords, InMemoryRingStore};
pub use mysql::migration::{MigrationStep, SchemaVersion};
pub use mysql::records::MySqlContentRecords;
pub use mysql::{MySqlOptions, MySqlRingStore};
pub use roundabout_core::store::RingStore;
pub use roundabout_core::{ContentRecords, StorageError};
