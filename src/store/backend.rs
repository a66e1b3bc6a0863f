//! Storage backend trait and shared error type.
//!
//! The [`TableBackend`] trait defines the two operations every backend must
//! support: load a table and save a table. The query adapter layers all
//! select/insert/update/delete semantics on top, so backends stay dumb.
//!
//! Implementations: [`LocalBackend`](super::local::LocalBackend) (JSON file
//! per table) and [`MemoryBackend`](super::memory::MemoryBackend)
//! (in-process, used when no data directory is configured and by tests).
//! A remote table service would slot in behind the same trait; it is an
//! opaque collaborator as far as this crate is concerned.

use crate::record::Record;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt table '{table}': {source}")]
    Corrupt {
        table: String,
        source: serde_json::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Trait for table storage backends.
///
/// Contract: `load_table` on a table that has never been written returns an
/// empty list, not an error. `save_table` must persist synchronously — when
/// it returns `Ok`, the data is on the durable medium. There is no
/// multi-table transaction; a sequence like "clear then insert" is
/// best-effort.
pub trait TableBackend {
    /// Load every record of a table, in insertion order.
    fn load_table(&self, table: &str) -> Result<Vec<Record>, StoreError>;

    /// Replace a table's contents, persisting before returning.
    fn save_table(&self, table: &str, records: &[Record]) -> Result<(), StoreError>;
}
