//! In-process backend.
//!
//! Table contents live in a process-wide map and vanish on drop. This is
//! the fallback when no data directory is configured — the rest of the
//! crate works identically, it just doesn't persist — and the default
//! backend for unit tests, which get isolation without touching the
//! filesystem.

use super::backend::{StoreError, TableBackend};
use crate::record::Record;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, Vec<Record>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableBackend for MemoryBackend {
    fn load_table(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        // A poisoned lock means a test thread panicked mid-write; the data
        // itself is still a coherent Vec, so recover it.
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables.get(table).cloned().unwrap_or_default())
    }

    fn save_table(&self, table: &str, records: &[Record]) -> Result<(), StoreError> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.insert(table.to_string(), records.to_vec());
        Ok(())
    }
}
