//! JSON-file-per-table backend.
//!
//! Each table lives at `<data_dir>/<table>.json` as a pretty-printed array
//! of records. Every mutation rewrites the whole file before the call
//! returns — at this crate's data scale (hundreds of records per table) a
//! full rewrite is cheaper than it sounds and keeps the on-disk format
//! trivially inspectable.
//!
//! A missing file is an empty table. A file that exists but doesn't parse
//! is surfaced as [`StoreError::Corrupt`] — callers must see the failure,
//! not a silently emptied table.

use super::backend::{StoreError, TableBackend};
use crate::record::Record;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub struct LocalBackend {
    data_dir: PathBuf,
}

impl LocalBackend {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of a table's JSON file within the data directory.
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{table}.json"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl TableBackend for LocalBackend {
    fn load_table(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        let path = self.table_path(table);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            table: table.to_string(),
            source,
        })
    }

    fn save_table(&self, table: &str, records: &[Record]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)?;
        let json = serde_json::to_string_pretty(records)?;
        fs::write(self.table_path(table), json)?;
        Ok(())
    }
}
