//! Chainable query adapter over a [`TableBackend`].
//!
//! Emulates the subset of a table-store query builder the portal actually
//! uses, uniformly for admin CRUD and public display:
//!
//! ```no_run
//! # use chapel::store::{Store, MemoryBackend, Direction};
//! # use chapel::record::Fields;
//! # fn demo() -> Result<(), chapel::store::StoreError> {
//! let store = Store::new(MemoryBackend::new());
//!
//! let rows = store
//!     .from("devotionals")
//!     .select()
//!     .order_by("devotional_date", Direction::Ascending)
//!     .order_by("created_at", Direction::Descending)
//!     .limit(10)
//!     .run()?;
//!
//! store.from("devotionals").insert(vec![Fields::new()])?;
//! store.from("devotionals").delete().eq("id", "some-id").run()?;
//! store.from("devotionals").delete_all()?;
//! # Ok(())
//! # }
//! ```
//!
//! Semantics:
//!
//! - `order_by` composes as a multi-key stable sort: the first call is the
//!   primary key, later calls break ties. Date-like fields compare by
//!   parsed timestamp (see [`crate::record::compare_field`]).
//! - `insert` assigns `id` and `created_at` to rows that don't carry them
//!   and appends in argument order.
//! - `update` merges the patch into every matching record and stamps
//!   `updated_at`; the patch cannot change a record's `id`.
//! - `delete_all` is the first-class "clear this table" operation.
//! - Every mutation persists synchronously through the backend before
//!   returning. There is no multi-statement atomicity: a "delete all, then
//!   insert" sequence interrupted in the middle loses data. Known
//!   limitation, inherited from the system this models.

use super::backend::{StoreError, TableBackend};
use crate::record::{Fields, Record, compare_field};
use chrono::Utc;
use serde_json::Value;

/// Sort direction for [`SelectBuilder::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// The query adapter. Cheap to construct; owns its backend.
pub struct Store<B: TableBackend> {
    backend: B,
}

impl<B: TableBackend> Store<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Start a query against a table.
    pub fn from(&self, table: &str) -> TableRef<'_, B> {
        TableRef {
            backend: &self.backend,
            table: table.to_string(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// A table handle; entry point for the chainable operations.
pub struct TableRef<'a, B: TableBackend> {
    backend: &'a B,
    table: String,
}

impl<'a, B: TableBackend> TableRef<'a, B> {
    /// Read records. Chain `columns`, `eq`, `order_by`, and `limit`, then
    /// call `run`.
    pub fn select(self) -> SelectBuilder<'a, B> {
        SelectBuilder {
            table: self,
            columns: None,
            filters: Vec::new(),
            orders: Vec::new(),
            limit: None,
        }
    }

    /// Insert rows, assigning `id` and `created_at` where absent. Returns
    /// the inserted records in argument order.
    pub fn insert(self, rows: Vec<Fields>) -> Result<Vec<Record>, StoreError> {
        let mut records = self.backend.load_table(&self.table)?;
        let inserted: Vec<Record> = rows.into_iter().map(Record::from_fields).collect();
        records.extend(inserted.iter().cloned());
        self.backend.save_table(&self.table, &records)?;
        Ok(inserted)
    }

    /// Merge a patch into matching records. Chain `eq`, then call `run`.
    pub fn update(self, patch: Fields) -> UpdateBuilder<'a, B> {
        UpdateBuilder {
            table: self,
            patch,
            filters: Vec::new(),
        }
    }

    /// Remove matching records. Chain `eq`, then call `run`.
    pub fn delete(self) -> DeleteBuilder<'a, B> {
        DeleteBuilder {
            table: self,
            filters: Vec::new(),
        }
    }

    /// Remove every record in the table. Returns the number removed.
    pub fn delete_all(self) -> Result<usize, StoreError> {
        let records = self.backend.load_table(&self.table)?;
        let removed = records.len();
        self.backend.save_table(&self.table, &[])?;
        Ok(removed)
    }
}

fn matches_filters(record: &Record, filters: &[(String, Value)]) -> bool {
    filters
        .iter()
        .all(|(column, value)| record.column_value(column).as_ref() == Some(value))
}

pub struct SelectBuilder<'a, B: TableBackend> {
    table: TableRef<'a, B>,
    columns: Option<Vec<String>>,
    filters: Vec<(String, Value)>,
    orders: Vec<(String, Direction)>,
    limit: Option<usize>,
}

impl<B: TableBackend> SelectBuilder<'_, B> {
    /// Project to the named fields. The generated columns (`id`,
    /// `created_at`, `updated_at`) are always kept.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Keep only records where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    /// Add a sort key. First call is the primary key; later calls break ties.
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.orders.push((column.to_string(), direction));
        self
    }

    /// Truncate the result to at most `n` records (applied after sorting).
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn run(self) -> Result<Vec<Record>, StoreError> {
        let mut records = self.table.backend.load_table(&self.table.table)?;
        records.retain(|r| matches_filters(r, &self.filters));

        if !self.orders.is_empty() {
            records.sort_by(|a, b| {
                for (column, direction) in &self.orders {
                    let ord = compare_field(a, b, column);
                    let ord = match direction {
                        Direction::Ascending => ord,
                        Direction::Descending => ord.reverse(),
                    };
                    if ord != std::cmp::Ordering::Equal {
                        return ord;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }

        if let Some(n) = self.limit {
            records.truncate(n);
        }

        if let Some(columns) = &self.columns {
            for record in &mut records {
                record.fields.retain(|name, _| columns.iter().any(|c| c == name));
            }
        }

        Ok(records)
    }
}

pub struct UpdateBuilder<'a, B: TableBackend> {
    table: TableRef<'a, B>,
    patch: Fields,
    filters: Vec<(String, Value)>,
}

impl<B: TableBackend> UpdateBuilder<'_, B> {
    /// Restrict the update to records where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    /// Apply the patch. Returns the updated records.
    pub fn run(self) -> Result<Vec<Record>, StoreError> {
        let mut records = self.table.backend.load_table(&self.table.table)?;
        let now = Utc::now();
        let mut updated = Vec::new();

        for record in &mut records {
            if !matches_filters(record, &self.filters) {
                continue;
            }
            for (key, value) in &self.patch {
                if key == "id" {
                    continue;
                }
                record.fields.insert(key.clone(), value.clone());
            }
            record.updated_at = Some(now);
            updated.push(record.clone());
        }

        if !updated.is_empty() {
            self.table.backend.save_table(&self.table.table, &records)?;
        }
        Ok(updated)
    }
}

pub struct DeleteBuilder<'a, B: TableBackend> {
    table: TableRef<'a, B>,
    filters: Vec<(String, Value)>,
}

impl<B: TableBackend> DeleteBuilder<'_, B> {
    /// Restrict the delete to records where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    /// Remove the matching records. Returns the number removed.
    pub fn run(self) -> Result<usize, StoreError> {
        let mut records = self.table.backend.load_table(&self.table.table)?;
        let before = records.len();
        records.retain(|r| !matches_filters(r, &self.filters));
        let removed = before - records.len();
        if removed > 0 {
            self.table.backend.save_table(&self.table.table, &records)?;
        }
        Ok(removed)
    }
}
