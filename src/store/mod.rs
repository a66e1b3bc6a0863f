//! Flat record store — tables of schemaless records behind a backend seam.
//!
//! | Piece | Role |
//! |---|---|
//! | **Backend** | [`TableBackend`] trait: load/save a whole table |
//! | **Local** | [`LocalBackend`]: one JSON file per table, durable writes |
//! | **Memory** | [`MemoryBackend`]: in-process tables, the unconfigured fallback |
//! | **Query** | [`Store`] + chainable select/insert/update/delete builders |
//!
//! Every feature — admin CRUD and public display alike — reads and writes
//! through [`Store::from`], never through a backend directly, so swapping
//! the backing medium (or pointing at a remote table service) touches
//! nothing above this module.

pub mod backend;
pub mod local;
pub mod memory;
pub mod query;

pub use backend::{StoreError, TableBackend};
pub use local::LocalBackend;
pub use memory::MemoryBackend;
pub use query::{Direction, Store, TableRef};
