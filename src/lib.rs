//! # Chapel
//!
//! The content core of a church portal site: a flat record store with a
//! chainable query adapter, bulk text importers for devotionals and book
//! recommendations, a daily rotation selector, and a rich-text sanitizer.
//! The UI (admin dashboard and public pages) sits above this crate and is
//! a pure consumer; nothing here knows about rendering.
//!
//! # Architecture: Parse, Confirm, Write
//!
//! Bulk content flows through three independent steps:
//!
//! ```text
//! 1. Parse     pasted text  →  typed records      (pure, no I/O)
//! 2. Confirm   record count →  admin approves     (caller's UI)
//! 3. Write     records      →  store tables       (synchronous, durable)
//! ```
//!
//! This separation exists for one reason above all: a bad paste must never
//! partially corrupt a table. Parsing is completed and validated before the
//! first write is attempted, so "no valid entries found" aborts with the
//! store untouched.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`record`] | Schemaless record type: generated id/timestamps, field ordering, soft-reference resolution |
//! | [`store`] | Table storage behind a backend seam, plus the chainable select/insert/update/delete adapter |
//! | [`devotionals`] | Devotional text parser (`MONTH DAY: TITLE` entries) and inverse exporter |
//! | [`resources`] | Book-recommendation text parser (`Category:`/`Title:`/`Links to Books:` blocks) and exporter |
//! | [`rotation`] | Days-since-epoch rotation selector for scripture/devotional of the day |
//! | [`sanitize`] | Inline-style denylist cleaner and boilerplate phrase stripper |
//! | [`import`] | Import orchestration: parse-first writes, replace-mode clears, merge policy |
//! | [`config`] | `config.toml` loading: data directory and import defaults |
//!
//! # Design Decisions
//!
//! ## Schemaless records over typed tables
//!
//! Every table stores the same [`record::Record`]: generated columns plus a
//! free field map. The portal has a dozen small tables (announcements,
//! sermons, scriptures, resources...) that differ only in fields, and the
//! admin dashboard edits them generically. One record type keeps the query
//! adapter, the JSON files, and the display code uniform; typed structs
//! like [`devotionals::Devotional`] exist only at the parser boundary.
//!
//! ## Backend seam instead of a database
//!
//! The store is a [`store::TableBackend`] trait with two implementations:
//! JSON files for durability, in-memory for the unconfigured fallback and
//! for tests. A remote table service would be a third implementation; the
//! query adapter and everything above it would not change.
//!
//! ## Soft references, resolved at display time
//!
//! A resource's `category_id` is a plain string field. Nothing enforces
//! that it points anywhere; a dangling reference resolves to a fallback
//! label ("Uncategorized") at display time. That tolerance is deliberate
//! and tested — bulk deletes should never cascade or fail because some
//! other table mentions a row.
//!
//! ## No clock inside the core
//!
//! The rotation selector and the devotional date parser both take their
//! time inputs as parameters (`DateTime<Utc>`, target year). The system
//! clock is consulted only at named boundaries ([`import::current_year`],
//! [`rotation::pick_daily_today`]), so every behavior is testable with
//! fixed inputs and archival imports can target past years.

pub mod config;
pub mod devotionals;
pub mod import;
pub mod record;
pub mod resources;
pub mod rotation;
pub mod sanitize;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;
