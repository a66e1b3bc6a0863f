//! Bulk import orchestration: parse → confirm → optional clear → write.
//!
//! The pipeline is parse-first: the whole blob is parsed and
//! validated before any store mutation, so a bad paste can never partially
//! corrupt a table. Zero recognizable entries is [`ImportError::NoEntries`],
//! surfaced to the admin as "no valid entries found".
//!
//! ## Replace mode and degraded behavior
//!
//! A devotional import in replace mode clears the table first. If the clear
//! fails, the failure is logged at warn and the import proceeds anyway —
//! the fresh rows then coexist with whatever couldn't be deleted. Half an
//! import beats none when the admin is standing at the dashboard. The
//! clear-then-insert sequence is also not atomic; an interruption between
//! the two steps loses data. Both limitations are inherited from the
//! system this models.
//!
//! ## Resource merge policy
//!
//! Re-importing the same resource text is idempotent. Each accepted block
//! resolves its category by case-insensitive name (creating missing
//! categories as book categories) and its resource by case-insensitive
//! `(title, author)`. An existing resource gets the link-set union —
//! existing order preserved, genuinely new links appended; a new resource
//! is created with its links newline-joined.

use chrono::{Datelike, Utc};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::devotionals::{self, Devotional};
use crate::record::{self, Fields, Record};
use crate::resources::{self, ParsedResource};
use crate::store::{Store, StoreError, TableBackend};

pub const DEVOTIONALS_TABLE: &str = "devotionals";
pub const RESOURCES_TABLE: &str = "resources";
pub const RESOURCE_CATEGORIES_TABLE: &str = "resource_categories";

/// Fixed download filename for the devotional export.
pub const DEVOTIONALS_EXPORT_FILENAME: &str = "devotionals.txt";
/// Fixed download filename for the resource export.
pub const RESOURCES_EXPORT_FILENAME: &str = "book-recommendations.txt";

#[derive(Error, Debug)]
pub enum ImportError {
    /// The pasted text contained zero recognizable entries. Nothing was
    /// written.
    #[error("no valid entries found")]
    NoEntries,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The year applied to devotional dates when the caller has no configured
/// override — the outer-boundary default.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Parse and import a devotional blob for `year`.
///
/// With `replace` set, the table is cleared first (degraded-mode on
/// failure, see module docs). Returns the number of records written.
pub fn import_devotionals<B: TableBackend>(
    store: &Store<B>,
    text: &str,
    year: i32,
    replace: bool,
) -> Result<usize, ImportError> {
    let parsed = devotionals::parse_devotionals(text, year);
    if parsed.is_empty() {
        return Err(ImportError::NoEntries);
    }

    if replace {
        if let Err(err) = store.from(DEVOTIONALS_TABLE).delete_all() {
            log::warn!("clearing {DEVOTIONALS_TABLE} before import failed, continuing: {err}");
        }
    }

    let rows = parsed
        .iter()
        .map(record::fields_of)
        .collect::<Result<Vec<Fields>, _>>()
        .map_err(StoreError::from)?;
    let inserted = store.from(DEVOTIONALS_TABLE).insert(rows)?;
    Ok(inserted.len())
}

/// Devotional export payload for the admin's backup download
/// ([`DEVOTIONALS_EXPORT_FILENAME`]).
pub fn export_devotionals<B: TableBackend>(store: &Store<B>) -> Result<String, StoreError> {
    use crate::store::Direction;
    let records = store
        .from(DEVOTIONALS_TABLE)
        .select()
        .order_by("devotional_date", Direction::Ascending)
        .run()?;
    let parsed: Vec<Devotional> = records.iter().map(Devotional::from_record).collect();
    Ok(devotionals::export_devotionals(&parsed))
}

/// What a resource import did, for the admin's confirmation message.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResourceImportOutcome {
    /// New resource records created.
    pub created: usize,
    /// Existing resources whose link set actually grew.
    pub updated: usize,
    /// Categories created because no case-insensitive name match existed.
    pub categories_created: usize,
}

/// Parse and merge-import a resource blob.
pub fn import_resources<B: TableBackend>(
    store: &Store<B>,
    text: &str,
) -> Result<ResourceImportOutcome, ImportError> {
    let parsed = resources::parse_resources(text);
    if parsed.is_empty() {
        return Err(ImportError::NoEntries);
    }

    let mut categories = store.from(RESOURCE_CATEGORIES_TABLE).select().run()?;
    let mut existing = store.from(RESOURCES_TABLE).select().run()?;
    let mut outcome = ResourceImportOutcome::default();

    for entry in &parsed {
        let category_id = resolve_category(store, &mut categories, entry, &mut outcome)?;
        merge_resource(store, &mut existing, entry, &category_id, &mut outcome)?;
    }
    Ok(outcome)
}

/// Resource export payload for the admin's backup download
/// ([`RESOURCES_EXPORT_FILENAME`]).
pub fn export_resources<B: TableBackend>(store: &Store<B>) -> Result<String, StoreError> {
    let records = store.from(RESOURCES_TABLE).select().run()?;
    let categories = store.from(RESOURCE_CATEGORIES_TABLE).select().run()?;
    Ok(resources::export_resources(&records, &categories))
}

/// Find a category by case-insensitive name, creating it as a book
/// category when absent. Returns its id.
fn resolve_category<B: TableBackend>(
    store: &Store<B>,
    categories: &mut Vec<Record>,
    entry: &ParsedResource,
    outcome: &mut ResourceImportOutcome,
) -> Result<String, StoreError> {
    if let Some(existing) = categories.iter().find(|c| {
        c.str_field("name")
            .is_some_and(|n| n.eq_ignore_ascii_case(&entry.category))
    }) {
        return Ok(existing.id.clone());
    }

    // Pre-generate the id so we don't depend on reading it back.
    let id = Uuid::new_v4().to_string();
    let mut fields = Fields::new();
    fields.insert("id".into(), json!(id));
    fields.insert("name".into(), json!(entry.category));
    fields.insert("type".into(), json!("books"));
    let inserted = store.from(RESOURCE_CATEGORIES_TABLE).insert(vec![fields])?;
    categories.extend(inserted);
    outcome.categories_created += 1;
    Ok(id)
}

/// Merge one parsed block into the resources table: union links into a
/// case-insensitive `(title, author)` match, or create a fresh record.
fn merge_resource<B: TableBackend>(
    store: &Store<B>,
    existing: &mut Vec<Record>,
    entry: &ParsedResource,
    category_id: &str,
    outcome: &mut ResourceImportOutcome,
) -> Result<(), StoreError> {
    let matched = existing.iter_mut().find(|r| {
        r.str_field("title")
            .is_some_and(|t| t.eq_ignore_ascii_case(&entry.title))
            && r.str_field("author")
                .unwrap_or_default()
                .eq_ignore_ascii_case(&entry.author)
    });

    match matched {
        Some(record) => {
            let mut links: Vec<String> = record
                .str_field("links")
                .unwrap_or_default()
                .split('\n')
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect();
            let before = links.len();
            for link in &entry.links {
                if !links.iter().any(|l| l == link) {
                    links.push(link.clone());
                }
            }
            if links.len() > before {
                let joined = links.join("\n");
                let mut patch = Fields::new();
                patch.insert("links".into(), json!(joined));
                store
                    .from(RESOURCES_TABLE)
                    .update(patch)
                    .eq("id", record.id.as_str())
                    .run()?;
                record.set_field("links", json!(joined));
                outcome.updated += 1;
            }
        }
        None => {
            let mut links: Vec<&str> = Vec::new();
            for link in &entry.links {
                if !links.contains(&link.as_str()) {
                    links.push(link);
                }
            }
            let mut fields = Fields::new();
            fields.insert("title".into(), json!(entry.title));
            fields.insert("author".into(), json!(entry.author));
            fields.insert("category_id".into(), json!(category_id));
            fields.insert("links".into(), json!(links.join("\n")));
            let inserted = store.from(RESOURCES_TABLE).insert(vec![fields])?;
            existing.extend(inserted);
            outcome.created += 1;
        }
    }
    Ok(())
}
