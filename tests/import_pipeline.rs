//! End-to-end exercise of the import pipeline over the durable backend:
//! parse pasted text, write through the query adapter into JSON files,
//! read back sorted, rotate, sanitize, and export.

use chapel::config::{ConfiguredStore, PortalConfig};
use chapel::devotionals::Devotional;
use chapel::import::{
    self, DEVOTIONALS_TABLE, RESOURCES_TABLE, RESOURCE_CATEGORIES_TABLE,
};
use chapel::record::resolve_label;
use chapel::rotation;
use chapel::sanitize;
use chapel::store::{Direction, LocalBackend, Store};
use chrono::{TimeZone, Utc};
use std::fs;
use tempfile::TempDir;

const DEVOTIONAL_TEXT: &str = "\
FEBRUARY 10: STANDING FIRM

Anchored in the Storm

Hebrews 6:19

We hold fast because we are held.

Response: Name the anchor you reach for first.

Prayer: Father, steady me when the ground shifts.

JANUARY 4: PURSUING HEALTHY RELATIONSHIPS

Truth and Grace Together

John 1:14; Ephesians 4:15

Jesus embodied both grace and truth perfectly.

Response: Identify one conversation where you need grace.

Prayer: Jesus, give me Your heart to speak truth.
";

const RESOURCE_TEXT: &str = "\
Category: Marriage
Title: The Meaning of Marriage
Author: Timothy Keller
Links to Books:

https://example.com/meaning-of-marriage



Category: Prayer
Title: A Praying Life
Links to Books:

https://example.com/praying-life
";

#[test]
fn devotionals_import_persist_and_sort_by_date() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(LocalBackend::new(tmp.path()));

    let count = import::import_devotionals(&store, DEVOTIONAL_TEXT, 2026, false).unwrap();
    assert_eq!(count, 2);
    assert!(store.backend().table_path(DEVOTIONALS_TABLE).exists());

    // A second store over the same directory sees the same data: writes
    // are durable, not cached.
    let reopened = Store::new(LocalBackend::new(tmp.path()));
    let rows = reopened
        .from(DEVOTIONALS_TABLE)
        .select()
        .order_by("devotional_date", Direction::Ascending)
        .run()
        .unwrap();

    let dates: Vec<&str> = rows
        .iter()
        .map(|r| r.str_field("devotional_date").unwrap())
        .collect();
    assert_eq!(dates, vec!["2026-01-04", "2026-02-10"]);
    assert!(rows.iter().all(|r| !r.id.is_empty()));
}

#[test]
fn replace_import_clears_then_writes() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(LocalBackend::new(tmp.path()));

    import::import_devotionals(&store, DEVOTIONAL_TEXT, 2025, false).unwrap();
    import::import_devotionals(&store, "MARCH 1: FRESH START", 2026, true).unwrap();

    let rows = store.from(DEVOTIONALS_TABLE).select().run().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].str_field("title"), Some("FRESH START"));
}

#[test]
fn devotional_export_round_trips() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(LocalBackend::new(tmp.path()));
    import::import_devotionals(&store, DEVOTIONAL_TEXT, 2026, false).unwrap();

    let exported = import::export_devotionals(&store).unwrap();
    let reparsed = chapel::devotionals::parse_devotionals(&exported, 2026);

    let mut original = chapel::devotionals::parse_devotionals(DEVOTIONAL_TEXT, 2026);
    original.sort_by(|a, b| a.devotional_date.cmp(&b.devotional_date));
    assert_eq!(reparsed, original);
}

#[test]
fn resource_reimport_is_idempotent_on_disk() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(LocalBackend::new(tmp.path()));

    let first = import::import_resources(&store, RESOURCE_TEXT).unwrap();
    assert_eq!(first.created, 2);
    assert_eq!(first.categories_created, 2);

    let file_after_first = fs::read_to_string(tmp.path().join("resources.json")).unwrap();
    let second = import::import_resources(&store, RESOURCE_TEXT).unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 0);
    assert_eq!(second.categories_created, 0);

    let file_after_second = fs::read_to_string(tmp.path().join("resources.json")).unwrap();
    assert_eq!(file_after_first, file_after_second);
}

#[test]
fn resource_categories_resolve_with_fallback() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(LocalBackend::new(tmp.path()));
    import::import_resources(&store, RESOURCE_TEXT).unwrap();

    let resources = store.from(RESOURCES_TABLE).select().run().unwrap();
    let categories = store.from(RESOURCE_CATEGORIES_TABLE).select().run().unwrap();

    let labels: Vec<&str> = resources
        .iter()
        .map(|r| resolve_label(&categories, r.str_field("category_id"), "name", "Uncategorized"))
        .collect();
    assert_eq!(labels, vec!["Marriage", "Prayer"]);

    // Deleting the categories dangles the references; display falls back.
    store.from(RESOURCE_CATEGORIES_TABLE).delete_all().unwrap();
    let gone = store.from(RESOURCE_CATEGORIES_TABLE).select().run().unwrap();
    let labels: Vec<&str> = resources
        .iter()
        .map(|r| resolve_label(&gone, r.str_field("category_id"), "name", "Uncategorized"))
        .collect();
    assert_eq!(labels, vec!["Uncategorized", "Uncategorized"]);
}

#[test]
fn daily_rotation_over_stored_devotionals() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(LocalBackend::new(tmp.path()));
    import::import_devotionals(&store, DEVOTIONAL_TEXT, 2026, false).unwrap();

    let rows = store
        .from(DEVOTIONALS_TABLE)
        .select()
        .order_by("devotional_date", Direction::Ascending)
        .run()
        .unwrap();
    let devotionals: Vec<Devotional> = rows.iter().map(Devotional::from_record).collect();

    let today = Utc.timestamp_millis_opt(1_760_000_000_000).unwrap();
    let tomorrow = today + chrono::Duration::days(1);
    let a = rotation::pick_daily(&devotionals, today).unwrap();
    let b = rotation::pick_daily(&devotionals, tomorrow).unwrap();
    assert_ne!(a.devotional_date, b.devotional_date);

    let day_after = tomorrow + chrono::Duration::days(1);
    let c = rotation::pick_daily(&devotionals, day_after).unwrap();
    assert_eq!(a.devotional_date, c.devotional_date);
}

#[test]
fn sanitizer_cleans_stored_announcement_html() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(LocalBackend::new(tmp.path()));

    let mut fields = chapel::record::Fields::new();
    fields.insert(
        "body".into(),
        serde_json::json!(
            r#"<p style="font-family: Calibri; margin: 8px"><span style="color: navy">Potluck Sunday</span></p>"#
        ),
    );
    store.from("announcements").insert(vec![fields]).unwrap();

    let rows = store.from("announcements").select().run().unwrap();
    let cleaned = sanitize::clean_inline_styles(rows[0].str_field("body").unwrap());
    assert_eq!(cleaned, r#"<p style="margin: 8px">Potluck Sunday</p>"#);
    assert_eq!(sanitize::clean_inline_styles(&cleaned), cleaned);
}

#[test]
fn config_selects_local_backend_and_target_year() {
    let tmp = TempDir::new().unwrap();
    let data_dir = tmp.path().join("data");
    fs::write(
        tmp.path().join("config.toml"),
        format!(
            "data_dir = \"{}\"\n\n[import]\ntarget_year = 2025\n",
            data_dir.display()
        ),
    )
    .unwrap();

    let config = PortalConfig::load(tmp.path()).unwrap();
    assert_eq!(config.target_year(), 2025);

    let ConfiguredStore::Local(store) = config.open_store() else {
        panic!("expected the durable backend when data_dir is set");
    };
    import::import_devotionals(&store, "JULY 4: FREEDOM", config.target_year(), false).unwrap();
    assert!(store.backend().table_path(DEVOTIONALS_TABLE).exists());
    assert!(data_dir.exists());

    let rows = store.from(DEVOTIONALS_TABLE).select().run().unwrap();
    assert_eq!(rows[0].str_field("devotional_date"), Some("2025-07-04"));
}
