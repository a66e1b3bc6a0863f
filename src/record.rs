//! Generic schemaless record type shared by every table.
//!
//! The portal stores announcements, devotionals, scriptures, resources,
//! sermons, and their categories in flat tables with no fixed schema. A
//! [`Record`] is a field map plus the three generated columns every table
//! carries:
//!
//! - `id`: unique within a table, assigned at insert time, never reused
//! - `created_at`: set at insert time unless the caller supplies one
//! - `updated_at`: set on every update
//!
//! Relationships between tables (a resource's `category_id`, a sermon's
//! `sermon_series_id`) are soft references: plain id fields with no
//! integrity enforcement, resolved by linear scan at display time via
//! [`resolve_label`]. A dangling reference is not an error — it resolves to
//! a caller-supplied fallback label such as "Uncategorized".
//!
//! ## Field ordering
//!
//! [`compare_field`] is the comparison used by the query adapter's
//! `order_by`. Date-like string values (RFC 3339 timestamps or `YYYY-MM-DD`
//! dates) compare by parsed timestamp; numbers compare numerically;
//! everything else compares lexicographically. Records missing the sort
//! column sort after records that have it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use uuid::Uuid;

/// A record's schemaless payload: field name → JSON value.
pub type Fields = serde_json::Map<String, Value>;

/// One row of a table. The field map is flattened into the record's JSON
/// representation, so on disk a record reads as a single flat object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    /// Build a record from a partial field map, generating `id` and
    /// `created_at` where the caller didn't supply them.
    ///
    /// Caller-supplied `id`, `created_at`, and `updated_at` entries are
    /// lifted out of the field map into the dedicated columns, so re-inserting
    /// an exported record round-trips its identity.
    pub fn from_fields(mut fields: Fields) -> Self {
        let id = match fields.remove("id") {
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => Uuid::new_v4().to_string(),
        };
        let created_at = fields
            .remove("created_at")
            .and_then(|v| parse_timestamp_value(&v))
            .unwrap_or_else(Utc::now);
        let updated_at = fields
            .remove("updated_at")
            .and_then(|v| parse_timestamp_value(&v));
        Self {
            id,
            created_at,
            updated_at,
            fields,
        }
    }

    /// String value of a field, if present and a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Set a field, replacing any existing value.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// Value of a column for ordering/filtering. The generated columns are
    /// exposed as JSON values alongside the schemaless fields.
    pub fn column_value(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(Value::String(self.id.clone())),
            "created_at" => Some(Value::String(self.created_at.to_rfc3339())),
            "updated_at" => self.updated_at.map(|t| Value::String(t.to_rfc3339())),
            _ => self.fields.get(column).cloned(),
        }
    }
}

/// Serialize a typed struct into a field map for insertion.
///
/// Callers pass struct-shaped values; a value that serializes to something
/// other than a JSON object produces an empty field map.
pub fn fields_of<T: Serialize>(value: &T) -> serde_json::Result<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Fields::new()),
    }
}

/// Resolve a soft reference to a display label.
///
/// Scans `records` for the one whose `id` matches, returning its
/// `label_field`. A missing reference, a reference to nothing, or a record
/// without the label field all resolve to `fallback` — dangling soft keys
/// are tolerated, not reported.
pub fn resolve_label<'a>(
    records: &'a [Record],
    reference: Option<&str>,
    label_field: &str,
    fallback: &'a str,
) -> &'a str {
    reference
        .and_then(|id| records.iter().find(|r| r.id == id))
        .and_then(|r| r.str_field(label_field))
        .filter(|label| !label.is_empty())
        .unwrap_or(fallback)
}

/// Compare two records on a column for a stable sort.
///
/// Missing values sort after present ones so that, ascending, rows without
/// the column land at the end.
pub fn compare_field(a: &Record, b: &Record, column: &str) -> Ordering {
    match (a.column_value(column), b.column_value(column)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(va), Some(vb)) => compare_values(&va, &vb),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(sa), Value::String(sb)) => {
            match (parse_timestamp_str(sa), parse_timestamp_str(sb)) {
                (Some(ta), Some(tb)) => ta.cmp(&tb),
                _ => sa.cmp(sb),
            }
        }
        (Value::Number(na), Value::Number(nb)) => {
            let fa = na.as_f64().unwrap_or(0.0);
            let fb = nb.as_f64().unwrap_or(0.0);
            fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(ba), Value::Bool(bb)) => ba.cmp(bb),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Parse a date-like string to a UTC timestamp. Accepts RFC 3339, bare
/// `YYYY-MM-DD` dates, and `YYYY-MM-DD HH:MM:SS` datetimes.
fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

fn parse_timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_timestamp_str)
}
