//! Devotional bulk text parsing and export.
//!
//! Admins paste a whole month (or year) of devotionals as one plaintext
//! blob. Entries are separated by blank lines and look like:
//!
//! ```text
//! JANUARY 4: PURSUING HEALTHY RELATIONSHIPS
//!
//! Truth and Grace Together
//!
//! John 1:14; Ephesians 4:15
//!
//! Jesus embodied both grace and truth perfectly.
//!
//! Response: Identify one conversation where you need grace.
//!
//! Prayer: Jesus, give me Your heart to speak truth.
//! ```
//!
//! ## Classification rules
//!
//! A paragraph whose first line matches `<MONTH> <DAY>: <TITLE>` starts a
//! new entry. Every other paragraph belongs to the entry currently open and
//! is classified in order:
//!
//! 1. starts with `Response:` (case-insensitive) → response
//! 2. starts with `Prayer:` (case-insensitive) → prayer
//! 3. subtitle still empty and paragraph is a single line → subtitle
//! 4. scripture reference still empty, single line containing `:` → reference
//! 5. otherwise → appended to content (blank-line separated)
//!
//! Rule 3 precedes rule 4: a lone line that could be either is
//! a subtitle until the subtitle slot is filled.
//!
//! ## The year parameter
//!
//! Source text carries no year, only month and day. The caller supplies the
//! target year explicitly — typically the current year, but archival
//! re-imports can pass the year the file was written for. The date string
//! is built by plain formatting with no calendar validation (a source line
//! saying `FEBRUARY 30` yields `YYYY-02-30`), matching the system this
//! models.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::record::Record;

/// One parsed devotional. All fields are plain strings; `devotional_date`
/// is `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Devotional {
    pub devotional_date: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub scripture_reference: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub prayer: String,
}

impl Devotional {
    /// Rehydrate from a stored record. Missing fields read as empty.
    pub fn from_record(record: &Record) -> Self {
        let get = |name: &str| record.str_field(name).unwrap_or_default().to_string();
        Self {
            devotional_date: get("devotional_date"),
            title: get("title"),
            subtitle: get("subtitle"),
            scripture_reference: get("scripture_reference"),
            content: get("content"),
            response: get("response"),
            prayer: get("prayer"),
        }
    }
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2}):\s*(.*)$",
    )
    .unwrap()
});

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    MONTHS.iter().position(|m| *m == lower).map(|i| i as u32 + 1)
}

/// Split a blob into paragraphs: runs of non-blank lines, each line trimmed.
fn paragraphs(text: &str) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push(trimmed.to_string());
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn append_block(target: &mut String, block: &str) {
    if !target.is_empty() {
        target.push_str("\n\n");
    }
    target.push_str(block);
}

/// Parse a devotional text blob into records for `year`.
///
/// Returns entries in source order. A blob with no valid header lines
/// yields an empty list; reporting "no entries found" is the caller's job
/// (see [`crate::import::import_devotionals`]).
pub fn parse_devotionals(text: &str, year: i32) -> Vec<Devotional> {
    let mut out: Vec<Devotional> = Vec::new();
    let mut current: Option<Devotional> = None;

    for para in paragraphs(text) {
        if let Some(caps) = HEADER.captures(&para[0]) {
            let day: u32 = caps[2].parse().unwrap_or(0);
            let month = month_number(&caps[1]);
            if let Some(month) = month.filter(|_| (1..=31).contains(&day)) {
                if let Some(done) = current.take() {
                    out.push(done);
                }
                let mut next = Devotional {
                    devotional_date: format!("{year:04}-{month:02}-{day:02}"),
                    title: caps[3].trim().to_string(),
                    ..Devotional::default()
                };
                // A header paragraph occasionally carries extra lines; they
                // belong to the entry's content.
                if para.len() > 1 {
                    append_block(&mut next.content, &para[1..].join("\n"));
                }
                current = Some(next);
                continue;
            }
        }

        let Some(entry) = current.as_mut() else {
            // Text before the first header has no entry to belong to.
            continue;
        };

        let joined = para.join(" ");
        let lower = joined.to_ascii_lowercase();
        if lower.starts_with("response:") {
            entry.response = joined["response:".len()..].trim().to_string();
        } else if lower.starts_with("prayer:") {
            entry.prayer = joined["prayer:".len()..].trim().to_string();
        } else if entry.subtitle.is_empty() && para.len() == 1 {
            entry.subtitle = joined;
        } else if entry.scripture_reference.is_empty() && para.len() == 1 && joined.contains(':') {
            entry.scripture_reference = joined;
        } else {
            append_block(&mut entry.content, &para.join("\n"));
        }
    }

    if let Some(done) = current {
        out.push(done);
    }
    out
}

/// Reconstruct the import format from parsed records — the inverse of
/// [`parse_devotionals`], used for the admin's backup download.
///
/// The header month is written uppercased with the day number unpadded
/// (`JANUARY 4: TITLE`); empty fields are omitted along with their blank
/// lines. Entries are separated by a blank line.
pub fn export_devotionals(devotionals: &[Devotional]) -> String {
    let mut entries = Vec::with_capacity(devotionals.len());
    for d in devotionals {
        let mut blocks = vec![format!("{}: {}", header_label(&d.devotional_date), d.title)];
        if !d.subtitle.is_empty() {
            blocks.push(d.subtitle.clone());
        }
        if !d.scripture_reference.is_empty() {
            blocks.push(d.scripture_reference.clone());
        }
        if !d.content.is_empty() {
            blocks.push(d.content.clone());
        }
        if !d.response.is_empty() {
            blocks.push(format!("Response: {}", d.response));
        }
        if !d.prayer.is_empty() {
            blocks.push(format!("Prayer: {}", d.prayer));
        }
        entries.push(blocks.join("\n\n"));
    }
    let mut text = entries.join("\n\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

/// `"2026-01-04"` → `"JANUARY 4"`. A date that doesn't parse is emitted
/// verbatim so the export never drops an entry.
fn header_label(date: &str) -> String {
    let mut parts = date.splitn(3, '-');
    let (_year, month, day) = (parts.next(), parts.next(), parts.next());
    match (
        month.and_then(|m| m.parse::<usize>().ok()),
        day.and_then(|d| d.parse::<u32>().ok()),
    ) {
        (Some(m), Some(d)) if (1..=12).contains(&m) => {
            format!("{} {}", MONTHS[m - 1].to_uppercase(), d)
        }
        _ => date.to_string(),
    }
}
