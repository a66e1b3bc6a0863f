//! Resource (book recommendation) bulk text parsing and export.
//!
//! Resource lists arrive as labeled blocks, one per title, separated by two
//! or more consecutive blank lines — the separator is stricter than the
//! devotional format because a block is internally multi-line and contains
//! its own single blank line:
//!
//! ```text
//! Category: Marriage
//! Title: The Meaning of Marriage
//! Author: Timothy Keller
//! Links to Books:
//!
//! https://example.com/meaning-of-marriage
//! https://example.org/keller
//! ```
//!
//! ## Accept/drop rule
//!
//! A block is accepted only when it has both a title and at least one
//! `http`-prefixed link under an armed `Links to Books:` line. Blocks
//! missing either are silently dropped, matching the system this models.
//!
//! The store-aware merge policy (category resolve-or-create, link-set union
//! per `(title, author)`) lives in [`crate::import`]; this module is the
//! pure text layer plus the inverse exporter.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::record::{Record, resolve_label};

/// One accepted block of the import format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResource {
    pub category: String,
    pub title: String,
    pub author: String,
    /// Purchase links in source order. Duplicates within one block survive
    /// parsing; deduplication happens at merge time.
    pub links: Vec<String>,
}

/// Two-or-more consecutive blank lines (lines may carry stray whitespace
/// or CRLF carriage returns).
static BLOCK_SEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n[ \t\r]*\n").unwrap());

/// Parse a resource text blob. Blocks lacking a title or any link are
/// dropped; an all-invalid blob yields an empty list.
pub fn parse_resources(text: &str) -> Vec<ParsedResource> {
    BLOCK_SEP
        .split(text)
        .filter_map(parse_block)
        .collect()
}

fn parse_block(block: &str) -> Option<ParsedResource> {
    let mut entry = ParsedResource::default();
    let mut collecting_links = false;

    for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(rest) = line.strip_prefix("Category:") {
            entry.category = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Title:") {
            entry.title = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Author:") {
            entry.author = rest.trim().to_string();
        } else if line == "Links to Books:" {
            collecting_links = true;
        } else if collecting_links && line.starts_with("http") {
            entry.links.push(line.to_string());
        }
    }

    if entry.title.is_empty() || entry.links.is_empty() {
        return None;
    }
    Some(entry)
}

/// Reconstruct the import format from stored records — the inverse of
/// [`parse_resources`], used for the admin's backup download.
///
/// Category names come through the soft `category_id` reference; a dangling
/// or missing reference exports as "Uncategorized". Resources are separated
/// by three blank lines.
pub fn export_resources(resources: &[Record], categories: &[Record]) -> String {
    let mut blocks = Vec::with_capacity(resources.len());
    for r in resources {
        let category = resolve_label(
            categories,
            r.str_field("category_id"),
            "name",
            "Uncategorized",
        );
        let mut lines = vec![
            format!("Category: {category}"),
            format!("Title: {}", r.str_field("title").unwrap_or_default()),
        ];
        if let Some(author) = r.str_field("author").filter(|a| !a.is_empty()) {
            lines.push(format!("Author: {author}"));
        }
        lines.push("Links to Books:".to_string());
        lines.push(String::new());
        for link in r
            .str_field("links")
            .unwrap_or_default()
            .split('\n')
            .filter(|l| !l.trim().is_empty())
        {
            lines.push(link.to_string());
        }
        blocks.push(lines.join("\n"));
    }
    let mut text = blocks.join("\n\n\n\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Fields, Record};
    use crate::test_helpers::SAMPLE_RESOURCE_TEXT;
    use serde_json::json;

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn parses_two_complete_blocks() {
        let parsed = parse_resources(SAMPLE_RESOURCE_TEXT);
        assert_eq!(parsed.len(), 2);

        assert_eq!(parsed[0].category, "Marriage");
        assert_eq!(parsed[0].title, "The Meaning of Marriage");
        assert_eq!(parsed[0].author, "Timothy Keller");
        assert_eq!(
            parsed[0].links,
            vec![
                "https://example.com/meaning-of-marriage",
                "https://example.org/keller",
            ]
        );

        assert_eq!(parsed[1].category, "Prayer");
        assert_eq!(parsed[1].author, "");
    }

    #[test]
    fn block_without_title_is_dropped() {
        let text = "Category: X\nLinks to Books:\n\nhttps://example.com/a\n";
        assert!(parse_resources(text).is_empty());
    }

    #[test]
    fn block_without_links_is_dropped() {
        let text = "Category: X\nTitle: No Links Here\nLinks to Books:\n";
        assert!(parse_resources(text).is_empty());
    }

    #[test]
    fn links_before_the_marker_are_ignored() {
        let text = "Title: T\nhttps://example.com/early\nLinks to Books:\n\nhttps://example.com/late\n";
        let parsed = parse_resources(text);
        assert_eq!(parsed[0].links, vec!["https://example.com/late"]);
    }

    #[test]
    fn mixed_valid_and_invalid_blocks() {
        let text = "Title: Good\nLinks to Books:\n\nhttps://example.com/good\n\n\n\nTitle: Bad, no links\n\n\n\nCategory: Also bad\n";
        let parsed = parse_resources(text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "Good");
    }

    #[test]
    fn crlf_input_splits_into_blocks() {
        // Pastes from Windows text files carry \r\n line endings.
        let text = "Category: A\r\nTitle: First\r\nLinks to Books:\r\n\r\nhttps://example.com/a\r\n\r\n\r\n\r\nCategory: B\r\nTitle: Second\r\nLinks to Books:\r\n\r\nhttps://example.com/b\r\n";
        let parsed = parse_resources(text);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "First");
        assert_eq!(parsed[0].links, vec!["https://example.com/a"]);
        assert_eq!(parsed[1].title, "Second");
        assert_eq!(parsed[1].links, vec!["https://example.com/b"]);
    }

    #[test]
    fn single_blank_line_does_not_split_a_block() {
        let text = "Title: One Block\nLinks to Books:\n\nhttps://example.com/a\nhttps://example.com/b\n";
        let parsed = parse_resources(text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].links.len(), 2);
    }

    #[test]
    fn duplicate_links_within_a_block_survive_parsing() {
        let text = "Title: T\nLinks to Books:\n\nhttps://example.com/a\nhttps://example.com/a\n";
        let parsed = parse_resources(text);
        assert_eq!(parsed[0].links.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_entries() {
        assert!(parse_resources("").is_empty());
        assert!(parse_resources("\n\n\n\n").is_empty());
    }

    // =========================================================================
    // Export
    // =========================================================================

    fn record_with(pairs: &[(&str, &str)]) -> Record {
        let mut f = Fields::new();
        for (k, v) in pairs {
            f.insert(k.to_string(), json!(v));
        }
        Record::from_fields(f)
    }

    #[test]
    fn export_emits_the_import_format() {
        let cat = record_with(&[("id", "c1"), ("name", "Marriage")]);
        let res = record_with(&[
            ("title", "The Meaning of Marriage"),
            ("author", "Timothy Keller"),
            ("category_id", "c1"),
            ("links", "https://example.com/a\nhttps://example.org/b"),
        ]);

        let text = export_resources(&[res], &[cat]);
        assert_eq!(
            text,
            "Category: Marriage\nTitle: The Meaning of Marriage\nAuthor: Timothy Keller\nLinks to Books:\n\nhttps://example.com/a\nhttps://example.org/b\n"
        );
    }

    #[test]
    fn export_skips_empty_author() {
        let res = record_with(&[("title", "T"), ("links", "https://example.com/a")]);
        let text = export_resources(&[res], &[]);
        assert!(!text.contains("Author:"));
    }

    #[test]
    fn export_resolves_dangling_category_to_fallback() {
        let res = record_with(&[
            ("title", "T"),
            ("category_id", "gone"),
            ("links", "https://example.com/a"),
        ]);
        let text = export_resources(&[res], &[]);
        assert!(text.starts_with("Category: Uncategorized\n"));
    }

    #[test]
    fn export_separates_resources_with_three_blank_lines() {
        let a = record_with(&[("title", "A"), ("links", "https://example.com/a")]);
        let b = record_with(&[("title", "B"), ("links", "https://example.com/b")]);
        let text = export_resources(&[a, b], &[]);
        assert!(text.contains("https://example.com/a\n\n\n\nCategory:"));
    }

    #[test]
    fn export_parse_round_trip() {
        let cat = record_with(&[("id", "c1"), ("name", "Prayer")]);
        let a = record_with(&[
            ("title", "A"),
            ("author", "Someone"),
            ("category_id", "c1"),
            ("links", "https://example.com/a"),
        ]);
        let b = record_with(&[("title", "B"), ("links", "https://example.com/b")]);

        let parsed = parse_resources(&export_resources(&[a, b], &[cat]));
        assert_eq!(
            parsed,
            vec![
                ParsedResource {
                    category: "Prayer".into(),
                    title: "A".into(),
                    author: "Someone".into(),
                    links: vec!["https://example.com/a".into()],
                },
                ParsedResource {
                    category: "Uncategorized".into(),
                    title: "B".into(),
                    author: "".into(),
                    links: vec!["https://example.com/b".into()],
                },
            ]
        );
    }
}
