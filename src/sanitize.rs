//! Cleanup of admin-authored rich text before display.
//!
//! Content pasted from word processors and web editors arrives wrapped in
//! inline styling that fights the site's own look: hardcoded fonts, colors,
//! spacing. [`clean_inline_styles`] strips a fixed denylist of CSS
//! properties from every element's `style` attribute, drops the attribute
//! when nothing is left, and unwraps `<span>` wrappers that end up carrying
//! neither style nor class — their children are promoted in place, so the
//! markup collapses to what the site's stylesheet would have produced.
//!
//! [`clean_description`] handles the plain-text counterpart: a small set of
//! literal boilerplate phrases is removed from description fields, and a
//! remainder with no real content collapses to the empty string.
//!
//! Both functions are idempotent: cleaning already-clean content is a
//! no-op, so display paths can sanitize unconditionally.

use regex::Regex;
use std::sync::LazyLock;

/// Inline CSS properties stripped from `style` attributes.
const STYLE_DENYLIST: [&str; 18] = [
    "font-family",
    "font-size",
    "color",
    "font-weight",
    "letter-spacing",
    "font-style",
    "font-variant",
    "text-decoration",
    "text-align",
    "text-indent",
    "text-transform",
    "background-color",
    "display",
    "float",
    "white-space",
    "word-spacing",
    "orphans",
    "widows",
];

/// Vendor-prefixed stroke property pasted in by some editors.
const WEBKIT_TEXT_STROKE: &str = "-webkit-text-stroke-width";

/// Boilerplate phrases stripped from plain description text.
const BOILERPLATE_PHRASES: [&str; 3] = [
    "Available from multiple sources",
    "available from multiple sources",
    "AVAILABLE FROM MULTIPLE SOURCES",
];

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:"[^"]*"|'[^']*'|[^>"'])*)>"#).unwrap()
});

// Leading whitespace rather than \b so that data-style/data-class
// attributes don't match. The last alternate catches unquoted values
// (`style=color:red`), which sloppy editors do emit.
static STYLE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\sstyle\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap()
});

static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\sclass\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>/]+))"#).unwrap()
});

fn is_denylisted(property: &str) -> bool {
    STYLE_DENYLIST.contains(&property) || property == WEBKIT_TEXT_STROKE
}

/// Drop denylisted declarations from a `style` attribute value. Kept
/// declarations are normalized to `prop: value` with a lowercased property
/// name, so a second pass reproduces its own output.
fn clean_declarations(style: &str) -> String {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            let value = value.trim();
            if prop.is_empty() || value.is_empty() || is_denylisted(&prop) {
                None
            } else {
                Some(format!("{prop}: {value}"))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Rewrite a tag's attribute text: clean the style attribute, removing it
/// entirely when nothing survives. Attributes other than `style` pass
/// through untouched.
fn clean_attrs(attrs: &str) -> String {
    let Some(m) = STYLE_ATTR.captures(attrs) else {
        return attrs.to_string();
    };
    let raw_value = m
        .get(1)
        .or_else(|| m.get(2))
        .or_else(|| m.get(3))
        .map_or("", |v| v.as_str());
    let cleaned = clean_declarations(raw_value);
    let whole = m.get(0).map_or("", |w| w.as_str());
    if cleaned.is_empty() {
        attrs.replacen(whole, "", 1)
    } else {
        let quote = if cleaned.contains('"') { '\'' } else { '"' };
        attrs.replacen(whole, &format!(" style={quote}{cleaned}{quote}"), 1)
    }
}

fn has_nonempty_capture(re: &Regex, attrs: &str) -> bool {
    re.captures(attrs)
        .map(|c| {
            c.iter()
                .skip(1)
                .flatten()
                .any(|g| !g.as_str().trim().is_empty())
        })
        .unwrap_or(false)
}

/// Strip denylisted inline styles and unwrap attribute-less spans.
///
/// Non-tag text, comments, and tags without a style attribute are copied
/// verbatim. Span open/close pairing is tracked with a stack, so unwrapping
/// a bare inner span never eats the closer of a styled outer one.
pub fn clean_inline_styles(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    // One entry per currently-open <span>: true when its open tag was
    // dropped and its closer must be dropped too.
    let mut span_stack: Vec<bool> = Vec::new();

    for caps in TAG.captures_iter(html) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        out.push_str(&html[last..whole.start()]);
        last = whole.end();

        let closing = &caps[1] == "/";
        let name = caps[2].to_string();
        let attrs = caps.get(3).map_or("", |m| m.as_str());
        let is_span = name.eq_ignore_ascii_case("span");

        if closing {
            if is_span && span_stack.pop() == Some(true) {
                continue; // opener was unwrapped; drop the closer too
            }
            out.push_str(whole.as_str());
            continue;
        }

        let self_closing = attrs.trim_end().ends_with('/');
        let bare_attrs = if self_closing {
            attrs.trim_end().trim_end_matches('/')
        } else {
            attrs
        };

        let new_attrs = clean_attrs(bare_attrs);
        let has_style = STYLE_ATTR.is_match(&new_attrs);
        let has_class = has_nonempty_capture(&CLASS_ATTR, &new_attrs);

        if is_span && !has_style && !has_class {
            if !self_closing {
                span_stack.push(true);
            }
            continue;
        }
        if is_span && !self_closing {
            span_stack.push(false);
        }

        if new_attrs == bare_attrs {
            out.push_str(whole.as_str());
        } else {
            let trimmed = new_attrs.trim();
            let slash = if self_closing { "/" } else { "" };
            if trimmed.is_empty() {
                out.push_str(&format!("<{name}{slash}>"));
            } else {
                out.push_str(&format!("<{name} {trimmed}{slash}>"));
            }
        }
    }

    out.push_str(&html[last..]);
    out
}

/// Strip boilerplate phrases from plain description text. A remainder with
/// no alphanumeric content (stray punctuation, whitespace) collapses to the
/// empty string.
pub fn clean_description(text: &str) -> String {
    let mut cleaned = text.to_string();
    for phrase in BOILERPLATE_PHRASES {
        cleaned = cleaned.replace(phrase, "");
    }
    let cleaned = cleaned.trim();
    if cleaned.chars().any(char::is_alphanumeric) {
        cleaned.to_string()
    } else {
        String::new()
    }
}
