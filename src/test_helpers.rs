//! Shared test fixtures for the chapel test suite.
//!
//! Sample import texts in the exact shapes admins paste, plus a store
//! constructor that gives each test an isolated in-memory backend.

use crate::store::{MemoryBackend, Store};

/// The canonical single-entry devotional blob: header, subtitle, scripture
/// reference, one content paragraph, response, prayer.
pub const SAMPLE_DEVOTIONAL_TEXT: &str = "\
JANUARY 4: PURSUING HEALTHY RELATIONSHIPS

Truth and Grace Together

John 1:14; Ephesians 4:15

Jesus embodied both grace and truth perfectly.

Response: Identify one conversation where you need grace.

Prayer: Jesus, give me Your heart to speak truth.
";

/// Two complete resource blocks (the second without an author), separated
/// by three blank lines.
pub const SAMPLE_RESOURCE_TEXT: &str = "\
Category: Marriage
Title: The Meaning of Marriage
Author: Timothy Keller
Links to Books:

https://example.com/meaning-of-marriage
https://example.org/keller



Category: Prayer
Title: A Praying Life
Links to Books:

https://example.com/praying-life
";

/// A fresh store on an isolated in-memory backend.
pub fn memory_store() -> Store<MemoryBackend> {
    Store::new(MemoryBackend::new())
}
