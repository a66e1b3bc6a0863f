//! Daily rotation selection.
//!
//! Scripture-of-the-day and devotional-of-the-day pages need every client
//! to agree on "today's" item with no server-side scheduling. The selector
//! is a rotating cursor: days since the Unix epoch, modulo collection size.
//!
//! ```text
//! index = floor(now_ms / 86_400_000) mod len
//! ```
//!
//! The cursor advances by exactly one position at each UTC day boundary and
//! cycles through the whole collection with period `len` days. It is not
//! anchored to any content start date, and inserting or removing items
//! shifts which item lands on which future day — accepted, not compensated
//! for.
//!
//! Functions take the timestamp explicitly so tests are deterministic; the
//! `*_today` variants read the clock at the boundary.

use chrono::{DateTime, Utc};

/// Milliseconds in one UTC day.
pub const DAY_MS: i64 = 86_400_000;

/// Index of the item to show at `at`. Empty collection → `None` ("nothing
/// to display", not an error).
pub fn rotation_index(at: DateTime<Utc>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let day = at.timestamp_millis().div_euclid(DAY_MS);
    Some(day.rem_euclid(len as i64) as usize)
}

/// The item to show at `at`.
pub fn pick_daily<T>(items: &[T], at: DateTime<Utc>) -> Option<&T> {
    rotation_index(at, items.len()).map(|i| &items[i])
}

/// The item to show right now.
pub fn pick_daily_today<T>(items: &[T]) -> Option<&T> {
    pick_daily(items, Utc::now())
}
