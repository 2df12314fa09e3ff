//! Inclusive page ranges and clamping.

use serde::{Deserialize, Serialize};

/// First page of every selector. Pages are 1-based.
pub const FIRST_PAGE: i64 = 1;

/// Inclusive bounds a candidate page is clamped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: i64,
    pub end: i64,
}

impl PageRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Range starting at the first page
    pub fn up_to(end: i64) -> Self {
        Self::new(FIRST_PAGE, end)
    }

    /// Clamp `page` into this range
    pub fn clamp(&self, page: i64) -> i64 {
        clamp(page, *self)
    }

    pub fn contains(&self, page: i64) -> bool {
        (self.start..=self.end).contains(&page)
    }
}

/// Map a requested page onto the range.
///
/// The lower bound is checked first, so an inverted range (`start > end`)
/// still yields `start` for anything below it and `end` for anything above.
/// Unlike [`Ord::clamp`] this never panics.
pub fn clamp(page: i64, range: PageRange) -> i64 {
    if page < range.start {
        return range.start;
    }

    if page > range.end {
        range.end
    } else {
        page
    }
}
