//! Page-control and displayed-range computation

use crate::types::{PageKey, FIRST_PAGE};
use serde::{Deserialize, Serialize};

/// Window of page numbers to render as navigation controls
///
/// The window is centered on `current` and clipped to `[1, last_page]`.
/// `None` renders every page. `current` is clamped into range first, so the
/// result always contains it when it is a valid page.
pub fn page_controls(current: PageKey, last_page: u32, window: Option<u32>) -> Vec<PageKey> {
    let last = last_page.max(FIRST_PAGE);
    let current = current.clamp(FIRST_PAGE, last);

    let Some(window) = window else {
        return (FIRST_PAGE..=last).collect();
    };

    let size = window.clamp(1, last);
    let before = (size - 1) / 2;
    // Latest start that still fits the whole window before `last`
    let latest_start = last - (size - 1);
    let start = current
        .saturating_sub(before)
        .clamp(FIRST_PAGE, latest_start);

    (start..=start + (size - 1)).collect()
}

/// 1-based positions of the first and last entity shown on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    /// Position of the first entity (0 when the collection is empty)
    pub from: u64,
    /// Position of the last entity
    pub to: u64,
}

/// Displayed range for a page
///
/// `from = (current - 1) * per_page + 1` and
/// `to = min(current * per_page, total)`. Both are 0 when the page shows
/// nothing: an empty collection, or a page past the end of it.
pub fn page_range(current: PageKey, per_page: u32, total: u64) -> PageRange {
    let per_page = u64::from(per_page);
    let current = u64::from(current.max(FIRST_PAGE));
    let from = (current - 1).saturating_mul(per_page).saturating_add(1);
    if total == 0 || from > total {
        return PageRange { from: 0, to: 0 };
    }

    PageRange {
        from,
        to: current.saturating_mul(per_page).min(total),
    }
}
