//! Pagination bar layout

use std::fmt;

/// Pages shown around the current one
const WINDOW: usize = 5;

/// One slot in the pagination bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Gap,
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageMarker::Page(n) => write!(f, "{}", n),
            PageMarker::Gap => write!(f, "…"),
        }
    }
}

/// Page numbers to show for `current` out of `total_pages`.
///
/// Up to five consecutive pages centred on `current`; the first and last
/// page are always present, with a gap marker when they are not adjacent.
pub fn page_window(current: usize, total_pages: usize) -> Vec<PageMarker> {
    if total_pages <= WINDOW {
        return (1..=total_pages).map(PageMarker::Page).collect();
    }

    let mut start = current.saturating_sub(WINDOW / 2).max(1);
    let end = (start + WINDOW - 1).min(total_pages);
    if end - start + 1 < WINDOW {
        start = (end + 1).saturating_sub(WINDOW).max(1);
    }

    let mut markers = Vec::with_capacity(WINDOW + 4);
    if start > 1 {
        markers.push(PageMarker::Page(1));
        if start > 2 {
            markers.push(PageMarker::Gap);
        }
    }
    markers.extend((start..=end).map(PageMarker::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            markers.push(PageMarker::Gap);
        }
        markers.push(PageMarker::Page(total_pages));
    }
    markers
}
