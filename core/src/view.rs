//! Derived values the presentation layer renders: the search-filtered list
//! and pagination metadata. Everything here is a pure function of store
//! state and is cheap enough to recompute on every read.

use crate::error::NetworkError;
use crate::types::TodoItem;

/// Items whose text contains `term`, compared case-insensitively, in store
/// order. A blank term (after trimming) matches everything.
pub fn visible_items<'a>(items: &'a [TodoItem], term: &str) -> Vec<&'a TodoItem> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| item.text.to_lowercase().contains(&needle))
        .collect()
}

/// `ceil(total_count / page_size)`; zero when there is nothing to show.
pub fn total_pages(total_count: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(u64::from(page_size))
}

/// 1-based inclusive range of records shown on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRange {
    pub start: u64,
    pub end: u64,
}

/// Range of the current page: starts at `(page-1)*page_size + 1` and ends
/// at `min(page*page_size, total_count)`, further capped by the number of
/// service records loaded for the page. Local items are not service records
/// and must not be counted in `loaded`.
///
/// `None` when the service holds no todos, nothing is loaded, or `page`
/// lies past the end.
pub fn display_range(page: u32, page_size: u32, total_count: u64, loaded: usize) -> Option<DisplayRange> {
    if total_count == 0 || loaded == 0 || page == 0 || page_size == 0 {
        return None;
    }
    let size = u64::from(page_size);
    let start = u64::from(page - 1) * size + 1;
    let loaded_end = start + (loaded as u64) - 1;
    let end = (u64::from(page) * size).min(total_count).min(loaded_end);
    (start <= end).then_some(DisplayRange { start, end })
}

/// Read-only snapshot of everything the presentation layer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoView<'a> {
    pub visible_items: Vec<&'a TodoItem>,
    pub is_loading: bool,
    pub error: Option<&'a NetworkError>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub display_range: Option<DisplayRange>,
    pub search_term: &'a str,
}
