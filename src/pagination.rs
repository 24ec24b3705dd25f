//! Pagination envelope returned by every collection endpoint.

use serde::Serialize;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;
/// Largest page size a caller may request.
pub const MAX_ITEMS_PER_PAGE: usize = 100;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Clamps a requested page size into `1..=MAX_ITEMS_PER_PAGE`.
pub fn clamp_per_page(per_page: Option<usize>) -> usize {
    per_page
        .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
        .clamp(1, MAX_ITEMS_PER_PAGE)
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: usize,
    pub per_page: usize,
    pub total: usize,
    pub last_page: usize,
    /// Compact list of page links; `None` marks an elided gap.
    pub pages: Vec<Option<usize>>,
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, per_page: usize, total: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };
        let per_page = per_page.max(1);
        let last_page = total.div_ceil(per_page);

        let pages = get_pages(last_page, current_page, 2, 2, 4, 2);

        Self {
            items,
            meta: PageMeta {
                current_page,
                per_page,
                total,
                last_page,
                pages,
            },
        }
    }

    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
