//! Fixed-size pages over rule lists.

/// Rules shown per page.
pub const PAGE_SIZE: usize = 8;

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Entries with their 1-based position in the full list.
    pub entries: Vec<(usize, T)>,
    /// 0-based index of this page after clamping.
    pub page: usize,
    /// Number of pages, at least 1.
    pub total_pages: usize,
    /// Number of entries in the full list.
    pub total: usize,
}

impl<T> Page<T> {
    /// Whether the full list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Number of pages needed for `total` entries; never 0.
#[must_use]
pub const fn page_count(total: usize, per_page: usize) -> usize {
    if total == 0 || per_page == 0 {
        1
    } else {
        total.div_ceil(per_page)
    }
}

/// Returns page `page` (0-based) of `items`, clamped to the last page.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_pages = page_count(items.len(), per_page);
    let page = page.min(total_pages - 1);
    let start = page * per_page;

    let entries = items
        .iter()
        .enumerate()
        .skip(start)
        .take(per_page)
        .map(|(offset, item)| (offset + 1, item.clone()))
        .collect();

    Page {
        entries,
        page,
        total_pages,
        total: items.len(),
    }
}
