//! Page slicing over an already-derived view.

/// One page of a derived view.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page, at most `page_size` of them.
    pub items: Vec<T>,
    /// The page actually served (1-based) after clamping.
    pub page: usize,
    /// Total number of pages, at least 1.
    pub total_pages: usize,
}

/// Slice `items` into 1-based pages of `page_size`.
///
/// Out-of-range page numbers clamp silently to the nearest valid page; a
/// request for page 0 serves page 1. `page_size` must be non-zero, which the
/// config/intent layer guarantees.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Page<T> {
    debug_assert!(page_size > 0);

    let total_pages = items.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    let items = if start < items.len() {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        page,
        total_pages,
    }
}
