//! Page-index windowing over ordered, already-filtered collections.
//!
//! Every list endpoint shares the same envelope: a fixed page size, a
//! 1-based page index, and metadata describing the whole result set. An
//! out-of-range index degrades to an empty page; it never fails.

use serde::Serialize;

/// Fixed page size applied to every list view.
pub const PAGE_SIZE: usize = 10;

/// One window of an ordered result set plus the metadata needed to render
/// pager controls.
///
/// ## Invariants
/// - `total_pages == total_items.div_ceil(PAGE_SIZE)`.
/// - `items` holds at most [`PAGE_SIZE`] elements, in the source order.
///
/// # Examples
/// ```
/// use pagination::PaginatedList;
///
/// let page = PaginatedList::create((0..25).collect(), 3);
/// assert_eq!(page.items(), &[20, 21, 22, 23, 24]);
/// assert!(page.has_previous_page());
/// assert!(!page.has_next_page());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedList<T> {
    items: Vec<T>,
    page_index: i64,
    total_items: usize,
    total_pages: usize,
}

impl<T> PaginatedList<T> {
    /// Window `source` to the requested 1-based page.
    ///
    /// Indices below 1 or beyond the last page yield an empty `items` slice
    /// while keeping the result-set metadata intact.
    #[must_use]
    pub fn create(source: Vec<T>, page_index: i64) -> Self {
        let total_items = source.len();
        let total_pages = total_items.div_ceil(PAGE_SIZE);

        let items = if page_index < 1 {
            Vec::new()
        } else {
            let skip = usize::try_from(page_index - 1)
                .ok()
                .and_then(|i| i.checked_mul(PAGE_SIZE));
            match skip {
                Some(offset) => source.into_iter().skip(offset).take(PAGE_SIZE).collect(),
                None => Vec::new(),
            }
        };

        Self {
            items,
            page_index,
            total_items,
            total_pages,
        }
    }

    /// Items on this page, in source order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The 1-based index this page was requested with.
    #[must_use]
    pub fn page_index(&self) -> i64 {
        self.page_index
    }

    /// Number of items across the whole result set.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Number of pages the result set spans.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.page_index > 1
    }

    /// Whether a page follows this one.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        usize::try_from(self.page_index).is_ok_and(|index| index >= 1 && index < self.total_pages)
    }

    /// Consume the envelope, yielding the windowed items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Transform the windowed items while keeping the envelope metadata.
    ///
    /// Used at the API seam to project entities into DTOs after windowing.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedList<U> {
        PaginatedList {
            items: self.items.into_iter().map(f).collect(),
            page_index: self.page_index,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn numbers(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[rstest]
    #[case(25, 1, 10, false, true)]
    #[case(25, 2, 10, true, true)]
    #[case(25, 3, 5, true, false)]
    #[case(10, 1, 10, false, false)]
    #[case(0, 1, 0, false, false)]
    fn windows_and_flags(
        #[case] total: usize,
        #[case] index: i64,
        #[case] expected_len: usize,
        #[case] previous: bool,
        #[case] next: bool,
    ) {
        let page = PaginatedList::create(numbers(total), index);
        assert_eq!(page.items().len(), expected_len);
        assert_eq!(page.has_previous_page(), previous);
        assert_eq!(page.has_next_page(), next);
        assert_eq!(page.total_items(), total);
        assert_eq!(page.total_pages(), total.div_ceil(PAGE_SIZE));
    }

    #[rstest]
    fn preserves_source_order() {
        let page = PaginatedList::create(numbers(25), 2);
        assert_eq!(page.items(), &[10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    #[case(9)]
    fn out_of_range_index_yields_empty_page(#[case] index: i64) {
        let page = PaginatedList::create(numbers(25), index);
        assert!(page.items().is_empty());
        assert_eq!(page.total_items(), 25);
    }

    #[rstest]
    fn map_projects_items_and_keeps_metadata() {
        let page = PaginatedList::create(numbers(12), 2).map(|n| n * 2);
        assert_eq!(page.items(), &[20, 22]);
        assert_eq!(page.total_items(), 12);
        assert_eq!(page.total_pages(), 2);
        assert!(page.has_previous_page());
    }
}
