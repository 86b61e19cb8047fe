//! Pure pagination projection, shared by the metrics and alerts lists.

/// Per-list pagination state. Two independent instances live in the
/// dashboard state, one for metrics and one for alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: usize,
    per_page: usize,
}

impl PageCursor {
    /// `per_page` must be non-zero; a zero value is pinned to 1 rather
    /// than dividing by zero later.
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Back to page 1. Called whenever the backing list is replaced,
    /// since page validity depends on list length and identity.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Move one page back, clamped at 1. Never fails on out-of-range
    /// state.
    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Move one page forward, clamped to the page count of `list_len`
    /// items.
    pub fn next(&mut self, list_len: usize) {
        self.page = (self.page + 1).min(page_count(list_len, self.per_page));
    }

    #[cfg(test)]
    pub(crate) fn with_page(per_page: usize, page: usize) -> Self {
        Self {
            page,
            per_page: per_page.max(1),
        }
    }
}

/// One derived page window over a list.
#[derive(Debug, PartialEq)]
pub struct PageView<'a, T> {
    pub items: &'a [T],
    /// The requested page clamped into `[1, page_count]`.
    pub page: usize,
    pub page_count: usize,
}

fn page_count(list_len: usize, per_page: usize) -> usize {
    list_len.div_ceil(per_page).max(1)
}

/// Derives the visible window for `cursor` over `list`.
///
/// Pure and stateless: the cursor is not mutated, so re-projecting with
/// the same inputs always yields the same output. An out-of-range page is
/// clamped, never an error.
pub fn project<'a, T>(list: &'a [T], cursor: &PageCursor) -> PageView<'a, T> {
    let page_count = page_count(list.len(), cursor.per_page);
    let page = cursor.page.clamp(1, page_count);
    let start = (page - 1) * cursor.per_page;
    let end = (start + cursor.per_page).min(list.len());
    let items = if start < list.len() {
        &list[start..end]
    } else {
        &[]
    };
    PageView {
        items,
        page,
        page_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_idempotent() {
        let list: Vec<i32> = (0..10).collect();
        let cursor = PageCursor::with_page(3, 2);
        let first = project(&list, &cursor);
        let second = project(&list, &cursor);
        assert_eq!(first, second);
        assert_eq!(first.items, &[3, 4, 5]);
        assert_eq!(first.page_count, 4);
    }

    #[test]
    fn out_of_range_pages_clamp_into_bounds() {
        let list: Vec<i32> = (0..7).collect();
        let too_high = PageCursor::with_page(3, 99);
        let view = project(&list, &too_high);
        assert_eq!(view.page, 3);
        assert_eq!(view.items, &[6]);

        let too_low = PageCursor::with_page(3, 0);
        let view = project(&list, &too_low);
        assert_eq!(view.page, 1);
        assert_eq!(view.items, &[0, 1, 2]);
    }

    #[test]
    fn empty_list_still_has_one_page() {
        let list: Vec<i32> = Vec::new();
        let view = project(&list, &PageCursor::new(4));
        assert_eq!(view.page, 1);
        assert_eq!(view.page_count, 1);
        assert!(view.items.is_empty());
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut cursor = PageCursor::new(4);
        cursor.prev();
        assert_eq!(cursor.page(), 1);

        // 9 items at 4 per page -> 3 pages.
        cursor.next(9);
        cursor.next(9);
        assert_eq!(cursor.page(), 3);
        cursor.next(9);
        assert_eq!(cursor.page(), 3);

        cursor.prev();
        assert_eq!(cursor.page(), 2);
    }

    #[test]
    fn reset_returns_to_first_page() {
        let mut cursor = PageCursor::new(2);
        cursor.next(10);
        cursor.next(10);
        assert_eq!(cursor.page(), 3);
        cursor.reset();
        assert_eq!(cursor.page(), 1);
    }

    #[test]
    fn exact_multiple_has_no_phantom_page() {
        let list: Vec<i32> = (0..8).collect();
        let view = project(&list, &PageCursor::with_page(4, 2));
        assert_eq!(view.page_count, 2);
        assert_eq!(view.items, &[4, 5, 6, 7]);
    }
}
