//! Pagination stage - windowing over top-level rows

use std::ops::Range;

/// Rows per page
pub const PAGE_SIZE: usize = 10;

/// Page numbers shown at once in the footer
pub const PAGE_BUTTONS: usize = 5;

/// Current page (1-based) over a fixed page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Number of pages for `len` top-level rows
    pub fn page_count(&self, len: usize) -> usize {
        page_count(len, self.page_size)
    }

    /// Range of top-level positions shown on the current page
    pub fn window(&self, len: usize) -> Range<usize> {
        page_slice(len, self.current_page, self.page_size)
    }

    /// Move to `page`, clamped to the valid range for `len` rows
    pub fn set_page(&mut self, page: usize, len: usize) {
        let last = self.page_count(len).max(1);
        self.current_page = page.clamp(1, last);
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.current_page < self.page_count(len)
    }

    /// "Showing X to Y of Z entries"
    pub fn range_label(&self, len: usize) -> String {
        let window = self.window(len);
        if window.is_empty() {
            return format!("Showing 0 of {} entries", len);
        }
        format!(
            "Showing {} to {} of {} entries",
            window.start + 1,
            window.end,
            len
        )
    }

    /// Page numbers for the footer, at most `PAGE_BUTTONS`, sliding so the
    /// current page stays visible.
    pub fn page_numbers(&self, len: usize) -> Vec<usize> {
        let total = self.page_count(len);
        if total == 0 {
            return Vec::new();
        }
        let shown = total.min(PAGE_BUTTONS);
        let half = shown / 2;
        let start = self
            .current_page
            .saturating_sub(half)
            .clamp(1, total + 1 - shown);
        (start..start + shown).collect()
    }
}

/// ceil(len / page_size)
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// `[(page-1)*size, page*size)` clipped to `len`
pub fn page_slice(len: usize, page: usize, page_size: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(35, 10), 4);
    }

    #[test]
    fn test_page_slice_clips() {
        assert_eq!(page_slice(25, 1, 10), 0..10);
        assert_eq!(page_slice(25, 3, 10), 20..25);
        assert_eq!(page_slice(25, 4, 10), 25..25);
        assert_eq!(page_slice(0, 1, 10), 0..0);
    }

    #[test]
    fn test_pages_cover_all_rows_exactly_once() {
        for n in 0..=35 {
            let pagination = Pagination::default();
            let mut seen = Vec::new();
            for page in 1..=pagination.page_count(n) {
                seen.extend(page_slice(n, page, PAGE_SIZE));
            }
            assert_eq!(seen, (0..n).collect::<Vec<_>>(), "n = {}", n);
        }
    }

    #[test]
    fn test_set_page_clamps() {
        let mut pagination = Pagination::default();
        pagination.set_page(7, 25);
        assert_eq!(pagination.current_page, 3);
        pagination.set_page(0, 25);
        assert_eq!(pagination.current_page, 1);
        pagination.set_page(4, 0);
        assert_eq!(pagination.current_page, 1);
    }

    #[test]
    fn test_range_label() {
        let mut pagination = Pagination::default();
        assert_eq!(pagination.range_label(23), "Showing 1 to 10 of 23 entries");
        pagination.set_page(3, 23);
        assert_eq!(pagination.range_label(23), "Showing 21 to 23 of 23 entries");
        assert_eq!(Pagination::default().range_label(0), "Showing 0 of 0 entries");
    }

    #[test]
    fn test_page_numbers_slide() {
        let mut pagination = Pagination::default();
        assert_eq!(pagination.page_numbers(30), vec![1, 2, 3]);
        assert_eq!(pagination.page_numbers(90), vec![1, 2, 3, 4, 5]);
        pagination.set_page(6, 90);
        assert_eq!(pagination.page_numbers(90), vec![4, 5, 6, 7, 8]);
        pagination.set_page(9, 90);
        assert_eq!(pagination.page_numbers(90), vec![5, 6, 7, 8, 9]);
        assert!(pagination.page_numbers(0).is_empty());
    }

    #[test]
    fn test_previous_next() {
        let mut pagination = Pagination::default();
        assert!(!pagination.has_previous());
        assert!(pagination.has_next(11));
        pagination.set_page(2, 11);
        assert!(pagination.has_previous());
        assert!(!pagination.has_next(11));
    }
}
