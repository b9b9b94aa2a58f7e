//! Pagination of the catalog listing.

use serde::{Deserialize, Serialize};

/// Page size chosen from the width of the display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageSize {
    /// Items per page on narrow displays.
    pub compact: usize,
    /// Items per page on wide displays.
    pub wide: usize,
    /// Width at which the wide size applies.
    pub wide_threshold: usize,
}

impl Default for PageSize {
    fn default() -> Self {
        Self {
            compact: 12,
            wide: 32,
            wide_threshold: 768,
        }
    }
}

impl PageSize {
    pub fn for_width(&self, width: usize) -> usize {
        if width < self.wide_threshold {
            self.compact
        } else {
            self.wide
        }
    }
}

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: usize,
    /// Items per page.
    pub per_page: usize,
    /// Total number of items.
    pub total: usize,
    /// Total number of pages (0 when there are no items).
    pub total_pages: usize,
}

impl Pagination {
    /// Create pagination info. `page` and `per_page` are clamped to at least 1.
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let per_page = per_page.max(1);
        Self {
            page: page.max(1),
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }

    /// Every page number, for the page selector.
    pub fn page_numbers(&self) -> Vec<usize> {
        (1..=self.total_pages).collect()
    }

    /// The current page's slice of `items`; empty past the last page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = (start + self.per_page).min(items.len());
        &items[start..end]
    }

    /// Start item number (1-indexed), 0 when empty.
    pub fn start_item(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    /// End item number.
    pub fn end_item(&self) -> usize {
        (self.page * self.per_page).min(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_for_width() {
        let sizes = PageSize::default();
        assert_eq!(sizes.for_width(375), 12);
        assert_eq!(sizes.for_width(768), 32);
        assert_eq!(sizes.for_width(1440), 32);
    }

    #[test]
    fn test_pagination_basics() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.total_pages, 5);
        assert!(p.has_next());
        assert!(p.has_prev());
        assert_eq!(p.offset(), 10);
        assert_eq!(p.page_numbers(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_slice() {
        let items: Vec<u32> = (1..=45).collect();
        assert_eq!(Pagination::new(5, 10, 45).slice(&items), &[41, 42, 43, 44, 45]);
        assert!(Pagination::new(9, 10, 45).slice(&items).is_empty());
    }

    #[test]
    fn test_empty() {
        let p = Pagination::new(1, 12, 0);
        assert_eq!(p.total_pages, 0);
        assert!(p.page_numbers().is_empty());
        assert_eq!(p.start_item(), 0);
        assert_eq!(p.end_item(), 0);
    }

    #[test]
    fn test_item_range() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.start_item(), 11);
        assert_eq!(p.end_item(), 20);
    }
}
