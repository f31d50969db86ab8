//! Page-number pagination math shared by every listing.
//!
//! Listings are addressed by a 1-based page number and a fixed per-resource
//! page size. Counting always happens against the filtered set, so the
//! caller passes the filtered total into [`PageMeta::new`].

use serde::Serialize;

/// Contact messages per page in the admin inbox.
pub const MESSAGES_PAGE_SIZE: i64 = 10;

/// Projects per page in the admin listing.
pub const ADMIN_PROJECTS_PAGE_SIZE: i64 = 12;

/// Projects per page in the public listing.
pub const PUBLIC_PROJECTS_PAGE_SIZE: i64 = 10;

/// Articles per page in the public news body (the lead article is extra).
pub const PUBLIC_NEWS_PAGE_SIZE: i64 = 9;

/// Clamp a user-supplied page number to `>= 1`. Missing means page 1.
pub fn normalize_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// `ceil(total_items / page_size)`; zero items means zero pages.
pub fn total_pages(total_items: i64, page_size: i64) -> i64 {
    if total_items <= 0 || page_size <= 0 {
        return 0;
    }
    (total_items + page_size - 1) / page_size
}

/// The rows a single page covers: skip `offset`, take `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    /// Window for a plain listing: skip `(page - 1) * page_size`.
    pub fn new(page: Option<i64>, page_size: i64) -> Self {
        let page = normalize_page(page);
        Self {
            page,
            limit: page_size,
            offset: (page - 1).saturating_mul(page_size),
        }
    }

    /// Window for a listing whose newest row is shown separately as the lead
    /// item: the body starts one row later than a plain listing.
    pub fn after_lead(page: Option<i64>, page_size: i64) -> Self {
        let plain = Self::new(page, page_size);
        Self {
            offset: plain.offset.saturating_add(1),
            ..plain
        }
    }
}

/// Pagination metadata returned alongside every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub page_size: i64,
}

impl PageMeta {
    pub fn new(window: &PageWindow, total_items: i64) -> Self {
        Self {
            current_page: window.page,
            total_pages: total_pages(total_items, window.limit),
            total_items,
            page_size: window.limit,
        }
    }

    /// Metadata for a lead-item listing: the lead row is excluded from the
    /// page count (`total_items - 1`) but still reported in `total_items`.
    pub fn after_lead(window: &PageWindow, total_items: i64) -> Self {
        Self {
            current_page: window.page,
            total_pages: total_pages((total_items - 1).max(0), window.limit),
            total_items,
            page_size: window.limit,
        }
    }
}

/// A page of rows plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub pagination: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_page_clamps_to_one() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some(0)), 1);
        assert_eq!(normalize_page(Some(-4)), 1);
        assert_eq!(normalize_page(Some(7)), 7);
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 12), 3);
    }

    #[test]
    fn total_pages_matches_float_ceiling_for_a_range() {
        for size in 1..=13_i64 {
            for total in 0..=100_i64 {
                let expected = (total as f64 / size as f64).ceil() as i64;
                assert_eq!(total_pages(total, size), expected, "{total}/{size}");
            }
        }
    }

    #[test]
    fn window_offsets_follow_page_number() {
        assert_eq!(PageWindow::new(Some(1), 10).offset, 0);
        assert_eq!(PageWindow::new(Some(3), 10).offset, 20);
        assert_eq!(PageWindow::new(Some(-1), 12).offset, 0);
        assert_eq!(PageWindow::new(Some(2), 12).limit, 12);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        let window = PageWindow::new(Some(i64::MAX), 10);
        assert_eq!(window.offset, i64::MAX);
        let lead = PageWindow::after_lead(Some(i64::MAX), 10);
        assert_eq!(lead.offset, i64::MAX);
    }

    #[test]
    fn lead_window_skips_one_extra_row() {
        assert_eq!(PageWindow::after_lead(None, 9).offset, 1);
        assert_eq!(PageWindow::after_lead(Some(2), 9).offset, 10);
    }

    #[test]
    fn lead_meta_discounts_the_lead_item() {
        let window = PageWindow::after_lead(Some(1), 9);
        // 10 articles: 1 lead + 9 body rows = exactly one body page.
        let meta = PageMeta::after_lead(&window, 10);
        assert_eq!(meta.total_pages, 1);
        assert_eq!(meta.total_items, 10);

        // 11 articles: 1 lead + 10 body rows = two body pages.
        assert_eq!(PageMeta::after_lead(&window, 11).total_pages, 2);

        // Only the lead article: no body pages at all.
        assert_eq!(PageMeta::after_lead(&window, 1).total_pages, 0);
        assert_eq!(PageMeta::after_lead(&window, 0).total_pages, 0);
    }

    #[test]
    fn page_past_the_end_keeps_the_requested_number() {
        let window = PageWindow::new(Some(4), 10);
        let meta = PageMeta::new(&window, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.current_page > meta.total_pages);
    }
}
