//! Fixed-size page windows over list queries.
//!
//! Page numbers are 1-indexed. Requests outside the valid range clamp to
//! the nearest real page instead of erroring, and an empty result set still
//! has one (empty) page, so a stale page link never 404s.

use serde::Serialize;

pub const PAGE_SIZE: i64 = 10;

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

pub fn total_pages(total_items: i64, page_size: i64) -> i64 {
    if total_items <= 0 {
        1
    } else {
        (total_items + page_size - 1) / page_size
    }
}

pub fn clamp_page(requested: Option<i64>, total_pages: i64) -> i64 {
    match requested {
        Some(page) if page >= 1 => page.min(total_pages),
        _ => 1,
    }
}

pub fn offset_for(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_set_still_has_one_page() {
        assert_eq!(total_pages(0, PAGE_SIZE), 1);
        assert_eq!(clamp_page(Some(5), total_pages(0, PAGE_SIZE)), 1);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(total_pages(10, PAGE_SIZE), 1);
        assert_eq!(total_pages(11, PAGE_SIZE), 2);
        assert_eq!(total_pages(21, PAGE_SIZE), 3);
    }

    #[test]
    fn out_of_range_pages_clamp_to_the_edges() {
        assert_eq!(clamp_page(None, 3), 1);
        assert_eq!(clamp_page(Some(0), 3), 1);
        assert_eq!(clamp_page(Some(-2), 3), 1);
        assert_eq!(clamp_page(Some(99), 3), 3);
        assert_eq!(clamp_page(Some(2), 3), 2);
    }

    #[test]
    fn offsets_step_by_page_size() {
        assert_eq!(offset_for(1, PAGE_SIZE), 0);
        assert_eq!(offset_for(2, PAGE_SIZE), 10);
        assert_eq!(offset_for(4, PAGE_SIZE), 30);
    }
}
