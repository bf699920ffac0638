//! Page links for list views.
//!
//! The backend returns whole collections, so lists are sliced here after
//! filtering.

use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Page numbers to link, `None` standing for an ellipsis.
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

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    /// Cuts page `page` (1-based, clamped) out of the full list.
    pub fn from_items(all: Vec<T>, page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total = all.len();
        let total_pages = total.div_ceil(per_page);
        let page = page.clamp(1, total_pages.max(1));

        let items = all
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Self {
            items,
            pages: get_pages(total_pages, page, 2, 2, 4, 2),
            page,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_requested_page() {
        let page = Paginated::from_items((1..=45).collect::<Vec<_>>(), 3, 20);
        assert_eq!(page.items, (41..=45).collect::<Vec<_>>());
        assert_eq!(page.page, 3);
        assert_eq!(page.total, 45);
        assert_eq!(page.pages, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn clamps_out_of_range_pages() {
        let page = Paginated::from_items(vec![1, 2, 3], 9, 20);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 3);

        let empty = Paginated::<u8>::from_items(Vec::new(), 0, 20);
        assert_eq!(empty.page, 1);
        assert!(empty.pages.is_empty());
    }

    #[test]
    fn long_ranges_get_ellipses() {
        assert_eq!(
            get_pages(20, 10, 2, 2, 4, 2),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20)
            ]
        );
    }
}
