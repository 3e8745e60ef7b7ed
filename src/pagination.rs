/// Where page slicing happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PaginationMode {
    /// Full result set is fetched and sliced locally.
    #[default]
    Client,
    /// Requests carry `page`/`per_page`; responses are already the slice.
    Server,
}

/// `ceil(total / page_size)`. Zero results means zero pages.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// The `[(page-1)*size, page*size)` window of a full result set.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

const MAX_VISIBLE: usize = 9;

/// Page buttons to show, with `None` standing for an ellipsis.
pub fn page_window(current: usize, total_pages: usize) -> Vec<Option<usize>> {
    let mut pages: Vec<Option<usize>> = Vec::new();
    let mut push = |page: Option<usize>| {
        if page.is_none() || !pages.contains(&page) {
            pages.push(page);
        }
    };

    if total_pages <= MAX_VISIBLE {
        (1..=total_pages).for_each(|p| push(Some(p)));
    } else if current <= 6 {
        (1..=MAX_VISIBLE).for_each(|p| push(Some(p)));
        if total_pages > MAX_VISIBLE + 2 {
            push(None);
        }
        push(Some(total_pages - 1));
        push(Some(total_pages));
    } else if current + 5 >= total_pages {
        push(Some(1));
        push(Some(2));
        if total_pages > MAX_VISIBLE + 2 {
            push(None);
        }
        ((total_pages - (MAX_VISIBLE - 2))..=total_pages).for_each(|p| push(Some(p)));
    } else {
        push(Some(1));
        push(Some(2));
        push(None);
        ((current - 2)..=(current + 2)).for_each(|p| push(Some(p)));
        push(None);
        push(Some(total_pages - 1));
        push(Some(total_pages));
    }

    pages
}

/// Whether page controls should be drawn at all.
pub fn shows_controls(total_pages: usize) -> bool {
    total_pages > 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(23, 5), 5);
        assert_eq!(total_pages(25, 5), 5);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn test_no_controls_without_results() {
        assert!(!shows_controls(total_pages(0, 5)));
        assert!(page_window(1, 0).is_empty());
        assert!(!shows_controls(1));
        assert!(shows_controls(2));
    }

    #[test]
    fn test_page_slice_first_page() {
        let items: Vec<u32> = (0..42).collect();
        assert_eq!(page_slice(&items, 1, 5), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_page_slice_last_partial_page() {
        let items: Vec<u32> = (0..23).collect();
        assert_eq!(page_slice(&items, 5, 5), &[20, 21, 22]);
    }

    #[test]
    fn test_page_slice_out_of_range() {
        let items: Vec<u32> = (0..3).collect();
        assert!(page_slice(&items, 4, 5).is_empty());
        assert_eq!(page_slice(&items, 0, 5), &[0, 1, 2]);
    }

    #[test]
    fn test_page_window_small_total() {
        let pages = page_window(2, 4);
        assert_eq!(pages, vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn test_page_window_near_start() {
        let pages = page_window(3, 20);
        let mut expected: Vec<_> = (1..=9).map(Some).collect();
        expected.extend([None, Some(19), Some(20)]);
        assert_eq!(pages, expected);
    }

    #[test]
    fn test_page_window_middle() {
        let pages = page_window(10, 20);
        assert_eq!(
            pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(19),
                Some(20)
            ]
        );
    }

    #[test]
    fn test_page_window_near_end() {
        let pages = page_window(18, 20);
        let mut expected = vec![Some(1), Some(2), None];
        expected.extend((13..=20).map(Some));
        assert_eq!(pages, expected);
    }

    #[test]
    fn test_page_window_never_repeats_pages() {
        let pages = page_window(1, 10);
        let mut expected: Vec<_> = (1..=10).map(Some).collect();
        expected.dedup();
        assert_eq!(pages, expected);
    }
}
