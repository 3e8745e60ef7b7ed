use crate::models::SortOrder;
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_text: String,
    pub full_text_search: bool,
    pub sort: SortOrder,
    pub page: usize,
    pub page_size: usize,
}

impl QueryState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_text: String::new(),
            full_text_search: false,
            sort: SortOrder::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }
}

/// Everything the user can change on the listing screen.
///
/// Any change to the search text, the full-text toggle, the sort order or the
/// active filters sends the user back to page 1. Page moves are the only
/// mutation that keeps the other fields.
#[derive(Debug, Clone)]
pub struct ListingState {
    selection: Selection,
    query: QueryState,
}

impl ListingState {
    pub fn new(page_size: usize) -> Self {
        Self {
            selection: Selection::new(),
            query: QueryState::new(page_size),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn set_search_text(&mut self, text: &str) {
        if self.query.search_text != text {
            self.query.search_text = text.to_string();
            self.query.page = 1;
        }
    }

    pub fn set_full_text_search(&mut self, enabled: bool) {
        if self.query.full_text_search != enabled {
            self.query.full_text_search = enabled;
            self.query.page = 1;
        }
    }

    pub fn toggle_full_text_search(&mut self) {
        self.set_full_text_search(!self.query.full_text_search);
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        if self.query.sort != sort {
            self.query.sort = sort;
            self.query.page = 1;
        }
    }

    pub fn set_filter(&mut self, key: &str, active: bool) {
        if self.selection.set(key, active) {
            self.query.page = 1;
        }
    }

    pub fn toggle_filter(&mut self, key: &str) {
        self.selection.toggle(key);
        self.query.page = 1;
    }

    pub fn remove_filter(&mut self, key: &str) {
        self.set_filter(key, false);
    }

    /// Removes the chip at `index` (activation order) and returns its key.
    pub fn remove_filter_at(&mut self, index: usize) -> Option<String> {
        let key = self.selection.get(index)?.to_string();
        self.remove_filter(&key);
        Some(key)
    }

    pub fn clear_filters(&mut self) {
        if self.selection.clear() {
            self.query.page = 1;
        }
    }

    /// Moves to `page`, clamped to `1..=total_pages` (page 1 when there are
    /// no pages). Returns whether the page changed.
    pub fn set_page(&mut self, page: usize, total_pages: usize) -> bool {
        let page = page.clamp(1, total_pages.max(1));
        let changed = self.query.page != page;
        self.query.page = page;
        changed
    }
}
