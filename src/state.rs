//! View-state types for the data table.
//!
//! Contains the input focus, and the ephemeral search/filter/page state a
//! table instance owns for as long as it lives.

use ratatui::widgets::TableState;

use crate::filter::ActiveFilters;

/// Which part of the table receives key input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Table,         // Row navigation and paging
    Search,        // '/' pressed, typing a search query
    Filter(usize), // Filter dropdown at this index has focus
}

/// Search, filter and paging state of one table instance.
///
/// Any change to the search query or to a filter selection moves back to
/// page 1. Nothing here is ever persisted.
#[derive(Debug, Clone)]
pub struct TableViewState {
    search_query: String,
    active_filters: ActiveFilters,
    current_page: usize,
    /// Row selection within the current page
    pub table_state: TableState,
}

impl Default for TableViewState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            active_filters: ActiveFilters::new(),
            current_page: 1,
            table_state: TableState::default().with_selected(Some(0)),
        }
    }
}

impl TableViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn active_filters(&self) -> &ActiveFilters {
        &self.active_filters
    }

    /// 1-based page number.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Replace the search query. Returns true (and resets to page 1) when it
    /// actually changed.
    pub fn set_search_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if query == self.search_query {
            return false;
        }
        self.search_query = query;
        self.reset_page();
        true
    }

    /// Set or clear one filter selection. Returns true (and resets to page
    /// 1) when the selection changed.
    pub fn set_filter(&mut self, name: &str, selection: Option<String>) -> bool {
        let changed = self.active_filters.set(name, selection);
        if changed {
            self.reset_page();
        }
        changed
    }

    /// Clear every filter selection.
    pub fn clear_filters(&mut self) -> bool {
        let changed = self.active_filters.clear();
        if changed {
            self.reset_page();
        }
        changed
    }

    /// Move to `page` if it lies within `1..=total_pages`. Out-of-range
    /// requests are ignored. Returns true when the page changed.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page < 1 || page > total_pages || page == self.current_page {
            return false;
        }
        self.current_page = page;
        self.table_state.select(Some(0));
        *self.table_state.offset_mut() = 0;
        true
    }

    /// Pull the page back into range after the row set shrank.
    pub fn clamp_page(&mut self, total_pages: usize) {
        let clamped = self.current_page.clamp(1, total_pages.max(1));
        if clamped != self.current_page {
            self.current_page = clamped;
            self.table_state.select(Some(0));
            *self.table_state.offset_mut() = 0;
        }
    }

    /// Keep the row selection inside a page of `rows_on_page` rows.
    pub fn clamp_selection(&mut self, rows_on_page: usize) {
        let selected = match (self.table_state.selected(), rows_on_page) {
            (_, 0) => None,
            (Some(i), n) => Some(i.min(n - 1)),
            (None, _) => Some(0),
        };
        self.table_state.select(selected);
    }

    fn reset_page(&mut self) {
        self.current_page = 1;
        self.table_state.select(Some(0));
        *self.table_state.offset_mut() = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = TableViewState::new();
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.search_query(), "");
        assert!(state.active_filters().is_empty());
        assert_eq!(state.table_state.selected(), Some(0));
    }

    #[test]
    fn test_search_change_resets_page() {
        let mut state = TableViewState::new();
        assert!(state.go_to_page(3, 5));
        assert!(state.set_search_query("lake"));
        assert_eq!(state.current_page(), 1);

        // Same query again is not a change
        state.go_to_page(2, 5);
        assert!(!state.set_search_query("lake"));
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut state = TableViewState::new();
        state.go_to_page(4, 5);
        assert!(state.set_filter("status", Some("Active".to_string())));
        assert_eq!(state.current_page(), 1);

        state.go_to_page(2, 5);
        assert!(state.set_filter("status", None));
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_out_of_range_page_is_ignored() {
        let mut state = TableViewState::new();
        assert!(!state.go_to_page(0, 3));
        assert!(!state.go_to_page(4, 3));
        assert_eq!(state.current_page(), 1);
        assert!(state.go_to_page(3, 3));
        assert_eq!(state.current_page(), 3);
    }

    #[test]
    fn test_clamp_page() {
        let mut state = TableViewState::new();
        state.go_to_page(5, 5);
        state.clamp_page(2);
        assert_eq!(state.current_page(), 2);
        state.clamp_page(0);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_clamp_selection() {
        let mut state = TableViewState::new();
        state.table_state.select(Some(8));
        state.clamp_selection(3);
        assert_eq!(state.table_state.selected(), Some(2));
        state.clamp_selection(0);
        assert_eq!(state.table_state.selected(), None);
        state.clamp_selection(4);
        assert_eq!(state.table_state.selected(), Some(0));
    }
}
