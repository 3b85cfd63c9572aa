//! The data table component.
//!
//! [`DataTable`] owns a row set, its column/filter configuration and the
//! ephemeral view-state (search query, filter selections, page). It filters
//! and paginates in memory and forwards row/add clicks to caller-supplied
//! callbacks; it never fetches or mutates data itself.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::{Position, Rect};
use ratatui::Frame;
use tracing::debug;

use crate::empty_state::{EmptyReason, DEFAULT_EMPTY_MESSAGE, NO_RESULTS_MESSAGE};
use crate::filter::Filter;
use crate::filter_dropdown::{DropdownEvent, FilterDropdownState};
use crate::handlers::{self, KeyAction};
use crate::pagination::{self, Pagination, DEFAULT_MAX_VISIBLE_PAGES};
use crate::query::{self, Query};
use crate::render::{self, TableLayout};
use crate::row::{CellValue, Column, Row};
use crate::search_box::SearchBox;
use crate::state::{Focus, TableViewState};

/// Rows per page unless configured otherwise.
pub const DEFAULT_MAX_ROWS: usize = 10;
/// Label of the add affordance unless configured otherwise.
pub const DEFAULT_ADD_LABEL: &str = "Add";

/// Static configuration of a table: what to show and how to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub title: Option<String>,
    pub headers: Vec<Column>,
    pub searchable: bool,
    /// Row keys checked by search (None = every header's key)
    pub searchable_fields: Option<Vec<String>>,
    pub filters: Vec<Filter>,
    /// Page size; values below 1 behave as 1
    pub max_rows: usize,
    pub display_header: bool,
    /// Placeholder rows while loading (None = `max_rows`)
    pub skeleton_rows: Option<usize>,
    pub max_visible_pages: usize,
    pub empty_message: String,
    pub no_results_message: String,
    pub add_label: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            title: None,
            headers: Vec::new(),
            searchable: true,
            searchable_fields: None,
            filters: Vec::new(),
            max_rows: DEFAULT_MAX_ROWS,
            display_header: true,
            skeleton_rows: None,
            max_visible_pages: DEFAULT_MAX_VISIBLE_PAGES,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            no_results_message: NO_RESULTS_MESSAGE.to_string(),
            add_label: DEFAULT_ADD_LABEL.to_string(),
        }
    }
}

impl TableConfig {
    pub fn new(headers: Vec<Column>) -> Self {
        Self {
            headers,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    #[must_use]
    pub fn searchable_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    #[must_use]
    pub fn display_header(mut self, display: bool) -> Self {
        self.display_header = display;
        self
    }

    #[must_use]
    pub fn skeleton_rows(mut self, rows: usize) -> Self {
        self.skeleton_rows = Some(rows);
        self
    }

    #[must_use]
    pub fn max_visible_pages(mut self, n: usize) -> Self {
        self.max_visible_pages = n.max(1);
        self
    }

    #[must_use]
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    #[must_use]
    pub fn no_results_message(mut self, message: impl Into<String>) -> Self {
        self.no_results_message = message.into();
        self
    }

    #[must_use]
    pub fn add_label(mut self, label: impl Into<String>) -> Self {
        self.add_label = label.into();
        self
    }

    /// Effective page size (at least 1).
    pub fn page_size(&self) -> usize {
        self.max_rows.max(1)
    }

    /// Effective searchable fields.
    pub fn search_fields(&self) -> Cow<'_, [String]> {
        match &self.searchable_fields {
            Some(fields) => Cow::Borrowed(fields.as_slice()),
            None => Cow::Owned(self.headers.iter().map(|c| c.value.clone()).collect()),
        }
    }
}

/// Called with the clicked row and its index in the table's row set.
pub type RowClickHandler<'a> = Box<dyn FnMut(&Row, usize) + 'a>;
/// Called when the add affordance is activated.
pub type AddClickHandler<'a> = Box<dyn FnMut() + 'a>;
/// Renders a whole row as one full-width cell.
pub type RowRenderer<'a> = Box<dyn Fn(&Row) -> CellValue + 'a>;

/// What the table body shows, following the loading/empty/rows precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView<'t> {
    /// Placeholder grid of `columns` x `rows`.
    Loading { columns: usize, rows: usize },
    /// Nothing to list.
    Empty(EmptyReason),
    /// Indices (into the row set) of the current page, plus the pager.
    Rows {
        indices: &'t [usize],
        pager: Pagination,
    },
}

/// A searchable, filterable, paginated table.
pub struct DataTable<'a> {
    config: TableConfig,
    rows: Vec<Row>,
    loading: bool,
    state: TableViewState,
    search_box: SearchBox,
    dropdowns: Vec<FilterDropdownState>,
    focus: Focus,
    /// Indices of rows passing search and filters, in row order
    filtered: Vec<usize>,
    on_row_click: Option<RowClickHandler<'a>>,
    on_add_button_click: Option<AddClickHandler<'a>>,
    render_row: Option<RowRenderer<'a>>,
    layout: TableLayout,
    phase: usize,
}

impl<'a> DataTable<'a> {
    pub fn new(config: TableConfig, rows: Vec<Row>) -> Self {
        let dropdowns = vec![FilterDropdownState::new(); config.filters.len()];
        let mut table = Self {
            config,
            rows,
            loading: false,
            state: TableViewState::new(),
            search_box: SearchBox::new(),
            dropdowns,
            focus: Focus::Table,
            filtered: Vec::new(),
            on_row_click: None,
            on_add_button_click: None,
            render_row: None,
            layout: TableLayout::default(),
            phase: 0,
        };
        table.refilter();
        table
    }

    #[must_use]
    pub fn on_row_click(mut self, handler: impl FnMut(&Row, usize) + 'a) -> Self {
        self.on_row_click = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_add_button_click(mut self, handler: impl FnMut() + 'a) -> Self {
        self.on_add_button_click = Some(Box::new(handler));
        self
    }

    /// Replace per-column cells with one full-width cell per row.
    #[must_use]
    pub fn render_row(mut self, renderer: impl Fn(&Row) -> CellValue + 'a) -> Self {
        self.render_row = Some(Box::new(renderer));
        self
    }

    /// Start in the loading state.
    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn state(&self) -> &TableViewState {
        &self.state
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn search_box(&self) -> &SearchBox {
        &self.search_box
    }

    pub fn has_add_handler(&self) -> bool {
        self.on_add_button_click.is_some()
    }

    pub(crate) fn row_renderer(&self) -> Option<&RowRenderer<'a>> {
        self.render_row.as_ref()
    }

    /// Screen areas from the last [`DataTable::render`].
    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Replace the row set (e.g. after a refetch). View-state is kept; the
    /// page is pulled back into range if the set shrank.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        debug!(rows = rows.len(), "row set replaced");
        self.rows = rows;
        self.refilter();
    }

    pub fn set_headers(&mut self, headers: Vec<Column>) {
        self.config.headers = headers;
        self.refilter();
    }

    /// Replace the filter descriptors. Selections for filters that no longer
    /// exist are dropped.
    pub fn set_filters(&mut self, filters: Vec<Filter>) {
        let stale: Vec<String> = self
            .state
            .active_filters()
            .iter()
            .filter(|(name, _)| !filters.iter().any(|f| f.name == *name))
            .map(|(name, _)| name.to_string())
            .collect();
        for name in stale {
            self.state.set_filter(&name, None);
        }
        self.dropdowns = vec![FilterDropdownState::new(); filters.len()];
        self.config.filters = filters;
        if matches!(self.focus, Focus::Filter(i) if i >= self.config.filters.len()) {
            self.focus = Focus::Table;
        }
        self.refilter();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        if loading != self.loading {
            debug!(loading, "loading state changed");
        }
        self.loading = loading;
        if loading {
            self.close_dropdowns();
        }
    }

    /// Advance the skeleton shimmer.
    pub fn tick(&mut self) {
        self.phase = self.phase.wrapping_add(1);
    }

    pub(crate) fn phase(&self) -> usize {
        self.phase
    }

    pub fn search_query(&self) -> &str {
        self.state.search_query()
    }

    /// Set the search query. Returns true (and moves to page 1) on change.
    pub fn set_search_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if self.search_box.value() != query {
            self.search_box.set_value(query.clone());
        }
        if !self.state.set_search_query(query) {
            return false;
        }
        self.refilter();
        debug!(
            query = self.state.search_query(),
            matches = self.filtered.len(),
            "search changed"
        );
        true
    }

    /// Set or clear (`None`) the selection of filter `name`. Returns true
    /// (and moves to page 1) on change.
    pub fn set_filter(&mut self, name: &str, selection: Option<String>) -> bool {
        if !self.state.set_filter(name, selection) {
            return false;
        }
        self.refilter();
        debug!(
            filter = name,
            selection = self.state.active_filters().get(name).unwrap_or(""),
            matches = self.filtered.len(),
            "filter changed"
        );
        true
    }

    /// Clear the search query and every filter selection.
    pub fn clear_search_and_filters(&mut self) -> bool {
        let searched = self.set_search_query(String::new());
        let filtered = self.state.clear_filters();
        if filtered {
            self.refilter();
        }
        searched || filtered
    }

    /// Indices of rows passing search and filters.
    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered
    }

    /// Rows passing search and filters, in row order.
    pub fn filtered_rows(&self) -> impl Iterator<Item = &Row> {
        self.filtered.iter().map(|&i| &self.rows[i])
    }

    pub fn total_pages(&self) -> usize {
        pagination::page_count(self.filtered.len(), self.config.page_size())
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page()
    }

    /// Move to `page`. Requests outside `1..=total_pages` are ignored.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let moved = self.state.go_to_page(page, self.total_pages());
        if moved {
            debug!(page, "page changed");
        }
        moved
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page() + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.current_page().checked_sub(1) {
            Some(page) => self.go_to_page(page),
            None => false,
        }
    }

    /// Position range of the current page within the filtered rows.
    pub fn page_range(&self) -> Range<usize> {
        pagination::page_bounds(
            self.current_page(),
            self.config.page_size(),
            self.filtered.len(),
        )
    }

    /// Row-set indices shown on the current page.
    pub fn page_indices(&self) -> &[usize] {
        &self.filtered[self.page_range()]
    }

    /// The pager for the current page and page count.
    pub fn pager(&self) -> Pagination {
        Pagination::new(self.current_page(), self.total_pages())
            .max_visible_pages(self.config.max_visible_pages)
            .disabled(self.loading)
    }

    /// Why the body is empty, if it is (ignores the loading state).
    pub fn empty_reason(&self) -> Option<EmptyReason> {
        if !self.filtered.is_empty() {
            None
        } else if self.rows.is_empty() {
            Some(EmptyReason::NoData)
        } else {
            Some(EmptyReason::NoResults)
        }
    }

    pub fn empty_message(&self, reason: EmptyReason) -> &str {
        match reason {
            EmptyReason::NoData => &self.config.empty_message,
            EmptyReason::NoResults => &self.config.no_results_message,
        }
    }

    /// What the body shows right now.
    pub fn view(&self) -> TableView<'_> {
        if self.loading {
            return TableView::Loading {
                columns: self.config.headers.len(),
                rows: self
                    .config
                    .skeleton_rows
                    .unwrap_or_else(|| self.config.page_size()),
            };
        }
        match self.empty_reason() {
            Some(reason) => TableView::Empty(reason),
            None => TableView::Rows {
                indices: self.page_indices(),
                pager: self.pager(),
            },
        }
    }

    /// Row-set index of the selected row on the current page.
    pub fn selected_index(&self) -> Option<usize> {
        let pos = self.state.table_state.selected()?;
        self.page_indices().get(pos).copied()
    }

    pub fn select_next(&mut self) {
        let n = self.page_indices().len();
        if n == 0 {
            return;
        }
        let next = self
            .state
            .table_state
            .selected()
            .map_or(0, |i| (i + 1).min(n - 1));
        self.state.table_state.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        if self.page_indices().is_empty() {
            return;
        }
        let prev = self
            .state
            .table_state
            .selected()
            .map_or(0, |i| i.saturating_sub(1));
        self.state.table_state.select(Some(prev));
    }

    /// Click the row at `page_pos` on the current page: selects it and
    /// invokes the row-click callback. Returns the row-set index.
    pub fn activate_row(&mut self, page_pos: usize) -> Option<usize> {
        let index = *self.page_indices().get(page_pos)?;
        self.state.table_state.select(Some(page_pos));
        debug!(index, "row clicked");
        if let Some(handler) = self.on_row_click.as_mut() {
            handler(&self.rows[index], index);
        }
        Some(index)
    }

    /// Click the selected row.
    pub fn activate_selected(&mut self) -> Option<usize> {
        let pos = self.state.table_state.selected()?;
        self.activate_row(pos)
    }

    /// Invoke the add callback. Returns false when none is set.
    pub fn click_add(&mut self) -> bool {
        match self.on_add_button_click.as_mut() {
            Some(handler) => {
                debug!("add clicked");
                handler();
                true
            }
            None => false,
        }
    }

    /// Move input focus. Focus targets that do not exist are ignored.
    pub fn set_focus(&mut self, focus: Focus) {
        let valid = match focus {
            Focus::Table => true,
            Focus::Search => self.config.searchable,
            Focus::Filter(i) => i < self.config.filters.len(),
        };
        if !valid {
            return;
        }
        for (i, dropdown) in self.dropdowns.iter_mut().enumerate() {
            if focus != Focus::Filter(i) {
                dropdown.close();
            }
        }
        self.focus = focus;
    }

    /// Cycle focus through search, filters and rows.
    pub fn focus_next(&mut self, forward: bool) -> Focus {
        let mut order = Vec::with_capacity(self.config.filters.len() + 2);
        if self.config.searchable {
            order.push(Focus::Search);
        }
        order.extend((0..self.config.filters.len()).map(Focus::Filter));
        order.push(Focus::Table);

        let at = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            order[(at + 1) % order.len()]
        } else {
            order[(at + order.len() - 1) % order.len()]
        };
        self.set_focus(next);
        self.focus
    }

    pub fn dropdown(&self, index: usize) -> Option<&FilterDropdownState> {
        self.dropdowns.get(index)
    }

    /// Index of the open dropdown, if any.
    pub fn open_dropdown(&self) -> Option<usize> {
        self.dropdowns.iter().position(FilterDropdownState::is_open)
    }

    pub fn toggle_dropdown(&mut self, index: usize) {
        let (Some(filter), Some(dropdown)) =
            (self.config.filters.get(index), self.dropdowns.get_mut(index))
        else {
            return;
        };
        dropdown.toggle(filter, self.state.active_filters().get(&filter.name));
    }

    pub fn close_dropdowns(&mut self) {
        self.dropdowns.iter_mut().for_each(FilterDropdownState::close);
    }

    pub(crate) fn dropdown_key(&mut self, index: usize, key: &KeyEvent) -> DropdownEvent {
        match (self.config.filters.get(index), self.dropdowns.get_mut(index)) {
            (Some(filter), Some(dropdown)) => dropdown.handle_key(key, filter),
            _ => DropdownEvent::None,
        }
    }

    pub(crate) fn dropdown_click(
        &mut self,
        index: usize,
        pos: Position,
        panel: Rect,
    ) -> DropdownEvent {
        match (self.config.filters.get(index), self.dropdowns.get_mut(index)) {
            (Some(filter), Some(dropdown)) => dropdown.handle_click(pos, panel, filter),
            _ => DropdownEvent::None,
        }
    }

    pub(crate) fn search_box_mut(&mut self) -> &mut SearchBox {
        &mut self.search_box
    }

    /// Handle a key press. See [`handlers::handle_key`].
    pub fn handle_key(&mut self, key: &KeyEvent) -> KeyAction {
        handlers::handle_key(self, key)
    }

    /// Handle a mouse event against the last rendered layout.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent) -> KeyAction {
        handlers::handle_mouse(self, mouse)
    }

    /// Draw the table into `area` and remember where everything landed.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut table_state = self.state.table_state.clone();
        let layout = render::render_data_table(frame, area, self, &mut table_state);
        self.state.table_state = table_state;
        self.layout = layout;
    }

    fn refilter(&mut self) {
        let fields = self.config.search_fields();
        let query = Query {
            search: self.state.search_query(),
            searchable: self.config.searchable,
            searchable_fields: &fields,
            filters: &self.config.filters,
            active: self.state.active_filters(),
        };
        self.filtered = query::filter_rows(&self.rows, &query);

        let total = self.total_pages();
        self.state.clamp_page(total);
        let on_page = self.page_indices().len();
        self.state.clamp_selection(on_page);
    }
}

impl fmt::Debug for DataTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("config", &self.config)
            .field("rows_count", &self.rows.len())
            .field("filtered_count", &self.filtered.len())
            .field("loading", &self.loading)
            .field("state", &self.state)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}
