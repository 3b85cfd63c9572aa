//! Drawing the data table.
//!
//! Contains column width calculation, status/title text builders, and the
//! function that lays out toolbar, body and footer and records where each
//! clickable part landed.

use std::ops::Range;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, Table, TableState},
};

use crate::empty_state::EmptyState;
use crate::filter_dropdown::{self, FilterButton, FilterPanel};
use crate::row::{Column, Row};
use crate::skeleton::LoadingSkeleton;
use crate::state::Focus;
use crate::table::{DataTable, TableView};

const HIGHLIGHT_SYMBOL: &str = ">> ";
const SORT_MARKER: &str = " ↕";

/// Screen areas from the last draw, used for mouse hit-testing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableLayout {
    /// Search input
    pub search: Option<Rect>,
    /// Filter buttons, by filter index
    pub filter_buttons: Vec<Rect>,
    /// Open filter panel and its filter index
    pub filter_panel: Option<(usize, Rect)>,
    /// Toolbar and empty-state add buttons
    pub add_buttons: Vec<Rect>,
    /// Visible data rows with their position on the page
    pub rows: Vec<(Rect, usize)>,
    /// Pager line
    pub pager: Option<Rect>,
}

/// Header label, with a marker on sortable columns.
pub(crate) fn header_label(column: &Column) -> String {
    if column.sortable {
        format!("{}{}", column.name, SORT_MARKER)
    } else {
        column.name.clone()
    }
}

/// Calculate auto-sized column widths (no overrides).
/// Each column fits its widest header or cell + 1 for padding.
pub(crate) fn calculate_auto_widths<'r>(
    columns: &[Column],
    rows: impl IntoIterator<Item = &'r Row>,
) -> Vec<u16> {
    let mut widths: Vec<usize> = columns
        .iter()
        .map(|c| Span::raw(header_label(c)).width())
        .collect();

    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            if let Some(cell) = row.cell(&column.value) {
                widths[i] = widths[i].max(cell.width());
            }
        }
    }

    widths
        .iter()
        .map(|w| (*w + 1).min(u16::MAX as usize) as u16)
        .collect()
}

/// Column constraints, using fixed widths where a column sets one.
pub(crate) fn calculate_widths<'r>(
    columns: &[Column],
    rows: impl IntoIterator<Item = &'r Row>,
) -> Vec<Constraint> {
    let auto_widths = calculate_auto_widths(columns, rows);

    columns
        .iter()
        .zip(auto_widths)
        .map(|(column, auto)| Constraint::Length(column.fixed_width().unwrap_or(auto)))
        .collect()
}

/// Footer summary, e.g. "Showing 11-20 of 45 (filtered from 80)".
pub fn build_status(page_range: Range<usize>, filtered: usize, total: usize) -> String {
    if filtered == 0 {
        return String::new();
    }
    let shown = format!(
        "Showing {}-{} of {}",
        page_range.start + 1,
        page_range.end,
        filtered
    );
    if filtered == total {
        shown
    } else {
        format!("{} (filtered from {})", shown, total)
    }
}

/// Title for the body block.
pub fn build_title(title: Option<&str>, filtered: usize, total: usize, loading: bool) -> String {
    let name = title.unwrap_or("Records");
    if loading {
        format!(" {} ", name)
    } else if filtered == total {
        format!(" {} ({}) ", name, total)
    } else {
        format!(" {} ({}/{}) ", name, filtered, total)
    }
}

/// Render the whole table into `area`.
pub(crate) fn render_data_table(
    frame: &mut Frame,
    area: Rect,
    table: &DataTable<'_>,
    table_state: &mut TableState,
) -> TableLayout {
    let mut layout = TableLayout::default();
    let config = table.config();
    let has_toolbar = config.searchable || !config.filters.is_empty() || table.has_add_handler();

    let [toolbar_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(if has_toolbar { 3 } else { 0 }),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    if has_toolbar {
        render_toolbar(frame, toolbar_area, table, &mut layout);
    }

    let title = build_title(
        config.title.as_deref(),
        table.filtered_indices().len(),
        table.rows().len(),
        table.is_loading(),
    );

    match table.view() {
        TableView::Loading { columns, rows } => {
            frame.render_widget(
                LoadingSkeleton::new(columns, rows).phase(table.phase()),
                body_area,
            );
            render_footer(frame, footer_area, table, "Loading…".to_string(), &mut layout);
        }
        TableView::Empty(reason) => {
            let add_label = table.has_add_handler().then_some(config.add_label.as_str());
            let empty = EmptyState::new(table.empty_message(reason)).add_button(add_label);
            frame.render_widget(empty, body_area);
            layout.add_buttons.extend(empty.add_button_area(body_area));
            render_footer(frame, footer_area, table, String::new(), &mut layout);
        }
        TableView::Rows { indices, .. } => {
            layout.rows = render_rows(frame, body_area, table, indices, title, table_state);
            let status = build_status(
                table.page_range(),
                table.filtered_indices().len(),
                table.rows().len(),
            );
            render_footer(frame, footer_area, table, status, &mut layout);
        }
    }

    // Drawn last so the open panel overlays the body
    if let Some(i) = table.open_dropdown() {
        if let (Some(filter), Some(button)) = (config.filters.get(i), layout.filter_buttons.get(i))
        {
            let panel = filter_dropdown::panel_area(*button, filter, area);
            let highlighted = table.dropdown(i).map_or(0, |d| d.highlighted());
            frame.render_widget(
                FilterPanel {
                    filter,
                    selection: table.state().active_filters().get(&filter.name),
                    highlighted,
                },
                panel,
            );
            layout.filter_panel = Some((i, panel));
        }
    }

    layout
}

fn render_toolbar(frame: &mut Frame, area: Rect, table: &DataTable<'_>, layout: &mut TableLayout) {
    let config = table.config();
    let disabled = table.is_loading();
    let add_text = format!("[ + {} ]", config.add_label);

    let mut constraints = vec![Constraint::Fill(1)];
    for filter in &config.filters {
        let selection = table.state().active_filters().get(&filter.name);
        constraints.push(Constraint::Length(filter_dropdown::button_width(
            filter, selection,
        )));
    }
    if table.has_add_handler() {
        constraints.push(Constraint::Length(Span::raw(add_text.as_str()).width() as u16 + 2));
    }
    let areas = Layout::horizontal(constraints).split(area);

    if config.searchable {
        let focused = table.focus() == Focus::Search;
        frame.render_widget(table.search_box().widget(focused, disabled), areas[0]);
        if focused && !disabled {
            frame.set_cursor_position(table.search_box().cursor_position(areas[0]));
        }
        layout.search = Some(areas[0]);
    }

    for (i, filter) in config.filters.iter().enumerate() {
        let button_area = areas[i + 1];
        frame.render_widget(
            FilterButton {
                filter,
                selection: table.state().active_filters().get(&filter.name),
                focused: table.focus() == Focus::Filter(i),
                disabled,
            },
            button_area,
        );
        layout.filter_buttons.push(button_area);
    }

    if table.has_add_handler() {
        let add_area = areas[config.filters.len() + 1];
        let style = if disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(add_text, style))
                .block(Block::default().borders(Borders::ALL).border_style(style)),
            add_area,
        );
        layout.add_buttons.push(add_area);
    }
}

fn render_rows(
    frame: &mut Frame,
    area: Rect,
    table: &DataTable<'_>,
    indices: &[usize],
    title: String,
    table_state: &mut TableState,
) -> Vec<(Rect, usize)> {
    let config = table.config();
    let page_rows: Vec<&Row> = indices.iter().map(|&i| &table.rows()[i]).collect();

    let mut row_heights = Vec::with_capacity(page_rows.len());
    let (data_rows, widths, header): (Vec<TableRow>, Vec<Constraint>, Option<TableRow>) =
        match table.row_renderer() {
            Some(renderer) => {
                let rows = page_rows
                    .iter()
                    .map(|row| {
                        let text = renderer(*row);
                        let height = text.height().max(1) as u16;
                        row_heights.push(height);
                        TableRow::new(vec![Cell::from(text)]).height(height)
                    })
                    .collect();
                (rows, vec![Constraint::Fill(1)], None)
            }
            None => {
                let rows = page_rows
                    .iter()
                    .map(|row| {
                        let cells: Vec<_> = config
                            .headers
                            .iter()
                            .map(|c| row.cell(&c.value).cloned().unwrap_or_default())
                            .collect();
                        let height =
                            cells.iter().map(Text::height).max().unwrap_or(1).max(1) as u16;
                        row_heights.push(height);
                        TableRow::new(cells.into_iter().map(Cell::from)).height(height)
                    })
                    .collect();
                let header = config.display_header.then(|| {
                    let bold = Style::default().add_modifier(Modifier::BOLD);
                    TableRow::new(
                        config
                            .headers
                            .iter()
                            .map(|c| Cell::from(header_label(c)).style(bold)),
                    )
                    .style(Style::default().fg(Color::Yellow))
                });
                (rows, calculate_widths(&config.headers, page_rows.iter().copied()), header)
            }
        };

    let has_header = header.is_some();

    let border_style = if table.focus() == Focus::Table {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);

    let mut widget = Table::new(data_rows, widths)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(HIGHLIGHT_SYMBOL);
    if let Some(header) = header {
        widget = widget.header(header);
    }
    frame.render_stateful_widget(widget, area, table_state);

    // Walk from the scroll offset ratatui settled on
    let mut hits = Vec::new();
    let mut y = inner.y + u16::from(has_header);
    for (pos, height) in row_heights.iter().enumerate().skip(table_state.offset()) {
        if y >= inner.bottom() {
            break;
        }
        let h = (*height).min(inner.bottom() - y);
        hits.push((Rect::new(inner.x, y, inner.width, h), pos));
        y += height;
    }
    hits
}

fn render_footer(
    frame: &mut Frame,
    area: Rect,
    table: &DataTable<'_>,
    status: String,
    layout: &mut TableLayout,
) {
    let pager = table.pager();
    let pager_width = pager.width().min(area.width);
    let [status_area, pager_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(pager_width)]).areas(area);

    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
        status_area,
    );
    // No pager for a single page, and none when there are no rows to page
    let has_rows = matches!(table.view(), TableView::Rows { .. });
    if !pager.is_hidden() && has_rows {
        frame.render_widget(&pager, pager_area);
        layout.pager = Some(pager_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_widths_fit_header_and_cells() {
        let columns = vec![Column::new("Name", "name"), Column::new("Stars", "stars").sortable()];
        let rows = vec![
            Row::new().field("name", "Hotel Yak & Yeti").field("stars", "5"),
            Row::new().field("name", "Dwarika's").field("stars", "5"),
        ];
        // "Hotel Yak & Yeti" = 16, "Stars ↕" = 7
        assert_eq!(calculate_auto_widths(&columns, &rows), vec![17, 8]);
    }

    #[test]
    fn test_fixed_width_overrides_auto() {
        let columns = vec![Column::new("Name", "name").width(6), Column::new("City", "city")];
        let rows = vec![Row::new().field("name", "Long hotel name").field("city", "Pokhara")];
        assert_eq!(
            calculate_widths(&columns, &rows),
            vec![Constraint::Length(6), Constraint::Length(8)]
        );
    }

    #[test]
    fn test_missing_cell_uses_header_width() {
        let columns = vec![Column::new("Region", "region")];
        let rows = vec![Row::new().field("name", "x")];
        assert_eq!(calculate_auto_widths(&columns, &rows), vec![7]);
    }

    #[test]
    fn test_build_status() {
        assert_eq!(build_status(0..10, 20, 20), "Showing 1-10 of 20");
        assert_eq!(build_status(10..15, 15, 80), "Showing 11-15 of 15 (filtered from 80)");
        assert_eq!(build_status(0..0, 0, 80), "");
    }

    #[test]
    fn test_build_title() {
        assert_eq!(build_title(Some("Hotels"), 4, 4, false), " Hotels (4) ");
        assert_eq!(build_title(Some("Hotels"), 1, 4, false), " Hotels (1/4) ");
        assert_eq!(build_title(None, 0, 0, true), " Records ");
    }
}
