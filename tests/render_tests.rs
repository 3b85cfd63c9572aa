//! Rendering tests for the data table.
//!
//! These tests draw the table into ratatui's TestBackend and check what ends
//! up on screen for each body state: rows, loading, no data and no results.

use dashboard_table::empty_state::{DEFAULT_EMPTY_MESSAGE, NO_RESULTS_MESSAGE};
use dashboard_table::{CellValue, Column, DataTable, Row, TableConfig};
use ratatui::backend::TestBackend;
use ratatui::text::Text;
use ratatui::Terminal;

/// Draw `table` on a `width` x `height` screen and return its lines.
fn draw(table: &mut DataTable<'_>, width: u16, height: u16) -> Vec<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("Failed to create terminal");
    terminal
        .draw(|frame| table.render(frame, frame.area()))
        .expect("Failed to draw");

    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
        .collect()
}

fn screen_contains(lines: &[String], needle: &str) -> bool {
    lines.iter().any(|line| line.contains(needle))
}

fn numbered(n: usize) -> Vec<Row> {
    (1..=n)
        .map(|i| {
            Row::new()
                .field("id", format!("{:02}", i))
                .field("name", format!("Record {:02}", i))
        })
        .collect()
}

fn config() -> TableConfig {
    TableConfig::new(vec![Column::new("ID", "id"), Column::new("Name", "name")]).title("Records")
}

#[test]
fn test_first_page_of_rows() {
    let mut table = DataTable::new(config(), numbered(20));
    let screen = draw(&mut table, 80, 20);

    assert!(screen_contains(&screen, "Record 01"));
    assert!(screen_contains(&screen, "Record 10"));
    assert!(
        !screen_contains(&screen, "Record 11"),
        "Only the first 10 rows belong on page 1"
    );
    assert!(screen_contains(&screen, "Showing 1-10 of 20"));
    assert!(screen_contains(&screen, "Next ›"), "Pager should be visible");
}

#[test]
fn test_second_page_of_rows() {
    let mut table = DataTable::new(config(), numbered(20));
    assert!(table.go_to_page(2));
    let screen = draw(&mut table, 80, 20);

    assert!(screen_contains(&screen, "Record 11"));
    assert!(screen_contains(&screen, "Record 20"));
    assert!(!screen_contains(&screen, "Record 10"));
    assert!(screen_contains(&screen, "[2]"), "Current page is bracketed");
}

#[test]
fn test_no_data_message_without_pager() {
    let mut table = DataTable::new(config(), Vec::new());
    let screen = draw(&mut table, 80, 20);

    assert!(screen_contains(&screen, DEFAULT_EMPTY_MESSAGE));
    assert!(!screen_contains(&screen, "Next ›"), "No pager for an empty table");
    assert!(!screen_contains(&screen, "Prev"));
}

#[test]
fn test_no_results_message_differs_from_no_data() {
    let mut table = DataTable::new(config(), numbered(5));
    table.set_search_query("does not exist");
    let screen = draw(&mut table, 80, 20);

    assert!(screen_contains(&screen, "No results found."));
    assert!(screen_contains(&screen, "adjusting your search or filters"));
    assert!(!screen_contains(&screen, DEFAULT_EMPTY_MESSAGE));
    assert_ne!(NO_RESULTS_MESSAGE, DEFAULT_EMPTY_MESSAGE);
}

#[test]
fn test_custom_empty_message() {
    let mut table = DataTable::new(config().empty_message("Nothing booked yet."), Vec::new());
    let screen = draw(&mut table, 80, 20);
    assert!(screen_contains(&screen, "Nothing booked yet."));
}

#[test]
fn test_loading_shows_skeleton_not_rows() {
    let mut table = DataTable::new(config(), numbered(20)).loading(true);
    let screen = draw(&mut table, 80, 20);

    assert!(screen_contains(&screen, "Loading…"));
    assert!(screen_contains(&screen, "▒"), "Skeleton bars should be drawn");
    assert!(!screen_contains(&screen, "Record 01"), "Rows are hidden while loading");
    assert!(!screen_contains(&screen, "Next ›"));
}

#[test]
fn test_loading_takes_precedence_over_empty() {
    let mut table = DataTable::new(config(), Vec::new()).loading(true);
    let screen = draw(&mut table, 80, 20);

    assert!(screen_contains(&screen, "Loading…"));
    assert!(!screen_contains(&screen, DEFAULT_EMPTY_MESSAGE));
}

#[test]
fn test_single_page_has_no_pager() {
    let mut table = DataTable::new(config(), numbered(10));
    let screen = draw(&mut table, 80, 20);

    assert!(screen_contains(&screen, "Record 10"));
    assert!(!screen_contains(&screen, "Next ›"));
}

#[test]
fn test_header_and_sort_marker() {
    let columns = vec![Column::new("ID", "id"), Column::new("Name", "name").sortable()];
    let mut table = DataTable::new(TableConfig::new(columns), numbered(3));
    let screen = draw(&mut table, 80, 20);
    assert!(screen_contains(&screen, "Name ↕"));
}

#[test]
fn test_hidden_header() {
    let mut table = DataTable::new(config().display_header(false), numbered(3));
    let screen = draw(&mut table, 80, 20);

    assert!(screen_contains(&screen, "Record 01"));
    assert!(!screen_contains(&screen, " Name "), "Header row should be hidden");
}

#[test]
fn test_custom_row_renderer() {
    let mut table = DataTable::new(config(), numbered(3)).render_row(|row| -> CellValue {
        Text::from(format!("#{} :: {}", row.raw("id"), row.raw("name")))
    });
    let screen = draw(&mut table, 80, 20);

    assert!(screen_contains(&screen, "#02 :: Record 02"));
    assert!(
        !screen_contains(&screen, " Name "),
        "No column header with a custom renderer"
    );
}

#[test]
fn test_filter_and_search_controls() {
    let mut table = DataTable::new(
        config().filter(dashboard_table::Filter::new("Region", ["North", "South"])),
        numbered(3),
    );
    let screen = draw(&mut table, 80, 20);

    assert!(screen_contains(&screen, "Search..."), "Search placeholder");
    assert!(screen_contains(&screen, "All Region ▾"));

    table.set_filter("Region", Some("North".to_string()));
    let screen = draw(&mut table, 80, 20);
    assert!(screen_contains(&screen, "North ▾"));
}

#[test]
fn test_no_search_box_when_not_searchable() {
    let mut table = DataTable::new(config().searchable(false), numbered(3));
    let screen = draw(&mut table, 80, 20);
    assert!(!screen_contains(&screen, "Search..."));
}

#[test]
fn test_add_button_in_empty_state() {
    let mut table = DataTable::new(config().add_label("Add record"), Vec::new())
        .on_add_button_click(|| {});
    let screen = draw(&mut table, 80, 20);

    assert!(screen_contains(&screen, DEFAULT_EMPTY_MESSAGE));
    assert!(screen_contains(&screen, "[ + Add record ]"));
    // Toolbar button and empty-state button
    assert_eq!(table.layout().add_buttons.len(), 2);
}

#[test]
fn test_filtered_status() {
    let mut table = DataTable::new(config(), numbered(20));
    table.set_search_query("record 1");
    let screen = draw(&mut table, 80, 20);

    // Record 10..=19
    assert!(screen_contains(&screen, "Showing 1-10 of 10 (filtered from 20)"));
}
