//! Keyboard and mouse input handlers for the data table.
//!
//! Contains the handler functions behind [`DataTable::handle_key`] and
//! [`DataTable::handle_mouse`], and the KeyAction enum describing what an
//! event did.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::filter_dropdown::DropdownEvent;
use crate::state::Focus;
use crate::table::DataTable;

/// Result of handling an input event.
/// Tells the host what changed, or that the event is its to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Consumed, nothing the host needs to know
    None,
    /// Not used by the table (e.g. quit keys)
    Unhandled,
    /// Input focus moved
    FocusChanged(Focus),
    /// Search query changed
    SearchChanged(String),
    /// A filter selection changed (`None` = all)
    FilterChanged {
        name: String,
        selection: Option<String>,
    },
    /// Search and every filter were cleared
    Cleared,
    /// Moved to this page
    PageChanged(usize),
    /// Row at this index of the row set was clicked
    RowClicked(usize),
    /// Add affordance activated
    AddClicked,
}

/// Handle a key press.
///
/// While the table is loading its controls are inert: keys it would act on
/// are swallowed, everything else is returned as `Unhandled`.
pub fn handle_key(table: &mut DataTable<'_>, key: &KeyEvent) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Unhandled;
    }

    if let Some(i) = table.open_dropdown() {
        return handle_dropdown_key(table, i, key);
    }

    match table.focus() {
        Focus::Search => handle_search_key(table, key),
        Focus::Filter(i) => handle_filter_key(table, i, key),
        Focus::Table => handle_table_key(table, key),
    }
}

fn handle_dropdown_key(table: &mut DataTable<'_>, index: usize, key: &KeyEvent) -> KeyAction {
    match table.dropdown_key(index, key) {
        DropdownEvent::Selected(selection) => apply_filter(table, index, selection),
        DropdownEvent::Closed | DropdownEvent::None => KeyAction::None,
    }
}

fn handle_search_key(table: &mut DataTable<'_>, key: &KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Down => focus(table, Focus::Table),
        KeyCode::Tab => KeyAction::FocusChanged(table.focus_next(true)),
        KeyCode::BackTab => KeyAction::FocusChanged(table.focus_next(false)),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            edit_search(table, key)
        }
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Unhandled,
        _ => edit_search(table, key),
    }
}

fn edit_search(table: &mut DataTable<'_>, key: &KeyEvent) -> KeyAction {
    if table.is_loading() {
        return KeyAction::None;
    }
    match table.search_box_mut().handle_key(key) {
        Some(query) if table.set_search_query(query.clone()) => KeyAction::SearchChanged(query),
        _ => KeyAction::None,
    }
}

fn handle_filter_key(table: &mut DataTable<'_>, index: usize, key: &KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down | KeyCode::Char('j') => {
            if !table.is_loading() {
                table.toggle_dropdown(index);
            }
            KeyAction::None
        }
        KeyCode::Esc => focus(table, Focus::Table),
        KeyCode::Tab => KeyAction::FocusChanged(table.focus_next(true)),
        KeyCode::BackTab => KeyAction::FocusChanged(table.focus_next(false)),
        KeyCode::Char('/') => focus(table, Focus::Search),
        _ => KeyAction::Unhandled,
    }
}

fn handle_table_key(table: &mut DataTable<'_>, key: &KeyEvent) -> KeyAction {
    let loading = table.is_loading();
    match key.code {
        KeyCode::Tab => KeyAction::FocusChanged(table.focus_next(true)),
        KeyCode::BackTab => KeyAction::FocusChanged(table.focus_next(false)),
        KeyCode::Char('/') if table.config().searchable => focus(table, Focus::Search),
        KeyCode::Char('f') if !table.config().filters.is_empty() => {
            let action = focus(table, Focus::Filter(0));
            if !loading {
                table.toggle_dropdown(0);
            }
            action
        }

        _ if loading && is_table_key(key) => KeyAction::None,

        KeyCode::Down | KeyCode::Char('j') => {
            table.select_next();
            KeyAction::None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            table.select_prev();
            KeyAction::None
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
            let next = table.current_page() + 1;
            page_action(table, next)
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
            let prev = table.current_page().saturating_sub(1);
            page_action(table, prev)
        }
        KeyCode::Home => page_action(table, 1),
        KeyCode::End => {
            let last = table.total_pages();
            page_action(table, last)
        }
        KeyCode::Enter => match table.activate_selected() {
            Some(index) => KeyAction::RowClicked(index),
            None => KeyAction::None,
        },
        KeyCode::Char('a') if table.has_add_handler() => {
            table.click_add();
            KeyAction::AddClicked
        }
        KeyCode::Esc => {
            if table.clear_search_and_filters() {
                KeyAction::Cleared
            } else {
                KeyAction::Unhandled
            }
        }
        _ => KeyAction::Unhandled,
    }
}

/// Keys the rows view acts on.
fn is_table_key(key: &KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Down
            | KeyCode::Up
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::PageDown
            | KeyCode::PageUp
            | KeyCode::Home
            | KeyCode::End
            | KeyCode::Enter
            | KeyCode::Esc
            | KeyCode::Char('j' | 'k' | 'h' | 'l' | 'a')
    )
}

/// Handle a mouse event against the layout of the last draw.
///
/// An open filter panel sees the click first; a click outside it closes the
/// panel and then lands on whatever is under it, unless that is the same
/// filter's button.
pub fn handle_mouse(table: &mut DataTable<'_>, mouse: &MouseEvent) -> KeyAction {
    if table.is_loading() {
        return KeyAction::None;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            table.select_next();
            return KeyAction::None;
        }
        MouseEventKind::ScrollUp => {
            table.select_prev();
            return KeyAction::None;
        }
        MouseEventKind::Down(MouseButton::Left) => {}
        _ => return KeyAction::None,
    }

    let pos = Position::new(mouse.column, mouse.row);
    let layout = table.layout().clone();

    if let Some((i, panel)) = layout.filter_panel {
        if table.dropdown(i).is_some_and(|d| d.is_open()) {
            match table.dropdown_click(i, pos, panel) {
                DropdownEvent::Selected(selection) => return apply_filter(table, i, selection),
                DropdownEvent::None => return KeyAction::None,
                DropdownEvent::Closed => {
                    if layout.filter_buttons.get(i).is_some_and(|b| b.contains(pos)) {
                        return KeyAction::None;
                    }
                }
            }
        }
    }

    if layout.search.is_some_and(|area| area.contains(pos)) {
        return focus(table, Focus::Search);
    }

    if let Some(i) = layout.filter_buttons.iter().position(|b| b.contains(pos)) {
        let action = focus(table, Focus::Filter(i));
        table.toggle_dropdown(i);
        return action;
    }

    if layout.add_buttons.iter().any(|b| b.contains(pos)) && table.click_add() {
        return KeyAction::AddClicked;
    }

    if let Some(area) = layout.pager.filter(|area| area.contains(pos)) {
        let pager = table.pager();
        return match pager.hit_test(area, pos.x).and_then(|t| pager.resolve(t)) {
            Some(page) => page_action(table, page),
            None => KeyAction::None,
        };
    }

    if let Some((_, page_pos)) = layout.rows.iter().find(|(rect, _)| rect.contains(pos)) {
        table.set_focus(Focus::Table);
        if let Some(index) = table.activate_row(*page_pos) {
            return KeyAction::RowClicked(index);
        }
    }

    KeyAction::None
}

fn focus(table: &mut DataTable<'_>, target: Focus) -> KeyAction {
    table.set_focus(target);
    if table.focus() == target {
        KeyAction::FocusChanged(target)
    } else {
        KeyAction::None
    }
}

fn page_action(table: &mut DataTable<'_>, page: usize) -> KeyAction {
    if table.go_to_page(page) {
        KeyAction::PageChanged(page)
    } else {
        KeyAction::None
    }
}

fn apply_filter(table: &mut DataTable<'_>, index: usize, selection: Option<String>) -> KeyAction {
    let Some(name) = table.config().filters.get(index).map(|f| f.name.clone()) else {
        return KeyAction::None;
    };
    if table.set_filter(&name, selection.clone()) {
        KeyAction::FilterChanged { name, selection }
    } else {
        KeyAction::None
    }
}
