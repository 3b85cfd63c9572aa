//! Single-select filter dropdown.
//!
//! The first choice is always "All {name}"; picking it clears the filter.
//! Only the open/closed flag and the highlighted choice live here.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::filter::{Filter, FilterChoice};

/// Outcome of feeding input to a dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownEvent {
    /// Nothing the parent needs to act on.
    None,
    /// A choice was picked. `None` is the "All" choice.
    Selected(Option<String>),
    /// The panel closed without a selection.
    Closed,
}

/// Local UI state of one dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDropdownState {
    open: bool,
    highlighted: usize,
}

impl FilterDropdownState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Highlighted position in [`Filter::choices`].
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Open with the current selection highlighted.
    pub fn open(&mut self, filter: &Filter, selection: Option<&str>) {
        self.open = true;
        self.highlighted = filter.choice_index(selection);
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self, filter: &Filter, selection: Option<&str>) {
        if self.open {
            self.close();
        } else {
            self.open(filter, selection);
        }
    }

    /// Handle a key while the panel is open.
    pub fn handle_key(&mut self, key: &KeyEvent, filter: &Filter) -> DropdownEvent {
        if !self.open {
            return DropdownEvent::None;
        }
        let last = filter.choice_count() - 1;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.highlighted = self.highlighted.saturating_sub(1);
                DropdownEvent::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.highlighted = (self.highlighted + 1).min(last);
                DropdownEvent::None
            }
            KeyCode::Home => {
                self.highlighted = 0;
                DropdownEvent::None
            }
            KeyCode::End => {
                self.highlighted = last;
                DropdownEvent::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.select(self.highlighted, filter),
            KeyCode::Esc => {
                self.close();
                DropdownEvent::Closed
            }
            _ => DropdownEvent::None,
        }
    }

    /// Handle a click while the panel is open. Clicks outside `panel` close
    /// it; clicks on a choice select it.
    pub fn handle_click(&mut self, pos: Position, panel: Rect, filter: &Filter) -> DropdownEvent {
        if !self.open {
            return DropdownEvent::None;
        }
        if !panel.contains(pos) {
            self.close();
            return DropdownEvent::Closed;
        }
        let inner = panel_inner(panel);
        if !inner.contains(pos) {
            return DropdownEvent::None;
        }
        let index = usize::from(pos.y - inner.y);
        if index < filter.choice_count() {
            self.select(index, filter)
        } else {
            DropdownEvent::None
        }
    }

    fn select(&mut self, index: usize, filter: &Filter) -> DropdownEvent {
        self.close();
        match filter.choices().nth(index) {
            Some(FilterChoice::Value(v)) => DropdownEvent::Selected(Some(v.to_string())),
            Some(FilterChoice::All) | None => DropdownEvent::Selected(None),
        }
    }
}

fn panel_inner(panel: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(panel)
}

/// Button label for a filter with its current selection.
pub fn button_label(filter: &Filter, selection: Option<&str>) -> String {
    match selection {
        Some(value) => format!("{} ▾", value),
        None => format!("{} ▾", filter.all_label()),
    }
}

/// Width the button for `filter` needs, including its border.
pub fn button_width(filter: &Filter, selection: Option<&str>) -> u16 {
    Span::raw(button_label(filter, selection)).width() as u16 + 2
}

/// Area of the open panel: directly under `button`, kept inside `bounds`.
pub fn panel_area(button: Rect, filter: &Filter, bounds: Rect) -> Rect {
    let widest = filter
        .choices()
        .map(|c| Span::raw(filter.choice_label(c)).width())
        .max()
        .unwrap_or(0) as u16;
    // border + "✓ " marker
    let width = (widest + 4).max(button.width);
    let height = filter.choice_count() as u16 + 2;
    let x = button.x.min(bounds.right().saturating_sub(width));
    Rect::new(x, button.bottom(), width, height).intersection(bounds)
}

/// The closed dropdown: a bordered button showing the selection.
pub struct FilterButton<'a> {
    pub filter: &'a Filter,
    pub selection: Option<&'a str>,
    pub focused: bool,
    pub disabled: bool,
}

impl Widget for FilterButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let text_style = if self.selection.is_some() && !self.disabled {
            Style::default().fg(Color::Cyan)
        } else {
            border_style
        };
        Paragraph::new(Span::styled(
            button_label(self.filter, self.selection),
            text_style,
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .render(area, buf);
    }
}

/// The open option list.
pub struct FilterPanel<'a> {
    pub filter: &'a Filter,
    pub selection: Option<&'a str>,
    pub highlighted: usize,
}

impl Widget for FilterPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let selected = self.filter.choice_index(self.selection);
        let lines: Vec<Line> = self
            .filter
            .choices()
            .enumerate()
            .map(|(i, choice)| {
                let marker = if i == selected { "✓ " } else { "  " };
                let style = if i == self.highlighted {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                Line::styled(
                    format!("{}{}", marker, self.filter.choice_label(choice)),
                    style,
                )
            })
            .collect();
        Clear.render(area, buf);
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .render(area, buf);
    }
}
