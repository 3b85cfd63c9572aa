//! Single-line search input.
//!
//! Every edit is forwarded immediately; there is no debounce.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

const DEFAULT_PLACEHOLDER: &str = "Search...";

/// Search text plus a cursor, in characters.
#[derive(Debug, Clone)]
pub struct SearchBox {
    value: String,
    cursor: usize,
    placeholder: String,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the text (controlled use). The cursor moves to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    /// Cursor position in characters from the start.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Apply a key press. Returns the new text when the text changed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<String> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => {
                if self.value.is_empty() {
                    return None;
                }
                self.value.clear();
                self.cursor = 0;
            }
            KeyCode::Char(c) if !ctrl => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
            }
            KeyCode::Delete => {
                if self.cursor >= self.value.chars().count() {
                    return None;
                }
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                return None;
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.chars().count());
                return None;
            }
            KeyCode::Home => {
                self.cursor = 0;
                return None;
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                return None;
            }
            _ => return None,
        }
        Some(self.value.clone())
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Widget for the current text.
    pub fn widget(&self, focused: bool, disabled: bool) -> SearchBoxWidget<'_> {
        SearchBoxWidget {
            search: self,
            focused,
            disabled,
        }
    }

    /// Terminal cursor position when the box is drawn in `area`.
    pub fn cursor_position(&self, area: Rect) -> Position {
        let before: String = self.value.chars().take(self.cursor).collect();
        // border + "/" prefix
        let x = area.x + 2 + Span::raw(before).width() as u16;
        Position::new(x.min(area.right().saturating_sub(2)), area.y + 1)
    }
}

/// Renders a [`SearchBox`] as a bordered input line.
pub struct SearchBoxWidget<'a> {
    search: &'a SearchBox,
    focused: bool,
    disabled: bool,
}

impl Widget for SearchBoxWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let line = if self.search.value.is_empty() && !self.focused {
            Line::from(vec![
                Span::styled("/", border_style),
                Span::styled(
                    self.search.placeholder.as_str(),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        } else {
            Line::from(vec![
                Span::styled("/", border_style),
                Span::raw(self.search.value.as_str()),
            ])
        };
        Paragraph::new(line)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .render(area, buf);
    }
}
