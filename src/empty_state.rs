//! Panel shown in place of rows when there is nothing to list.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

/// Message when the table has no rows at all.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No data available at the moment.";
/// Message when rows exist but none pass the current search and filters.
pub const NO_RESULTS_MESSAGE: &str = "No results found. Try adjusting your search or filters.";

/// Why the table body is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The row set itself is empty.
    NoData,
    /// Rows exist, but search/filters exclude all of them.
    NoResults,
}

/// Centered message with an optional add button underneath.
#[derive(Debug, Clone, Copy)]
pub struct EmptyState<'a> {
    message: &'a str,
    add_label: Option<&'a str>,
}

impl<'a> EmptyState<'a> {
    pub fn new(message: &'a str) -> Self {
        Self {
            message,
            add_label: None,
        }
    }

    /// Offer an add affordance with this label.
    #[must_use]
    pub fn add_button(mut self, label: Option<&'a str>) -> Self {
        self.add_label = label;
        self
    }

    fn button_text(label: &str) -> String {
        format!("[ + {} ]", label)
    }

    fn content_top(&self, inner: Rect) -> u16 {
        let lines = if self.add_label.is_some() { 3 } else { 1 };
        inner.y + inner.height.saturating_sub(lines) / 2
    }

    /// Where the add button lands when the panel is drawn in `area`.
    pub fn add_button_area(&self, area: Rect) -> Option<Rect> {
        let label = self.add_label?;
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let width = (Span::raw(Self::button_text(label)).width() as u16).min(inner.width);
        let y = self.content_top(inner) + 2;
        if y >= inner.bottom() {
            return None;
        }
        // Same centering as Paragraph's Alignment::Center
        let x = inner.x + (inner.width / 2).saturating_sub(width / 2);
        Some(Rect::new(x, y, width, 1))
    }
}

impl Widget for EmptyState<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::styled(
            self.message,
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )];
        if let Some(label) = self.add_label {
            lines.push(Line::default());
            lines.push(Line::styled(
                Self::button_text(label),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
        }

        let top = self.content_top(inner);
        let content = Rect::new(inner.x, top, inner.width, inner.bottom().saturating_sub(top));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(content, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in buf.area.y..buf.area.bottom() {
            for x in buf.area.x..buf.area.right() {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_renders_message() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 50, 7));
        EmptyState::new(DEFAULT_EMPTY_MESSAGE).render(buf.area, &mut buf);
        assert!(screen(&buf).contains(DEFAULT_EMPTY_MESSAGE));
        assert!(!screen(&buf).contains("[ +"));
    }

    #[test]
    fn test_add_button_position_matches_render() {
        let area = Rect::new(0, 0, 60, 9);
        let state = EmptyState::new(DEFAULT_EMPTY_MESSAGE).add_button(Some("Add hotel"));
        let mut buf = Buffer::empty(area);
        state.render(area, &mut buf);

        let button = state.add_button_area(area).unwrap();
        let text: String = (button.x..button.right())
            .map(|x| buf[(x, button.y)].symbol())
            .collect();
        assert_eq!(text, "[ + Add hotel ]");
    }

    #[test]
    fn test_no_button_area_without_label() {
        let state = EmptyState::new(NO_RESULTS_MESSAGE);
        assert!(state.add_button_area(Rect::new(0, 0, 60, 9)).is_none());
    }
}
