//! Row and column descriptors.
//!
//! A [`Row`] pairs renderable cell content with raw "shadow" strings. The
//! table renders cells but only ever matches search and filters against the
//! shadow strings, so a cell can hold styled or composed content while
//! matching still runs on plain text.

use std::collections::HashMap;

use ratatui::text::Text;
use serde::Deserialize;

/// Renderable content of a single cell.
pub type CellValue = Text<'static>;

/// Narrowest width a column may be forced to.
pub const MIN_COLUMN_WIDTH: u16 = 3;
/// Widest width a column may be forced to.
pub const MAX_COLUMN_WIDTH: u16 = 100;

/// A single record: ordered cells keyed by column key, plus shadow values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
    raw: HashMap<String, String>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain-text field that renders and matches as the same string.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        self.set(key.into(), Text::raw(value.clone()), value);
        self
    }

    /// Add a field whose rendered content differs from its matchable text.
    #[must_use]
    pub fn styled(
        mut self,
        key: impl Into<String>,
        display: impl Into<CellValue>,
        raw: impl Into<String>,
    ) -> Self {
        self.set(key.into(), display.into(), raw.into());
        self
    }

    /// Add a shadow value only: searchable and filterable, never rendered.
    #[must_use]
    pub fn shadow(mut self, key: impl Into<String>, raw: impl Into<String>) -> Self {
        self.raw.insert(key.into(), raw.into());
        self
    }

    /// Set a field in place. Replacing an existing key keeps its position.
    pub fn set(&mut self, key: String, display: CellValue, raw: String) {
        if let Some(pos) = self.cells.iter().position(|(k, _)| *k == key) {
            self.cells[pos].1 = display;
        } else {
            self.cells.push((key.clone(), display));
        }
        self.raw.insert(key, raw);
    }

    /// Rendered content for `key`, if the row has a cell there.
    pub fn cell(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Raw matching value for `key`. Missing keys read as the empty string.
    pub fn raw(&self, key: &str) -> &str {
        self.raw.get(key).map_or("", String::as_str)
    }

    /// Cell keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    /// Number of rendered cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Header descriptor: a display label and the row key it projects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Column {
    /// Display label
    pub name: String,
    /// Row key shown in this column
    pub value: String,
    /// Fixed width (None = auto-size)
    #[serde(default)]
    pub width: Option<u16>,
    /// Whether the header shows a sort marker
    #[serde(default)]
    pub sortable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            width: None,
            sortable: false,
        }
    }

    /// Fix the column width (min 3, max 100).
    #[must_use]
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH));
        self
    }

    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Width override after clamping, for values that came from a schema file.
    pub fn fixed_width(&self) -> Option<u16> {
        self.width.map(|w| w.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Style};
    use ratatui::text::{Line, Span};

    #[test]
    fn test_field_sets_cell_and_shadow() {
        let row = Row::new().field("name", "Kontiki Park");
        assert_eq!(row.cell("name"), Some(&Text::raw("Kontiki Park")));
        assert_eq!(row.raw("name"), "Kontiki Park");
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_styled_keeps_raw_separate() {
        let badge = Line::from(Span::styled("● Active", Style::default().fg(Color::Green)));
        let row = Row::new().styled("status", badge, "active");
        assert_eq!(row.raw("status"), "active");
        assert_eq!(row.cell("status").map(Text::width), Some(8));
    }

    #[test]
    fn test_shadow_is_not_rendered() {
        let row = Row::new().field("name", "Oxbow Lake").shadow("region", "Lumbini");
        assert_eq!(row.raw("region"), "Lumbini");
        assert!(row.cell("region").is_none());
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn test_missing_key_reads_empty() {
        let row = Row::new();
        assert_eq!(row.raw("anything"), "");
        assert!(row.is_empty());
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut row = Row::new().field("a", "1").field("b", "2");
        row.set("a".to_string(), Text::raw("x"), "x".to_string());
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(row.raw("a"), "x");
    }

    #[test]
    fn test_column_width_bounds() {
        assert_eq!(Column::new("Name", "name").width(1).width, Some(3));
        assert_eq!(Column::new("Name", "name").width(500).width, Some(100));
        assert_eq!(Column::new("Name", "name").width(20).width, Some(20));
    }

    #[test]
    fn test_column_from_schema_json() {
        let col: Column =
            serde_json::from_str(r#"{"name":"Rating","value":"rating","width":1}"#).unwrap();
        assert_eq!(col.fixed_width(), Some(3));
        assert!(!col.sortable);
    }
}
