//! Placeholder grid shown while rows are loading.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Widget};

/// A `columns` x `rows` grid of placeholder bars. `phase` shifts the
/// highlighted bars so the grid shimmers as the host ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingSkeleton {
    columns: usize,
    rows: usize,
    phase: usize,
}

const BAR: &str = "▒";
const BAR_BRIGHT: &str = "░";

impl LoadingSkeleton {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows,
            phase: 0,
        }
    }

    #[must_use]
    pub fn phase(mut self, phase: usize) -> Self {
        self.phase = phase;
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl Widget for LoadingSkeleton {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Loading… ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }
        let col_width = (inner.width as usize / self.columns).max(1);
        // Leave one blank cell between bars
        let bar_width = col_width.saturating_sub(1).max(1);
        let dim = Style::default().fg(Color::DarkGray);
        let bright = Style::default().fg(Color::Gray);

        // Header bar row, then one bar row per placeholder row
        for row in 0..=self.rows {
            let y = inner.y + row as u16;
            if y >= inner.bottom() {
                break;
            }
            for col in 0..self.columns {
                let x = inner.x + (col * col_width) as u16;
                if x >= inner.right() {
                    break;
                }
                let shimmer = (row + col + self.phase) % 4 == 0;
                let (glyph, style) = if shimmer { (BAR_BRIGHT, bright) } else { (BAR, dim) };
                let width = bar_width.min((inner.right() - x) as usize);
                buf.set_string(x, y, glyph.repeat(width), style);
            }
        }
    }
}
