//! Page arithmetic and the pager widget.
//!
//! Pages are 1-based throughout. The pager is stateless: it is rebuilt from
//! the current page and page count every frame, and only validates page
//! change requests; the table owns the page number.

use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::Widget;

/// Page buttons shown around the current page by default.
pub const DEFAULT_MAX_VISIBLE_PAGES: usize = 5;

/// Number of pages needed for `items` rows at `page_size` rows per page.
/// Never less than 1; a page size of 0 is treated as 1.
pub fn page_count(items: usize, page_size: usize) -> usize {
    items.div_ceil(page_size.max(1)).max(1)
}

/// Index range of page `page` within a list of `len` items.
pub fn page_bounds(page: usize, page_size: usize, len: usize) -> Range<usize> {
    let size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(size).min(len);
    let end = start.saturating_add(size).min(len);
    start..end
}

/// One slot in the pager's page list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Pages to show for `current` out of `total`: a window of up to
/// `max_visible` pages centered on `current`, with the first and last page
/// pinned outside it and an ellipsis wherever pages are skipped.
pub fn page_window(current: usize, total: usize, max_visible: usize) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let span = max_visible.clamp(1, total);

    let mut start = current.saturating_sub(span / 2).max(1);
    let end = (start + span - 1).min(total);
    start = (end + 1).saturating_sub(span).max(1);

    let mut items = Vec::with_capacity(span + 4);
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total {
        if end + 1 < total {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total));
    }
    items
}

/// Something a click on the pager can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerTarget {
    Prev,
    Next,
    Page(usize),
}

/// The pager control: previous/next buttons around a page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    total_pages: usize,
    max_visible_pages: usize,
    disabled: bool,
}

const PREV_LABEL: &str = "‹ Prev";
const NEXT_LABEL: &str = "Next ›";
const ELLIPSIS: &str = "…";

impl Pagination {
    pub fn new(current_page: usize, total_pages: usize) -> Self {
        Self {
            current_page,
            total_pages,
            max_visible_pages: DEFAULT_MAX_VISIBLE_PAGES,
            disabled: false,
        }
    }

    #[must_use]
    pub fn max_visible_pages(mut self, n: usize) -> Self {
        self.max_visible_pages = n.max(1);
        self
    }

    /// Grey the whole control out (used while the table is loading).
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// A pager with a single page renders nothing.
    pub fn is_hidden(&self) -> bool {
        self.total_pages <= 1
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn items(&self) -> Vec<PageItem> {
        page_window(self.current_page, self.total_pages, self.max_visible_pages)
    }

    /// Validate a page change request. Returns the page to move to, or None
    /// when the request is out of range.
    pub fn request(&self, page: usize) -> Option<usize> {
        (1..=self.total_pages).contains(&page).then_some(page)
    }

    /// Resolve a click target to a page change request.
    pub fn resolve(&self, target: PagerTarget) -> Option<usize> {
        let page = match target {
            PagerTarget::Prev => self.current_page.checked_sub(1)?,
            PagerTarget::Next => self.current_page + 1,
            PagerTarget::Page(p) => p,
        };
        self.request(page)
    }

    /// Labels in render order, each with the target it activates.
    fn segments(&self) -> Vec<(String, Option<PagerTarget>)> {
        let mut segments = vec![(PREV_LABEL.to_string(), Some(PagerTarget::Prev))];
        for item in self.items() {
            segments.push(match item {
                PageItem::Page(p) if p == self.current_page => {
                    (format!("[{}]", p), Some(PagerTarget::Page(p)))
                }
                PageItem::Page(p) => (p.to_string(), Some(PagerTarget::Page(p))),
                PageItem::Ellipsis => (ELLIPSIS.to_string(), None),
            });
        }
        segments.push((NEXT_LABEL.to_string(), Some(PagerTarget::Next)));
        segments
    }

    /// Rendered width in cells, for right-aligning the pager.
    pub fn width(&self) -> u16 {
        if self.is_hidden() {
            return 0;
        }
        let segments = self.segments();
        let labels: usize = segments
            .iter()
            .map(|(label, _)| Span::raw(label.as_str()).width())
            .sum();
        (labels + segments.len() - 1) as u16
    }

    /// Map a click at `column` inside `area` to a pager target.
    pub fn hit_test(&self, area: Rect, column: u16) -> Option<PagerTarget> {
        if self.is_hidden() || column < area.x {
            return None;
        }
        let mut x = area.x;
        for (label, target) in self.segments() {
            let w = Span::raw(label.as_str()).width() as u16;
            if column < x + w {
                return target;
            }
            x += w + 1;
            if column < x {
                return None;
            }
        }
        None
    }
}

impl Widget for &Pagination {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.is_hidden() {
            return;
        }
        let enabled = Style::default();
        let muted = Style::default().fg(Color::DarkGray);
        let active = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let mut spans = Vec::new();
        for (i, (label, target)) in self.segments().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let style = if self.disabled {
                muted
            } else {
                match target {
                    Some(PagerTarget::Prev) if !self.has_prev() => muted,
                    Some(PagerTarget::Next) if !self.has_next() => muted,
                    Some(PagerTarget::Page(p)) if p == self.current_page => active,
                    None => muted,
                    _ => enabled,
                }
            };
            spans.push(Span::styled(label, style));
        }
        Line::from(spans).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PageItem::{Ellipsis, Page};

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(20, 10), 2);
        assert_eq!(page_count(5, 0), 5);
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(1, 10, 25), 0..10);
        assert_eq!(page_bounds(3, 10, 25), 20..25);
        assert_eq!(page_bounds(4, 10, 25), 25..25);
        assert_eq!(page_bounds(1, 10, 0), 0..0);
    }

    #[test]
    fn test_window_small_total() {
        assert_eq!(page_window(2, 3, 5), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(page_window(1, 1, 5), vec![Page(1)]);
        assert!(page_window(1, 0, 5).is_empty());
    }

    #[test]
    fn test_window_at_start() {
        assert_eq!(
            page_window(1, 20, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn test_window_centered() {
        assert_eq!(
            page_window(10, 20, 5),
            vec![
                Page(1),
                Ellipsis,
                Page(8),
                Page(9),
                Page(10),
                Page(11),
                Page(12),
                Ellipsis,
                Page(20)
            ]
        );
    }

    #[test]
    fn test_window_at_end() {
        assert_eq!(
            page_window(20, 20, 5),
            vec![Page(1), Ellipsis, Page(16), Page(17), Page(18), Page(19), Page(20)]
        );
    }

    #[test]
    fn test_window_adjacent_pin_has_no_ellipsis() {
        // Window 2..=6 touches page 1, window ends one before 7
        assert_eq!(
            page_window(4, 7, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Page(7)]
        );
    }

    #[test]
    fn test_request_rejects_out_of_range() {
        let pager = Pagination::new(1, 3);
        assert_eq!(pager.request(0), None);
        assert_eq!(pager.request(4), None);
        assert_eq!(pager.request(3), Some(3));
        assert_eq!(pager.resolve(PagerTarget::Prev), None);
        assert_eq!(pager.resolve(PagerTarget::Next), Some(2));
        assert!(!pager.has_prev());
        assert!(pager.has_next());
    }

    #[test]
    fn test_hidden_for_single_page() {
        let pager = Pagination::new(1, 1);
        assert!(pager.is_hidden());
        assert_eq!(pager.width(), 0);
        assert_eq!(pager.hit_test(Rect::new(0, 0, 40, 1), 2), None);
    }

    #[test]
    fn test_hit_test_segments() {
        // "‹ Prev 1 [2] 3 Next ›"
        let pager = Pagination::new(2, 3);
        let area = Rect::new(10, 0, 40, 1);
        assert_eq!(pager.hit_test(area, 10), Some(PagerTarget::Prev));
        assert_eq!(pager.hit_test(area, 16), None);
        assert_eq!(pager.hit_test(area, 17), Some(PagerTarget::Page(1)));
        assert_eq!(pager.hit_test(area, 20), Some(PagerTarget::Page(2)));
        assert_eq!(pager.hit_test(area, 23), Some(PagerTarget::Page(3)));
        assert_eq!(pager.hit_test(area, 25), Some(PagerTarget::Next));
        assert_eq!(pager.width(), 21);
    }

    #[test]
    fn test_render_marks_current_page() {
        let pager = Pagination::new(2, 3);
        let mut buf = Buffer::empty(Rect::new(0, 0, 21, 1));
        (&pager).render(buf.area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert_eq!(text, "‹ Prev 1 [2] 3 Next ›");
        // "[2]" spans columns 9..=11
        assert_eq!(buf[(10, 0)].fg, Color::Yellow);
        assert_eq!(buf[(0, 0)].fg, Color::Reset);
        assert_eq!(buf[(19, 0)].fg, Color::Reset);
    }
}
