//! Scroll state management for TUI widgets
//!
//! A cursor over `total` items seen through a viewport of `visible` rows.
//! The cursor always stays inside the viewport, and the viewport never
//! scrolls past the last item.

/// Cursor and viewport offset over a list of items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// First visible item
    offset: usize,
    /// Number of items
    total: usize,
    /// Number of items that fit in the viewport
    visible: usize,
    /// Highlighted item, `None` when the list is empty
    cursor: Option<usize>,
}

impl ScrollState {
    /// Create a scroll state with the cursor on the first item
    pub fn new(total: usize, visible: usize) -> Self {
        Self {
            offset: 0,
            total,
            visible,
            cursor: (total > 0).then_some(0),
        }
    }

    /// First visible item
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of items
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Viewport height in items
    #[inline]
    pub fn visible(&self) -> usize {
        self.visible
    }

    /// Highlighted item
    #[inline]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Change the viewport height, keeping the cursor visible
    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible;
        self.follow_cursor();
    }

    /// Change the item count, clamping the cursor
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.cursor = match self.cursor {
            _ if total == 0 => None,
            Some(c) => Some(c.min(total - 1)),
            None => Some(0),
        };
        self.follow_cursor();
    }

    /// Move the cursor to `index`, clamped to the list
    pub fn select(&mut self, index: usize) {
        if self.total == 0 {
            return;
        }
        self.cursor = Some(index.min(self.total - 1));
        self.follow_cursor();
    }

    /// Move the cursor down one item
    pub fn next(&mut self) {
        self.move_by(1);
    }

    /// Move the cursor up one item
    pub fn prev(&mut self) {
        self.move_by(-1);
    }

    /// Move the cursor down one page
    pub fn page_down(&mut self) {
        self.move_by(self.page_size());
    }

    /// Move the cursor up one page
    pub fn page_up(&mut self) {
        self.move_by(-self.page_size());
    }

    /// Jump to the first item
    pub fn home(&mut self) {
        self.select(0);
    }

    /// Jump to the last item
    pub fn end(&mut self) {
        self.select(self.total.saturating_sub(1));
    }

    /// Indices currently in the viewport
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let end = (self.offset + self.visible).min(self.total);
        self.offset..end
    }

    /// Whether there are more items than fit
    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.visible
    }

    /// Scrollbar thumb as (first row, length) within a track of `track` rows
    pub fn scrollbar_thumb(&self, track: usize) -> (usize, usize) {
        if !self.needs_scrollbar() || track == 0 {
            return (0, track);
        }
        let len = (track * self.visible / self.total).clamp(1, track);
        let max_start = track - len;
        let max_offset = self.max_offset().max(1);
        let start = (max_start * self.offset + max_offset / 2) / max_offset;
        (start.min(max_start), len)
    }

    fn page_size(&self) -> isize {
        isize::try_from(self.visible.max(1)).unwrap_or(isize::MAX)
    }

    fn move_by(&mut self, delta: isize) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let target = cursor.saturating_add_signed(delta);
        self.select(target);
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.visible)
    }

    fn follow_cursor(&mut self) {
        if let Some(cursor) = self.cursor {
            if cursor < self.offset {
                self.offset = cursor;
            } else if self.visible > 0 && cursor >= self.offset + self.visible {
                self.offset = cursor + 1 - self.visible;
            }
        }
        self.offset = self.offset.min(self.max_offset());
    }
}
