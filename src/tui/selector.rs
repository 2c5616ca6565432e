//! Column checklist pane

use super::format::fit_to_width;
use super::scroll::ScrollState;

/// Every column of the main table with a checked flag
#[derive(Debug, Clone)]
pub struct ColumnChecklist {
    columns: Vec<String>,
    checked: Vec<bool>,
    scroll: ScrollState,
}

impl ColumnChecklist {
    /// Checklist over `columns` with the names in `initial` checked
    pub fn new(columns: Vec<String>, initial: &[String], visible: usize) -> Self {
        let checked = columns.iter().map(|c| initial.contains(c)).collect();
        let scroll = ScrollState::new(columns.len(), visible);
        Self {
            columns,
            checked,
            scroll,
        }
    }

    /// Checked columns in table order
    pub fn checked_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .zip(&self.checked)
            .filter(|(_, on)| **on)
            .map(|(c, _)| c.clone())
            .collect()
    }

    /// Column under the cursor
    pub fn highlighted(&self) -> Option<&str> {
        self.scroll
            .cursor()
            .and_then(|i| self.columns.get(i))
            .map(String::as_str)
    }

    /// Flip the column under the cursor; returns its new state
    pub fn toggle(&mut self) -> Option<bool> {
        let flag = self.checked.get_mut(self.scroll.cursor()?)?;
        *flag = !*flag;
        Some(*flag)
    }

    /// Scroll position
    pub fn scroll_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }

    /// Render exactly `height` lines of exactly `width` columns
    pub fn render(&self, width: usize, height: usize) -> Vec<String> {
        let mut lines: Vec<String> = self
            .scroll
            .visible_range()
            .take(height)
            .map(|i| {
                let cursor = if Some(i) == self.scroll.cursor() { '>' } else { ' ' };
                let mark = if self.checked.get(i).copied().unwrap_or(false) {
                    'x'
                } else {
                    ' '
                };
                let name = self.columns.get(i).map_or("", String::as_str);
                fit_to_width(&format!("{cursor}[{mark}] {name}"), width)
            })
            .collect();
        lines.resize(height, " ".repeat(width));
        lines
    }
}
