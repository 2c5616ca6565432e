//! Scrollable data table pane
//!
//! Shows the projected main table one screen at a time. Every row stays
//! reachable through the cursor; nothing is paginated away.

use super::adapter::TableAdapter;
use super::format::{fit_to_width, truncate_string};
use super::scroll::ScrollState;
use crate::panel::Selection;

/// Rows sampled when sizing columns
const WIDTH_SAMPLE_ROWS: usize = 200;

/// Lines used by the header and its rule
const HEADER_LINES: usize = 2;

/// Data table with a row cursor
#[derive(Debug, Clone)]
pub struct TableView {
    adapter: Option<TableAdapter>,
    warning: Option<String>,
    scroll: ScrollState,
}

impl TableView {
    /// Create a view showing `visible_rows` rows at a time
    pub fn new(selection: &Selection, visible_rows: usize) -> Self {
        let mut view = Self {
            adapter: None,
            warning: None,
            scroll: ScrollState::new(0, visible_rows),
        };
        view.set_selection(selection);
        view
    }

    /// Replace the shown columns, keeping the cursor row where possible
    pub fn set_selection(&mut self, selection: &Selection) {
        match selection {
            Selection::Table(projection) => {
                let adapter = TableAdapter::from_dataset(projection.dataset());
                self.scroll.set_total(adapter.row_count());
                self.adapter = Some(adapter);
                self.warning = None;
            }
            Selection::Empty { warning } => {
                self.scroll.set_total(0);
                self.adapter = None;
                self.warning = Some(warning.clone());
            }
        }
    }

    /// Number of rows in the table
    pub fn row_count(&self) -> usize {
        self.adapter.as_ref().map_or(0, TableAdapter::row_count)
    }

    /// Column headers in display order
    pub fn headers(&self) -> Vec<String> {
        self.adapter
            .as_ref()
            .map(|a| a.field_names().into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Warning shown instead of the table
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Scroll position
    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    /// Row under the cursor
    pub fn selected_row(&self) -> Option<usize> {
        self.scroll.cursor()
    }

    /// Set how many data rows fit on screen
    pub fn set_visible_rows(&mut self, rows: usize) {
        self.scroll.set_visible(rows);
    }

    /// Move the cursor down
    pub fn select_next(&mut self) {
        self.scroll.next();
    }

    /// Move the cursor up
    pub fn select_prev(&mut self) {
        self.scroll.prev();
    }

    /// Page down
    pub fn page_down(&mut self) {
        self.scroll.page_down();
    }

    /// Page up
    pub fn page_up(&mut self) {
        self.scroll.page_up();
    }

    /// First row
    pub fn home(&mut self) {
        self.scroll.home();
    }

    /// Last row
    pub fn end(&mut self) {
        self.scroll.end();
    }

    /// Jump to the first row matching `query`
    pub fn search(&mut self, query: &str) -> Option<usize> {
        let found = self.adapter.as_ref()?.search(query)?;
        self.scroll.select(found);
        Some(found)
    }

    /// Jump to the next match after the cursor
    pub fn search_next(&mut self, query: &str) -> Option<usize> {
        let start = self.scroll.cursor().map_or(0, |c| c + 1);
        let found = self.adapter.as_ref()?.search_from(query, start)?;
        self.scroll.select(found);
        Some(found)
    }

    /// Render exactly `height` lines of exactly `width` columns
    pub fn render(&self, width: usize, height: usize) -> Vec<String> {
        let mut lines = Vec::with_capacity(height);

        match &self.adapter {
            None => {
                let warning = self.warning.as_deref().unwrap_or_default();
                lines.push(fit_to_width(&format!("! {warning}"), width));
            }
            Some(adapter) => {
                let scrollbar = usize::from(self.scroll.needs_scrollbar());
                let body_width = width.saturating_sub(2 + scrollbar);
                let widths = adapter.calculate_column_widths(body_width, WIDTH_SAMPLE_ROWS);

                let header = join_cells(adapter.field_names().iter().copied(), &widths);
                lines.push(fit_to_width(&format!("  {header}"), width));
                lines.push("\u{2500}".repeat(width));

                let range = self.scroll.visible_range();
                let room = height.saturating_sub(HEADER_LINES);
                let (thumb_start, thumb_len) = self.scroll.scrollbar_thumb(room);
                for (i, row) in range.take(room).enumerate() {
                    let marker = if Some(row) == self.scroll.cursor() { "> " } else { "  " };
                    let values = adapter.row_values(row);
                    let body = join_cells(values.iter().map(String::as_str), &widths);
                    let mut line = fit_to_width(&format!("{marker}{body}"), width.saturating_sub(scrollbar));
                    if scrollbar == 1 {
                        let in_thumb = (thumb_start..thumb_start + thumb_len).contains(&i);
                        line.push(if in_thumb { '\u{2588}' } else { '\u{2502}' });
                    }
                    lines.push(line);
                }
            }
        }

        lines.truncate(height);
        lines.resize(height, " ".repeat(width));
        lines
    }

    /// Status text: visible row range and total
    pub fn position_text(&self) -> String {
        let range = self.scroll.visible_range();
        if range.is_empty() {
            return "0 rows".to_string();
        }
        format!(
            "Rows {}-{} of {}",
            range.start + 1,
            range.end,
            self.row_count()
        )
    }
}

fn join_cells<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, w)| fit_to_width(&truncate_string(cell, *w), *w))
        .collect::<Vec<_>>()
        .join("\u{2502}")
}
