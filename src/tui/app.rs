//! Interactive viewer state
//!
//! [`ViewerApp`] owns the three panes (column checklist, data table and
//! column inspector) and turns key presses into state changes. It never
//! touches the terminal: the frontend feeds it [`Key`]s and draws whatever
//! [`ViewerApp::render_lines`] returns.

use std::sync::Arc;

use super::format::fit_to_width;
use super::inspector::InspectorPane;
use super::selector::ColumnChecklist;
use super::table::TableView;
use crate::config::ViewerConfig;
use crate::error::Result;
use crate::panel::{default_selection, select, summarize, Summary};
use crate::store::AtlasData;

/// Separator drawn between panes
const PANE_SEPARATOR: &str = " \u{2502} ";

/// Rows taken by the title bar and status bar
const CHROME_LINES: usize = 2;

/// Rows above the data in the table pane: pane title, header, rule
const TABLE_CHROME_LINES: usize = 3;

/// Keyboard input understood by the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Next pane
    Tab,
    /// Previous pane
    BackTab,
    /// Cursor up
    Up,
    /// Cursor down
    Down,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// First item
    Home,
    /// Last item
    End,
    /// Confirm
    Enter,
    /// Cancel, or quit outside a prompt
    Esc,
    /// Delete the last prompt character
    Backspace,
    /// Ctrl-C
    Interrupt,
    /// Printable character
    Char(char),
}

/// Pane receiving navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Column checklist
    Columns,
    /// Data table
    Table,
    /// Column information
    Inspector,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Columns => Self::Table,
            Self::Table => Self::Inspector,
            Self::Inspector => Self::Columns,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Columns => Self::Inspector,
            Self::Table => Self::Columns,
            Self::Inspector => Self::Table,
        }
    }
}

/// Terminal viewer over a loaded atlas
#[derive(Debug)]
pub struct ViewerApp {
    data: Arc<AtlasData>,
    title: String,
    table_height: usize,
    focus: Focus,
    checklist: ColumnChecklist,
    table: TableView,
    inspector: InspectorPane,
    inspected: Option<String>,
    summary: Summary,
    prompt: Option<String>,
    last_search: Option<String>,
    status: String,
    quit: bool,
}

impl ViewerApp {
    /// Open the viewer with the default column selection and the first
    /// column inspected
    ///
    /// # Errors
    ///
    /// Returns an error if the initial projection or inspection fails.
    pub fn new(data: Arc<AtlasData>, config: &ViewerConfig) -> Result<Self> {
        let columns = data.columns();
        let initial = default_selection(&columns, config.default_selection);
        let selection = select(data.table(), &initial)?;
        let summary = summarize(data.table());
        let inspected = columns.first().cloned();
        let details = inspected
            .as_deref()
            .map(|c| data.inspect(c))
            .transpose()?;

        Ok(Self {
            checklist: ColumnChecklist::new(columns, &initial, config.table_height),
            table: TableView::new(&selection, config.table_height),
            inspector: InspectorPane::new(details.as_ref(), Some(&summary)),
            inspected,
            summary,
            title: config.title.clone(),
            table_height: config.table_height,
            focus: Focus::Columns,
            prompt: None,
            last_search: None,
            status: String::new(),
            quit: false,
            data,
        })
    }

    /// Pane with focus
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Whether the user asked to leave
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Column shown in the inspector
    pub fn inspected(&self) -> Option<&str> {
        self.inspected.as_deref()
    }

    /// Columns currently shown in the table
    pub fn selected_columns(&self) -> Vec<String> {
        self.checklist.checked_columns()
    }

    /// The data table pane
    pub fn table(&self) -> &TableView {
        &self.table
    }

    /// Last status message
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Search text being typed, if the prompt is open
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Fit the panes to a terminal of `width` x `height`
    pub fn resize(&mut self, _width: usize, height: usize) {
        let body = height.saturating_sub(CHROME_LINES);
        let rows = body
            .saturating_sub(TABLE_CHROME_LINES)
            .min(self.table_height)
            .max(1);
        self.table.set_visible_rows(rows);
        self.checklist
            .scroll_mut()
            .set_visible(body.saturating_sub(1).max(1));
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: Key) {
        if key == Key::Interrupt {
            self.quit = true;
            return;
        }
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }

        match key {
            Key::Char('q') | Key::Esc => self.quit = true,
            Key::Tab => self.focus = self.focus.next(),
            Key::BackTab => self.focus = self.focus.prev(),
            Key::Char('/') => {
                self.prompt = Some(String::new());
                self.status.clear();
            }
            Key::Char('n') => {
                if let Some(query) = self.last_search.clone() {
                    self.run_search(&query, true);
                }
            }
            _ => match self.focus {
                Focus::Columns => self.handle_columns_key(key),
                Focus::Table => self.handle_table_key(key),
                Focus::Inspector => self.handle_inspector_key(key),
            },
        }
    }

    fn handle_prompt_key(&mut self, key: Key) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match key {
            Key::Char(c) => prompt.push(c),
            Key::Backspace => {
                prompt.pop();
            }
            Key::Esc => self.prompt = None,
            Key::Enter => {
                let query = std::mem::take(prompt);
                self.prompt = None;
                if !query.is_empty() {
                    self.run_search(&query, false);
                    self.last_search = Some(query);
                }
            }
            _ => {}
        }
    }

    fn run_search(&mut self, query: &str, next: bool) {
        let found = if next {
            self.table.search_next(query)
        } else {
            self.table.search(query)
        };
        self.status = match found {
            Some(row) => {
                self.focus = Focus::Table;
                format!("Match at row {}", row + 1)
            }
            None => format!("No match for '{query}'"),
        };
    }

    fn handle_columns_key(&mut self, key: Key) {
        match key {
            Key::Down | Key::Char('j') => self.checklist.scroll_mut().next(),
            Key::Up | Key::Char('k') => self.checklist.scroll_mut().prev(),
            Key::PageDown => self.checklist.scroll_mut().page_down(),
            Key::PageUp => self.checklist.scroll_mut().page_up(),
            Key::Home => self.checklist.scroll_mut().home(),
            Key::End => self.checklist.scroll_mut().end(),
            Key::Char(' ') => {
                if self.checklist.toggle().is_some() {
                    self.refresh_table();
                }
            }
            Key::Enter => {
                if let Some(column) = self.checklist.highlighted().map(String::from) {
                    self.inspect_column(&column);
                }
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: Key) {
        match key {
            Key::Down | Key::Char('j') => self.table.select_next(),
            Key::Up | Key::Char('k') => self.table.select_prev(),
            Key::PageDown => self.table.page_down(),
            Key::PageUp => self.table.page_up(),
            Key::Home => self.table.home(),
            Key::End => self.table.end(),
            _ => {}
        }
    }

    fn handle_inspector_key(&mut self, key: Key) {
        match key {
            Key::Down | Key::Char('j') => self.inspector.scroll_down(),
            Key::Up | Key::Char('k') => self.inspector.scroll_up(),
            Key::Home => self.inspector.home(),
            _ => {}
        }
    }

    fn refresh_table(&mut self) {
        let chosen = self.checklist.checked_columns();
        match select(self.data.table(), &chosen) {
            Ok(selection) => {
                self.table.set_selection(&selection);
                self.status = selection.warning().unwrap_or_default().to_string();
            }
            Err(e) => self.status = format!("Error: {e}"),
        }
    }

    fn inspect_column(&mut self, column: &str) {
        match self.data.inspect(column) {
            Ok(details) => {
                self.inspector = InspectorPane::new(Some(&details), Some(&self.summary));
                self.inspected = Some(column.to_string());
                self.status = format!("Inspecting '{column}'");
            }
            Err(e) => self.status = format!("Error: {e}"),
        }
    }

    /// Render the whole screen: title bar, panes and status bar
    ///
    /// Returns exactly `height` lines, each exactly `width` columns wide.
    pub fn render_lines(&self, width: usize, height: usize) -> Vec<String> {
        if height == 0 {
            return Vec::new();
        }

        let mut lines = Vec::with_capacity(height);
        lines.push(fit_to_width(&self.title_text(), width));

        let body = height.saturating_sub(CHROME_LINES);
        if body > 0 {
            let separators = 2 * PANE_SEPARATOR.chars().count();
            let left = (width / 4).clamp(12, 30).min(width);
            let right = (width / 3).clamp(20, 48).min(width.saturating_sub(left));
            let center = width.saturating_sub(left + right + separators);
            let inner = body - 1;

            let columns = self.pane(Focus::Columns, "Columns", left, self.checklist.render(left, inner));
            let table = self.pane(Focus::Table, "Data Table", center, self.table.render(center, inner));
            let info = self.pane(
                Focus::Inspector,
                "Column Information",
                right,
                self.inspector.render(right, inner),
            );

            for ((l, c), r) in columns.iter().zip(&table).zip(&info) {
                let joined = format!("{l}{PANE_SEPARATOR}{c}{PANE_SEPARATOR}{r}");
                lines.push(fit_to_width(&joined, width));
            }
        }

        if height > 1 {
            lines.push(fit_to_width(&self.status_text(), width));
        }
        lines
    }

    fn pane(&self, focus: Focus, title: &str, width: usize, body: Vec<String>) -> Vec<String> {
        let heading = if self.focus == focus {
            format!("[{title}]")
        } else {
            format!(" {title} ")
        };
        std::iter::once(fit_to_width(&heading, width))
            .chain(body)
            .collect()
    }

    fn title_text(&self) -> String {
        format!(
            " {} | {} rows | {} columns",
            self.title,
            self.summary.rows,
            self.summary.columns
        )
    }

    fn status_text(&self) -> String {
        if let Some(prompt) = &self.prompt {
            return format!("Search: {prompt}");
        }
        let hints = "Tab pane | Space toggle | Enter inspect | / search | q quit";
        if self.status.is_empty() {
            format!(" {} | {hints}", self.table.position_text())
        } else {
            format!(" {} | {} | {hints}", self.status, self.table.position_text())
        }
    }
}
