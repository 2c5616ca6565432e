//! Column information and dataset summary pane
//!
//! Renders the inspector [`Details`] for one column, optionally followed by
//! the dataset [`Summary`], as scrollable text.

use super::format::{display_width, fit_to_width, wrap_text};
use crate::panel::{Details, Summary, NO_METADATA_PLACEHOLDER};
use crate::stats::ColumnStatistics;

/// A logical line before wrapping: an optional label plus text
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    label: Option<String>,
    text: String,
}

impl Entry {
    fn text(text: impl Into<String>) -> Self {
        Self {
            label: None,
            text: text.into(),
        }
    }

    fn labeled(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            text: text.into(),
        }
    }

    fn blank() -> Self {
        Self::text("")
    }
}

/// Scrollable text describing the inspected column
#[derive(Debug, Clone, Default)]
pub struct InspectorPane {
    entries: Vec<Entry>,
    offset: usize,
}

impl InspectorPane {
    /// Build the pane from whichever sections are given
    pub fn new(details: Option<&Details>, summary: Option<&Summary>) -> Self {
        let mut entries = Vec::new();
        if let Some(details) = details {
            push_details(&mut entries, details);
        }
        if let Some(summary) = summary {
            if !entries.is_empty() {
                entries.push(Entry::blank());
            }
            entries.push(Entry::text("Dataset Summary"));
            entries.extend(summary.lines().into_iter().map(Entry::text));
        }

        Self { entries, offset: 0 }
    }

    /// Scroll down one line
    pub fn scroll_down(&mut self) {
        self.offset = (self.offset + 1).min(self.entries.len().saturating_sub(1));
    }

    /// Scroll up one line
    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    /// Back to the top
    pub fn home(&mut self) {
        self.offset = 0;
    }

    /// Wrapped lines for a pane `width` columns wide
    pub fn wrapped_lines(&self, width: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for entry in &self.entries {
            let line = match &entry.label {
                None => entry.text.clone(),
                Some(label) if entry.text.is_empty() => format!("{label}: -"),
                Some(label) => format!("{label}: {}", entry.text),
            };
            if display_width(&line) <= width {
                lines.push(line);
            } else {
                lines.extend(wrap_text(&line, width));
            }
        }
        lines
    }

    /// Render exactly `height` lines of exactly `width` columns
    pub fn render(&self, width: usize, height: usize) -> Vec<String> {
        let lines = self.wrapped_lines(width);
        let start = self.offset.min(lines.len().saturating_sub(height));
        let mut out: Vec<String> = lines
            .iter()
            .skip(start)
            .take(height)
            .map(|l| fit_to_width(l, width))
            .collect();
        out.resize(height, " ".repeat(width));
        out
    }
}

fn push_details(entries: &mut Vec<Entry>, details: &Details) {
    entries.push(Entry::labeled("Column", details.column.clone()));
    entries.push(Entry::labeled(
        "Kind",
        format!("{} ({})", details.kind, details.data_type),
    ));
    entries.push(Entry::blank());

    match details.fields() {
        Some(fields) => {
            for (label, value) in fields {
                entries.push(Entry::labeled(label, value));
            }
            for link in details.links() {
                entries.push(Entry::labeled(link.label, link.url));
            }
        }
        None => entries.push(Entry::text(NO_METADATA_PLACEHOLDER)),
    }
    entries.push(Entry::blank());

    entries.push(Entry::text("Column Statistics"));
    match &details.statistics {
        ColumnStatistics::Numeric(summary) => {
            for (label, value) in summary.rows() {
                entries.push(Entry::text(format!("  {label:<6} {value:>16}")));
            }
        }
        ColumnStatistics::Categorical(counts) => {
            entries.push(Entry::labeled("Data type", counts.data_type.to_string()));
            entries.push(Entry::labeled("Unique values", counts.unique.to_string()));
            entries.push(Entry::labeled("Missing values", counts.missing.to_string()));
        }
    }
}
