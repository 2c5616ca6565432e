//! Table adapter for TUI viewing
//!
//! Gives the table widget row/column access to a projected [`ArrowDataset`]
//! without caring how the rows are split into record batches.

use arrow::array::RecordBatch;
use arrow::datatypes::SchemaRef;

use super::error::{TuiError, TuiResult};
use super::format::{display_width, format_array_value};
use crate::dataset::{ArrowDataset, Dataset};

/// Widest a column is allowed to grow before truncation
const MAX_COLUMN_WIDTH: usize = 40;

/// Narrowest column the layout will produce
const MIN_COLUMN_WIDTH: usize = 3;

/// Row/column access to a dataset for rendering
#[derive(Debug, Clone)]
pub struct TableAdapter {
    batches: Vec<RecordBatch>,
    schema: SchemaRef,
    /// Row index at which each batch starts, plus the total row count
    batch_offsets: Vec<usize>,
}

impl TableAdapter {
    /// Create an adapter over every batch of `dataset`
    pub fn from_dataset(dataset: &ArrowDataset) -> Self {
        let batches = dataset.batches().to_vec();
        let mut batch_offsets = Vec::with_capacity(batches.len() + 1);
        let mut offset = 0;
        batch_offsets.push(offset);
        for batch in &batches {
            offset += batch.num_rows();
            batch_offsets.push(offset);
        }

        Self {
            batches,
            schema: dataset.schema(),
            batch_offsets,
        }
    }

    /// Schema of the adapted data
    #[inline]
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Total row count
    #[inline]
    pub fn row_count(&self) -> usize {
        self.batch_offsets.last().copied().unwrap_or(0)
    }

    /// Column count
    #[inline]
    pub fn column_count(&self) -> usize {
        self.schema.fields().len()
    }

    /// Column names in order
    pub fn field_names(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    /// Map a global row to (batch index, row within batch)
    pub fn locate_row(&self, row: usize) -> Option<(usize, usize)> {
        if row >= self.row_count() {
            return None;
        }
        // First batch whose end is past `row`; skips empty batches.
        let batch_idx = self.batch_offsets[1..].partition_point(|&end| end <= row);
        let start = self.batch_offsets.get(batch_idx).copied()?;
        Some((batch_idx, row - start))
    }

    /// Formatted cell value
    ///
    /// # Errors
    ///
    /// Returns an out-of-bounds error for a bad row or column, or
    /// [`TuiError::Unformattable`] if the value cannot be displayed.
    pub fn get_cell(&self, row: usize, col: usize) -> TuiResult<String> {
        if col >= self.column_count() {
            return Err(TuiError::ColumnOutOfBounds {
                column: col,
                columns: self.column_count(),
            });
        }
        let past_end = TuiError::RowOutOfBounds {
            row,
            rows: self.row_count(),
        };
        let (batch, local_row) = self
            .locate_row(row)
            .and_then(|(batch_idx, local_row)| Some((self.batches.get(batch_idx)?, local_row)))
            .ok_or_else(|| past_end.clone())?;

        format_array_value(batch.column(col).as_ref(), local_row)?.ok_or(past_end)
    }

    /// Every cell of one row, with unformattable cells shown as `?`
    pub fn row_values(&self, row: usize) -> Vec<String> {
        (0..self.column_count())
            .map(|col| self.get_cell(row, col).unwrap_or_else(|_| "?".to_string()))
            .collect()
    }

    /// Column widths fitted to `max_width`, sized from headers and the first
    /// `sample_rows` rows
    pub fn calculate_column_widths(&self, max_width: usize, sample_rows: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .field_names()
            .iter()
            .map(|name| display_width(name).min(MAX_COLUMN_WIDTH))
            .collect();
        if widths.is_empty() {
            return widths;
        }

        for row in 0..sample_rows.min(self.row_count()) {
            for (col, value) in self.row_values(row).iter().enumerate() {
                if let Some(w) = widths.get_mut(col) {
                    *w = (*w).max(display_width(value).min(MAX_COLUMN_WIDTH));
                }
            }
        }

        for w in &mut widths {
            *w = (*w).max(MIN_COLUMN_WIDTH);
        }

        let available = max_width.saturating_sub(widths.len() - 1);
        let total: usize = widths.iter().sum();
        if total > available && available > 0 {
            for w in &mut widths {
                *w = (*w * available / total).max(MIN_COLUMN_WIDTH);
            }
        }

        widths
    }

    /// First row at or after `start` with a cell containing `query`
    /// (case-insensitive), wrapping around to the top
    pub fn search_from(&self, query: &str, start: usize) -> Option<usize> {
        if query.is_empty() {
            return None;
        }
        let needle = query.to_lowercase();
        let rows = self.row_count();
        let start = start.min(rows);

        (start..rows).chain(0..start).find(|&row| {
            (0..self.column_count()).any(|col| {
                self.get_cell(row, col)
                    .is_ok_and(|value| value.to_lowercase().contains(&needle))
            })
        })
    }

    /// First matching row from the top
    pub fn search(&self, query: &str) -> Option<usize> {
        self.search_from(query, 0)
    }
}
