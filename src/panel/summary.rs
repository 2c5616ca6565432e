//! Dataset-wide summary.

use crate::{
    column::missing_count,
    dataset::{ArrowDataset, Dataset},
};

/// Row, column and missing-cell totals for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Number of rows.
    pub rows: usize,
    /// Number of declared columns.
    pub columns: usize,
    /// Missing cells summed over every column.
    pub missing: usize,
}

impl Summary {
    /// Display lines, with the row count digit-grouped.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Total rows: {}", group_thousands(self.rows)),
            format!("Total columns: {}", self.columns),
            format!("Missing values: {}", self.missing),
        ]
    }
}

/// Summarizes a table.
pub fn summarize(table: &ArrowDataset) -> Summary {
    let missing = table
        .iter()
        .flat_map(|batch| {
            batch
                .columns()
                .iter()
                .map(|c| missing_count(c.as_ref()))
                .collect::<Vec<_>>()
        })
        .sum();

    Summary {
        rows: table.len(),
        columns: table.num_columns(),
        missing,
    }
}

/// Formats `n` with comma thousands separators.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
