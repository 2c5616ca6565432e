//! Column selector: which columns the data table shows.

use crate::{
    dataset::{ArrowDataset, Dataset},
    error::Result,
};

/// Shown instead of the table when nothing is selected.
pub const EMPTY_SELECTION_WARNING: &str = "Please select at least one column to display.";

/// The first `n` columns, in table order.
pub fn default_selection(available: &[String], n: usize) -> Vec<String> {
    available.iter().take(n).cloned().collect()
}

/// The main table restricted to the selected columns.
#[derive(Debug, Clone)]
pub struct Projection {
    dataset: ArrowDataset,
}

impl Projection {
    /// Column names in table order.
    pub fn columns(&self) -> Vec<String> {
        self.dataset.column_names()
    }

    /// Number of rows, always the full table.
    pub fn num_rows(&self) -> usize {
        self.dataset.len()
    }

    /// The projected data.
    pub fn dataset(&self) -> &ArrowDataset {
        &self.dataset
    }

    /// Consumes the projection.
    pub fn into_dataset(self) -> ArrowDataset {
        self.dataset
    }
}

/// Outcome of a column selection.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Nothing to show; the message explains what to do.
    Empty {
        /// User-facing warning.
        warning: String,
    },
    /// The projected table.
    Table(Projection),
}

impl Selection {
    /// The projection, unless the selection is empty.
    pub fn projection(&self) -> Option<&Projection> {
        match self {
            Self::Table(p) => Some(p),
            Self::Empty { .. } => None,
        }
    }

    /// The warning, if the selection is empty.
    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Empty { warning } => Some(warning),
            Self::Table(_) => None,
        }
    }
}

/// Projects `table` onto the chosen columns.
///
/// Output columns follow the table's order, not the order of `chosen`.
/// Names that are not columns of the table are ignored; if none remain the
/// result is [`Selection::Empty`].
///
/// # Errors
///
/// Returns an error only if Arrow fails to project a batch.
pub fn select<S: AsRef<str>>(table: &ArrowDataset, chosen: &[S]) -> Result<Selection> {
    let columns: Vec<String> = table
        .column_names()
        .into_iter()
        .filter(|c| chosen.iter().any(|s| s.as_ref() == c))
        .collect();

    if columns.is_empty() {
        return Ok(Selection::Empty {
            warning: EMPTY_SELECTION_WARNING.to_string(),
        });
    }

    Ok(Selection::Table(Projection {
        dataset: table.project(columns.as_slice())?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ArrowDataset {
        ArrowDataset::from_csv_str(
            "city,population,temp_mean,green_pct,zone\nBerlin,3645000,10.3,30,A\nGhent,263000,11.0,21,B\nPorto,232000,15.8,,C\n",
        )
        .ok()
        .unwrap_or_else(|| panic!("Should parse table"))
    }

    #[test]
    fn test_default_selection_first_five() {
        let available: Vec<String> = ["a", "b", "c", "d", "e", "f"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(default_selection(&available, 5), available[..5].to_vec());
        assert_eq!(default_selection(&available[..2], 5), available[..2].to_vec());
    }

    #[test]
    fn test_select_native_order() {
        let selection = select(&table(), &["zone", "city", "temp_mean"])
            .ok()
            .unwrap_or_else(|| panic!("Should select"));
        let projection = selection
            .projection()
            .unwrap_or_else(|| panic!("Should have a table"));
        assert_eq!(projection.columns(), vec!["city", "temp_mean", "zone"]);
        assert_eq!(projection.num_rows(), 3);
    }

    #[test]
    fn test_select_empty_is_warning() {
        let chosen: [&str; 0] = [];
        let selection = select(&table(), &chosen)
            .ok()
            .unwrap_or_else(|| panic!("Empty selection should not be an error"));
        assert!(selection.projection().is_none());
        assert_eq!(selection.warning(), Some(EMPTY_SELECTION_WARNING));
    }

    #[test]
    fn test_select_unknown_names_ignored() {
        let selection = select(&table(), &["nope", "population"])
            .ok()
            .unwrap_or_else(|| panic!("Should select"));
        let columns = selection.projection().map(Projection::columns);
        assert_eq!(columns, Some(vec!["population".to_string()]));

        let only_unknown = select(&table(), &["nope"])
            .ok()
            .unwrap_or_else(|| panic!("Should select"));
        assert!(only_unknown.warning().is_some());
    }

    #[test]
    fn test_select_duplicates_collapse() {
        let selection = select(&table(), &["city", "city"])
            .ok()
            .unwrap_or_else(|| panic!("Should select"));
        let columns = selection.projection().map(Projection::columns);
        assert_eq!(columns, Some(vec!["city".to_string()]));
    }
}
