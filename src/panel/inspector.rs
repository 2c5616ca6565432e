//! Column inspector: codebook metadata and statistics for one column.

use arrow::datatypes::DataType;

use crate::{
    codebook::{Codebook, CodebookEntry},
    column::ColumnKind,
    dataset::{ArrowDataset, Dataset},
    error::{Error, Result},
    stats::ColumnStatistics,
};

/// Shown in place of codebook fields when a column has no entry.
pub const NO_METADATA_PLACEHOLDER: &str = "No metadata available for this column.";

/// Codebook metadata for the inspected column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataState {
    /// The first codebook entry whose `feature` matches.
    Found(CodebookEntry),
    /// No entry matches; statistics are still shown.
    Missing,
}

impl MetadataState {
    /// The entry, if found.
    pub fn entry(&self) -> Option<&CodebookEntry> {
        match self {
            Self::Found(entry) => Some(entry),
            Self::Missing => None,
        }
    }
}

/// A labeled outbound link from the metadata card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Link text.
    pub label: &'static str,
    /// Target, exactly as written in the codebook.
    pub url: String,
}

/// Everything the inspector panel shows for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Details {
    /// Column name.
    pub column: String,
    /// Column kind.
    pub kind: ColumnKind,
    /// Declared Arrow type.
    pub data_type: DataType,
    /// Codebook metadata.
    pub metadata: MetadataState,
    /// Column statistics.
    pub statistics: ColumnStatistics,
}

impl Details {
    /// Labeled metadata fields in display order, or `None` when missing.
    pub fn fields(&self) -> Option<Vec<(&'static str, &str)>> {
        let entry = self.metadata.entry()?;
        Some(vec![
            ("Name", entry.feature_name.as_str()),
            ("Description", entry.feature_description.as_str()),
            ("Processing method", entry.processing_method.as_str()),
            ("Source dataset", entry.source_dataset.as_str()),
            ("Unit", entry.unit.as_str()),
            ("Reference year", entry.reference_year.as_str()),
            ("Data type", entry.data_type.as_str()),
            ("Contains null values", entry.contains_null.as_str()),
            ("Remarks", entry.remarks.as_str()),
        ])
    }

    /// Links to the source dataset and processing notebook; empty targets
    /// are skipped.
    pub fn links(&self) -> Vec<Link> {
        let Some(entry) = self.metadata.entry() else {
            return Vec::new();
        };
        [
            ("Source dataset", &entry.source_dataset),
            ("View Processing Notebook on GitHub", &entry.notebook_path),
        ]
        .into_iter()
        .filter(|(_, url)| !url.is_empty())
        .map(|(label, url)| Link {
            label,
            url: url.clone(),
        })
        .collect()
    }
}

/// Inspects one column of the main table.
///
/// A column without a codebook entry yields [`MetadataState::Missing`]
/// rather than an error.
///
/// # Errors
///
/// Returns [`Error::ColumnNotFound`] if the table has no such column.
pub fn inspect(column: &str, table: &ArrowDataset, codebook: &Codebook) -> Result<Details> {
    let schema = table.schema();
    let field = schema
        .field_with_name(column)
        .map_err(|_| Error::column_not_found(column))?;
    inspect_as(column, ColumnKind::from_field(field), table, codebook)
}

/// Inspects one column whose kind was already decided, as
/// [`crate::AtlasData`] does at load time.
///
/// # Errors
///
/// Returns [`Error::ColumnNotFound`] if the table has no such column.
pub fn inspect_as(
    column: &str,
    kind: ColumnKind,
    table: &ArrowDataset,
    codebook: &Codebook,
) -> Result<Details> {
    let schema = table.schema();
    let data_type = schema
        .field_with_name(column)
        .map_err(|_| Error::column_not_found(column))?
        .data_type()
        .clone();

    let metadata = match codebook.lookup(column) {
        Some(entry) => MetadataState::Found(entry.clone()),
        None => {
            tracing::warn!(column, "no codebook entry for column");
            MetadataState::Missing
        }
    };

    let chunks = table.column_chunks(column)?;
    let statistics = ColumnStatistics::compute(kind, &data_type, &chunks)?;

    Ok(Details {
        column: column.to_string(),
        kind,
        data_type,
        metadata,
        statistics,
    })
}
