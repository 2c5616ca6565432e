//! The codebook: one metadata record per atlas column.

use std::{io::Cursor, sync::Arc};

use arrow::{
    array::{Array, AsArray, RecordBatch},
    datatypes::{DataType, Field, Schema},
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Metadata describing one column of the main table.
///
/// Every field is kept verbatim as text; missing cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodebookEntry {
    /// Join key: the column name in the main table.
    pub feature: String,
    /// Human-readable name.
    pub feature_name: String,
    /// Free-text description.
    pub feature_description: String,
    /// Where the data came from, usually a URL.
    pub source_dataset: String,
    /// How the values were derived.
    pub processing_method: String,
    /// Unit of measurement.
    pub unit: String,
    /// Year the values refer to.
    pub reference_year: String,
    /// Declared data type.
    pub data_type: String,
    /// Whether the column may contain nulls.
    pub contains_null: String,
    /// Free-text remarks.
    pub remarks: String,
    /// Link to the processing notebook.
    pub notebook_path: String,
}

/// Header names used to find each [`CodebookEntry`] field in the file.
///
/// Only `feature` has to be present; other absent headers yield empty
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodebookColumns {
    /// Header of the `feature` column.
    pub feature: String,
    /// Header of the `feature_name` column.
    pub feature_name: String,
    /// Header of the `feature_description` column.
    pub feature_description: String,
    /// Header of the `source_dataset` column.
    pub source_dataset: String,
    /// Header of the `processing_method` column.
    pub processing_method: String,
    /// Header of the `unit` column.
    pub unit: String,
    /// Header of the `reference_year` column.
    pub reference_year: String,
    /// Header of the `data_type` column.
    pub data_type: String,
    /// Header of the `contains_null` column.
    pub contains_null: String,
    /// Header of the `remarks` column.
    pub remarks: String,
    /// Header of the `notebook_path` column.
    pub notebook_path: String,
}

impl Default for CodebookColumns {
    fn default() -> Self {
        Self {
            feature: "feature".into(),
            feature_name: "feature_name".into(),
            feature_description: "feature_description".into(),
            source_dataset: "source_dataset".into(),
            processing_method: "processing_method".into(),
            unit: "unit".into(),
            reference_year: "reference_year".into(),
            data_type: "data_type".into(),
            contains_null: "contains_null".into(),
            remarks: "remarks".into(),
            notebook_path: "notebook_path".into(),
        }
    }
}

/// The parsed codebook, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codebook {
    entries: Vec<CodebookEntry>,
}

impl Codebook {
    /// Wraps already-built entries.
    pub fn new(entries: Vec<CodebookEntry>) -> Self {
        Self { entries }
    }

    /// Parses delimited text with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid delimited data or has no
    /// column named `columns.feature`.
    pub fn from_csv_bytes(data: &[u8], delimiter: u8, columns: &CodebookColumns) -> Result<Self> {
        use arrow_csv::{reader::Format, ReaderBuilder};

        let format = Format::default()
            .with_header(true)
            .with_delimiter(delimiter);
        let (inferred, _) = format
            .infer_schema(Cursor::new(data), Some(1000))
            .map_err(Error::Arrow)?;

        // Read every cell as text so values like "2018" stay verbatim.
        let schema = Arc::new(Schema::new(
            inferred
                .fields()
                .iter()
                .map(|f| Field::new(f.name(), DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ));

        if schema.index_of(&columns.feature).is_err() {
            return Err(Error::parse(format!(
                "Codebook has no '{}' column",
                columns.feature
            )));
        }

        let reader = ReaderBuilder::new(Arc::clone(&schema))
            .with_header(true)
            .with_delimiter(delimiter)
            .build(Cursor::new(data))
            .map_err(Error::Arrow)?;

        let mut entries = Vec::new();
        for batch in reader {
            let batch = batch.map_err(Error::Arrow)?;
            entries.extend(entries_from_batch(&batch, columns));
        }

        for (header, name) in [
            (&columns.feature_name, "feature_name"),
            (&columns.feature_description, "feature_description"),
            (&columns.source_dataset, "source_dataset"),
            (&columns.processing_method, "processing_method"),
            (&columns.unit, "unit"),
            (&columns.reference_year, "reference_year"),
            (&columns.data_type, "data_type"),
            (&columns.contains_null, "contains_null"),
            (&columns.remarks, "remarks"),
            (&columns.notebook_path, "notebook_path"),
        ] {
            if schema.index_of(header).is_err() {
                tracing::warn!(header = %header, field = name, "codebook column not found");
            }
        }

        Ok(Self { entries })
    }

    /// Finds the first entry whose `feature` equals `column`.
    pub fn lookup(&self, column: &str) -> Option<&CodebookEntry> {
        self.entries.iter().find(|e| e.feature == column)
    }

    /// Feature names in file order.
    pub fn features(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.feature.as_str()).collect()
    }

    /// All entries in file order.
    pub fn entries(&self) -> &[CodebookEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entries_from_batch(batch: &RecordBatch, columns: &CodebookColumns) -> Vec<CodebookEntry> {
    let text = |header: &str, row: usize| -> String {
        batch
            .column_by_name(header)
            .and_then(|c| c.as_string_opt::<i32>())
            .filter(|c| !c.is_null(row))
            .map(|c| c.value(row).to_string())
            .unwrap_or_default()
    };

    (0..batch.num_rows())
        .map(|row| CodebookEntry {
            feature: text(&columns.feature, row),
            feature_name: text(&columns.feature_name, row),
            feature_description: text(&columns.feature_description, row),
            source_dataset: text(&columns.source_dataset, row),
            processing_method: text(&columns.processing_method, row),
            unit: text(&columns.unit, row),
            reference_year: text(&columns.reference_year, row),
            data_type: text(&columns.data_type, row),
            contains_null: text(&columns.contains_null, row),
            remarks: text(&columns.remarks, row),
            notebook_path: text(&columns.notebook_path, row),
        })
        .collect()
}
