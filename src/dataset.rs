//! The main atlas table.
//!
//! [`ArrowDataset`] holds the table in memory as Arrow record batches and
//! knows how to build itself from each supported [`SourceFormat`]. The
//! [`Dataset`] trait is the read-only view the panels work against.

use std::{io::Cursor, sync::Arc};

use arrow::{
    array::{ArrayRef, RecordBatch},
    datatypes::SchemaRef,
};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::{
    error::{Error, Result},
    geo,
};

/// Read-only tabular data shared between threads.
pub trait Dataset: Send + Sync {
    /// Number of rows.
    fn len(&self) -> usize;

    /// True if there are no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The schema shared by every batch.
    fn schema(&self) -> SchemaRef;

    /// The record batches in row order.
    fn iter(&self) -> Box<dyn Iterator<Item = RecordBatch> + Send + '_>;
}

/// File formats the main table can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// GeoJSON FeatureCollection (`.geojson`, `.json`).
    GeoJson,
    /// Comma-separated values (`.csv`).
    Csv,
    /// Apache Parquet (`.parquet`).
    Parquet,
}

impl SourceFormat {
    /// Picks the format for a lowercased file extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for any other extension, or if
    /// there is none.
    pub fn from_extension(extension: Option<&str>) -> Result<Self> {
        match extension {
            Some("geojson" | "json") => Ok(Self::GeoJson),
            Some("csv") => Ok(Self::Csv),
            Some("parquet") => Ok(Self::Parquet),
            Some(other) => Err(Error::unsupported_format(other)),
            None => Err(Error::unsupported_format("<no extension>")),
        }
    }
}

/// An in-memory dataset backed by Arrow RecordBatches.
///
/// Row order is the order of the source file and is never changed. Column
/// names are unique.
///
/// # Example
///
/// ```
/// use cityatlas::{ArrowDataset, Dataset};
///
/// let dataset = ArrowDataset::from_csv_str("city,population\nGhent,263000\n").unwrap();
/// assert_eq!(dataset.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ArrowDataset {
    batches: Vec<RecordBatch>,
    schema: SchemaRef,
    row_count: usize,
}

impl ArrowDataset {
    /// Wraps record batches that share one schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDataset`] for no batches, or
    /// [`Error::SchemaMismatch`] if the schemas differ or two columns share
    /// a name.
    pub fn new(batches: Vec<RecordBatch>) -> Result<Self> {
        let Some(first) = batches.first() else {
            return Err(Error::EmptyDataset);
        };
        let schema = first.schema();

        for (i, batch) in batches.iter().enumerate().skip(1) {
            if batch.schema() != schema {
                return Err(Error::schema_mismatch(format!(
                    "batch {i} does not match the schema of batch 0"
                )));
            }
        }

        let fields = schema.fields();
        for (i, field) in fields.iter().enumerate() {
            if fields.iter().skip(i + 1).any(|f| f.name() == field.name()) {
                return Err(Error::schema_mismatch(format!(
                    "Duplicate column name '{}'",
                    field.name()
                )));
            }
        }

        let row_count = batches.iter().map(|b| b.num_rows()).sum();

        Ok(Self {
            batches,
            schema,
            row_count,
        })
    }

    /// Wraps a single record batch.
    ///
    /// # Errors
    ///
    /// Returns an error if two columns share a name.
    pub fn from_batch(batch: RecordBatch) -> Result<Self> {
        Self::new(vec![batch])
    }

    /// Loads a dataset from raw bytes in the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be parsed or hold no rows.
    pub fn from_bytes(data: Bytes, format: SourceFormat) -> Result<Self> {
        match format {
            SourceFormat::GeoJson => Self::from_geojson_bytes(&data),
            SourceFormat::Csv => Self::from_csv_bytes(&data, CsvOptions::default()),
            SourceFormat::Parquet => Self::from_parquet_bytes(data),
        }
    }

    /// Loads a dataset from a GeoJSON FeatureCollection.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or has no features.
    pub fn from_geojson_bytes(data: &[u8]) -> Result<Self> {
        Self::from_batch(geo::read_feature_collection(data)?)
    }

    /// Loads a dataset from Parquet bytes in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not valid Parquet.
    pub fn from_parquet_bytes(data: Bytes) -> Result<Self> {
        let reader = ParquetRecordBatchReaderBuilder::try_new(data)?.build()?;
        let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
        tracing::debug!(batches = batches.len(), "decoded parquet table");
        Self::new(batches)
    }

    /// Loads a dataset from CSV bytes with options.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the data holds no rows.
    pub fn from_csv_bytes(data: &[u8], options: CsvOptions) -> Result<Self> {
        use arrow_csv::{reader::Format, ReaderBuilder};

        let format = Format::default()
            .with_header(true)
            .with_delimiter(options.delimiter);
        let (schema, _) = format.infer_schema(Cursor::new(data), options.infer_records)?;

        let reader = ReaderBuilder::new(Arc::new(schema))
            .with_format(format)
            .with_batch_size(options.batch_size)
            .build(Cursor::new(data))?;
        let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

        Self::new(batches)
    }

    /// Loads a dataset from a CSV string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid CSV.
    pub fn from_csv_str(data: &str) -> Result<Self> {
        Self::from_csv_bytes(data.as_bytes(), CsvOptions::default())
    }

    /// Returns the underlying batches.
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Number of declared columns.
    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    /// Returns every chunk of the named column, one per batch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnNotFound`] if no column has this name.
    pub fn column_chunks(&self, name: &str) -> Result<Vec<ArrayRef>> {
        let index = self
            .schema
            .index_of(name)
            .map_err(|_| Error::column_not_found(name))?;
        Ok(self
            .batches
            .iter()
            .map(|b| Arc::clone(b.column(index)))
            .collect())
    }

    /// Keeps only the named columns, in table order, and every row.
    ///
    /// Names that do not match a column are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if no name matches a column.
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> Result<Self> {
        let indices: Vec<usize> = self
            .schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| columns.iter().any(|c| c.as_ref() == f.name()))
            .map(|(i, _)| i)
            .collect();

        if indices.is_empty() {
            return Err(Error::invalid_config("Projection selects no columns"));
        }

        let batches = self
            .batches
            .iter()
            .map(|b| b.project(&indices).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;

        Self::new(batches)
    }
}

impl Dataset for ArrowDataset {
    fn len(&self) -> usize {
        self.row_count
    }

    fn schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = RecordBatch> + Send + '_> {
        Box::new(self.batches.iter().cloned())
    }
}

/// How a CSV main table is read.
///
/// Column types are inferred from the leading records; the header row is
/// always required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Records sampled for type inference; all of them if `None`.
    pub infer_records: Option<usize>,
    /// Rows per record batch.
    pub batch_size: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_records: Some(1000),
            batch_size: 8192,
        }
    }
}

impl CsvOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

#[cfg(test)]
#[allow(clippy::uninlined_format_args)]
mod tests {
    use arrow::{
        array::{Float64Array, Int64Array, StringArray},
        datatypes::{DataType, Field, Schema},
    };
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn cities_batch(names: &[&str]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("city", DataType::Utf8, false),
            Field::new("population", DataType::Int64, true),
            Field::new("temp_mean", DataType::Float64, true),
        ]));
        let population: Vec<Option<i64>> = (0..names.len()).map(|i| Some(i as i64 * 1000)).collect();
        let temp: Vec<Option<f64>> = (0..names.len()).map(|i| Some(i as f64 + 0.5)).collect();

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(names.to_vec())),
                Arc::new(Int64Array::from(population)),
                Arc::new(Float64Array::from(temp)),
            ],
        )
        .ok()
        .unwrap_or_else(|| panic!("Failed to create test batch"))
    }

    fn dataset(batches: Vec<RecordBatch>) -> ArrowDataset {
        ArrowDataset::new(batches)
            .ok()
            .unwrap_or_else(|| panic!("Should create dataset"))
    }

    #[test]
    fn test_new_dataset() {
        let ds = dataset(vec![cities_batch(&["Berlin", "Ghent", "Porto"])]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.num_columns(), 3);
        assert_eq!(ds.column_names(), vec!["city", "population", "temp_mean"]);
    }

    #[test]
    fn test_empty_dataset_error() {
        let result = ArrowDataset::new(vec![]);
        assert!(matches!(result, Err(Error::EmptyDataset)));
    }

    #[test]
    fn test_schema_mismatch_error() {
        let other = RecordBatch::try_new(
            Arc::new(Schema::new(vec![Field::new("x", DataType::Int64, false)])),
            vec![Arc::new(Int64Array::from(vec![1]))],
        )
        .ok()
        .unwrap_or_else(|| panic!("Should create batch"));
        let result = ArrowDataset::new(vec![cities_batch(&["Berlin"]), other]);
        assert!(matches!(result, Err(Error::SchemaMismatch { .. })));
    }

    #[test]
    fn test_duplicate_column_names_rejected() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("a", DataType::Int64, false),
            Field::new("a", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1])),
                Arc::new(Int64Array::from(vec![2])),
            ],
        )
        .ok()
        .unwrap_or_else(|| panic!("Should create batch"));
        assert!(matches!(
            ArrowDataset::from_batch(batch),
            Err(Error::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_small_batches_keep_row_order() {
        let options = CsvOptions::new().with_batch_size(2);
        let ds = ArrowDataset::from_csv_bytes(b"city\nBerlin\nGhent\nPorto\n", options)
            .ok()
            .unwrap_or_else(|| panic!("Should parse CSV"));
        assert_eq!(ds.batches().len(), 2);
        let last = ds.batches()[1]
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(0).to_string());
        assert_eq!(last.as_deref(), Some("Porto"));
    }

    #[test]
    fn test_project_keeps_native_order() {
        let ds = dataset(vec![cities_batch(&["Berlin", "Ghent"])]);
        let projected = ds
            .project(&["temp_mean", "city"])
            .ok()
            .unwrap_or_else(|| panic!("Should project"));
        assert_eq!(projected.column_names(), vec!["city", "temp_mean"]);
        assert_eq!(projected.len(), 2);
    }

    #[test]
    fn test_project_ignores_unknown() {
        let ds = dataset(vec![cities_batch(&["Berlin"])]);
        let projected = ds
            .project(&["population", "nope"])
            .ok()
            .unwrap_or_else(|| panic!("Should project"));
        assert_eq!(projected.column_names(), vec!["population"]);
        assert!(ds.project(&["nope"]).is_err());
    }

    #[test]
    fn test_column_chunks() {
        let ds = dataset(vec![cities_batch(&["A", "B"]), cities_batch(&["C"])]);
        let chunks = ds
            .column_chunks("population")
            .ok()
            .unwrap_or_else(|| panic!("Should find column"));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.iter().map(|c| c.len()).sum::<usize>(), 3);
        assert!(matches!(
            ds.column_chunks("missing"),
            Err(Error::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_from_csv_str() {
        let ds = ArrowDataset::from_csv_str("city,population,temp_mean\nBerlin,3645000,10.3\nGhent,,11.0\n")
            .ok()
            .unwrap_or_else(|| panic!("Should parse CSV"));
        assert_eq!(ds.len(), 2);
        let schema = ds.schema();
        assert_eq!(
            schema.field(1).data_type(),
            &DataType::Int64,
            "FALSIFIED: population should be inferred as Int64"
        );
    }

    #[test]
    fn test_from_csv_bytes_with_delimiter() {
        let options = CsvOptions::new().with_delimiter(b';');
        let ds = ArrowDataset::from_csv_bytes(b"a;b\n1;x\n2;y\n", options)
            .ok()
            .unwrap_or_else(|| panic!("Should parse CSV"));
        assert_eq!(ds.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_from_csv_header_only_is_empty() {
        let result = ArrowDataset::from_csv_str("a,b\n");
        assert!(matches!(result, Err(Error::EmptyDataset)));
    }

    #[test]
    fn test_from_parquet_bytes() {
        let batch = cities_batch(&["Berlin", "Ghent"]);
        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), None)
            .ok()
            .unwrap_or_else(|| panic!("Should create writer"));
        writer
            .write(&batch)
            .ok()
            .unwrap_or_else(|| panic!("Should write"));
        writer
            .close()
            .ok()
            .unwrap_or_else(|| panic!("Should close"));

        let ds = ArrowDataset::from_bytes(Bytes::from(buffer), SourceFormat::Parquet)
            .ok()
            .unwrap_or_else(|| panic!("Should read parquet"));
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names(), vec!["city", "population", "temp_mean"]);
    }

    #[test]
    fn test_from_parquet_bytes_invalid() {
        let result = ArrowDataset::from_parquet_bytes(Bytes::from_static(b"not parquet"));
        assert!(matches!(result, Err(Error::Parquet(_))));
    }

    #[test]
    fn test_from_geojson_bytes() {
        let json = br#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"city":"Ghent"},"geometry":{"type":"Point","coordinates":[3.7,51.05]}}
        ]}"#;
        let ds = ArrowDataset::from_bytes(Bytes::from_static(json), SourceFormat::GeoJson)
            .ok()
            .unwrap_or_else(|| panic!("Should read GeoJSON"));
        assert_eq!(ds.column_names(), vec!["city", "geometry"]);
    }

    #[test]
    fn test_source_format_from_extension() {
        assert_eq!(
            SourceFormat::from_extension(Some("geojson")).ok(),
            Some(SourceFormat::GeoJson)
        );
        assert_eq!(
            SourceFormat::from_extension(Some("json")).ok(),
            Some(SourceFormat::GeoJson)
        );
        assert_eq!(
            SourceFormat::from_extension(Some("csv")).ok(),
            Some(SourceFormat::Csv)
        );
        assert_eq!(
            SourceFormat::from_extension(Some("parquet")).ok(),
            Some(SourceFormat::Parquet)
        );
        assert!(matches!(
            SourceFormat::from_extension(Some("shp")),
            Err(Error::UnsupportedFormat { .. })
        ));
        assert!(SourceFormat::from_extension(None).is_err());
    }

    #[test]
    fn test_iter_yields_all_batches() {
        let ds = dataset(vec![cities_batch(&["A"]), cities_batch(&["B", "C"])]);
        let rows: usize = ds.iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 3);
    }
}
