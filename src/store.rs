//! The atlas data store: loads both sources once and shares the result.

use std::{collections::HashMap, sync::Arc, time::Instant};

use once_cell::sync::OnceCell;

use crate::{
    backend::DataSource,
    codebook::{Codebook, CodebookColumns},
    column::ColumnKind,
    config::ViewerConfig,
    dataset::{ArrowDataset, Dataset, SourceFormat},
    error::{Error, Result},
    panel::{inspect_as, Details},
};

/// The loaded main table and codebook.
///
/// Read-only after construction. Column kinds are decided here once so
/// every panel classifies columns the same way.
#[derive(Debug, Clone)]
pub struct AtlasData {
    table: ArrowDataset,
    codebook: Codebook,
    kinds: HashMap<String, ColumnKind>,
}

impl AtlasData {
    /// Bundles a table with its codebook.
    pub fn new(table: ArrowDataset, codebook: Codebook) -> Self {
        let kinds = table
            .schema()
            .fields()
            .iter()
            .map(|f| (f.name().clone(), ColumnKind::from_field(f)))
            .collect();
        Self {
            table,
            codebook,
            kinds,
        }
    }

    /// The main table.
    pub fn table(&self) -> &ArrowDataset {
        &self.table
    }

    /// The codebook.
    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }

    /// Column names in table order.
    pub fn columns(&self) -> Vec<String> {
        self.table.column_names()
    }

    /// The kind of a column, if it exists.
    pub fn kind(&self, column: &str) -> Option<ColumnKind> {
        self.kinds.get(column).copied()
    }

    /// Inspects a column using the kind decided at load.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnNotFound`] if the table has no such column.
    pub fn inspect(&self, column: &str) -> Result<Details> {
        let kind = self
            .kind(column)
            .ok_or_else(|| Error::column_not_found(column))?;
        inspect_as(column, kind, &self.table, &self.codebook)
    }
}

/// Where the two atlas sources live.
#[derive(Debug, Clone)]
pub struct Sources {
    /// The main table.
    pub table: DataSource,
    /// The codebook.
    pub codebook: DataSource,
    /// Codebook delimiter byte.
    pub delimiter: u8,
    /// Codebook header names.
    pub columns: CodebookColumns,
}

impl Sources {
    /// Resolves both locations from a config.
    ///
    /// # Errors
    ///
    /// Returns an error if a location cannot be turned into a source.
    pub fn from_config(config: &ViewerConfig) -> Result<Self> {
        let timeout = config.http_timeout();
        Ok(Self {
            table: DataSource::from_location(&config.data_source, timeout)?,
            codebook: DataSource::from_location(&config.codebook_path, timeout)?,
            delimiter: config.delimiter_byte(),
            columns: config.codebook_columns.clone(),
        })
    }

    /// Fetches and parses both sources.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] naming the source that failed.
    pub fn load(&self) -> Result<AtlasData> {
        let started = Instant::now();

        let table = self.load_table().map_err(|e| {
            Error::load(format!("main table ({})", self.table.location()), e)
        })?;
        let codebook = self.load_codebook().map_err(|e| {
            Error::load(format!("codebook ({})", self.codebook.location()), e)
        })?;

        tracing::info!(features = ?codebook.features(), "codebook loaded");
        tracing::info!(columns = ?table.column_names(), rows = table.len(), "main table loaded");
        tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "atlas loaded");

        Ok(AtlasData::new(table, codebook))
    }

    fn load_table(&self) -> Result<ArrowDataset> {
        let format = SourceFormat::from_extension(self.table.extension())?;
        ArrowDataset::from_bytes(self.table.fetch()?, format)
    }

    fn load_codebook(&self) -> Result<Codebook> {
        Codebook::from_csv_bytes(&self.codebook.fetch()?, self.delimiter, &self.columns)
    }
}

/// Lazily loads the atlas once and hands out the shared snapshot.
///
/// Concurrent first callers block on a single load. A failed load is not
/// cached, so a later call tries again.
///
/// # Example
///
/// ```no_run
/// use cityatlas::{DataStore, ViewerConfig};
///
/// let store = DataStore::from_config(&ViewerConfig::default()).unwrap();
/// let data = store.get_or_load().unwrap();
/// println!("{} columns", data.columns().len());
/// ```
#[derive(Debug)]
pub struct DataStore {
    sources: Sources,
    cell: OnceCell<Arc<AtlasData>>,
}

impl DataStore {
    /// Creates an empty store over the given sources.
    pub fn new(sources: Sources) -> Self {
        Self {
            sources,
            cell: OnceCell::new(),
        }
    }

    /// Creates an empty store from a config.
    ///
    /// # Errors
    ///
    /// Returns an error if a location cannot be resolved.
    pub fn from_config(config: &ViewerConfig) -> Result<Self> {
        Ok(Self::new(Sources::from_config(config)?))
    }

    /// Returns the snapshot, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if either source fails.
    pub fn get_or_load(&self) -> Result<Arc<AtlasData>> {
        self.cell
            .get_or_try_init(|| self.sources.load().map(Arc::new))
            .map(Arc::clone)
    }

    /// True once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
