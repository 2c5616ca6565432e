//! Error types for cityatlas.

use std::path::PathBuf;

/// Result type alias for cityatlas operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading, inspecting or displaying the atlas.
///
/// Panel-level conditions that the viewer recovers from (an empty column
/// selection, a column without a codebook entry) are not errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A local file could not be read or written.
    #[error("Cannot access {}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A remote source or in-memory fixture could not be fetched.
    #[error("Cannot fetch '{location}': {reason}")]
    Fetch {
        /// URL or key that was requested.
        location: String,
        /// What went wrong.
        reason: String,
    },

    /// Arrow failed to build, read or project a table.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A Parquet main table could not be decoded.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// A GeoJSON main table is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// One of the two atlas sources could not be fetched or parsed.
    ///
    /// Nothing from a failed load is kept; callers get either both tables
    /// or this error.
    #[error("Failed to load {source_name}: {source}")]
    Load {
        /// Which source failed ("main table" or "codebook") and where it lives.
        source_name: String,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// The requested column is not in the main table.
    #[error("Column '{name}' not found in schema")]
    ColumnNotFound {
        /// The requested name.
        name: String,
    },

    /// A configuration value is out of range or unknown.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Which field is wrong and why.
        message: String,
    },

    /// The main table's extension is not GeoJSON, CSV or Parquet.
    #[error("Unsupported source format: {format}")]
    UnsupportedFormat {
        /// The extension that was found.
        format: String,
    },

    /// The main table has no rows or no features.
    #[error("Main table has no rows")]
    EmptyDataset,

    /// Record batches or properties do not line up.
    #[error("Schema mismatch: {message}")]
    SchemaMismatch {
        /// What did not line up.
        message: String,
    },

    /// A source parsed but its content is malformed.
    #[error("Parse error: {message}")]
    Parse {
        /// What was malformed.
        message: String,
    },

    /// The terminal could not be set up or drawn to.
    #[error("Terminal error: {0}")]
    Terminal(#[source] std::io::Error),
}

impl Error {
    /// I/O failure on `path`.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Fetch failure for `location`.
    pub fn fetch(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Wraps a failure of one atlas source.
    pub fn load(source_name: impl Into<String>, source: Error) -> Self {
        Self::Load {
            source_name: source_name.into(),
            source: Box::new(source),
        }
    }

    /// Unknown column.
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    /// Bad configuration value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Unrecognized main table format.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Mismatched schemas.
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    /// Malformed content.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Returns true if this is a load failure of one of the atlas sources.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}
