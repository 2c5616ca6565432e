//! Viewer configuration.
//!
//! Defaults point at the published atlas; a TOML file can override any
//! field, and CLI flags override the file.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    codebook::CodebookColumns,
    error::{Error, Result},
};

/// Published location of the atlas GeoJSON.
pub const DEFAULT_DATA_SOURCE: &str = "https://github.com/FAIRiCUBE/uc1-urban-climate/blob/55742139337e20a1708ab3193ec26295d0a0c5c5/data/city_features_collection/city_features_collection_v0.1.geojson?raw=true";

/// Path of the codebook relative to the working directory.
pub const DEFAULT_CODEBOOK_PATH: &str =
    "city_features_collection/city_features_collection_codebook.csv";

/// Settings for loading and displaying the atlas.
///
/// # Example
///
/// ```
/// use cityatlas::ViewerConfig;
///
/// let config = ViewerConfig::default()
///     .with_data_source("cities.geojson")
///     .with_table_height(10);
/// assert_eq!(config.default_selection, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// URL or path of the main table.
    pub data_source: String,
    /// URL or path of the codebook.
    pub codebook_path: String,
    /// Field delimiter of the codebook.
    pub codebook_delimiter: char,
    /// Header names of the codebook.
    pub codebook_columns: CodebookColumns,
    /// How many leading columns are selected at startup.
    pub default_selection: usize,
    /// Visible rows of the data table.
    pub table_height: usize,
    /// Timeout for remote fetches; none if unset.
    pub http_timeout_secs: Option<u64>,
    /// Page and window title.
    pub title: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            codebook_path: DEFAULT_CODEBOOK_PATH.to_string(),
            codebook_delimiter: ',',
            codebook_columns: CodebookColumns::default(),
            default_selection: 5,
            table_height: 25,
            http_timeout_secs: None,
            title: "European Cities Atlas".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Reads a TOML file; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails [`ViewerConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(e, path))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or the result is
    /// invalid.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| Error::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.data_source.trim().is_empty() {
            return Err(Error::invalid_config("data_source must not be empty"));
        }
        if self.codebook_path.trim().is_empty() {
            return Err(Error::invalid_config("codebook_path must not be empty"));
        }
        if !self.codebook_delimiter.is_ascii() {
            return Err(Error::invalid_config(format!(
                "codebook_delimiter must be a single ASCII character, got '{}'",
                self.codebook_delimiter
            )));
        }
        if self.codebook_columns.feature.is_empty() {
            return Err(Error::invalid_config(
                "codebook_columns.feature must not be empty",
            ));
        }
        if self.table_height == 0 {
            return Err(Error::invalid_config("table_height must be at least 1"));
        }
        if self.http_timeout_secs == Some(0) {
            return Err(Error::invalid_config("http_timeout_secs must be positive"));
        }
        Ok(())
    }

    /// The codebook delimiter as a byte.
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.codebook_delimiter).unwrap_or(b',')
    }

    /// The HTTP timeout, if configured.
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    /// Sets the main table location.
    #[must_use]
    pub fn with_data_source(mut self, source: impl Into<String>) -> Self {
        self.data_source = source.into();
        self
    }

    /// Sets the codebook location.
    #[must_use]
    pub fn with_codebook_path(mut self, path: impl Into<String>) -> Self {
        self.codebook_path = path.into();
        self
    }

    /// Sets the codebook delimiter.
    #[must_use]
    pub fn with_codebook_delimiter(mut self, delimiter: char) -> Self {
        self.codebook_delimiter = delimiter;
        self
    }

    /// Sets how many leading columns start selected.
    #[must_use]
    pub fn with_default_selection(mut self, n: usize) -> Self {
        self.default_selection = n;
        self
    }

    /// Sets the number of visible table rows.
    #[must_use]
    pub fn with_table_height(mut self, rows: usize) -> Self {
        self.table_height = rows;
        self
    }

    /// Sets the HTTP timeout in seconds.
    #[must_use]
    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = Some(secs);
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
