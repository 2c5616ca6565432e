//! Where the atlas sources come from.
//!
//! A [`StorageBackend`] hands out whole objects by key: files below a
//! directory, a remote URL, or buffers held in memory. A [`DataSource`]
//! pairs a backend with the key of one file and remembers the location the
//! user configured, so the loader can report which source failed and pick
//! a parser from the extension.

#[cfg(feature = "http")]
pub mod http;
pub mod local;
pub mod memory;

use std::{fmt, path::Path, sync::Arc, time::Duration};

use bytes::Bytes;
#[cfg(feature = "http")]
pub use http::HttpBackend;
pub use local::LocalBackend;
pub use memory::MemoryBackend;

use crate::error::{Error, Result};

/// Read-only access to whole objects.
///
/// Sources are small enough to read in one go and the viewer never writes
/// back, so a single read is the whole interface.
pub trait StorageBackend: Send + Sync + fmt::Debug {
    /// Reads the object stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not exist or cannot be read.
    fn get(&self, key: &str) -> Result<Bytes>;
}

/// One file reachable through a storage backend.
#[derive(Debug, Clone)]
pub struct DataSource {
    backend: Arc<dyn StorageBackend>,
    key: String,
    location: String,
    extension: Option<String>,
}

impl DataSource {
    /// Creates a source for `key` inside `backend`.
    ///
    /// `location` is only used for messages and format detection.
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        key: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let location = location.into();
        let extension = extension_of(&location).or_else(|| extension_of(&key));
        Self {
            backend,
            key,
            location,
            extension,
        }
    }

    /// Resolves a user-supplied location (`http(s)://` URL, `file://` URL, or
    /// filesystem path) into a source.
    ///
    /// # Errors
    ///
    /// Returns an error if the location names a remote URL but the `http`
    /// feature is disabled, or if the HTTP client cannot be built.
    pub fn from_location(location: &str, http_timeout: Option<Duration>) -> Result<Self> {
        if let Some(parsed) = parse_url(location) {
            match parsed.scheme() {
                "http" | "https" => return Self::remote(location, http_timeout),
                "file" => {
                    let path = parsed
                        .to_file_path()
                        .map_err(|()| Error::invalid_config(format!("Bad file URL: {location}")))?;
                    return Ok(Self::local(&path, location));
                }
                _ => {}
            }
        }

        Ok(Self::local(Path::new(location), location))
    }

    fn local(path: &Path, location: &str) -> Self {
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let key = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::new(Arc::new(LocalBackend::new(root)), key, location)
    }

    #[cfg(feature = "http")]
    fn remote(location: &str, http_timeout: Option<Duration>) -> Result<Self> {
        let backend = HttpBackend::new(location, http_timeout)?;
        Ok(Self::new(Arc::new(backend), "", location))
    }

    #[cfg(not(feature = "http"))]
    fn remote(location: &str, _http_timeout: Option<Duration>) -> Result<Self> {
        Err(Error::invalid_config(format!(
            "Remote source '{location}' requires the `http` feature"
        )))
    }

    /// The location this source was configured with.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The key inside the backend.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Lowercased file extension, ignoring any URL query string.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Fetches the whole file.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the read fails.
    pub fn fetch(&self) -> Result<Bytes> {
        let data = self.backend.get(&self.key)?;
        tracing::debug!(location = %self.location, bytes = data.len(), "fetched source");
        Ok(data)
    }
}

fn parse_url(location: &str) -> Option<url::Url> {
    let parsed = url::Url::parse(location).ok()?;
    // Drive letters ("C:\data") parse as single-letter schemes.
    (parsed.scheme().len() > 1).then_some(parsed)
}

fn extension_of(location: &str) -> Option<String> {
    let path = match parse_url(location) {
        Some(url) => url.path().to_string(),
        None => location
            .split(['?', '#'])
            .next()
            .unwrap_or(location)
            .to_string(),
    };

    Path::new(&path)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_plain_path() {
        assert_eq!(extension_of("data/cities.GeoJSON").as_deref(), Some("geojson"));
        assert_eq!(extension_of("codebook.csv").as_deref(), Some("csv"));
        assert_eq!(extension_of("README"), None);
    }

    #[test]
    fn test_extension_ignores_query_string() {
        let url = "https://github.com/FAIRiCUBE/uc1-urban-climate/blob/main/data/cities.geojson?raw=true";
        assert_eq!(extension_of(url).as_deref(), Some("geojson"));
    }

    #[test]
    fn test_from_location_local_path() {
        let source = DataSource::from_location("city_features_collection/codebook.csv", None)
            .ok()
            .unwrap_or_else(|| panic!("Should resolve local path"));
        assert_eq!(source.key(), "codebook.csv");
        assert_eq!(source.extension(), Some("csv"));
        assert_eq!(source.location(), "city_features_collection/codebook.csv");
    }

    #[test]
    fn test_from_location_bare_file_name() {
        let source = DataSource::from_location("codebook.csv", None)
            .ok()
            .unwrap_or_else(|| panic!("Should resolve bare file name"));
        assert_eq!(source.key(), "codebook.csv");
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_from_location_remote() {
        let source = DataSource::from_location("https://example.com/atlas.geojson?raw=true", None)
            .ok()
            .unwrap_or_else(|| panic!("Should resolve URL"));
        assert_eq!(source.key(), "");
        assert_eq!(source.extension(), Some("geojson"));
    }

    #[test]
    fn test_fetch_from_memory() {
        let backend = Arc::new(MemoryBackend::new());
        backend.insert("cities.geojson", Bytes::from_static(b"{}"));
        let source = DataSource::new(backend, "cities.geojson", "memory://cities.geojson");
        let data = source
            .fetch()
            .ok()
            .unwrap_or_else(|| panic!("Should fetch"));
        assert_eq!(data, Bytes::from_static(b"{}"));
        assert_eq!(source.extension(), Some("geojson"));
    }

    #[test]
    fn test_fetch_missing_key() {
        let source = DataSource::new(Arc::new(MemoryBackend::new()), "nope.csv", "nope.csv");
        assert!(source.fetch().is_err());
    }

    #[test]
    fn test_fetch_local_file() {
        let temp_dir = tempfile::tempdir()
            .ok()
            .unwrap_or_else(|| panic!("Should create temp dir"));
        let path = temp_dir.path().join("codebook.csv");
        std::fs::write(&path, "feature\npopulation\n")
            .ok()
            .unwrap_or_else(|| panic!("Should write file"));

        let location = path.to_string_lossy().to_string();
        let source = DataSource::from_location(&location, None)
            .ok()
            .unwrap_or_else(|| panic!("Should resolve"));
        let data = source
            .fetch()
            .ok()
            .unwrap_or_else(|| panic!("Should read"));
        assert_eq!(data.as_ref(), b"feature\npopulation\n");
    }
}
