//! Remote sources over HTTP/HTTPS.
//!
//! The published atlas is a raw GeoJSON file served from a GitHub
//! repository, so a backend is built around one URL and an empty key
//! fetches that URL itself.

use std::time::Duration;

use bytes::Bytes;
use reqwest::blocking::Client;
use url::Url;

use super::StorageBackend;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("cityatlas/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP reader anchored at one URL.
///
/// Non-empty keys are resolved against the URL the way a browser resolves
/// a relative link. There is no retry.
///
/// # Example
///
/// ```no_run
/// use cityatlas::backend::{HttpBackend, StorageBackend};
///
/// let backend = HttpBackend::new("https://example.com/atlas.geojson?raw=true", None).unwrap();
/// let data = backend.get("").unwrap();
/// ```
#[derive(Debug)]
pub struct HttpBackend {
    client: Client,
    url: Url,
}

impl HttpBackend {
    /// A backend for `url`, with an optional request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `url` does not parse, or
    /// [`Error::Fetch`] if the HTTP client cannot be built.
    pub fn new(url: &str, timeout: Option<Duration>) -> Result<Self> {
        let parsed =
            Url::parse(url).map_err(|e| Error::invalid_config(format!("Bad URL '{url}': {e}")))?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::fetch(url, format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: parsed,
        })
    }

    /// The anchor URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn resolve(&self, key: &str) -> Result<Url> {
        if key.is_empty() {
            return Ok(self.url.clone());
        }
        self.url
            .join(key)
            .map_err(|e| Error::fetch(key, format!("cannot resolve against {}: {e}", self.url)))
    }
}

impl StorageBackend for HttpBackend {
    fn get(&self, key: &str) -> Result<Bytes> {
        let url = self.resolve(key)?;
        tracing::info!(%url, "fetching remote source");

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| Error::fetch(url.as_str(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url.as_str(), format!("status {status}")));
        }

        response
            .bytes()
            .map_err(|e| Error::fetch(url.as_str(), format!("cannot read body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(url: &str) -> HttpBackend {
        HttpBackend::new(url, None)
            .ok()
            .unwrap_or_else(|| panic!("Should create backend for {url}"))
    }

    #[test]
    fn test_empty_key_is_the_url() {
        let url = "https://example.com/data/atlas.geojson?raw=true";
        let resolved = backend(url).resolve("").ok().map(String::from);
        assert_eq!(resolved.as_deref(), Some(url));
    }

    #[test]
    fn test_key_resolves_relative_to_url() {
        let b = backend("https://example.com/data/atlas.geojson");
        let resolved = b.resolve("codebook.csv").ok().map(String::from);
        assert_eq!(
            resolved.as_deref(),
            Some("https://example.com/data/codebook.csv")
        );
    }

    #[test]
    fn test_bad_url_is_config_error() {
        let result = HttpBackend::new("not a url", None);
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_with_timeout() {
        let b = HttpBackend::new("https://example.com/atlas.geojson", Some(Duration::from_secs(30)));
        assert!(b.is_ok_and(|b| b.url().host_str() == Some("example.com")));
    }
}
