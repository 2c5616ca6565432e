//! Files on the local filesystem.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use bytes::Bytes;

use super::StorageBackend;
use crate::error::{Error, Result};

/// Reads files below a root directory.
///
/// The root is not checked up front; a missing root surfaces as an I/O
/// error naming the full path on the first read.
///
/// # Example
///
/// ```no_run
/// use cityatlas::backend::{LocalBackend, StorageBackend};
///
/// let backend = LocalBackend::new("city_features_collection");
/// let codebook = backend.get("city_features_collection_codebook.csv").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// A backend rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if key.is_empty() || escapes {
            return Err(Error::fetch(
                key,
                format!("not a file below {}", self.root.display()),
            ));
        }
        Ok(self.root.join(relative))
    }
}

impl StorageBackend for LocalBackend {
    fn get(&self, key: &str) -> Result<Bytes> {
        let path = self.resolve(key)?;
        let data = fs::read(&path).map_err(|e| Error::io(e, &path))?;
        tracing::trace!(path = %path.display(), bytes = data.len(), "read local file");
        Ok(Bytes::from(data))
    }
}
