//! ContentFile: file-backed `ContentStore`.
//!
//! Persisted field values live in a single YAML map of key → value.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tokio::fs;
use tracing::debug;

use crate::error::{Result, SelectError};
use crate::registry::atomic_write;
use crate::store::ContentStore;

/// Saved values for components, keyed by component id.
#[derive(Debug, Default)]
pub struct ContentFile {
    path: Option<PathBuf>,
    values: IndexMap<String, String>,
}

impl ContentFile {
    /// Load the content file at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => IndexMap::new(),
            Ok(content) => serde_yaml_ng::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IndexMap::new(),
            Err(e) => return Err(SelectError::file_read(&path, e)),
        };
        debug!(?path, values = values.len(), "content file opened");
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// Store with no backing file.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// The backing file, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Save a value for `key`, replacing any earlier one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Remove a saved value, returning it.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.shift_remove(key)
    }

    /// Number of saved values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Persist all values to the backing file.
    pub async fn save(&self) -> Result<()> {
        let path = self.path.as_ref().ok_or(SelectError::NoBackingFile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let yaml = serde_yaml_ng::to_string(&self.values)?;
        atomic_write(path, yaml.as_bytes()).await?;
        debug!(?path, values = self.values.len(), "content file saved");
        Ok(())
    }
}

impl ContentStore for ContentFile {
    fn find(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContentFile {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            path: None,
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
