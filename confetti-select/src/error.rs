//! Error types for select resolution and the component/content stores

use std::path::PathBuf;
use thiserror::Error;

use crate::types::Source;

/// Result type for select operations
pub type Result<T> = std::result::Result<T, SelectError>;

/// Errors that can occur while resolving a select component or loading its stores
#[derive(Debug, Error)]
pub enum SelectError {
    /// A by-directory select has no saved value and no `default` decoration
    #[error("Error: No default defined. Use ->default('filename_without_directory') to define the default value. In {origin}")]
    NoDefault { origin: Source },

    /// The `id/-` node exists but carries no `byDirectory` decoration
    #[error("Error: No directory defined. Use ->byDirectory('target') to define where the options live. In {origin}")]
    NoTarget { origin: Source },

    /// Component not found by key
    #[error("component not found: {key}")]
    ComponentNotFound { key: String },

    /// Content file has no backing path to save to
    #[error("content store has no backing file")]
    NoBackingFile,

    /// Failed to read a declaration or content file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write or remove a declaration or content file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two component ids map to the same declaration file
    #[error("declaration file '{path}' already holds component {id}")]
    DeclarationConflict { path: PathBuf, id: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl SelectError {
    /// Create a FileRead error.
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a FileWrite error.
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// True for errors that point at a broken component declaration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::NoDefault { .. } | Self::NoTarget { .. })
    }
}
