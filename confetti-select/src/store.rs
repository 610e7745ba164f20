//! Lookup seams the select component reads from.
//!
//! Both stores are read-only from the resolver's point of view. Keys are
//! hierarchical, `/`-separated paths such as `/model/homepage/template`.

use crate::error::{Result, SelectError};
use crate::types::ComponentEntity;

/// Suffix appended to a select's id to address its nested option sub-tree.
pub const OPTION_SUFFIX: &str = "/-";

/// Component metadata by key.
pub trait ComponentStore {
    /// The component declared at `key`, if any.
    fn find_or_null(&self, key: &str) -> Option<&ComponentEntity>;

    /// Components whose parent key is exactly `key`.
    fn where_parent_key(&self, key: &str) -> Vec<&ComponentEntity>;

    /// The component declared at `key`, or `ComponentNotFound`.
    fn find(&self, key: &str) -> Result<&ComponentEntity> {
        self.find_or_null(key)
            .ok_or_else(|| SelectError::ComponentNotFound {
                key: key.to_string(),
            })
    }
}

/// Persisted field values by key.
pub trait ContentStore {
    fn find(&self, key: &str) -> Option<String>;
}

impl<T: ComponentStore + ?Sized> ComponentStore for &T {
    fn find_or_null(&self, key: &str) -> Option<&ComponentEntity> {
        (**self).find_or_null(key)
    }

    fn where_parent_key(&self, key: &str) -> Vec<&ComponentEntity> {
        (**self).where_parent_key(key)
    }
}

impl<T: ContentStore + ?Sized> ContentStore for &T {
    fn find(&self, key: &str) -> Option<String> {
        (**self).find(key)
    }
}

/// The key one level up: `/model/a/b` → `/model/a`. `None` for top-level keys.
pub fn parent_key(key: &str) -> Option<&str> {
    let trimmed = key.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) if trimmed.len() > 1 => Some("/"),
        Some(0) | None => None,
        Some(idx) => Some(&trimmed[..idx]),
    }
}

/// Key of the option sub-tree for the select at `id`.
pub fn option_key(id: &str) -> String {
    format!("{id}{OPTION_SUFFIX}")
}
