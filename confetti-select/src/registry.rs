//! ComponentRegistry: file-backed `ComponentStore`.
//!
//! Keeps component declarations as YAML files under a `components/`
//! directory, one file per component, with an in-memory index by key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::error::{Result, SelectError};
use crate::store::{parent_key, ComponentStore};
use crate::types::ComponentEntity;

/// Builder for `ComponentRegistry`. Created by `ComponentRegistry::open()`.
pub struct ComponentRegistryBuilder {
    root: PathBuf,
    defaults: Vec<ComponentEntity>,
}

impl ComponentRegistryBuilder {
    /// Declarations to seed on open. Components already on disk are preserved.
    pub fn with_defaults(mut self, defaults: impl IntoIterator<Item = ComponentEntity>) -> Self {
        self.defaults.extend(defaults);
        self
    }

    /// Build the registry: create directories, load from disk, seed missing defaults.
    pub async fn build(self) -> Result<ComponentRegistry> {
        let components_dir = self.root.join("components");
        fs::create_dir_all(&components_dir).await?;

        let mut registry = ComponentRegistry {
            root: Some(self.root),
            components: Vec::new(),
            index: HashMap::new(),
            paths: HashMap::new(),
        };
        registry.load_components(&components_dir).await?;

        // Matched by id, whatever file the existing declaration lives in
        for def in &self.defaults {
            if !registry.index.contains_key(&def.id) {
                registry.write_component(def).await?;
                debug!(id = %def.id, "seeded default component");
            }
        }

        debug!(
            components = registry.components.len(),
            "component registry opened"
        );

        Ok(registry)
    }
}

/// Component declarations indexed by key.
///
/// On disk:
/// ```text
/// registry/
///   components/    ← one .yaml per component
/// ```
pub struct ComponentRegistry {
    root: Option<PathBuf>,
    components: Vec<ComponentEntity>,
    index: HashMap<String, usize>,
    /// File each declaration was loaded from or last written to.
    paths: HashMap<String, PathBuf>,
}

impl ComponentRegistry {
    /// Open or create a registry directory.
    ///
    /// ```rust,ignore
    /// let registry = ComponentRegistry::open(path).build().await?;
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> ComponentRegistryBuilder {
        ComponentRegistryBuilder {
            root: root.into(),
            defaults: Vec::new(),
        }
    }

    /// In-memory registry with no backing directory. Later duplicates replace earlier ones.
    pub fn from_components(components: impl IntoIterator<Item = ComponentEntity>) -> Self {
        let mut registry = Self {
            root: None,
            components: Vec::new(),
            index: HashMap::new(),
            paths: HashMap::new(),
        };
        for component in components {
            registry.insert(component);
        }
        registry
    }

    /// All declarations, in load order.
    pub fn all_components(&self) -> &[ComponentEntity] {
        &self.components
    }

    /// The registry directory, `None` when in memory.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Write (create or replace) a declaration. Persists immediately when disk-backed.
    ///
    /// An existing declaration is rewritten in the file it came from.
    pub async fn write_component(&mut self, def: &ComponentEntity) -> Result<()> {
        if let Some(path) = self.declaration_path(&def.id) {
            if let Some(owner) = self.path_owner(&path, &def.id) {
                return Err(SelectError::DeclarationConflict {
                    path,
                    id: owner.to_string(),
                });
            }
            let yaml = serde_yaml_ng::to_string(def)?;
            atomic_write(&path, yaml.as_bytes()).await?;
            self.paths.insert(def.id.clone(), path);
        }
        self.insert(def.clone());
        Ok(())
    }

    /// Delete a declaration by key, removing the file it was loaded from.
    pub async fn delete_component(&mut self, id: &str) -> Result<()> {
        let idx = self
            .index
            .get(id)
            .copied()
            .ok_or_else(|| SelectError::ComponentNotFound { key: id.to_string() })?;

        if let Some(path) = self.paths.get(id) {
            match fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(SelectError::file_write(path, e)),
            }
        }

        self.index.remove(id);
        self.paths.remove(id);

        // Keep insertion order for where_parent_key
        self.components.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }

        Ok(())
    }

    // --- Internal ---

    fn insert(&mut self, def: ComponentEntity) {
        if let Some(&idx) = self.index.get(&def.id) {
            self.components[idx] = def;
        } else {
            let idx = self.components.len();
            self.index.insert(def.id.clone(), idx);
            self.components.push(def);
        }
    }

    fn declaration_path(&self, id: &str) -> Option<PathBuf> {
        if let Some(path) = self.paths.get(id) {
            return Some(path.clone());
        }
        self.root
            .as_ref()
            .map(|root| root.join("components").join(declaration_file_name(id)))
    }

    /// Another declaration already stored at `path`.
    fn path_owner(&self, path: &Path, id: &str) -> Option<&str> {
        self.paths
            .iter()
            .find(|(other, p)| other.as_str() != id && p.as_path() == path)
            .map(|(other, _)| other.as_str())
    }

    async fn load_components(&mut self, dir: &Path) -> Result<()> {
        let mut paths = Vec::new();
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| SelectError::file_read(&path, e))?;
            match serde_yaml_ng::from_str::<ComponentEntity>(&content) {
                Ok(def) => {
                    self.paths.insert(def.id.clone(), path);
                    self.insert(def);
                }
                Err(e) => {
                    warn!(?path, %e, "skipping invalid component declaration");
                }
            }
        }
        Ok(())
    }
}

impl ComponentStore for ComponentRegistry {
    fn find_or_null(&self, key: &str) -> Option<&ComponentEntity> {
        self.index.get(key).map(|&i| &self.components[i])
    }

    fn where_parent_key(&self, key: &str) -> Vec<&ComponentEntity> {
        let key = if key.len() > 1 {
            key.trim_end_matches('/')
        } else {
            key
        };
        self.components
            .iter()
            .filter(|c| parent_key(&c.id) == Some(key))
            .collect()
    }
}

/// `/model/homepage/header/-` → `~model~homepage~header~-.yaml`
///
/// `%` and `~` are escaped first so distinct ids never share a file.
fn declaration_file_name(id: &str) -> String {
    let escaped = id.replace('%', "%25").replace('~', "%7E").replace('/', "~");
    format!("{escaped}.yaml")
}

/// Write to a temp file then rename for atomic persistence.
pub(crate) async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
