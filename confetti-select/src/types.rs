//! Component declarations and their decorations.
//!
//! All types serialize to/from YAML via serde. A component is a declared
//! field identified by a hierarchical key; decorations are the typed
//! annotations (`options`, `default`, `byDirectory`) attached to it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a component was declared. Shown in configuration errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Source {
    pub file: String,
    #[serde(default)]
    pub line: u32,
}

impl Source {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A single entry in an `options` decoration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// The name of a decoration, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    Options,
    Default,
    ByDirectory,
}

impl DecorationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecorationKind::Options => "options",
            DecorationKind::Default => "default",
            DecorationKind::ByDirectory => "byDirectory",
        }
    }
}

impl fmt::Display for DecorationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoration attached to a component declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Decoration {
    /// Fixed list of choices. The first one is the implicit default.
    Options { options: Vec<SelectOption> },
    /// Fallback value, or a file name without directory for by-directory selects.
    Default { value: String },
    /// Choices are the children of `target`.
    #[serde(alias = "byDirectory")]
    ByDirectory { target: String },
}

impl Decoration {
    pub fn kind(&self) -> DecorationKind {
        match self {
            Decoration::Options { .. } => DecorationKind::Options,
            Decoration::Default { .. } => DecorationKind::Default,
            Decoration::ByDirectory { .. } => DecorationKind::ByDirectory,
        }
    }
}

/// Metadata for one declared component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentEntity {
    pub id: String,
    #[serde(default)]
    pub source: Source,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorations: Vec<Decoration>,
}

impl ComponentEntity {
    pub fn new(id: impl Into<String>, source: Source) -> Self {
        Self {
            id: id.into(),
            source,
            decorations: Vec::new(),
        }
    }

    /// Attach a decoration, replacing any earlier one of the same kind.
    pub fn decorate(mut self, decoration: Decoration) -> Self {
        let kind = decoration.kind();
        match self.decorations.iter_mut().find(|d| d.kind() == kind) {
            Some(existing) => *existing = decoration,
            None => self.decorations.push(decoration),
        }
        self
    }

    pub fn has_decoration(&self, kind: DecorationKind) -> bool {
        self.decoration(kind).is_some()
    }

    pub fn decoration(&self, kind: DecorationKind) -> Option<&Decoration> {
        self.decorations.iter().find(|d| d.kind() == kind)
    }

    /// Options of the `options` decoration, if declared.
    pub fn options(&self) -> Option<&[SelectOption]> {
        match self.decoration(DecorationKind::Options) {
            Some(Decoration::Options { options }) => Some(options),
            _ => None,
        }
    }

    /// Value of the `default` decoration, if declared.
    pub fn default_value(&self) -> Option<&str> {
        match self.decoration(DecorationKind::Default) {
            Some(Decoration::Default { value }) => Some(value),
            _ => None,
        }
    }

    /// Target of the `byDirectory` decoration, if declared.
    pub fn by_directory_target(&self) -> Option<&str> {
        match self.decoration(DecorationKind::ByDirectory) {
            Some(Decoration::ByDirectory { target }) => Some(target),
            _ => None,
        }
    }
}
