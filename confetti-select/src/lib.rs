//! The `select` component type
//!
//! `confetti-select` resolves the value of a dropdown-like field in a page
//! builder. A select either declares a fixed list of options, or points at a
//! directory whose view files are the choices. The component registry and the
//! content store are consumed through traits so the page builder can plug in
//! its own; file-backed implementations are included.
//!
//! # Resolution
//!
//! - **Options**: saved value, then `default`, then the first option, then `""`
//! - **By directory**: saved path, then `target/default`; view files are turned
//!   into dotted view references (`/object/pages/home.blade.php` → `pages.home`)
//! - **Neither declared**: a [`SelectValue::Misconfigured`] marker to render inline
//!
//! ```rust,ignore
//! let registry = ComponentRegistry::open(root).build().await?;
//! let content = ContentFile::open(root.join("content.yaml")).await?;
//! let value = SelectComponent::new("/model/homepage/template", &registry, &content).get()?;
//! ```

pub mod content;
pub mod error;
pub mod registry;
pub mod select;
pub mod store;
pub mod types;
pub mod view;

pub use content::ContentFile;
pub use error::{Result, SelectError};
pub use registry::{ComponentRegistry, ComponentRegistryBuilder};
pub use select::{
    all_options, Component, HasMap, SelectComponent, SelectMap, SelectValue,
    MISCONFIGURED_MESSAGE,
};
pub use store::{option_key, parent_key, ComponentStore, ContentStore, OPTION_SUFFIX};
pub use types::{ComponentEntity, Decoration, DecorationKind, SelectOption, Source};
pub use view::{file_name_to_label, is_view_path, view_by_path, VIEW_SUFFIX};
