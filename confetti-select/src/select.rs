//! The `select` component type.
//!
//! A select either declares a fixed list of `options` on its own key, or
//! declares `byDirectory` on the synthetic `id/-` key, in which case its
//! choices are the view files under the target directory.

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{Result, SelectError};
use crate::store::{option_key, ComponentStore, ContentStore};
use crate::types::ComponentEntity;
use crate::view::{file_name_to_label, is_view_path, view_by_path};

/// Inline text rendered for a select with neither `options` nor `byDirectory`.
pub const MISCONFIGURED_MESSAGE: &str =
    "!!! Error: Component with type `select` need to have decoration `options` or `byDirectory` !!!";

/// A resolved component value.
pub trait Component {
    type Output;

    fn id(&self) -> &str;

    fn get(&self) -> Result<Self::Output>;
}

/// Components that own a sub-tree the page builder has to register.
pub trait HasMap {
    type Map<'a>
    where
        Self: 'a;

    fn to_map(&self) -> Self::Map<'_>;
}

/// Outcome of resolving a select that did not fail hard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectValue {
    /// The value to store or render.
    Value(String),
    /// The declaration is broken; render the text inline instead of aborting.
    Misconfigured(String),
}

impl SelectValue {
    /// The value or the warning text.
    pub fn as_str(&self) -> &str {
        match self {
            SelectValue::Value(v) | SelectValue::Misconfigured(v) => v,
        }
    }

    /// True when the select declares neither `options` nor `byDirectory`.
    pub fn is_misconfigured(&self) -> bool {
        matches!(self, SelectValue::Misconfigured(_))
    }

    /// The value, or `None` when misconfigured.
    pub fn value(&self) -> Option<&str> {
        match self {
            SelectValue::Value(v) => Some(v),
            SelectValue::Misconfigured(_) => None,
        }
    }

    /// Text to place in the rendered page.
    pub fn into_inline(self) -> String {
        match self {
            SelectValue::Value(v) | SelectValue::Misconfigured(v) => v,
        }
    }
}

impl fmt::Display for SelectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A select field bound to its id and the stores it reads from.
pub struct SelectComponent<C, S> {
    id: String,
    component_store: C,
    content_store: S,
}

impl<C: ComponentStore, S: ContentStore> SelectComponent<C, S> {
    /// Bind a select id to the stores it resolves against.
    pub fn new(id: impl Into<String>, component_store: C, content_store: S) -> Self {
        Self {
            id: id.into(),
            component_store,
            content_store,
        }
    }

    /// Resolve the value of a select declared with `options`.
    ///
    /// Saved value, then `default`, then the first option, then `""`.
    pub fn value_from_options(&self, component: &ComponentEntity) -> String {
        if let Some(saved) = self.content_store.find(&self.id) {
            return saved;
        }

        if let Some(default) = component.default_value() {
            return default.to_string();
        }

        component
            .options()
            .and_then(|options| options.first())
            .map(|option| option.id.clone())
            .unwrap_or_default()
    }

    /// Resolve the value of a select declared with `byDirectory`.
    ///
    /// `component` is the `id/-` node. View paths are returned as dotted view
    /// references, anything else verbatim.
    pub fn value_from_by_directory(&self, component: &ComponentEntity) -> Result<String> {
        if let Some(saved) = self.content_store.find(&self.id) {
            return Ok(to_view_reference(saved));
        }

        let file_name = component
            .default_value()
            .ok_or_else(|| SelectError::NoDefault {
                origin: component.source.clone(),
            })?;
        let target = component
            .by_directory_target()
            .ok_or_else(|| SelectError::NoTarget {
                origin: component.source.clone(),
            })?;

        Ok(to_view_reference(format!("{target}/{file_name}")))
    }
}

impl<C: ComponentStore, S: ContentStore> Component for SelectComponent<C, S> {
    type Output = SelectValue;

    fn id(&self) -> &str {
        &self.id
    }

    fn get(&self) -> Result<SelectValue> {
        if let Some(component) = self.component_store.find_or_null(&self.id) {
            debug!(id = %self.id, "resolving select from options");
            return Ok(SelectValue::Value(self.value_from_options(component)));
        }

        let key = option_key(&self.id);
        if let Some(component) = self.component_store.find_or_null(&key) {
            debug!(id = %self.id, "resolving select by directory");
            return self
                .value_from_by_directory(component)
                .map(SelectValue::Value);
        }

        warn!(id = %self.id, "select has neither options nor byDirectory");
        Ok(SelectValue::Misconfigured(MISCONFIGURED_MESSAGE.to_string()))
    }
}

impl<C: ComponentStore, S: ContentStore> HasMap for SelectComponent<C, S> {
    type Map<'a>
        = SelectMap<'a, C, S>
    where
        Self: 'a;

    /// The `id/-` sub-tree holding the directory-backed options.
    fn to_map(&self) -> Self::Map<'_> {
        SelectMap {
            key: option_key(&self.id),
            component_store: &self.component_store,
            content_store: &self.content_store,
        }
    }
}

/// The synthetic `id/-` sub-tree of a select, as handed to the component-tree builder.
pub struct SelectMap<'a, C, S> {
    key: String,
    component_store: &'a C,
    content_store: &'a S,
}

impl<'a, C: ComponentStore, S: ContentStore> SelectMap<'a, C, S> {
    /// `id/-` of the owning select.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Store the sub-tree is registered in.
    pub fn component_store(&self) -> &'a C {
        self.component_store
    }

    /// Store holding saved values for the sub-tree.
    pub fn content_store(&self) -> &'a S {
        self.content_store
    }

    /// The `byDirectory` declaration at this key, if the select has one.
    pub fn component(&self) -> Option<&'a ComponentEntity> {
        self.component_store.find_or_null(&self.key)
    }

    /// Components nested directly under this key.
    pub fn children(&self) -> Vec<&'a ComponentEntity> {
        self.component_store.where_parent_key(&self.key)
    }
}

/// All choices of a select, option key → label, in presentation order.
///
/// Directory entries come first; explicit options follow and replace
/// directory entries with the same key in place.
pub fn all_options(
    component: &ComponentEntity,
    component_store: &impl ComponentStore,
) -> IndexMap<String, String> {
    let mut options = IndexMap::new();

    if let Some(target) = component.by_directory_target() {
        for object in component_store.where_parent_key(target) {
            options.insert(object.id.clone(), file_name_to_label(&object.source.file));
        }
    }

    if let Some(declared) = component.options() {
        for option in declared {
            options.insert(option.id.clone(), option.label.clone());
        }
    }

    options
}

fn to_view_reference(path: String) -> String {
    if is_view_path(&path) {
        view_by_path(&path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentFile;
    use crate::registry::ComponentRegistry;
    use crate::types::{Decoration, SelectOption, Source};

    const ID: &str = "/model/homepage/template";
    const HEADER: &str = "/model/homepage/header";

    fn options_select(options: Vec<SelectOption>) -> ComponentEntity {
        ComponentEntity::new(ID, Source::new("view/homepage.blade.php", 3))
            .decorate(Decoration::Options { options })
    }

    fn header_select() -> ComponentEntity {
        ComponentEntity::new(option_key(HEADER), Source::new("view/homepage.blade.php", 7))
            .decorate(Decoration::ByDirectory {
                target: "/object/headers".into(),
            })
    }

    fn left_right() -> Vec<SelectOption> {
        vec![
            SelectOption::new("left", "Left"),
            SelectOption::new("right", "Right"),
        ]
    }

    fn resolve(
        id: &str,
        components: Vec<ComponentEntity>,
        content: &[(&str, &str)],
    ) -> Result<SelectValue> {
        let registry = ComponentRegistry::from_components(components);
        let content: ContentFile = content.iter().copied().collect();
        SelectComponent::new(id, &registry, &content).get()
    }

    #[test]
    fn saved_value_wins_over_default_and_options() {
        let component = options_select(left_right()).decorate(Decoration::Default {
            value: "left".into(),
        });
        let value = resolve(ID, vec![component], &[(ID, "centre")]).unwrap();
        assert_eq!(value, SelectValue::Value("centre".into()));
    }

    #[test]
    fn default_used_without_saved_value() {
        let component = options_select(left_right()).decorate(Decoration::Default {
            value: "right".into(),
        });
        let value = resolve(ID, vec![component], &[]).unwrap();
        assert_eq!(value.value(), Some("right"));
    }

    #[test]
    fn first_option_without_default() {
        let value = resolve(ID, vec![options_select(left_right())], &[]).unwrap();
        assert_eq!(value.value(), Some("left"));
    }

    #[test]
    fn empty_options_resolve_to_empty_string() {
        let value = resolve(ID, vec![options_select(Vec::new())], &[]).unwrap();
        assert_eq!(value, SelectValue::Value(String::new()));
    }

    #[test]
    fn saved_view_path_becomes_view_reference() {
        let value = resolve(
            HEADER,
            vec![header_select()],
            &[(HEADER, "/object/pages/home.blade.php")],
        )
        .unwrap();
        assert_eq!(value.value(), Some("pages.home"));
    }

    #[test]
    fn saved_plain_path_is_returned_unchanged() {
        let value = resolve(HEADER, vec![header_select()], &[(HEADER, "/object/pages/home")]).unwrap();
        assert_eq!(value.value(), Some("/object/pages/home"));
    }

    #[test]
    fn default_file_is_joined_with_target() {
        let component = header_select().decorate(Decoration::Default {
            value: "big.blade.php".into(),
        });
        let value = resolve(HEADER, vec![component], &[]).unwrap();
        assert_eq!(value.value(), Some("headers.big"));
    }

    #[test]
    fn default_without_view_suffix_is_plain_path() {
        let component = header_select().decorate(Decoration::Default {
            value: "big".into(),
        });
        let value = resolve(HEADER, vec![component], &[]).unwrap();
        assert_eq!(value.value(), Some("/object/headers/big"));
    }

    #[test]
    fn by_directory_without_default_fails_with_source() {
        let err = resolve(HEADER, vec![header_select()], &[]).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, SelectError::NoDefault { .. }));
        assert!(err.to_string().contains("view/homepage.blade.php:7"));
    }

    #[test]
    fn option_node_without_target_fails() {
        let component = ComponentEntity::new(option_key(HEADER), Source::new("x.blade.php", 1))
            .decorate(Decoration::Default {
                value: "big.blade.php".into(),
            });
        let err = resolve(HEADER, vec![component], &[]).unwrap_err();
        assert!(matches!(err, SelectError::NoTarget { .. }));
    }

    #[test]
    fn undeclared_select_renders_inline_warning() {
        let value = resolve("/model/missing", vec![options_select(left_right())], &[]).unwrap();
        assert!(value.is_misconfigured());
        assert_eq!(value.value(), None);
        assert_eq!(value.to_string(), MISCONFIGURED_MESSAGE);
        assert_eq!(value.into_inline(), MISCONFIGURED_MESSAGE);
    }

    #[test]
    fn options_key_takes_precedence_over_directory() {
        let both = vec![
            options_select(left_right()),
            ComponentEntity::new(option_key(ID), Source::default()).decorate(
                Decoration::ByDirectory {
                    target: "/object/layouts".into(),
                },
            ),
        ];
        let value = resolve(ID, both, &[]).unwrap();
        assert_eq!(value.value(), Some("left"));
    }

    #[test]
    fn all_options_directory_then_explicit() {
        let registry = ComponentRegistry::from_components([
            ComponentEntity::new("/object/blocks/a", Source::new("object/blocks/a.blade.php", 1)),
            ComponentEntity::new(
                "/object/blocks/b-two",
                Source::new("object/blocks/b-two.blade.php", 1),
            ),
        ]);
        let component = ComponentEntity::new(ID, Source::default())
            .decorate(Decoration::ByDirectory {
                target: "/object/blocks".into(),
            })
            .decorate(Decoration::Options {
                options: vec![SelectOption::new("x", "X")],
            });

        let options = all_options(&component, &registry);
        let pairs: Vec<_> = options
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("/object/blocks/a", "A"),
                ("/object/blocks/b-two", "B Two"),
                ("x", "X"),
            ]
        );
    }

    #[test]
    fn all_options_explicit_overrides_directory_in_place() {
        let registry = ComponentRegistry::from_components([
            ComponentEntity::new("/blocks/a", Source::new("blocks/a.blade.php", 1)),
            ComponentEntity::new("/blocks/b", Source::new("blocks/b.blade.php", 1)),
        ]);
        let component = ComponentEntity::new(ID, Source::default())
            .decorate(Decoration::ByDirectory {
                target: "/blocks".into(),
            })
            .decorate(Decoration::Options {
                options: vec![SelectOption::new("/blocks/a", "Custom A")],
            });

        let options = all_options(&component, &registry);
        let pairs: Vec<_> = options
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, vec![("/blocks/a", "Custom A"), ("/blocks/b", "B")]);
    }

    #[test]
    fn all_options_without_decorations_is_empty() {
        let registry = ComponentRegistry::from_components(Vec::new());
        let component = ComponentEntity::new(ID, Source::default());
        assert!(all_options(&component, &registry).is_empty());
    }

    #[test]
    fn to_map_exposes_option_subtree() {
        let registry = ComponentRegistry::from_components([
            header_select(),
            ComponentEntity::new(
                format!("{}/big", option_key(HEADER)),
                Source::new("object/headers/big.blade.php", 1),
            ),
        ]);
        let content = ContentFile::in_memory();
        let select = SelectComponent::new(HEADER, &registry, &content);

        let map = select.to_map();
        assert_eq!(map.key(), "/model/homepage/header/-");
        assert_eq!(map.component(), Some(&header_select()));
        assert_eq!(map.children().len(), 1);
        assert_eq!(select.id(), HEADER);
    }
}
