//! Item definition model populated by the analysis builder.
//!
//! A [`Resource`] holds [`Definition`]s keyed by type name. Each definition
//! owns a tree of [`ItemDefinition`]s of three kinds:
//!
//! - **Void**: an on/off switch with no value and no children.
//! - **String**: a discrete choice. Each discrete value may activate one of
//!   the string item's child items through a [`ConditionalItem`].
//! - **Group**: a set of child items that are all present together.
//!
//! The types serialize with [`serde`] so front ends can print or store them.

use serde::{Deserialize, Serialize};

/// Kind of an item definition.
///
/// # Examples
///
/// ```
/// use analysis_schema_core::{ItemDefinition, ItemKind};
///
/// let item = ItemDefinition::new(ItemKind::Group, "Physics");
/// assert_eq!(item.kind(), ItemKind::Group);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// No value, only enabled or disabled.
    Void,
    /// Discrete string choice.
    String,
    /// Container whose children are all present together.
    Group,
}

/// Kind-specific payload of an [`ItemDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemPayload {
    /// Void item.
    Void,
    /// Discrete string item.
    String(StringItemDefinition),
    /// Group item.
    Group(GroupItemDefinition),
}

/// One configurable field of a [`Definition`].
///
/// Created through [`ItemContainer::add_item_definition`] or directly with
/// [`ItemDefinition::new`].
///
/// # Examples
///
/// ```
/// use analysis_schema_core::{ItemDefinition, ItemKind};
///
/// let mut item = ItemDefinition::new(ItemKind::Void, "Thermal");
/// item.set_optional(true);
/// item.set_label("Heat Transfer");
///
/// assert!(item.is_optional());
/// assert_eq!(item.label(), "Heat Transfer");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default)]
    optional: bool,
    #[serde(flatten)]
    payload: ItemPayload,
}

impl ItemDefinition {
    /// Creates a required, unlabeled item of the given kind.
    pub fn new(kind: ItemKind, name: &str) -> Self {
        let payload = match kind {
            ItemKind::Void => ItemPayload::Void,
            ItemKind::String => ItemPayload::String(StringItemDefinition::default()),
            ItemKind::Group => ItemPayload::Group(GroupItemDefinition::default()),
        };
        Self {
            name: name.to_string(),
            label: None,
            optional: false,
            payload,
        }
    }

    /// Returns the item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the label, falling back to the name when unset.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Sets the label shown to users.
    pub fn set_label(&mut self, label: &str) {
        self.label = Some(label.to_string());
    }

    /// Returns whether the item may be left disabled.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Marks the item as optional.
    pub fn set_optional(&mut self, optional: bool) {
        self.optional = optional;
    }

    /// Returns the kind of item.
    pub fn kind(&self) -> ItemKind {
        match self.payload {
            ItemPayload::Void => ItemKind::Void,
            ItemPayload::String(_) => ItemKind::String,
            ItemPayload::Group(_) => ItemKind::Group,
        }
    }

    /// Returns the kind-specific payload.
    pub fn payload(&self) -> &ItemPayload {
        &self.payload
    }

    /// Returns the kind-specific payload for modification.
    pub fn payload_mut(&mut self) -> &mut ItemPayload {
        &mut self.payload
    }

    /// Returns the string payload for String items.
    pub fn as_string(&self) -> Option<&StringItemDefinition> {
        match &self.payload {
            ItemPayload::String(item) => Some(item),
            _ => None,
        }
    }

    /// Returns the string payload for String items, mutably.
    pub fn as_string_mut(&mut self) -> Option<&mut StringItemDefinition> {
        match &mut self.payload {
            ItemPayload::String(item) => Some(item),
            _ => None,
        }
    }

    /// Returns the group payload for Group items.
    pub fn as_group(&self) -> Option<&GroupItemDefinition> {
        match &self.payload {
            ItemPayload::Group(item) => Some(item),
            _ => None,
        }
    }

    /// Returns the group payload for Group items, mutably.
    pub fn as_group_mut(&mut self) -> Option<&mut GroupItemDefinition> {
        match &mut self.payload {
            ItemPayload::Group(item) => Some(item),
            _ => None,
        }
    }

    /// Child item definitions (empty for void items).
    pub fn children(&self) -> &[ItemDefinition] {
        match &self.payload {
            ItemPayload::Void => &[],
            ItemPayload::String(item) => item.items(),
            ItemPayload::Group(item) => item.items(),
        }
    }
}

/// Capability shared by everything that can hold item definitions.
///
/// Implemented by [`Definition`], [`GroupItemDefinition`] and
/// [`StringItemDefinition`].
pub trait ItemContainer {
    /// Item definitions held directly by this container, in insertion order.
    fn items(&self) -> &[ItemDefinition];

    #[doc(hidden)]
    fn items_mut(&mut self) -> &mut Vec<ItemDefinition>;

    /// Appends a new item definition.
    ///
    /// Returns `None` without modifying the container when an item with the
    /// same name already exists in it.
    fn add_item_definition(&mut self, kind: ItemKind, name: &str) -> Option<&mut ItemDefinition> {
        if self.find_item(name).is_some() {
            return None;
        }
        let items = self.items_mut();
        items.push(ItemDefinition::new(kind, name));
        items.last_mut()
    }

    /// Finds a direct child item definition by name.
    fn find_item(&self, name: &str) -> Option<&ItemDefinition> {
        self.items().iter().find(|item| item.name() == name)
    }
}

/// A discrete value and the child item it activates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalItem {
    /// Discrete value that must be selected.
    pub value: String,
    /// Name of the child item definition activated by the value.
    pub item: String,
}

/// Payload of a discrete string item.
///
/// # Examples
///
/// ```
/// use analysis_schema_core::{ItemContainer, ItemKind, StringItemDefinition};
///
/// let mut solver = StringItemDefinition::default();
/// assert!(solver.add_discrete_value("Implicit"));
/// assert!(solver.add_discrete_value("Explicit"));
/// assert!(!solver.add_discrete_value("Implicit"));
///
/// solver.add_item_definition(ItemKind::Group, "Implicit");
/// assert!(solver.add_conditional_item("Implicit", "Implicit"));
/// assert_eq!(solver.conditional_items_for("Implicit"), vec!["Implicit"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringItemDefinition {
    #[serde(default)]
    discrete_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    conditional_items: Vec<ConditionalItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<ItemDefinition>,
}

impl StringItemDefinition {
    /// Returns the discrete values in insertion order.
    pub fn discrete_values(&self) -> &[String] {
        &self.discrete_values
    }

    /// Returns `true` if `value` is one of the discrete values.
    pub fn has_discrete_value(&self, value: &str) -> bool {
        self.discrete_values.iter().any(|v| v == value)
    }

    /// Registers a discrete value. Returns `false` if it is already present.
    pub fn add_discrete_value(&mut self, value: &str) -> bool {
        if self.has_discrete_value(value) {
            return false;
        }
        self.discrete_values.push(value.to_string());
        true
    }

    /// Returns the value-to-item activations.
    pub fn conditional_items(&self) -> &[ConditionalItem] {
        &self.conditional_items
    }

    /// Makes the child item `item` active only when `value` is selected.
    ///
    /// Returns `false` without modification if `value` is not a discrete
    /// value, `item` is not a child of this item, or the pair is already
    /// registered.
    pub fn add_conditional_item(&mut self, value: &str, item: &str) -> bool {
        if !self.has_discrete_value(value) || self.find_item(item).is_none() {
            return false;
        }
        if self
            .conditional_items
            .iter()
            .any(|c| c.value == value && c.item == item)
        {
            return false;
        }
        self.conditional_items.push(ConditionalItem {
            value: value.to_string(),
            item: item.to_string(),
        });
        true
    }

    /// Names of the child items activated by `value`.
    pub fn conditional_items_for(&self, value: &str) -> Vec<&str> {
        self.conditional_items
            .iter()
            .filter(|c| c.value == value)
            .map(|c| c.item.as_str())
            .collect()
    }
}

impl ItemContainer for StringItemDefinition {
    fn items(&self) -> &[ItemDefinition] {
        &self.children
    }

    fn items_mut(&mut self) -> &mut Vec<ItemDefinition> {
        &mut self.children
    }
}

/// Payload of a group item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupItemDefinition {
    #[serde(default)]
    children: Vec<ItemDefinition>,
}

impl ItemContainer for GroupItemDefinition {
    fn items(&self) -> &[ItemDefinition] {
        &self.children
    }

    fn items_mut(&mut self) -> &mut Vec<ItemDefinition> {
        &mut self.children
    }
}

/// Attribute definition: a named root of item definitions.
///
/// # Examples
///
/// ```
/// use analysis_schema_core::{Definition, ItemContainer, ItemKind};
///
/// let mut def = Definition::new("SimType");
/// def.add_item_definition(ItemKind::Void, "Thermal");
/// assert!(def.add_item_definition(ItemKind::Void, "Thermal").is_none());
/// assert_eq!(def.items().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    items: Vec<ItemDefinition>,
}

impl Definition {
    /// Creates an empty definition of the given type.
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            items: Vec::new(),
        }
    }

    /// Returns the definition type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Depth-first search for an item definition anywhere in the tree.
    pub fn find_item_recursive(&self, name: &str) -> Option<&ItemDefinition> {
        fn search<'a>(items: &'a [ItemDefinition], name: &str) -> Option<&'a ItemDefinition> {
            for item in items {
                if item.name() == name {
                    return Some(item);
                }
                if let Some(found) = search(item.children(), name) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.items, name)
    }
}

impl ItemContainer for Definition {
    fn items(&self) -> &[ItemDefinition] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<ItemDefinition> {
        &mut self.items
    }
}

/// Collection of definitions keyed by unique type name.
///
/// # Examples
///
/// ```
/// use analysis_schema_core::{Definition, Resource};
///
/// let mut resource = Resource::new();
/// assert!(resource.create_definition("SimType").is_some());
/// assert!(resource.create_definition("SimType").is_none());
/// assert!(resource.add_definition(Definition::new("SimType")).is_none());
/// assert_eq!(resource.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    definitions: Vec<Definition>,
}

impl Resource {
    /// Creates an empty resource.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a definition by type name.
    pub fn find_definition(&self, type_name: &str) -> Option<&Definition> {
        self.definitions
            .iter()
            .find(|def| def.type_name() == type_name)
    }

    /// Creates an empty definition. Returns `None` if the type already exists.
    pub fn create_definition(&mut self, type_name: &str) -> Option<&mut Definition> {
        self.add_definition(Definition::new(type_name))?;
        self.definitions.last_mut()
    }

    /// Adds a fully built definition. Returns `None` and drops `definition`
    /// if its type already exists.
    pub fn add_definition(&mut self, definition: Definition) -> Option<&Definition> {
        if self.find_definition(definition.type_name()).is_some() {
            return None;
        }
        self.definitions.push(definition);
        self.definitions.last()
    }

    /// Returns the definitions in creation order.
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Returns the number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if the resource holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_payload_matches_kind() {
        assert_eq!(ItemDefinition::new(ItemKind::Void, "a").kind(), ItemKind::Void);
        assert!(ItemDefinition::new(ItemKind::String, "b").as_string().is_some());
        assert!(ItemDefinition::new(ItemKind::Group, "c").as_group().is_some());
        assert!(ItemDefinition::new(ItemKind::Void, "a").children().is_empty());
    }

    #[test]
    fn test_label_falls_back_to_name() {
        let mut item = ItemDefinition::new(ItemKind::Void, "Thermal");
        assert_eq!(item.label(), "Thermal");
        item.set_label("Heat");
        assert_eq!(item.label(), "Heat");
    }

    #[test]
    fn test_add_item_definition_rejects_duplicate_name() {
        let mut group = GroupItemDefinition::default();
        assert!(group.add_item_definition(ItemKind::Void, "x").is_some());
        assert!(group.add_item_definition(ItemKind::Group, "x").is_none());
        assert_eq!(group.items().len(), 1);
        assert_eq!(group.items()[0].kind(), ItemKind::Void);
    }

    #[test]
    fn test_conditional_item_requires_value_and_child() {
        let mut item = StringItemDefinition::default();
        item.add_item_definition(ItemKind::Group, "Flow");

        // value not registered yet
        assert!(!item.add_conditional_item("Flow", "Flow"));

        item.add_discrete_value("Flow");
        assert!(!item.add_conditional_item("Flow", "Missing"));
        assert!(item.add_conditional_item("Flow", "Flow"));
        assert!(!item.add_conditional_item("Flow", "Flow"));
        assert_eq!(item.conditional_items().len(), 1);
    }

    #[test]
    fn test_find_item_recursive_descends_into_children() {
        let mut def = Definition::new("SimType");
        let group = def
            .add_item_definition(ItemKind::Group, "Physics")
            .and_then(ItemDefinition::as_group_mut)
            .unwrap();
        group.add_item_definition(ItemKind::Void, "Gravity");

        assert_eq!(
            def.find_item_recursive("Gravity").map(ItemDefinition::kind),
            Some(ItemKind::Void)
        );
        assert!(def.find_item("Gravity").is_none());
    }

    #[test]
    fn test_definition_serializes_with_kind_tag() {
        let mut def = Definition::new("SimType");
        let item = def.add_item_definition(ItemKind::Void, "Thermal").unwrap();
        item.set_optional(true);

        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["type"], "SimType");
        assert_eq!(json["items"][0]["name"], "Thermal");
        assert_eq!(json["items"][0]["kind"], "void");
        assert_eq!(json["items"][0]["optional"], true);
    }
}
