//! Definition and resource validation.
//!
//! Validates structural invariants of item-definition trees, catching errors
//! such as duplicate item names, duplicate discrete values and dangling
//! conditional items before they reach an editor or a serializer.
//!
//! # Examples
//!
//! ```
//! use analysis_schema_core::*;
//!
//! let mut def = Definition::new("SimType");
//! def.add_item_definition(ItemKind::Void, "Thermal");
//! assert!(validate_definition(&def).is_empty());
//!
//! // Invalid: empty type name
//! let bad = Definition::new(" ");
//! assert!(!validate_definition(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    Definition, ItemContainer, ItemDefinition, ItemPayload, Resource, StringItemDefinition,
};

/// Definition/resource validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. Paths are item names joined with `/`, starting at the
/// definition type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Definition type name is empty or whitespace-only.
    #[error("definition type cannot be empty")]
    EmptyTypeName,
    /// Two definitions in the same resource share a type name.
    #[error("duplicate definition in resource: {0}")]
    DuplicateDefinition(String),
    /// An item definition has an empty name.
    #[error("item name cannot be empty at: {0}")]
    EmptyItemName(String),
    /// Two items in the same container share a name.
    #[error("duplicate item in scope: {0}")]
    DuplicateItem(String),
    /// A string item lists the same discrete value twice.
    #[error("duplicate discrete value at {path}: {value}")]
    DuplicateDiscreteValue {
        /// Path of the string item.
        path: String,
        /// Repeated value.
        value: String,
    },
    /// A conditional item refers to a value the string item does not offer.
    #[error("conditional item at {path} refers to unknown value: {value}")]
    UnknownConditionalValue {
        /// Path of the string item.
        path: String,
        /// Missing value.
        value: String,
    },
    /// A conditional item refers to a child the string item does not hold.
    #[error("conditional item at {path} refers to unknown item: {item}")]
    UnknownConditionalItem {
        /// Path of the string item.
        path: String,
        /// Missing child item.
        item: String,
    },
}

/// Validates every definition of a resource.
///
/// Checks for duplicate definition types, then validates each definition
/// individually.
///
/// # Examples
///
/// ```
/// use analysis_schema_core::*;
///
/// let mut resource = Resource::new();
/// resource.create_definition("SimType");
/// assert!(validate_resource(&resource).is_empty());
/// ```
pub fn validate_resource(resource: &Resource) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for def in resource.definitions() {
        if !seen.insert(def.type_name()) {
            errors.push(ValidationError::DuplicateDefinition(
                def.type_name().to_string(),
            ));
            return errors;
        }
        errors.extend(validate_definition(def));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

/// Validates a single definition.
///
/// Checks for an empty type name, empty or duplicate item names per
/// container, duplicate discrete values and dangling conditional items.
pub fn validate_definition(def: &Definition) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if def.type_name().trim().is_empty() {
        errors.push(ValidationError::EmptyTypeName);
        return errors;
    }

    let mut path = vec![def.type_name().to_string()];
    errors.extend(validate_items(def.items(), &mut path));

    errors
}

fn validate_items(items: &[ItemDefinition], path: &mut Vec<String>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for item in items {
        let name = item.name();
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyItemName(path.join("/")));
            return errors;
        }
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateItem(format!(
                "{}/{name}",
                path.join("/")
            )));
            return errors;
        }

        path.push(name.to_string());
        if let ItemPayload::String(string) = item.payload() {
            errors.extend(validate_discrete(string, &path.join("/")));
        }
        if errors.is_empty() {
            errors.extend(validate_items(item.children(), path));
        }
        path.pop();
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_discrete(string: &StringItemDefinition, path: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for value in string.discrete_values() {
        if !seen.insert(value.as_str()) {
            errors.push(ValidationError::DuplicateDiscreteValue {
                path: path.to_string(),
                value: value.clone(),
            });
            return errors;
        }
    }

    for conditional in string.conditional_items() {
        if !seen.contains(conditional.value.as_str()) {
            errors.push(ValidationError::UnknownConditionalValue {
                path: path.to_string(),
                value: conditional.value.clone(),
            });
            return errors;
        }
        if string.find_item(&conditional.item).is_none() {
            errors.push(ValidationError::UnknownConditionalItem {
                path: path.to_string(),
                item: conditional.item.clone(),
            });
            return errors;
        }
    }

    errors
}
