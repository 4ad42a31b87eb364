//! Analysis trees and the attribute definitions built from them.
//!
//! This crate models the choices a simulation setup offers and turns them
//! into an editable schema:
//!
//! - [`Analyses`] — an arena of named [`Analysis`] nodes forming a forest.
//!   A node is *exclusive* when its children are alternatives and
//!   *inclusive* when they can be enabled independently. Nodes carry
//!   categories that are inherited by their descendants.
//! - [`Definition`] / [`ItemDefinition`] — the item-definition model (Void,
//!   discrete String, Group) stored in a [`Resource`].
//! - [`Analyses::build_analyses_definition`] — turns the forest into a
//!   [`Definition`] following the [`placement`] table.
//!
//! Selections of enabled analyses can be checked and mapped to categories
//! ([`Analyses::validate_selection`], [`Analyses::selection_categories`]).
//! Validation ([`validate_definition`], [`validate_resource`]) catches
//! structural errors in any definition tree.
//!
//! # Example
//!
//! ```
//! use analysis_schema_core::*;
//!
//! let mut analyses = Analyses::new();
//! let flow = analyses.create("Flow").unwrap();
//! analyses.get_mut(flow).unwrap().set_exclusive(true);
//! analyses.create("Laminar").unwrap();
//! analyses.create("Turbulent").unwrap();
//! analyses.create("Thermal").unwrap();
//! analyses.set_analysis_parent("Laminar", "Flow").unwrap();
//! analyses.set_analysis_parent("Turbulent", "Flow").unwrap();
//!
//! let mut resource = Resource::new();
//! let def = analyses
//!     .build_analyses_definition(&mut resource, "SimType", "Kind")
//!     .unwrap();
//!
//! let flow = def.find_item("Flow").unwrap();
//! assert_eq!(flow.kind(), ItemKind::String);
//! assert_eq!(flow.as_string().unwrap().discrete_values(), ["Laminar", "Turbulent"]);
//! assert_eq!(def.find_item("Thermal").unwrap().kind(), ItemKind::Void);
//! assert!(validate_resource(&resource).is_empty());
//! ```

mod analysis;
mod build;
mod definition;
mod error;
mod selection;
mod validate;

pub use analysis::{Analyses, Analysis, AnalysisId, Shape};
pub use build::{Container, ContainerKind, Placement, placement};
pub use definition::{
    ConditionalItem, Definition, GroupItemDefinition, ItemContainer, ItemDefinition, ItemKind,
    ItemPayload, Resource, StringItemDefinition,
};
pub use error::AnalysisError;
pub use validate::{ValidationError, validate_definition, validate_resource};
