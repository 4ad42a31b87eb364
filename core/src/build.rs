//! Materializes an analysis forest as an attribute [`Definition`].
//!
//! Every analysis becomes either an item definition or a discrete value,
//! depending on its own [`Shape`] and on the kind of container it is placed
//! in. The full rule set is the [`placement`] table:
//!
//! | container \ shape  | Leaf          | Exclusive                  | Inclusive                 |
//! |--------------------|---------------|----------------------------|---------------------------|
//! | Definition, Group  | optional Void | optional String            | optional Group            |
//! | Discrete (String)  | value         | value + conditional String | value + conditional Group |
//!
//! Children of an exclusive analysis are inserted into its String item as
//! [`ContainerKind::Discrete`]; children of an inclusive analysis are
//! inserted into its Group item as [`ContainerKind::Group`].

use tracing::{debug, info};

use crate::analysis::Shape;
use crate::{
    AnalysisError, AnalysisId, Analyses, Definition, GroupItemDefinition, ItemContainer,
    ItemDefinition, ItemKind, ItemPayload, Resource, StringItemDefinition,
};

/// Kind of container an analysis is inserted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Root of an attribute definition.
    Definition,
    /// Group item: siblings are all present together.
    Group,
    /// String item: siblings are discrete alternatives.
    Discrete,
}

/// Mutable borrow of a container, tagged with its kind.
#[derive(Debug)]
pub enum Container<'a> {
    /// Root of an attribute definition.
    Definition(&'a mut Definition),
    /// Group item payload.
    Group(&'a mut GroupItemDefinition),
    /// String item payload.
    Discrete(&'a mut StringItemDefinition),
}

impl Container<'_> {
    /// Returns the kind of container.
    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::Definition(_) => ContainerKind::Definition,
            Container::Group(_) => ContainerKind::Group,
            Container::Discrete(_) => ContainerKind::Discrete,
        }
    }
}

/// What inserting one analysis into one container produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Register the analysis name as a discrete value on the container.
    pub discrete_value: bool,
    /// Item definition to create, if any.
    pub item: Option<ItemKind>,
    /// Whether the created item is optional.
    pub optional: bool,
    /// Whether the created item is conditional on the discrete value.
    pub conditional: bool,
}

/// The builder's dispatch table.
///
/// # Examples
///
/// ```
/// use analysis_schema_core::{placement, ContainerKind, ItemKind, Shape};
///
/// let p = placement(ContainerKind::Group, Shape::Leaf);
/// assert_eq!(p.item, Some(ItemKind::Void));
/// assert!(p.optional);
///
/// let p = placement(ContainerKind::Discrete, Shape::Leaf);
/// assert!(p.discrete_value);
/// assert_eq!(p.item, None);
/// ```
pub fn placement(container: ContainerKind, shape: Shape) -> Placement {
    let kind = match shape {
        Shape::Leaf => ItemKind::Void,
        Shape::Exclusive => ItemKind::String,
        Shape::Inclusive => ItemKind::Group,
    };
    match container {
        ContainerKind::Definition | ContainerKind::Group => Placement {
            discrete_value: false,
            item: Some(kind),
            optional: true,
            conditional: false,
        },
        ContainerKind::Discrete => Placement {
            discrete_value: true,
            item: (shape != Shape::Leaf).then_some(kind),
            optional: false,
            conditional: shape != Shape::Leaf,
        },
    }
}

impl Analyses {
    /// Inserts the analysis `id` (and, recursively, its children) into
    /// `container` following the [`placement`] table.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnknownAnalysis`] for an invalid handle and
    /// [`AnalysisError::DuplicateItem`] if the container already holds an
    /// item with the analysis' name. The container may be partially
    /// populated when the error comes from a descendant.
    pub fn insert_into(&self, id: AnalysisId, container: Container<'_>) -> Result<(), AnalysisError> {
        let analysis = self
            .get(id)
            .ok_or_else(|| AnalysisError::UnknownAnalysis(format!("#{}", id.index())))?;
        let name = analysis.name();
        let plan = placement(container.kind(), analysis.shape());
        debug!(analysis = name, container = ?container.kind(), ?plan, "inserting analysis");

        let item = match container {
            Container::Definition(def) => add_item(def, name, plan)?,
            Container::Group(group) => add_item(group, name, plan)?,
            Container::Discrete(string) => {
                if plan.discrete_value {
                    string.add_discrete_value(name);
                }
                if plan.item.is_none() {
                    return Ok(());
                }
                let item = add_item(&mut *string, name, plan)?;
                item.set_label(analysis.displayed_name());
                self.insert_children(id, item)?;
                if plan.conditional {
                    string.add_conditional_item(name, name);
                }
                return Ok(());
            }
        };
        item.set_label(analysis.displayed_name());
        self.insert_children(id, item)
    }

    fn insert_children(&self, id: AnalysisId, item: &mut ItemDefinition) -> Result<(), AnalysisError> {
        let children = self.node(id).children();
        match item.payload_mut() {
            ItemPayload::Void => {}
            ItemPayload::String(string) => {
                for child in children {
                    self.insert_into(*child, Container::Discrete(&mut *string))?;
                }
            }
            ItemPayload::Group(group) => {
                for child in children {
                    self.insert_into(*child, Container::Group(&mut *group))?;
                }
            }
        }
        Ok(())
    }

    /// Builds a definition named `type_name` from the analysis forest and adds
    /// it to `resource`.
    ///
    /// With [`top_level_exclusive`](Self::top_level_exclusive) set, the
    /// definition holds a single String item named and labeled `label` whose
    /// discrete values are the top-level analyses. Otherwise every top-level
    /// analysis contributes its own item.
    ///
    /// The definition is assembled off to the side and only added to
    /// `resource` once complete.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DefinitionExists`] if `resource` already
    /// holds `type_name`; the resource is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use analysis_schema_core::{Analyses, ItemContainer, ItemKind, Resource};
    ///
    /// let mut analyses = Analyses::new();
    /// analyses.create("Thermal").unwrap();
    ///
    /// let mut resource = Resource::new();
    /// let def = analyses
    ///     .build_analyses_definition(&mut resource, "SimType", "Kind")
    ///     .unwrap();
    /// assert_eq!(def.find_item("Thermal").unwrap().kind(), ItemKind::Void);
    ///
    /// assert!(analyses
    ///     .build_analyses_definition(&mut resource, "SimType", "Kind")
    ///     .is_err());
    /// ```
    pub fn build_analyses_definition<'r>(
        &self,
        resource: &'r mut Resource,
        type_name: &str,
        label: &str,
    ) -> Result<&'r Definition, AnalysisError> {
        if resource.find_definition(type_name).is_some() {
            return Err(AnalysisError::DefinitionExists(type_name.to_string()));
        }

        let mut def = Definition::new(type_name);
        let top = self.top_level();

        if self.top_level_exclusive() {
            let item = def
                .add_item_definition(ItemKind::String, label)
                .ok_or_else(|| AnalysisError::DuplicateItem(label.to_string()))?;
            item.set_label(label);
            if let Some(string) = item.as_string_mut() {
                for id in &top {
                    self.insert_into(*id, Container::Discrete(&mut *string))?;
                }
            }
        } else {
            for id in &top {
                self.insert_into(*id, Container::Definition(&mut def))?;
            }
        }

        info!(
            definition = type_name,
            top_level = top.len(),
            items = def.items().len(),
            "built analyses definition"
        );
        resource
            .add_definition(def)
            .ok_or_else(|| AnalysisError::DefinitionExists(type_name.to_string()))
    }
}

fn add_item<'c, C: ItemContainer>(
    container: &'c mut C,
    name: &str,
    plan: Placement,
) -> Result<&'c mut ItemDefinition, AnalysisError> {
    let kind = plan.item.unwrap_or(ItemKind::Void);
    let item = container
        .add_item_definition(kind, name)
        .ok_or_else(|| AnalysisError::DuplicateItem(name.to_string()))?;
    item.set_optional(plan.optional);
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_table() {
        for container in [ContainerKind::Definition, ContainerKind::Group] {
            assert_eq!(placement(container, Shape::Leaf).item, Some(ItemKind::Void));
            assert_eq!(placement(container, Shape::Exclusive).item, Some(ItemKind::String));
            assert_eq!(placement(container, Shape::Inclusive).item, Some(ItemKind::Group));
            assert!(!placement(container, Shape::Leaf).discrete_value);
        }

        let leaf = placement(ContainerKind::Discrete, Shape::Leaf);
        assert!(leaf.discrete_value && !leaf.conditional && leaf.item.is_none());

        let exclusive = placement(ContainerKind::Discrete, Shape::Exclusive);
        assert_eq!(exclusive.item, Some(ItemKind::String));
        assert!(exclusive.conditional && !exclusive.optional);

        let inclusive = placement(ContainerKind::Discrete, Shape::Inclusive);
        assert_eq!(inclusive.item, Some(ItemKind::Group));
        assert!(inclusive.conditional);
    }

    #[test]
    fn test_inclusive_parent_builds_group() {
        let mut analyses = Analyses::new();
        analyses.create("Physics").unwrap();
        analyses.create("Gravity").unwrap();
        analyses.create("Radiation").unwrap();
        analyses.set_analysis_parent("Gravity", "Physics").unwrap();
        analyses.set_analysis_parent("Radiation", "Physics").unwrap();
        analyses
            .analysis_mut("Radiation")
            .unwrap()
            .set_displayed_name("Thermal Radiation");

        let mut resource = Resource::new();
        let def = analyses
            .build_analyses_definition(&mut resource, "Sim", "Kind")
            .unwrap();

        assert_eq!(def.items().len(), 1);
        let physics = def.find_item("Physics").unwrap();
        assert!(physics.is_optional());
        let group = physics.as_group().unwrap();
        let names: Vec<_> = group.items().iter().map(ItemDefinition::name).collect();
        assert_eq!(names, ["Gravity", "Radiation"]);
        assert!(group.items().iter().all(ItemDefinition::is_optional));
        assert_eq!(group.find_item("Radiation").unwrap().label(), "Thermal Radiation");
    }

    #[test]
    fn test_exclusive_child_with_children_becomes_conditional() {
        let mut analyses = Analyses::new();
        for name in ["Solver", "Implicit", "Explicit", "Newton", "Picard", "Tol"] {
            analyses.create(name).unwrap();
        }
        analyses.analysis_mut("Solver").unwrap().set_exclusive(true);
        analyses.analysis_mut("Implicit").unwrap().set_exclusive(true);
        analyses.set_analysis_parent("Implicit", "Solver").unwrap();
        analyses.set_analysis_parent("Explicit", "Solver").unwrap();
        analyses.set_analysis_parent("Newton", "Implicit").unwrap();
        analyses.set_analysis_parent("Picard", "Implicit").unwrap();
        analyses.set_analysis_parent("Tol", "Explicit").unwrap();

        let mut resource = Resource::new();
        let def = analyses
            .build_analyses_definition(&mut resource, "Sim", "Kind")
            .unwrap();

        let solver = def.find_item("Solver").unwrap().as_string().unwrap();
        assert_eq!(solver.discrete_values(), ["Implicit", "Explicit"]);
        assert_eq!(solver.conditional_items_for("Implicit"), ["Implicit"]);
        assert_eq!(solver.conditional_items_for("Explicit"), ["Explicit"]);

        let implicit = solver.find_item("Implicit").unwrap();
        assert!(!implicit.is_optional());
        assert_eq!(implicit.as_string().unwrap().discrete_values(), ["Newton", "Picard"]);

        let explicit = solver.find_item("Explicit").unwrap().as_group().unwrap();
        assert_eq!(explicit.find_item("Tol").unwrap().kind(), ItemKind::Void);
    }

    #[test]
    fn test_empty_forest_builds_empty_definition() {
        let analyses = Analyses::new();
        let mut resource = Resource::new();
        let def = analyses
            .build_analyses_definition(&mut resource, "Sim", "Kind")
            .unwrap();
        assert!(def.items().is_empty());
        assert_eq!(resource.len(), 1);
    }

    #[test]
    fn test_insert_into_group_container_directly() {
        let mut analyses = Analyses::new();
        let leaf = analyses.create("Leaf").unwrap();

        let mut group = GroupItemDefinition::default();
        analyses.insert_into(leaf, Container::Group(&mut group)).unwrap();
        assert_eq!(
            analyses.insert_into(leaf, Container::Group(&mut group)),
            Err(AnalysisError::DuplicateItem("Leaf".to_string()))
        );
        assert_eq!(group.items().len(), 1);
    }
}
