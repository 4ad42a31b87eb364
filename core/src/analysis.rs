//! Analysis nodes and the collection that owns them.
//!
//! An [`Analysis`] is one selectable aspect of a simulation (e.g. "Flow",
//! "Thermal"). Analyses form a forest: a node with children is either
//! *exclusive* (its children are alternatives, pick one) or *inclusive*
//! (its children can be toggled independently).
//!
//! All nodes live in an arena owned by [`Analyses`] and are addressed with
//! [`AnalysisId`] handles. Parent and child links are handles, so relinking
//! never invalidates anything.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AnalysisError;

/// Stable handle to an [`Analysis`] inside its owning [`Analyses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnalysisId(usize);

impl AnalysisId {
    /// Position of the analysis in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Shape of an analysis as seen by the definition builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// No children.
    Leaf,
    /// Children are mutually exclusive alternatives.
    Exclusive,
    /// Children are independent options.
    Inclusive,
}

/// A named node of the analysis forest.
///
/// Obtained from [`Analyses::create`]; the tree links (`parent`,
/// `children`) can only be changed through [`Analyses::set_parent`].
#[derive(Debug, Clone)]
pub struct Analysis {
    name: String,
    displayed_name: Option<String>,
    exclusive: bool,
    categories: BTreeSet<String>,
    parent: Option<AnalysisId>,
    children: Vec<AnalysisId>,
}

impl Analysis {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            displayed_name: None,
            exclusive: false,
            categories: BTreeSet::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Returns the unique analysis name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the displayed name, falling back to the name when unset.
    pub fn displayed_name(&self) -> &str {
        self.displayed_name.as_deref().unwrap_or(&self.name)
    }

    /// Sets the name shown to users.
    pub fn set_displayed_name(&mut self, displayed_name: &str) {
        self.displayed_name = Some(displayed_name.to_string());
    }

    /// Returns whether the children are mutually exclusive.
    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Marks the children as mutually exclusive (or not).
    pub fn set_exclusive(&mut self, exclusive: bool) {
        self.exclusive = exclusive;
    }

    /// Categories set directly on this analysis, without inheritance.
    ///
    /// See [`Analyses::categories`] for the inherited set.
    pub fn local_categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Replaces the local categories.
    pub fn set_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
    }

    /// Adds one local category.
    pub fn add_category(&mut self, category: &str) {
        self.categories.insert(category.to_string());
    }

    /// Returns the parent handle, if any.
    pub fn parent(&self) -> Option<AnalysisId> {
        self.parent
    }

    /// Children in the order they were attached.
    pub fn children(&self) -> &[AnalysisId] {
        &self.children
    }

    /// Classifies the node for item placement.
    pub fn shape(&self) -> Shape {
        if self.children.is_empty() {
            Shape::Leaf
        } else if self.exclusive {
            Shape::Exclusive
        } else {
            Shape::Inclusive
        }
    }
}

/// Owning collection of [`Analysis`] nodes with unique names.
///
/// # Examples
///
/// ```
/// use analysis_schema_core::Analyses;
///
/// let mut analyses = Analyses::new();
/// let flow = analyses.create("Flow").unwrap();
/// let laminar = analyses.create("Laminar").unwrap();
/// assert!(analyses.create("Flow").is_err());
///
/// analyses.get_mut(flow).unwrap().add_category("fluid");
/// analyses.set_parent(laminar, Some(flow)).unwrap();
///
/// assert_eq!(analyses.top_level(), vec![flow]);
/// assert!(analyses.categories(laminar).contains("fluid"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyses {
    nodes: Vec<Analysis>,
    by_name: HashMap<String, AnalysisId>,
    top_level_exclusive: bool,
}

impl Analyses {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new top-level analysis.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DuplicateAnalysis`] if the name is taken
    /// (names are case-sensitive); nothing is created in that case.
    pub fn create(&mut self, name: &str) -> Result<AnalysisId, AnalysisError> {
        if self.by_name.contains_key(name) {
            return Err(AnalysisError::DuplicateAnalysis(name.to_string()));
        }
        let id = AnalysisId(self.nodes.len());
        self.nodes.push(Analysis::new(name));
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Looks up an analysis handle by name.
    pub fn find(&self, name: &str) -> Option<AnalysisId> {
        self.by_name.get(name).copied()
    }

    /// Returns the analysis behind a handle.
    pub fn get(&self, id: AnalysisId) -> Option<&Analysis> {
        self.nodes.get(id.0)
    }

    /// Returns the analysis behind a handle for modification.
    pub fn get_mut(&mut self, id: AnalysisId) -> Option<&mut Analysis> {
        self.nodes.get_mut(id.0)
    }

    /// Looks up an analysis by name.
    pub fn analysis(&self, name: &str) -> Option<&Analysis> {
        self.find(name).and_then(|id| self.get(id))
    }

    /// Looks up an analysis by name for modification.
    pub fn analysis_mut(&mut self, name: &str) -> Option<&mut Analysis> {
        let id = self.find(name)?;
        self.get_mut(id)
    }

    /// Returns the number of analyses.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no analysis has been created.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all analyses in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (AnalysisId, &Analysis)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, analysis)| (AnalysisId(index), analysis))
    }

    /// Whether top-level analyses are alternatives to one another.
    pub fn top_level_exclusive(&self) -> bool {
        self.top_level_exclusive
    }

    /// Sets whether top-level analyses are alternatives to one another.
    pub fn set_top_level_exclusive(&mut self, exclusive: bool) {
        self.top_level_exclusive = exclusive;
    }

    /// Analyses without a parent, in creation order.
    pub fn top_level(&self) -> Vec<AnalysisId> {
        self.iter()
            .filter(|(_, analysis)| analysis.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// Walks the parent chain of `id`, nearest ancestor first.
    pub fn ancestors(&self, id: AnalysisId) -> impl Iterator<Item = AnalysisId> + '_ {
        let mut next = self.get(id).and_then(Analysis::parent);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.get(current).and_then(Analysis::parent);
            Some(current)
        })
    }

    /// Effective categories of `id`: its own plus those of every ancestor.
    ///
    /// Recomputed on every call. Returns an empty set for an unknown handle.
    pub fn categories(&self, id: AnalysisId) -> BTreeSet<String> {
        let Some(analysis) = self.get(id) else {
            return BTreeSet::new();
        };
        let mut result = analysis.categories.clone();
        for ancestor in self.ancestors(id) {
            result.extend(self.nodes[ancestor.0].categories.iter().cloned());
        }
        result
    }

    /// Moves `child` under `parent` (or to the top level when `None`).
    ///
    /// Setting the current parent again is a successful no-op and keeps the
    /// sibling order.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::UnknownAnalysis`] if either handle is invalid.
    /// - [`AnalysisError::SelfParent`] if `parent` is `child`.
    /// - [`AnalysisError::ParentCycle`] if `parent` is a descendant of `child`.
    ///
    /// Nothing changes when an error is returned.
    pub fn set_parent(
        &mut self,
        child: AnalysisId,
        parent: Option<AnalysisId>,
    ) -> Result<(), AnalysisError> {
        let current = self
            .get(child)
            .ok_or_else(|| AnalysisError::UnknownAnalysis(format!("#{}", child.0)))?
            .parent;
        if parent == current {
            return Ok(());
        }

        if let Some(p) = parent {
            if self.get(p).is_none() {
                return Err(AnalysisError::UnknownAnalysis(format!("#{}", p.0)));
            }
            if p == child {
                return Err(AnalysisError::SelfParent(self.nodes[child.0].name.clone()));
            }
            if self.ancestors(p).any(|ancestor| ancestor == child) {
                return Err(AnalysisError::ParentCycle {
                    child: self.nodes[child.0].name.clone(),
                    parent: self.nodes[p.0].name.clone(),
                });
            }
        }

        if let Some(old) = current {
            self.nodes[old.0].children.retain(|c| *c != child);
        }
        if let Some(p) = parent {
            self.nodes[p.0].children.push(child);
        }
        self.nodes[child.0].parent = parent;

        debug!(
            analysis = %self.nodes[child.0].name,
            parent = parent.map(|p| self.nodes[p.0].name.as_str()).unwrap_or("<none>"),
            "re-parented analysis"
        );
        Ok(())
    }

    /// Name-based form of [`set_parent`](Self::set_parent).
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnknownAnalysis`] if either name is missing,
    /// otherwise whatever [`set_parent`](Self::set_parent) returns.
    pub fn set_analysis_parent(&mut self, child: &str, parent: &str) -> Result<(), AnalysisError> {
        let child_id = self
            .find(child)
            .ok_or_else(|| AnalysisError::UnknownAnalysis(child.to_string()))?;
        let parent_id = self
            .find(parent)
            .ok_or_else(|| AnalysisError::UnknownAnalysis(parent.to_string()))?;
        self.set_parent(child_id, Some(parent_id))
    }

    pub(crate) fn node(&self, id: AnalysisId) -> &Analysis {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(analyses: &Analyses, ids: &[AnalysisId]) -> Vec<String> {
        ids.iter()
            .map(|id| analyses.get(*id).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_create_rejects_duplicate_name() {
        let mut analyses = Analyses::new();
        analyses.create("Flow").unwrap();

        assert_eq!(
            analyses.create("Flow"),
            Err(AnalysisError::DuplicateAnalysis("Flow".to_string()))
        );
        assert_eq!(analyses.len(), 1);
        // case-sensitive
        assert!(analyses.create("flow").is_ok());
    }

    #[test]
    fn test_displayed_name_defaults_to_name() {
        let mut analyses = Analyses::new();
        let id = analyses.create("Thermal").unwrap();
        assert_eq!(analyses.get(id).unwrap().displayed_name(), "Thermal");

        analyses
            .get_mut(id)
            .unwrap()
            .set_displayed_name("Heat Transfer");
        assert_eq!(analyses.get(id).unwrap().displayed_name(), "Heat Transfer");
    }

    #[test]
    fn test_set_parent_rejects_self() {
        let mut analyses = Analyses::new();
        let a = analyses.create("A").unwrap();

        assert_eq!(
            analyses.set_parent(a, Some(a)),
            Err(AnalysisError::SelfParent("A".to_string()))
        );
        assert_eq!(analyses.get(a).unwrap().parent(), None);
    }

    #[test]
    fn test_set_parent_rejects_descendant() {
        let mut analyses = Analyses::new();
        let a = analyses.create("A").unwrap();
        let b = analyses.create("B").unwrap();
        let c = analyses.create("C").unwrap();
        analyses.set_parent(b, Some(a)).unwrap();
        analyses.set_parent(c, Some(b)).unwrap();

        let err = analyses.set_parent(a, Some(c)).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::ParentCycle {
                child: "A".to_string(),
                parent: "C".to_string(),
            }
        );
        assert_eq!(analyses.get(a).unwrap().parent(), None);
        assert!(analyses.get(c).unwrap().children().is_empty());
    }

    #[test]
    fn test_reparent_moves_between_children_lists() {
        let mut analyses = Analyses::new();
        let p1 = analyses.create("P1").unwrap();
        let p2 = analyses.create("P2").unwrap();
        let other = analyses.create("Other").unwrap();
        let x = analyses.create("X").unwrap();

        analyses.set_parent(other, Some(p2)).unwrap();
        analyses.set_parent(x, Some(p1)).unwrap();
        analyses.set_parent(x, Some(p2)).unwrap();

        assert!(analyses.get(p1).unwrap().children().is_empty());
        assert_eq!(names(&analyses, analyses.get(p2).unwrap().children()), ["Other", "X"]);
        assert_eq!(analyses.get(x).unwrap().parent(), Some(p2));

        analyses.set_parent(x, Some(p2)).unwrap();
        assert_eq!(names(&analyses, analyses.get(p2).unwrap().children()), ["Other", "X"]);
    }

    #[test]
    fn test_set_parent_none_detaches() {
        let mut analyses = Analyses::new();
        let p = analyses.create("P").unwrap();
        let x = analyses.create("X").unwrap();
        analyses.set_parent(x, Some(p)).unwrap();
        analyses.set_parent(x, None).unwrap();

        assert!(analyses.get(p).unwrap().children().is_empty());
        assert_eq!(analyses.top_level(), vec![p, x]);
    }

    #[test]
    fn test_set_analysis_parent_unknown_names() {
        let mut analyses = Analyses::new();
        analyses.create("A").unwrap();

        assert_eq!(
            analyses.set_analysis_parent("A", "Missing"),
            Err(AnalysisError::UnknownAnalysis("Missing".to_string()))
        );
        assert_eq!(
            analyses.set_analysis_parent("Missing", "A"),
            Err(AnalysisError::UnknownAnalysis("Missing".to_string()))
        );
    }

    #[test]
    fn test_categories_include_ancestors() {
        let mut analyses = Analyses::new();
        let c = analyses.create("C").unwrap();
        let b = analyses.create("B").unwrap();
        let a = analyses.create("A").unwrap();
        analyses.get_mut(c).unwrap().set_categories(["solid"]);
        analyses.get_mut(b).unwrap().add_category("heat");
        analyses.get_mut(a).unwrap().add_category("radiation");
        analyses.set_analysis_parent("A", "B").unwrap();
        analyses.set_analysis_parent("B", "C").unwrap();

        let cats: Vec<_> = analyses.categories(a).into_iter().collect();
        assert_eq!(cats, ["heat", "radiation", "solid"]);
        assert_eq!(analyses.get(a).unwrap().local_categories().len(), 1);
    }

    #[test]
    fn test_shape() {
        let mut analyses = Analyses::new();
        let p = analyses.create("P").unwrap();
        let c = analyses.create("C").unwrap();
        assert_eq!(analyses.get(p).unwrap().shape(), Shape::Leaf);

        analyses.set_parent(c, Some(p)).unwrap();
        assert_eq!(analyses.get(p).unwrap().shape(), Shape::Inclusive);

        analyses.get_mut(p).unwrap().set_exclusive(true);
        assert_eq!(analyses.get(p).unwrap().shape(), Shape::Exclusive);
    }
}
