//! Checking a set of enabled analyses and deriving its categories.
//!
//! A selection is what a user ends up with after filling in a definition
//! built by [`Analyses::build_analyses_definition`]: a set of enabled
//! analyses. It is consistent when every enabled analysis also has its parent
//! enabled and no two alternatives of the same exclusive scope are enabled.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::{AnalysisError, AnalysisId, Analyses};

const TOP_LEVEL_SCOPE: &str = "<top level>";

impl Analyses {
    /// Resolves and checks a selection of analysis names.
    ///
    /// Returns the handles in selection order with duplicates removed.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::UnknownAnalysis`] for a name not in the collection.
    /// - [`AnalysisError::UnselectedParent`] when an analysis is selected
    ///   without its parent.
    /// - [`AnalysisError::ExclusiveConflict`] when two children of an
    ///   exclusive analysis, or two top-level analyses while
    ///   [`top_level_exclusive`](Self::top_level_exclusive) is set, are both
    ///   selected.
    ///
    /// # Examples
    ///
    /// ```
    /// use analysis_schema_core::{Analyses, AnalysisError};
    ///
    /// let mut analyses = Analyses::new();
    /// let flow = analyses.create("Flow").unwrap();
    /// analyses.get_mut(flow).unwrap().set_exclusive(true);
    /// analyses.create("Laminar").unwrap();
    /// analyses.create("Turbulent").unwrap();
    /// analyses.set_analysis_parent("Laminar", "Flow").unwrap();
    /// analyses.set_analysis_parent("Turbulent", "Flow").unwrap();
    ///
    /// assert!(analyses.validate_selection(&["Flow", "Laminar"]).is_ok());
    /// assert!(matches!(
    ///     analyses.validate_selection(&["Flow", "Laminar", "Turbulent"]),
    ///     Err(AnalysisError::ExclusiveConflict { .. })
    /// ));
    /// ```
    pub fn validate_selection<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<AnalysisId>, AnalysisError> {
        let mut selected = Vec::new();
        let mut seen = HashSet::new();
        for name in names {
            let name = name.as_ref();
            let id = self
                .find(name)
                .ok_or_else(|| AnalysisError::UnknownAnalysis(name.to_string()))?;
            if seen.insert(id) {
                selected.push(id);
            }
        }

        let mut chosen: HashMap<Option<AnalysisId>, AnalysisId> = HashMap::new();
        for &id in &selected {
            let analysis = self.node(id);
            let parent = analysis.parent();

            if let Some(p) = parent {
                if !seen.contains(&p) {
                    return Err(AnalysisError::UnselectedParent {
                        analysis: analysis.name().to_string(),
                        parent: self.node(p).name().to_string(),
                    });
                }
            }

            let exclusive_scope = match parent {
                Some(p) => self.node(p).is_exclusive(),
                None => self.top_level_exclusive(),
            };
            if !exclusive_scope {
                continue;
            }
            if let Some(&first) = chosen.get(&parent) {
                return Err(AnalysisError::ExclusiveConflict {
                    scope: parent
                        .map(|p| self.node(p).name().to_string())
                        .unwrap_or_else(|| TOP_LEVEL_SCOPE.to_string()),
                    first: self.node(first).name().to_string(),
                    second: analysis.name().to_string(),
                });
            }
            chosen.insert(parent, id);
        }

        Ok(selected)
    }

    /// Categories implied by a selection: the union of the effective
    /// categories of every selected analysis.
    ///
    /// # Errors
    ///
    /// Same as [`validate_selection`](Self::validate_selection).
    pub fn selection_categories<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<BTreeSet<String>, AnalysisError> {
        let selected = self.validate_selection(names)?;
        Ok(selected
            .into_iter()
            .flat_map(|id| self.categories(id))
            .collect())
    }
}
