//! Error type for analysis tree operations.

use thiserror::Error;

/// Errors returned by [`Analyses`](crate::Analyses) operations.
///
/// Every failing operation leaves the collection (and any target
/// [`Resource`](crate::Resource)) unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// An analysis with this name already exists.
    #[error("analysis already exists: {0}")]
    DuplicateAnalysis(String),
    /// No analysis with this name or handle exists.
    #[error("unknown analysis: {0}")]
    UnknownAnalysis(String),
    /// An analysis cannot be its own parent.
    #[error("analysis cannot be its own parent: {0}")]
    SelfParent(String),
    /// The requested parent is a descendant of the analysis.
    #[error("setting {parent} as parent of {child} would create a cycle")]
    ParentCycle {
        /// Analysis being re-parented.
        child: String,
        /// Requested parent.
        parent: String,
    },
    /// The target resource already holds a definition of this type.
    #[error("definition already exists: {0}")]
    DefinitionExists(String),
    /// An item definition name collided inside one container.
    #[error("duplicate item definition: {0}")]
    DuplicateItem(String),
    /// An analysis was selected without its parent.
    #[error("analysis {analysis} selected without its parent {parent}")]
    UnselectedParent {
        /// Selected analysis.
        analysis: String,
        /// Parent missing from the selection.
        parent: String,
    },
    /// Two mutually exclusive analyses were selected together.
    #[error("{first} and {second} are exclusive alternatives under {scope}")]
    ExclusiveConflict {
        /// Exclusive parent, or `<top level>`.
        scope: String,
        /// First selected alternative.
        first: String,
        /// Second selected alternative.
        second: String,
    },
}
