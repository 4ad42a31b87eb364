//! Configuration describing an analysis tree and its build targets.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! top_level_exclusive: false
//! analyses:
//!   - name: Flow
//!     exclusive: true
//!     categories: [fluid]
//!   - name: Laminar
//!     parent: Flow
//!   - name: Turbulent
//!     label: Turbulent Flow
//!     parent: Flow
//!   - name: Thermal
//!     categories: [heat]
//! definitions:
//!   - type: SimType
//!     label: Kind
//! ```
//!
//! Parents may be listed before or after their children.

use std::io::{BufReader, BufWriter};
use std::path::Path;

use analysis_schema_core::{Analyses, AnalysisId, Resource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Configuration format version written by [`AnalysesConfig::from_analyses`].
pub const CONFIG_VERSION: &str = "1.0";

/// One analysis entry.
///
/// # Examples
///
/// ```
/// # use analysis_schema_config::AnalysisConfig;
/// let entry: AnalysisConfig = serde_yaml::from_str("name: Flow\nexclusive: true").unwrap();
/// assert!(entry.exclusive);
/// assert!(entry.parent.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Unique analysis name.
    pub name: String,
    /// Displayed name; the name is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether the children are mutually exclusive.
    #[serde(default)]
    pub exclusive: bool,
    /// Local categories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    /// Name of the parent analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// A definition to build from the analysis tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionTarget {
    /// Definition type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Name and label of the top-level choice when analyses are exclusive at
    /// the top level. Defaults to the type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DefinitionTarget {
    /// Returns the choice label, falling back to the type name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.type_name)
    }
}

/// Top-level analysis configuration.
///
/// # Examples
///
/// ```no_run
/// use analysis_schema_config::AnalysesConfig;
///
/// let config = AnalysesConfig::load("analyses.yaml").unwrap();
/// let analyses = config.to_analyses().unwrap();
/// println!("{} analyses, {} top level", analyses.len(), analyses.top_level().len());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysesConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Whether top-level analyses are alternatives to one another.
    #[serde(default)]
    pub top_level_exclusive: bool,
    /// Analyses, in creation order.
    #[serde(default)]
    pub analyses: Vec<AnalysisConfig>,
    /// Definitions to build.
    #[serde(default)]
    pub definitions: Vec<DefinitionTarget>,
}

impl AnalysesConfig {
    /// Loads configuration from a `.yaml`/`.yml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// [`YamlError`](ConfigError::YamlError) or
    /// [`JsonError`](ConfigError::JsonError) if parsing fails, and
    /// [`InvalidConfig`](ConfigError::InvalidConfig) for an unsupported
    /// extension or an empty version.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = match format {
            Format::Yaml => serde_yaml::from_reader(reader)?,
            Format::Json => serde_json::from_reader(reader)?,
        };
        config.check()?;
        info!(
            path = %path.display(),
            analyses = config.analyses.len(),
            definitions = config.definitions.len(),
            "loaded analyses config"
        );
        Ok(config)
    }

    /// Saves the configuration, choosing the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be
    /// written, a serialization error, or
    /// [`InvalidConfig`](ConfigError::InvalidConfig) for an unsupported
    /// extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        match format {
            Format::Yaml => serde_yaml::to_writer(writer, self)?,
            Format::Json => serde_json::to_writer_pretty(writer, self)?,
        }
        Ok(())
    }

    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError`](ConfigError::YamlError) if parsing fails or
    /// [`InvalidConfig`](ConfigError::InvalidConfig) for an empty version.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "version cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates the described analysis tree.
    ///
    /// Every analysis is created before any parent is linked. Entry order
    /// sets creation order and the order of each parent's children.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Analysis`] for duplicate names, unknown
    /// parents, self-parenting or parent cycles.
    pub fn to_analyses(&self) -> Result<Analyses> {
        let mut analyses = Analyses::new();
        analyses.set_top_level_exclusive(self.top_level_exclusive);

        for entry in &self.analyses {
            let id = analyses.create(&entry.name)?;
            if let Some(analysis) = analyses.get_mut(id) {
                analysis.set_exclusive(entry.exclusive);
                analysis.set_categories(entry.categories.iter().cloned());
                if let Some(label) = &entry.label {
                    analysis.set_displayed_name(label);
                }
            }
        }

        for entry in &self.analyses {
            if let Some(parent) = &entry.parent {
                debug!(analysis = %entry.name, parent = %parent, "linking analysis");
                analyses.set_analysis_parent(&entry.name, parent)?;
            }
        }

        Ok(analyses)
    }

    /// Describes an existing analysis tree, with no definition targets.
    ///
    /// Entries are written depth first: top-level analyses in
    /// [`Analyses::top_level`] order, each followed by its subtree in
    /// `children()` order. Loading the result with
    /// [`to_analyses`](Self::to_analyses) restores the same child order, so
    /// rebuilt definitions match the originals.
    ///
    /// # Examples
    ///
    /// ```
    /// use analysis_schema_config::AnalysesConfig;
    /// use analysis_schema_core::Analyses;
    ///
    /// let mut analyses = Analyses::new();
    /// analyses.create("Flow").unwrap();
    /// analyses.create("Laminar").unwrap();
    /// analyses.set_analysis_parent("Laminar", "Flow").unwrap();
    ///
    /// let config = AnalysesConfig::from_analyses(&analyses);
    /// assert_eq!(config.analyses[1].parent.as_deref(), Some("Flow"));
    /// ```
    pub fn from_analyses(analyses: &Analyses) -> Self {
        let mut entries = Vec::with_capacity(analyses.len());
        let mut pending: Vec<AnalysisId> = analyses.top_level().into_iter().rev().collect();

        while let Some(id) = pending.pop() {
            let Some(analysis) = analyses.get(id) else {
                continue;
            };
            entries.push(AnalysisConfig {
                name: analysis.name().to_string(),
                label: (analysis.displayed_name() != analysis.name())
                    .then(|| analysis.displayed_name().to_string()),
                exclusive: analysis.is_exclusive(),
                categories: analysis.local_categories().iter().cloned().collect(),
                parent: analysis
                    .parent()
                    .and_then(|p| analyses.get(p))
                    .map(|p| p.name().to_string()),
            });
            pending.extend(analysis.children().iter().rev().copied());
        }

        Self {
            version: CONFIG_VERSION.to_string(),
            top_level_exclusive: analyses.top_level_exclusive(),
            analyses: entries,
            definitions: Vec::new(),
        }
    }

    /// Builds every definition target into a fresh [`Resource`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Analysis`] if the tree cannot be created or a
    /// target type is listed twice.
    pub fn build_resource(&self) -> Result<Resource> {
        let analyses = self.to_analyses()?;
        let mut resource = Resource::new();
        for target in &self.definitions {
            analyses.build_analyses_definition(&mut resource, &target.type_name, target.label())?;
        }
        Ok(resource)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::InvalidConfig(format!(
                "unsupported config extension: {}",
                path.display()
            ))),
        }
    }
}
