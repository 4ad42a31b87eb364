//! File-based descriptions of analysis trees.
//!
//! An [`AnalysesConfig`] lists the analyses of a simulation setup (name,
//! label, exclusivity, categories, parent) together with the definitions to
//! build from them. It loads from YAML or JSON and turns into an
//! [`Analyses`](analysis_schema_core::Analyses) collection or a fully built
//! [`Resource`](analysis_schema_core::Resource).
//!
//! # Quick start
//!
//! ```
//! use analysis_schema_config::AnalysesConfig;
//!
//! let config = AnalysesConfig::from_yaml_str(r#"
//! version: "1.0"
//! analyses:
//!   - name: Flow
//!     exclusive: true
//!   - name: Laminar
//!     parent: Flow
//!   - name: Turbulent
//!     parent: Flow
//! definitions:
//!   - type: SimType
//!     label: Kind
//! "#).unwrap();
//!
//! let resource = config.build_resource().unwrap();
//! assert!(resource.find_definition("SimType").is_some());
//! ```

mod config;
mod error;

pub use config::{AnalysesConfig, AnalysisConfig, CONFIG_VERSION, DefinitionTarget};
pub use error::{ConfigError, Result};
