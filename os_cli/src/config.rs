//! `histo` configuration file
//!
//! ```toml
//! [logging]
//! min_log_level = "debug"
//!
//! [types]
//! tracks = ["tracks_2021", "tracks_2022"]
//!
//! [actions]
//! tags = ["featureStyleAction"]
//!
//! [bin]
//! method = "numeric"
//! width = 5.0
//! ```

use crate::commands::{MethodKind, SortKind};
use crate::error::{CliError, CliResult};
use os_filter::config::runtime::LoggingPreferences;
use os_filter::{IdentityTypeResolver, StaticTypeResolver, TypeResolver, XmlActionFactory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub logging: LoggingPreferences,

    /// Filter action type name to the layer types it applies to
    pub types: BTreeMap<String, Vec<String>>,

    pub actions: ActionConfig,
    pub bin: BinDefaults,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Action element names kept when parsing; empty accepts every element
    pub tags: Vec<String>,
}

/// Defaults for `histo bin` flags that were not given
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinDefaults {
    pub method: Option<MethodKind>,
    pub width: Option<f64>,
    pub offset: Option<f64>,
    pub date_type: Option<String>,
    pub sort: Option<SortKind>,
    pub descending: bool,
}

impl CliConfig {
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        toml::from_str(&text).map_err(|e| CliError::config(path, e))
    }

    /// Config file when given, environment defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Type map from the file; without one every type resolves to itself
    pub fn resolver(&self) -> Box<dyn TypeResolver> {
        if self.types.is_empty() {
            return Box::new(IdentityTypeResolver);
        }

        let mut resolver = StaticTypeResolver::new();
        for (type_name, resolved) in &self.types {
            resolver.insert(type_name, resolved.iter().cloned());
        }
        Box::new(resolver)
    }

    pub fn action_factory(&self) -> XmlActionFactory {
        if self.actions.tags.is_empty() {
            XmlActionFactory::permissive()
        } else {
            XmlActionFactory::new(self.actions.tags.iter().cloned())
        }
    }
}
