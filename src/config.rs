//! `typegen.yaml`: which package to generate and which root types to start from.
//!
//! ```yaml
//! package: alerts
//! types:
//!   - AlertsNrqlCondition
//!   - AlertsPolicy
//! scalars:
//!   EpochMilliseconds: i64
//! ```
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path_de::{from_yaml_str_with_path, PathError};
use crate::render::RenderOptions;

pub const DEFAULT_CONFIG_FILE: &str = "typegen.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Target package (module) name written into the generated header.
    #[serde(default)]
    pub package: String,
    /// Root type names, in the order given.
    #[serde(default)]
    pub types: Vec<String>,
    /// GraphQL scalar → Rust type overrides.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub scalars: IndexMap<String, String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config {0}")]
    Yaml(#[from] PathError),
    #[error("config lists no types to generate")]
    NoTypes,
    #[error("no package name given (set `package` in the config or pass -p)")]
    NoPackage,
}

impl Config {
    pub fn from_yaml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(from_yaml_str_with_path::<Config>(src)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&src)
    }

    /// `-p` on the command line beats the file.
    pub fn with_package(mut self, package: Option<String>) -> Self {
        if let Some(package) = package {
            self.package = package;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.types.is_empty() {
            return Err(ConfigError::NoTypes);
        }
        if self.package.trim().is_empty() {
            return Err(ConfigError::NoPackage);
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions { scalars: self.scalars.clone() }
    }
}
