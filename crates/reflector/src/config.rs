//! Reflector configuration (reflector.toml)
//!
//! Controls what the build pass introspects and infers. Every field has a
//! default, so an empty document is a valid configuration:
//!
//! ```toml
//! reserved_members = ["length", "name", "prototype", "constructor"]
//! extract_parameter_names = true
//! infer_types = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReflectResult;

/// Build pass settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReflectConfig {
    /// Member names never introspected as methods or properties
    pub reserved_members: Vec<String>,

    /// Fill parameter names from declaration text during build
    pub extract_parameter_names: bool,

    /// Consult the type oracle for missing parameter, return and property
    /// types during build
    pub infer_types: bool,
}

fn default_reserved_members() -> Vec<String> {
    ["length", "name", "prototype", "constructor"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ReflectConfig {
    fn default() -> Self {
        Self {
            reserved_members: default_reserved_members(),
            extract_parameter_names: true,
            infer_types: true,
        }
    }
}

impl ReflectConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> ReflectResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> ReflectResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Whether a member name is excluded from introspection
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_members.iter().any(|m| m == name)
    }
}
