//! Export configuration.
//!
//! Loaded from JSON or built in code; every field has a default so a partial
//! document (or `{}`) is a valid config.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ExportResult;
use crate::node::NodeKind;
use crate::translate::prefixed_name;

/// Namespace used for generically exported renderer attributes.
pub const DEFAULT_PREFIX: &str = "arnold";

/// Parent scope for material prims created by material binding.
pub const DEFAULT_MATERIAL_SCOPE: &str = "/materials";

/// Settings for one export session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Field namespace for generic export (`"{prefix}:{attr}"`).
    pub prefix: String,

    /// Also write attributes still holding their schema default.
    pub write_defaults: bool,

    /// Node kinds translated by a registry-driven pass.
    pub mask: BTreeSet<NodeKind>,

    /// Path under which material prims are defined.
    pub material_scope: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            write_defaults: false,
            mask: NodeKind::ALL.into_iter().collect(),
            material_scope: DEFAULT_MATERIAL_SCOPE.to_string(),
        }
    }
}

impl ExportConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(content: &str) -> ExportResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ExportResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Name of the field generic export writes for `attr`.
    pub fn prefixed(&self, attr: &str) -> String {
        prefixed_name(&self.prefix, attr)
    }

    /// Whether a registry-driven pass should translate nodes of `kind`.
    pub fn accepts(&self, kind: NodeKind) -> bool {
        self.mask.contains(&kind)
    }
}
