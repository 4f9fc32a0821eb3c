//! dbt manifest.json parsing
//!
//! Only the fields needed for lineage are modeled; everything else in the
//! artifact is ignored. Maps keep document order so that scans are
//! deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Manifest location relative to the dbt project root
pub const MANIFEST_RELATIVE_PATH: &str = "target/manifest.json";

/// dbt manifest.json structure (subset of fields we care about)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Models, seeds, tests, snapshots, ...
    #[serde(default)]
    pub nodes: IndexMap<String, ManifestNode>,

    /// Source definitions
    #[serde(default)]
    pub sources: IndexMap<String, ManifestSource>,
}

impl Manifest {
    /// Load `target/manifest.json` under a project root
    pub fn load(project_root: &Path) -> Result<Self, ManifestError> {
        let path = project_root.join(MANIFEST_RELATIVE_PATH);
        if !path.exists() {
            return Err(ManifestError::Missing(path.display().to_string()));
        }

        tracing::debug!(path = %path.display(), "loading manifest");
        Self::from_file(&path)
    }

    /// Load manifest from file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ManifestError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
    }

    /// Parse manifest from JSON string
    pub fn from_str(json: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(json).map_err(|e| ManifestError::ParseError(e.to_string()))
    }

    /// Iterate model nodes in document order
    pub fn models(&self) -> impl Iterator<Item = (&String, &ManifestNode)> {
        self.nodes.iter().filter(|(_, node)| node.is_model())
    }

    /// Get a specific node by unique_id
    pub fn get_node(&self, unique_id: &str) -> Option<&ManifestNode> {
        self.nodes.get(unique_id)
    }

    /// Get a specific source by unique_id
    pub fn get_source(&self, unique_id: &str) -> Option<&ManifestSource> {
        self.sources.get(unique_id)
    }
}

/// A node in the manifest (model, seed, test, snapshot, etc.)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Node name (e.g., "stg_orders")
    #[serde(default)]
    pub name: String,

    /// Resource type (model, seed, test, snapshot, etc.)
    #[serde(default)]
    pub resource_type: String,

    /// Path of the defining file, relative to the project root
    #[serde(default)]
    pub original_file_path: Option<String>,

    /// Dependencies
    #[serde(default)]
    pub depends_on: DependsOn,
}

impl ManifestNode {
    pub fn is_model(&self) -> bool {
        self.resource_type == "model"
    }

    pub fn is_seed(&self) -> bool {
        self.resource_type == "seed"
    }

    /// Whether `unique_id` is one of this node's direct parents
    pub fn depends_on_node(&self, unique_id: &str) -> bool {
        self.depends_on.nodes.iter().any(|parent| parent == unique_id)
    }
}

/// Dependencies structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependsOn {
    /// List of node unique_ids this node depends on, in declaration order
    #[serde(default)]
    pub nodes: Vec<String>,
}

/// A source in the manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestSource {
    /// Source name (e.g., "raw")
    #[serde(default)]
    pub source_name: String,

    /// Table name (e.g., "orders")
    #[serde(default)]
    pub name: String,

    /// Path of the YAML file declaring the source
    #[serde(default)]
    pub original_file_path: Option<String>,
}

impl ManifestSource {
    /// Display name, e.g. "raw.orders"
    pub fn display_name(&self) -> String {
        format!("{}.{}", self.source_name, self.name)
    }
}

/// Manifest loading errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Carries the full path that was probed
    #[error("target/manifest.json not found. Run dbt build first.")]
    Missing(String),

    #[error("Failed to read manifest file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse manifest JSON: {0}")]
    ParseError(String),
}
