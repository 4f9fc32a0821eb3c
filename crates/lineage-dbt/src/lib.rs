//! dbt artifact parsing and lineage queries
//!
//! This crate handles:
//! - Loading target/manifest.json (dbt-generated artifact)
//! - Resolving a model by name
//! - Extracting a model's immediate upstream and downstream neighbors
//! - Deriving a model name from a model file path

pub mod manifest;
pub mod model_file;
pub mod neighborhood;

pub use manifest::{
    DependsOn, Manifest, ManifestError, ManifestNode, ManifestSource, MANIFEST_RELATIVE_PATH,
};
pub use model_file::model_name_from_path;
pub use neighborhood::{LineageError, NeighborhoodExtractor, ParentRef};
