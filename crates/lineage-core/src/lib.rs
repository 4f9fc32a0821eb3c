//! dbt-lineage Core
//!
//! Shared domain types: the lineage output document, the error envelope
//! and the `lineage.toml` configuration schema.
//! The JSON shape of [`Lineage`] and [`ErrorEnvelope`] is consumed by editor
//! integrations - do not rename fields.

pub mod config;
pub mod output;

pub use config::{Config, ConfigError, DiagnosticsConfig, OutputConfig, CONFIG_FILE_NAME};
pub use output::{ErrorEnvelope, Lineage, NeighborRef, OutputFormat};
