//! Lineage output document (stable)
//!
//! Success and failure are both a single JSON document on stdout.
//! Field names are part of the public contract.

use serde::{Deserialize, Serialize};

/// A node adjacent to (or equal to) the queried model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborRef {
    /// Display name (model/seed name, or `source_name.name` for sources)
    pub name: String,

    /// Original file path relative to the project root, `null` when unknown
    pub path: Option<String>,
}

impl NeighborRef {
    /// Create a new neighbor reference
    pub fn new(name: impl Into<String>, path: Option<String>) -> Self {
        Self {
            name: name.into(),
            path,
        }
    }
}

/// Immediate neighborhood of a single model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    /// The queried model
    pub current: NeighborRef,

    /// Direct parents (models, seeds, sources) in `depends_on` order
    pub upstream: Vec<NeighborRef>,

    /// Models that list the queried model as a direct parent
    pub downstream: Vec<NeighborRef>,
}

impl Lineage {
    /// Serialize to JSON string
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Failure document: `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Serialize to a single-line JSON string
    pub fn to_json(&self) -> String {
        // A struct with one string field cannot fail to serialize
        serde_json::to_string(self).unwrap_or_else(|_| String::from(r#"{"error":"unknown error"}"#))
    }
}

/// How a successful lineage result is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Single JSON document (default, machine readable)
    #[default]
    Json,

    /// Human-readable summary for terminals
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => Err(format!("unknown output format '{}' (expected json or text)", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Text => write!(f, "text"),
        }
    }
}
