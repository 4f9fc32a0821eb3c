//! Immediate neighborhood of a model
//!
//! Upstream comes straight from the model's `depends_on.nodes`. Downstream is
//! found by scanning every model for an edge pointing at the target; no reverse
//! index is built since a run answers exactly one query.

use crate::manifest::{Manifest, ManifestNode, ManifestSource};
use lineage_core::{DiagnosticsConfig, Lineage, NeighborRef};

/// A parent identifier classified against the manifest
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParentRef<'a> {
    Model(&'a ManifestNode),
    Seed(&'a ManifestNode),
    Source(&'a ManifestSource),

    /// Dangling id, or a node of a kind lineage does not report (test, snapshot, ...)
    Unresolved,
}

impl<'a> ParentRef<'a> {
    /// Classify a parent id. Model/seed nodes win; anything else falls back
    /// to the source collection.
    pub fn classify(manifest: &'a Manifest, unique_id: &str) -> Self {
        match manifest.get_node(unique_id) {
            Some(node) if node.is_model() => return Self::Model(node),
            Some(node) if node.is_seed() => return Self::Seed(node),
            _ => {}
        }

        manifest
            .get_source(unique_id)
            .map(Self::Source)
            .unwrap_or(Self::Unresolved)
    }

    /// Output entry for this parent, `None` when unresolved
    pub fn to_neighbor(&self) -> Option<NeighborRef> {
        match self {
            Self::Model(node) | Self::Seed(node) => {
                Some(NeighborRef::new(node.name.clone(), node.original_file_path.clone()))
            }
            Self::Source(source) => {
                Some(NeighborRef::new(source.display_name(), source.original_file_path.clone()))
            }
            Self::Unresolved => None,
        }
    }
}

/// Lineage query errors
#[derive(Debug, thiserror::Error)]
pub enum LineageError {
    #[error("Model '{0}' not found in manifest")]
    ModelNotFound(String),

    #[error("Not a model file: {0}")]
    NotAModelFile(String),

    #[error(transparent)]
    Manifest(#[from] crate::manifest::ManifestError),
}

/// Resolves models and extracts their neighborhoods from a loaded manifest
#[derive(Debug, Clone)]
pub struct NeighborhoodExtractor<'a> {
    manifest: &'a Manifest,
    diagnostics: DiagnosticsConfig,
}

impl<'a> NeighborhoodExtractor<'a> {
    pub fn new(manifest: &'a Manifest) -> Self {
        Self {
            manifest,
            diagnostics: DiagnosticsConfig::default(),
        }
    }

    /// Set diagnostic logging behavior
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Find a model by exact name.
    ///
    /// The first match in document order wins. dbt does not allow two models
    /// with the same name in one project, but packages can still produce
    /// duplicates; those are logged, not resolved. An empty name never matches,
    /// even a node whose `name` field is missing.
    pub fn resolve(&self, model_name: &str) -> Option<(&'a str, &'a ManifestNode)> {
        if model_name.is_empty() {
            return None;
        }

        let mut matches = self
            .manifest
            .models()
            .filter(|(_, node)| node.name == model_name);

        let (unique_id, node) = matches.next()?;

        if self.diagnostics.warn_duplicates {
            for (duplicate_id, _) in matches {
                tracing::warn!(
                    model = model_name,
                    chosen = %unique_id,
                    ignored = %duplicate_id,
                    "multiple models share this name; using the first one"
                );
            }
        }

        Some((unique_id.as_str(), node))
    }

    /// Direct parents of `node`, in `depends_on` order, minus unresolved ids
    pub fn upstream(&self, unique_id: &str, node: &ManifestNode) -> Vec<NeighborRef> {
        node.depends_on
            .nodes
            .iter()
            .filter_map(|parent_id| {
                let parent = ParentRef::classify(self.manifest, parent_id);
                if parent == ParentRef::Unresolved {
                    self.report_unresolved(unique_id, parent_id);
                }
                parent.to_neighbor()
            })
            .collect()
    }

    /// Models that list `unique_id` as a direct parent, in document order
    pub fn downstream(&self, unique_id: &str) -> Vec<NeighborRef> {
        self.manifest
            .models()
            .filter(|(_, child)| child.depends_on_node(unique_id))
            .map(|(_, child)| {
                NeighborRef::new(child.name.clone(), child.original_file_path.clone())
            })
            .collect()
    }

    /// Assemble the full neighborhood of a resolved model
    pub fn extract(&self, unique_id: &str, node: &ManifestNode) -> Lineage {
        Lineage {
            current: NeighborRef::new(node.name.clone(), node.original_file_path.clone()),
            upstream: self.upstream(unique_id, node),
            downstream: self.downstream(unique_id),
        }
    }

    /// Resolve `model_name` and extract its neighborhood
    pub fn lineage_for(&self, model_name: &str) -> Result<Lineage, LineageError> {
        let (unique_id, node) = self
            .resolve(model_name)
            .ok_or_else(|| LineageError::ModelNotFound(model_name.to_string()))?;

        tracing::debug!(model = model_name, unique_id, "resolved model");

        let lineage = self.extract(unique_id, node);

        tracing::debug!(
            upstream = lineage.upstream.len(),
            downstream = lineage.downstream.len(),
            "extracted neighborhood"
        );

        Ok(lineage)
    }

    fn report_unresolved(&self, unique_id: &str, parent_id: &str) {
        if self.diagnostics.warn_unresolved {
            tracing::warn!(node = unique_id, parent = parent_id, "skipping unresolved parent");
        } else {
            tracing::debug!(node = unique_id, parent = parent_id, "skipping unresolved parent");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn fixture() -> Manifest {
        Manifest::load(Path::new("../../fixtures/mini-dbt-project")).unwrap()
    }

    fn names(refs: &[NeighborRef]) -> Vec<&str> {
        refs.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn classify_parent_kinds() {
        let manifest = fixture();

        assert!(matches!(
            ParentRef::classify(&manifest, "model.jaffle_shop.stg_orders"),
            ParentRef::Model(node) if node.name == "stg_orders"
        ));
        assert!(matches!(
            ParentRef::classify(&manifest, "seed.jaffle_shop.country_codes"),
            ParentRef::Seed(_)
        ));
        assert!(matches!(
            ParentRef::classify(&manifest, "source.jaffle_shop.raw.orders"),
            ParentRef::Source(source) if source.display_name() == "raw.orders"
        ));
        assert_eq!(
            ParentRef::classify(&manifest, "snapshot.jaffle_shop.orders_snapshot"),
            ParentRef::Unresolved
        );
        assert_eq!(
            ParentRef::classify(&manifest, "model.jaffle_shop.deleted_model"),
            ParentRef::Unresolved
        );
    }

    #[test]
    fn non_model_node_falls_back_to_sources() {
        let manifest = Manifest::from_str(
            r#"{
                "nodes": {"source.p.raw.t": {"name": "t", "resource_type": "analysis"}},
                "sources": {"source.p.raw.t": {"source_name": "raw", "name": "t", "original_file_path": "models/src.yml"}}
            }"#,
        )
        .unwrap();

        assert_eq!(
            ParentRef::classify(&manifest, "source.p.raw.t").to_neighbor(),
            Some(NeighborRef::new("raw.t", Some("models/src.yml".into())))
        );
    }

    #[test]
    fn stg_orders_neighborhood() {
        let manifest = fixture();
        let lineage = NeighborhoodExtractor::new(&manifest).lineage_for("stg_orders").unwrap();

        assert_eq!(
            lineage.current,
            NeighborRef::new("stg_orders", Some("models/staging/stg_orders.sql".into()))
        );
        assert_eq!(
            lineage.upstream,
            vec![NeighborRef::new("raw.orders", Some("models/staging/sources.yml".into()))]
        );
        // The test and the snapshot also depend on stg_orders but are not models
        assert_eq!(names(&lineage.downstream), vec!["fct_orders", "orders_with_dangling"]);
    }

    #[test]
    fn upstream_keeps_depends_on_order_and_skips_unresolved() {
        let manifest = fixture();
        let extractor = NeighborhoodExtractor::new(&manifest);

        let fct = extractor.lineage_for("fct_orders").unwrap();
        assert_eq!(names(&fct.upstream), vec!["stg_orders", "stg_customers", "country_codes"]);
        assert_eq!(fct.upstream[2].path.as_deref(), Some("seeds/country_codes.csv"));
        assert!(fct.downstream.is_empty());

        // depends on a deleted model, a snapshot and stg_orders
        let dangling = extractor.lineage_for("orders_with_dangling").unwrap();
        assert_eq!(names(&dangling.upstream), vec!["stg_orders"]);
    }

    #[test]
    fn downstream_membership_matches_depends_on() {
        let manifest = fixture();
        let extractor = NeighborhoodExtractor::new(&manifest);

        for (unique_id, node) in manifest.models() {
            let downstream = extractor.downstream(unique_id);
            let expected: Vec<&str> = manifest
                .models()
                .filter(|(_, child)| child.depends_on.nodes.contains(unique_id))
                .map(|(_, child)| child.name.as_str())
                .collect();

            assert_eq!(names(&downstream), expected, "downstream of {}", node.name);
        }
    }

    #[test]
    fn unknown_model() {
        let manifest = fixture();
        let err = NeighborhoodExtractor::new(&manifest).lineage_for("nope").unwrap_err();

        assert!(matches!(err, LineageError::ModelNotFound(_)));
        assert_eq!(err.to_string(), "Model 'nope' not found in manifest");
    }

    #[test]
    fn only_models_are_query_targets() {
        let manifest = fixture();
        let extractor = NeighborhoodExtractor::new(&manifest);

        assert!(extractor.resolve("country_codes").is_none());
        assert!(extractor.resolve("orders").is_none());
        assert!(extractor.resolve("STG_ORDERS").is_none());
    }

    #[test]
    fn empty_name_never_resolves() {
        let manifest = Manifest::from_str(
            r#"{"nodes": {"model.p.unnamed": {"resource_type": "model"}}}"#,
        )
        .unwrap();
        let extractor = NeighborhoodExtractor::new(&manifest);

        assert!(extractor.resolve("").is_none());
        assert_eq!(
            extractor.lineage_for("").unwrap_err().to_string(),
            "Model '' not found in manifest"
        );
    }

    #[test]
    fn duplicate_names_resolve_to_first() {
        let manifest = Manifest::from_str(
            r#"{
                "nodes": {
                    "model.a.dup": {"name": "dup", "resource_type": "model", "original_file_path": "a.sql"},
                    "model.b.dup": {"name": "dup", "resource_type": "model", "original_file_path": "b.sql"}
                }
            }"#,
        )
        .unwrap();

        let (unique_id, node) = NeighborhoodExtractor::new(&manifest).resolve("dup").unwrap();
        assert_eq!(unique_id, "model.a.dup");
        assert_eq!(node.original_file_path.as_deref(), Some("a.sql"));
    }

    #[test]
    fn repeated_queries_are_identical() {
        let manifest = fixture();
        let extractor = NeighborhoodExtractor::new(&manifest);

        let first = extractor.lineage_for("stg_orders").unwrap().to_json(false).unwrap();
        let second = extractor.lineage_for("stg_orders").unwrap().to_json(false).unwrap();
        assert_eq!(first, second);
    }
}
