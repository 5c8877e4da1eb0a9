//! The validated in-memory graph model.
//!
//! A `DagGraph` is rebuilt wholesale from the server payload on every render
//! request and never mutated in place. The `Unavailable` variant carries only
//! a human-readable message and the run status; it short-circuits the layout
//! stage entirely.

use serde::{Deserialize, Serialize};

/// A step node: one executed unit of pipeline logic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepNode {
    /// Unique node id within the graph
    pub id: String,

    /// Display name of the step
    pub name: String,

    /// Server-side execution id (used by the embedding surface for drill-down)
    pub execution_id: String,

    /// Normalized status string (initializing | failed | completed | running | cached)
    pub status: String,

    /// Start timestamp as reported by the server, if any
    pub start_time: Option<String>,

    /// End timestamp as reported by the server, if any
    pub end_time: Option<String>,
}

/// An artifact node: a data object produced or consumed by a step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactNode {
    /// Unique node id within the graph
    pub id: String,

    /// Display name of the artifact
    pub name: String,

    /// Server-side execution id of the artifact version
    pub execution_id: String,

    /// Artifact kind tag (e.g. "ModelArtifact", "DataArtifact"); selects the icon family
    pub artifact_type: Option<String>,

    /// Declared data type of the payload (e.g. "DataFrame", "str")
    pub data_type: Option<String>,
}

/// A graph node; the variant tag is immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphNode {
    Step(StepNode),
    Artifact(ArtifactNode),
}

impl GraphNode {
    /// The node's graph-unique identifier
    pub fn id(&self) -> &str {
        match self {
            GraphNode::Step(s) => &s.id,
            GraphNode::Artifact(a) => &a.id,
        }
    }

    pub fn is_step(&self) -> bool {
        matches!(self, GraphNode::Step(_))
    }
}

/// A directed edge between two nodes of the same graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// A pipeline run's execution graph
#[derive(Debug, Clone)]
pub enum DagGraph {
    /// A complete graph of steps and artifacts
    Full {
        /// Pipeline name
        name: String,
        /// Overall run status (normalized)
        status: String,
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
    },

    /// The server intentionally omitted step-level detail
    Unavailable {
        /// Overall run status (normalized)
        status: String,
        /// Human-readable explanation from the server
        message: String,
    },
}

impl DagGraph {
    /// Overall run status, regardless of variant
    pub fn status(&self) -> &str {
        match self {
            DagGraph::Full { status, .. } => status,
            DagGraph::Unavailable { status, .. } => status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_accessor() {
        let step = GraphNode::Step(StepNode {
            id: "s1".to_string(),
            name: "trainer".to_string(),
            execution_id: "exec-1".to_string(),
            status: "completed".to_string(),
            start_time: None,
            end_time: None,
        });
        assert_eq!(step.id(), "s1");
        assert!(step.is_step());

        let artifact = GraphNode::Artifact(ArtifactNode {
            id: "a1".to_string(),
            name: "model".to_string(),
            execution_id: "exec-2".to_string(),
            artifact_type: Some("ModelArtifact".to_string()),
            data_type: None,
        });
        assert_eq!(artifact.id(), "a1");
        assert!(!artifact.is_step());
    }

    #[test]
    fn test_status_accessor_both_variants() {
        let full = DagGraph::Full {
            name: "p".to_string(),
            status: "running".to_string(),
            nodes: vec![],
            edges: vec![],
        };
        assert_eq!(full.status(), "running");

        let unavailable = DagGraph::Unavailable {
            status: "completed".to_string(),
            message: "step data omitted".to_string(),
        };
        assert_eq!(unavailable.status(), "completed");
    }
}
