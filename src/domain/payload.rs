//! Serde wire types for the server's DAG payload.
//!
//! The payload is deliberately loose: `status` may be a plain string or a
//! wrapped enum object, and the `nodes`/`edges` arrays are absent entirely in
//! the "unavailable" variant (the server signals that with a `message`
//! field). `DagPayload::into_graph` is the single place where the loose shape
//! is validated into the typed model; the ambiguity never leaks past it.

use serde::Deserialize;

use crate::error::GraphError;

use super::graph::{ArtifactNode, DagGraph, GraphEdge, GraphNode, StepNode};
use super::status::normalize_status;

/// A status value as it appears on the wire
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawStatus {
    /// Serialized enum object, e.g. `{ "_value_": "completed" }`
    Wrapped {
        #[serde(rename = "_value_")]
        value: String,
    },

    /// Plain status string
    Plain(String),
}

/// Payload of a step node's `data` field
#[derive(Debug, Clone, Deserialize)]
pub struct StepData {
    pub execution_id: String,
    pub name: String,
    pub status: Option<RawStatus>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Payload of an artifact node's `data` field
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactData {
    pub execution_id: String,
    pub name: String,
    /// Artifact kind, e.g. "ModelArtifact" or "DataArtifact"
    pub artifact_type: Option<String>,
    /// Declared data type, e.g. "DataFrame" or "str"
    #[serde(rename = "type")]
    pub data_type: Option<String>,
}

/// A node as it appears on the wire
#[derive(Debug, Clone, Deserialize)]
pub struct PayloadNode {
    pub id: String,
    #[serde(flatten)]
    pub kind: PayloadNodeKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum PayloadNodeKind {
    Step(StepData),
    Artifact(ArtifactData),
}

/// An edge as it appears on the wire
#[derive(Debug, Clone, Deserialize)]
pub struct PayloadEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// The complete DAG payload returned by the pipeline-run service
#[derive(Debug, Clone, Deserialize)]
pub struct DagPayload {
    #[serde(default)]
    pub name: Option<String>,

    pub status: Option<RawStatus>,

    #[serde(default)]
    pub nodes: Option<Vec<PayloadNode>>,

    #[serde(default)]
    pub edges: Option<Vec<PayloadEdge>>,

    /// Present only in the "unavailable" variant; nodes/edges are then absent
    #[serde(default)]
    pub message: Option<String>,
}

impl DagPayload {
    /// Validate the wire payload into the typed graph model.
    ///
    /// A payload carrying a `message` becomes `DagGraph::Unavailable`. A full
    /// payload with missing node/edge arrays is malformed, not unavailable.
    pub fn into_graph(self) -> Result<DagGraph, GraphError> {
        let name = self.name.unwrap_or_else(|| "unknown".to_string());
        let status = normalize_status(self.status.as_ref());

        if let Some(message) = self.message {
            return Ok(DagGraph::Unavailable { status, message });
        }

        let (Some(nodes), Some(edges)) = (self.nodes, self.edges) else {
            return Err(GraphError::MissingGraphData { run: name });
        };

        let nodes = nodes
            .into_iter()
            .map(|n| match n.kind {
                PayloadNodeKind::Step(data) => GraphNode::Step(StepNode {
                    id: n.id,
                    name: data.name,
                    execution_id: data.execution_id,
                    status: normalize_status(data.status.as_ref()),
                    start_time: data.start_time,
                    end_time: data.end_time,
                }),
                PayloadNodeKind::Artifact(data) => GraphNode::Artifact(ArtifactNode {
                    id: n.id,
                    name: data.name,
                    execution_id: data.execution_id,
                    artifact_type: data.artifact_type,
                    data_type: data.data_type,
                }),
            })
            .collect();

        let edges = edges
            .into_iter()
            .map(|e| GraphEdge {
                id: e.id,
                source: e.source,
                target: e.target,
            })
            .collect();

        Ok(DagGraph::Full {
            name,
            status,
            nodes,
            edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAYLOAD: &str = r#"{
        "name": "training_pipeline",
        "status": "completed",
        "nodes": [
            {
                "id": "s1",
                "type": "step",
                "data": {
                    "execution_id": "exec-1",
                    "name": "loader",
                    "status": {"_value_": "completed"},
                    "start_time": "2024-03-01 12:00:00",
                    "end_time": "2024-03-01 12:00:45"
                }
            },
            {
                "id": "a1",
                "type": "artifact",
                "data": {
                    "execution_id": "exec-2",
                    "name": "dataset",
                    "artifact_type": "DataArtifact",
                    "type": "DataFrame"
                }
            }
        ],
        "edges": [{"id": "s1_a1", "source": "s1", "target": "a1"}]
    }"#;

    #[test]
    fn test_full_payload_roundtrip() {
        let payload: DagPayload = serde_json::from_str(FULL_PAYLOAD).unwrap();
        let graph = payload.into_graph().unwrap();

        let DagGraph::Full {
            name,
            status,
            nodes,
            edges,
        } = graph
        else {
            panic!("expected full graph");
        };

        assert_eq!(name, "training_pipeline");
        assert_eq!(status, "completed");
        assert_eq!(nodes.len(), 2);
        assert_eq!(edges.len(), 1);

        // Wrapped step status is normalized during conversion
        let GraphNode::Step(step) = &nodes[0] else {
            panic!("expected step node");
        };
        assert_eq!(step.status, "completed");

        let GraphNode::Artifact(artifact) = &nodes[1] else {
            panic!("expected artifact node");
        };
        assert_eq!(artifact.data_type.as_deref(), Some("DataFrame"));
    }

    #[test]
    fn test_unavailable_payload() {
        let json = r#"{
            "name": "training_pipeline",
            "status": "running",
            "message": "step data omitted from optimized response"
        }"#;
        let payload: DagPayload = serde_json::from_str(json).unwrap();
        let graph = payload.into_graph().unwrap();

        let DagGraph::Unavailable { status, message } = graph else {
            panic!("expected unavailable graph");
        };
        assert_eq!(status, "running");
        assert_eq!(message, "step data omitted from optimized response");
    }

    #[test]
    fn test_missing_arrays_is_malformed() {
        let json = r#"{"name": "p", "status": "completed"}"#;
        let payload: DagPayload = serde_json::from_str(json).unwrap();
        let err = payload.into_graph().unwrap_err();
        assert!(matches!(
            err,
            crate::error::GraphError::MissingGraphData { .. }
        ));
    }

    #[test]
    fn test_plain_status_deserializes() {
        let json = r#"{"name": "p", "status": "failed", "nodes": [], "edges": []}"#;
        let payload: DagPayload = serde_json::from_str(json).unwrap();
        let graph = payload.into_graph().unwrap();
        assert_eq!(graph.status(), "failed");
    }
}
