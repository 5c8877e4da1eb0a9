//! Typed errors for graph validation and layout.
//!
//! These surface data-integrity problems in the incoming DAG payload.
//! They are never caught inside the rendering stages; the controller is
//! the only place that converts them into the user-facing error document.

use thiserror::Error;

/// A structural problem with the incoming graph data
#[derive(Debug, Error)]
pub enum GraphError {
    /// The payload claimed to carry a full graph but node/edge arrays were missing
    #[error("payload is missing node/edge data for run '{run}'")]
    MissingGraphData { run: String },

    /// An edge references a node id that does not exist in the graph
    #[error("edge '{edge}' references unknown node '{node}'")]
    UnknownEdgeEndpoint { edge: String, node: String },

    /// The step/artifact graph contains a cycle and cannot be layered
    #[error("pipeline graph contains a cycle involving node '{node}'")]
    CyclicGraph { node: String },
}
