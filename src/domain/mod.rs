//! Domain data structures for pipeline-run DAGs.
//!
//! A run's execution graph arrives from the server as a loose JSON payload
//! (`payload`), is validated into the typed graph model (`graph`), and the
//! status/duration helpers (`status`) normalize the messier corners of the
//! wire format.

pub mod graph;
pub mod payload;
pub mod status;

pub use graph::{ArtifactNode, DagGraph, GraphEdge, GraphNode, StepNode};
pub use payload::{DagPayload, RawStatus};
pub use status::{duration_between, format_duration, needs_update, normalize_status};
