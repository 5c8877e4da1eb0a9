//! runviz - Pipeline-run DAG visualizer
//!
//! Renders an ML pipeline run's execution graph — steps and the artifacts
//! they produce and consume — as an embeddable HTML document with an inline
//! SVG.
//!
//! # Architecture
//!
//! The render pipeline is a straight line:
//! - A `DagSource` adapter fetches the run's node/edge payload
//! - The payload is validated into a typed `DagGraph`
//! - Layered layout assigns every node a box and every edge a raw path
//! - The router turns raw paths into orthogonal polylines
//! - The SVG renderer draws boxes, icons and edges
//! - The HTML templates wrap the result for the embedding surface
//!
//! Layout, routing and drawing are synchronous and deterministic; only the
//! payload fetch and icon loading touch I/O.
//!
//! # Modules
//!
//! - `adapters`: Payload sources (pipeline server REST API, payload files)
//! - `controller`: Session registry and render orchestration
//! - `domain`: Graph data structures and status/duration helpers
//! - `render`: Layout, edge routing, SVG and HTML construction
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Render a run from the configured server
//! runviz render 8b7a3f9e-2d5c-4f1a-9e8b-6c4d2a1f0e9d --out dag.html
//!
//! # Render from a payload file, offline
//! runviz render --input payload.json --out dag.html
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod render;

// Re-export main types at crate root for convenience
pub use adapters::{DagSource, FileSource, ServerClient};
pub use controller::{DagAction, DagController, DagEvent, DagSession};
pub use domain::{DagGraph, DagPayload, GraphEdge, GraphNode};
pub use error::GraphError;
pub use render::{IconSet, LayoutConfig, TemplateAssets};
