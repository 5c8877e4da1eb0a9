//! Data-source adapters for fetching DAG payloads.
//!
//! The renderer only ever sees a `DagPayload`; where it came from (the
//! pipeline server's REST API, a payload file on disk, a test double) is
//! behind the `DagSource` seam.

pub mod file;
pub mod server;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::DagPayload;

pub use file::FileSource;
pub use server::ServerClient;

/// A source of DAG payloads, keyed by run identifier
#[async_trait]
pub trait DagSource: Send + Sync {
    /// Human-readable source name, for logging
    fn name(&self) -> &str;

    /// Fetch the DAG payload for one pipeline run
    async fn fetch_dag(&self, run_id: &str) -> Result<DagPayload>;
}
