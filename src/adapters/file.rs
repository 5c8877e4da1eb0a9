//! File-based payload source.
//!
//! Reads a DAG payload from a JSON file on disk, ignoring the run id. Used
//! by the CLI's offline mode and as a convenient real `DagSource` in tests.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::domain::DagPayload;

use super::DagSource;

/// A payload file standing in for the pipeline server
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DagSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_dag(&self, _run_id: &str) -> Result<DagPayload> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read payload file {}", self.path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid DAG payload in {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_payload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");
        std::fs::write(
            &path,
            r#"{"name": "p", "status": "completed", "nodes": [], "edges": []}"#,
        )
        .unwrap();

        let source = FileSource::new(&path);
        let payload = source.fetch_dag("ignored").await.unwrap();
        assert_eq!(payload.name.as_deref(), Some("p"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let source = FileSource::new("/no/such/payload.json");
        assert!(source.fetch_dag("r").await.is_err());
    }
}
