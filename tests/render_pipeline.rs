//! Render Pipeline Integration Tests
//!
//! Drives the controller end to end with in-memory payload sources and
//! checks the produced documents.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use runviz::render::html::build_loading_content;
use runviz::{
    DagController, DagEvent, DagPayload, DagSource, IconSet, LayoutConfig, TemplateAssets,
};

/// Serves a fixed payload string, standing in for the pipeline server
struct StaticSource {
    payload: String,
}

impl StaticSource {
    fn new(payload: &str) -> Self {
        Self {
            payload: payload.to_string(),
        }
    }
}

#[async_trait]
impl DagSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_dag(&self, _run_id: &str) -> Result<DagPayload> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

/// Always fails, standing in for an unreachable server
struct FailingSource;

#[async_trait]
impl DagSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch_dag(&self, _run_id: &str) -> Result<DagPayload> {
        anyhow::bail!("connection refused")
    }
}

fn assets() -> TemplateAssets {
    TemplateAssets {
        script_uri: "dag.js".to_string(),
        style_uri: "dag.css".to_string(),
        csp_source: "'self'".to_string(),
    }
}

fn controller<S: DagSource>(source: S) -> DagController<S> {
    DagController::new(source, IconSet::empty(), LayoutConfig::default(), assets())
}

/// One step "A" (completed), one model artifact "B", one step "C" (running),
/// edges A->B and B->C; overall run status running.
const SCENARIO: &str = r#"{
    "name": "training_pipeline",
    "status": "running",
    "nodes": [
        {"id": "A", "type": "step", "data": {
            "execution_id": "exec-a", "name": "A", "status": "completed",
            "start_time": "2024-03-01 12:00:00", "end_time": "2024-03-01 12:00:45"
        }},
        {"id": "B", "type": "artifact", "data": {
            "execution_id": "exec-b", "name": "B",
            "artifact_type": "ModelArtifact", "type": "Model"
        }},
        {"id": "C", "type": "step", "data": {
            "execution_id": "exec-c", "name": "C", "status": {"_value_": "running"}
        }}
    ],
    "edges": [
        {"id": "A_B", "source": "A", "target": "B"},
        {"id": "B_C", "source": "B", "target": "C"}
    ]
}"#;

#[tokio::test]
async fn test_end_to_end_scenario() {
    let mut controller = controller(StaticSource::new(SCENARIO));
    let session = controller.render_run("run-1").await;

    assert_eq!(session.status, "running");

    // Exactly 2 edge polylines and 3 node containers
    assert_eq!(session.html.matches("<polyline").count(), 2);
    assert_eq!(session.html.matches(r#"<g class="node "#).count(), 3);

    // C carries the running status class; A shows its duration
    assert!(session.html.contains(r#"class="node step running""#));
    assert!(session.html.contains(">45s</text>"));

    // Overall status is running, so the update banner is present
    assert!(session.html.contains("update-banner"));
}

#[tokio::test]
async fn test_unavailable_payload_short_circuits() {
    let payload = r#"{
        "name": "training_pipeline",
        "status": "completed",
        "message": "step data omitted from optimized response"
    }"#;
    let mut controller = controller(StaticSource::new(payload));
    let session = controller.render_run("run-1").await;

    assert!(session
        .html
        .contains("step data omitted from optimized response"));
    assert!(session.html.contains("Run status: completed"));
    // The layout stage never ran: no SVG canvas in the document
    assert!(!session.html.contains("<svg"));
    assert!(!session.html.contains("update-banner"));
}

#[tokio::test]
async fn test_fetch_failure_renders_error_document() {
    let mut controller = controller(FailingSource);
    let session = controller.render_run("run-1").await;

    assert!(session.html.contains("connection refused"));
    assert!(session.html.contains("retry-button"));
    assert!(!session.html.contains("<svg"));
}

#[tokio::test]
async fn test_malformed_graph_renders_error_document() {
    // Edge references a node that does not exist
    let payload = r#"{
        "name": "p", "status": "completed",
        "nodes": [{"id": "A", "type": "step", "data": {"execution_id": "e", "name": "A", "status": "completed"}}],
        "edges": [{"id": "A_ghost", "source": "A", "target": "ghost"}]
    }"#;
    let mut controller = controller(StaticSource::new(payload));
    let session = controller.render_run("run-1").await;

    assert!(session.html.contains("unknown node"));
    assert!(session.html.contains("retry-button"));
}

#[tokio::test]
async fn test_node_names_are_escaped_in_final_document() {
    let payload = r#"{
        "name": "p", "status": "completed",
        "nodes": [{"id": "A", "type": "step", "data": {
            "execution_id": "e", "name": "<script>alert(1)</script>", "status": "completed"
        }}],
        "edges": []
    }"#;
    let mut controller = controller(StaticSource::new(payload));
    let session = controller.render_run("run-1").await;

    assert!(session.html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!session.html.contains("<script>alert(1)</script>"));
}

#[tokio::test]
async fn test_rerender_reuses_session() {
    let mut controller = controller(StaticSource::new(SCENARIO));
    controller.render_run("run-1").await;
    controller.render_run("run-1").await;
    assert_eq!(controller.session_count(), 1);

    controller.render_run("run-2").await;
    assert_eq!(controller.session_count(), 2);
}

#[tokio::test]
async fn test_interaction_events() {
    use runviz::DagAction;

    let mut controller = controller(StaticSource::new(SCENARIO));
    controller.render_run("run-1").await;

    let action = controller.handle_event("run-1", "step", "exec-a").await;
    assert_eq!(action, Some(DagAction::ShowStep("exec-a".to_string())));

    let action = controller.handle_event("run-1", "artifactUrl", "exec-b").await;
    assert_eq!(action, Some(DagAction::OpenArtifactUrl("exec-b".to_string())));

    // Unknown command tags are ignored, not fatal
    let action = controller.handle_event("run-1", "detonate", "x").await;
    assert_eq!(action, None);

    // Update re-renders the same run internally and returns no action
    let action = controller.handle_event("run-1", "update", "").await;
    assert_eq!(action, None);
    assert_eq!(controller.session_count(), 1);
}

#[tokio::test]
async fn test_bundled_icons_render_into_document() {
    let icons = IconSet::load(Path::new("assets/icons"));
    let mut controller = DagController::new(
        StaticSource::new(SCENARIO),
        icons,
        LayoutConfig::default(),
        assets(),
    );
    let session = controller.render_run("run-1").await;

    // C is running and B is a model artifact; both bundled icons show up
    assert!(session.html.contains("#3b82f6"));
    assert!(session.html.contains("#8b5cf6"));
}

#[test]
fn test_loading_document_is_complete() {
    let doc = build_loading_content(&assets());
    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert!(doc.contains("Loading pipeline run"));
}

#[test]
fn test_event_parsing_is_total() {
    assert!(DagEvent::parse("update", "").is_some());
    assert!(DagEvent::parse("", "").is_none());
    assert!(DagEvent::parse("UPDATE", "").is_none());
}
