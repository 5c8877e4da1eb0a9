//! Orchestration of the render pipeline.
//!
//! The controller owns the icon snapshot, layout configuration, template
//! assets and a session registry keyed by run id: re-rendering an already
//! open run refreshes its session in place, so there is never more than one
//! active session per run. Renders for a session are serialized through
//! `&mut self`; a superseding request simply overwrites the session output
//! when it completes.
//!
//! Failure conversion happens here and only here: the rendering stages let
//! graph errors bubble up, and the controller turns any fetch, validation or
//! layout failure into the error document. A session's HTML is therefore
//! always exactly one of loading, error, no-data or full-graph.

use std::collections::HashMap;

use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use crate::adapters::DagSource;
use crate::domain::{DagGraph, DagPayload};
use crate::render::html::{
    build_error_content, build_loading_content, build_main_content, build_no_steps_content,
};
use crate::render::{render_graph, IconSet, LayoutConfig, TemplateAssets};

/// An interaction message from the rendered document's script layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DagEvent {
    /// Re-render the current run
    Update,
    /// Drill into a step
    InspectStep(String),
    /// Drill into an artifact
    InspectArtifact(String),
    /// Open the step in the server dashboard
    OpenStepUrl(String),
    /// Open the artifact in the server dashboard
    OpenArtifactUrl(String),
}

impl DagEvent {
    /// Parse a command tag plus entity id; unrecognized tags yield `None`
    pub fn parse(command: &str, entity_id: &str) -> Option<Self> {
        match command {
            "update" => Some(Self::Update),
            "step" => Some(Self::InspectStep(entity_id.to_string())),
            "artifact" => Some(Self::InspectArtifact(entity_id.to_string())),
            "stepUrl" => Some(Self::OpenStepUrl(entity_id.to_string())),
            "artifactUrl" => Some(Self::OpenArtifactUrl(entity_id.to_string())),
            _ => None,
        }
    }
}

/// What the embedding surface should do in response to an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DagAction {
    ShowStep(String),
    ShowArtifact(String),
    OpenStepUrl(String),
    OpenArtifactUrl(String),
}

/// One rendering session: the current output for a single run
#[derive(Debug, Clone)]
pub struct DagSession {
    pub run_id: String,
    /// Overall run status from the most recent successful payload
    pub status: String,
    /// The complete embeddable document currently installed
    pub html: String,
}

/// Owns the rendering components and the per-run session registry
pub struct DagController<S> {
    source: S,
    icons: IconSet,
    layout: LayoutConfig,
    assets: TemplateAssets,
    sessions: HashMap<String, DagSession>,
}

impl<S: DagSource> DagController<S> {
    pub fn new(source: S, icons: IconSet, layout: LayoutConfig, assets: TemplateAssets) -> Self {
        Self {
            source,
            icons,
            layout,
            assets,
            sessions: HashMap::new(),
        }
    }

    /// The current session for a run, if one has been opened
    pub fn session(&self, run_id: &str) -> Option<&DagSession> {
        self.sessions.get(run_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Fetch, lay out and render one run, installing the result as the
    /// session output. Returns the refreshed session.
    #[instrument(skip(self))]
    pub async fn render_run(&mut self, run_id: &str) -> DagSession {
        // Refresh (or open) the session with the loading placeholder first,
        // so the surface never shows stale output while the fetch is pending.
        let previous_status = self
            .sessions
            .get(run_id)
            .map(|s| s.status.clone())
            .unwrap_or_default();
        self.install(run_id, previous_status, build_loading_content(&self.assets));

        let (status, html) = match self.source.fetch_dag(run_id).await {
            Ok(payload) => match self.render_payload(payload) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(source = self.source.name(), error = %e, "Render pipeline failed");
                    (String::new(), build_error_content(&e.to_string(), &self.assets))
                }
            },
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "DAG fetch failed");
                (String::new(), build_error_content(&e.to_string(), &self.assets))
            }
        };

        let session = DagSession {
            run_id: run_id.to_string(),
            status,
            html,
        };
        self.sessions.insert(run_id.to_string(), session.clone());
        session
    }

    /// Validate a payload and produce `(status, document)` for it.
    ///
    /// The unavailable variant short-circuits straight to the informational
    /// placeholder; the layout stage is never invoked for it.
    fn render_payload(&self, payload: DagPayload) -> Result<(String, String)> {
        match payload.into_graph()? {
            DagGraph::Unavailable { status, message } => {
                info!("Step data unavailable, rendering placeholder");
                let html = build_no_steps_content(&status, &message, &self.assets);
                Ok((status, html))
            }
            DagGraph::Full {
                name,
                status,
                nodes,
                edges,
            } => {
                info!(
                    pipeline = %name,
                    nodes = nodes.len(),
                    edges = edges.len(),
                    "Rendering pipeline DAG"
                );
                let svg = render_graph(&nodes, &edges, &self.layout, &self.icons)?;
                let html = build_main_content(&svg, &status, &self.assets);
                Ok((status, html))
            }
        }
    }

    /// Dispatch one interaction event from the embedding surface.
    ///
    /// `update` re-renders internally; drill-down and URL events are handed
    /// back as actions for the surface to execute. Unknown command tags are
    /// ignored, not fatal.
    pub async fn handle_event(
        &mut self,
        run_id: &str,
        command: &str,
        entity_id: &str,
    ) -> Option<DagAction> {
        let Some(event) = DagEvent::parse(command, entity_id) else {
            debug!(command, "Ignoring unrecognized DAG command");
            return None;
        };

        match event {
            DagEvent::Update => {
                self.render_run(run_id).await;
                None
            }
            DagEvent::InspectStep(id) => Some(DagAction::ShowStep(id)),
            DagEvent::InspectArtifact(id) => Some(DagAction::ShowArtifact(id)),
            DagEvent::OpenStepUrl(id) => Some(DagAction::OpenStepUrl(id)),
            DagEvent::OpenArtifactUrl(id) => Some(DagAction::OpenArtifactUrl(id)),
        }
    }

    fn install(&mut self, run_id: &str, status: String, html: String) {
        self.sessions.insert(
            run_id.to_string(),
            DagSession {
                run_id: run_id.to_string(),
                status,
                html,
            },
        );
    }
}
