//! SVG construction for a laid-out DAG.
//!
//! Emits one root canvas with two sibling groups: edges first (so nodes draw
//! on top), then node containers. Every container carries stable `data-*`
//! attributes so the embedding surface can wire click and hover interactions
//! back to domain entities without re-deriving any geometry.

use tracing::warn;

use crate::domain::{status, ArtifactNode, GraphNode, StepNode};

use super::escape;
use super::icons::IconSet;
use super::layout::{LayoutGeometry, NodeBox};
use super::router::RoutedEdge;

const ICON_SIZE: f64 = 16.0;

/// Render the complete SVG document for one graph
pub fn render(
    layout: &LayoutGeometry,
    routed: &[RoutedEdge],
    nodes: &[GraphNode],
    icons: &IconSet,
) -> String {
    let mut parts = vec![format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="dag" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = layout.width,
        h = layout.height,
    )];

    parts.push(r#"<g class="edges">"#.to_string());
    for edge in routed {
        let points = edge
            .points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        parts.push(format!(
            r#"<polyline class="edge" data-source="{}" points="{}" fill="none"/>"#,
            escape(&edge.source),
            points,
        ));
    }
    parts.push("</g>".to_string());

    parts.push(r#"<g class="nodes">"#.to_string());
    for node in nodes {
        let Some(node_box) = layout.nodes.get(node.id()) else {
            warn!(node = node.id(), "Node missing from geometry, skipping");
            continue;
        };
        match node {
            GraphNode::Step(step) => parts.push(render_step(step, node_box, icons)),
            GraphNode::Artifact(artifact) => {
                parts.push(render_artifact(artifact, node_box, icons))
            }
        }
    }
    parts.push("</g>".to_string());

    parts.push("</svg>".to_string());
    parts.join("\n")
}

/// Step container: icon above name above duration, centered.
///
/// The icon and the display class both key off the normalized status; an
/// unrecognized status simply yields an empty icon.
fn render_step(step: &StepNode, node_box: &NodeBox, icons: &IconSet) -> String {
    let tx = node_box.x - node_box.width / 2.0;
    let ty = node_box.y - node_box.height / 2.0;
    let center = node_box.width / 2.0;

    let mut out = format!(
        r#"<g class="node step {status}" data-id="{id}" data-stepid="{exec}" transform="translate({tx},{ty})">"#,
        status = escape(&step.status),
        id = escape(&step.id),
        exec = escape(&step.execution_id),
    );
    out.push_str(&format!(
        r#"<rect class="container" width="{}" height="{}" rx="8"/>"#,
        node_box.width, node_box.height,
    ));
    out.push_str(&format!(
        r#"<g class="icon" transform="translate({},4)">{}</g>"#,
        center - ICON_SIZE / 2.0,
        icons.get(&step.status),
    ));
    out.push_str(&format!(
        r#"<text class="name" x="{center}" y="32" text-anchor="middle">{}</text>"#,
        escape(&step.name),
    ));
    if let (Some(start), Some(end)) = (&step.start_time, &step.end_time) {
        if let Some(seconds) = status::duration_between(start, end) {
            out.push_str(&format!(
                r#"<text class="duration" x="{center}" y="45" text-anchor="middle">{}</text>"#,
                escape(&status::format_duration(seconds)),
            ));
        }
    }
    out.push_str("</g>");
    out
}

/// Artifact container: icon beside a text block of name over data type.
fn render_artifact(artifact: &ArtifactNode, node_box: &NodeBox, icons: &IconSet) -> String {
    let tx = node_box.x - node_box.width / 2.0;
    let ty = node_box.y - node_box.height / 2.0;

    // Model artifacts get the dataflow icon; everything else is plain data.
    let icon_name = if artifact.artifact_type.as_deref() == Some("ModelArtifact") {
        "dataflow"
    } else {
        "database"
    };

    let mut out = format!(
        r#"<g class="node artifact" data-id="{id}" data-artifactid="{exec}" transform="translate({tx},{ty})">"#,
        id = escape(&artifact.id),
        exec = escape(&artifact.execution_id),
    );
    out.push_str(&format!(
        r#"<rect class="container" width="{}" height="{}" rx="8"/>"#,
        node_box.width, node_box.height,
    ));
    out.push_str(&format!(
        r#"<g class="icon" transform="translate(12,{})">{}</g>"#,
        (node_box.height - ICON_SIZE) / 2.0,
        icons.get(icon_name),
    ));
    out.push_str(&format!(
        r#"<text class="name" x="40" y="19">{}</text>"#,
        escape(&artifact.name),
    ));
    if let Some(data_type) = &artifact.data_type {
        out.push_str(&format!(
            r#"<text class="type" x="40" y="34">{}</text>"#,
            escape(data_type),
        ));
    }
    out.push_str("</g>");
    out
}
