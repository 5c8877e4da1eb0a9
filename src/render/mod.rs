//! The DAG rendering pipeline.
//!
//! `layout` computes layered geometry, `router` turns raw edge point lists
//! into orthogonal polylines, `svg` draws the result, and `html` wraps it
//! into an embeddable document. `icons` provides the immutable icon snapshot
//! shared by every render.

pub mod html;
pub mod icons;
pub mod layout;
pub mod router;
pub mod svg;

pub use html::TemplateAssets;
pub use icons::IconSet;
pub use layout::{layout, LayoutConfig, LayoutGeometry, NodeBox, Point};
pub use router::{route, RoutedEdge};

use crate::domain::{GraphEdge, GraphNode};
use crate::error::GraphError;

/// Escape text for interpolation into markup (element content or attributes)
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Run the full synchronous pipeline: layout, routing, SVG construction
pub fn render_graph(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    config: &LayoutConfig,
    icons: &IconSet,
) -> Result<String, GraphError> {
    let geometry = layout(nodes, edges, config)?;
    let routed = route(&geometry);
    Ok(svg::render(&geometry, &routed, nodes, icons))
}
