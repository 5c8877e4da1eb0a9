//! Orthogonal edge routing.
//!
//! The layout stage emits raw point sequences running center-to-center
//! through dummy waypoints. This pass re-anchors each edge to the source's
//! bottom midpoint and the target's top midpoint and reconstructs the path
//! out of vertical and horizontal segments only.

use tracing::warn;

use super::layout::{LayoutGeometry, Point};

/// One routed edge; `source` identifies the originating node so the
/// renderer can tag the polyline for hover/selection highlighting.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    pub source: String,
    pub points: Vec<Point>,
}

/// Route every edge of the layout into an orthogonal polyline.
///
/// An edge with no interior waypoints (adjacent ranks, no bends) still yields
/// a valid four-point path bending at the vertical midpoint between the two
/// anchors; the interior slice is never indexed blindly.
pub fn route(layout: &LayoutGeometry) -> Vec<RoutedEdge> {
    let mut routed = Vec::with_capacity(layout.edges.len());

    for path in &layout.edges {
        let (Some(source), Some(target)) =
            (layout.nodes.get(&path.source), layout.nodes.get(&path.target))
        else {
            // Layout always emits boxes for both endpoints; a miss here means
            // the geometry was tampered with between stages.
            warn!(edge = %path.edge_id, "Edge endpoints missing from geometry, skipping");
            continue;
        };

        let start = source.bottom_mid();
        let end = target.top_mid();

        // Strip the first and last raw points; they sit at the node centers.
        let interior = if path.points.len() > 2 {
            &path.points[1..path.points.len() - 1]
        } else {
            &[][..]
        };

        let mut points = Vec::with_capacity(interior.len() + 4);
        points.push(start);
        match (interior.first(), interior.last()) {
            (Some(first), Some(last)) => {
                points.push(Point {
                    x: start.x,
                    y: first.y,
                });
                points.push(*first);
                // Waypoints on different ranks may not line up vertically;
                // bend at the lower rank before crossing over.
                for pair in interior.windows(2) {
                    let (p, q) = (pair[0], pair[1]);
                    if (p.x - q.x).abs() > f64::EPSILON {
                        points.push(Point { x: p.x, y: q.y });
                    }
                    points.push(q);
                }
                points.push(Point { x: end.x, y: last.y });
            }
            _ => {
                let mid_y = (start.y + end.y) / 2.0;
                points.push(Point { x: start.x, y: mid_y });
                points.push(Point { x: end.x, y: mid_y });
            }
        }
        points.push(end);

        routed.push(RoutedEdge {
            source: path.source.clone(),
            points,
        });
    }

    routed
}
