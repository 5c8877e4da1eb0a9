//! Layered top-to-bottom graph layout.
//!
//! Classic hierarchical drawing over a petgraph `DiGraph`: longest-path
//! layering from a topological order, dummy waypoint cells for edges spanning
//! more than one rank, barycenter sweeps for crossing reduction, then
//! coordinate assignment. All tie-breaking is stable on input order, so
//! identical input always yields byte-identical geometry.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use petgraph::Direction;
use tracing::warn;

use crate::domain::{GraphEdge, GraphNode};
use crate::error::GraphError;

/// Named layout parameters; the defaults match the visual style of the
/// embedding surface and are rarely overridden.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Vertical separation between ranks
    pub rank_sep: f64,

    /// Horizontal separation between nodes within a rank
    pub node_sep: f64,

    /// Shared node width for both variants
    pub node_width: f64,

    /// Height of a step node (single-line layout)
    pub step_height: f64,

    /// Height of an artifact node (label plus secondary line)
    pub artifact_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rank_sep: 35.0,
            node_sep: 5.0,
            node_width: 300.0,
            step_height: 50.0,
            artifact_height: 44.0,
        }
    }
}

/// A point in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A node's box, anchored at its center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NodeBox {
    /// Midpoint of the bottom edge
    pub fn bottom_mid(&self) -> Point {
        Point {
            x: self.x,
            y: self.y + self.height / 2.0,
        }
    }

    /// Midpoint of the top edge
    pub fn top_mid(&self) -> Point {
        Point {
            x: self.x,
            y: self.y - self.height / 2.0,
        }
    }
}

/// Raw point sequence for one edge: source center, dummy waypoint centers,
/// target center. The router strips the endpoints and re-anchors them.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub edge_id: String,
    pub source: String,
    pub target: String,
    pub points: Vec<Point>,
}

/// Per-render geometry; recomputed from scratch on every render request
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGeometry {
    pub nodes: HashMap<String, NodeBox>,
    pub edges: Vec<EdgePath>,
    pub width: f64,
    pub height: f64,
}

/// Compute a layered layout for a validated graph.
///
/// Edges referencing unknown node ids are a data-integrity error and fail the
/// whole layout; silently dropping them would produce a geometry that looks
/// correct but is missing connections. Self-loops carry no meaning in a
/// pipeline DAG and are skipped with a warning.
pub fn layout(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    config: &LayoutConfig,
) -> Result<LayoutGeometry, GraphError> {
    // Graph construction; node weights are indices into the input slice.
    let mut graph: DiGraph<usize, usize> = DiGraph::new();
    let mut index = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        let ix = graph.add_node(i);
        index.insert(node.id(), ix);
    }

    // (edge slice index, source node index, target node index)
    let mut kept = Vec::with_capacity(edges.len());
    for (ei, edge) in edges.iter().enumerate() {
        let src = *index
            .get(edge.source.as_str())
            .ok_or_else(|| GraphError::UnknownEdgeEndpoint {
                edge: edge.id.clone(),
                node: edge.source.clone(),
            })?;
        let tgt = *index
            .get(edge.target.as_str())
            .ok_or_else(|| GraphError::UnknownEdgeEndpoint {
                edge: edge.id.clone(),
                node: edge.target.clone(),
            })?;
        if src == tgt {
            warn!(edge = %edge.id, "Ignoring self-loop edge");
            continue;
        }
        graph.add_edge(src, tgt, ei);
        kept.push((ei, graph[src], graph[tgt]));
    }

    // Edge endpoints are validated even for an empty node set; only a graph
    // that is genuinely empty yields the empty geometry.
    if nodes.is_empty() {
        return Ok(LayoutGeometry {
            nodes: HashMap::new(),
            edges: Vec::new(),
            width: 0.0,
            height: 0.0,
        });
    }

    // Longest-path layering from a topological order.
    let topo = toposort(&graph, None).map_err(|cycle| GraphError::CyclicGraph {
        node: nodes[graph[cycle.node_id()]].id().to_string(),
    })?;
    let mut rank = vec![0usize; nodes.len()];
    for &ix in &topo {
        for pred in graph.neighbors_directed(ix, Direction::Incoming) {
            rank[graph[ix]] = rank[graph[ix]].max(rank[graph[pred]] + 1);
        }
    }
    let rank_count = rank.iter().copied().max().unwrap_or(0) + 1;

    // Cells: one per real node plus zero-size dummies for long edges. Ranks
    // hold cell ids in their current left-to-right order.
    let mut cell_size: Vec<(f64, f64)> = nodes
        .iter()
        .map(|n| {
            let height = match n {
                GraphNode::Step(_) => config.step_height,
                GraphNode::Artifact(_) => config.artifact_height,
            };
            (config.node_width, height)
        })
        .collect();
    let mut order: Vec<Vec<usize>> = vec![Vec::new(); rank_count];
    for (i, _) in nodes.iter().enumerate() {
        order[rank[i]].push(i);
    }

    // Edge chains: [source cell, dummy cells..., target cell], one per kept
    // edge, in input edge order.
    let mut chains: Vec<Vec<usize>> = Vec::with_capacity(kept.len());
    for &(_, src, tgt) in &kept {
        let mut chain = vec![src];
        for r in rank[src] + 1..rank[tgt] {
            let cell = cell_size.len();
            cell_size.push((0.0, 0.0));
            order[r].push(cell);
            chain.push(cell);
        }
        chain.push(tgt);
        chains.push(chain);
    }

    // Adjacency between consecutive ranks, via the chain segments.
    let cell_count = cell_size.len();
    let mut up: Vec<Vec<usize>> = vec![Vec::new(); cell_count];
    let mut down: Vec<Vec<usize>> = vec![Vec::new(); cell_count];
    for chain in &chains {
        for pair in chain.windows(2) {
            down[pair[0]].push(pair[1]);
            up[pair[1]].push(pair[0]);
        }
    }

    reduce_crossings(&mut order, &up, &down, cell_count);

    // X assignment: pack each rank left to right, then center it on the
    // widest rank.
    let mut x = vec![0.0f64; cell_count];
    let mut rank_width = vec![0.0f64; rank_count];
    for (r, row) in order.iter().enumerate() {
        let mut cursor = 0.0;
        for &cell in row {
            x[cell] = cursor + cell_size[cell].0 / 2.0;
            cursor += cell_size[cell].0 + config.node_sep;
        }
        if !row.is_empty() {
            rank_width[r] = cursor - config.node_sep;
        }
    }
    let canvas_width = rank_width.iter().copied().fold(0.0f64, f64::max);
    for (r, row) in order.iter().enumerate() {
        let shift = (canvas_width - rank_width[r]) / 2.0;
        for &cell in row {
            x[cell] += shift;
        }
    }

    // Y assignment: ranks stack downward, each as tall as its tallest node.
    let mut y = vec![0.0f64; cell_count];
    let mut cursor = 0.0;
    for (r, row) in order.iter().enumerate() {
        let max_height = row
            .iter()
            .map(|&cell| cell_size[cell].1)
            .fold(0.0f64, f64::max);
        let center = cursor + max_height / 2.0;
        for &cell in row {
            y[cell] = center;
        }
        cursor += max_height;
        if r + 1 < rank_count {
            cursor += config.rank_sep;
        }
    }
    let canvas_height = cursor;

    let node_boxes = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            (
                node.id().to_string(),
                NodeBox {
                    x: x[i],
                    y: y[i],
                    width: cell_size[i].0,
                    height: cell_size[i].1,
                },
            )
        })
        .collect();

    let edge_paths = kept
        .iter()
        .zip(&chains)
        .map(|(&(ei, _, _), chain)| EdgePath {
            edge_id: edges[ei].id.clone(),
            source: edges[ei].source.clone(),
            target: edges[ei].target.clone(),
            points: chain
                .iter()
                .map(|&cell| Point {
                    x: x[cell],
                    y: y[cell],
                })
                .collect(),
        })
        .collect();

    Ok(LayoutGeometry {
        nodes: node_boxes,
        edges: edge_paths,
        width: canvas_width,
        height: canvas_height,
    })
}

/// Barycenter crossing reduction: alternating down/up sweeps, each rank
/// reordered by the mean position of its neighbors in the fixed adjacent
/// rank. Stable sorting keeps results deterministic.
fn reduce_crossings(
    order: &mut [Vec<usize>],
    up: &[Vec<usize>],
    down: &[Vec<usize>],
    cell_count: usize,
) {
    const SWEEPS: usize = 4;

    let mut pos = vec![0usize; cell_count];
    let refresh = |pos: &mut Vec<usize>, row: &[usize]| {
        for (i, &cell) in row.iter().enumerate() {
            pos[cell] = i;
        }
    };
    for row in order.iter() {
        refresh(&mut pos, row);
    }

    for sweep in 0..SWEEPS {
        if sweep % 2 == 0 {
            for r in 1..order.len() {
                sort_by_barycenter(&mut order[r], up, &pos);
                refresh(&mut pos, &order[r]);
            }
        } else {
            for r in (0..order.len().saturating_sub(1)).rev() {
                sort_by_barycenter(&mut order[r], down, &pos);
                refresh(&mut pos, &order[r]);
            }
        }
    }
}

fn sort_by_barycenter(row: &mut Vec<usize>, neighbors: &[Vec<usize>], pos: &[usize]) {
    let mut keyed: Vec<(f64, usize)> = row
        .iter()
        .enumerate()
        .map(|(i, &cell)| {
            let adjacent = &neighbors[cell];
            let key = if adjacent.is_empty() {
                // No neighbors in the fixed rank: hold the current position.
                i as f64
            } else {
                adjacent.iter().map(|&n| pos[n] as f64).sum::<f64>() / adjacent.len() as f64
            };
            (key, cell)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    *row = keyed.into_iter().map(|(_, cell)| cell).collect();
}
