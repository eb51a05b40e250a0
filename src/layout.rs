//! Sugiyama layered layout for seeding context positions.
//!
//! The result is expressed in node-space (layer index along the flow, rank
//! across it), so it can be handed straight to
//! [`NodeViewScene::set_node_position`] or stored in a graph model's context
//! position map. Flow direction is applied later by the coordinate transform.
//!
//! Requires the `layout` feature to be enabled.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::geometry::Point;
use crate::model::{GraphModel, NodeId};
use crate::scene::NodeViewScene;

/// Configuration for the Sugiyama layout algorithm.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct SugiyamaConfig {
    /// Minimum spacing between vertices (default: 0.0, which uses the
    /// `rust-sugiyama` default of 10.0).
    pub vertex_spacing: f64,
    /// Minimum edge length between layers (default: 0, which uses the
    /// `rust-sugiyama` default of 1).
    pub minimum_length: u32,
    /// Whether to include dummy vertices in the layout (default: false).
    pub dummy_vertices: bool,
}

/// Compute node-space positions for `nodes`.
///
/// `edges` are `(dependency, dependent)` pairs; edges naming a node outside
/// `nodes` and self-loops are skipped. The x coordinate of each result is the
/// node's layer, the y coordinate its rank within all laid-out nodes across
/// the flow. Disconnected components are stacked across the flow.
///
/// Duplicate node IDs are ignored (first occurrence wins).
pub fn sugiyama_node_positions(
    nodes: &[NodeId],
    edges: &[(NodeId, NodeId)],
    config: &SugiyamaConfig,
) -> Vec<(NodeId, Point)> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let mut id_to_idx: HashMap<NodeId, u32> = HashMap::new();
    let mut idx_to_id: Vec<NodeId> = Vec::with_capacity(nodes.len());
    for &node in nodes {
        if let std::collections::hash_map::Entry::Vacant(e) = id_to_idx.entry(node) {
            e.insert(idx_to_id.len() as u32);
            idx_to_id.push(node);
        }
    }

    // Every vertex gets the same unit footprint; ranks are all we keep.
    let vertices: Vec<(u32, (f64, f64))> = (0..idx_to_id.len() as u32)
        .map(|idx| (idx, (1.0, 1.0)))
        .collect();

    let mapped_edges: Vec<(u32, u32)> = edges
        .iter()
        .filter(|(src, dst)| src != dst)
        .filter_map(|(src, dst)| Some((*id_to_idx.get(src)?, *id_to_idx.get(dst)?)))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let mut sg_config = rust_sugiyama::configure::Config {
        dummy_vertices: config.dummy_vertices,
        ..Default::default()
    };
    if config.vertex_spacing > 0.0 {
        sg_config.vertex_spacing = config.vertex_spacing;
    }
    if config.minimum_length > 0 {
        sg_config.minimum_length = config.minimum_length;
    }

    let subgraphs = rust_sugiyama::from_vertices_and_edges(&vertices, &mapped_edges, &sg_config);

    // rust-sugiyama lays out top to bottom: y is the layer, x is across.
    // Components are shifted so their cross coordinates never interleave.
    let mut raw: Vec<(NodeId, f64, f64)> = Vec::with_capacity(idx_to_id.len());
    let mut cross_offset = 0.0;
    for (layout, _width, _height) in &subgraphs {
        let min_x = layout.iter().map(|&(_, (x, _))| x).fold(f64::INFINITY, f64::min);
        let max_x = layout.iter().map(|&(_, (x, _))| x).fold(f64::NEG_INFINITY, f64::max);
        for &(idx, (x, y)) in layout {
            if let Some(&node) = idx_to_id.get(idx) {
                raw.push((node, y, x - min_x + cross_offset));
            }
        }
        if min_x.is_finite() {
            cross_offset += max_x - min_x + 1.0;
        }
    }

    let layers = distinct_sorted(raw.iter().map(|&(_, layer, _)| layer));
    let ranks = distinct_sorted(raw.iter().map(|&(_, _, cross)| cross));

    raw.into_iter()
        .map(|(node, layer, cross)| {
            let pos = Point::new(rank_of(&layers, layer) as f32, rank_of(&ranks, cross) as f32);
            (node, pos)
        })
        .collect()
}

const RANK_EPSILON: f64 = 1e-6;

fn distinct_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup_by(|a, b| (*a - *b).abs() < RANK_EPSILON);
    values
}

fn rank_of(sorted: &[f64], value: f64) -> usize {
    sorted
        .iter()
        .position(|&v| (v - value).abs() < RANK_EPSILON)
        .unwrap_or(0)
}

/// Dependency edges among `children`, as `(dependency, dependent)` pairs.
pub fn dependency_edges<M>(model: &M, children: &[NodeId]) -> Vec<(NodeId, NodeId)>
where
    M: GraphModel + ?Sized,
{
    children
        .iter()
        .flat_map(|&child| {
            model
                .immediate_dependencies(child)
                .into_iter()
                .filter(|dep| children.contains(dep))
                .map(move |dep| (dep, child))
        })
        .collect()
}

impl NodeViewScene {
    /// Lay out the children of `context` with Sugiyama and move their items.
    ///
    /// Returns the new node-space positions so the graph model can persist
    /// them. Unknown contexts yield an empty list.
    pub fn arrange_context<M>(
        &mut self,
        context: NodeId,
        model: &M,
        config: &SugiyamaConfig,
    ) -> Vec<(NodeId, Point)>
    where
        M: GraphModel + ?Sized,
    {
        let Some(children) = self.context(context).map(|ctx| ctx.children().to_vec()) else {
            return Vec::new();
        };
        let edges = dependency_edges(model, &children);
        let positions = sugiyama_node_positions(&children, &edges, config);
        for &(node, pos) in &positions {
            self.set_node_position(node, pos);
        }
        debug!(context = context, nodes = positions.len(); "Context arranged");
        positions
    }
}
