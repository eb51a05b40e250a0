//! Visual container for the nodes of one subgraph scope.

use std::collections::HashMap;

use crate::geometry::Rect;
use crate::item::ViewItem;
use crate::model::NodeId;
use crate::transform::FlowDirection;

/// Groups the items of one context node and tracks their bounding rectangle.
///
/// Children are stored by node ID; their [`ViewItem`]s live in the scene.
#[derive(Debug, Clone)]
pub struct ContextGroup {
    node: NodeId,
    children: Vec<NodeId>,
    rect: Rect,
    direction: FlowDirection,
    curved_edges: bool,
}

impl ContextGroup {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            children: Vec::new(),
            rect: Rect::default(),
            direction: FlowDirection::LeftToRight,
            curved_edges: true,
        }
    }

    /// The context node this group represents.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn contains(&self, child: NodeId) -> bool {
        self.children.contains(&child)
    }

    /// Register `child` as belonging to this context. Repeated calls are no-ops.
    pub fn add_child(&mut self, child: NodeId) {
        if !self.contains(child) {
            self.children.push(child);
        }
    }

    pub fn remove_child(&mut self, child: NodeId) -> bool {
        let len_before = self.children.len();
        self.children.retain(|&c| c != child);
        self.children.len() != len_before
    }

    /// Bounding rectangle of all children in scene coordinates. Empty when the
    /// context has no visible children.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Recompute [`rect`](Self::rect) from the children's current geometry.
    pub fn update_rect(&mut self, items: &HashMap<NodeId, ViewItem>) {
        self.rect = self
            .children
            .iter()
            .filter_map(|child| items.get(child))
            .fold(Rect::default(), |acc, item| acc.united(&item.scene_rect()));
        log::trace!(context = self.node, children = self.children.len(); "Context rect updated");
    }

    pub fn flow_direction(&self) -> FlowDirection {
        self.direction
    }

    /// Re-orient every child and refit the rectangle around them.
    pub fn set_flow_direction(&mut self, direction: FlowDirection, items: &mut HashMap<NodeId, ViewItem>) {
        self.direction = direction;
        for child in &self.children {
            if let Some(item) = items.get_mut(child) {
                item.set_flow_direction(direction);
            }
        }
        self.update_rect(items);
    }

    pub fn curved_edges(&self) -> bool {
        self.curved_edges
    }

    pub fn set_curved_edges(&mut self, curved: bool) {
        self.curved_edges = curved;
    }
}
