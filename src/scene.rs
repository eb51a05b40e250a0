//! Registry of every item, edge and context group shown in a node view.
//!
//! [`NodeViewScene`] exclusively owns all three entity kinds. Items refer to
//! their edges by [`EdgeId`] and to their context by node ID; edges refer to
//! their endpoints by node ID. Every removal path detaches those references
//! before the entity is dropped, so a lookup through them either finds a live
//! entity or nothing.
//!
//! Geometry-affecting mutations (expansion, moves, direction changes) go
//! through the scene, which re-routes the incident edges and refits the owning
//! context before returning.
//!
//! # Example
//!
//! ```ignore
//! use slint_node_view::{InputRef, NodeViewScene, SceneConfig, SimpleGraph};
//!
//! let mut scene = NodeViewScene::new(SceneConfig::default());
//! scene.add_context(project_id, &graph);
//! scene.add_edge(clip_id, InputRef::new(merge_id, "base"))?;
//!
//! window.set_edge_paths(/* scene.edges().iter().map(|e| e.path()) */);
//! scene.set_expanded(merge_id, true, false);
//! ```

use std::collections::HashMap;

use log::{debug, trace, warn};
use slint::{Model, VecModel};

use crate::config::{ItemMetrics, SceneConfig};
use crate::context::ContextGroup;
use crate::edge::{EdgeId, ViewEdge};
use crate::error::SceneError;
use crate::geometry::{Point, Rect};
use crate::item::ViewItem;
use crate::model::{GraphModel, InputRef, NodeId};
use crate::selection::SelectionSet;
use crate::transform::{FlowDirection, Orientation};

/// A scene member as seen from the outside: either a plain node item or a
/// context group.
#[derive(Debug, Clone, Copy)]
pub enum SceneEntry<'a> {
    Item(&'a ViewItem),
    Context(&'a ContextGroup),
}

impl SceneEntry<'_> {
    /// Bounding rectangle in scene coordinates.
    pub fn rect(&self) -> Rect {
        match self {
            SceneEntry::Item(item) => item.scene_rect(),
            SceneEntry::Context(ctx) => ctx.rect(),
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        match self {
            SceneEntry::Item(item) => item.node(),
            SceneEntry::Context(ctx) => Some(ctx.node()),
        }
    }
}

pub struct NodeViewScene {
    config: SceneConfig,
    items: HashMap<NodeId, ViewItem>,
    edges: Vec<ViewEdge>,
    contexts: HashMap<NodeId, ContextGroup>,
    next_edge_id: EdgeId,
    stacking: HashMap<NodeId, u64>,
    next_stack: u64,
    selected_nodes: SelectionSet,
    selected_edges: SelectionSet,
    selection_changed: Option<Box<dyn FnMut()>>,
}

impl Default for NodeViewScene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl NodeViewScene {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            items: HashMap::new(),
            edges: Vec::new(),
            contexts: HashMap::new(),
            next_edge_id: 1,
            stacking: HashMap::new(),
            next_stack: 0,
            selected_nodes: SelectionSet::new(),
            selected_edges: SelectionSet::new(),
            selection_changed: None,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn metrics(&self) -> &ItemMetrics {
        &self.config.metrics
    }

    /// Register a callback run once per effective selection change.
    pub fn on_selection_changed<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.selection_changed = Some(Box::new(callback));
    }

    fn notify_selection_changed(&mut self) {
        if let Some(callback) = self.selection_changed.as_mut() {
            callback();
        }
    }

    // === Items ===

    /// Create the item for `node` if it does not exist yet.
    pub fn add_item<M>(&mut self, node: NodeId, model: &M) -> &ViewItem
    where
        M: GraphModel + ?Sized,
    {
        if !self.items.contains_key(&node) {
            self.raise(node);
        }
        let metrics = self.config.metrics;
        let direction = self.config.direction;
        self.items.entry(node).or_insert_with(|| {
            trace!(node = node; "Creating item");
            let mut item = ViewItem::new(metrics);
            item.set_node(Some(node), model);
            item.set_flow_direction(direction);
            item
        })
    }

    /// Destroy the item for `node` together with every edge touching it.
    pub fn remove_item(&mut self, node: NodeId) -> bool {
        let Some(item) = self.items.get(&node) else {
            return false;
        };
        let incident = item.edges().to_vec();
        let context = item.context();
        let deselected = self.flush_selection(&[node]);

        for id in incident {
            self.destroy_edge(id);
        }

        self.items.remove(&node);
        self.stacking.remove(&node);
        if let Some(ctx) = context.and_then(|c| self.contexts.get_mut(&c)) {
            ctx.remove_child(node);
            ctx.update_rect(&self.items);
        }
        if deselected {
            self.notify_selection_changed();
        }
        trace!(node = node; "Item removed");
        true
    }

    /// Move `node` to the top of the hit-test stacking order.
    fn raise(&mut self, node: NodeId) {
        self.next_stack += 1;
        self.stacking.insert(node, self.next_stack);
    }

    pub fn item(&self, node: NodeId) -> Option<&ViewItem> {
        self.items.get(&node)
    }

    pub fn items(&self) -> impl Iterator<Item = &ViewItem> + '_ {
        self.items.values()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Re-run the node binding after the node's input list changed.
    pub fn refresh_item_inputs<M>(&mut self, node: NodeId, model: &M) -> bool
    where
        M: GraphModel + ?Sized,
    {
        let Some(item) = self.items.get_mut(&node) else {
            return false;
        };
        item.set_node(Some(node), model);
        self.after_geometry_change(node);
        true
    }

    /// Appearance hook for the graph model: label or color of `node` changed.
    pub fn node_appearance_changed(&mut self, node: NodeId) {
        if let Some(item) = self.items.get_mut(&node) {
            if item.node() == Some(node) {
                item.mark_appearance_stale();
            }
        }
    }

    /// Re-read the appearance of `node` if it was marked stale.
    pub fn refresh_appearance<M>(&mut self, node: NodeId, model: &M)
    where
        M: GraphModel + ?Sized,
    {
        if let Some(item) = self.items.get_mut(&node) {
            if item.appearance_stale() {
                item.refresh_appearance(node, model);
            }
        }
    }

    // === Item geometry ===

    pub fn node_position(&self, node: NodeId) -> Option<Point> {
        self.items.get(&node).map(ViewItem::node_position)
    }

    pub fn set_node_position(&mut self, node: NodeId, pos: Point) -> bool {
        let Some(item) = self.items.get_mut(&node) else {
            return false;
        };
        item.set_node_position(pos);
        self.raise(node);
        self.after_geometry_change(node);
        true
    }

    /// Expand or collapse an item. Returns `true` if the item changed.
    pub fn set_expanded(&mut self, node: NodeId, expand: bool, hide_titlebar: bool) -> bool {
        let changed = self
            .items
            .get_mut(&node)
            .is_some_and(|item| item.set_expanded(expand, hide_titlebar));
        if changed {
            self.after_geometry_change(node);
        }
        changed
    }

    pub fn toggle_expanded(&mut self, node: NodeId) -> bool {
        let changed = self
            .items
            .get_mut(&node)
            .is_some_and(ViewItem::toggle_expanded);
        if changed {
            self.after_geometry_change(node);
        }
        changed
    }

    /// Re-orient a single item. Plain items are not touched by
    /// [`set_flow_direction`](Self::set_flow_direction); the caller moves them
    /// with this.
    pub fn set_item_flow_direction(&mut self, node: NodeId, direction: FlowDirection) -> bool {
        let Some(item) = self.items.get_mut(&node) else {
            return false;
        };
        item.set_flow_direction(direction);
        self.after_geometry_change(node);
        true
    }

    pub fn set_highlighted_index(&mut self, node: NodeId, index: Option<usize>) -> bool {
        self.items
            .get_mut(&node)
            .is_some_and(|item| item.set_highlighted_index(index))
    }

    pub fn set_label_as_output(&mut self, node: NodeId, e: bool) {
        if let Some(item) = self.items.get_mut(&node) {
            item.set_label_as_output(e);
        }
    }

    /// Input slot of `node` under a scene-space point.
    pub fn input_slot_at(&self, node: NodeId, point: Point) -> Option<usize> {
        let item = self.items.get(&node)?;
        item.input_slot_at(point.delta_from(item.pos()))
    }

    /// Move every selected item by `delta` screen pixels without committing.
    pub fn drag_selected(&mut self, delta: Point) -> usize {
        let dragged: Vec<NodeId> = self
            .selected_nodes
            .iter()
            .copied()
            .filter(|id| self.items.contains_key(id))
            .collect();
        for &node in &dragged {
            if let Some(item) = self.items.get_mut(&node) {
                item.drag_by(delta);
            }
            self.raise(node);
            self.after_geometry_change(node);
        }
        dragged.len()
    }

    /// Commit all in-progress drags back to node-space.
    ///
    /// Returns the new node-space positions, sorted by node ID, for the graph
    /// model to store.
    pub fn commit_drag(&mut self) -> Vec<(NodeId, Point)> {
        let mut committed: Vec<(NodeId, Point)> = self
            .items
            .iter_mut()
            .filter_map(|(&id, item)| item.commit_drag().map(|pos| (id, pos)))
            .collect();
        committed.sort_by_key(|&(id, _)| id);
        for &(node, _) in &committed {
            self.after_geometry_change(node);
        }
        committed
    }

    /// Items whose rectangle intersects `rect`.
    pub fn items_in_rect(&self, rect: Rect) -> Vec<NodeId> {
        self.items
            .iter()
            .filter(|(_, item)| item.scene_rect().intersects(&rect))
            .map(|(&id, _)| id)
            .collect()
    }

    fn after_geometry_change(&mut self, node: NodeId) {
        let Some(item) = self.items.get(&node) else {
            return;
        };
        let incident = item.edges().to_vec();
        let context = item.context();

        for edge in self.edges.iter_mut().filter(|e| incident.contains(&e.id())) {
            Self::adjust_edge(edge, &self.items);
        }
        if let Some(ctx) = context.and_then(|c| self.contexts.get_mut(&c)) {
            ctx.update_rect(&self.items);
        }
    }

    fn adjust_edge(edge: &mut ViewEdge, items: &HashMap<NodeId, ViewItem>) {
        if let (Some(from), Some(to)) = (items.get(&edge.output()), items.get(&edge.input().node)) {
            edge.adjust(from, to);
        }
    }

    // === Edges ===

    pub fn edge(&self, id: EdgeId) -> Option<&ViewEdge> {
        self.edges.iter().find(|e| e.id() == id)
    }

    /// Edges in creation order.
    pub fn edges(&self) -> &[ViewEdge] {
        &self.edges
    }

    /// The edge connecting exactly `(output, input)`, if any.
    pub fn edge_between(&self, output: NodeId, input: &InputRef) -> Option<&ViewEdge> {
        self.edges.iter().find(|e| e.connects(output, input))
    }

    /// Return the edge for `(output, input)`, creating it if needed.
    ///
    /// Both endpoint nodes must already have items.
    pub fn add_edge(&mut self, output: NodeId, input: InputRef) -> Result<EdgeId, SceneError> {
        if let Some(existing) = self.edge_between(output, &input) {
            return Ok(existing.id());
        }
        for endpoint in [output, input.node] {
            if !self.items.contains_key(&endpoint) {
                warn!(output = output, input_node = input.node, missing = endpoint; "Refusing edge without endpoint item");
                return Err(SceneError::ItemNotFound(endpoint));
            }
        }

        let id = self.allocate_edge_id();

        let mut edge = ViewEdge::new(id, output, input, self.config.bezier_min_offset);
        edge.set_flow_direction(self.config.direction);
        edge.set_curved(self.config.curved_edges);

        if let Some(from) = self.items.get_mut(&output) {
            from.attach_edge(id);
        }
        if let Some(to) = self.items.get_mut(&edge.input().node) {
            to.attach_edge(id);
        }
        Self::adjust_edge(&mut edge, &self.items);

        debug!(edge = id, output = output, input_node = edge.input().node, input = edge.input().input.as_str(); "Edge added");
        self.edges.push(edge);
        Ok(id)
    }

    /// Next free edge ID. The counter wraps to 1 after `EdgeId::MAX` and skips
    /// IDs still held by live edges.
    fn allocate_edge_id(&mut self) -> EdgeId {
        loop {
            let id = self.next_edge_id;
            self.next_edge_id = self.next_edge_id.checked_add(1).unwrap_or(1);
            if self.edge(id).is_none() {
                return id;
            }
        }
    }

    /// Remove the edge for `(output, input)`. Returns `false` if there was none.
    pub fn remove_edge(&mut self, output: NodeId, input: &InputRef) -> bool {
        match self.edge_between(output, input).map(ViewEdge::id) {
            Some(id) => self.destroy_edge(id),
            None => false,
        }
    }

    fn destroy_edge(&mut self, id: EdgeId) -> bool {
        let Some(index) = self.edges.iter().position(|e| e.id() == id) else {
            return false;
        };
        let edge = self.edges.remove(index);

        for endpoint in [edge.output(), edge.input().node] {
            if let Some(item) = self.items.get_mut(&endpoint) {
                item.detach_edge(id);
            }
        }
        if self.selected_edges.set(id, false) {
            self.notify_selection_changed();
        }
        debug!(edge = id, output = edge.output(), input_node = edge.input().node; "Edge removed");
        true
    }

    /// Closest edge within `tolerance` of `point`.
    pub fn edge_at(&self, point: Point, tolerance: f32) -> Option<EdgeId> {
        let mut closest = None;
        let mut closest_distance = tolerance;
        for edge in &self.edges {
            let distance = edge.distance_to(point);
            if distance <= closest_distance {
                closest_distance = distance;
                closest = Some(edge.id());
            }
        }
        closest
    }

    // === Contexts ===

    /// Return the context group for `node`, creating and populating it from the
    /// model's position map if needed.
    pub fn add_context<M>(&mut self, node: NodeId, model: &M) -> &ContextGroup
    where
        M: GraphModel + ?Sized,
    {
        if !self.contexts.contains_key(&node) {
            let mut ctx = ContextGroup::new(node);
            ctx.set_curved_edges(self.config.curved_edges);
            ctx.set_flow_direction(self.config.direction, &mut self.items);

            for (child, pos) in model.context_positions(node) {
                self.add_item(child, model);
                self.adopt_child(&mut ctx, child, pos);
            }

            for edge in self
                .edges
                .iter_mut()
                .filter(|e| ctx.contains(e.output()) || ctx.contains(e.input().node))
            {
                Self::adjust_edge(edge, &self.items);
            }
            ctx.update_rect(&self.items);

            debug!(context = node, children = ctx.children().len(); "Context added");
            self.contexts.insert(node, ctx);
        }
        &self.contexts[&node]
    }

    fn adopt_child(&mut self, ctx: &mut ContextGroup, child: NodeId, pos: Point) {
        let previous = self.items.get(&child).and_then(ViewItem::context);
        if let Some(prev) = previous.filter(|&p| p != ctx.node()) {
            if let Some(prev_ctx) = self.contexts.get_mut(&prev) {
                prev_ctx.remove_child(child);
                prev_ctx.update_rect(&self.items);
            }
        }
        if let Some(item) = self.items.get_mut(&child) {
            item.set_context(Some(ctx.node()));
            item.set_flow_direction(ctx.flow_direction());
            item.set_node_position(pos);
        }
        ctx.add_child(child);
    }

    /// Destroy the context group for `node` and the items of all its children.
    pub fn remove_context(&mut self, node: NodeId) -> bool {
        let Some(ctx) = self.contexts.remove(&node) else {
            return false;
        };
        let deselected = self.flush_selection(ctx.children());
        for &child in ctx.children() {
            self.remove_item(child);
        }
        if deselected {
            self.notify_selection_changed();
        }
        debug!(context = node, children = ctx.children().len(); "Context removed");
        true
    }

    pub fn context(&self, node: NodeId) -> Option<&ContextGroup> {
        self.contexts.get(&node)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &ContextGroup> + '_ {
        self.contexts.values()
    }

    /// Look `node` up as an item first, then as a context group.
    pub fn entry(&self, node: NodeId) -> Option<SceneEntry<'_>> {
        self.items
            .get(&node)
            .map(SceneEntry::Item)
            .or_else(|| self.contexts.get(&node).map(SceneEntry::Context))
    }

    /// Topmost entry under `point`.
    ///
    /// Items win over contexts. Among overlapping items the one added or moved
    /// last wins; among overlapping contexts the smallest (innermost) one,
    /// with ties going to the lower node ID.
    pub fn entry_at(&self, point: Point) -> Option<SceneEntry<'_>> {
        let item = self
            .items
            .iter()
            .filter(|(_, item)| item.scene_rect().contains(point))
            .max_by_key(|&(&id, _)| (self.stacking.get(&id).copied().unwrap_or(0), id))
            .map(|(_, item)| SceneEntry::Item(item));
        item.or_else(|| {
            self.contexts
                .values()
                .filter(|ctx| ctx.rect().contains(point))
                .min_by(|a, b| {
                    let area = |r: Rect| r.width * r.height;
                    area(a.rect())
                        .total_cmp(&area(b.rect()))
                        .then(a.node().cmp(&b.node()))
                })
                .map(SceneEntry::Context)
        })
    }

    // === Configuration ===

    pub fn flow_direction(&self) -> FlowDirection {
        self.config.direction
    }

    pub fn flow_orientation(&self) -> Orientation {
        self.config.direction.orientation()
    }

    /// Re-orient every context group (and its children) and every edge.
    ///
    /// Items outside any context keep their placement until the caller calls
    /// [`set_item_flow_direction`](Self::set_item_flow_direction) on them.
    pub fn set_flow_direction(&mut self, direction: FlowDirection) {
        self.config.direction = direction;

        for ctx in self.contexts.values_mut() {
            ctx.set_flow_direction(direction, &mut self.items);
        }
        for edge in &mut self.edges {
            edge.set_flow_direction(direction);
            Self::adjust_edge(edge, &self.items);
        }
        debug!(direction:? = direction; "Flow direction changed");
    }

    pub fn edges_are_curved(&self) -> bool {
        self.config.curved_edges
    }

    pub fn set_edges_curved(&mut self, curved: bool) {
        if self.config.curved_edges == curved {
            return;
        }
        self.config.curved_edges = curved;
        for edge in &mut self.edges {
            edge.set_curved(curved);
        }
        for ctx in self.contexts.values_mut() {
            ctx.set_curved_edges(curved);
        }
    }

    // === Selection ===

    pub fn is_node_selected(&self, node: NodeId) -> bool {
        self.selected_nodes.contains(node)
    }

    pub fn is_edge_selected(&self, id: EdgeId) -> bool {
        self.selected_edges.contains(id)
    }

    /// Click on a node. Without `additive` everything else is deselected.
    pub fn select_node(&mut self, node: NodeId, additive: bool) -> bool {
        if !self.items.contains_key(&node) {
            return false;
        }
        let mut changed = self.selected_nodes.handle_interaction(node, additive);
        if !additive {
            changed |= self.selected_edges.clear();
        }
        if changed {
            self.notify_selection_changed();
        }
        changed
    }

    /// Click on an edge. Without `additive` everything else is deselected.
    pub fn select_edge(&mut self, id: EdgeId, additive: bool) -> bool {
        if self.edge(id).is_none() {
            return false;
        }
        let mut changed = self.selected_edges.handle_interaction(id, additive);
        if !additive {
            changed |= self.selected_nodes.clear();
        }
        if changed {
            self.notify_selection_changed();
        }
        changed
    }

    pub fn set_node_selected(&mut self, node: NodeId, selected: bool) -> bool {
        let changed = self.items.contains_key(&node) && self.selected_nodes.set(node, selected);
        if changed {
            self.notify_selection_changed();
        }
        changed
    }

    pub fn set_edge_selected(&mut self, id: EdgeId, selected: bool) -> bool {
        let changed = self.edge(id).is_some() && self.selected_edges.set(id, selected);
        if changed {
            self.notify_selection_changed();
        }
        changed
    }

    /// Select every item and every edge.
    pub fn select_all(&mut self) {
        let nodes: Vec<NodeId> = self.items.keys().copied().collect();
        let edges: Vec<EdgeId> = self.edges.iter().map(ViewEdge::id).collect();
        let changed = self.selected_nodes.extend(nodes) | self.selected_edges.extend(edges);
        if changed {
            self.notify_selection_changed();
        }
    }

    pub fn deselect_all(&mut self) {
        let changed = self.selected_nodes.clear() | self.selected_edges.clear();
        if changed {
            self.notify_selection_changed();
        }
    }

    /// Deselect `nodes` and every edge touching them ahead of their removal,
    /// so the removal reports at most one selection change.
    fn flush_selection(&mut self, nodes: &[NodeId]) -> bool {
        let edges = &self.edges;
        let nodes_changed = self.selected_nodes.retain(|id| !nodes.contains(id));
        let edges_changed = self.selected_edges.retain(|id| {
            !edges
                .iter()
                .any(|e| e.id() == *id && nodes.iter().any(|&n| e.touches(n)))
        });
        nodes_changed | edges_changed
    }

    /// Rubber-band selection: items intersecting `rect` and edges with an end inside it.
    pub fn select_in_rect(&mut self, rect: Rect, additive: bool) -> bool {
        let nodes = self.items_in_rect(rect);
        let edges: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|e| rect.contains(e.start()) || rect.contains(e.end()))
            .map(ViewEdge::id)
            .collect();

        let changed = if additive {
            self.selected_nodes.extend(nodes) | self.selected_edges.extend(edges)
        } else {
            self.selected_nodes.replace(nodes) | self.selected_edges.replace(edges)
        };
        if changed {
            self.notify_selection_changed();
        }
        changed
    }

    pub fn selected_nodes(&self) -> Vec<NodeId> {
        self.items
            .keys()
            .filter(|&&id| self.selected_nodes.contains(id))
            .copied()
            .collect()
    }

    pub fn selected_items(&self) -> Vec<&ViewItem> {
        self.items
            .iter()
            .filter(|(&id, _)| self.selected_nodes.contains(id))
            .map(|(_, item)| item)
            .collect()
    }

    pub fn selected_edges(&self) -> Vec<&ViewEdge> {
        self.edges
            .iter()
            .filter(|e| self.selected_edges.contains(e.id()))
            .collect()
    }

    /// Mirror the selected node IDs into a Slint model.
    pub fn sync_selection_to_model(&self, model: &VecModel<i32>) {
        self.selected_nodes.sync_to_model(model);
    }

    /// Mirror the selected edge IDs into a Slint model.
    pub fn sync_edge_selection_to_model(&self, model: &VecModel<i32>) {
        self.selected_edges.sync_to_model(model);
    }

    /// Take over a node selection made on the Slint side.
    pub fn sync_selection_from_model(&mut self, model: &dyn Model<Data = i32>) -> bool {
        let items = &self.items;
        let ids: Vec<NodeId> = (0..model.row_count())
            .filter_map(|row| model.row_data(row))
            .filter(|id| items.contains_key(id))
            .collect();
        let changed = self.selected_nodes.replace(ids);
        if changed {
            self.notify_selection_changed();
        }
        changed
    }

    // === Bulk ===

    /// Destroy every item, edge and context group.
    ///
    /// The selection is emptied first so teardown itself never reports a
    /// selection change.
    pub fn clear(&mut self) {
        self.deselect_all();

        self.edges.clear();
        self.items.clear();
        self.contexts.clear();
        self.stacking.clear();
        debug!("Scene cleared");
    }

    // === Weight ===

    /// Layout weight of `node`.
    ///
    /// `weight(n) = max(1, Σ weight(d))` over the immediate dependencies `d` of
    /// `n` that reach `n` by exactly one route. Route counts are taken relative
    /// to `n` only, so shared structure deeper in wide graphs may still be
    /// counted more than once. Not memoized; the graph must be acyclic.
    pub fn determine_weight<M>(&self, model: &M, node: NodeId) -> usize
    where
        M: GraphModel + ?Sized,
    {
        determine_weight(model, node)
    }
}

fn determine_weight<M>(model: &M, node: NodeId) -> usize
where
    M: GraphModel + ?Sized,
{
    let weight: usize = model
        .immediate_dependencies(node)
        .into_iter()
        .filter(|&dep| model.number_of_routes(dep, node) == 1)
        .map(|dep| determine_weight(model, dep))
        .sum();
    weight.max(1)
}
