//! On-screen box of a single node.
//!
//! A [`ViewItem`] keeps its node-space position as the source of truth and
//! derives its screen position through [`node_to_screen`]. The item rectangle
//! is expressed in item-local coordinates, centered on the title bar:
//!
//! ```text
//!          pos
//!   +-------x-------+   <- title bar (hidden with `hide_titlebar`)
//!   |    input 0    |
//!   |    input 1    |   <- only while expanded
//!   +---------------+
//! ```
//!
//! Items never touch edges or contexts themselves. Methods that change the
//! geometry return `true` so the owning [`NodeViewScene`](crate::NodeViewScene)
//! can re-route incident edges and refresh the context rectangle in the same call.

use slint::{Color, SharedString};

use crate::config::ItemMetrics;
use crate::edge::EdgeId;
use crate::geometry::{Point, Rect};
use crate::model::{GraphModel, NodeId};
use crate::transform::{node_to_screen, screen_to_node, FlowDirection, Orientation};

/// Square attachment point for edges, positioned in item-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Connector {
    pub pos: Point,
    pub visible: bool,
}

/// Cached presentation data pulled from the graph model.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub label: SharedString,
    pub short_name: SharedString,
    pub color: Color,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            label: SharedString::default(),
            short_name: SharedString::default(),
            color: Color::from_rgb_u8(128, 128, 128),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewItem {
    node: Option<NodeId>,
    metrics: ItemMetrics,
    title_bar_rect: Rect,
    rect: Rect,
    pos: Point,
    cached_node_pos: Point,
    dragging: bool,
    expanded: bool,
    hide_titlebar: bool,
    highlighted_index: Option<usize>,
    direction: FlowDirection,
    label_as_output: bool,
    inputs: Vec<String>,
    edges: Vec<EdgeId>,
    input_connector: Connector,
    output_connector: Connector,
    context: Option<NodeId>,
    appearance: Appearance,
    appearance_stale: bool,
}

impl ViewItem {
    /// Create an unbound, collapsed item at the node-space origin.
    pub fn new(metrics: ItemMetrics) -> Self {
        let title_bar_rect = Rect::centered(metrics.item_size());
        let mut item = Self {
            node: None,
            metrics,
            title_bar_rect,
            rect: title_bar_rect,
            pos: Point::default(),
            cached_node_pos: Point::default(),
            dragging: false,
            expanded: false,
            hide_titlebar: false,
            highlighted_index: None,
            direction: FlowDirection::LeftToRight,
            label_as_output: false,
            inputs: Vec::new(),
            edges: Vec::new(),
            input_connector: Connector::default(),
            output_connector: Connector {
                pos: Point::default(),
                visible: true,
            },
            context: None,
            appearance: Appearance::default(),
            appearance_stale: true,
        };
        item.update_connector_positions();
        item
    }

    // === Identity ===

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Bind the item to `node` and rebuild everything derived from it.
    ///
    /// The connectable-input list is re-read from the model, the highlighted
    /// index is dropped if it no longer points at an input, and an item left
    /// without inputs collapses. Returns `true` if the rectangle changed.
    pub fn set_node<M>(&mut self, node: Option<NodeId>, model: &M) -> bool
    where
        M: GraphModel + ?Sized,
    {
        let old_rect = self.rect;

        self.node = node;
        self.inputs = match node {
            Some(id) => model
                .inputs(id)
                .into_iter()
                .filter(|input| model.is_input_connectable(id, input))
                .collect(),
            None => Vec::new(),
        };

        if self.highlighted_index.is_some_and(|i| i >= self.inputs.len()) {
            self.highlighted_index = None;
        }
        if self.inputs.is_empty() {
            self.expanded = false;
        }

        self.appearance_stale = true;
        if let Some(id) = node {
            self.refresh_appearance(id, model);
        }

        self.update_rect();
        self.update_connector_positions();
        self.rect != old_rect
    }

    /// Connectable inputs in declaration order.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn input_index(&self, input: &str) -> Option<usize> {
        self.inputs.iter().position(|i| i == input)
    }

    // === Appearance ===

    /// Mark the cached label/color as out of date. Geometry is unaffected.
    pub fn mark_appearance_stale(&mut self) {
        self.appearance_stale = true;
    }

    pub fn appearance_stale(&self) -> bool {
        self.appearance_stale
    }

    /// Re-read label, short name and color from the model.
    pub fn refresh_appearance<M>(&mut self, node: NodeId, model: &M)
    where
        M: GraphModel + ?Sized,
    {
        self.appearance = Appearance {
            label: model.label(node),
            short_name: model.short_name(node),
            color: model.color(node),
        };
        self.appearance_stale = false;
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    /// Title text as `(primary, secondary)`.
    ///
    /// Output items read "Output". A labelled node shows its label with the
    /// short name underneath; an unlabelled one shows only the short name.
    pub fn display_title(&self) -> (SharedString, Option<SharedString>) {
        if self.label_as_output {
            (SharedString::from("Output"), None)
        } else if self.appearance.label.is_empty() {
            (self.appearance.short_name.clone(), None)
        } else {
            (
                self.appearance.label.clone(),
                Some(self.appearance.short_name.clone()),
            )
        }
    }

    pub fn label_as_output(&self) -> bool {
        self.label_as_output
    }

    /// Show the item as the graph's output: title reads "Output" and the
    /// output connector is hidden.
    pub fn set_label_as_output(&mut self, e: bool) {
        self.label_as_output = e;
        self.output_connector.visible = !e;
    }

    // === Expansion ===

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_titlebar_hidden(&self) -> bool {
        self.hide_titlebar
    }

    /// Expand or collapse the input list. Returns `true` if anything changed.
    ///
    /// No-op for items without connectable inputs and for calls that repeat
    /// the current state.
    pub fn set_expanded(&mut self, expand: bool, hide_titlebar: bool) -> bool {
        if self.inputs.is_empty() || (self.expanded == expand && self.hide_titlebar == hide_titlebar) {
            return false;
        }

        self.expanded = expand;
        self.hide_titlebar = hide_titlebar;
        self.update_rect();
        self.update_connector_positions();
        true
    }

    /// Flip the expansion state, keeping the title bar visible.
    pub fn toggle_expanded(&mut self) -> bool {
        self.set_expanded(!self.expanded, false)
    }

    fn update_rect(&mut self) {
        self.rect = if self.expanded {
            let slots = if self.hide_titlebar {
                self.inputs.len()
            } else {
                self.inputs.len() + 1
            };
            self.title_bar_rect
                .with_height(self.title_bar_rect.height * slots as f32)
        } else {
            self.title_bar_rect
        };
        self.input_connector.visible = !self.inputs.is_empty() && !self.expanded;
    }

    // === Highlight ===

    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted_index
    }

    /// Highlight one input slot. Out-of-range indices clear the highlight.
    /// Returns `true` if the highlight changed.
    pub fn set_highlighted_index(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&i| i < self.inputs.len());
        if self.highlighted_index == index {
            return false;
        }
        self.highlighted_index = index;
        true
    }

    // === Geometry ===

    pub fn metrics(&self) -> &ItemMetrics {
        &self.metrics
    }

    /// Item rectangle in item-local coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn title_bar_rect(&self) -> Rect {
        self.title_bar_rect
    }

    /// Item rectangle in scene coordinates.
    pub fn scene_rect(&self) -> Rect {
        self.rect.translated(self.pos)
    }

    /// Screen position of the item's origin (the title bar center).
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Rectangle of input slot `index` in item-local coordinates.
    ///
    /// Slots stack below the title bar in declaration order. While collapsed
    /// every slot maps onto the title bar.
    pub fn input_rect(&self, index: usize) -> Rect {
        let slot = if self.hide_titlebar { index } else { index + 1 };
        if self.expanded {
            self.title_bar_rect
                .translated(Point::new(0.0, self.title_bar_rect.height * slot as f32))
        } else {
            self.title_bar_rect
        }
    }

    /// Index of the input slot under `local` (item-local coordinates).
    pub fn input_slot_at(&self, local: Point) -> Option<usize> {
        (0..self.inputs.len()).find(|&i| self.input_rect(i).contains(local))
    }

    pub fn input_connector(&self) -> Connector {
        self.input_connector
    }

    pub fn output_connector(&self) -> Connector {
        self.output_connector
    }

    /// Scene point where an edge into `input` attaches.
    ///
    /// Expanded items attach to the slot of that input: left edge for
    /// left-to-right flow, right edge for right-to-left, and for vertical flows
    /// whichever side faces `source`. Collapsed items (and unknown inputs) share
    /// the single input connector. `element` does not affect placement.
    pub fn input_anchor(&self, input: &str, _element: Option<usize>, source: Point) -> Point {
        match self.input_index(input) {
            Some(index) if self.expanded => self.pos.offset(self.slot_anchor(index, source)),
            _ => self.pos.offset(self.input_connector.pos),
        }
    }

    fn slot_anchor(&self, index: usize, source: Point) -> Point {
        let r = self.input_rect(index);
        let attach_left = match self.direction.orientation() {
            Orientation::Horizontal => self.direction == FlowDirection::LeftToRight,
            Orientation::Vertical => source.x < self.pos.x,
        };
        if attach_left {
            Point::new(r.left(), r.center().y)
        } else {
            Point::new(r.right(), r.center().y)
        }
    }

    /// Scene point where outgoing edges start: the output connector pushed
    /// outward along the flow by the connector's own size.
    pub fn output_anchor(&self) -> Point {
        let forward = self.direction.forward();
        let size = self.metrics.connector_size;
        self.pos
            .offset(self.output_connector.pos)
            .offset(Point::new(forward.x * size, forward.y * size))
    }

    fn update_connector_positions(&mut self) {
        let r = self.rect;
        let size = self.metrics.connector_size;
        let (input, output) = match self.direction {
            FlowDirection::LeftToRight => (
                Point::new(r.left() - size, r.center().y),
                Point::new(r.right(), r.center().y),
            ),
            FlowDirection::RightToLeft => (
                Point::new(r.right() + size, r.center().y),
                Point::new(r.left(), r.center().y),
            ),
            FlowDirection::TopToBottom => (
                Point::new(r.center().x, r.top() - size),
                Point::new(r.center().x, r.bottom()),
            ),
            FlowDirection::BottomToTop => (
                Point::new(r.center().x, r.bottom() + size),
                Point::new(r.center().x, r.top()),
            ),
        };
        self.input_connector.pos = input;
        self.output_connector.pos = output;
    }

    // === Direction / position ===

    pub fn flow_direction(&self) -> FlowDirection {
        self.direction
    }

    /// Re-orient the connectors and re-place the item from its node-space position.
    pub fn set_flow_direction(&mut self, direction: FlowDirection) {
        self.direction = direction;
        self.update_connector_positions();
        self.update_node_position();
    }

    /// Node-space position derived from the current screen position, so it
    /// follows an in-progress drag.
    pub fn node_position(&self) -> Point {
        screen_to_node(self.pos, self.direction, &self.metrics)
    }

    pub fn set_node_position(&mut self, pos: Point) {
        self.cached_node_pos = pos;
        self.dragging = false;
        self.update_node_position();
    }

    fn update_node_position(&mut self) {
        self.pos = node_to_screen(self.cached_node_pos, self.direction, &self.metrics);
    }

    /// Move the item on screen without touching its node-space position.
    pub fn drag_by(&mut self, delta: Point) {
        self.pos = self.pos.offset(delta);
        self.dragging = true;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Convert a transient drag back into node-space.
    ///
    /// Returns the new node-space position, or `None` if the item was not
    /// being dragged.
    pub fn commit_drag(&mut self) -> Option<Point> {
        if !self.dragging {
            return None;
        }
        self.cached_node_pos = screen_to_node(self.pos, self.direction, &self.metrics);
        self.dragging = false;
        self.update_node_position();
        Some(self.cached_node_pos)
    }

    // === Incident edges ===

    /// Edges attached to this item. Owned by the scene.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub(crate) fn attach_edge(&mut self, edge: EdgeId) {
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub(crate) fn detach_edge(&mut self, edge: EdgeId) {
        self.edges.retain(|&e| e != edge);
    }

    // === Context ===

    /// Context group this item is a child of.
    pub fn context(&self) -> Option<NodeId> {
        self.context
    }

    pub(crate) fn set_context(&mut self, context: Option<NodeId>) {
        self.context = context;
    }
}
