//! Visual connection between an output node and one input slot.

use crate::geometry::Point;
use crate::item::ViewItem;
use crate::model::{InputRef, NodeId};
use crate::path::{distance_to_bezier, generate_flow_path, CubicBezier};
use crate::transform::FlowDirection;

/// Handle of a [`ViewEdge`] inside a scene. Unique among live edges; the
/// allocator wraps around and skips IDs still in use.
pub type EdgeId = i32;

/// Number of polyline samples used when hit-testing curved edges.
const HIT_SAMPLES: usize = 20;

/// One edge, identified by `(output, input)`.
///
/// The edge does not hold its endpoint items; the scene passes them to
/// [`adjust`](Self::adjust) whenever either end moves.
#[derive(Debug, Clone)]
pub struct ViewEdge {
    id: EdgeId,
    output: NodeId,
    input: InputRef,
    direction: FlowDirection,
    curved: bool,
    bezier_min_offset: f32,
    start: Point,
    end: Point,
    path: String,
}

impl ViewEdge {
    pub fn new(id: EdgeId, output: NodeId, input: InputRef, bezier_min_offset: f32) -> Self {
        Self {
            id,
            output,
            input,
            direction: FlowDirection::LeftToRight,
            curved: true,
            bezier_min_offset,
            start: Point::default(),
            end: Point::default(),
            path: String::new(),
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Node whose output this edge starts from.
    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Input slot this edge feeds.
    pub fn input(&self) -> &InputRef {
        &self.input
    }

    pub fn connects(&self, output: NodeId, input: &InputRef) -> bool {
        self.output == output && self.input == *input
    }

    /// Whether `node` is either endpoint.
    pub fn touches(&self, node: NodeId) -> bool {
        self.output == node || self.input.node == node
    }

    /// Recompute the endpoints from the items' current anchors.
    pub fn adjust(&mut self, from: &ViewItem, to: &ViewItem) {
        self.start = from.output_anchor();
        self.end = to.input_anchor(&self.input.input, self.input.element, self.start);
        self.rebuild_path();
    }

    pub fn flow_direction(&self) -> FlowDirection {
        self.direction
    }

    pub fn set_flow_direction(&mut self, direction: FlowDirection) {
        self.direction = direction;
        self.rebuild_path();
    }

    pub fn is_curved(&self) -> bool {
        self.curved
    }

    /// Rendering hint only: the endpoints stay where they are.
    pub fn set_curved(&mut self, curved: bool) {
        self.curved = curved;
        self.rebuild_path();
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// SVG path commands for a Slint `Path` element.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Shortest distance from `point` to the rendered path.
    pub fn distance_to(&self, point: Point) -> f32 {
        distance_to_bezier(point.to_tuple(), &self.curve(), HIT_SAMPLES)
    }

    fn curve(&self) -> CubicBezier {
        if self.curved {
            CubicBezier::from_endpoints(
                self.start.to_tuple(),
                self.end.to_tuple(),
                self.direction.forward().to_tuple(),
                self.bezier_min_offset,
            )
        } else {
            CubicBezier::line(self.start.to_tuple(), self.end.to_tuple())
        }
    }

    fn rebuild_path(&mut self) {
        self.path = generate_flow_path(
            self.start.to_tuple(),
            self.end.to_tuple(),
            self.direction.forward().to_tuple(),
            self.curved,
            self.bezier_min_offset,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ItemMetrics;
    use crate::model::SimpleGraph;

    fn items() -> (ViewItem, ViewItem) {
        let mut g = SimpleGraph::new();
        g.add_node(1, "Source");
        g.add_node(2, "Sink");
        g.add_input(2, "in", true);
        g.add_input(2, "mask", true);

        let metrics = ItemMetrics::with_item_size(100.0, 30.0);
        let mut from = ViewItem::new(metrics);
        from.set_node(Some(1), &g);
        from.set_node_position(Point::new(0.0, 0.0));
        let mut to = ViewItem::new(metrics);
        to.set_node(Some(2), &g);
        to.set_node_position(Point::new(2.0, 0.0));
        (from, to)
    }

    #[test]
    fn test_identity() {
        let edge = ViewEdge::new(3, 1, InputRef::new(2, "in"), 50.0);
        assert!(edge.connects(1, &InputRef::new(2, "in")));
        assert!(!edge.connects(1, &InputRef::new(2, "mask")));
        assert!(edge.touches(1));
        assert!(edge.touches(2));
        assert!(!edge.touches(3));
    }

    #[test]
    fn test_adjust_uses_anchors() {
        let (from, to) = items();
        let mut edge = ViewEdge::new(1, 1, InputRef::new(2, "in"), 50.0);
        edge.adjust(&from, &to);

        assert_eq!(edge.start(), from.output_anchor());
        assert_eq!(edge.end(), to.input_anchor("in", None, edge.start()));
        assert!(edge.path().starts_with("M "));
        assert!(edge.path().contains(" C "));
    }

    #[test]
    fn test_adjust_follows_expanded_slot() {
        let (from, mut to) = items();
        let mut edge = ViewEdge::new(1, 1, InputRef::new(2, "mask"), 50.0);
        edge.adjust(&from, &to);
        let collapsed_end = edge.end();

        to.set_expanded(true, false);
        edge.adjust(&from, &to);

        assert_ne!(edge.end(), collapsed_end);
        assert_eq!(edge.end().y, to.pos().y + 60.0);
    }

    #[test]
    fn test_set_curved_keeps_endpoints() {
        let (from, to) = items();
        let mut edge = ViewEdge::new(1, 1, InputRef::new(2, "in"), 50.0);
        edge.adjust(&from, &to);
        let (start, end) = (edge.start(), edge.end());

        edge.set_curved(false);

        assert!(!edge.is_curved());
        assert_eq!((edge.start(), edge.end()), (start, end));
        assert!(edge.path().contains(" L "));
    }

    #[test]
    fn test_distance_to_straight_edge() {
        let (from, to) = items();
        let mut edge = ViewEdge::new(1, 1, InputRef::new(2, "in"), 50.0);
        edge.set_curved(false);
        edge.adjust(&from, &to);

        let mid = Point::new((edge.start().x + edge.end().x) / 2.0, edge.start().y);
        assert!(edge.distance_to(mid) < 0.01);
        assert!((edge.distance_to(Point::new(mid.x, mid.y + 25.0)) - 25.0).abs() < 0.01);
    }
}
