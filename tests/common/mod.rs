//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use slint_node_view::{
    InputRef, ItemMetrics, NodeId, NodeViewScene, Point, SceneConfig, SimpleGraph,
};

/// Context node used by the fixtures.
pub const PROJECT: NodeId = 100;

/// Counts selection-changed notifications.
#[derive(Default, Clone)]
pub struct SelectionCounter {
    count: Rc<Cell<usize>>,
}

impl SelectionCounter {
    pub fn attach(scene: &mut NodeViewScene) -> Self {
        let counter = Self::default();
        let count = counter.count.clone();
        scene.on_selection_changed(move || count.set(count.get() + 1));
        counter
    }

    pub fn get(&self) -> usize {
        self.count.get()
    }
}

/// Scene with 100x30 items so screen coordinates are easy to derive by hand.
pub fn scene() -> NodeViewScene {
    NodeViewScene::new(SceneConfig {
        metrics: ItemMetrics::with_item_size(100.0, 30.0),
        ..SceneConfig::default()
    })
}

/// Compositing pipeline inside [`PROJECT`]:
///
/// ```text
/// 1 Media ──> 2 Blur.in ──> 4 Merge.mask
/// 1 Media ──> 3 Grade.in ─> 4 Merge.base
/// ```
///
/// Merge also has an unconnectable `amount` input.
pub fn pipeline() -> SimpleGraph {
    let mut g = SimpleGraph::new();
    g.add_node(1, "Media");
    g.add_node(2, "Blur");
    g.add_input(2, "in", true);
    g.add_node(3, "Grade");
    g.add_input(3, "in", true);
    g.add_node(4, "Merge");
    g.add_input(4, "base", true);
    g.add_input(4, "mask", true);
    g.add_input(4, "amount", false);
    g.add_input(4, "overlay", true);

    g.connect(1, InputRef::new(2, "in"));
    g.connect(1, InputRef::new(3, "in"));
    g.connect(2, InputRef::new(4, "mask"));
    g.connect(3, InputRef::new(4, "base"));

    g.set_context_position(PROJECT, 1, Point::new(0.0, 0.0));
    g.set_context_position(PROJECT, 2, Point::new(1.0, 0.0));
    g.set_context_position(PROJECT, 3, Point::new(1.0, 1.0));
    g.set_context_position(PROJECT, 4, Point::new(2.0, 0.0));
    g
}

/// Materialize [`pipeline`] as a context with all its edges.
pub fn populated_scene(graph: &SimpleGraph) -> NodeViewScene {
    let mut s = scene();
    s.add_context(PROJECT, graph);
    for (output, input) in graph.connections() {
        s.add_edge(*output, input.clone())
            .expect("pipeline endpoints have items");
    }
    s
}

/// Assert every item only lists live edges and every edge has live endpoints.
pub fn assert_no_dangling(scene: &NodeViewScene) {
    for item in scene.items() {
        for id in item.edges() {
            assert!(scene.edge(*id).is_some(), "item {:?} lists dead edge {id}", item.node());
        }
    }
    for edge in scene.edges() {
        assert!(scene.item(edge.output()).is_some(), "edge {} lost its output", edge.id());
        assert!(scene.item(edge.input().node).is_some(), "edge {} lost its input", edge.id());
        assert!(scene.item(edge.output()).is_some_and(|i| i.edges().contains(&edge.id())));
        assert!(scene.item(edge.input().node).is_some_and(|i| i.edges().contains(&edge.id())));
    }
}
