//! Level 2: Edge Tests
//!
//! Tests edge identity, attachment to endpoint items and re-routing.

mod common;

use common::{assert_no_dangling, pipeline, populated_scene, scene};
use slint_node_view::{InputRef, Point, SceneError, SimpleGraph};

#[test]
fn test_pipeline_edges_created_once_each() {
    let graph = pipeline();
    let scene = populated_scene(&graph);
    assert_eq!(scene.edges().len(), 4);
    assert_no_dangling(&scene);
}

#[test]
fn test_add_edge_is_idempotent() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);
    let first = scene.add_edge(2, InputRef::new(4, "mask")).unwrap();
    let second = scene.add_edge(2, InputRef::new(4, "mask")).unwrap();

    assert_eq!(first, second);
    assert_eq!(scene.edges().len(), 4);
    assert_eq!(
        scene.item(4).unwrap().edges().iter().filter(|&&e| e == first).count(),
        1
    );
}

#[test]
fn test_same_nodes_different_inputs_are_distinct_edges() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);
    let mask = scene.add_edge(2, InputRef::new(4, "mask")).unwrap();
    let overlay = scene.add_edge(2, InputRef::new(4, "overlay")).unwrap();
    let element = scene.add_edge(2, InputRef::element(4, "overlay", 1)).unwrap();

    assert_ne!(mask, overlay);
    assert_ne!(overlay, element);
    assert_eq!(scene.edges().len(), 6);
}

#[test]
fn test_remove_edge_detaches_from_both_endpoints() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);
    let input = InputRef::new(4, "base");
    let id = scene.edge_between(3, &input).unwrap().id();

    assert!(scene.remove_edge(3, &input));

    assert!(scene.edge(id).is_none());
    assert!(!scene.item(3).unwrap().edges().contains(&id));
    assert!(!scene.item(4).unwrap().edges().contains(&id));
    assert_no_dangling(&scene);
}

#[test]
fn test_remove_missing_edge_is_noop() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);
    assert!(!scene.remove_edge(1, &InputRef::new(4, "base")));
    assert_eq!(scene.edges().len(), 4);
}

#[test]
fn test_remove_item_takes_its_edges() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);

    assert!(scene.remove_item(1));

    assert_eq!(scene.edges().len(), 2);
    assert!(scene.edges().iter().all(|e| !e.touches(1)));
    assert_no_dangling(&scene);
}

#[test]
fn test_add_edge_without_endpoint_item() {
    let mut graph = SimpleGraph::new();
    graph.add_node(1, "Media");
    let mut scene = scene();
    scene.add_item(1, &graph);

    let result = scene.add_edge(1, InputRef::new(7, "in"));

    assert_eq!(result, Err(SceneError::ItemNotFound(7)));
    assert!(scene.edges().is_empty());
    assert!(scene.item(1).unwrap().edges().is_empty());
}

#[test]
fn test_edge_follows_expanded_slot() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);
    let input = InputRef::new(4, "overlay");
    scene.add_edge(2, input.clone()).unwrap();
    let collapsed_end = scene.edge_between(2, &input).unwrap().end();

    scene.set_expanded(4, true, false);

    let end = scene.edge_between(2, &input).unwrap().end();
    let merge = scene.item(4).unwrap();
    assert_ne!(end, collapsed_end);
    // Third slot, left edge: title bar plus two slots below the origin.
    assert_eq!(end, Point::new(merge.pos().x - 50.0, merge.pos().y + 90.0));
}

#[test]
fn test_collapsed_item_shares_input_anchor() {
    let graph = pipeline();
    let scene = populated_scene(&graph);
    let base = scene.edge_between(3, &InputRef::new(4, "base")).unwrap().end();
    let mask = scene.edge_between(2, &InputRef::new(4, "mask")).unwrap().end();
    assert_eq!(base, mask);
}

#[test]
fn test_moving_node_reroutes_edges() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);

    scene.set_node_position(1, Point::new(0.0, 2.0));

    let start = scene.edge_between(1, &InputRef::new(2, "in")).unwrap().start();
    assert_eq!(start, scene.item(1).unwrap().output_anchor());
    assert_eq!(start.y, 90.0);
}

#[test]
fn test_straight_edges_and_hit_test() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);
    scene.set_edges_curved(false);

    let edge = scene.edge_between(1, &InputRef::new(2, "in")).unwrap();
    assert!(edge.path().contains(" L "));
    let id = edge.id();
    let mid = Point::new((edge.start().x + edge.end().x) / 2.0, edge.start().y);

    assert_eq!(scene.edge_at(mid, 3.0), Some(id));
    scene.select_edge(id, false);
    assert_eq!(scene.selected_edges().len(), 1);
}
