//! Level 3: Context Group Tests
//!
//! Tests context materialization, bounding rectangles and teardown.

mod common;

use common::{assert_no_dangling, pipeline, populated_scene, scene, PROJECT};
use slint_node_view::{Point, Rect, SceneEntry, SimpleGraph};

#[test]
fn test_context_encloses_children() {
    let graph = pipeline();
    let scene = populated_scene(&graph);
    let ctx = scene.context(PROJECT).unwrap();

    assert_eq!(ctx.children(), [1, 2, 3, 4]);
    assert_eq!(ctx.rect(), Rect::new(-50.0, -15.0, 400.0, 75.0));
    for &child in ctx.children() {
        let r = scene.item(child).unwrap().scene_rect();
        assert_eq!(ctx.rect().united(&r), ctx.rect());
        assert_eq!(scene.item(child).unwrap().context(), Some(PROJECT));
    }
}

#[test]
fn test_add_context_is_idempotent() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);
    scene.set_node_position(1, Point::new(-1.0, 0.0));

    let ctx = scene.add_context(PROJECT, &graph);

    assert_eq!(ctx.children().len(), 4);
    assert_eq!(scene.contexts().count(), 1);
    assert_eq!(scene.node_position(1), Some(Point::new(-1.0, 0.0)));
}

#[test]
fn test_expanding_child_grows_context() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);

    scene.set_expanded(4, true, false);

    let rect = scene.context(PROJECT).unwrap().rect();
    assert_eq!(rect.bottom(), 105.0);
    assert_eq!(rect.united(&scene.item(4).unwrap().scene_rect()), rect);

    scene.set_expanded(4, false, false);
    assert_eq!(
        scene.context(PROJECT).unwrap().rect(),
        Rect::new(-50.0, -15.0, 400.0, 75.0)
    );
}

#[test]
fn test_dragging_child_updates_context() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);
    scene.select_node(4, false);

    scene.drag_selected(Point::new(100.0, 0.0));

    assert_eq!(scene.context(PROJECT).unwrap().rect().right(), 450.0);
}

#[test]
fn test_remove_item_shrinks_context() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);

    scene.remove_item(4);

    let ctx = scene.context(PROJECT).unwrap();
    assert!(!ctx.contains(4));
    assert_eq!(ctx.rect().right(), 200.0);
    assert_no_dangling(&scene);
}

#[test]
fn test_remove_context_destroys_children() {
    let graph = pipeline();
    let mut scene = populated_scene(&graph);

    assert!(scene.remove_context(PROJECT));

    assert!(scene.context(PROJECT).is_none());
    assert_eq!(scene.item_count(), 0);
    assert!(scene.edges().is_empty());
    assert!(!scene.remove_context(PROJECT));
}

#[test]
fn test_child_moves_between_contexts() {
    let mut graph = pipeline();
    graph.set_context_position(200, 4, Point::new(5.0, 0.0));
    let mut scene = populated_scene(&graph);

    scene.add_context(200, &graph);

    assert!(!scene.context(PROJECT).unwrap().contains(4));
    assert!(scene.context(200).unwrap().contains(4));
    assert_eq!(scene.item(4).unwrap().context(), Some(200));
    assert_eq!(scene.context(PROJECT).unwrap().rect().right(), 200.0);
    assert_eq!(scene.node_position(4), Some(Point::new(5.0, 0.0)));
}

#[test]
fn test_empty_context_has_empty_rect() {
    let graph = SimpleGraph::new();
    let mut scene = scene();
    let ctx = scene.add_context(7, &graph);
    assert!(ctx.children().is_empty());
    assert!(ctx.rect().is_empty());
}

#[test]
fn test_context_edges_routed_on_creation() {
    let graph = pipeline();
    let scene = populated_scene(&graph);
    for edge in scene.edges() {
        let from = scene.item(edge.output()).unwrap();
        assert_eq!(edge.start(), from.output_anchor());
    }
}

#[test]
fn test_entry_distinguishes_items_and_contexts() {
    let graph = pipeline();
    let scene = populated_scene(&graph);

    match scene.entry(PROJECT) {
        Some(SceneEntry::Context(ctx)) => assert_eq!(ctx.node(), PROJECT),
        _ => panic!("expected a context entry"),
    }
    match scene.entry(2) {
        Some(SceneEntry::Item(item)) => assert_eq!(item.node(), Some(2)),
        _ => panic!("expected an item entry"),
    }
    // Between item 1 and item 2: inside the context, outside every item.
    let gap = scene.entry_at(Point::new(75.0, 0.0)).unwrap();
    assert!(matches!(gap, SceneEntry::Context(_)));
    assert_eq!(gap.rect(), scene.context(PROJECT).unwrap().rect());
}
