//! Boundary to the underlying graph/document model.
//!
//! The view layer never owns node semantics. Everything it needs to know about
//! a node (its connectable inputs, its dependencies, its appearance) is asked
//! through [`GraphModel`]. [`SimpleGraph`] is a small in-memory implementation
//! for prototyping and tests.

use std::collections::HashMap;

use slint::{Color, SharedString};

use crate::geometry::Point;

/// Opaque node identity. The host chooses the encoding.
pub type NodeId = i32;

/// One connectable input slot: `(target node, input name, array element)`.
///
/// `element` is `None` for the input as a whole and `Some(i)` for one element
/// of an array-like input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputRef {
    pub node: NodeId,
    pub input: String,
    pub element: Option<usize>,
}

impl InputRef {
    pub fn new(node: NodeId, input: impl Into<String>) -> Self {
        Self {
            node,
            input: input.into(),
            element: None,
        }
    }

    pub fn element(node: NodeId, input: impl Into<String>, element: usize) -> Self {
        Self {
            node,
            input: input.into(),
            element: Some(element),
        }
    }
}

/// Queries the view layer makes against the graph model.
///
/// # Example
///
/// ```ignore
/// impl GraphModel for MyDocument {
///     fn inputs(&self, node: NodeId) -> Vec<String> { self.node(node).input_ids() }
///     fn immediate_dependencies(&self, node: NodeId) -> Vec<NodeId> { self.node(node).deps() }
///     fn number_of_routes(&self, from: NodeId, to: NodeId) -> usize { self.routes(from, to) }
///     fn context_positions(&self, ctx: NodeId) -> Vec<(NodeId, Point)> { self.positions(ctx) }
/// }
/// ```
pub trait GraphModel {
    /// Declared inputs of `node`, in declaration order.
    fn inputs(&self, node: NodeId) -> Vec<String>;

    /// Whether `input` of `node` accepts connections (default: all do).
    fn is_input_connectable(&self, _node: NodeId, _input: &str) -> bool {
        true
    }

    /// Nodes whose outputs feed directly into `node`.
    fn immediate_dependencies(&self, node: NodeId) -> Vec<NodeId>;

    /// Number of distinct dependency routes leading from `from` to `to`.
    fn number_of_routes(&self, from: NodeId, to: NodeId) -> usize;

    /// Node-space positions of the nodes belonging to the subgraph of `context`.
    fn context_positions(&self, context: NodeId) -> Vec<(NodeId, Point)>;

    /// User-visible label (empty if the user never named the node).
    fn label(&self, _node: NodeId) -> SharedString {
        SharedString::default()
    }

    /// Short type name of the node.
    fn short_name(&self, _node: NodeId) -> SharedString {
        SharedString::default()
    }

    /// Title bar color.
    fn color(&self, _node: NodeId) -> Color {
        Color::from_rgb_u8(128, 128, 128)
    }
}

#[derive(Clone, Debug)]
struct SimpleNode {
    short_name: SharedString,
    label: SharedString,
    color: Color,
    /// `(name, connectable)`
    inputs: Vec<(String, bool)>,
}

/// In-memory [`GraphModel`].
///
/// Parallel connections between the same pair of nodes count as a single
/// dependency and a single route.
#[derive(Clone, Debug, Default)]
pub struct SimpleGraph {
    nodes: HashMap<NodeId, SimpleNode>,
    connections: Vec<(NodeId, InputRef)>,
    contexts: HashMap<NodeId, Vec<(NodeId, Point)>>,
}

impl SimpleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a node without inputs.
    pub fn add_node(&mut self, id: NodeId, short_name: &str) {
        self.nodes.insert(
            id,
            SimpleNode {
                short_name: short_name.into(),
                label: SharedString::default(),
                color: Color::from_rgb_u8(128, 128, 128),
                inputs: Vec::new(),
            },
        );
    }

    /// Declare an input on `node`. Unknown nodes are ignored.
    pub fn add_input(&mut self, node: NodeId, name: &str, connectable: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.inputs.push((name.to_owned(), connectable));
        }
    }

    pub fn set_label(&mut self, node: NodeId, label: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.label = label.into();
        }
    }

    pub fn set_color(&mut self, node: NodeId, color: Color) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.color = color;
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Connect `output` to `input`. Connecting the same pair twice is a no-op.
    pub fn connect(&mut self, output: NodeId, input: InputRef) {
        if !self.is_connected(output, &input) {
            self.connections.push((output, input));
        }
    }

    pub fn disconnect(&mut self, output: NodeId, input: &InputRef) {
        self.connections.retain(|(o, i)| !(*o == output && i == input));
    }

    pub fn is_connected(&self, output: NodeId, input: &InputRef) -> bool {
        self.connections.iter().any(|(o, i)| *o == output && i == input)
    }

    /// All connections in the order they were made.
    pub fn connections(&self) -> &[(NodeId, InputRef)] {
        &self.connections
    }

    /// Record `child` as part of the subgraph of `context` at a node-space position.
    pub fn set_context_position(&mut self, context: NodeId, child: NodeId, pos: Point) {
        let children = self.contexts.entry(context).or_default();
        match children.iter_mut().find(|(id, _)| *id == child) {
            Some(entry) => entry.1 = pos,
            None => children.push((child, pos)),
        }
    }

    pub fn remove_from_context(&mut self, context: NodeId, child: NodeId) {
        if let Some(children) = self.contexts.get_mut(&context) {
            children.retain(|(id, _)| *id != child);
        }
    }
}

impl GraphModel for SimpleGraph {
    fn inputs(&self, node: NodeId) -> Vec<String> {
        self.nodes
            .get(&node)
            .map(|n| n.inputs.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }

    fn is_input_connectable(&self, node: NodeId, input: &str) -> bool {
        self.nodes
            .get(&node)
            .and_then(|n| n.inputs.iter().find(|(name, _)| name == input))
            .map(|(_, connectable)| *connectable)
            .unwrap_or(false)
    }

    fn immediate_dependencies(&self, node: NodeId) -> Vec<NodeId> {
        let mut deps = Vec::new();
        for (output, input) in &self.connections {
            if input.node == node && !deps.contains(output) {
                deps.push(*output);
            }
        }
        deps
    }

    fn number_of_routes(&self, from: NodeId, to: NodeId) -> usize {
        if from == to {
            return 1;
        }
        self.immediate_dependencies(to)
            .into_iter()
            .map(|dep| self.number_of_routes(from, dep))
            .sum()
    }

    fn context_positions(&self, context: NodeId) -> Vec<(NodeId, Point)> {
        self.contexts.get(&context).cloned().unwrap_or_default()
    }

    fn label(&self, node: NodeId) -> SharedString {
        self.nodes.get(&node).map(|n| n.label.clone()).unwrap_or_default()
    }

    fn short_name(&self, node: NodeId) -> SharedString {
        self.nodes
            .get(&node)
            .map(|n| n.short_name.clone())
            .unwrap_or_default()
    }

    fn color(&self, node: NodeId) -> Color {
        self.nodes
            .get(&node)
            .map(|n| n.color)
            .unwrap_or(Color::from_rgb_u8(128, 128, 128))
    }
}
