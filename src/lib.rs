//! # Slint Node View
//!
//! The visual graph layer of a node-based editor, built for Slint front ends.
//! It keeps a live registry of node items, edges and context groups, maps each
//! node's abstract node-space position to the screen according to a
//! configurable flow direction, and computes a per-node dependency weight for
//! layout decisions.
//!
//! ## Features
//!
//! - **Four flow directions** - Left-to-right, right-to-left, top-to-bottom and
//!   bottom-to-top, with exact round-trips between node-space and screen space
//! - **Expandable items** - Collapsed items show a single input connector;
//!   expanded items show one slot per connectable input
//! - **Context groups** - Subgraph containers whose bounds follow their children
//! - **Trait-based model** - The host graph plugs in through [`GraphModel`];
//!   [`SimpleGraph`] is provided for prototypes and tests
//! - **Slint-ready output** - Edge paths are SVG commands for a Slint `Path`,
//!   selections sync into `VecModel<i32>`
//!
//! ## Quick Start
//!
//! ```ignore
//! use slint_node_view::{InputRef, NodeViewScene, SceneConfig, SimpleGraph};
//!
//! let mut graph = SimpleGraph::new();
//! graph.add_node(1, "Media");
//! graph.add_node(2, "Blur");
//! graph.add_input(2, "in", true);
//! graph.connect(1, InputRef::new(2, "in"));
//!
//! let mut scene = NodeViewScene::new(SceneConfig::default());
//! scene.add_item(1, &graph);
//! scene.add_item(2, &graph);
//! scene.add_edge(1, InputRef::new(2, "in"))?;
//!
//! for edge in scene.edges() {
//!     println!("{}", edge.path());
//! }
//! ```
//!
//! ## Core Types
//!
//! - [`NodeViewScene`] - Owns all items, edges and contexts
//! - [`ViewItem`] - One node's on-screen box
//! - [`ViewEdge`] - One connection into an input slot
//! - [`ContextGroup`] - A subgraph container
//! - [`FlowDirection`] with [`node_to_screen`] / [`screen_to_node`]

pub mod config;
pub mod context;
pub mod edge;
pub mod error;
pub mod geometry;
pub mod item;
pub mod model;
pub mod path;
pub mod scene;
pub mod selection;
pub mod transform;

#[cfg(feature = "layout")]
pub mod layout;

pub use config::{ItemMetrics, SceneConfig, REFERENCE_TEXT};
pub use context::ContextGroup;
pub use edge::{EdgeId, ViewEdge};
pub use error::SceneError;
pub use geometry::{Point, Rect, Size};
pub use item::{Appearance, Connector, ViewItem};
pub use model::{GraphModel, InputRef, NodeId, SimpleGraph};
pub use path::{distance_to_bezier, generate_flow_path, CubicBezier};
pub use scene::{NodeViewScene, SceneEntry};
pub use selection::SelectionSet;
pub use transform::{
    horizontal_padding, node_to_screen, screen_to_node, vertical_padding, FlowDirection,
    Orientation,
};

#[cfg(feature = "layout")]
pub use layout::{dependency_edges, sugiyama_node_positions, SugiyamaConfig};
