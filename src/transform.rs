//! Node-space ⇄ screen-space mapping.
//!
//! Node positions are stored in a direction-agnostic "node-space" that always
//! flows left to right, one unit per layout slot. The functions here map those
//! positions onto the screen for a given [`FlowDirection`]: first the axes are
//! remapped (negated and/or swapped), then each axis is scaled by a padding
//! factor derived from the default item size.
//!
//! ```text
//!   LeftToRight   (x, y)   ->  ( x,  y)
//!   RightToLeft   (x, y)   ->  (-x,  y)
//!   TopToBottom   (x, y)   ->  ( y,  x)
//!   BottomToTop   (x, y)   ->  ( y, -x)
//! ```

use serde::Deserialize;

use crate::config::ItemMetrics;
use crate::geometry::Point;

/// Layout orientation of the node graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowDirection {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

/// Dominant axis of a [`FlowDirection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl FlowDirection {
    pub const ALL: [FlowDirection; 4] = [
        FlowDirection::LeftToRight,
        FlowDirection::RightToLeft,
        FlowDirection::TopToBottom,
        FlowDirection::BottomToTop,
    ];

    pub fn orientation(self) -> Orientation {
        match self {
            FlowDirection::LeftToRight | FlowDirection::RightToLeft => Orientation::Horizontal,
            FlowDirection::TopToBottom | FlowDirection::BottomToTop => Orientation::Vertical,
        }
    }

    pub fn is_horizontal(self) -> bool {
        self.orientation() == Orientation::Horizontal
    }

    /// Unit vector pointing from an output towards the inputs it feeds.
    pub fn forward(self) -> Point {
        match self {
            FlowDirection::LeftToRight => Point::new(1.0, 0.0),
            FlowDirection::RightToLeft => Point::new(-1.0, 0.0),
            FlowDirection::TopToBottom => Point::new(0.0, 1.0),
            FlowDirection::BottomToTop => Point::new(0.0, -1.0),
        }
    }
}

/// Screen distance between two horizontally adjacent node-space slots.
pub fn horizontal_padding(direction: FlowDirection, metrics: &ItemMetrics) -> f32 {
    match direction.orientation() {
        Orientation::Horizontal => metrics.item_width * 1.5,
        Orientation::Vertical => metrics.item_width * 1.25,
    }
}

/// Screen distance between two vertically adjacent node-space slots.
pub fn vertical_padding(direction: FlowDirection, metrics: &ItemMetrics) -> f32 {
    match direction.orientation() {
        Orientation::Horizontal => metrics.item_height * 1.5,
        Orientation::Vertical => metrics.item_height * 2.0,
    }
}

/// Map a node-space point to screen-space.
pub fn node_to_screen(p: Point, direction: FlowDirection, metrics: &ItemMetrics) -> Point {
    let remapped = match direction {
        FlowDirection::LeftToRight => p,
        FlowDirection::RightToLeft => Point::new(-p.x, p.y),
        FlowDirection::TopToBottom => Point::new(p.y, p.x),
        FlowDirection::BottomToTop => Point::new(p.y, -p.x),
    };

    Point::new(
        remapped.x * horizontal_padding(direction, metrics),
        remapped.y * vertical_padding(direction, metrics),
    )
}

/// Map a screen-space point back to node-space. Exact inverse of [`node_to_screen`].
pub fn screen_to_node(p: Point, direction: FlowDirection, metrics: &ItemMetrics) -> Point {
    let scaled = Point::new(
        p.x / horizontal_padding(direction, metrics),
        p.y / vertical_padding(direction, metrics),
    );

    match direction {
        FlowDirection::LeftToRight => scaled,
        FlowDirection::RightToLeft => Point::new(-scaled.x, scaled.y),
        FlowDirection::TopToBottom => Point::new(scaled.y, scaled.x),
        // Undo the swap first, then the negation that was applied after it.
        FlowDirection::BottomToTop => Point::new(-scaled.y, scaled.x),
    }
}
