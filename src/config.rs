//! Presentation constants and scene configuration.
//!
//! The view layer never measures text itself. The host measures its UI font
//! once (width of a 16-character reference string, height of one text line)
//! and hands the result over as [`ItemMetrics`].

use serde::Deserialize;

use crate::geometry::Size;
use crate::transform::FlowDirection;

/// Reference string whose rendered width is the default item width.
pub const REFERENCE_TEXT: &str = "HHHHHHHHHHHHHHHH";

/// Size constants every item derives its geometry from.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItemMetrics {
    /// Width of a collapsed item.
    pub item_width: f32,
    /// Height of the title bar, and of each input slot when expanded.
    pub item_height: f32,
    pub text_padding: f32,
    pub border_width: f32,
    /// Edge length of the square input/output connectors.
    pub connector_size: f32,
}

impl ItemMetrics {
    /// Derive metrics from the rendered width of [`REFERENCE_TEXT`] and the
    /// font's line height.
    pub fn from_text_metrics(reference_width: f32, line_height: f32) -> Self {
        let text_padding = line_height / 4.0;
        Self {
            item_width: reference_width,
            item_height: line_height + text_padding * 2.0,
            text_padding,
            border_width: line_height / 12.0,
            connector_size: line_height / 2.0,
        }
    }

    /// Default metrics with an explicit item size.
    pub fn with_item_size(item_width: f32, item_height: f32) -> Self {
        Self {
            item_width,
            item_height,
            ..Self::default()
        }
    }

    pub fn item_size(&self) -> Size {
        Size::new(self.item_width, self.item_height)
    }

    pub fn connector(&self) -> Size {
        Size::new(self.connector_size, self.connector_size)
    }
}

impl Default for ItemMetrics {
    fn default() -> Self {
        Self::from_text_metrics(160.0, 20.0)
    }
}

/// Initial settings of a [`NodeViewScene`](crate::NodeViewScene).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub direction: FlowDirection,
    pub curved_edges: bool,
    pub metrics: ItemMetrics,
    /// Minimum bezier control point offset for curved edges.
    pub bezier_min_offset: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            direction: FlowDirection::LeftToRight,
            curved_edges: true,
            metrics: ItemMetrics::default(),
            bezier_min_offset: 50.0,
        }
    }
}
