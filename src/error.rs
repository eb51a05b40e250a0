use thiserror::Error;

use crate::model::NodeId;

/// Contract violations the scene reports instead of leaving dangling state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// An edge endpoint has no visual item in the scene.
    #[error("node {0} has no visual item in the scene")]
    ItemNotFound(NodeId),
}
