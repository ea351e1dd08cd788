//! Stage errors
//!
//! Every variant is a precondition violation. Nothing here is retried: a stage
//! whose scene failed to build is unusable.

use thiserror::Error;

use crate::physics::BodyId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StageError {
    #[error("scene has not been built yet")]
    SceneNotBuilt,

    #[error("scene is already built")]
    SceneAlreadyBuilt,

    #[error("body {0:?} is not in the physics world")]
    UnknownBody(BodyId),

    #[error("viewport must be positive, got {width}x{height}")]
    NonPositiveViewport { width: u32, height: u32 },

    #[error("host is missing {0}")]
    MissingHost(&'static str),

    #[error("DOM operation failed: {0}")]
    Dom(String),
}
