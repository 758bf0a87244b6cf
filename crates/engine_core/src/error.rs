// crates/engine_core/src/error.rs

use std::path::PathBuf;

use engine_ecs::EcsError;
use engine_physics::PhysicsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid level: {0}")]
    InvalidLevel(String),

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Ecs(#[from] EcsError),
}
