// crates/engine_ecs/src/lib.rs
//! Handles and containers the object model is built on.

mod entity;
mod storage;

pub use entity::Entity;
pub use storage::{FixedArray, ObjectPool};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// More live objects were requested than the pool was sized for. This is
    /// a content/sizing bug, not a game condition.
    #[error("object pool exhausted (capacity {capacity}); raise the pool size for this level")]
    PoolExhausted { capacity: usize },
}
