// crates/engine_core/src/object/mod.rs
//! The object model: actors, the components that drive them, and the manager
//! that owns both.

mod component;
mod game_object;
mod manager;

pub use component::{ComponentPool, GameComponent, Phase};
pub use game_object::GameObject;
pub use manager::GameObjectManager;
