// crates/engine_core/src/lib.rs
//! Simulation core for a tile-based side-scroller: objects and their
//! components, collision, camera, draw queues and level loading.

pub mod camera;
pub mod components;
pub mod config;
pub mod engine_loop;
pub mod error;
pub mod events;
pub mod level;
pub mod logging;
pub mod object;
pub mod registry;
pub mod render;
pub mod simulation;
pub mod time;

pub use camera::{CameraSystem, CameraTarget};
pub use config::EngineConfig;
pub use engine_loop::EngineLoop;
pub use error::EngineError;
pub use level::{LevelSystem, ObjectFactory};
pub use object::{GameComponent, GameObject, GameObjectManager, Phase};
pub use registry::{PlayerSnapshot, SoundSink, SystemRegistry};
pub use simulation::Simulation;
