// crates/engine_core/src/components/mod.rs
//! Components every game built on the engine gets for free.

mod background_collision;
mod life;
mod lifetime;
mod movement;
mod moving_platform;
mod sprite;

pub use background_collision::BackgroundCollisionComponent;
pub use life::LifeComponent;
pub use lifetime::LifetimeComponent;
pub use movement::MovementComponent;
pub use moving_platform::MovingPlatformComponent;
pub use sprite::{Animation, SpriteComponent};
