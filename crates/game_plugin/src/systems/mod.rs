// crates/game_plugin/src/systems/mod.rs
pub mod camera;
pub mod enemy;
pub mod pickup;
pub mod player;

pub use camera::CameraFocusTrigger;
pub use enemy::{ContactDamageComponent, PatrolComponent};
pub use pickup::PickupComponent;
pub use player::PlayerControllerComponent;
