// crates/engine_shared/src/lib.rs
//! Plain data shared by every engine crate: math, tags, the input snapshot
//! and the level manifest format.

pub mod components;
pub mod input_types;
pub mod level_format;
pub mod math;

pub use components::{colors, ActionType, Facing, Team};
pub use glam::{Vec2, Vec4};
pub use input_types::{Button, InputFrame, InputState};
pub use level_format::{LevelManifest, SegmentData, SpawnRecord, TileLayerData, COLLISION_LAYER};
pub use math::Rect;
