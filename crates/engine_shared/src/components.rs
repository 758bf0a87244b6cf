// crates/engine_shared/src/components.rs
//! Tags shared by every layer of the engine.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Which side an object fights for. Hits between members of the same team
/// are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    #[default]
    None,
    Player,
    Enemy,
}

impl Team {
    pub fn is_hostile_to(self, other: Team) -> bool {
        self != Team::None && other != Team::None && self != other
    }
}

/// The "current action" state tag of an object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    #[default]
    Idle,
    Move,
    Attack,
    HitReact,
    Death,
    Frozen,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// RGBA in 0..1, same layout as the sprite tint the renderer consumes.
pub mod colors {
    use super::Vec4;

    pub const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);
    pub const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
    pub const YELLOW: Vec4 = Vec4::new(1.0, 0.9, 0.2, 1.0);
    pub const GRAY: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_team_is_never_hostile() {
        assert!(Team::Player.is_hostile_to(Team::Enemy));
        assert!(!Team::Player.is_hostile_to(Team::Player));
        assert!(!Team::None.is_hostile_to(Team::Enemy));
        assert!(!Team::Enemy.is_hostile_to(Team::None));
    }
}
