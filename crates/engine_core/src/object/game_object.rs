// crates/engine_core/src/object/game_object.rs

use engine_ecs::Entity;
use engine_physics::TileCollision;
use engine_shared::{ActionType, Facing, Rect, Team};
use glam::Vec2;

use crate::object::{GameComponent, Phase};
use crate::registry::SystemRegistry;

/// A simulation actor: plain state plus the components that drive it.
pub struct GameObject {
    pub position: Vec2,
    pub velocity: Vec2,
    pub width: f32,
    pub height: f32,

    /// Manifest type string ("player", "enemy", ...).
    pub kind: String,
    pub team: Team,
    pub life: i32,
    pub max_life: i32,
    pub facing: Facing,
    pub action: ActionType,

    /// 0 or less keeps the object active regardless of the camera.
    pub activation_radius: f32,
    pub destroy_on_deactivation: bool,
    /// Registered as an object collider every tick while active.
    pub collidable: bool,
    /// Incoming hits are ignored while set.
    pub invulnerable: bool,

    /// Tile contacts from the most recent collision pass.
    pub contact: TileCollision,
    /// Center of whoever hit this object last.
    pub last_hit_from: Option<Vec2>,

    entity: Entity,
    serial: u64,
    marked_for_removal: bool,
    components: Vec<Box<dyn GameComponent>>,
}

impl Default for GameObject {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            width: 0.0,
            height: 0.0,
            kind: String::new(),
            team: Team::None,
            life: 1,
            max_life: 1,
            facing: Facing::Right,
            action: ActionType::Idle,
            activation_radius: 0.0,
            destroy_on_deactivation: false,
            collidable: false,
            invulnerable: false,
            contact: TileCollision::default(),
            last_hit_from: None,
            entity: Entity::NULL,
            serial: 0,
            marked_for_removal: false,
            components: Vec::new(),
        }
    }
}

impl GameObject {
    pub(crate) fn new(entity: Entity, serial: u64) -> Self {
        Self {
            entity,
            serial,
            ..Self::default()
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Allocation order, unique for the lifetime of the manager.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.width = size.x;
        self.height = size.y;
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size() * 0.5
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size())
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0 && self.action != ActionType::Death
    }

    /// Ask the manager to drop this object at its next commit.
    pub fn mark_for_removal(&mut self) {
        self.marked_for_removal = true;
    }

    pub fn is_marked_for_removal(&self) -> bool {
        self.marked_for_removal
    }

    // --- Components ---

    pub fn add_component(&mut self, component: Box<dyn GameComponent>) {
        self.components.push(component);
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn find_component<T: GameComponent>(&self) -> Option<&T> {
        self.components
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    pub fn find_component_mut<T: GameComponent>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find_map(|c| c.as_any_mut().downcast_mut::<T>())
    }

    pub(crate) fn take_components(&mut self) -> Vec<Box<dyn GameComponent>> {
        std::mem::take(&mut self.components)
    }

    /// Run this object's components for `phase`, in attachment order.
    pub(crate) fn run_phase(&mut self, phase: Phase, dt: f32, systems: &mut SystemRegistry) {
        if !self.components.iter().any(|c| c.phase() == phase) {
            return;
        }

        let mut components = std::mem::take(&mut self.components);
        for component in components.iter_mut().filter(|c| c.phase() == phase) {
            component.update(dt, self, systems);
        }
        // Anything attached while the phase ran goes after the existing list.
        components.append(&mut self.components);
        self.components = components;
    }
}
