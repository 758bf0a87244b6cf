// crates/engine_core/src/object/manager.rs

use engine_ecs::{EcsError, Entity, ObjectPool};
use engine_shared::{ActionType, Team};
use glam::Vec2;
use tracing::{debug, warn};

use crate::camera::CameraTarget;
use crate::object::{ComponentPool, GameComponent, GameObject, Phase};
use crate::registry::{PlayerSnapshot, SystemRegistry};

/// Owns every object, decides which ones are awake, and ticks them.
///
/// `add` and `remove` only queue the change. Both queues are applied at the
/// top of the next `update`, in `commit_updates`, so the active list never
/// changes while anything iterates it.
pub struct GameObjectManager {
    pool: ObjectPool<GameObject>,
    active: Vec<Entity>,
    inactive: Vec<Entity>,
    pending_add: Vec<Entity>,
    pending_remove: Vec<Entity>,
    next_serial: u64,
    player: Option<Entity>,
    components: ComponentPool,
}

impl GameObjectManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: ObjectPool::with_capacity(capacity),
            active: Vec::new(),
            inactive: Vec::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            next_serial: 1,
            player: None,
            components: ComponentPool::default(),
        }
    }

    // --- Allocation ---

    /// Allocate a blank object. It does nothing until `add`ed.
    ///
    /// Running out of slots means the pool is sized wrong for the content;
    /// that is a hard failure.
    pub fn create_object(&mut self) -> Entity {
        match self.try_create_object() {
            Ok(entity) => entity,
            Err(err) => panic!(
                "GameObjectManager: {err}. Live objects: {} active, {} inactive, {} pending.",
                self.active.len(),
                self.inactive.len(),
                self.pending_add.len()
            ),
        }
    }

    pub fn try_create_object(&mut self) -> Result<Entity, EcsError> {
        let serial = self.next_serial;
        let entity = self.pool.allocate(GameObject::default())?;
        if let Some(object) = self.pool.get_mut(entity) {
            *object = GameObject::new(entity, serial);
        }
        self.next_serial += 1;
        Ok(entity)
    }

    /// Attach a pooled `T` to `entity`, configured by `configure`.
    pub fn attach<T: GameComponent + Default>(&mut self, entity: Entity, configure: impl FnOnce(&mut T)) -> bool {
        let component = self.components.acquire::<T>(configure);
        match self.pool.get_mut(entity) {
            Some(object) => {
                object.add_component(component);
                true
            }
            None => {
                self.components.recycle(component);
                false
            }
        }
    }

    /// Release an object that was created but never added.
    pub fn discard(&mut self, entity: Entity) {
        self.pending_add.retain(|e| *e != entity);
        self.active.retain(|e| *e != entity);
        self.inactive.retain(|e| *e != entity);
        self.destroy(entity);
    }

    // --- Deferred mutation ---

    pub fn add(&mut self, entity: Entity) {
        if !self.pool.contains(entity) {
            warn!(?entity, "add of unknown or released object ignored");
            return;
        }
        if !self.pending_add.contains(&entity) {
            self.pending_add.push(entity);
        }
    }

    pub fn remove(&mut self, entity: Entity) {
        if !self.pending_remove.contains(&entity) {
            self.pending_remove.push(entity);
        }
    }

    /// Apply queued removals, then queued adds. An object both added and
    /// removed since the last commit is destroyed. Adding an object that is
    /// already managed does nothing.
    pub fn commit_updates(&mut self) {
        let removals = std::mem::take(&mut self.pending_remove);
        for entity in removals {
            self.pending_add.retain(|e| *e != entity);
            self.active.retain(|e| *e != entity);
            self.inactive.retain(|e| *e != entity);
            self.destroy(entity);
        }

        let additions = std::mem::take(&mut self.pending_add);
        for entity in additions {
            if !self.pool.contains(entity) || self.active.contains(&entity) || self.inactive.contains(&entity) {
                continue;
            }
            self.active.push(entity);
        }
    }

    fn destroy(&mut self, entity: Entity) {
        let Some(mut object) = self.pool.release(entity) else {
            return;
        };
        for component in object.take_components() {
            self.components.recycle(component);
        }
        if self.player == Some(entity) {
            self.player = None;
        }
        debug!(?entity, kind = %object.kind, "object destroyed");
    }

    // --- Tick ---

    /// 1. Commit pending adds/removes.
    /// 2. Publish the player snapshot.
    /// 3. Recompute activation against the camera.
    /// 4. Register colliders for active collidable objects.
    /// 5. Run every phase across all active objects.
    /// 6. Queue self-removals and apply hit events.
    pub fn update(&mut self, dt: f32, systems: &mut SystemRegistry) {
        self.commit_updates();
        systems.player = self.player_snapshot();
        self.update_activation(systems);
        self.register_colliders(systems);

        for phase in Phase::ALL {
            for i in 0..self.active.len() {
                let entity = self.active[i];
                if let Some(object) = self.pool.get_mut(entity) {
                    object.run_phase(phase, dt, systems);
                }
            }
        }

        let marked: Vec<Entity> = self
            .active
            .iter()
            .copied()
            .filter(|e| self.pool.get(*e).is_some_and(GameObject::is_marked_for_removal))
            .collect();
        for entity in marked {
            self.remove(entity);
        }

        self.apply_hits(systems);
    }

    fn update_activation(&mut self, systems: &SystemRegistry) {
        let Some(camera) = systems.camera.as_ref() else {
            // No camera: nothing can be out of range.
            self.active.append(&mut self.inactive);
            return;
        };

        let view_center = camera.view_center();
        let reach = camera.viewport() * 0.5 + Vec2::splat(systems.config.activation_margin);
        let in_range = |object: &GameObject| {
            if object.activation_radius <= 0.0 {
                return true;
            }
            let distance = (object.center() - view_center).abs();
            let limit = reach + Vec2::splat(object.activation_radius);
            distance.x <= limit.x && distance.y <= limit.y
        };

        let pool = &self.pool;
        let mut sleeping = Vec::new();
        let mut doomed = Vec::new();
        self.active.retain(|&entity| {
            let Some(object) = pool.get(entity) else {
                return false;
            };
            if in_range(object) {
                return true;
            }
            if object.destroy_on_deactivation {
                doomed.push(entity);
            } else {
                sleeping.push(entity);
            }
            false
        });

        let mut woken = Vec::new();
        self.inactive.retain(|&entity| match pool.get(entity) {
            Some(object) if in_range(object) => {
                woken.push(entity);
                false
            }
            Some(_) => true,
            None => false,
        });

        self.active.extend(woken);
        self.inactive.extend(sleeping);
        for entity in doomed {
            self.remove(entity);
        }
    }

    fn register_colliders(&self, systems: &mut SystemRegistry) {
        let Some(collision) = systems.collision.as_mut() else {
            return;
        };
        collision.clear_colliders();
        for object in self.active_objects().filter(|o| o.collidable) {
            collision.register_collider(object.entity(), object.rect(), object.team);
        }
    }

    /// Hits are team-neutral here; whoever posts them filters teams. Dead and
    /// invulnerable targets ignore them.
    fn apply_hits(&mut self, systems: &mut SystemRegistry) {
        for hit in systems.hits.drain() {
            let from = self.pool.get(hit.attacker).map(GameObject::center);
            let Some(target) = self.pool.get_mut(hit.target) else {
                continue;
            };
            if !target.is_alive() || target.invulnerable || target.action == ActionType::Frozen {
                continue;
            }

            target.life -= hit.damage;
            target.last_hit_from = from;
            target.action = if target.life <= 0 {
                ActionType::Death
            } else {
                ActionType::HitReact
            };
            debug!(target = ?hit.target, life = target.life, "hit applied");
        }
    }

    fn player_snapshot(&self) -> Option<PlayerSnapshot> {
        let entity = self.player?;
        let object = self.pool.get(entity)?;
        Some(PlayerSnapshot {
            entity,
            position: object.position,
            size: object.size(),
            velocity: object.velocity,
            facing: object.facing,
            life: object.life,
        })
    }

    // --- Lookups (active set only, except get/get_mut) ---

    pub fn get(&self, entity: Entity) -> Option<&GameObject> {
        self.pool.get(entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut GameObject> {
        self.pool.get_mut(entity)
    }

    pub fn is_active(&self, entity: Entity) -> bool {
        self.active.contains(&entity)
    }

    pub fn active_entities(&self) -> &[Entity] {
        &self.active
    }

    pub fn active_objects(&self) -> impl Iterator<Item = &GameObject> {
        self.active.iter().filter_map(|e| self.pool.get(*e))
    }

    pub fn find_objects_by_kind(&self, kind: &str) -> Vec<Entity> {
        self.active_objects()
            .filter(|o| o.kind == kind)
            .map(GameObject::entity)
            .collect()
    }

    pub fn object_by_team(&self, team: Team) -> Option<Entity> {
        self.active_objects().find(|o| o.team == team).map(GameObject::entity)
    }

    /// The player, if it is currently active.
    pub fn player(&self) -> Option<Entity> {
        self.player.filter(|p| self.is_active(*p))
    }

    pub fn set_player(&mut self, player: Option<Entity>) {
        self.player = player;
    }

    /// Center and velocity of `entity` for the camera.
    pub fn camera_target(&self, entity: Entity) -> Option<CameraTarget> {
        let object = self.pool.get(entity)?;
        Some(CameraTarget {
            center: object.center(),
            velocity: object.velocity,
        })
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn inactive_count(&self) -> usize {
        self.inactive.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending_add.len() + self.pending_remove.len()
    }

    /// Objects allocated, in any state.
    pub fn live_count(&self) -> usize {
        self.pool.len()
    }

    /// Destroy everything: active, inactive and pending.
    pub fn reset(&mut self) {
        for mut object in self.pool.drain() {
            for component in object.take_components() {
                self.components.recycle(component);
            }
        }
        self.active.clear();
        self.inactive.clear();
        self.pending_add.clear();
        self.pending_remove.clear();
        self.player = None;
    }
}
