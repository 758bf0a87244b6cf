// crates/game_plugin/src/state.rs
//! The object factory: what each manifest type is made of.

use engine_core::components::{
    Animation, BackgroundCollisionComponent, LifeComponent, LifetimeComponent, MovementComponent,
    MovingPlatformComponent, SpriteComponent,
};
use engine_core::{GameObjectManager, ObjectFactory, SystemRegistry};
use engine_ecs::Entity;
use engine_shared::{ActionType, SpawnRecord, Team};
use glam::Vec2;

use crate::systems::{
    CameraFocusTrigger, ContactDamageComponent, PatrolComponent, PickupComponent, PlayerControllerComponent,
};

// Draw order among actors.
const Z_PLATFORM: f32 = 0.0;
const Z_PICKUP: f32 = 5.0;
const Z_ACTOR: f32 = 10.0;
const Z_PLAYER: f32 = 20.0;
const Z_EFFECT: f32 = 30.0;

/// Gameplay tuning shared by every object the factory builds.
#[derive(Debug, Clone)]
pub struct GameFactory {
    pub player_life: i32,
    pub run_speed: f32,
    pub jump_speed: f32,
    pub attack_damage: i32,
    pub enemy_life: i32,
    pub enemy_speed: f32,
    pub contact_damage: i32,
    pub coin_value: u64,
    pub spark_lifetime: f32,
}

impl Default for GameFactory {
    fn default() -> Self {
        Self {
            player_life: 3,
            run_speed: 140.0,
            jump_speed: 420.0,
            attack_damage: 1,
            enemy_life: 2,
            enemy_speed: 40.0,
            contact_damage: 1,
            coin_value: 10,
            spark_lifetime: 0.3,
        }
    }
}

/// Record size when the manifest gives one, `fallback` otherwise.
fn size_of(record: &SpawnRecord, fallback: Vec2) -> Vec2 {
    Vec2::new(
        if record.width > 0.0 { record.width } else { fallback.x },
        if record.height > 0.0 { record.height } else { fallback.y },
    )
}

impl GameFactory {
    fn player(&self, record: &SpawnRecord, objects: &mut GameObjectManager, systems: &SystemRegistry) -> Entity {
        let entity = objects.create_object();
        let (gravity, max_fall_speed) = (systems.config.gravity, systems.config.max_fall_speed);

        objects.attach::<PlayerControllerComponent>(entity, |c| {
            c.run_speed = record.property("run_speed", self.run_speed);
            c.jump_speed = record.property("jump_speed", self.jump_speed);
            c.attack_damage = self.attack_damage;
            c.attack_time = 0.25;
            c.attack_reach = Vec2::new(20.0, 20.0);
            c.look_ahead = 48.0;
        });
        objects.attach::<MovementComponent>(entity, |m| {
            m.gravity = gravity;
            m.max_fall_speed = max_fall_speed;
        });
        objects.attach::<BackgroundCollisionComponent>(entity, |_| {});
        objects.attach::<LifeComponent>(entity, |l| {
            l.hit_react_time = 0.3;
            l.invulnerable_time = 1.0;
            l.death_delay = 1.0;
            l.knockback = Vec2::new(120.0, 160.0);
            l.hit_sound = Some("hurt".to_string());
            l.death_sound = Some("die".to_string());
        });
        objects.attach::<SpriteComponent>(entity, |s| {
            s.sprite = "player".to_string();
            s.z = Z_PLAYER;
            s.blink_when_invulnerable = true;
            s.animations = vec![
                Animation::new(ActionType::Idle, 0, 2, 0.5),
                Animation::new(ActionType::Move, 2, 4, 0.1),
                Animation::new(ActionType::Attack, 6, 2, 0.1).once(),
                Animation::new(ActionType::HitReact, 8, 1, 0.0),
                Animation::new(ActionType::Death, 9, 3, 0.2).once(),
            ];
        });

        if let Some(object) = objects.get_mut(entity) {
            object.set_size(size_of(record, Vec2::new(24.0, 32.0)));
            object.team = Team::Player;
            object.life = self.player_life;
            object.max_life = self.player_life;
            object.collidable = true;
        }
        entity
    }

    fn enemy(&self, record: &SpawnRecord, objects: &mut GameObjectManager, systems: &SystemRegistry) -> Entity {
        let entity = objects.create_object();
        let (gravity, max_fall_speed) = (systems.config.gravity, systems.config.max_fall_speed);

        objects.attach::<PatrolComponent>(entity, |p| {
            p.speed = record.property("speed", self.enemy_speed);
            p.probe = 2.0;
        });
        objects.attach::<MovementComponent>(entity, |m| {
            m.gravity = gravity;
            m.max_fall_speed = max_fall_speed;
        });
        objects.attach::<BackgroundCollisionComponent>(entity, |_| {});
        objects.attach::<ContactDamageComponent>(entity, |d| {
            d.damage = self.contact_damage;
            d.cooldown = 0.5;
            d.shake_magnitude = 4.0;
            d.shake_duration = 0.25;
            d.hit_stop = 0.06;
        });
        objects.attach::<LifeComponent>(entity, |l| {
            l.hit_react_time = 0.2;
            l.invulnerable_time = 0.2;
            l.death_delay = 0.4;
            l.knockback = Vec2::new(80.0, 60.0);
            l.death_effect = Some("spark".to_string());
            l.death_sound = Some("enemy_die".to_string());
        });
        objects.attach::<SpriteComponent>(entity, |s| {
            s.sprite = "enemy".to_string();
            s.z = Z_ACTOR;
            s.animations = vec![
                Animation::new(ActionType::Move, 0, 4, 0.15),
                Animation::new(ActionType::HitReact, 4, 1, 0.0),
                Animation::new(ActionType::Death, 5, 2, 0.2).once(),
            ];
        });

        if let Some(object) = objects.get_mut(entity) {
            object.set_size(size_of(record, Vec2::new(24.0, 24.0)));
            object.team = Team::Enemy;
            let life = record.property("life", self.enemy_life as f32) as i32;
            object.life = life;
            object.max_life = life;
            object.collidable = true;
        }
        entity
    }

    fn coin(&self, record: &SpawnRecord, objects: &mut GameObjectManager) -> Entity {
        let entity = objects.create_object();
        objects.attach::<PickupComponent>(entity, |p| {
            p.value = self.coin_value;
            p.sound = Some("coin".to_string());
            p.effect = Some("spark".to_string());
        });
        objects.attach::<SpriteComponent>(entity, |s| {
            s.sprite = "coin".to_string();
            s.z = Z_PICKUP;
            s.animations = vec![Animation::new(ActionType::Idle, 0, 4, 0.12)];
        });
        if let Some(object) = objects.get_mut(entity) {
            object.set_size(size_of(record, Vec2::splat(16.0)));
        }
        entity
    }

    /// Travels from its spawn point by (`dx`, `dy`) and back.
    fn platform(&self, record: &SpawnRecord, objects: &mut GameObjectManager) -> Entity {
        let entity = objects.create_object();
        let start = record.position();
        let end = start + Vec2::new(record.property("dx", 0.0), record.property("dy", 0.0));
        objects.attach::<MovingPlatformComponent>(entity, |p| {
            p.start = start;
            p.end = end;
            p.speed = record.property("speed", 40.0);
        });
        objects.attach::<SpriteComponent>(entity, |s| {
            s.sprite = "platform".to_string();
            s.z = Z_PLATFORM;
        });
        if let Some(object) = objects.get_mut(entity) {
            object.set_size(size_of(record, Vec2::new(64.0, 16.0)));
        }
        entity
    }

    fn npc(&self, record: &SpawnRecord, objects: &mut GameObjectManager) -> Entity {
        let entity = objects.create_object();
        objects.attach::<CameraFocusTrigger>(entity, |t| {
            t.reach = record.property("reach", 48.0);
            t.duration = record.property("focus_time", 2.0);
        });
        objects.attach::<SpriteComponent>(entity, |s| {
            s.sprite = "npc".to_string();
            s.z = Z_ACTOR;
            s.animations = vec![Animation::new(ActionType::Idle, 0, 2, 0.6)];
        });
        if let Some(object) = objects.get_mut(entity) {
            object.set_size(size_of(record, Vec2::new(24.0, 32.0)));
        }
        entity
    }

    /// Effects are requested at a center point.
    fn spark(&self, record: &SpawnRecord, objects: &mut GameObjectManager) -> Entity {
        let entity = objects.create_object();
        let lifetime = self.spark_lifetime;
        objects.attach::<LifetimeComponent>(entity, |l| l.duration = lifetime);
        objects.attach::<SpriteComponent>(entity, |s| {
            s.sprite = "spark".to_string();
            s.z = Z_EFFECT;
            s.animations = vec![Animation::new(ActionType::Idle, 0, 3, lifetime / 3.0).once()];
        });
        if let Some(object) = objects.get_mut(entity) {
            let size = size_of(record, Vec2::splat(8.0));
            object.set_size(size);
            object.destroy_on_deactivation = true;
        }
        entity
    }
}

impl ObjectFactory for GameFactory {
    fn spawn(
        &mut self,
        record: &SpawnRecord,
        objects: &mut GameObjectManager,
        systems: &mut SystemRegistry,
    ) -> Option<Entity> {
        let entity = match record.kind.as_str() {
            "player" => self.player(record, objects, systems),
            "enemy" => self.enemy(record, objects, systems),
            "coin" => self.coin(record, objects),
            "platform" => self.platform(record, objects),
            "npc" => self.npc(record, objects),
            "spark" => self.spark(record, objects),
            _ => return None,
        };

        let object = objects.get_mut(entity)?;
        object.position = if record.kind == "spark" {
            record.position() - object.size() * 0.5
        } else {
            record.position()
        };
        Some(entity)
    }
}
