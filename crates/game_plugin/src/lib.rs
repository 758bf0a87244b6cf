// crates/game_plugin/src/lib.rs
//! The game itself: player, enemies, pickups, camera triggers and the
//! factory that builds them from level manifests.

pub mod state;
pub mod systems;

pub use state::GameFactory;

use engine_core::{EngineConfig, Simulation};

/// A simulation wired to this game's factory.
pub fn new_simulation(config: EngineConfig) -> Simulation {
    Simulation::new(config, Box::new(GameFactory::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use engine_core::level::parse_manifest;
    use engine_shared::{Button, Facing, InputState};

    const LEVEL: &str = r#"{
        "name": "corridor",
        "tile_width": 16, "tile_height": 16, "width": 12, "height": 4,
        "layers": [{ "name": "collision", "data": [
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1
        ] }],
        "objects": [
            { "type": "player", "x": 16, "y": 16 },
            { "type": "coin", "x": 64, "y": 32 }
        ]
    }"#;

    #[test]
    fn player_walks_into_a_coin() {
        let mut sim = new_simulation(EngineConfig::default());
        sim.load_level(parse_manifest(LEVEL).unwrap()).unwrap();

        let right = InputState::default().with(Button::Right);
        for _ in 0..60 {
            sim.step(1.0 / 60.0, right);
        }

        assert_eq!(sim.systems.score, 10);
        assert!(sim.objects.find_objects_by_kind("coin").is_empty());
        let player = sim.objects.player().unwrap();
        let player = sim.objects.get(player).unwrap();
        assert!(player.contact.grounded);
        assert!(player.position.x > 64.0);
        // Standing on row 3.
        assert_relative_eq!(player.position.y + player.size().y, 48.0);
    }

    #[test]
    fn enemy_keeps_walking_across_floor_seams() {
        let mut cells = vec![0; 40 * 3];
        cells.extend([1; 40]);
        let level = format!(
            r#"{{
                "tile_width": 16, "tile_height": 16, "width": 40, "height": 4,
                "layers": [{{ "name": "collision", "data": {cells:?} }}],
                "objects": [{{ "type": "enemy", "x": 240.1, "y": 24 }}]
            }}"#
        );
        let mut sim = new_simulation(EngineConfig::default());
        sim.load_level(parse_manifest(&level).unwrap()).unwrap();
        sim.step(1.0 / 60.0, InputState::default());
        let enemy = sim.objects.find_objects_by_kind("enemy")[0];

        let mut turns = 0;
        let mut facing = sim.objects.get(enemy).unwrap().facing;
        for _ in 0..120 {
            sim.step(1.0 / 60.0, InputState::default());
            let now = sim.objects.get(enemy).unwrap().facing;
            if now != facing {
                turns += 1;
                facing = now;
            }
        }

        assert_eq!(turns, 0);
        let enemy = sim.objects.get(enemy).unwrap();
        assert!(enemy.contact.grounded);
        assert!(enemy.position.x > 300.0);
    }

    #[test]
    fn demo_level_loads_and_runs() {
        let mut sim = new_simulation(EngineConfig::default());
        let manifest = parse_manifest(include_str!("../../../assets/levels/demo.json")).unwrap();
        assert_eq!(sim.load_level(manifest).unwrap(), 8);

        for _ in 0..120 {
            sim.step(1.0 / 60.0, InputState::default());
        }
        assert!(sim.objects.player().is_some());
        assert_eq!(sim.frame(), 120);
    }
}
