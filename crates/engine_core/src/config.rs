// crates/engine_core/src/config.rs

use std::collections::HashMap;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Tunables for one simulation. Every field has a default, so a config file
/// only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub viewport: Vec2,

    // --- Activation ---
    /// Extra distance past the viewport edge before objects go to sleep.
    pub activation_margin: f32,
    /// Radius for manifest types with no entry in `activation_radii`.
    pub default_activation_radius: f32,
    /// Per-type radii. A radius of 0 or less keeps the type always active.
    pub activation_radii: HashMap<String, f32>,

    // --- Capacities ---
    pub max_objects: usize,
    pub max_colliders: usize,
    pub render_queue_capacity: usize,

    // --- Camera ---
    pub camera_smoothing: f32,
    /// Multiplier on the target's velocity added to the look-ahead.
    pub camera_look_ahead: f32,
    pub shake_seed: u64,

    // --- Physics ---
    pub gravity: f32,
    pub max_fall_speed: f32,

    // --- Loop ---
    pub fixed_timestep: f32,
    pub max_steps_per_frame: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let activation_radii = [("player", 0.0), ("platform", 512.0), ("npc", 256.0)]
            .into_iter()
            .map(|(kind, radius)| (kind.to_string(), radius))
            .collect();

        Self {
            viewport: Vec2::new(480.0, 320.0),
            activation_margin: 64.0,
            default_activation_radius: 128.0,
            activation_radii,
            max_objects: 384,
            max_colliders: 256,
            render_queue_capacity: 1024,
            camera_smoothing: 8.0,
            camera_look_ahead: 0.25,
            shake_seed: 0x5eed,
            gravity: 980.0,
            max_fall_speed: 600.0,
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_frame: 5,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(text: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Activation radius for a manifest type.
    pub fn activation_radius(&self, kind: &str) -> f32 {
        self.activation_radii
            .get(kind)
            .copied()
            .unwrap_or(self.default_activation_radius)
    }
}
