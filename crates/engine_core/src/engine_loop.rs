// crates/engine_core/src/engine_loop.rs

use std::time::Instant;

use crate::config::EngineConfig;

/// Longest frame delta accepted from the wall clock. Anything longer
/// (breakpoints, a stalled host) is treated as this long.
const MAX_FRAME_DT: f32 = 0.25;

/// Fixed-timestep bookkeeping: wall-clock timer, accumulator, step cap and
/// backlog drop.
pub struct EngineLoop {
    last_frame_time: Instant,
    sim_accumulator: f32,
    sim_dt: f32,
    max_steps_per_frame: u32,
}

impl EngineLoop {
    pub fn new(sim_dt: f32, max_steps_per_frame: u32) -> Self {
        Self {
            last_frame_time: Instant::now(),
            sim_accumulator: 0.0,
            sim_dt,
            max_steps_per_frame: max_steps_per_frame.max(1),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.fixed_timestep, config.max_steps_per_frame)
    }

    pub fn sim_dt(&self) -> f32 {
        self.sim_dt
    }

    /// Update the frame timer and return the clamped frame delta.
    pub fn tick_timer(&mut self) -> f32 {
        let now = Instant::now();
        let frame_dt = now.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        frame_dt.min(MAX_FRAME_DT)
    }

    /// Call `step` with the fixed delta until the accumulator is caught up or
    /// the step cap is reached. A backlog still left at the cap is dropped
    /// rather than chased. Returns the number of steps run.
    pub fn update_simulation(&mut self, frame_dt: f32, mut step: impl FnMut(f32)) -> u32 {
        self.sim_accumulator += frame_dt;

        let mut steps = 0;
        while self.sim_accumulator >= self.sim_dt && steps < self.max_steps_per_frame {
            step(self.sim_dt);
            self.sim_accumulator -= self.sim_dt;
            steps += 1;
        }

        if steps == self.max_steps_per_frame && self.sim_accumulator >= self.sim_dt {
            self.sim_accumulator = 0.0;
        }
        steps
    }
}
