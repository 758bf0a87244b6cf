// crates/engine_core/src/time.rs

/// Game clock. Components read `delta()`; hit-stop freezes it to zero for a
/// short real-time window without stopping the frame loop.
#[derive(Debug, Clone)]
pub struct TimeSystem {
    game_time: f32,
    real_time: f32,
    delta: f32,
    scale: f32,
    freeze_remaining: f32,
}

impl Default for TimeSystem {
    fn default() -> Self {
        Self {
            game_time: 0.0,
            real_time: 0.0,
            delta: 0.0,
            scale: 1.0,
            freeze_remaining: 0.0,
        }
    }
}

impl TimeSystem {
    /// Advance by a real frame delta and return the effective game delta.
    pub fn update(&mut self, real_dt: f32) -> f32 {
        self.real_time += real_dt;

        if self.freeze_remaining > 0.0 {
            self.freeze_remaining = (self.freeze_remaining - real_dt).max(0.0);
            self.delta = 0.0;
        } else {
            self.delta = real_dt * self.scale;
        }

        self.game_time += self.delta;
        self.delta
    }

    /// Hit-stop. Overlapping freezes keep the longer remainder.
    pub fn freeze(&mut self, duration: f32) {
        self.freeze_remaining = self.freeze_remaining.max(duration);
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_remaining > 0.0
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn game_time(&self) -> f32 {
        self.game_time
    }

    pub fn real_time(&self) -> f32 {
        self.real_time
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
