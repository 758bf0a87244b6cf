// crates/engine_shared/src/input_types.rs
//! Compact per-frame input snapshot consumed by the simulation.
//! How the snapshot is produced (keyboard, touch, gamepad, replay) is the
//! driver's business.

/// Maximum number of analog axes carried per frame.
pub const MAX_AXES: usize = 8;

pub const AXIS_X: usize = 0;
pub const AXIS_Y: usize = 1;

/// Dead zone below which an analog axis is treated as centered.
pub const AXIS_DEAD_ZONE: f32 = 0.1;

/// Digital buttons. The discriminant is the bit index in `digital_mask`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
    Jump = 4,
    Attack = 5,
    Pause = 6,
}

impl Button {
    pub const ALL: [Button; 7] = [
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
        Button::Jump,
        Button::Attack,
        Button::Pause,
    ];

    fn bit(self) -> u64 {
        1u64 << (self as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputState {
    /// Bitmask of held buttons, indexed by `Button`.
    pub digital_mask: u64,

    /// Fixed-size analog axes. `AXIS_X`/`AXIS_Y` carry the movement stick.
    pub analog_axes: [f32; MAX_AXES],
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            digital_mask: 0,
            analog_axes: [0.0; MAX_AXES],
        }
    }
}

impl InputState {
    pub fn is_active(&self, button: Button) -> bool {
        (self.digital_mask & button.bit()) != 0
    }

    pub fn set(&mut self, button: Button, held: bool) {
        if held {
            self.digital_mask |= button.bit();
        } else {
            self.digital_mask &= !button.bit();
        }
    }

    /// Builder-style helper, mostly for drivers and tests.
    pub fn with(mut self, button: Button) -> Self {
        self.set(button, true);
        self
    }

    pub fn get_axis(&self, axis_index: usize) -> f32 {
        if axis_index >= MAX_AXES {
            0.0
        } else {
            self.analog_axes[axis_index]
        }
    }

    pub fn set_axis(&mut self, axis_index: usize, value: f32) {
        if axis_index < MAX_AXES {
            self.analog_axes[axis_index] = value.clamp(-1.0, 1.0);
        }
    }

    /// Horizontal intent in -1..1. The analog stick wins when it is outside
    /// the dead zone, otherwise the digital buttons decide.
    pub fn horizontal(&self) -> f32 {
        let axis = self.get_axis(AXIS_X);
        if axis.abs() > AXIS_DEAD_ZONE {
            return axis;
        }
        let mut value = 0.0;
        if self.is_active(Button::Left) {
            value -= 1.0;
        }
        if self.is_active(Button::Right) {
            value += 1.0;
        }
        value
    }
}

/// Current + previous snapshot, so components can ask for edges.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub current: InputState,
    pub previous: InputState,
}

impl InputFrame {
    /// Shift the current snapshot into `previous` and install the new one.
    pub fn advance(&mut self, next: InputState) {
        self.previous = self.current;
        self.current = next;
    }

    pub fn held(&self, button: Button) -> bool {
        self.current.is_active(button)
    }

    pub fn pressed(&self, button: Button) -> bool {
        self.current.is_active(button) && !self.previous.is_active(button)
    }

    pub fn released(&self, button: Button) -> bool {
        !self.current.is_active(button) && self.previous.is_active(button)
    }

    pub fn horizontal(&self) -> f32 {
        self.current.horizontal()
    }
}
