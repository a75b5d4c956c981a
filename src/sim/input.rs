//! Control-input contract shared by human controllers and bots

use serde::{Deserialize, Serialize};

use crate::Port;
use crate::consts::{MAX_PLAYERS, STICK_MAX_VALUE};

/// Named controller buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Buttons {
    /// Activate shield
    pub a: bool,
    /// Activate powerup
    pub b: bool,
    /// Launch asteroid
    pub z: bool,
    /// Launch rocket (either shoulder)
    pub l: bool,
    pub r: bool,
    /// Move away from the station
    pub c_up: bool,
    /// Move toward the station
    pub c_down: bool,
    /// Asteroid launch nudges
    pub d_up: bool,
    pub d_down: bool,
    pub d_left: bool,
    pub d_right: bool,
    pub start: bool,
}

/// One craft's input for a single update
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlInput {
    /// Horizontal stick, [-STICK_MAX_VALUE, STICK_MAX_VALUE]
    pub stick_x: f32,
    /// Vertical stick, [-STICK_MAX_VALUE, STICK_MAX_VALUE]
    pub stick_y: f32,
    /// Buttons that went down this frame
    pub pressed: Buttons,
    /// Buttons currently down
    pub held: Buttons,
}

impl ControlInput {
    /// Stick values clamped to the physical range
    pub fn clamped(mut self) -> Self {
        self.stick_x = self.stick_x.clamp(-STICK_MAX_VALUE, STICK_MAX_VALUE);
        self.stick_y = self.stick_y.clamp(-STICK_MAX_VALUE, STICK_MAX_VALUE);
        self
    }
}

/// Per-frame controller snapshot for every port
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub ports: [ControlInput; MAX_PLAYERS],
}

impl TickInput {
    pub fn port(&self, port: Port) -> ControlInput {
        self.ports.get(port).copied().unwrap_or_default()
    }

    /// Whether any controller pressed start this frame
    pub fn start_pressed(&self) -> bool {
        self.ports.iter().any(|p| p.pressed.start)
    }

    /// Snapshot with only `port` pressing start
    pub fn with_start(port: Port) -> Self {
        let mut input = Self::default();
        if let Some(p) = input.ports.get_mut(port) {
            p.pressed.start = true;
        }
        input
    }
}
