//! Space Waves - station-defense minigame simulation core
//!
//! Core modules:
//! - `sim`: Per-frame simulation (entity pools, AI, round state machine)
//! - `settings`: Match settings (player count, AI difficulty)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration-boundary errors

pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{SimError, SimResult};
pub use settings::{AiDifficulty, Settings};
pub use tuning::SimTuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Maximum number of players (one controller port each)
    pub const MAX_PLAYERS: usize = 4;
    /// Attacking crafts per round (everyone except the station player)
    pub const NUM_CRAFTS: usize = 3;
    /// Projectile slots per craft, per weapon kind
    pub const MAX_PROJECTILES: usize = 16;
    /// Bonus slots
    pub const MAX_BONUSES: usize = 10;
    /// Explosion marker slots (separately for 3D and 2D)
    pub const MAX_EFFECTS: usize = 10;

    /// Analog stick saturation value
    pub const STICK_MAX_VALUE: f32 = 68.0;

    /// Nominal frame delta (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}

/// Controller port index
pub type Port = usize;

/// Player index (0-based)
pub type PlayerId = usize;

/// A (pitch, yaw, radius) position around the station
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Polar {
    pub pitch: f32,
    pub yaw: f32,
    pub radius: f32,
}

impl Polar {
    pub const fn new(pitch: f32, yaw: f32, radius: f32) -> Self {
        Self { pitch, yaw, radius }
    }

    /// Euclidean distance in (pitch, yaw, radius) space
    pub fn distance(&self, other: &Polar) -> f32 {
        let dp = self.pitch - other.pitch;
        let dy = self.yaw - other.yaw;
        let dr = self.radius - other.radius;
        (dp * dp + dy * dy + dr * dr).sqrt()
    }

    /// World position of this point, with the radius multiplied by `scale`
    #[inline]
    pub fn to_world(&self, scale: f32) -> Vec3 {
        polar_to_world(self.pitch, self.yaw, self.radius * scale)
    }
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (pitch, yaw, distance) to a world position around the origin.
///
/// Yaw 0 / pitch 0 points down +Z; positive pitch raises the point along +Y.
#[inline]
pub fn polar_to_world(pitch: f32, yaw: f32, distance: f32) -> Vec3 {
    let (sp, cp) = pitch.sin_cos();
    let (sy, cy) = yaw.sin_cos();
    Vec3::new(distance * cp * sy, distance * sp, distance * cp * cy)
}

/// Linear interpolation used by the exponential followers
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
