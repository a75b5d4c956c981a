//! RGBA colors for effect markers and ambient light

use serde::{Deserialize, Serialize};

use crate::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Per-channel add, clamped at 255
    pub fn saturating_add(self, other: Rgba) -> Rgba {
        Rgba {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
            a: self.a.saturating_add(other.a),
        }
    }

    /// Per-channel subtract, clamped at 0
    pub fn saturating_sub(self, amount: u8) -> Rgba {
        Rgba {
            r: self.r.saturating_sub(amount),
            g: self.g.saturating_sub(amount),
            b: self.b.saturating_sub(amount),
            a: self.a.saturating_sub(amount),
        }
    }

    pub fn with_alpha(self, a: u8) -> Rgba {
        Rgba { a, ..self }
    }
}

/// Ambient light bursts used by gameplay feedback
pub mod ambient {
    use super::Rgba;

    pub const EXPLOSION: Rgba = Rgba::new(50, 50, 25, 0);
    pub const ROCKET_DOWNED: Rgba = Rgba::new(25, 25, 5, 0);
    pub const ASTEROID_LAUNCH: Rgba = Rgba::new(50, 50, 50, 0);
    pub const SHIELD: Rgba = Rgba::new(0, 0, 100, 0);
    pub const POWERUP: Rgba = Rgba::new(0, 100, 0, 0);
}

const PLAYER_COLORS: [Rgba; crate::consts::MAX_PLAYERS] = [
    Rgba::new(255, 0, 0, 255),
    Rgba::new(0, 255, 0, 255),
    Rgba::new(0, 0, 255, 255),
    Rgba::new(255, 255, 0, 255),
];

/// Identifying color of a player seat
pub fn player_color(player: PlayerId) -> Rgba {
    PLAYER_COLORS
        .get(player)
        .copied()
        .unwrap_or(Rgba::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_channels() {
        let c = Rgba::new(250, 10, 0, 0).saturating_add(Rgba::new(50, 50, 25, 0));
        assert_eq!(c, Rgba::new(255, 60, 25, 0));
        assert_eq!(c.saturating_sub(30), Rgba::new(225, 30, 0, 0));
    }

    #[test]
    fn test_player_color_fallback() {
        assert_eq!(player_color(0), Rgba::new(255, 0, 0, 255));
        assert_eq!(player_color(9), Rgba::WHITE);
    }
}
