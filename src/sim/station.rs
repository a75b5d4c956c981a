//! The defended station
//!
//! Steering and defense of the station belong to the host; the core reads
//! its aim and shield window and applies impact damage to it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tuning::SimTuning;
use crate::{PlayerId, Port, polar_to_world};

/// Shield, powerup and ammunition carried by a station or craft
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Loadout {
    /// Shield seconds; full charge waits for activation, below full it drains
    pub shield: f32,
    /// Powerup seconds, same rules as the shield
    pub powerup: f32,
    pub rocket_count: u32,
}

impl Loadout {
    /// True while a shield is running (activated, not yet drained)
    pub fn shield_running(&self, max: f32) -> bool {
        self.shield > 0.0 && self.shield < max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Defending player this turn
    pub player: PlayerId,
    pub port: Port,
    /// Turret aim
    pub pitch: f32,
    pub yaw: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub arm: Loadout,
    /// Full charge for `arm.shield` / `arm.powerup`
    pub loadout_max: f32,
}

impl Station {
    pub fn new(player: PlayerId, tuning: &SimTuning) -> Self {
        Self {
            player,
            port: player,
            pitch: 0.0,
            yaw: 0.0,
            hp: tuning.station_max_health,
            max_hp: tuning.station_max_health,
            arm: Loadout::default(),
            loadout_max: tuning.loadout_max_secs,
        }
    }

    /// Unit vector the station faces
    pub fn forward(&self) -> Vec3 {
        polar_to_world(self.pitch, self.yaw, 1.0)
    }

    /// Turn the turret
    pub fn aim(&mut self, pitch: f32, yaw: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
    }

    /// Whether a running shield currently absorbs impacts
    pub fn shield_absorbing(&self) -> bool {
        self.arm.shield_running(self.loadout_max)
    }

    /// Subtract `damage`, never dropping below zero
    pub fn apply_damage(&mut self, damage: f32) {
        self.hp = (self.hp - damage.max(0.0)).max(0.0);
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shield_window() {
        let tuning = SimTuning::default();
        let mut station = Station::new(0, &tuning);
        assert!(!station.shield_absorbing());
        station.arm.shield = tuning.loadout_max_secs;
        // Granted but not activated
        assert!(!station.shield_absorbing());
        station.arm.shield = 4.0;
        assert!(station.shield_absorbing());
    }

    #[test]
    fn test_damage_floor() {
        let mut station = Station::new(1, &SimTuning::default());
        station.apply_damage(65.0);
        assert_eq!(station.hp, 35.0);
        station.apply_damage(65.0);
        assert_eq!(station.hp, 0.0);
        assert!(station.is_destroyed());
    }

    #[test]
    fn test_forward_follows_aim() {
        let mut station = Station::new(0, &SimTuning::default());
        assert!((station.forward() - Vec3::Z).length() < 1e-5);
        station.aim(0.0, std::f32::consts::FRAC_PI_2);
        assert!((station.forward() - Vec3::X).length() < 1e-5);
    }
}
