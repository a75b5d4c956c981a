//! Data-driven game balance.
//!
//! [`SimTuning::default`] is the authoritative source for every balance value.
//! A JSON document can override any subset of fields; missing keys fall back
//! to the defaults.
//!
//! Times are in simulated seconds, angles in degrees unless the field name
//! says otherwise, and distances in polar radius units.

use serde::{Deserialize, Serialize};

use crate::error::{SimResult, ensure_in_range, ensure_non_negative, ensure_positive};

/// Runtime-tunable gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimTuning {
    // ── Round ────────────────────────────────────────────────────────────────
    pub countdown_secs: f32,
    pub play_secs: f32,
    pub transition_secs: f32,
    pub finished_secs: f32,

    // ── Craft: movement ──────────────────────────────────────────────────────
    pub craft_max_health: f32,
    pub craft_initial_distance: f32,
    pub craft_min_distance: f32,
    pub craft_max_distance: f32,
    /// Distance change per second while C-up/C-down is held
    pub craft_distance_rate: f32,
    /// Per-update follower factor for rendered yaw/pitch
    pub orientation_smoothing: f32,
    /// Per-update follower factor for rendered distance
    pub distance_smoothing: f32,
    pub pitch_limit_deg: f32,
    /// Degrees per stick unit per second
    pub steer_rate: f32,
    /// Steering rate while a powerup is running
    pub steer_rate_powered: f32,
    /// Initial yaw/pitch jitter (radians, symmetric)
    pub initial_angle_jitter: f32,
    /// Multiplier from polar radius to world units for crafts
    pub craft_world_scale: f32,
    /// Multiplier from polar radius to world units for explosion markers
    pub explosion_world_scale: f32,

    // ── Craft: loadout ───────────────────────────────────────────────────────
    /// Full shield / powerup charge
    pub loadout_max_secs: f32,
    pub first_asteroid_delay: f32,

    // ── Asteroid ─────────────────────────────────────────────────────────────
    pub asteroid_cooldown: f32,
    pub asteroid_health_min: u32,
    pub asteroid_health_max: u32,
    /// Random drift per axis (radians/sec, symmetric)
    pub asteroid_drift: f32,
    /// Extra drift per held D-pad direction
    pub asteroid_nudge: f32,
    pub asteroid_speed: f32,
    pub asteroid_damage: f32,

    // ── Rocket ───────────────────────────────────────────────────────────────
    pub rocket_cooldown: f32,
    pub rocket_health: f32,
    pub rocket_speed: f32,
    pub rocket_damage: f32,

    // ── Impact ───────────────────────────────────────────────────────────────
    /// Radius below which a projectile hits the station
    pub impact_radius: f32,
    pub score_per_damage: f32,

    // ── Bonus ────────────────────────────────────────────────────────────────
    pub bonus_first_spawn: f32,
    pub bonus_respawn_min: f32,
    pub bonus_respawn_max: f32,
    pub bonus_lifetime: f32,
    pub bonus_pitch_range_deg: f32,
    pub bonus_radius: f32,
    /// Random drift per axis (radians/sec, symmetric)
    pub bonus_drift: f32,
    pub bonus_pickup_distance: f32,
    pub bonus_points: u64,
    pub bonus_craft_rockets: u32,
    pub bonus_station_rockets: u32,

    // ── Effects ──────────────────────────────────────────────────────────────
    pub explosion_3d_secs: f32,
    pub explosion_2d_secs: f32,
    /// Ambient light fade per update, per channel
    pub ambient_fade: u8,
    pub max_rumble_secs: f32,
    pub max_shake_secs: f32,

    // ── Station ──────────────────────────────────────────────────────────────
    pub station_max_health: f32,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            countdown_secs: 5.0,
            play_secs: 180.0,
            transition_secs: 10.0,
            finished_secs: 10.0,

            craft_max_health: 100.0,
            craft_initial_distance: 90.0,
            craft_min_distance: 30.0,
            craft_max_distance: 90.0,
            craft_distance_rate: 5.0,
            orientation_smoothing: 0.1,
            distance_smoothing: 0.2,
            pitch_limit_deg: 60.0,
            steer_rate: 0.12,
            steer_rate_powered: 0.15,
            initial_angle_jitter: 0.5,
            craft_world_scale: 40.0,
            explosion_world_scale: 25.0,

            loadout_max_secs: 10.0,
            first_asteroid_delay: 0.5,

            asteroid_cooldown: 12.0,
            asteroid_health_min: 5,
            asteroid_health_max: 25,
            asteroid_drift: 0.025,
            asteroid_nudge: 0.03,
            asteroid_speed: 3.0,
            asteroid_damage: 50.0,

            rocket_cooldown: 1.0,
            rocket_health: 5.0,
            rocket_speed: 7.0,
            rocket_damage: 65.0,

            impact_radius: 2.0,
            score_per_damage: 40.0,

            bonus_first_spawn: 5.0,
            bonus_respawn_min: 2.0,
            bonus_respawn_max: 6.0,
            bonus_lifetime: 25.0,
            bonus_pitch_range_deg: 40.0,
            bonus_radius: 60.0,
            bonus_drift: 0.05,
            bonus_pickup_distance: 5.0,
            bonus_points: 1500,
            bonus_craft_rockets: 3,
            bonus_station_rockets: 5,

            explosion_3d_secs: 2.0,
            explosion_2d_secs: 1.6,
            ambient_fade: 12,
            max_rumble_secs: 5.0,
            max_shake_secs: 5.0,

            station_max_health: 100.0,
        }
    }
}

impl SimTuning {
    /// Parse tuning overrides from JSON and validate the result
    pub fn from_json(json: &str) -> SimResult<Self> {
        let tuning: SimTuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every value the simulation relies on being in range
    pub fn validate(&self) -> SimResult<()> {
        ensure_positive("countdown_secs", self.countdown_secs)?;
        ensure_positive("play_secs", self.play_secs)?;
        ensure_positive("transition_secs", self.transition_secs)?;
        ensure_positive("finished_secs", self.finished_secs)?;
        ensure_positive("craft_max_health", self.craft_max_health)?;
        ensure_positive("craft_min_distance", self.craft_min_distance)?;
        ensure_in_range(
            "craft_max_distance",
            self.craft_max_distance,
            self.craft_min_distance,
            f32::MAX,
            "[craft_min_distance, ∞)",
        )?;
        ensure_in_range(
            "orientation_smoothing",
            self.orientation_smoothing,
            0.0,
            1.0,
            "[0, 1]",
        )?;
        ensure_in_range(
            "distance_smoothing",
            self.distance_smoothing,
            0.0,
            1.0,
            "[0, 1]",
        )?;
        // Random spawn ranges are symmetric around zero
        ensure_non_negative("initial_angle_jitter", self.initial_angle_jitter)?;
        ensure_positive("loadout_max_secs", self.loadout_max_secs)?;
        ensure_in_range(
            "asteroid_health_max",
            self.asteroid_health_max as f32,
            self.asteroid_health_min as f32,
            f32::MAX,
            "[asteroid_health_min, ∞)",
        )?;
        ensure_non_negative("asteroid_drift", self.asteroid_drift)?;
        ensure_non_negative("asteroid_nudge", self.asteroid_nudge)?;
        ensure_positive("asteroid_speed", self.asteroid_speed)?;
        ensure_positive("rocket_speed", self.rocket_speed)?;
        ensure_positive("bonus_respawn_min", self.bonus_respawn_min)?;
        ensure_in_range(
            "bonus_respawn_max",
            self.bonus_respawn_max,
            self.bonus_respawn_min,
            f32::MAX,
            "[bonus_respawn_min, ∞)",
        )?;
        ensure_positive("bonus_lifetime", self.bonus_lifetime)?;
        ensure_non_negative("bonus_pitch_range_deg", self.bonus_pitch_range_deg)?;
        ensure_non_negative("bonus_drift", self.bonus_drift)?;
        ensure_positive("max_rumble_secs", self.max_rumble_secs)?;
        ensure_positive("max_shake_secs", self.max_shake_secs)?;
        ensure_positive("station_max_health", self.station_max_health)
    }

    pub fn pitch_limit(&self) -> f32 {
        self.pitch_limit_deg.to_radians()
    }
}
