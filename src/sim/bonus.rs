//! Timed pickups drifting around the station
//!
//! A randomized timer tries to spawn one bonus per expiry. Each bonus drifts
//! in polar space until its lifetime runs out or somebody picks it up.
//! Proximity testing is done by whoever calls [`BonusPool::apply`].

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::SlotPool;
use super::station::{Loadout, Station};
use super::state::ScoreTable;
use crate::consts::MAX_BONUSES;
use crate::tuning::SimTuning;
use crate::{PlayerId, Polar};

/// Bonus types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    /// Extra rockets
    Rockets,
    /// Full powerup charge
    Upgrade,
    /// Full shield charge
    Shield,
    /// Flat score
    Points,
}

impl BonusKind {
    pub const ALL: [BonusKind; 4] = [
        BonusKind::Rockets,
        BonusKind::Upgrade,
        BonusKind::Shield,
        BonusKind::Points,
    ];
}

/// A bonus entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub kind: BonusKind,
    pub polar: Polar,
    /// Seconds until it disappears
    pub time: f32,
    /// Drift in pitch and yaw (radians/sec)
    pub pitch_speed: f32,
    pub yaw_speed: f32,
}

/// Who receives a bonus. Either or both of station and craft may be set.
pub struct Recipient<'a> {
    pub player: PlayerId,
    pub station: Option<&'a mut Station>,
    pub craft: Option<&'a mut Loadout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BonusRules {
    first_spawn: f32,
    respawn_min: f32,
    respawn_max: f32,
    lifetime: f32,
    pitch_range: f32,
    radius: f32,
    drift: f32,
    points: u64,
    craft_rockets: u32,
    station_rockets: u32,
    loadout_max: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusPool {
    pub slots: SlotPool<Bonus>,
    /// Seconds until the next spawn attempt
    next_spawn: f32,
    rules: BonusRules,
}

impl BonusPool {
    pub fn new(tuning: &SimTuning) -> Self {
        let rules = BonusRules {
            first_spawn: tuning.bonus_first_spawn,
            respawn_min: tuning.bonus_respawn_min,
            respawn_max: tuning.bonus_respawn_max,
            lifetime: tuning.bonus_lifetime,
            pitch_range: tuning.bonus_pitch_range_deg.to_radians(),
            radius: tuning.bonus_radius,
            drift: tuning.bonus_drift,
            points: tuning.bonus_points,
            craft_rockets: tuning.bonus_craft_rockets,
            station_rockets: tuning.bonus_station_rockets,
            loadout_max: tuning.loadout_max_secs,
        };
        Self {
            slots: SlotPool::new(MAX_BONUSES),
            next_spawn: rules.first_spawn,
            rules,
        }
    }

    /// Clear all bonuses and re-arm the first spawn
    pub fn init(&mut self) {
        self.slots.clear();
        self.next_spawn = self.rules.first_spawn;
    }

    pub fn close(&mut self) {
        self.slots.clear();
    }

    pub fn next_spawn(&self) -> f32 {
        self.next_spawn
    }

    /// Advance the spawn timer and drift/expire live bonuses.
    /// Returns the slot of a newly spawned bonus, if any.
    pub fn update(&mut self, dt: f32, rng: &mut Pcg32) -> Option<usize> {
        self.next_spawn -= dt;
        let spawned = if self.next_spawn <= 0.0 {
            self.next_spawn = rng.random_range(self.rules.respawn_min..=self.rules.respawn_max);
            self.spawn(rng)
        } else {
            None
        };

        self.slots.retain_mut(|_, bonus| {
            bonus.time -= dt;
            bonus.polar.pitch += bonus.pitch_speed * dt;
            bonus.polar.yaw += bonus.yaw_speed * dt;
            bonus.time > 0.0
        });

        spawned
    }

    fn spawn(&mut self, rng: &mut Pcg32) -> Option<usize> {
        // Consume no randomness when there is no room
        self.slots.first_free()?;
        let r = &self.rules;
        let bonus = Bonus {
            kind: BonusKind::ALL[rng.random_range(0..BonusKind::ALL.len())],
            polar: Polar::new(
                rng.random_range(-r.pitch_range..=r.pitch_range),
                rng.random_range(-std::f32::consts::PI..=std::f32::consts::PI),
                r.radius,
            ),
            time: r.lifetime,
            pitch_speed: rng.random_range(-r.drift..=r.drift),
            yaw_speed: rng.random_range(-r.drift..=r.drift),
        };
        let slot = self.slots.claim(bonus);
        if let Some(index) = slot {
            log::debug!("Bonus {:?} spawned in slot {}", bonus.kind, index);
        }
        slot
    }

    /// Grant bonus `index` to `to` and remove it. Returns the kind applied,
    /// or `None` for a free or out-of-range slot.
    pub fn apply(
        &mut self,
        index: usize,
        mut to: Recipient<'_>,
        scores: &mut ScoreTable,
    ) -> Option<BonusKind> {
        let bonus = self.slots.release(index)?;
        let r = &self.rules;
        match bonus.kind {
            BonusKind::Points => {
                if let Some(score) = scores.get_mut(to.player) {
                    *score += r.points;
                }
            }
            BonusKind::Upgrade => {
                if let Some(station) = to.station.as_deref_mut() {
                    station.arm.powerup = r.loadout_max;
                }
                if let Some(craft) = to.craft.as_deref_mut() {
                    craft.powerup = r.loadout_max;
                }
            }
            BonusKind::Shield => {
                if let Some(station) = to.station.as_deref_mut() {
                    station.arm.shield = r.loadout_max;
                }
                if let Some(craft) = to.craft.as_deref_mut() {
                    craft.shield = r.loadout_max;
                }
            }
            BonusKind::Rockets => {
                if let Some(station) = to.station.as_deref_mut() {
                    station.arm.rocket_count += r.station_rockets;
                }
                if let Some(craft) = to.craft.as_deref_mut() {
                    craft.rocket_count += r.craft_rockets;
                }
            }
        }
        log::debug!(
            "Bonus {:?} in slot {} applied to player {}",
            bonus.kind,
            index,
            to.player
        );
        Some(bonus.kind)
    }
}
