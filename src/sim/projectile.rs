//! Asteroids and rockets launched by crafts toward the station
//!
//! Both kinds share one lifecycle: fire on a cooldown-gated edge, fall in
//! toward the station, and end either shot down (health ≤ 0) or on impact
//! (radius below the impact threshold). Only impacts damage the station
//! and score for the attacker.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::color::{Rgba, ambient};
use super::effects::{Burst, TimedEffectPool};
use super::pool::SlotPool;
use super::state::{GameEvent, ScoreTable, Sound};
use super::station::Station;
use crate::consts::MAX_PROJECTILES;
use crate::tuning::SimTuning;
use crate::{PlayerId, Polar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Slow, drifting, free to launch
    Asteroid,
    /// Fast, straight, costs one rocket
    Rocket,
}

/// Feedback fired when a projectile ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub rumble: f32,
    pub shake: f32,
    pub light: Rgba,
}

/// Per-kind parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileProfile {
    /// Seconds between launches
    pub cooldown: f32,
    /// Inclusive health range rolled at launch
    pub health: (u32, u32),
    /// Radial speed toward the station (units/sec)
    pub speed: f32,
    /// Random drift per axis at launch (radians/sec), 0 for none
    pub drift: f32,
    /// Extra drift per held D-pad direction
    pub nudge: f32,
    /// Station damage on impact
    pub damage: f32,
    pub uses_ammo: bool,
    pub downed: Feedback,
    pub impact: Feedback,
}

impl ProjectileKind {
    pub fn profile(&self, tuning: &SimTuning) -> ProjectileProfile {
        match self {
            ProjectileKind::Asteroid => ProjectileProfile {
                cooldown: tuning.asteroid_cooldown,
                health: (tuning.asteroid_health_min, tuning.asteroid_health_max),
                speed: tuning.asteroid_speed,
                drift: tuning.asteroid_drift,
                nudge: tuning.asteroid_nudge,
                damage: tuning.asteroid_damage,
                uses_ammo: false,
                downed: Feedback {
                    rumble: 0.45,
                    shake: 0.75,
                    light: ambient::EXPLOSION,
                },
                impact: Feedback {
                    rumble: 0.75,
                    shake: 1.0,
                    light: ambient::EXPLOSION,
                },
            },
            ProjectileKind::Rocket => {
                let health = tuning.rocket_health.max(0.0) as u32;
                ProjectileProfile {
                    cooldown: tuning.rocket_cooldown,
                    health: (health, health),
                    speed: tuning.rocket_speed,
                    drift: 0.0,
                    nudge: 0.0,
                    damage: tuning.rocket_damage,
                    uses_ammo: true,
                    downed: Feedback {
                        rumble: 0.45,
                        shake: 0.0,
                        light: ambient::ROCKET_DOWNED,
                    },
                    impact: Feedback {
                        rumble: 0.65,
                        shake: 1.0,
                        light: ambient::EXPLOSION,
                    },
                }
            }
        }
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub polar: Polar,
    pub pitch_speed: f32,
    pub yaw_speed: f32,
    /// Visual spin (radians)
    pub rotation: f32,
    pub hp: f32,
}

/// A launch request from a craft
#[derive(Debug, Clone, Copy)]
pub struct FireOrder {
    /// Simulation clock (seconds)
    pub now: f32,
    pub origin: Polar,
    /// D-pad direction held at launch (x = yaw, y = pitch), each in {-1, 0, 1}
    pub nudge: Vec2,
}

/// Everything an impact touches
pub struct ImpactContext<'a> {
    pub station: &'a mut Station,
    pub effects: &'a mut TimedEffectPool,
    pub scores: &'a mut ScoreTable,
    pub events: &'a mut Vec<GameEvent>,
    /// Player credited for impacts
    pub attacker: PlayerId,
    pub impact_radius: f32,
    pub score_per_damage: f32,
    pub explosion_scale: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectilePool {
    pub kind: ProjectileKind,
    pub slots: SlotPool<Projectile>,
    /// Clock time at which the next launch is allowed
    pub next_fire: f32,
    profile: ProjectileProfile,
}

impl ProjectilePool {
    pub fn new(kind: ProjectileKind, tuning: &SimTuning) -> Self {
        Self {
            kind,
            slots: SlotPool::new(MAX_PROJECTILES),
            next_fire: 0.0,
            profile: kind.profile(tuning),
        }
    }

    /// Clear all projectiles; first launch allowed at `ready_at`
    pub fn init(&mut self, ready_at: f32) {
        self.slots.clear();
        self.next_fire = ready_at;
    }

    pub fn close(&mut self) {
        self.slots.clear();
    }

    pub fn ready(&self, now: f32) -> bool {
        now >= self.next_fire
    }

    /// Launch one projectile if the cooldown has elapsed, ammunition remains
    /// (rockets) and a slot is free. A refused launch changes nothing.
    pub fn fire(&mut self, order: &FireOrder, ammo: &mut u32, rng: &mut Pcg32) -> Option<usize> {
        if !self.ready(order.now) || (self.profile.uses_ammo && *ammo == 0) {
            return None;
        }
        self.slots.first_free()?;

        let p = &self.profile;
        let (pitch_speed, yaw_speed) = if p.drift > 0.0 {
            (
                rng.random_range(-p.drift..=p.drift) + order.nudge.y * p.nudge,
                rng.random_range(-p.drift..=p.drift) + order.nudge.x * p.nudge,
            )
        } else {
            (order.nudge.y * p.nudge, order.nudge.x * p.nudge)
        };
        let rotation = if p.drift > 0.0 {
            rng.random_range(0.0..std::f32::consts::TAU)
        } else {
            0.0
        };
        let hp = rng.random_range(p.health.0..=p.health.1) as f32;

        let slot = self.slots.claim(Projectile {
            polar: order.origin,
            pitch_speed,
            yaw_speed,
            rotation,
            hp,
        })?;
        self.next_fire = order.now + self.profile.cooldown;
        if self.profile.uses_ammo {
            *ammo -= 1;
        }
        log::debug!("{:?} launched into slot {}", self.kind, slot);
        Some(slot)
    }

    /// Hit registration from the station's defenses
    pub fn register_hit(&mut self, index: usize, damage: f32) {
        if let Some(projectile) = self.slots.get_mut(index) {
            projectile.hp = (projectile.hp - damage.max(0.0)).max(0.0);
        }
    }

    pub fn update(&mut self, dt: f32, ctx: &mut ImpactContext<'_>) {
        let profile = self.profile;
        let kind = self.kind;
        self.slots.retain_mut(|index, proj| {
            proj.polar.pitch += proj.pitch_speed * dt;
            proj.polar.yaw += proj.yaw_speed * dt;
            proj.polar.radius -= profile.speed * dt;
            proj.rotation += dt;

            let position = proj.polar.to_world(ctx.explosion_scale);
            if proj.hp <= 0.0 {
                log::debug!("{:?} in slot {} shot down", kind, index);
                ctx.effects.burst(&Burst {
                    position,
                    color: Rgba::WHITE,
                    rumble: (ctx.station.port, profile.downed.rumble),
                    shake: profile.downed.shake,
                    light: profile.downed.light,
                });
                ctx.events.push(GameEvent::SoundCue(Sound::Explosion));
                return false;
            }

            if proj.polar.radius < ctx.impact_radius {
                ctx.effects.burst(&Burst {
                    position,
                    color: Rgba::WHITE,
                    rumble: (ctx.station.port, profile.impact.rumble),
                    shake: profile.impact.shake,
                    light: profile.impact.light,
                });
                ctx.events.push(GameEvent::SoundCue(Sound::Explosion));

                if !ctx.station.shield_absorbing() {
                    ctx.station.apply_damage(profile.damage);
                    if let Some(score) = ctx.scores.get_mut(ctx.attacker) {
                        *score += (profile.damage * ctx.score_per_damage) as u64;
                    }
                    ctx.events.push(GameEvent::StationHit {
                        damage: profile.damage,
                        attacker: ctx.attacker,
                    });
                    log::debug!(
                        "{:?} hit the station for {} (station hp {})",
                        kind,
                        profile.damage,
                        ctx.station.hp
                    );
                } else {
                    log::debug!("{:?} absorbed by station shield", kind);
                }
                return false;
            }
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    struct Rig {
        tuning: SimTuning,
        station: Station,
        effects: TimedEffectPool,
        scores: ScoreTable,
        events: Vec<GameEvent>,
    }

    impl Rig {
        fn new() -> Self {
            let tuning = SimTuning::default();
            Self {
                station: Station::new(0, &tuning),
                effects: TimedEffectPool::new(&tuning),
                scores: [0; 4],
                events: Vec::new(),
                tuning,
            }
        }

        fn ctx(&mut self, attacker: PlayerId) -> ImpactContext<'_> {
            ImpactContext {
                station: &mut self.station,
                effects: &mut self.effects,
                scores: &mut self.scores,
                events: &mut self.events,
                attacker,
                impact_radius: self.tuning.impact_radius,
                score_per_damage: self.tuning.score_per_damage,
                explosion_scale: self.tuning.explosion_world_scale,
            }
        }
    }

    fn order(now: f32, radius: f32) -> FireOrder {
        FireOrder {
            now,
            origin: Polar::new(0.1, 0.2, radius),
            nudge: Vec2::ZERO,
        }
    }

    #[test]
    fn test_rocket_impact_scores() {
        let mut rig = Rig::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = ProjectilePool::new(ProjectileKind::Rocket, &rig.tuning);
        let mut ammo = 2;

        assert_eq!(pool.fire(&order(0.0, 2.5), &mut ammo, &mut rng), Some(0));
        assert_eq!(ammo, 1);
        assert_eq!(pool.slots.get(0).map(|p| p.hp), Some(5.0));

        // 7 units/sec * 0.1s = 0.7 → radius 1.8 < 2.0
        pool.update(0.1, &mut rig.ctx(2));
        assert!(!pool.slots.is_enabled(0));
        assert_eq!(rig.station.hp, 35.0);
        assert_eq!(rig.scores[2], 2600);
        assert!(rig.events.contains(&GameEvent::StationHit {
            damage: 65.0,
            attacker: 2
        }));
        assert_eq!(rig.effects.exp3d.active_count(), 1);
        assert!((rig.effects.shake_time() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_running_shield_blocks_damage() {
        let mut rig = Rig::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = ProjectilePool::new(ProjectileKind::Rocket, &rig.tuning);
        let mut ammo = 1;
        rig.station.arm.shield = 6.0;

        pool.fire(&order(0.0, 2.1), &mut ammo, &mut rng);
        pool.update(0.1, &mut rig.ctx(1));
        assert!(!pool.slots.is_enabled(0));
        assert_eq!(rig.station.hp, 100.0);
        assert_eq!(rig.scores[1], 0);
        // Still explodes
        assert_eq!(rig.effects.exp3d.active_count(), 1);
    }

    #[test]
    fn test_unactivated_full_shield_does_not_block() {
        let mut rig = Rig::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = ProjectilePool::new(ProjectileKind::Asteroid, &rig.tuning);
        let mut ammo = 0;
        rig.station.arm.shield = rig.tuning.loadout_max_secs;

        pool.fire(&order(0.0, 2.1), &mut ammo, &mut rng);
        pool.update(0.1, &mut rig.ctx(1));
        assert_eq!(rig.station.hp, 50.0);
        assert_eq!(rig.scores[1], 2000);
    }

    #[test]
    fn test_rocket_needs_ammo() {
        let tuning = SimTuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = ProjectilePool::new(ProjectileKind::Rocket, &tuning);
        let mut ammo = 0;
        assert_eq!(pool.fire(&order(5.0, 90.0), &mut ammo, &mut rng), None);
        assert_eq!(ammo, 0);
        assert_eq!(pool.slots.active_count(), 0);
    }

    #[test]
    fn test_cooldown_gates_fire() {
        let tuning = SimTuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut pool = ProjectilePool::new(ProjectileKind::Asteroid, &tuning);
        pool.init(0.5);
        let mut ammo = 0;
        assert_eq!(pool.fire(&order(0.2, 90.0), &mut ammo, &mut rng), None);
        assert_eq!(pool.fire(&order(0.5, 90.0), &mut ammo, &mut rng), Some(0));
        assert_eq!(pool.fire(&order(12.0, 90.0), &mut ammo, &mut rng), None);
        assert_eq!(pool.fire(&order(12.5, 90.0), &mut ammo, &mut rng), Some(1));

        let hp = pool.slots.get(0).map(|p| p.hp).unwrap();
        assert!((5.0..=25.0).contains(&hp));
        assert_eq!(hp.fract(), 0.0);
    }

    #[test]
    fn test_full_pool_is_noop() {
        let tuning = SimTuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut pool = ProjectilePool::new(ProjectileKind::Rocket, &tuning);
        let mut ammo = 100;
        for i in 0..MAX_PROJECTILES {
            assert!(pool.fire(&order(i as f32 * 2.0, 90.0), &mut ammo, &mut rng).is_some());
        }
        let before = pool.next_fire;
        assert_eq!(pool.fire(&order(1000.0, 90.0), &mut ammo, &mut rng), None);
        assert_eq!(ammo, 100 - MAX_PROJECTILES as u32);
        assert_eq!(pool.next_fire, before);
    }

    #[test]
    fn test_shot_down_no_damage() {
        let mut rig = Rig::new();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut pool = ProjectilePool::new(ProjectileKind::Asteroid, &rig.tuning);
        let mut ammo = 0;
        let slot = pool.fire(&order(0.0, 80.0), &mut ammo, &mut rng).unwrap();

        pool.register_hit(slot, 3.0);
        assert!(pool.slots.is_enabled(slot));
        pool.register_hit(slot, 100.0);
        assert_eq!(pool.slots.get(slot).map(|p| p.hp), Some(0.0));

        pool.update(0.016, &mut rig.ctx(3));
        assert!(!pool.slots.is_enabled(slot));
        assert_eq!(rig.station.hp, 100.0);
        assert_eq!(rig.scores[3], 0);
        assert!((rig.effects.rumble_time(rig.station.port) - 0.45).abs() < 1e-6);
        assert!(rig.events.contains(&GameEvent::SoundCue(Sound::Explosion)));

        // Hits on free slots are ignored
        pool.register_hit(slot, 5.0);
    }

    #[test]
    fn test_asteroid_drifts_inward() {
        let mut rig = Rig::new();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut pool = ProjectilePool::new(ProjectileKind::Asteroid, &rig.tuning);
        let mut ammo = 0;
        let mut o = order(0.0, 90.0);
        o.nudge = Vec2::new(1.0, 0.0);
        pool.fire(&o, &mut ammo, &mut rng);
        let start = *pool.slots.get(0).unwrap();
        assert!(start.yaw_speed >= 0.03 - 0.025);

        pool.update(1.0, &mut rig.ctx(1));
        let moved = *pool.slots.get(0).unwrap();
        assert!((moved.polar.radius - 87.0).abs() < 1e-4);
        assert!((moved.polar.yaw - (start.polar.yaw + start.yaw_speed)).abs() < 1e-5);
    }
}
