//! Attacking crafts
//!
//! One craft per seat other than the defending player. Humans drive theirs
//! from a controller port, bots from [`ai::decide`]; both go through the
//! same [`ControlInput`] so the update path is identical.
//!
//! Orientation and distance have a target (moved by input, clamped) and a
//! rendered follower that eases toward it. The follower is never clamped on
//! its own.

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::{self, Perception};
use super::bonus::{BonusKind, BonusPool, Recipient};
use super::color::{Rgba, ambient, player_color};
use super::effects::{Burst, TimedEffectPool};
use super::input::{Buttons, ControlInput, TickInput};
use super::projectile::{FireOrder, ImpactContext, ProjectileKind, ProjectilePool};
use super::state::{GameEvent, ScoreTable, Sound};
use super::station::{Loadout, Station};
use super::view::ScreenProjector;
use crate::consts::{MAX_PLAYERS, NUM_CRAFTS};
use crate::settings::{AiDifficulty, Settings};
use crate::tuning::SimTuning;
use crate::{PlayerId, Polar, Port, lerp, polar_to_world};

/// Distance the station's gun cursor is projected out to
const CURSOR_DISTANCE: f32 = 1000.0;
const ROCKET_LAUNCH_RUMBLE: f32 = 0.45;
const DESTROYED_RUMBLE: f32 = 1.25;
const DESTROYED_SHAKE: f32 = 1.25;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CraftRules {
    max_health: f32,
    initial_distance: f32,
    min_distance: f32,
    max_distance: f32,
    distance_rate: f32,
    orientation_smoothing: f32,
    distance_smoothing: f32,
    pitch_limit: f32,
    steer_rate: f32,
    steer_rate_powered: f32,
    angle_jitter: f32,
    world_scale: f32,
    loadout_max: f32,
    first_asteroid_delay: f32,
    pickup_distance: f32,
    impact_radius: f32,
    score_per_damage: f32,
    explosion_scale: f32,
}

impl CraftRules {
    fn from_tuning(tuning: &SimTuning) -> Self {
        Self {
            max_health: tuning.craft_max_health,
            initial_distance: tuning.craft_initial_distance,
            min_distance: tuning.craft_min_distance,
            max_distance: tuning.craft_max_distance,
            distance_rate: tuning.craft_distance_rate,
            orientation_smoothing: tuning.orientation_smoothing,
            distance_smoothing: tuning.distance_smoothing,
            pitch_limit: tuning.pitch_limit(),
            steer_rate: tuning.steer_rate,
            steer_rate_powered: tuning.steer_rate_powered,
            angle_jitter: tuning.initial_angle_jitter,
            world_scale: tuning.craft_world_scale,
            loadout_max: tuning.loadout_max_secs,
            first_asteroid_delay: tuning.first_asteroid_delay,
            pickup_distance: tuning.bonus_pickup_distance,
            impact_radius: tuning.impact_radius,
            score_per_damage: tuning.score_per_damage,
            explosion_scale: tuning.explosion_world_scale,
        }
    }
}

/// A combat craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Craft {
    pub player: PlayerId,
    pub port: Port,
    /// Driven by the AI instead of a controller
    pub bot: bool,
    pub color: Rgba,
    /// Steering targets (radians)
    pub yaw: f32,
    pub pitch: f32,
    /// Rendered orientation following the targets
    pub yaw_off: f32,
    pub pitch_off: f32,
    pub distance: f32,
    pub distance_off: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub arm: Loadout,
    pub asteroids: ProjectilePool,
    pub rockets: ProjectilePool,
    pub enabled: bool,
}

impl Craft {
    fn new(player: PlayerId, tuning: &SimTuning) -> Self {
        Self {
            player,
            port: player,
            bot: true,
            color: player_color(player),
            yaw: 0.0,
            pitch: 0.0,
            yaw_off: 0.0,
            pitch_off: 0.0,
            distance: tuning.craft_initial_distance,
            distance_off: tuning.craft_initial_distance,
            hp: tuning.craft_max_health,
            max_hp: tuning.craft_max_health,
            arm: Loadout::default(),
            asteroids: ProjectilePool::new(ProjectileKind::Asteroid, tuning),
            rockets: ProjectilePool::new(ProjectileKind::Rocket, tuning),
            enabled: false,
        }
    }

    /// Rendered position around the station
    pub fn polar(&self) -> Polar {
        Polar::new(self.pitch_off, self.yaw_off, self.distance_off)
    }

    pub fn world_position(&self, scale: f32) -> Vec3 {
        self.polar().to_world(scale)
    }

    pub fn is_alive(&self) -> bool {
        self.enabled && self.hp > 0.0
    }

    /// Damage from the station's defenses; ignored once the craft is gone
    pub fn apply_damage(&mut self, amount: f32) {
        if self.enabled {
            self.hp = (self.hp - amount.max(0.0)).max(0.0);
        }
    }

    fn update(
        &mut self,
        index: usize,
        dt: f32,
        control: &ControlInput,
        rules: &CraftRules,
        ctx: &mut CraftContext<'_>,
    ) {
        if self.hp <= 0.0 {
            self.destroy(index, rules, ctx);
            return;
        }

        self.steer(dt, control, rules);

        if run_timer(&mut self.arm.shield, rules.loadout_max, control.pressed.a, dt) {
            ctx.effects.add_ambient(ambient::SHIELD);
            ctx.events.push(GameEvent::SoundCue(Sound::ShieldUse));
        }
        if run_timer(&mut self.arm.powerup, rules.loadout_max, control.pressed.b, dt) {
            ctx.effects.add_ambient(ambient::POWERUP);
            ctx.events.push(GameEvent::SoundCue(Sound::PowerupUse));
        }

        if ctx.weapons_live {
            self.fire(control, ctx);
        }

        self.pick_up_bonuses(rules, ctx);
    }

    fn steer(&mut self, dt: f32, control: &ControlInput, rules: &CraftRules) {
        let rate = if self.arm.powerup > 0.0 {
            rules.steer_rate_powered
        } else {
            rules.steer_rate
        };
        // Stick up lowers pitch, like the station's turret
        self.yaw += (control.stick_x * rate).to_radians() * dt;
        self.pitch = (self.pitch - (control.stick_y * rate).to_radians() * dt)
            .clamp(-rules.pitch_limit, rules.pitch_limit);

        if control.held.c_up {
            self.distance += rules.distance_rate * dt;
        }
        if control.held.c_down {
            self.distance -= rules.distance_rate * dt;
        }
        self.distance = self.distance.clamp(rules.min_distance, rules.max_distance);

        self.yaw_off = lerp(self.yaw_off, self.yaw, rules.orientation_smoothing);
        self.pitch_off = lerp(self.pitch_off, self.pitch, rules.orientation_smoothing);
        self.distance_off = lerp(self.distance_off, self.distance, rules.distance_smoothing);
    }

    fn fire(&mut self, control: &ControlInput, ctx: &mut CraftContext<'_>) {
        let order = FireOrder {
            now: ctx.now,
            origin: self.polar(),
            nudge: dpad(&control.held),
        };

        if control.held.z
            && self
                .asteroids
                .fire(&order, &mut self.arm.rocket_count, ctx.rng)
                .is_some()
        {
            ctx.effects.add_ambient(ambient::ASTEROID_LAUNCH);
            ctx.events.push(GameEvent::SoundCue(Sound::AsteroidLaunch));
        }

        if (control.held.l || control.held.r)
            && self
                .rockets
                .fire(&order, &mut self.arm.rocket_count, ctx.rng)
                .is_some()
        {
            ctx.effects.add_rumble(self.port, ROCKET_LAUNCH_RUMBLE);
            ctx.effects.add_ambient(ambient::EXPLOSION);
            ctx.events.push(GameEvent::SoundCue(Sound::RocketLaunch));
        }
    }

    fn pick_up_bonuses(&mut self, rules: &CraftRules, ctx: &mut CraftContext<'_>) {
        let touching: Vec<usize> = ctx
            .bonuses
            .slots
            .iter()
            .filter(|(_, bonus)| {
                let here = polar_to_world(self.pitch_off, self.yaw_off, bonus.polar.radius);
                here.distance(bonus.polar.to_world(1.0)) < rules.pickup_distance
            })
            .map(|(index, _)| index)
            .collect();

        for index in touching {
            let to = Recipient {
                player: self.player,
                station: None,
                craft: Some(&mut self.arm),
            };
            if let Some(kind) = ctx.bonuses.apply(index, to, ctx.scores) {
                let cue = match kind {
                    BonusKind::Points => Sound::PickupPoints,
                    BonusKind::Upgrade | BonusKind::Shield => Sound::PickupCharge,
                    BonusKind::Rockets => Sound::PickupAmmo,
                };
                ctx.events.push(GameEvent::SoundCue(cue));
            }
        }
    }

    fn destroy(&mut self, index: usize, rules: &CraftRules, ctx: &mut CraftContext<'_>) {
        self.enabled = false;
        self.hp = 0.0;
        ctx.effects.burst(&Burst {
            position: self.world_position(rules.world_scale),
            color: self.color,
            rumble: (self.port, DESTROYED_RUMBLE),
            shake: DESTROYED_SHAKE,
            light: ambient::EXPLOSION,
        });
        ctx.events.push(GameEvent::SoundCue(Sound::Explosion));
        ctx.events.push(GameEvent::CraftDestroyed { craft: index });
        log::debug!("Craft {} (player {}) destroyed", index, self.player + 1);
    }
}

/// Start a full timer on `activate`, then drain it once below full.
/// Returns true on the activation edge.
fn run_timer(timer: &mut f32, max: f32, activate: bool, dt: f32) -> bool {
    let activated = activate && *timer >= max;
    if activated || (*timer > 0.0 && *timer < max) {
        *timer = (*timer - dt).clamp(0.0, max);
    }
    activated
}

/// D-pad as a launch nudge (x = yaw, y = pitch)
fn dpad(held: &Buttons) -> Vec2 {
    let axis = |pos: bool, neg: bool| pos as i8 as f32 - neg as i8 as f32;
    Vec2::new(
        axis(held.d_right, held.d_left),
        axis(held.d_up, held.d_down),
    )
}

/// Shared state a craft update reads and writes
pub struct CraftContext<'a> {
    /// Simulation clock, for weapon cooldowns
    pub now: f32,
    /// Weapons only fire during Play
    pub weapons_live: bool,
    pub difficulty: AiDifficulty,
    pub station: &'a mut Station,
    pub bonuses: &'a mut BonusPool,
    pub effects: &'a mut TimedEffectPool,
    pub scores: &'a mut ScoreTable,
    pub events: &'a mut Vec<GameEvent>,
    pub rng: &'a mut Pcg32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CraftPool {
    pub crafts: Vec<Craft>,
    rules: CraftRules,
}

impl CraftPool {
    pub fn new(tuning: &SimTuning) -> Self {
        Self {
            crafts: (0..NUM_CRAFTS)
                .map(|i| Craft::new(i + 1, tuning))
                .collect(),
            rules: CraftRules::from_tuning(tuning),
        }
    }

    /// Seat a craft for every player except `station_player`. Seats past
    /// the human player count are bots.
    pub fn init(&mut self, station_player: PlayerId, settings: &Settings, now: f32, rng: &mut Pcg32) {
        let r = &self.rules;
        let seats = (0..MAX_PLAYERS).filter(|p| *p != station_player);
        for (craft, player) in self.crafts.iter_mut().zip(seats) {
            craft.player = player;
            craft.port = player;
            craft.bot = !settings.is_human(player);
            craft.color = player_color(player);
            craft.yaw = rng.random_range(-r.angle_jitter..=r.angle_jitter);
            craft.pitch = rng.random_range(-r.angle_jitter..=r.angle_jitter);
            craft.yaw_off = craft.yaw;
            craft.pitch_off = craft.pitch;
            craft.distance = r.initial_distance;
            craft.distance_off = r.initial_distance;
            craft.hp = r.max_health;
            craft.max_hp = r.max_health;
            craft.arm = Loadout::default();
            craft.asteroids.init(now + r.first_asteroid_delay);
            craft.rockets.init(now);
            craft.enabled = true;
            log::debug!(
                "Craft for player {} ({})",
                player + 1,
                if craft.bot { "bot" } else { "human" }
            );
        }
    }

    pub fn close(&mut self) {
        for craft in &mut self.crafts {
            craft.enabled = false;
            craft.asteroids.close();
            craft.rockets.close();
        }
    }

    pub fn alive_count(&self) -> usize {
        self.crafts.iter().filter(|c| c.is_alive()).count()
    }

    pub fn any_alive(&self) -> bool {
        self.crafts.iter().any(Craft::is_alive)
    }

    /// Update every craft and its projectiles. Projectiles keep flying
    /// after their craft is destroyed.
    pub fn update(
        &mut self,
        dt: f32,
        input: &TickInput,
        view: &dyn ScreenProjector,
        ctx: &mut CraftContext<'_>,
    ) {
        let rules = &self.rules;
        for (index, craft) in self.crafts.iter_mut().enumerate() {
            if craft.enabled {
                let control = if craft.bot {
                    bot_input(craft, view, rules, ctx)
                } else {
                    input.port(craft.port).clamped()
                };
                craft.update(index, dt, &control, rules, ctx);
            }

            let mut impact = ImpactContext {
                station: &mut *ctx.station,
                effects: &mut *ctx.effects,
                scores: &mut *ctx.scores,
                events: &mut *ctx.events,
                attacker: craft.player,
                impact_radius: rules.impact_radius,
                score_per_damage: rules.score_per_damage,
                explosion_scale: rules.explosion_scale,
            };
            craft.asteroids.update(dt, &mut impact);
            craft.rockets.update(dt, &mut impact);
        }
    }
}

fn bot_input(
    craft: &Craft,
    view: &dyn ScreenProjector,
    rules: &CraftRules,
    ctx: &CraftContext<'_>,
) -> ControlInput {
    let world = craft.world_position(rules.world_scale);
    let forward = ctx.station.forward();
    let bonuses: Vec<Polar> = ctx.bonuses.slots.iter().map(|(_, b)| b.polar).collect();
    ai::decide(&Perception {
        difficulty: ctx.difficulty,
        craft: craft.polar(),
        craft_screen: view.project(world),
        faces_station: world.dot(forward) > 0.0,
        cursor_screen: view.project(forward * CURSOR_DISTANCE),
        screen_size: view.screen_size(),
        bonuses: &bonuses,
    })
}
