//! Bot pilots
//!
//! Pure functions that turn what a bot can see into a controller snapshot.
//! No state is kept between frames; behavior is fixed per difficulty tier.

use glam::Vec2;

use super::input::ControlInput;
use crate::{Polar, normalize_angle};
use crate::consts::STICK_MAX_VALUE;
use crate::settings::AiDifficulty;

/// Bots recentre pitch once it drifts past this (radians)
const PITCH_RECENTER_THRESHOLD: f32 = 0.25;
/// Stick gain for cursor avoidance and pitch recentring
const AVOID_GAIN: f32 = 100.0;
/// Stick gain for bonus seeking (polar-space error is small)
const SEEK_GAIN: f32 = 1000.0;

/// Behavior profile for a difficulty tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiProfile {
    /// Fraction of the screen, per side, outside which the bot feels safe
    pub safe_margin: f32,
    /// Dodge the turret's machine-gun cursor instead of the screen centre
    pub track_gun_cursor: bool,
    pub fire_asteroids: bool,
    pub activate_bonuses: bool,
    pub fire_rockets: bool,
    pub seek_bonuses: bool,
    /// Use C-up/C-down to back off when threatened and close in otherwise
    pub maneuver: bool,
}

/// Get the behavioral profile for a given tier.
pub fn get_profile(difficulty: AiDifficulty) -> AiProfile {
    match difficulty {
        AiDifficulty::Easy => AiProfile {
            safe_margin: 0.45,
            track_gun_cursor: false,
            fire_asteroids: true,
            activate_bonuses: false,
            fire_rockets: false,
            seek_bonuses: false,
            maneuver: false,
        },
        AiDifficulty::Medium => AiProfile {
            safe_margin: 0.3,
            track_gun_cursor: false,
            fire_asteroids: true,
            activate_bonuses: true,
            fire_rockets: false,
            seek_bonuses: true,
            maneuver: false,
        },
        AiDifficulty::Hard => AiProfile {
            safe_margin: 0.2,
            track_gun_cursor: true,
            fire_asteroids: true,
            activate_bonuses: true,
            fire_rockets: true,
            seek_bonuses: true,
            maneuver: true,
        },
        AiDifficulty::Max => AiProfile {
            safe_margin: 0.12,
            track_gun_cursor: true,
            fire_asteroids: true,
            activate_bonuses: true,
            fire_rockets: true,
            seek_bonuses: true,
            maneuver: true,
        },
    }
}

/// What a bot perceives on one frame
#[derive(Debug, Clone)]
pub struct Perception<'a> {
    pub difficulty: AiDifficulty,
    /// The craft's rendered (smoothed) position
    pub craft: Polar,
    /// The craft projected to the screen
    pub craft_screen: Vec2,
    /// Whether the craft is in the half-space the station faces
    pub faces_station: bool,
    /// Aim cursor on screen (used from Hard up; below that the centre is used)
    pub cursor_screen: Vec2,
    pub screen_size: Vec2,
    /// Polar positions of live bonuses
    pub bonuses: &'a [Polar],
}

/// Compute the bot's controller input for this frame
pub fn decide(p: &Perception<'_>) -> ControlInput {
    let profile = get_profile(p.difficulty);
    let mut out = ControlInput::default();

    out.held.z = profile.fire_asteroids;
    if profile.activate_bonuses {
        out.pressed.a = true;
        out.pressed.b = true;
    }
    if profile.fire_rockets {
        out.held.l = true;
        out.held.r = true;
    }

    let center = p.screen_size * 0.5;
    let cursor = if profile.track_gun_cursor {
        p.cursor_screen
    } else {
        center
    };
    // Craft position with the cursor moved to the screen centre
    let rel = p.craft_screen - (cursor - center);
    let border = p.screen_size * profile.safe_margin;
    let in_danger_zone = rel.x >= border.x
        && rel.y >= border.y
        && rel.x <= p.screen_size.x - border.x
        && rel.y <= p.screen_size.y - border.y;

    if in_danger_zone && p.faces_station {
        // Steer straight away from the cursor (screen +Y is down, pitch up is up)
        out.stick_x = stick((rel.x - center.x) * AVOID_GAIN);
        out.stick_y = stick((rel.y - center.y) * AVOID_GAIN);
        if profile.maneuver {
            out.pressed.c_up = true;
            out.held.c_up = true;
        }
        return out;
    }

    if p.craft.pitch.abs() > PITCH_RECENTER_THRESHOLD {
        out.stick_y = stick(p.craft.pitch * AVOID_GAIN);
    }

    if profile.seek_bonuses {
        if let Some(target) = nearest_bonus(&p.craft, p.bonuses) {
            // Short way round
            out.stick_x = stick(SEEK_GAIN * normalize_angle(target.yaw - p.craft.yaw));
            out.stick_y = stick(-SEEK_GAIN * (target.pitch - p.craft.pitch));
        }
    }

    if profile.maneuver {
        out.pressed.c_down = true;
        out.held.c_down = true;
    }
    out
}

fn nearest_bonus<'a>(from: &Polar, bonuses: &'a [Polar]) -> Option<&'a Polar> {
    bonuses
        .iter()
        .map(|b| (b, b.distance(from)))
        .fold(None, |best: Option<(&Polar, f32)>, (b, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((b, d)),
        })
        .map(|(b, _)| b)
}

#[inline]
fn stick(value: f32) -> f32 {
    value.clamp(-STICK_MAX_VALUE, STICK_MAX_VALUE)
}
