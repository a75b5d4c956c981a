//! Transient feedback: explosion markers, rumble, screen shake, ambient light
//!
//! Nothing here affects gameplay. Markers live in fixed pools and expire on
//! their own; rumble and shake are countdowns that accumulate when re-added.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::color::Rgba;
use super::pool::SlotPool;
use crate::Port;
use crate::consts::{MAX_EFFECTS, MAX_PLAYERS};
use crate::tuning::SimTuning;

/// A short-lived explosion marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Vec3,
    pub color: Rgba,
    /// Seconds remaining
    pub time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct EffectTiming {
    explosion_3d: f32,
    explosion_2d: f32,
    ambient_fade: u8,
    max_rumble: f32,
    max_shake: f32,
}

/// One-shot feedback bundle fired when something blows up
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub position: Vec3,
    pub color: Rgba,
    /// Rumble target and duration
    pub rumble: (Port, f32),
    pub shake: f32,
    pub light: Rgba,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedEffectPool {
    pub exp3d: SlotPool<Marker>,
    pub exp2d: SlotPool<Marker>,
    rumble: [f32; MAX_PLAYERS],
    shake: f32,
    ambient: Rgba,
    timing: EffectTiming,
}

impl TimedEffectPool {
    pub fn new(tuning: &SimTuning) -> Self {
        Self {
            exp3d: SlotPool::new(MAX_EFFECTS),
            exp2d: SlotPool::new(MAX_EFFECTS),
            rumble: [0.0; MAX_PLAYERS],
            shake: 0.0,
            ambient: Rgba::BLACK,
            timing: EffectTiming {
                explosion_3d: tuning.explosion_3d_secs,
                explosion_2d: tuning.explosion_2d_secs,
                ambient_fade: tuning.ambient_fade,
                max_rumble: tuning.max_rumble_secs,
                max_shake: tuning.max_shake_secs,
            },
        }
    }

    /// Reset for a new round
    pub fn init(&mut self) {
        self.close();
        self.ambient = Rgba::BLACK;
    }

    /// Drop every marker and silence rumble/shake
    pub fn close(&mut self) {
        self.exp3d.clear();
        self.exp2d.clear();
        self.stop_rumble_and_shake();
    }

    pub fn stop_rumble_and_shake(&mut self) {
        self.rumble = [0.0; MAX_PLAYERS];
        self.shake = 0.0;
    }

    /// Spawn a 3D explosion marker; dropped if the pool is full
    pub fn add_3d(&mut self, position: Vec3, color: Rgba) -> Option<usize> {
        let slot = self.exp3d.claim(Marker {
            position,
            color,
            time: self.timing.explosion_3d,
        });
        if slot.is_none() {
            log::trace!("3D effect pool full, marker dropped");
        }
        slot
    }

    /// Spawn a 2D (sprite) explosion marker, always fully opaque
    pub fn add_2d(&mut self, position: Vec3, color: Rgba) -> Option<usize> {
        let slot = self.exp2d.claim(Marker {
            position,
            color: color.with_alpha(255),
            time: self.timing.explosion_2d,
        });
        if slot.is_none() {
            log::trace!("2D effect pool full, marker dropped");
        }
        slot
    }

    /// Extend rumble on `port`; unknown ports are ignored
    pub fn add_rumble(&mut self, port: Port, secs: f32) {
        if let Some(time) = self.rumble.get_mut(port) {
            *time = (*time + secs.max(0.0)).min(self.timing.max_rumble);
        }
    }

    pub fn add_shake(&mut self, secs: f32) {
        self.shake = (self.shake + secs.max(0.0)).min(self.timing.max_shake);
    }

    pub fn add_ambient(&mut self, light: Rgba) {
        self.ambient = self.ambient.saturating_add(light);
    }

    /// Explosion marker plus rumble, shake and light in one call
    pub fn burst(&mut self, burst: &Burst) {
        self.add_3d(burst.position, burst.color);
        self.add_rumble(burst.rumble.0, burst.rumble.1);
        if burst.shake > 0.0 {
            self.add_shake(burst.shake);
        }
        self.add_ambient(burst.light);
    }

    pub fn update(&mut self, dt: f32) {
        self.exp3d.retain_mut(|_, m| {
            m.time -= dt;
            m.time > 0.0
        });
        self.exp2d.retain_mut(|_, m| {
            m.time -= dt;
            m.time > 0.0
        });
        for time in &mut self.rumble {
            *time = (*time - dt).max(0.0);
        }
        self.shake = (self.shake - dt).max(0.0);
        self.ambient = self.ambient.saturating_sub(self.timing.ambient_fade);
    }

    pub fn rumble_time(&self, port: Port) -> f32 {
        self.rumble.get(port).copied().unwrap_or(0.0)
    }

    /// Whether the controller on `port` should be vibrating
    pub fn rumble_active(&self, port: Port) -> bool {
        self.rumble_time(port) > 0.0
    }

    pub fn shake_time(&self) -> f32 {
        self.shake
    }

    pub fn ambient(&self) -> Rgba {
        self.ambient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pool() -> TimedEffectPool {
        TimedEffectPool::new(&SimTuning::default())
    }

    #[test]
    fn test_markers_expire() {
        let mut fx = pool();
        fx.add_3d(Vec3::ZERO, Rgba::WHITE);
        fx.add_2d(Vec3::ZERO, Rgba::new(10, 20, 30, 0));
        assert_eq!(fx.exp2d.get(0).map(|m| m.color.a), Some(255));

        fx.update(1.7);
        assert_eq!(fx.exp3d.active_count(), 1);
        assert_eq!(fx.exp2d.active_count(), 0);
        fx.update(0.4);
        assert_eq!(fx.exp3d.active_count(), 0);
    }

    #[test]
    fn test_full_pool_drops_marker() {
        let mut fx = pool();
        for _ in 0..MAX_EFFECTS {
            assert!(fx.add_3d(Vec3::ZERO, Rgba::WHITE).is_some());
        }
        assert_eq!(fx.add_3d(Vec3::ONE, Rgba::WHITE), None);
        assert_eq!(fx.exp3d.active_count(), MAX_EFFECTS);
    }

    #[test]
    fn test_rumble_accumulates() {
        let mut fx = pool();
        fx.add_rumble(1, 0.45);
        fx.add_rumble(1, 0.75);
        assert!((fx.rumble_time(1) - 1.2).abs() < 1e-5);
        assert!(fx.rumble_active(1));
        assert!(!fx.rumble_active(0));
        fx.update(1.3);
        assert_eq!(fx.rumble_time(1), 0.0);
        assert!(!fx.rumble_active(1));
        // Unknown port is ignored
        fx.add_rumble(17, 1.0);
    }

    #[test]
    fn test_ambient_fades_to_zero() {
        let mut fx = pool();
        fx.add_ambient(Rgba::new(50, 50, 25, 0));
        fx.add_ambient(Rgba::new(0, 0, 100, 0));
        assert_eq!(fx.ambient(), Rgba::new(50, 50, 125, 0));
        fx.update(0.016);
        assert_eq!(fx.ambient(), Rgba::new(38, 38, 113, 0));
        for _ in 0..20 {
            fx.update(0.016);
        }
        assert_eq!(fx.ambient(), Rgba::BLACK);
    }

    #[test]
    fn test_close_silences() {
        let mut fx = pool();
        fx.add_shake(1.0);
        fx.add_rumble(0, 1.0);
        fx.add_3d(Vec3::ZERO, Rgba::WHITE);
        fx.close();
        assert_eq!(fx.shake_time(), 0.0);
        assert!(!fx.rumble_active(0));
        assert_eq!(fx.exp3d.active_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_timers_stay_bounded(
            adds in prop::collection::vec((0usize..4, 0.0f32..3.0, 0.0f32..3.0), 1..40),
            dt in 0.001f32..0.1,
        ) {
            let tuning = SimTuning::default();
            let mut fx = pool();
            for (port, rumble, shake) in adds {
                fx.add_rumble(port, rumble);
                fx.add_shake(shake);
                fx.update(dt);
                for p in 0..MAX_PLAYERS {
                    let t = fx.rumble_time(p);
                    prop_assert!((0.0..=tuning.max_rumble_secs).contains(&t));
                }
                prop_assert!((0.0..=tuning.max_shake_secs).contains(&fx.shake_time()));
            }
        }
    }
}
