//! World-to-screen projection seam
//!
//! The simulation only projects for AI heuristics; drawing owns its own
//! camera. Hosts pass their viewport in through [`ScreenProjector`].

use glam::{Vec2, Vec3};

/// Projects world positions into screen pixels
pub trait ScreenProjector {
    /// Screen position of `world` (pixels, origin top-left, +Y down)
    fn project(&self, world: Vec3) -> Vec2;
    /// Viewport size in pixels
    fn screen_size(&self) -> Vec2;
}

/// A pinhole camera at the origin looking along `forward`, +Y up
#[derive(Debug, Clone)]
pub struct PinholeView {
    pub size: Vec2,
    pub forward: Vec3,
    focal: f32,
}

impl PinholeView {
    pub fn new(width: f32, height: f32, fov_y_deg: f32) -> Self {
        let focal = (height * 0.5) / (fov_y_deg.to_radians() * 0.5).tan();
        Self {
            size: Vec2::new(width, height),
            forward: Vec3::Z,
            focal,
        }
    }

    pub fn set_forward(&mut self, forward: Vec3) {
        self.forward = forward.try_normalize().unwrap_or(Vec3::Z);
    }

    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let fwd = self.forward;
        let right = Vec3::Y.cross(fwd).try_normalize().unwrap_or(Vec3::X);
        let up = fwd.cross(right);
        (right, up, fwd)
    }
}

impl ScreenProjector for PinholeView {
    fn project(&self, world: Vec3) -> Vec2 {
        let (right, up, fwd) = self.basis();
        // Points behind the camera are pushed far off-screen
        let depth = world.dot(fwd).max(1e-3);
        let center = self.size * 0.5;
        Vec2::new(
            center.x + world.dot(right) / depth * self.focal,
            center.y - world.dot(up) / depth * self.focal,
        )
    }

    fn screen_size(&self) -> Vec2 {
        self.size
    }
}
