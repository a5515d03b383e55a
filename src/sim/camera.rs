//! Chase camera
//!
//! Sits behind and above the craft, drifts sideways with it while a run is
//! live, and takes a one-shot sideways jolt on a crash.

use glam::{Mat4, Vec3};

/// Perspective chase camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Look direction, fixed for the whole session
    pub forward: Vec3,
    /// Vertical field of view (degrees)
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, 10.0),
            // Aimed at (0, 0, -20)
            forward: Vec3::new(0.0, -3.0, -30.0),
            fov_y: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Ease x toward a fraction of the craft's x
    pub fn follow(&mut self, player_x: f32, dt: f32) {
        self.position.x += (player_x * 0.3 - self.position.x) * dt * 5.0;
    }

    /// Knock the camera sideways by `offset`
    pub fn jolt(&mut self, offset: f32) {
        self.position.x = offset;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}
