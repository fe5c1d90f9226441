use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Perspective camera owned by the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(250.0, 120.0, 0.0),
            target: Vec3::new(0.0, 75.0, 60.0),
            fov_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 2000.0,
        }
    }
}

impl Camera {
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Recompute the aspect ratio for a viewport. Zero heights are treated as one.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Unit vector from the camera position towards its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}
