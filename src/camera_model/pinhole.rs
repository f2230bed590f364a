use glam::Vec3;
use nalgebra as na;
use serde::{Deserialize, Serialize};

use super::generic::CameraProjection;

/// Ideal pinhole camera looking down its local `+z`, `x` right and `y` up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinholeCamera {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
    pub width: u32,
    pub height: u32,
    /// Camera pose in world coordinates.
    pub world_from_camera: na::Isometry3<f32>,
}

impl PinholeCamera {
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32, width: u32, height: u32) -> PinholeCamera {
        PinholeCamera {
            fx,
            fy,
            cx,
            cy,
            width,
            height,
            world_from_camera: na::Isometry3::identity(),
        }
    }

    /// Centered principal point with the given horizontal field of view.
    pub fn from_fov(hfov_rad: f32, width: u32, height: u32) -> PinholeCamera {
        let f = width as f32 * 0.5 / (hfov_rad * 0.5).tan();
        PinholeCamera::new(f, f, width as f32 * 0.5, height as f32 * 0.5, width, height)
    }

    pub fn set_pose(&mut self, world_from_camera: na::Isometry3<f32>) {
        self.world_from_camera = world_from_camera;
    }

    pub fn with_pose(mut self, world_from_camera: na::Isometry3<f32>) -> PinholeCamera {
        self.world_from_camera = world_from_camera;
        self
    }
}

impl CameraProjection for PinholeCamera {
    fn world_to_screen(&self, world: Vec3) -> Vec3 {
        let p = self
            .world_from_camera
            .inverse_transform_point(&na::Point3::new(world.x, world.y, world.z));
        if p.z.abs() < f32::EPSILON {
            return Vec3::new(f32::NAN, f32::NAN, p.z);
        }
        Vec3::new(
            self.fx * p.x / p.z + self.cx,
            self.fy * p.y / p.z + self.cy,
            p.z,
        )
    }

    fn pixel_width(&self) -> u32 {
        self.width
    }

    fn pixel_height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optical_axis_hits_principal_point() {
        let cam = PinholeCamera::new(100.0, 100.0, 32.0, 24.0, 64, 48);
        let s = cam.world_to_screen(Vec3::new(0.0, 0.0, 2.0));
        assert_eq!((s.x, s.y, s.z), (32.0, 24.0, 2.0));
        assert!(cam.in_viewport(s));
    }

    #[test]
    fn pose_translation_moves_projection() {
        let cam = PinholeCamera::new(100.0, 100.0, 32.0, 24.0, 64, 48)
            .with_pose(na::Isometry3::translation(1.0, 0.0, 0.0));
        let s = cam.world_to_screen(Vec3::new(1.0, 0.0, 5.0));
        assert!((s.x - 32.0).abs() < 1e-4);
    }

    #[test]
    fn points_in_camera_plane_are_not_in_view() {
        let cam = PinholeCamera::new(100.0, 100.0, 32.0, 24.0, 64, 48);
        let s = cam.world_to_screen(Vec3::new(1.0, 1.0, 0.0));
        assert!(!cam.in_viewport(s));
    }
}
