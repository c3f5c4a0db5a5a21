//! Camera transform and perspective projection.

use engine_core::{FOV_DEGREES, NEAR};
use glam::{Vec2, Vec3};

/// View state plus the target dimensions the projection maps into.
///
/// The pose here is the *smoothed* player pose; the raw simulation pose
/// never renders directly.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    /// Rotation about +Y; forward is (sin yaw, 0, cos yaw).
    pub yaw: f32,
    /// Positive looks up.
    pub pitch: f32,
    pub width: f32,
    pub height: f32,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            width,
            height,
        }
    }

    /// World-space view direction.
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cp * sy, sp, cp * cy)
    }

    /// World to camera space: inverse translation, then inverse yaw, then
    /// inverse pitch. Camera space is x right, y up, z forward (depth).
    pub fn world_to_camera(&self, p: Vec3) -> Vec3 {
        let d = p - self.position;

        let (sy, cy) = self.yaw.sin_cos();
        let x1 = d.x * cy - d.z * sy;
        let z1 = d.x * sy + d.z * cy;

        let (sp, cp) = self.pitch.sin_cos();
        let y2 = d.y * cp - z1 * sp;
        let z2 = d.y * sp + z1 * cp;

        Vec3::new(x1, y2, z2)
    }

    /// Perspective projection of a camera-space point to pixel coordinates.
    /// `None` at or below the near plane, or on non-finite output.
    pub fn project(&self, p: Vec3) -> Option<Vec2> {
        if p.z <= NEAR {
            return None;
        }
        let focal = (self.width * 0.5) / (FOV_DEGREES.to_radians() * 0.5).tan();
        let scale = focal / p.z;
        let aspect = self.height / self.width;
        let sx = self.width * 0.5 + p.x * scale;
        let sy = self.height * 0.5 - p.y * scale * aspect;
        if !sx.is_finite() || !sy.is_finite() {
            return None;
        }
        Some(Vec2::new(sx, sy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cam() -> Camera {
        Camera::new(800.0, 600.0)
    }

    #[test]
    fn identity_pose_is_translation_only() {
        let c = cam();
        let p = c.world_to_camera(Vec3::new(1.0, 2.0, 3.0));
        assert!((p - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
    }

    /// Yawing the camera toward a point centers it.
    #[test]
    fn yaw_brings_side_point_to_center() {
        let mut c = cam();
        c.yaw = std::f32::consts::FRAC_PI_2; // facing +x
        let p = c.world_to_camera(Vec3::new(10.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-4);
        assert!((p.z - 10.0).abs() < 1e-4);
    }

    /// Pitching up centers a point above the horizon.
    #[test]
    fn pitch_brings_high_point_to_center() {
        let mut c = cam();
        let target = Vec3::new(0.0, 10.0, 10.0);
        c.pitch = (target.y / target.z).atan();
        let p = c.world_to_camera(target);
        assert!(p.y.abs() < 1e-4);
        assert!(p.z > 10.0);
    }

    #[test]
    fn forward_matches_transform() {
        let mut c = cam();
        c.yaw = 0.7;
        c.pitch = -0.3;
        let ahead = c.position + c.forward() * 25.0;
        let p = c.world_to_camera(ahead);
        assert!(p.x.abs() < 1e-4 && p.y.abs() < 1e-4);
        assert!((p.z - 25.0).abs() < 1e-3);
    }

    #[test]
    fn points_at_or_behind_near_plane_do_not_project() {
        let c = cam();
        assert!(c.project(Vec3::new(0.0, 0.0, NEAR)).is_none());
        assert!(c.project(Vec3::new(0.0, 0.0, -5.0)).is_none());
    }

    #[test]
    fn center_point_projects_to_screen_center() {
        let c = cam();
        let s = c.project(Vec3::new(0.0, 0.0, 100.0)).unwrap();
        assert!((s.x - 400.0).abs() < 1e-3);
        assert!((s.y - 300.0).abs() < 1e-3);
    }

    /// Farther points converge toward the center (perspective).
    #[test]
    fn projection_shrinks_with_depth() {
        let c = cam();
        let near = c.project(Vec3::new(10.0, 0.0, 50.0)).unwrap();
        let far = c.project(Vec3::new(10.0, 0.0, 500.0)).unwrap();
        assert!((near.x - 400.0).abs() > (far.x - 400.0).abs());
    }
}
