//! Near-plane polygon clipping (Sutherland–Hodgman, one plane).
//!
//! Clipping happens before projection so the perspective divide never sees
//! zero or negative depth.

use engine_core::NEAR;
use glam::Vec3;

/// Clipped vertices sit just in front of the plane, never exactly on it.
const NEAR_BIAS: f32 = 0.001;

/// Clip a camera-space polygon against the near plane, preserving winding.
/// Returns an empty polygon when fewer than 3 vertices survive, or when any
/// surviving vertex is non-finite or below near (defensive recheck).
pub fn clip_near(poly: &[Vec3]) -> Vec<Vec3> {
    if poly.len() < 3 {
        return Vec::new();
    }

    let inside = |p: &Vec3| p.z >= NEAR;

    let mut out: Vec<Vec3> = Vec::with_capacity(poly.len() + 1);
    let mut prev = poly[poly.len() - 1];
    let mut prev_in = inside(&prev);

    for &cur in poly {
        let cur_in = inside(&cur);

        if cur_in && prev_in {
            out.push(cur);
        } else if cur_in && !prev_in {
            if let Some(i) = intersect(prev, cur) {
                out.push(i);
            }
            out.push(cur);
        } else if !cur_in && prev_in {
            if let Some(i) = intersect(prev, cur) {
                out.push(i);
            }
        }

        prev = cur;
        prev_in = cur_in;
    }

    if out.len() < 3 {
        return Vec::new();
    }
    if out
        .iter()
        .any(|p| !p.x.is_finite() || !p.y.is_finite() || !p.z.is_finite() || p.z < NEAR)
    {
        return Vec::new();
    }
    out
}

/// Intersection of the segment from `a` to `b` with the near plane.
fn intersect(a: Vec3, b: Vec3) -> Option<Vec3> {
    let dz = b.z - a.z;
    if dz.abs() < 1e-5 {
        return None;
    }
    let t = ((NEAR - a.z) / dz).clamp(0.0, 1.0);
    Some(Vec3::new(
        a.x + (b.x - a.x) * t,
        a.y + (b.y - a.y) * t,
        NEAR + NEAR_BIAS,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_in_front_passes_through() {
        let tri = [
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(1.0, 0.0, 10.0),
            Vec3::new(0.0, 1.0, 10.0),
        ];
        assert_eq!(clip_near(&tri), tri.to_vec());
    }

    /// A triangle fully behind the near plane clips to empty.
    #[test]
    fn fully_behind_clips_to_empty() {
        let tri = [
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 0.5),
            Vec3::new(0.0, 1.0, -3.0),
        ];
        assert!(clip_near(&tri).is_empty());
    }

    /// A straddling triangle clips to a polygon whose every vertex has
    /// depth >= near.
    #[test]
    fn straddling_triangle_clips_to_front_of_plane() {
        let tri = [
            Vec3::new(0.0, 0.0, 20.0),
            Vec3::new(5.0, 0.0, -10.0),
            Vec3::new(-5.0, 0.0, -10.0),
        ];
        let out = clip_near(&tri);
        assert!(out.len() >= 3);
        for p in &out {
            assert!(p.z >= NEAR, "vertex {:?} below near plane", p);
        }
    }

    /// One vertex behind produces a quad (winding preserved).
    #[test]
    fn one_behind_vertex_yields_quad() {
        let tri = [
            Vec3::new(-5.0, 0.0, 20.0),
            Vec3::new(5.0, 0.0, 20.0),
            Vec3::new(0.0, 0.0, -10.0),
        ];
        let out = clip_near(&tri);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn degenerate_input_is_empty() {
        assert!(clip_near(&[]).is_empty());
        assert!(clip_near(&[Vec3::Z, Vec3::Z * 2.0]).is_empty());
    }

    #[test]
    fn non_finite_vertex_rejects_polygon() {
        let tri = [
            Vec3::new(0.0, f32::NAN, 10.0),
            Vec3::new(1.0, 0.0, 10.0),
            Vec3::new(0.0, 1.0, 10.0),
        ];
        assert!(clip_near(&tri).is_empty());
    }
}
