//! Ray-triangle intersection and wall targeting.

use engine_core::{Vec3, FLOOR_Y, WALL_HEIGHT};
use procgen::{GridPoint, Orientation, Topology, WallKey};

/// Result of a ray-triangle query.
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Distance along the (normalized) ray to the hit point.
    pub distance: f32,
    /// Barycentric coordinates of the hit inside the triangle.
    pub u: f32,
    pub v: f32,
}

const EPSILON: f32 = 1e-6;

/// Möller–Trumbore, two-sided. Returns the positive-distance hit or `None`
/// for parallel, outside-triangle, or behind-origin cases.
pub fn intersect_triangle(
    origin: Vec3,
    direction: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < EPSILON {
        return None; // Ray parallel to the triangle plane.
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t <= EPSILON {
        return None;
    }

    Some(TriangleHit { distance: t, u, v })
}

/// The wall the ray hits first, if any, within `reach`.
///
/// Scans every lattice wall whose cell lies within reach of the origin,
/// builds the two triangles of each solid wall's center plane (thickness
/// and openings ignored, as aim forgiveness), and keeps the strictly
/// closest positive hit.
pub fn target_wall(
    topo: &mut Topology,
    origin: Vec3,
    direction: Vec3,
    reach: f32,
) -> Option<(WallKey, f32)> {
    let s = topo.spacing();
    let sf = s as f32;

    let cx0 = ((origin.x - reach) / sf).floor() as i32;
    let cx1 = ((origin.x + reach) / sf).floor() as i32;
    let cz0 = ((origin.z - reach) / sf).floor() as i32;
    let cz1 = ((origin.z + reach) / sf).floor() as i32;

    let mut closest: Option<(WallKey, f32)> = None;

    for cx in cx0..=cx1 {
        for cz in cz0..=cz1 {
            let p = GridPoint::new(cx * s, cz * s);
            for other in [
                GridPoint::new((cx + 1) * s, cz * s),
                GridPoint::new(cx * s, (cz + 1) * s),
            ] {
                let Some(key) = WallKey::new(p, other, s) else {
                    continue;
                };
                if !topo.state(key).is_solid() {
                    continue;
                }

                let (q0, q1, q2, q3) = wall_quad(key);
                for (a, b, c) in [(q0, q1, q2), (q0, q2, q3)] {
                    if let Some(hit) = intersect_triangle(origin, direction, a, b, c) {
                        if hit.distance < reach
                            && closest.map_or(true, |(_, d)| hit.distance < d)
                        {
                            closest = Some((key, hit.distance));
                        }
                    }
                }
            }
        }
    }

    closest
}

/// Corners of the wall's center-plane quad, top edge first.
fn wall_quad(key: WallKey) -> (Vec3, Vec3, Vec3, Vec3) {
    let a = key.a();
    let b = key.b();
    let (top, floor) = (WALL_HEIGHT, FLOOR_Y);
    match key.orientation() {
        Orientation::AlongX => {
            let z = a.z as f32;
            (
                Vec3::new(a.x as f32, top, z),
                Vec3::new(b.x as f32, top, z),
                Vec3::new(b.x as f32, floor, z),
                Vec3::new(a.x as f32, floor, z),
            )
        }
        Orientation::AlongZ => {
            let x = a.x as f32;
            (
                Vec3::new(x, top, a.z as f32),
                Vec3::new(x, top, b.z as f32),
                Vec3::new(x, floor, b.z as f32),
                Vec3::new(x, floor, a.z as f32),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> (Vec3, Vec3, Vec3) {
        (
            Vec3::new(-1.0, -1.0, 5.0),
            Vec3::new(1.0, -1.0, 5.0),
            Vec3::new(0.0, 1.0, 5.0),
        )
    }

    #[test]
    fn hits_triangle_straight_ahead() {
        let (v0, v1, v2) = tri();
        let hit = intersect_triangle(Vec3::ZERO, Vec3::Z, v0, v1, v2).expect("should hit");
        assert!((hit.distance - 5.0).abs() < 1e-5);
        assert!(hit.u >= 0.0 && hit.v >= 0.0 && hit.u + hit.v <= 1.0);
    }

    #[test]
    fn misses_outside_triangle() {
        let (v0, v1, v2) = tri();
        assert!(intersect_triangle(Vec3::new(5.0, 5.0, 0.0), Vec3::Z, v0, v1, v2).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let (v0, v1, v2) = tri();
        assert!(intersect_triangle(Vec3::ZERO, Vec3::X, v0, v1, v2).is_none());
    }

    #[test]
    fn triangle_behind_origin_misses() {
        let (v0, v1, v2) = tri();
        assert!(intersect_triangle(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, v0, v1, v2).is_none());
    }

    /// Back-face hits count (two-sided test): approach from the far side.
    #[test]
    fn two_sided_intersection() {
        let (v0, v1, v2) = tri();
        let hit = intersect_triangle(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z, v0, v1, v2)
            .expect("back face should hit");
        assert!((hit.distance - 5.0).abs() < 1e-5);
    }

    /// Targeting finds a wall dead ahead and skips it once destroyed.
    #[test]
    fn targeting_reports_closest_solid_wall() {
        let mut t = Topology::new(42, 200);
        let dir = Vec3::Z;
        // Scan several columns; pre-damage can turn an edge to rubble, but
        // some column is guaranteed to face a solid wall within reach.
        let (origin, key, dist) = (0..16)
            .find_map(|col| {
                let origin = Vec3::new(100.0 + col as f32 * 200.0, 90.0, 100.0);
                target_wall(&mut t, origin, dir, 800.0).map(|(k, d)| (origin, k, d))
            })
            .expect("no targetable wall in 16 columns");
        assert!(dist > 0.0 && dist < 800.0);

        t.destroy(key);
        let next = target_wall(&mut t, origin, dir, 800.0);
        if let Some((next_key, next_dist)) = next {
            assert_ne!(next_key, key, "destroyed wall must not be targeted");
            assert!(next_dist > dist);
        }
    }
}
