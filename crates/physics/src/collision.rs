//! Player-vs-wall collision against the procedural topology.

use engine_core::{PLAYER_RADIUS, WALL_THICKNESS};
use procgen::{GridPoint, Orientation, Topology, WallKey};

/// Size of the thing being moved through the maze.
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub radius: f32,
    /// Half the wall slab thickness the collider is tested against.
    pub half_thickness: f32,
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            radius: PLAYER_RADIUS,
            half_thickness: WALL_THICKNESS * 0.5,
        }
    }
}

/// Does a point at (x, z) overlap any wall?
///
/// Fail-closed: non-finite coordinates always collide. Enumerates every
/// lattice cell within a reach that exceeds wall thickness + radius, tests
/// both wall orientations per cell, skips destroyed and rubble walls,
/// and treats openings as passable except within the collider radius of
/// their edges (the expanded-edge boundary itself collides).
pub fn collides(topo: &mut Topology, collider: &Collider, x: f32, z: f32) -> bool {
    if !x.is_finite() || !z.is_finite() {
        return true;
    }

    let s = topo.spacing();
    let sf = s as f32;
    // One extra cell beyond the slab reach so near-boundary walls are never
    // missed.
    let reach = sf + collider.half_thickness + collider.radius;

    let cx0 = ((x - reach) / sf).floor() as i32;
    let cx1 = ((x + reach) / sf).floor() as i32;
    let cz0 = ((z - reach) / sf).floor() as i32;
    let cz1 = ((z + reach) / sf).floor() as i32;

    for cx in cx0..=cx1 {
        for cz in cz0..=cz1 {
            let p = GridPoint::new(cx * s, cz * s);
            let along_x = GridPoint::new((cx + 1) * s, cz * s);
            let along_z = GridPoint::new(cx * s, (cz + 1) * s);

            for other in [along_x, along_z] {
                let Some(key) = WallKey::new(p, other, s) else {
                    continue;
                };
                if !topo.state(key).is_solid() {
                    continue;
                }
                if wall_blocks(topo, key, collider, x, z) {
                    return true;
                }
            }
        }
    }
    false
}

/// Test one solid wall segment against the point.
fn wall_blocks(topo: &mut Topology, key: WallKey, collider: &Collider, x: f32, z: f32) -> bool {
    let s = topo.spacing();
    let opening = topo.opening(key);
    let interval = opening.interval(&key, s);

    // Distance perpendicular to the wall line, and position along it.
    let (perp_dist, along, seg_lo, seg_hi) = match key.orientation() {
        Orientation::AlongX => (
            (z - key.a().z as f32).abs(),
            x,
            key.a().x as f32,
            key.b().x as f32,
        ),
        Orientation::AlongZ => (
            (x - key.a().x as f32).abs(),
            z,
            key.a().z as f32,
            key.b().z as f32,
        ),
    };

    let slab = collider.half_thickness + collider.radius;
    match interval {
        Some((open_start, open_end)) => {
            // Solid flanks only; the gap (grown outward by the radius on
            // both sides) is passable.
            perp_dist < slab
                && ((seg_lo <= along && along <= open_start - collider.radius)
                    || (open_end + collider.radius <= along && along <= seg_hi))
        }
        None => {
            // Full segment, endpoints padded by the radius.
            perp_dist < slab && seg_lo - collider.radius <= along && along <= seg_hi + collider.radius
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::Opening;

    fn tiny_collider() -> Collider {
        Collider {
            radius: 0.05,
            half_thickness: 0.04,
        }
    }

    /// Find a wall with the wanted opening kind on row z=0-ish.
    fn find_wall(topo: &mut Topology, want_open: bool) -> WallKey {
        for x in -200..200 {
            for z in -200..200 {
                let key = WallKey::new(GridPoint::new(x, z), GridPoint::new(x + 1, z), 1).unwrap();
                if !topo.state(key).is_solid() {
                    continue;
                }
                let has_open = topo.opening(key) != Opening::None;
                if has_open == want_open {
                    return key;
                }
            }
        }
        panic!("no matching wall found");
    }

    #[test]
    fn non_finite_coordinates_always_collide() {
        let mut t = Topology::new(1, 1);
        let c = Collider::default();
        assert!(collides(&mut t, &c, f32::NAN, 0.0));
        assert!(collides(&mut t, &c, 0.0, f32::INFINITY));
        assert!(collides(&mut t, &c, f32::NEG_INFINITY, f32::NAN));
    }

    /// A point exactly at the center of an opening never collides.
    #[test]
    fn opening_center_is_passable() {
        let mut t = Topology::new(42, 1);
        let c = tiny_collider();
        let key = find_wall(&mut t, true);
        let (os, oe) = t.opening(key).interval(&key, 1).unwrap();
        let mid = (os + oe) * 0.5;
        let (x, z) = match key.orientation() {
            Orientation::AlongX => (mid, key.a().z as f32),
            Orientation::AlongZ => (key.a().x as f32, mid),
        };
        assert!(!collides(&mut t, &c, x, z));
    }

    /// A point on the centerline of a solid wall always collides.
    #[test]
    fn solid_wall_centerline_collides() {
        let mut t = Topology::new(42, 1);
        let c = tiny_collider();
        let key = find_wall(&mut t, false);
        let (cx, cz) = key.center();
        assert!(collides(&mut t, &c, cx, cz));
    }

    /// Boundary pin-down: the blocked interval is closed at
    /// `opening_start - radius`; a hair inside the expanded gap is free.
    #[test]
    fn opening_edge_boundary_is_inclusive() {
        let mut t = Topology::new(42, 1);
        let c = tiny_collider();
        let key = find_wall(&mut t, true);
        let (os, _) = t.opening(key).interval(&key, 1).unwrap();
        let edge = os - c.radius;
        let (wx, wz, ex, ez) = match key.orientation() {
            Orientation::AlongX => (edge, key.a().z as f32, edge + 1e-3, key.a().z as f32),
            Orientation::AlongZ => (key.a().x as f32, edge, key.a().x as f32, edge + 1e-3),
        };
        assert!(collides(&mut t, &c, wx, wz), "expanded edge itself must collide");
        assert!(!collides(&mut t, &c, ex, ez), "just inside the gap must be free");
    }

    /// Destroyed walls stop colliding.
    #[test]
    fn destroyed_wall_is_passable() {
        let mut t = Topology::new(42, 1);
        let c = tiny_collider();
        let key = find_wall(&mut t, false);
        let (cx, cz) = key.center();
        assert!(collides(&mut t, &c, cx, cz));
        t.destroy(key);
        assert!(!collides(&mut t, &c, cx, cz));
    }

    /// Open space far from any wall is collision-free.
    #[test]
    fn cell_interior_is_free() {
        let mut t = Topology::new(42, 200);
        let c = Collider::default();
        // Center of a cell is at least spacing/2 = 100 from every wall line,
        // far beyond half-thickness (8) + radius (15).
        assert!(!collides(&mut t, &c, 100.0, 100.0));
    }
}
