//! Wall destruction: turns a solid wall into a debris burst, and spawns
//! settled rubble piles for walls that generated already collapsed.

use engine_core::*;
use glam::Vec3;
use physics::debris::{Debris, DebrisPool};
use procgen::{Topology, WallKey};
use rand::prelude::*;
use std::collections::HashSet;

/// Debris burst size for the nth destruction. Decays with the session's
/// destruction count so long rampages stay within the particle budget.
pub fn burst_count(prior_destructions: usize) -> usize {
    let scaled = DEBRIS_BASE_BURST as f32 / (1.0 + prior_destructions as f32 / 20.0);
    (scaled as usize).max(DEBRIS_MIN_BURST)
}

/// Orchestrates destruction side effects on top of the topology's state
/// transition: debris bursts, rubble piles, and the once-only guard for
/// the latter.
#[derive(Debug, Default)]
pub struct DestructionEngine {
    spawned_rubble: HashSet<WallKey>,
}

impl DestructionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy a wall. Returns `true` if the wall was solid and came down;
    /// repeated calls on the same wall are no-ops with no debris.
    pub fn destroy(&mut self, topo: &mut Topology, debris: &mut DebrisPool, key: WallKey) -> bool {
        // Burst size uses the count before this wall is added to it.
        let count = burst_count(topo.destroyed_count());
        if !topo.destroy(key) {
            return false;
        }
        log::debug!(
            "Wall {:?}-{:?} destroyed, {} debris",
            key.a(),
            key.b(),
            count
        );
        self.spawn_burst(topo, debris, key, count);
        true
    }

    /// Radial debris burst from the wall's volume. Seeded by the wall key
    /// plus the session destruction count, so a burst is random-looking but
    /// reproducible.
    fn spawn_burst(&self, topo: &Topology, debris: &mut DebrisPool, key: WallKey, count: usize) {
        let mut rng = burst_rng(topo, key);
        let (cx, cz) = key.center();
        let half = topo.spacing() as f32 * 0.5;
        let (ex, ez) = match key.orientation() {
            procgen::Orientation::AlongX => (half, WALL_THICKNESS * 0.5),
            procgen::Orientation::AlongZ => (WALL_THICKNESS * 0.5, half),
        };

        for _ in 0..count {
            let px = cx + rng.gen_range(-ex..ex);
            let py = rng.gen_range(0.0..WALL_HEIGHT);
            let pz = cz + rng.gen_range(-ez..ez);

            // Outward from the wall center, with jitter and an upward kick.
            let out = Vec3::new(px - cx, 0.0, pz - cz).normalize_or_zero();
            let speed = rng.gen_range(8.0..20.0);
            let velocity = Vec3::new(
                out.x * speed + rng.gen_range(-3.0..3.0),
                rng.gen_range(5.0..20.0),
                out.z * speed + rng.gen_range(-3.0..3.0),
            );

            debris.push(Debris::new(
                Vec3::new(px, py, pz),
                velocity,
                jitter_color(WALL_COLOR, &mut rng),
            ));
        }
    }

    /// Spawn the settled rubble pile for a wall generated as rubble. Safe
    /// to call every frame the wall is visible; the pile spawns once.
    pub fn spawn_rubble(&mut self, topo: &Topology, debris: &mut DebrisPool, key: WallKey) {
        if !self.spawned_rubble.insert(key) {
            return;
        }
        let mut rng = burst_rng(topo, key);
        let (cx, cz) = key.center();
        let half = topo.spacing() as f32 * 0.5;
        let (ex, ez) = match key.orientation() {
            procgen::Orientation::AlongX => (half, WALL_THICKNESS * 1.5),
            procgen::Orientation::AlongZ => (WALL_THICKNESS * 1.5, half),
        };
        for _ in 0..RUBBLE_PILE_COUNT {
            let px = cx + rng.gen_range(-ex..ex);
            let pz = cz + rng.gen_range(-ez..ez);
            debris.push(Debris::settled(
                Vec3::new(px, FLOOR_Y, pz),
                jitter_color(WALL_COLOR, &mut rng),
            ));
        }
    }
}

fn burst_rng(topo: &Topology, key: WallKey) -> StdRng {
    let a = key.a();
    let b = key.b();
    StdRng::seed_from_u64(procgen::hash::wall_seed(
        topo.seed().wrapping_add(0x9e37),
        a.x,
        a.z,
        b.x,
        b.z,
    ))
}

fn jitter_color(base: [u8; 3], rng: &mut StdRng) -> [u8; 3] {
    let mut c = base;
    for ch in &mut c {
        let d = rng.gen_range(-30i32..=30);
        *ch = (*ch as i32 + d).clamp(0, 255) as u8;
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::GridPoint;

    fn solid_wall(topo: &mut Topology) -> WallKey {
        (0..200)
            .find_map(|i| {
                let key = WallKey::new(
                    GridPoint::new(i * topo.spacing(), 0),
                    GridPoint::new((i + 1) * topo.spacing(), 0),
                    topo.spacing(),
                )
                .unwrap();
                topo.state(key).is_solid().then_some(key)
            })
            .expect("no solid wall in 200 edges")
    }

    /// The first destruction of a session emits exactly the base burst.
    #[test]
    fn first_destruction_emits_base_burst() {
        let mut topo = Topology::new(42, PILLAR_SPACING);
        let mut pool = DebrisPool::new();
        let mut engine = DestructionEngine::new();
        let key = solid_wall(&mut topo);
        assert!(engine.destroy(&mut topo, &mut pool, key));
        assert_eq!(pool.len(), DEBRIS_BASE_BURST);
    }

    /// Seed 42, spacing 1: taking down the wall between (0,0) and (1,0)
    /// grows the pool by exactly the base burst, and a repeat destroy adds
    /// nothing.
    #[test]
    fn seed42_origin_wall_bursts_exactly_once() {
        let mut topo = Topology::new(42, 1);
        let mut pool = DebrisPool::new();
        let mut engine = DestructionEngine::new();
        let key = WallKey::new(GridPoint::new(0, 0), GridPoint::new(1, 0), 1).unwrap();

        assert!(topo.state(key).is_solid());
        assert!(engine.destroy(&mut topo, &mut pool, key));
        assert_eq!(pool.len(), burst_count(0));

        assert!(!engine.destroy(&mut topo, &mut pool, key));
        assert_eq!(pool.len(), burst_count(0));
    }

    /// Burst size decays with the destruction count but never below the
    /// floor.
    #[test]
    fn burst_count_decays_to_a_floor() {
        assert_eq!(burst_count(0), DEBRIS_BASE_BURST);
        assert_eq!(burst_count(20), DEBRIS_BASE_BURST / 2);
        assert!(burst_count(10_000) == DEBRIS_MIN_BURST);
        let mut prev = burst_count(0);
        for n in 1..200 {
            let c = burst_count(n);
            assert!(c <= prev);
            assert!(c >= DEBRIS_MIN_BURST);
            prev = c;
        }
    }

    /// Destroying the same wall twice neither double-counts nor spawns a
    /// second burst.
    #[test]
    fn second_destroy_is_a_no_op() {
        let mut topo = Topology::new(42, PILLAR_SPACING);
        let mut pool = DebrisPool::new();
        let mut engine = DestructionEngine::new();
        let key = solid_wall(&mut topo);
        assert!(engine.destroy(&mut topo, &mut pool, key));
        let after_first = pool.len();
        assert!(!engine.destroy(&mut topo, &mut pool, key));
        assert_eq!(pool.len(), after_first);
        assert_eq!(topo.destroyed_count(), 1);
    }

    /// Debris spawns within the destroyed wall's bounding volume.
    #[test]
    fn burst_spawns_inside_the_wall_volume() {
        let mut topo = Topology::new(42, PILLAR_SPACING);
        let mut pool = DebrisPool::new();
        let mut engine = DestructionEngine::new();
        let key = solid_wall(&mut topo);
        engine.destroy(&mut topo, &mut pool, key);

        let (cx, cz) = key.center();
        let half = PILLAR_SPACING as f32 * 0.5;
        for d in pool.iter() {
            assert!((d.position.x - cx).abs() <= half + 1e-3);
            assert!((d.position.z - cz).abs() <= half + 1e-3);
            assert!(d.position.y >= 0.0 && d.position.y <= WALL_HEIGHT);
        }
    }

    /// Rubble piles spawn settled, once per wall.
    #[test]
    fn rubble_pile_spawns_exactly_once() {
        let mut topo = Topology::new(42, PILLAR_SPACING);
        let mut pool = DebrisPool::new();
        let mut engine = DestructionEngine::new();
        let key = WallKey::new(
            GridPoint::new(0, 0),
            GridPoint::new(PILLAR_SPACING, 0),
            PILLAR_SPACING,
        )
        .unwrap();

        engine.spawn_rubble(&topo, &mut pool, key);
        assert_eq!(pool.len(), RUBBLE_PILE_COUNT);
        assert!(pool.iter().all(|d| d.position.y == FLOOR_Y));

        engine.spawn_rubble(&topo, &mut pool, key);
        assert_eq!(pool.len(), RUBBLE_PILE_COUNT, "second call must not re-spawn");
    }
}
