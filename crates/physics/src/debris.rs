//! Debris particle pool: gravity integration, settling, culling.

use engine_core::Vec3;

/// One pixel-sized debris particle.
#[derive(Debug, Clone, Copy)]
pub struct Debris {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: [u8; 3],
    /// Resting on the floor; no further integration.
    pub settled: bool,
    /// Cleared by culling; compacted away at end of tick.
    pub active: bool,
}

impl Debris {
    /// Airborne particle.
    pub fn new(position: Vec3, velocity: Vec3, color: [u8; 3]) -> Self {
        Self {
            position,
            velocity,
            color,
            settled: false,
            active: true,
        }
    }

    /// Particle that starts at rest (rubble piles).
    pub fn settled(position: Vec3, color: [u8; 3]) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            color,
            settled: true,
            active: true,
        }
    }
}

/// Owns every live particle. Insertion order is age order, which makes
/// oldest-first eviction a drain from the front.
#[derive(Debug, Default)]
pub struct DebrisPool {
    particles: Vec<Debris>,
}

impl DebrisPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn push(&mut self, d: Debris) {
        self.particles.push(d);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Debris> {
        self.particles.iter()
    }

    /// One simulation tick: gravity, position integration, floor settle,
    /// distance cull, then a single compaction pass (removal is never
    /// in-place during iteration) and oldest-first cap eviction.
    pub fn update(
        &mut self,
        dt: f32,
        gravity: f32,
        floor_y: f32,
        camera_x: f32,
        camera_z: f32,
        cull_dist: f32,
        max_count: usize,
    ) {
        let cull_sq = cull_dist * cull_dist;

        for d in &mut self.particles {
            if !d.active {
                continue;
            }
            if !d.settled {
                d.velocity.y -= gravity * dt;
                d.position += d.velocity * dt;
                if d.position.y <= floor_y {
                    d.position.y = floor_y;
                    d.velocity = Vec3::ZERO;
                    d.settled = true;
                }
            }

            let dx = d.position.x - camera_x;
            let dz = d.position.z - camera_z;
            if dx * dx + dz * dz > cull_sq {
                d.active = false;
            }
        }

        self.particles.retain(|d| d.active);

        if self.particles.len() > max_count {
            let excess = self.particles.len() - max_count;
            log::debug!("Debris cap hit, evicting {} oldest particles", excess);
            self.particles.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(pos: Vec3, vel: Vec3) -> Debris {
        Debris::new(pos, vel, [255, 255, 255])
    }

    #[test]
    fn gravity_pulls_airborne_particles_down() {
        let mut pool = DebrisPool::new();
        pool.push(white(Vec3::new(0.0, 100.0, 0.0), Vec3::ZERO));
        pool.update(0.1, 600.0, 0.0, 0.0, 0.0, 1000.0, 100);
        let d = pool.iter().next().unwrap();
        assert!(d.velocity.y < 0.0);
        assert!(d.position.y < 100.0);
        assert!(!d.settled);
    }

    /// Reaching the floor clamps position, zeroes velocity, and settles.
    #[test]
    fn floor_contact_settles_particle() {
        let mut pool = DebrisPool::new();
        pool.push(white(Vec3::new(0.0, 1.0, 0.0), Vec3::new(5.0, -50.0, 0.0)));
        pool.update(0.1, 600.0, 0.0, 0.0, 0.0, 1000.0, 100);
        let d = pool.iter().next().unwrap();
        assert!(d.settled);
        assert_eq!(d.position.y, 0.0);
        assert_eq!(d.velocity, Vec3::ZERO);
        // Settled particles no longer move.
        let before = d.position;
        pool.update(0.1, 600.0, 0.0, 0.0, 0.0, 1000.0, 100);
        assert_eq!(pool.iter().next().unwrap().position, before);
    }

    /// Particles beyond the cull radius are gone after one tick.
    #[test]
    fn distant_particles_cull_within_one_tick() {
        let mut pool = DebrisPool::new();
        pool.push(Debris::settled(Vec3::new(500.0, 0.0, 0.0), [0, 0, 0]));
        pool.push(Debris::settled(Vec3::new(5000.0, 0.0, 0.0), [0, 0, 0]));
        pool.update(0.016, 600.0, 0.0, 0.0, 0.0, 900.0, 100);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.iter().next().unwrap().position.x, 500.0);
    }

    /// The hard cap evicts oldest-first and is never exceeded post-update.
    #[test]
    fn cap_evicts_oldest_first() {
        let mut pool = DebrisPool::new();
        for i in 0..10 {
            pool.push(Debris::settled(Vec3::new(i as f32, 0.0, 0.0), [0, 0, 0]));
        }
        pool.update(0.016, 600.0, 0.0, 0.0, 0.0, 1e6, 6);
        assert_eq!(pool.len(), 6);
        // Survivors are the 6 newest (x = 4..=9).
        assert_eq!(pool.iter().next().unwrap().position.x, 4.0);
    }
}
