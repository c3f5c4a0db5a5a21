//! Zone system: coarse cells carrying aesthetic and decay parameters.

use glam::Vec3;
use noise::{NoiseFn, Perlin};
use rand::prelude::*;

use crate::hash;

/// Coarse grid coordinate; one zone spans `ZONE_SIZE` world units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneCoord {
    pub x: i32,
    pub z: i32,
}

impl ZoneCoord {
    /// Zone containing a world-space position (floor division).
    pub fn at(x: f32, z: f32, zone_size: i32) -> Self {
        Self {
            x: (x / zone_size as f32).floor() as i32,
            z: (z / zone_size as f32).floor() as i32,
        }
    }
}

/// Per-zone aesthetics. Immutable once computed; memoized by `Topology`.
#[derive(Debug, Clone, Copy)]
pub struct ZoneProperties {
    /// Multiplicative RGB tint applied to every surface in the zone.
    pub tint: Vec3,
    /// Probability that a wall in this zone generates pre-damaged.
    pub decay_chance: f32,
}

impl ZoneProperties {
    /// Pure function of (zone, world seed). The tint combines a seeded
    /// per-zone jitter with low-frequency Perlin drift so neighboring zones
    /// shade into each other instead of checkerboarding.
    pub fn generate(zone: ZoneCoord, world_seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(hash::zone_seed(world_seed, zone.x, zone.z));

        let perlin = Perlin::new(world_seed as u32);
        let drift = perlin.get([zone.x as f64 * 0.13, zone.z as f64 * 0.13]) as f32;

        // Warm base, pushed slightly toward amber or grey-green by the drift.
        let warm = 1.0 + drift * 0.08;
        let tint = Vec3::new(
            (warm + rng.gen_range(-0.05..0.05)).clamp(0.8, 1.15),
            (warm * 0.985 + rng.gen_range(-0.05..0.05)).clamp(0.8, 1.15),
            (warm * 0.9 + rng.gen_range(-0.07..0.04)).clamp(0.75, 1.1),
        );

        // Deeper zones rot more: bias decay by the same drift field.
        let decay_chance = (rng.gen_range(0.02..0.22) + drift.max(0.0) * 0.1).clamp(0.0, 0.35);

        Self { tint, decay_chance }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Same zone and seed must produce identical properties (memoization
    /// safety across independent caches).
    #[test]
    fn zone_properties_deterministic() {
        let a = ZoneProperties::generate(ZoneCoord { x: -3, z: 17 }, 12345);
        let b = ZoneProperties::generate(ZoneCoord { x: -3, z: 17 }, 12345);
        assert_eq!(a.tint, b.tint);
        assert_eq!(a.decay_chance, b.decay_chance);
    }

    #[test]
    fn zone_properties_vary_with_seed() {
        let a = ZoneProperties::generate(ZoneCoord { x: 0, z: 0 }, 1);
        let b = ZoneProperties::generate(ZoneCoord { x: 0, z: 0 }, 2);
        assert!(a.tint != b.tint || a.decay_chance != b.decay_chance);
    }

    #[test]
    fn decay_chance_is_a_probability() {
        for z in -20..20 {
            let p = ZoneProperties::generate(ZoneCoord { x: z * 7, z }, 999);
            assert!((0.0..=1.0).contains(&p.decay_chance));
        }
    }

    #[test]
    fn zone_at_floor_divides_negative_coords() {
        let z = ZoneCoord::at(-1.0, -1001.0, 1000);
        assert_eq!(z, ZoneCoord { x: -1, z: -2 });
    }
}
