//! Stateless coordinate hashing.
//!
//! Every procedural decision derives its RNG seed from an explicit integer
//! mix of coordinates and the world seed. No shared generator is ever
//! reseeded, so queries are order-independent and trivially repeatable.

/// splitmix64 finalizer. Good avalanche, cheap, and stable across platforms.
#[inline]
pub fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Fold one coordinate into a running hash.
#[inline]
pub fn combine(state: u64, value: i64) -> u64 {
    mix(state ^ (value as u64))
}

/// Seed for a wall-state roll. Takes the *canonical* endpoint order, so the
/// caller must sort the key first; the hash itself is then symmetric by
/// construction.
pub fn wall_seed(world_seed: u64, x1: i32, z1: i32, x2: i32, z2: i32) -> u64 {
    let mut h = mix(world_seed);
    h = combine(h, x1 as i64);
    h = combine(h, z1 as i64);
    h = combine(h, x2 as i64);
    h = combine(h, z2 as i64);
    h
}

/// Seed for an opening roll. Deliberately built from the wall orientation,
/// its perpendicular axis coordinate and the midpoint along the wall, so
/// both adjacent cells derive the identical opening.
pub fn opening_seed(world_seed: u64, orient_tag: u64, perp: i32, mid: i32) -> u64 {
    let mut h = mix(world_seed ^ orient_tag.wrapping_mul(0xA24B_AED4_963E_E407));
    h = combine(h, perp as i64);
    h = combine(h, mid as i64);
    h
}

/// Seed for zone-level properties.
pub fn zone_seed(world_seed: u64, zone_x: i32, zone_z: i32) -> u64 {
    let mut h = mix(world_seed ^ 0x51_7C_C1_B7_27_22_0A_95);
    h = combine(h, zone_x as i64);
    h = combine(h, zone_z as i64);
    h
}

/// Seed for the freestanding-pillar roll at a lattice point.
pub fn pillar_seed(world_seed: u64, x: i32, z: i32) -> u64 {
    let mut h = mix(world_seed ^ 0xD6_E8_FE_B8_6659_FD93);
    h = combine(h, x as i64);
    h = combine(h, z as i64);
    h
}
