//! Lattice topology: which edges carry walls, where the openings are, and
//! how decayed each wall is.
//!
//! All queries are lazy, cached, and derived from explicit coordinate
//! hashes, so an infinite maze stays consistent no matter the query order.

use std::collections::HashMap;

use rand::prelude::*;

use crate::hash;
use crate::zone::{ZoneCoord, ZoneProperties};

/// A lattice intersection, in world units (multiples of the spacing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPoint {
    pub x: i32,
    pub z: i32,
}

impl GridPoint {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Wall orientation: along which axis the segment runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Endpoints share z; the wall runs along x.
    AlongX,
    /// Endpoints share x; the wall runs along z.
    AlongZ,
}

/// Canonical identity of one wall segment between two adjacent lattice
/// points. Construction sorts the endpoints, so `(a, b)` and `(b, a)` name
/// the same wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallKey {
    a: GridPoint,
    b: GridPoint,
}

impl WallKey {
    /// Canonicalize a point pair into a wall key. Returns `None` unless the
    /// points differ in exactly one axis by exactly one spacing unit.
    pub fn new(p1: GridPoint, p2: GridPoint, spacing: i32) -> Option<Self> {
        let dx = (p2.x - p1.x).abs();
        let dz = (p2.z - p1.z).abs();
        let adjacent = (dx == spacing && dz == 0) || (dx == 0 && dz == spacing);
        if !adjacent {
            return None;
        }
        let (a, b) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
        Some(Self { a, b })
    }

    /// Lower endpoint (canonical order).
    pub fn a(&self) -> GridPoint {
        self.a
    }

    /// Upper endpoint (canonical order).
    pub fn b(&self) -> GridPoint {
        self.b
    }

    pub fn orientation(&self) -> Orientation {
        if self.a.z == self.b.z {
            Orientation::AlongX
        } else {
            Orientation::AlongZ
        }
    }

    /// Wall midpoint in world space.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.a.x + self.b.x) as f32 * 0.5,
            (self.a.z + self.b.z) as f32 * 0.5,
        )
    }
}

/// Doorway/hallway classification, independent of wall damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opening {
    None,
    Doorway,
    Hallway,
}

impl Opening {
    /// Gap width in world units for a given cell spacing.
    pub fn width(&self, spacing: i32) -> f32 {
        match self {
            Opening::None => 0.0,
            Opening::Doorway => spacing as f32 * engine_core::DOORWAY_WIDTH_FRAC,
            Opening::Hallway => spacing as f32 * engine_core::HALLWAY_WIDTH_FRAC,
        }
    }

    /// Interval `(start, end)` of the gap along the wall axis, centered on
    /// the segment. `None` when the wall is solid.
    pub fn interval(&self, key: &WallKey, spacing: i32) -> Option<(f32, f32)> {
        let width = self.width(spacing);
        if width <= 0.0 {
            return None;
        }
        let (lo, len) = match key.orientation() {
            Orientation::AlongX => (key.a().x as f32, spacing as f32),
            Orientation::AlongZ => (key.a().z as f32, spacing as f32),
        };
        let start = lo + (len - width) * 0.5;
        Some((start, start + width))
    }
}

/// Lifecycle of one wall. Every valid lattice edge carries one; `Rubble`
/// and `Destroyed` are terminal. `Rubble` was generated pre-destroyed (it
/// spawns a debris pile on first sight), `Destroyed` was removed by the
/// player and is what saves record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallState {
    Intact,
    /// Pre-damaged; value in [0.2, 0.5) drives the render tier.
    Damaged(f32),
    /// Generated already collapsed.
    Rubble,
    /// Removed by the player.
    Destroyed,
}

impl WallState {
    /// Does this wall still block movement and sight?
    pub fn is_solid(&self) -> bool {
        matches!(self, WallState::Intact | WallState::Damaged(_))
    }
}

/// Damage rolls below this are classified rubble at generation time.
const RUBBLE_THRESHOLD: f32 = 0.2;

/// Chance of a freestanding pillar at a lattice point.
const PILLAR_CHANCE: f64 = 0.04;

/// The topology context: world seed, spacing, and every cache.
///
/// Owned exclusively by the world orchestrator; all mutation funnels
/// through it, so lazy compute-and-cache needs no locking.
#[derive(Debug)]
pub struct Topology {
    seed: u64,
    spacing: i32,
    walls: HashMap<WallKey, WallState>,
    zones: HashMap<ZoneCoord, ZoneProperties>,
    pillars: HashMap<GridPoint, bool>,
    /// Walls removed by the player (not rubble), for the burst formula
    /// and the save snapshot.
    destroyed_count: usize,
}

impl Topology {
    pub fn new(seed: u64, spacing: i32) -> Self {
        assert!(spacing > 0, "cell spacing must be positive");
        Self {
            seed,
            spacing,
            walls: HashMap::new(),
            zones: HashMap::new(),
            pillars: HashMap::new(),
            destroyed_count: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    /// Number of walls the player has destroyed this session.
    pub fn destroyed_count(&self) -> usize {
        self.destroyed_count
    }

    // ── Zones ───────────────────────────────────────────────────────────

    /// Zone properties, memoized for the process lifetime.
    pub fn zone(&mut self, coord: ZoneCoord) -> ZoneProperties {
        let seed = self.seed;
        *self
            .zones
            .entry(coord)
            .or_insert_with(|| ZoneProperties::generate(coord, seed))
    }

    /// Zone properties at a world position.
    pub fn zone_at(&mut self, x: f32, z: f32) -> ZoneProperties {
        let coord = ZoneCoord::at(x, z, engine_core::ZONE_SIZE);
        self.zone(coord)
    }

    // ── Wall state ──────────────────────────────────────────────────────

    /// Current state of a wall, rolled on first query and cached.
    ///
    /// Every valid edge carries a wall; pre-damage comes from a symmetric
    /// wall seed, gated by the zone's decay chance at the wall midpoint.
    /// A cached key is never re-rolled.
    pub fn state(&mut self, key: WallKey) -> WallState {
        if let Some(&s) = self.walls.get(&key) {
            return s;
        }

        let (cx, cz) = key.center();
        let decay_chance = self.zone_at(cx, cz).decay_chance;

        let a = key.a();
        let b = key.b();
        let mut rng = StdRng::seed_from_u64(hash::wall_seed(self.seed, a.x, a.z, b.x, b.z));

        let state = if rng.gen::<f32>() < decay_chance {
            let damage = rng.gen_range(0.0..0.5);
            if damage < RUBBLE_THRESHOLD {
                WallState::Rubble
            } else {
                WallState::Damaged(damage)
            }
        } else {
            WallState::Intact
        };

        self.walls.insert(key, state);
        state
    }

    /// Whether a wall was ever generated between two points. Every valid
    /// adjacent pair carries one; non-adjacent points never do. Symmetric
    /// in its arguments.
    pub fn wall_exists(&self, p1: GridPoint, p2: GridPoint) -> bool {
        WallKey::new(p1, p2, self.spacing).is_some()
    }

    /// Pre-existing damage in [0, 1), if any.
    pub fn damage(&mut self, key: WallKey) -> Option<f32> {
        match self.state(key) {
            WallState::Damaged(d) => Some(d),
            _ => None,
        }
    }

    /// Opening classification. Pure in (orientation, one coordinate axis,
    /// seed) so both adjacent cells agree; independent of wall state.
    pub fn opening(&self, key: WallKey) -> Opening {
        let a = key.a();
        let b = key.b();
        let (tag, perp, mid) = match key.orientation() {
            Orientation::AlongX => (0u64, a.z, (a.x + b.x) / 2),
            Orientation::AlongZ => (1u64, a.x, (a.z + b.z) / 2),
        };
        let mut rng = StdRng::seed_from_u64(hash::opening_seed(self.seed, tag, perp, mid));
        let roll: f32 = rng.gen();
        if roll < 0.3 {
            Opening::Hallway
        } else if roll < 0.5 {
            Opening::Doorway
        } else {
            Opening::None
        }
    }

    /// Mark a wall destroyed. Returns `true` if anything changed; terminal
    /// walls are no-ops.
    pub fn destroy(&mut self, key: WallKey) -> bool {
        if !self.state(key).is_solid() {
            return false;
        }
        self.walls.insert(key, WallState::Destroyed);
        self.destroyed_count += 1;
        true
    }

    /// Sparse freestanding pillars (cosmetic only; no collision).
    pub fn pillar_at(&mut self, p: GridPoint) -> bool {
        let seed = self.seed;
        *self.pillars.entry(p).or_insert_with(|| {
            let mut rng = StdRng::seed_from_u64(hash::pillar_seed(seed, p.x, p.z));
            rng.gen::<f64>() < PILLAR_CHANCE
        })
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Walls the player destroyed, in canonical-key order (stable saves).
    pub fn destroyed_keys(&self) -> Vec<WallKey> {
        let mut keys: Vec<WallKey> = self
            .walls
            .iter()
            .filter(|(_, s)| **s == WallState::Destroyed)
            .map(|(k, _)| *k)
            .collect();
        keys.sort();
        keys
    }

    /// Re-seed and drop every cache, then pin the given keys to Destroyed
    /// so restored data takes precedence over freshly rolled generation.
    pub fn restore(&mut self, seed: u64, destroyed: impl IntoIterator<Item = WallKey>) {
        self.seed = seed;
        self.walls.clear();
        self.zones.clear();
        self.pillars.clear();
        self.destroyed_count = 0;
        for key in destroyed {
            self.walls.insert(key, WallState::Destroyed);
            self.destroyed_count += 1;
        }
        log::info!(
            "Topology restored: seed {} with {} destroyed walls",
            seed,
            self.destroyed_count
        );
    }
}
