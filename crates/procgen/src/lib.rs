//! Procedural world topology for Backrooms.
//!
//! The maze is never stored: every wall, opening, pillar and zone is a pure
//! function of its coordinates and the world seed, computed lazily and
//! cached. Re-querying the same coordinates (even from a fresh cache) must
//! reproduce the same world.

pub mod hash;
pub mod topology;
pub mod zone;

pub use hash::*;
pub use topology::*;
pub use zone::*;
