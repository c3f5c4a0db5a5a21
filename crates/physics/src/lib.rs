//! Physics for Backrooms: lattice wall collision, ray-triangle picking for
//! wall targeting, and the debris particle simulation.

pub mod collision;
pub mod debris;
pub mod raycast;

pub use collision::*;
pub use debris::*;
pub use raycast::*;
