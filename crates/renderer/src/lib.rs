//! Software 3D rendering pipeline for Backrooms.
//!
//! World-space polygons go through camera transform, near-plane clipping
//! and perspective projection, then scanline fill into an RGBA8 `Frame`.
//! Visibility is painter's algorithm: the caller collects value-typed draw
//! commands, the `Scene` sorts them farthest-first and executes. Debris is
//! a second depth-sorted pass of distance-scaled discs on top.

pub mod camera;
pub mod clip;
pub mod color;
pub mod frame;
pub mod raster;

pub use camera::*;
pub use clip::*;
pub use color::*;
pub use frame::*;
pub use raster::*;
