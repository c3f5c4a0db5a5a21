//! Core engine types and utilities for Backrooms.
//!
//! This crate provides the foundations shared by every engine system:
//! - World tuning constants (lattice spacing, fog, speeds, debris limits)
//! - Time management for the frame loop

pub mod constants;
pub mod time;

pub use constants::*;
pub use time::*;

// Re-export commonly used math types
pub use glam::{Vec2, Vec3};
