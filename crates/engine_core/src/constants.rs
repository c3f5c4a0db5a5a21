//! World tuning constants.
//!
//! Everything here is in world units: one lattice cell is `PILLAR_SPACING`
//! units on a side, the floor sits at y = 0 and +Y is up.

/// Distance between adjacent lattice intersections (one maze cell).
pub const PILLAR_SPACING: i32 = 200;

/// Zone edge length; a zone groups 5x5 cells under one tint/decay roll.
pub const ZONE_SIZE: i32 = 1000;

/// Floor plane height.
pub const FLOOR_Y: f32 = 0.0;

/// Ceiling / top-of-wall height.
pub const WALL_HEIGHT: f32 = 140.0;

/// Full wall slab thickness.
pub const WALL_THICKNESS: f32 = 16.0;

/// Opening widths as fractions of the cell spacing, so topology stays
/// well-formed when tests shrink the spacing.
pub const DOORWAY_WIDTH_FRAC: f32 = 0.3;
pub const HALLWAY_WIDTH_FRAC: f32 = 0.6;

/// Footprint of a freestanding pillar.
pub const PILLAR_SIZE: f32 = 28.0;

// ── Player ──────────────────────────────────────────────────────────────

pub const PLAYER_RADIUS: f32 = 15.0;
pub const EYE_HEIGHT_STAND: f32 = 90.0;
pub const EYE_HEIGHT_CROUCH: f32 = 50.0;

pub const WALK_SPEED: f32 = 180.0;
pub const RUN_SPEED: f32 = 320.0;
pub const CROUCH_SPEED: f32 = 90.0;

/// Downward acceleration magnitude (world units / s²).
pub const GRAVITY: f32 = 600.0;
pub const JUMP_SPEED: f32 = 250.0;

/// How fast eye height eases between stand and crouch.
pub const CROUCH_TRANSITION_SPEED: f32 = 6.0;

/// Head-bob cycles per second while moving, and bob amplitudes.
pub const HEAD_BOB_SPEED: f32 = 2.1;
pub const HEAD_BOB_AMOUNT: f32 = 3.0;
pub const HEAD_BOB_SWAY: f32 = 1.5;

/// Perpetual low-amplitude camera drift.
pub const CAMERA_SHAKE_AMOUNT: f32 = 0.35;

/// Per-frame lerp factors for the smoothed (render) camera pose.
pub const CAMERA_SMOOTHING: f32 = 0.35;
pub const ROTATION_SMOOTHING: f32 = 0.4;

// ── Rendering ───────────────────────────────────────────────────────────

/// Camera-space depth below which geometry is clipped.
pub const NEAR: f32 = 4.0;

pub const FOV_DEGREES: f32 = 90.0;

/// Horizontal distance out to which cells are emitted.
pub const RENDER_DISTANCE: f32 = 1200.0;

pub const FOG_START: f32 = 400.0;
pub const FOG_END: f32 = 1100.0;
pub const FOG_COLOR: [u8; 3] = [12, 11, 6];

/// Default offscreen target scale relative to the window.
pub const RENDER_SCALE: f32 = 1.0;
pub const RENDER_SCALE_LOW: f32 = 0.5;
/// How fast the render scale eases toward its target (per second).
pub const RENDER_SCALE_TRANSITION_SPEED: f32 = 2.0;

// That sickly fluorescent-yellow palette.
pub const WALL_COLOR: [u8; 3] = [196, 178, 108];
pub const FLOOR_COLOR: [u8; 3] = [150, 132, 72];
pub const CEILING_COLOR: [u8; 3] = [214, 204, 158];
pub const PILLAR_COLOR: [u8; 3] = [188, 168, 96];

// ── Light flicker ───────────────────────────────────────────────────────

/// Chance per update tick that the lights start flickering.
pub const FLICKER_CHANCE: f32 = 0.002;
pub const FLICKER_DURATION: f32 = 0.18;
/// Brightness drop while flickering (1.0 - this is the floor).
pub const FLICKER_DEPTH: f32 = 0.45;

// ── Destruction / debris ────────────────────────────────────────────────

/// Maximum reach for wall targeting.
pub const DESTROY_REACH: f32 = 260.0;

/// Debris burst size for the first destroyed wall; shrinks asymptotically
/// as more walls go down, never below the minimum.
pub const DEBRIS_BASE_BURST: usize = 1200;
pub const DEBRIS_MIN_BURST: usize = 250;

/// Settled particles spawned for a pre-destroyed (rubble) wall.
pub const RUBBLE_PILE_COUNT: usize = 80;

/// Hard cap on live particles; oldest are evicted past this.
pub const DEBRIS_MAX: usize = 12_000;
/// Horizontal distance beyond which particles are culled.
pub const DEBRIS_CULL_DIST: f32 = 900.0;
/// Horizontal distance out to which particles are drawn.
pub const DEBRIS_RENDER_DIST: f32 = 600.0;

// ── Ambient sound scheduling (seconds between events, min..max) ─────────

pub const FOOTSTEP_INTERVAL: (f32, f32) = (6.0, 18.0);
pub const BUZZ_INTERVAL: (f32, f32) = (10.0, 30.0);
