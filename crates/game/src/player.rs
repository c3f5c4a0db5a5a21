//! First-person player controller: movement, collision slide, crouch, jump,
//! head bob, and the smoothed camera pose.

use engine_core::*;
use glam::{Vec2, Vec3};
use input::FrameInput;
use physics::collision::{collides, Collider};
use procgen::Topology;

/// Amplitude scale from the shake parameter to world units.
const SHAKE_SCALE: f32 = 10.0;

/// Per-second decay of the shake parameter.
const SHAKE_DECAY: f32 = 1.4;

/// The player. `position` is the feet; `position.y` is height above the
/// floor (0 when grounded). The raw pose updates instantly from input; the
/// smoothed pose lags behind and is what the camera uses.
#[derive(Debug)]
pub struct Player {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,

    collider: Collider,
    crouched: bool,
    eye_height: f32,
    vertical_velocity: f32,
    airborne: bool,

    bob_phase: f32,
    stepped: bool,
    running: bool,
    moving: bool,

    shake: f32,
    elapsed: f32,

    smoothed_eye: Vec3,
    smoothed_yaw: f32,
    smoothed_pitch: f32,
}

impl Player {
    pub fn new(spawn: Vec3) -> Self {
        let eye = spawn + Vec3::Y * EYE_HEIGHT_STAND;
        Self {
            position: spawn,
            yaw: 0.0,
            pitch: 0.0,
            collider: Collider::default(),
            crouched: false,
            eye_height: EYE_HEIGHT_STAND,
            vertical_velocity: 0.0,
            airborne: false,
            bob_phase: 0.0,
            stepped: false,
            running: false,
            moving: false,
            shake: 0.0,
            elapsed: 0.0,
            smoothed_eye: eye,
            smoothed_yaw: 0.0,
            smoothed_pitch: 0.0,
        }
    }

    /// One simulation tick. Collision queries go through the topology so
    /// walls roll lazily as the player approaches them.
    pub fn update(&mut self, dt: f32, input: &FrameInput, topo: &mut Topology) {
        self.elapsed += dt;
        self.stepped = false;

        // Look.
        self.yaw = wrap_angle(self.yaw + input.look_delta.x);
        self.pitch = (self.pitch - input.look_delta.y)
            .clamp(-std::f32::consts::FRAC_PI_2 + 0.01, std::f32::consts::FRAC_PI_2 - 0.01);

        // Crouch is a toggle; standing up mid-air is allowed, the eye
        // height just eases back.
        if input.crouch {
            self.crouched = !self.crouched;
        }
        let target_eye = if self.crouched {
            EYE_HEIGHT_CROUCH
        } else {
            EYE_HEIGHT_STAND
        };
        let ease = (CROUCH_TRANSITION_SPEED * dt).min(1.0);
        self.eye_height += (target_eye - self.eye_height) * ease;

        // Horizontal movement in the yaw frame.
        let forward = Vec2::new(self.yaw.sin(), self.yaw.cos());
        let right = Vec2::new(self.yaw.cos(), -self.yaw.sin());
        let mut wish = Vec2::ZERO;
        if input.move_forward {
            wish += forward;
        }
        if input.move_back {
            wish -= forward;
        }
        if input.strafe_right {
            wish += right;
        }
        if input.strafe_left {
            wish -= right;
        }

        self.running = input.run && !self.crouched;
        let speed = if self.crouched {
            CROUCH_SPEED
        } else if self.running {
            RUN_SPEED
        } else {
            WALK_SPEED
        };

        self.moving = wish != Vec2::ZERO;
        if self.moving {
            let step = wish.normalize() * speed * dt;
            self.try_move(topo, step);
        }

        // Jump and gravity.
        if input.jump && !self.airborne && !self.crouched {
            self.vertical_velocity = JUMP_SPEED;
            self.airborne = true;
        }
        if self.airborne {
            self.vertical_velocity -= GRAVITY * dt;
            self.position.y += self.vertical_velocity * dt;
            if self.position.y <= 0.0 {
                self.position.y = 0.0;
                self.vertical_velocity = 0.0;
                self.airborne = false;
            }
        }

        // Head bob advances only while walking on the ground; each half
        // cycle is one footstep.
        if self.moving && !self.airborne {
            let before = (self.bob_phase / std::f32::consts::PI).floor();
            self.bob_phase += dt * HEAD_BOB_SPEED * (speed / WALK_SPEED) * std::f32::consts::PI;
            let after = (self.bob_phase / std::f32::consts::PI).floor();
            self.stepped = after > before;
        }

        self.shake = (self.shake - SHAKE_DECAY * dt).max(0.0);

        // Smoothing. dt-aware exponential lag so the feel is frame-rate
        // independent.
        let raw_eye = self.raw_eye();
        let pos_alpha = 1.0 - CAMERA_SMOOTHING.powf(dt * 60.0);
        let rot_alpha = 1.0 - ROTATION_SMOOTHING.powf(dt * 60.0);
        self.smoothed_eye += (raw_eye - self.smoothed_eye) * pos_alpha;
        self.smoothed_yaw =
            wrap_angle(self.smoothed_yaw + wrap_angle(self.yaw - self.smoothed_yaw) * rot_alpha);
        self.smoothed_pitch += (self.pitch - self.smoothed_pitch) * rot_alpha;
    }

    /// Axis-separated move so the player slides along walls instead of
    /// sticking to them.
    fn try_move(&mut self, topo: &mut Topology, step: Vec2) {
        let nx = self.position.x + step.x;
        if !collides(topo, &self.collider, nx, self.position.z) {
            self.position.x = nx;
        }
        let nz = self.position.z + step.y;
        if !collides(topo, &self.collider, self.position.x, nz) {
            self.position.z = nz;
        }
    }

    /// Raw (unsmoothed) eye position: feet plus eased eye height, head bob,
    /// lateral sway and shake.
    fn raw_eye(&self) -> Vec3 {
        let right = Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin());
        let bob = self.bob_phase.sin() * HEAD_BOB_AMOUNT;
        let sway = (self.bob_phase * 0.5).cos() * HEAD_BOB_SWAY;
        let shake = self.shake * SHAKE_SCALE;
        self.position
            + Vec3::Y * (self.eye_height + bob + (self.elapsed * 11.3).cos() * shake)
            + right * (sway + (self.elapsed * 13.7).sin() * shake)
    }

    /// Kick the camera; called when a wall comes down nearby.
    pub fn add_shake(&mut self, amount: f32) {
        self.shake = (self.shake + amount).min(1.0);
    }

    /// Smoothed camera eye position.
    pub fn smoothed_eye(&self) -> Vec3 {
        self.smoothed_eye
    }

    pub fn smoothed_yaw(&self) -> f32 {
        self.smoothed_yaw
    }

    pub fn smoothed_pitch(&self) -> f32 {
        self.smoothed_pitch
    }

    /// True on ticks where the head bob completed a half cycle.
    pub fn took_step(&self) -> bool {
        self.stepped
    }

    pub fn is_crouched(&self) -> bool {
        self.crouched
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Snap the smoothed pose to the raw pose (teleports, loads).
    pub fn snap_camera(&mut self) {
        self.smoothed_eye = self.raw_eye();
        self.smoothed_yaw = self.yaw;
        self.smoothed_pitch = self.pitch;
    }
}

/// Wrap an angle to (-pi, pi].
fn wrap_angle(a: f32) -> f32 {
    let mut a = a % std::f32::consts::TAU;
    if a > std::f32::consts::PI {
        a -= std::f32::consts::TAU;
    } else if a <= -std::f32::consts::PI {
        a += std::f32::consts::TAU;
    }
    a
}
