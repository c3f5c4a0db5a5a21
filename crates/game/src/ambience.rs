//! Ambient atmosphere: the light-flicker state machine and the scheduler
//! for distant footsteps and electrical buzzes.

use audio::{directional_pan, SoundEvent, SoundRequest};
use engine_core::*;
use rand::prelude::*;

/// Ambient state. Owns its own RNG stream so atmosphere never perturbs
/// world generation.
#[derive(Debug)]
pub struct Ambience {
    rng: StdRng,
    flicker_timer: f32,
    flicker: f32,
    hum_started: bool,
    footstep_timer: f32,
    buzz_timer: f32,
}

impl Ambience {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(0x0a5d));
        let footstep_timer = rng.gen_range(FOOTSTEP_INTERVAL.0..FOOTSTEP_INTERVAL.1);
        let buzz_timer = rng.gen_range(BUZZ_INTERVAL.0..BUZZ_INTERVAL.1);
        Self {
            rng,
            flicker_timer: 0.0,
            flicker: 1.0,
            hum_started: false,
            footstep_timer,
            buzz_timer,
        }
    }

    /// Global brightness multiplier for this frame, 1.0 when the lights
    /// are steady.
    pub fn flicker(&self) -> f32 {
        self.flicker
    }

    /// Advance one tick; ambient sound requests are appended to `sounds`.
    pub fn update(&mut self, dt: f32, listener_yaw: f32, sounds: &mut Vec<SoundRequest>) {
        if !self.hum_started {
            self.hum_started = true;
            sounds.push(SoundRequest::centered(SoundEvent::Hum));
        }

        // Flicker: a small chance each frame, then a short ragged dip.
        if self.flicker_timer > 0.0 {
            self.flicker_timer -= dt;
            if self.flicker_timer <= 0.0 {
                self.flicker = 1.0;
            } else {
                self.flicker = 1.0 - FLICKER_DEPTH * self.rng.gen_range(0.6..1.0);
            }
        } else if self.rng.gen::<f32>() < FLICKER_CHANCE {
            self.flicker_timer = FLICKER_DURATION;
        }

        self.footstep_timer -= dt;
        if self.footstep_timer <= 0.0 {
            self.footstep_timer = self.rng.gen_range(FOOTSTEP_INTERVAL.0..FOOTSTEP_INTERVAL.1);
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            sounds.push(SoundRequest {
                event: SoundEvent::Footstep,
                pan: directional_pan(angle, listener_yaw),
            });
        }

        self.buzz_timer -= dt;
        if self.buzz_timer <= 0.0 {
            self.buzz_timer = self.rng.gen_range(BUZZ_INTERVAL.0..BUZZ_INTERVAL.1);
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            sounds.push(SoundRequest {
                event: SoundEvent::Buzz,
                pan: directional_pan(angle, listener_yaw),
            });
        }
    }
}
