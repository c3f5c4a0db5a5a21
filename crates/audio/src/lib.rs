//! Audio playback using Kira.
//!
//! The core never synthesizes or plays audio itself; it emits
//! [`SoundRequest`] records with a logical event and a stereo pan, and the
//! host drains them into an [`AudioSystem`]. Missing device or missing
//! sound assets degrade to silence.

use anyhow::Result;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    tween::Tween,
};
use std::collections::HashMap;
use std::path::Path;

/// Logical sound events the simulation can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    /// Ambient fluorescent-light hum (looped).
    Hum,
    /// Distant ambient footstep (directional).
    Footstep,
    /// The player's own footstep.
    PlayerFootstep,
    /// Crouched player footstep.
    CrouchFootstep,
    /// Distant electrical buzz (directional).
    Buzz,
    /// Wall destruction burst.
    Destroy,
}

/// One queued playback request from the core.
#[derive(Debug, Clone, Copy)]
pub struct SoundRequest {
    pub event: SoundEvent,
    /// Stereo pan in [0, 1]; 0.5 is centered.
    pub pan: f32,
}

impl SoundRequest {
    pub fn centered(event: SoundEvent) -> Self {
        Self { event, pan: 0.5 }
    }
}

/// Stereo pan for a world-space sound direction relative to the listener's
/// yaw: 0.5 + wrapped(angle - yaw) / pi * 0.5, clamped to [0, 1].
pub fn directional_pan(world_angle: f32, listener_yaw: f32) -> f32 {
    let mut diff = world_angle - listener_yaw;
    while diff > std::f32::consts::PI {
        diff -= std::f32::consts::TAU;
    }
    while diff < -std::f32::consts::PI {
        diff += std::f32::consts::TAU;
    }
    (0.5 + diff / std::f32::consts::PI * 0.5).clamp(0.0, 1.0)
}

/// Kira-backed playback sink.
pub struct AudioSystem {
    manager: AudioManager,
    sounds: HashMap<SoundEvent, StaticSoundData>,
    hum: Option<StaticSoundHandle>,
}

impl AudioSystem {
    /// Create the audio system; fails only if no output device exists.
    pub fn new() -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        Ok(Self {
            manager,
            sounds: HashMap::new(),
            hum: None,
        })
    }

    /// Register a sound file for an event. Unregistered events play as
    /// silence.
    pub fn load_sound(&mut self, event: SoundEvent, path: &Path) -> Result<()> {
        let data = StaticSoundData::from_file(path)?;
        self.sounds.insert(event, data);
        Ok(())
    }

    pub fn has_sound(&self, event: SoundEvent) -> bool {
        self.sounds.contains_key(&event)
    }

    /// Play one request. The hum event starts a loop instead (idempotent).
    pub fn play(&mut self, req: SoundRequest) {
        if req.event == SoundEvent::Hum {
            self.start_hum();
            return;
        }
        let Some(data) = self.sounds.get(&req.event) else {
            return;
        };
        let settings = StaticSoundSettings::new()
            .volume(0.7)
            .panning(req.pan.clamp(0.0, 1.0) as f64);
        if let Err(e) = self.manager.play(data.clone().with_settings(settings)) {
            log::warn!("Sound playback failed for {:?}: {}", req.event, e);
        }
    }

    /// Start the looped ambient hum if it is not already running.
    pub fn start_hum(&mut self) {
        if self.hum.is_some() {
            return;
        }
        let Some(data) = self.sounds.get(&SoundEvent::Hum) else {
            return;
        };
        let settings = StaticSoundSettings::new()
            .volume(0.4)
            .loop_region(..);
        match self.manager.play(data.clone().with_settings(settings)) {
            Ok(handle) => self.hum = Some(handle),
            Err(e) => log::warn!("Hum playback failed: {}", e),
        }
    }

    /// Stop the ambient hum (pause menu, shutdown).
    pub fn stop_hum(&mut self) {
        if let Some(mut handle) = self.hum.take() {
            handle.stop(Tween::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    /// A sound straight ahead is centered.
    #[test]
    fn pan_is_centered_for_sounds_ahead() {
        assert!((directional_pan(0.3, 0.3) - 0.5).abs() < 1e-6);
    }

    /// Right of the listener pans right, left pans left.
    #[test]
    fn pan_follows_relative_direction() {
        assert!((directional_pan(FRAC_PI_2, 0.0) - 0.75).abs() < 1e-6);
        assert!((directional_pan(-FRAC_PI_2, 0.0) - 0.25).abs() < 1e-6);
    }

    /// Angle differences wrap into (-pi, pi] before panning.
    #[test]
    fn pan_wraps_angle_difference() {
        let a = directional_pan(PI + FRAC_PI_2, 0.0);
        let b = directional_pan(-FRAC_PI_2, 0.0);
        assert!((a - b).abs() < 1e-5);
    }

    #[test]
    fn pan_stays_in_unit_range() {
        let mut angle = -20.0_f32;
        while angle < 20.0 {
            let p = directional_pan(angle, 1.3);
            assert!((0.0..=1.0).contains(&p));
            angle += 0.37;
        }
    }
}
