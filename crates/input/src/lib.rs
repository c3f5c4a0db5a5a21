//! Input handling for keyboard and mouse.
//!
//! `InputState` accumulates winit events; once per frame it is distilled
//! into a [`FrameInput`] snapshot, which is all the simulation ever sees.

use glam::Vec2;
use std::collections::HashSet;

/// Per-frame input snapshot consumed by the world engine. Plain data; the
/// core never polls devices.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameInput {
    pub move_forward: bool,
    pub move_back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    /// Sprint modifier held.
    pub run: bool,
    /// Jump pressed this frame.
    pub jump: bool,
    /// Crouch toggle pressed this frame.
    pub crouch: bool,
    /// Destroy-wall action pressed this frame.
    pub destroy: bool,
    /// Mouse look delta, sensitivity already applied.
    pub look_delta: Vec2,
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,

    /// Mouse movement delta this frame.
    mouse_delta: Vec2,
    /// Accumulated mouse delta (drained at frame start).
    accumulated_delta: Vec2,

    /// Whether the cursor is captured; look input only applies then.
    cursor_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame edge state (presses, releases, deltas). Call once
    /// the tick has consumed the frame's input; accumulated state then
    /// belongs to the next frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
    }

    pub fn on_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            if self.keys_held.insert(key) {
                self.keys_pressed.insert(key);
            }
        } else {
            self.keys_held.remove(&key);
        }
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_pressed.insert(button);
        }
    }

    pub fn on_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.accumulated_delta += Vec2::new(dx as f32, dy as f32);
    }

    pub fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor_locked = locked;
        if !locked {
            self.accumulated_delta = Vec2::ZERO;
        }
    }

    pub fn cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Distill the accumulated state into the snapshot the core consumes.
    pub fn frame_input(&self, sensitivity: f32) -> FrameInput {
        let look_delta = if self.cursor_locked {
            self.mouse_delta * 0.002 * sensitivity
        } else {
            Vec2::ZERO
        };
        FrameInput {
            move_forward: self.is_key_held(KeyCode::KeyW) || self.is_key_held(KeyCode::ArrowUp),
            move_back: self.is_key_held(KeyCode::KeyS) || self.is_key_held(KeyCode::ArrowDown),
            strafe_left: self.is_key_held(KeyCode::KeyA),
            strafe_right: self.is_key_held(KeyCode::KeyD),
            run: self.is_key_held(KeyCode::ShiftLeft),
            jump: self.is_key_pressed(KeyCode::Space),
            crouch: self.is_key_pressed(KeyCode::KeyC),
            destroy: self.mouse_pressed.contains(&MouseButton::Left)
                || self.is_key_pressed(KeyCode::KeyF),
            look_delta,
        }
    }
}

// Re-export for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_is_one_frame_only() {
        let mut s = InputState::new();
        s.on_key(KeyCode::Space, true);
        assert!(s.frame_input(1.0).jump);
        s.begin_frame();
        // Still held, but no longer "pressed".
        assert!(!s.frame_input(1.0).jump);
        assert!(s.is_key_held(KeyCode::Space));
    }

    /// Key auto-repeat must not re-trigger edge actions.
    #[test]
    fn held_key_repeat_does_not_retrigger() {
        let mut s = InputState::new();
        s.on_key(KeyCode::KeyC, true);
        s.begin_frame();
        s.on_key(KeyCode::KeyC, true); // OS repeat
        assert!(!s.frame_input(1.0).crouch);
    }

    #[test]
    fn look_delta_requires_locked_cursor() {
        let mut s = InputState::new();
        s.on_mouse_motion(10.0, -5.0);
        s.begin_frame();
        assert_eq!(s.frame_input(1.0).look_delta, Vec2::ZERO);

        s.set_cursor_locked(true);
        s.on_mouse_motion(10.0, -5.0);
        s.begin_frame();
        let look = s.frame_input(1.0).look_delta;
        assert!(look.x > 0.0 && look.y < 0.0);
    }

    #[test]
    fn unlocking_cursor_discards_pending_motion() {
        let mut s = InputState::new();
        s.set_cursor_locked(true);
        s.on_mouse_motion(50.0, 50.0);
        s.set_cursor_locked(false);
        s.begin_frame();
        assert_eq!(s.frame_input(1.0).look_delta, Vec2::ZERO);
    }
}
