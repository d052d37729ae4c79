//! Input handling: desktop keyboard/mouse state and the tracked XR input model.

pub mod xr;

pub use xr::*;

use glam::Vec2;
use std::collections::HashSet;

/// Keys the desktop controls react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Shift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    Pressed,
    Released,
}

/// Manages desktop input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<Key>,

    /// Cursor position normalized to `[-1, 1]`, +Y up.
    cursor: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event. Repeated presses of a held key are harmless.
    pub fn process_keyboard(&mut self, key: Key, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a cursor move in window pixels.
    pub fn process_cursor_position(&mut self, position: (f64, f64), window_size: (u32, u32)) {
        let width = window_size.0.max(1) as f64;
        let height = window_size.1.max(1) as f64;
        self.cursor = Vec2::new(
            (position.0 / width * 2.0 - 1.0) as f32,
            -(position.1 / height * 2.0 - 1.0) as f32,
        );
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: Key) -> bool {
        self.keys_held.contains(&key)
    }

    /// Cursor position normalized to `[-1, 1]` on both axes, +Y up.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// WASD as `(strafe, forward)`, each component in `{-1, 0, 1}`.
    ///
    /// Not normalized: holding two directions moves faster diagonally.
    pub fn movement_input(&self) -> Vec2 {
        let mut movement = Vec2::ZERO;

        if self.is_key_held(Key::W) {
            movement.y += 1.0;
        }
        if self.is_key_held(Key::S) {
            movement.y -= 1.0;
        }
        if self.is_key_held(Key::A) {
            movement.x -= 1.0;
        }
        if self.is_key_held(Key::D) {
            movement.x += 1.0;
        }

        movement
    }

    /// Check if sprint is held (Shift).
    pub fn is_sprinting(&self) -> bool {
        self.is_key_held(Key::Shift)
    }
}
