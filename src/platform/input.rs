//! Keyboard and touch input folded into logical keys
//!
//! Jump is edge-triggered: a press arms `jump_pressed`, the physics step
//! consumes it, and it only re-arms after the key is released. Touch jump
//! re-arms after a short countdown instead of immediately.

use std::collections::BTreeSet;

/// Keys the simulation asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKey {
    Left,
    Right,
    Jump,
    Confirm,
}

/// On-screen touch buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    Left,
    Right,
    Jump,
}

/// Delay before a released touch jump can fire again
pub const TOUCH_JUMP_REARM_MS: f32 = 100.0;

const LEFT_KEYS: [&str; 2] = ["a", "arrowleft"];
const RIGHT_KEYS: [&str; 2] = ["d", "arrowright"];
const JUMP_KEYS: [&str; 3] = [" ", "w", "arrowup"];
const CONFIRM_KEYS: [&str; 2] = [" ", "enter"];

/// Input state sampled by the tick
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Held keys, lowercased DOM `key` values
    keys: BTreeSet<String>,
    touch_left: bool,
    touch_right: bool,
    touch_jump: bool,
    jump_pressed: bool,
    jump_consumed: bool,
    /// Countdown until a released touch jump re-arms (0 = idle)
    jump_rearm_ms: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyboard key went down (DOM `KeyboardEvent.key`)
    pub fn key_down(&mut self, key: &str) {
        let key = key.to_lowercase();
        if JUMP_KEYS.contains(&key.as_str()) && !self.jump_consumed {
            self.jump_pressed = true;
        }
        self.keys.insert(key);
    }

    /// Keyboard key went up
    pub fn key_up(&mut self, key: &str) {
        let key = key.to_lowercase();
        if JUMP_KEYS.contains(&key.as_str()) {
            self.jump_pressed = false;
            self.jump_consumed = false;
            self.jump_rearm_ms = 0.0;
        }
        self.keys.remove(&key);
    }

    /// Touch button state changed
    pub fn set_touch(&mut self, button: TouchButton, down: bool) {
        match button {
            TouchButton::Left => self.touch_left = down,
            TouchButton::Right => self.touch_right = down,
            TouchButton::Jump => {
                self.touch_jump = down;
                if down {
                    if !self.jump_consumed {
                        self.jump_pressed = true;
                    }
                } else {
                    self.jump_rearm_ms = TOUCH_JUMP_REARM_MS;
                }
            }
        }
    }

    /// Advance countdowns
    pub fn update(&mut self, dt: f32) {
        if self.jump_rearm_ms > 0.0 {
            self.jump_rearm_ms -= dt;
            if self.jump_rearm_ms <= 0.0 {
                self.jump_rearm_ms = 0.0;
                self.jump_consumed = false;
            }
        }
    }

    /// Whether a logical key is held (keyboard or touch)
    pub fn is_pressed(&self, key: LogicalKey) -> bool {
        let held = |names: &[&str]| names.iter().any(|n| self.keys.contains(*n));
        match key {
            LogicalKey::Left => held(&LEFT_KEYS) || self.touch_left,
            LogicalKey::Right => held(&RIGHT_KEYS) || self.touch_right,
            LogicalKey::Jump => held(&JUMP_KEYS) || self.touch_jump || self.jump_pressed,
            // Touch jump doubles as confirm on the menu screens
            LogicalKey::Confirm => held(&CONFIRM_KEYS) || self.touch_jump,
        }
    }

    /// One-shot jump request (armed by a fresh press)
    pub fn jump_pressed(&self) -> bool {
        self.jump_pressed
    }

    /// Mark the current jump press as used
    pub fn consume_jump(&mut self) {
        self.jump_consumed = true;
        self.jump_pressed = false;
    }

    /// Held raw keys in stable order (name entry only)
    pub fn pressed_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }

    /// Forget all held state (window blur, restart)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
