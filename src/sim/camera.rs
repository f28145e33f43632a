//! Horizontal auto-scrolling camera
//!
//! Scrolls at a constant base speed. A player pushing right past two-thirds
//! of the viewport speeds it up in proportion to the overshoot (capped);
//! a player who stops while still past that line keeps the current speed.

use glam::Vec2;

use crate::Viewport;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Default)]
pub struct Camera {
    /// World x of the viewport's left edge
    pub x: f32,
    /// Scroll speed used last frame (units per ms; 0 before the first update)
    pub speed: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the scroll
    pub fn update(
        &mut self,
        dt: f32,
        player: Vec2,
        level_length: f32,
        moving_right: bool,
        viewport: Viewport,
        tuning: &Tuning,
    ) {
        let base = tuning.auto_scroll_speed;
        let overshoot = self.to_screen_x(player.x) - viewport.follow_line();

        self.speed = if overshoot >= 0.0 && moving_right {
            (base + overshoot * tuning.camera_follow_gain).min(tuning.max_scroll_speed())
        } else if overshoot >= 0.0 {
            // Still ahead of the line: hold
            self.speed.max(base)
        } else {
            base
        };

        self.x += self.speed * dt;
        self.x = self.x.min(level_length - viewport.width).max(0.0);
    }

    #[inline]
    pub fn to_screen_x(&self, world_x: f32) -> f32 {
        world_x - self.x
    }

    /// No vertical scroll
    #[inline]
    pub fn to_screen_y(&self, world_y: f32) -> f32 {
        world_y
    }
}
