//! Data-driven game balance
//!
//! All times are milliseconds. Velocities are in units per tick because the
//! player integrates one Euler step per frame.

use serde::{Deserialize, Serialize};

/// Gameplay feel values (overridable from JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Horizontal speed (units per ms, scaled by dt into a per-tick velocity)
    pub run_speed: f32,
    /// Per-tick velocity decay when no direction is held
    pub friction: f32,
    /// Initial upward velocity of a jump
    pub jump_force: f32,
    /// Downward acceleration (per ms)
    pub gravity: f32,
    /// Upward velocity after stomping an enemy
    pub stomp_bounce: f32,

    /// Camera base scroll speed (units per ms)
    pub auto_scroll_speed: f32,
    /// Extra scroll speed per unit the player is past the follow line
    pub camera_follow_gain: f32,
    /// Scroll speed cap as a multiple of the base speed
    pub camera_max_speed_factor: f32,

    /// Frame delta ceiling; larger deltas are clamped before integrating
    pub max_frame_ms: f32,
    /// Death animation length
    pub death_ms: f32,
    /// Time spent inside a house before leaving through the door
    pub house_stay_ms: f32,

    /// Enemy patrol speed (units per ms) and half-range
    pub enemy_speed: f32,
    pub enemy_patrol_distance: f32,

    pub points_stomp: u64,
    pub points_collect: u64,
    pub points_house: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            run_speed: 0.35,
            friction: 0.8,
            jump_force: 50.0,
            gravity: 0.15,
            stomp_bounce: 5.0,

            auto_scroll_speed: 0.1,
            camera_follow_gain: 0.008,
            camera_max_speed_factor: 5.0,

            max_frame_ms: 50.0,
            death_ms: 1000.0,
            house_stay_ms: 1000.0,

            enemy_speed: 0.03,
            enemy_patrol_distance: 100.0,

            points_stomp: 100,
            points_collect: 50,
            points_house: 200,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table; absent fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Highest camera scroll speed
    #[inline]
    pub fn max_scroll_speed(&self) -> f32 {
        self.auto_scroll_speed * self.camera_max_speed_factor
    }
}
