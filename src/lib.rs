//! Winter Platformer - an auto-scrolling side-scroller for the browser canvas
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, level generation, game state)
//! - `game`: The `Game` aggregate the host drives once per animation frame
//! - `renderer`: Read-only sprite snapshots and the drawing surface seam
//! - `platform`: Browser/native platform abstraction (input, clock)
//! - `persistence`: Key-value storage backends
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::{HighScoreEntry, HighScoreStore, HighScores, StoredHighScores};
pub use settings::{NameConfig, Settings};
pub use tuning::Tuning;

/// Fixed geometry and tolerances (gameplay feel lives in `tuning`)
pub mod consts {
    /// Level length in world units
    pub const LEVEL_LENGTH: f32 = 6000.0;
    /// Distance of the goal marker from the level end
    pub const GOAL_INSET: f32 = 200.0;
    /// Ground slab thickness
    pub const GROUND_THICKNESS: f32 = 40.0;

    /// Player dimensions
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Spawn x (y is derived from the ground line)
    pub const SPAWN_X: f32 = 100.0;

    /// Grounding pre-check band around a platform top (before jump/gravity)
    pub const GROUND_TOLERANCE: f32 = 20.0;
    /// Landing band after position integration
    pub const LANDING_TOLERANCE: f32 = 25.0;
    /// How far below the viewport the player may fall before being reset
    pub const FALL_OUT_MARGIN: f32 = 100.0;
    /// Slack beyond two-thirds of the viewport before the player is pushed back
    pub const RIGHT_EDGE_SLACK: f32 = 30.0;
    /// Share of the overshoot removed per tick
    pub const RIGHT_EDGE_PUSHBACK: f32 = 0.3;
    /// Velocity damping while overshooting
    pub const RIGHT_EDGE_DAMPING: f32 = 0.7;

    /// Enemy dimensions
    pub const ENEMY_WIDTH: f32 = 30.0;
    pub const ENEMY_HEIGHT: f32 = 50.0;
    /// Bottom band below an enemy top that counts as a stomp
    pub const STOMP_THRESHOLD: f32 = 15.0;
    /// Grace margin before a contact becomes lethal
    pub const HIT_MARGIN: f32 = 5.0;
    /// Defeated enemies stop drawing after this long
    pub const ENEMY_FADE_MS: f32 = 500.0;

    /// Collectible hitbox edge length
    pub const COLLECTIBLE_SIZE: f32 = 30.0;
    /// Bob amplitude and angular speed
    pub const BOB_AMPLITUDE: f32 = 5.0;
    pub const BOB_SPEED: f32 = 0.003;

    /// House geometry
    pub const HOUSE_WIDTH: f32 = 80.0;
    pub const HOUSE_HEIGHT: f32 = 60.0;
    pub const CHIMNEY_WIDTH: f32 = 10.0;
    pub const CHIMNEY_HEIGHT: f32 = 25.0;
    /// Chimney top sits this far above the house body
    pub const CHIMNEY_RISE: f32 = 35.0;
    /// Synthetic cap is this much wider than the chimney on each side
    pub const CHIMNEY_CAP_OVERHANG: f32 = 2.0;
    pub const CHIMNEY_CAP_THICKNESS: f32 = 3.0;
    /// Chimney entry band around the chimney top
    pub const CHIMNEY_ENTRY_ABOVE: f32 = 5.0;
    pub const CHIMNEY_ENTRY_BELOW: f32 = 15.0;
    /// Entry allows slow upward drift
    pub const CHIMNEY_ENTRY_MIN_VY: f32 = -2.0;
    /// Smoke puff interval
    pub const SMOKE_INTERVAL_MS: f32 = 1000.0;

    /// Camera starts following once the player passes this share of the viewport
    pub const FOLLOW_FRACTION: f32 = 2.0 / 3.0;
}

/// Viewport size in CSS pixels (device dependent, sampled every frame)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Screen-space x where the camera starts following
    #[inline]
    pub fn follow_line(&self) -> f32 {
        self.width * consts::FOLLOW_FRACTION
    }
}

impl Default for Viewport {
    /// Desktop canvas size
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
