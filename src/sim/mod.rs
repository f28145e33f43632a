//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped frame delta
//! - Seeded RNG only
//! - Stable iteration order (entity lists are append-only within a level)
//! - No rendering or platform dependencies beyond the input state

pub mod camera;
pub mod collision;
pub mod geometry;
pub mod level;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{EnemyContact, StepContext, StepOutcome, classify_enemy_contact, step_player};
pub use geometry::{Bounded, Rect, Solid};
pub use state::{
    Collectible, CollectibleKind, Death, Enemy, GameEvent, GamePhase, GameState, Gender, House,
    HouseVisit, Platform, Player, SmokePuff, World,
};
pub use tick::{MAX_NAME_LEN, submit_name, tick};
