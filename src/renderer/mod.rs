//! Rendering module
//!
//! Each frame the simulation is flattened into screen-space sprite snapshots
//! which a `Surface` draws in order. The core never depends on drawing
//! succeeding.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use glam::Vec2;
use std::f32::consts::PI;

use crate::Viewport;
use crate::consts::*;
use crate::sim::{Bounded, Camera, CollectibleKind, GamePhase, GameState, Gender, Rect};

/// Height of the goal pole above the ground
pub const GOAL_POLE_HEIGHT: f32 = 100.0;

/// A drawing backend
pub trait Surface {
    /// Start a frame (clear, background)
    fn begin(&mut self, viewport: Viewport);
    /// Draw one sprite on top of what is there
    fn draw(&mut self, sprite: &Sprite);
}

/// Full-screen overlay for the non-playing phases
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    NameEntry { typed: String },
    Start { name: String },
    GameOver { score: u64 },
    Victory { score: u64 },
}

/// Read-only draw command in screen space
#[derive(Debug, Clone, PartialEq)]
pub enum Sprite {
    Platform {
        rect: Rect,
        ground: bool,
    },
    Goal {
        x: f32,
        ground_y: f32,
    },
    House {
        body: Rect,
        chimney: Rect,
        door: Rect,
        lights_on: bool,
    },
    Smoke {
        center: Vec2,
        radius: f32,
        opacity: f32,
    },
    Collectible {
        center: Vec2,
        kind: CollectibleKind,
        scale: f32,
        opacity: f32,
    },
    Enemy {
        rect: Rect,
        gender: Gender,
        name: String,
        facing_right: bool,
        opacity: f32,
    },
    Player {
        rect: Rect,
        facing_right: bool,
        walk_frame: u32,
        squash: Vec2,
        /// Radians, spins while dying
        rotation: f32,
        scale: f32,
        opacity: f32,
    },
    Hud {
        score: u64,
        lives: u32,
        best: Option<u64>,
    },
    Overlay(Screen),
}

/// World rect to screen, `None` when fully outside the viewport
fn on_screen(camera: &Camera, rect: Rect, viewport: Viewport) -> Option<Rect> {
    let x = camera.to_screen_x(rect.x);
    if x + rect.w < 0.0 || x > viewport.width {
        return None;
    }
    Some(Rect::new(x, camera.to_screen_y(rect.y), rect.w, rect.h))
}

/// Snapshot everything visible this frame, back to front
pub fn frame(state: &GameState, viewport: Viewport, best: Option<u64>) -> Vec<Sprite> {
    let camera = &state.camera;
    let world = &state.world;
    let mut sprites = Vec::new();

    for (i, platform) in world.platforms.iter().enumerate() {
        if let Some(rect) = on_screen(camera, platform.bounds(), viewport) {
            sprites.push(Sprite::Platform { rect, ground: i == 0 });
        }
    }

    let goal_x = camera.to_screen_x(world.goal_x);
    if (0.0..=viewport.width).contains(&goal_x) {
        sprites.push(Sprite::Goal {
            x: goal_x,
            ground_y: camera.to_screen_y(world.ground_y),
        });
    }

    for house in &world.houses {
        let Some(body) = on_screen(camera, house.bounds(), viewport) else {
            continue;
        };
        let shift = |r: Rect| Rect::new(camera.to_screen_x(r.x), camera.to_screen_y(r.y), r.w, r.h);
        sprites.push(Sprite::House {
            body,
            chimney: shift(house.chimney_bounds()),
            door: shift(house.door_bounds()),
            lights_on: house.lights_on,
        });
        for puff in &house.smoke {
            sprites.push(Sprite::Smoke {
                center: Vec2::new(camera.to_screen_x(puff.pos.x), camera.to_screen_y(puff.pos.y)),
                radius: puff.size,
                opacity: puff.opacity.clamp(0.0, 1.0),
            });
        }
    }

    for item in world.collectibles.iter().filter(|c| c.visible()) {
        if on_screen(camera, item.bounds(), viewport).is_none() {
            continue;
        }
        let center = item.bounds().center();
        sprites.push(Sprite::Collectible {
            center: Vec2::new(camera.to_screen_x(center.x), camera.to_screen_y(center.y)),
            kind: item.kind,
            scale: item.scale,
            opacity: item.opacity.clamp(0.0, 1.0),
        });
    }

    for enemy in world.enemies.iter().filter(|e| e.visible()) {
        let Some(rect) = on_screen(camera, enemy.bounds(), viewport) else {
            continue;
        };
        let opacity = if enemy.defeated {
            (1.0 - enemy.defeat_ms / ENEMY_FADE_MS).clamp(0.0, 1.0)
        } else {
            1.0
        };
        sprites.push(Sprite::Enemy {
            rect,
            gender: enemy.gender,
            name: enemy.name.clone(),
            facing_right: enemy.direction > 0.0,
            opacity,
        });
    }

    if let Some(sprite) = player_sprite(state) {
        sprites.push(sprite);
    }

    match state.phase {
        GamePhase::Playing => sprites.push(Sprite::Hud {
            score: state.score,
            lives: state.lives,
            best,
        }),
        GamePhase::NameEntry => sprites.push(Sprite::Overlay(Screen::NameEntry {
            typed: state.name_input.clone(),
        })),
        GamePhase::Start => sprites.push(Sprite::Overlay(Screen::Start {
            name: state.player_name.clone(),
        })),
        GamePhase::GameOver => sprites.push(Sprite::Overlay(Screen::GameOver { score: state.score })),
        GamePhase::Victory => sprites.push(Sprite::Overlay(Screen::Victory { score: state.score })),
    }

    sprites
}

/// Hidden inside a house; drawn where it died while dying
fn player_sprite(state: &GameState) -> Option<Sprite> {
    let player = &state.player;
    if player.in_house() {
        return None;
    }

    let (pos, rotation, fade) = match player.death {
        Some(death) => {
            let p = player.death_progress(state.tuning.death_ms);
            (death.at, 4.0 * PI * p, 1.0 - p)
        }
        None => (player.pos, 0.0, 1.0),
    };

    Some(Sprite::Player {
        rect: Rect::new(
            state.camera.to_screen_x(pos.x),
            state.camera.to_screen_y(pos.y),
            player.size.x,
            player.size.y,
        ),
        facing_right: player.facing_right,
        walk_frame: player.walk_frame(),
        squash: player.squash,
        rotation,
        scale: fade,
        opacity: fade,
    })
}
