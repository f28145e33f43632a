//! Per-frame simulation tick
//!
//! Phase state machine plus the playing-phase update order: houses, player,
//! camera, enemies, items, goal.

use glam::Vec2;
use rand::Rng;

use super::collision::{EnemyContact, StepContext, chimney_entry, classify_enemy_contact, step_player};
use super::geometry::Bounded;
use super::state::{Collectible, CollectibleKind, GameEvent, GamePhase, GameState, HouseVisit};
use crate::Viewport;
use crate::platform::{InputState, LogicalKey};

/// Longest name the entry screen accepts
pub const MAX_NAME_LEN: usize = 10;

/// Bonus present spawn band: from this far below the top...
const BONUS_MIN_Y: f32 = 100.0;
/// ...to this far above the bottom of the viewport
const BONUS_BOTTOM_MARGIN: f32 = 150.0;

/// Advance the game by one frame. `dt` is the raw frame delta in ms.
pub fn tick(state: &mut GameState, input: &mut InputState, viewport: Viewport, dt: f32) {
    // Stalled frames are clamped so the player cannot tunnel through platforms
    let dt = dt.clamp(0.0, state.tuning.max_frame_ms);
    input.update(dt);

    match state.phase {
        GamePhase::NameEntry => name_entry(state, input),
        GamePhase::Start | GamePhase::GameOver | GamePhase::Victory => {
            let confirm = input.is_pressed(LogicalKey::Confirm);
            if !confirm {
                state.confirm_armed = true;
            } else if state.confirm_armed {
                state.confirm_armed = false;
                // The restart key may double as jump; don't let it leak into play
                if input.jump_pressed() {
                    input.consume_jump();
                }
                state.restart(viewport);
            }
        }
        GamePhase::Playing => play(state, input, viewport, dt),
    }
}

/// Accept a player name. Returns false (and stays put) if it is blank or
/// the name screen is not showing.
pub fn submit_name(state: &mut GameState, name: &str) -> bool {
    if state.phase != GamePhase::NameEntry {
        return false;
    }
    let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    if name.is_empty() {
        return false;
    }
    log::info!("Player name set to {name:?}");
    state.player_name = name;
    state.name_input.clear();
    state.phase = GamePhase::Start;
    state.confirm_armed = false;
    true
}

/// Keys the name entry screen reacts to (modifiers and the like are ignored)
fn is_name_key(key: &str) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c == ' ' || c.is_ascii_alphanumeric(),
        _ => matches!(key, "backspace" | "enter"),
    }
}

/// One key per press: the latch holds until every handled key is released
fn name_entry(state: &mut GameState, input: &InputState) {
    let Some(key) = input.pressed_keys().find(|k| is_name_key(k)).map(str::to_owned) else {
        state.name_key_latched = false;
        return;
    };
    if state.name_key_latched {
        return;
    }
    state.name_key_latched = true;

    match key.as_str() {
        "backspace" => {
            state.name_input.pop();
        }
        "enter" | " " => {
            let typed = state.name_input.clone();
            submit_name(state, &typed);
        }
        _ => {
            if state.name_input.len() < MAX_NAME_LEN {
                state.name_input.extend(key.chars().map(|c| c.to_ascii_uppercase()));
            }
        }
    }
}

fn play(state: &mut GameState, input: &mut InputState, viewport: Viewport, dt: f32) {
    state.clock_ms += dt;

    for house in &mut state.world.houses {
        house.update(dt, &mut state.rng);
    }

    if let Some(visit) = state.player.visit.as_mut() {
        visit.timer_ms += dt;
        if visit.timer_ms >= state.tuning.house_stay_ms {
            let house = visit.house;
            leave_house(state, house);
        }
    } else {
        let solids = state.world.solids();
        let ctx = StepContext {
            solids: &solids,
            camera: &state.camera,
            viewport,
            goal_x: state.world.goal_x,
            spawn: state.world.spawn_point(),
            tuning: &state.tuning,
        };
        let outcome = step_player(&mut state.player, input, &ctx, dt);

        if outcome.landed {
            let pos = Vec2::new(state.player.bounds().center().x, state.player.bottom());
            state.events.push(GameEvent::Landed { pos });
        }
        if outcome.respawned {
            log::debug!("Player respawned with {} lives", state.lives);
        }
        if !state.player.is_dead() {
            enter_chimney(state, viewport);
        }
    }

    let moving_right = input.is_pressed(LogicalKey::Right);
    state.camera.update(
        dt,
        state.player.pos,
        state.world.length,
        moving_right,
        viewport,
        &state.tuning,
    );

    if resolve_enemies(state, dt) {
        return;
    }
    collect_items(state, dt);

    let active = !state.player.is_dead() && !state.player.in_house();
    if active && state.player.pos.x >= state.world.goal_x {
        state.phase = GamePhase::Victory;
        state.confirm_armed = false;
        state.events.push(GameEvent::RunEnded {
            victory: true,
            score: state.score,
        });
        log::info!("Victory with score {}", state.score);
    }
}

/// Drop into the first unlit chimney the player is lined up on
fn enter_chimney(state: &mut GameState, viewport: Viewport) {
    let Some(index) = state
        .world
        .houses
        .iter()
        .position(|house| chimney_entry(&state.player, house))
    else {
        return;
    };

    let house = &mut state.world.houses[index];
    if !house.light_up() {
        return;
    }
    let chimney = house.chimney_bounds();

    state.score += state.tuning.points_house;
    state.player.visit = Some(HouseVisit {
        house: index,
        timer_ms: 0.0,
    });
    state.player.vel = Vec2::ZERO;
    state.events.push(GameEvent::ChimneyEntered {
        pos: Vec2::new(chimney.center().x, chimney.y),
    });

    // Bonus present somewhere in view
    let x = state.camera.x + state.rng.random::<f32>() * viewport.width;
    let span = (viewport.height - BONUS_BOTTOM_MARGIN - BONUS_MIN_Y).max(0.0);
    let y = BONUS_MIN_Y + state.rng.random::<f32>() * span;
    state
        .world
        .collectibles
        .push(Collectible::new(Vec2::new(x, y), CollectibleKind::Present));

    log::info!("Entered house {index}, score {}", state.score);
}

/// Step out of the front door onto the ground
fn leave_house(state: &mut GameState, index: usize) {
    let Some(house) = state.world.houses.get(index) else {
        state.player.visit = None;
        return;
    };
    let door = house.door_bounds();
    let player = &mut state.player;
    player.pos = Vec2::new(
        door.center().x - player.size.x / 2.0,
        state.world.ground_y - player.size.y,
    );
    player.vel = Vec2::ZERO;
    player.grounded = true;
    player.visit = None;
}

/// Patrol every enemy, then judge contacts. Returns true if a life was lost.
fn resolve_enemies(state: &mut GameState, dt: f32) -> bool {
    for enemy in &mut state.world.enemies {
        enemy.update(dt, &state.tuning);
    }

    if state.player.is_dead() || state.player.in_house() {
        return false;
    }

    let body = state.player.bounds();
    let mut hit = false;
    for enemy in state.world.enemies.iter_mut().filter(|e| !e.defeated) {
        match classify_enemy_contact(&body, state.player.vel.y, &enemy.bounds()) {
            Some(EnemyContact::Stomp) => {
                enemy.defeated = true;
                state.player.vel.y = -state.tuning.stomp_bounce;
                state.score += state.tuning.points_stomp;
                state.events.push(GameEvent::EnemyDefeated {
                    pos: enemy.bounds().center(),
                    name: enemy.name.clone(),
                });
                log::debug!("Stomped {}", enemy.name);
            }
            Some(EnemyContact::Lethal) => {
                hit = true;
                break;
            }
            Some(EnemyContact::PassOver) | None => {}
        }
    }

    if hit {
        lose_life(state);
    }
    hit
}

fn collect_items(state: &mut GameState, dt: f32) {
    let active = !state.player.is_dead() && !state.player.in_house();
    let body = state.player.bounds();

    for item in &mut state.world.collectibles {
        item.update(dt, state.clock_ms);
        if active && !item.collected && body.intersects(&item.bounds()) && item.collect() {
            state.score += state.tuning.points_collect;
            state.events.push(GameEvent::Collected {
                pos: item.pos,
                kind: item.kind,
            });
        }
    }
}

/// Take a life; the last one ends the run
fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.confirm_armed = false;
        state.events.push(GameEvent::RunEnded {
            victory: false,
            score: state.score,
        });
        log::info!("Game over with score {}", state.score);
    } else {
        state.player.start_death();
        state.events.push(GameEvent::LifeLost { lives: state.lives });
        log::info!("Life lost, {} left", state.lives);
    }
}
