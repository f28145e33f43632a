//! Player physics and contact policies
//!
//! One Euler step per tick, no substeps. Platforms and chimney caps go
//! through the same grounding/landing/resolution passes via `Solid`.
//!
//! Contact policy is lenient on purpose: near misses are forgiven, jumping
//! clears enemies, and only landing on top defeats them.

use glam::Vec2;

use super::camera::Camera;
use super::geometry::{Bounded, Rect, Solid};
use super::state::{House, Player};
use crate::Viewport;
use crate::consts::*;
use crate::platform::{InputState, LogicalKey};
use crate::tuning::Tuning;

/// Everything the player step reads besides the player and input
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Platforms plus caps of unlit chimneys
    pub solids: &'a [Solid],
    pub camera: &'a Camera,
    pub viewport: Viewport,
    pub goal_x: f32,
    /// Respawn / fall-out reset point
    pub spawn: Vec2,
    pub tuning: &'a Tuning,
}

/// What happened to the player this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Touched down after being airborne
    pub landed: bool,
    /// Death animation finished and the player is back at spawn
    pub respawned: bool,
    /// Fell below the viewport and was reset (no penalty)
    pub fell_out: bool,
}

/// Advance the player by one tick
pub fn step_player(
    player: &mut Player,
    input: &mut InputState,
    ctx: &StepContext,
    dt: f32,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    if player.in_house() {
        return outcome;
    }

    // Physics is suspended while the death animation plays
    if let Some(death) = player.death.as_mut() {
        death.timer_ms += dt;
        if death.timer_ms >= ctx.tuning.death_ms {
            player.respawn(ctx.spawn);
            outcome.respawned = true;
        }
        return outcome;
    }

    player.was_grounded = player.grounded;
    animate(player, dt);

    // Horizontal input: direct velocity while held, fixed per-tick decay otherwise
    if input.is_pressed(LogicalKey::Left) {
        player.vel.x = -ctx.tuning.run_speed * dt;
    } else if input.is_pressed(LogicalKey::Right) {
        player.vel.x = ctx.tuning.run_speed * dt;
    } else {
        player.vel.x *= ctx.tuning.friction;
    }

    clamp_to_screen(player, ctx);

    // Grounding runs before jump/gravity so a same-tick jump is not missed
    ground_check(player, ctx.solids);

    if input.jump_pressed() && player.grounded {
        player.vel.y = -ctx.tuning.jump_force;
        player.grounded = false;
        player.set_squash(1.2, 0.8, 150.0);
        input.consume_jump();
    }

    player.tick_squash(dt);

    if !player.grounded {
        player.vel.y += ctx.tuning.gravity * dt;
    }

    player.pos += player.vel;

    land(player, ctx.solids);
    resolve(player, ctx.solids);

    if player.pos.y > ctx.viewport.height + FALL_OUT_MARGIN {
        player.pos = ctx.spawn;
        player.vel = Vec2::ZERO;
        player.grounded = true;
        outcome.fell_out = true;
        log::debug!("Player fell out of the world, reset to spawn");
    }

    outcome.landed = player.grounded && !player.was_grounded && !outcome.fell_out;
    outcome
}

/// Facing and walk cycle from last tick's velocity
fn animate(player: &mut Player, dt: f32) {
    if player.vel.x < 0.0 {
        player.facing_right = false;
    } else if player.vel.x > 0.0 {
        player.facing_right = true;
    }

    if player.vel.x.abs() > 0.01 && player.grounded {
        player.walk_cycle += dt * 0.01;
    } else {
        player.walk_cycle = 0.0;
    }
}

/// Keep the player on screen. The right side is soft: overshoot past the
/// follow line (plus slack) is eased back until the goal is within reach.
fn clamp_to_screen(player: &mut Player, ctx: &StepContext) {
    let screen_x = ctx.camera.to_screen_x(player.pos.x);

    if screen_x < 0.0 {
        player.pos.x = ctx.camera.x;
        if player.vel.x < 0.0 {
            player.vel.x = 0.0;
        }
    }

    let goal_nearby = ctx.goal_x - player.pos.x < ctx.viewport.width;
    let max_right = ctx.viewport.follow_line() + RIGHT_EDGE_SLACK;
    if !goal_nearby && screen_x > max_right {
        player.pos.x -= (screen_x - max_right) * RIGHT_EDGE_PUSHBACK;
        if player.vel.x > 0.0 {
            player.vel.x *= RIGHT_EDGE_DAMPING;
        }
    }
}

/// Bottom within `tolerance` of a solid's top while overlapping it horizontally
#[inline]
fn near_top(player: &Player, solid: &Rect, tolerance: f32) -> bool {
    let bottom = player.bottom();
    player.bounds().overlaps_x(solid) && bottom >= solid.y - tolerance && bottom <= solid.y + tolerance
}

#[inline]
fn snap_to_top(player: &mut Player, solid: &Rect) {
    player.pos.y = solid.y - player.size.y;
}

/// Pre-move grounding: snap onto any solid top inside the wide band
fn ground_check(player: &mut Player, solids: &[Solid]) {
    player.grounded = false;
    for solid in solids {
        let rect = solid.bounds();
        if !near_top(player, &rect, GROUND_TOLERANCE) {
            continue;
        }
        snap_to_top(player, &rect);
        if player.vel.y >= 0.0 {
            player.vel.y = 0.0;
        }
        if !player.was_grounded && !player.grounded {
            player.set_squash(1.3, 0.7, 100.0);
        }
        player.grounded = true;
    }
}

/// Post-move landing: first solid whose top band the falling player reached
fn land(player: &mut Player, solids: &[Solid]) {
    if player.vel.y < 0.0 {
        return;
    }
    if let Some(rect) = solids
        .iter()
        .map(|solid| solid.bounds())
        .find(|rect| near_top(player, rect, LANDING_TOLERANCE))
    {
        touch_down(player, &rect);
    }
}

fn touch_down(player: &mut Player, rect: &Rect) {
    if player.vel.y > 1.0 {
        player.set_squash(0.9, 1.1, 100.0);
    }
    snap_to_top(player, rect);
    player.vel.y = 0.0;
    player.grounded = true;
}

/// Full-box pass. Precedence: underside bump, then top landing (ends the
/// pass), then side push-out.
///
/// The side branch rarely fires in generated levels: platforms are thin, so
/// falling contact is almost always caught by the landing band first. It is
/// kept for tall solids.
fn resolve(player: &mut Player, solids: &[Solid]) {
    for solid in solids {
        let rect = solid.bounds();
        let body = player.bounds();
        if !body.intersects(&rect) {
            continue;
        }

        if player.vel.y < 0.0 && body.center().y < rect.center().y {
            // Head bump: drop back under the solid
            player.pos.y = rect.bottom();
            player.vel.y = 0.0;
            player.grounded = false;
        } else if player.vel.y >= 0.0 && near_top(player, &rect, GROUND_TOLERANCE) {
            touch_down(player, &rect);
            break;
        } else if player.vel.x > 0.0 && body.right() > rect.x && body.x < rect.x {
            // Straddling the left edge while moving right
            player.pos.x = rect.x - player.size.x;
            player.vel.x = 0.0;
        } else if player.vel.x < 0.0 && body.x < rect.right() && body.right() > rect.right() {
            player.pos.x = rect.right();
            player.vel.x = 0.0;
        }
    }
}

/// How a player/enemy overlap is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyContact {
    /// Landed on top: enemy defeated, player bounces
    Stomp,
    /// Harmless overlap (jumping past, or a near miss on top)
    PassOver,
    /// Side or underside hit: player loses a life
    Lethal,
}

/// Classify an overlap with a live enemy. `None` when the boxes don't touch.
pub fn classify_enemy_contact(player: &Rect, vel_y: f32, enemy: &Rect) -> Option<EnemyContact> {
    if !player.intersects(enemy) {
        return None;
    }

    let bottom = player.bottom();
    let contact = if vel_y > 0.0 && bottom >= enemy.y && bottom <= enemy.y + STOMP_THRESHOLD {
        EnemyContact::Stomp
    } else if vel_y < 0.0 {
        // Rising: only a hit if already past the enemy's underside
        if player.y > enemy.bottom() - HIT_MARGIN {
            EnemyContact::Lethal
        } else {
            EnemyContact::PassOver
        }
    } else if bottom > enemy.y + HIT_MARGIN {
        EnemyContact::Lethal
    } else {
        EnemyContact::PassOver
    };
    Some(contact)
}

/// Player is lined up on an unlit chimney, at its top, and not jumping away
pub fn chimney_entry(player: &Player, house: &House) -> bool {
    if house.lights_on {
        return false;
    }
    let chimney = house.chimney_bounds();
    let body = player.bounds();
    let bottom = body.bottom();

    (body.center().x - chimney.center().x).abs() < chimney.w / 2.0 + body.w / 2.0
        && bottom >= chimney.y - CHIMNEY_ENTRY_ABOVE
        && bottom <= chimney.y + CHIMNEY_ENTRY_BELOW
        && player.vel.y >= CHIMNEY_ENTRY_MIN_VY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Platform;
    use proptest::prelude::*;

    const DT: f32 = 16.0;
    const GROUND_Y: f32 = 560.0;
    const SPAWN: Vec2 = Vec2::new(SPAWN_X, GROUND_Y - PLAYER_HEIGHT);

    fn ground() -> Solid {
        Solid::platform(&Platform::new(0.0, GROUND_Y, 6000.0, 40.0))
    }

    fn step(player: &mut Player, input: &mut InputState, solids: &[Solid], camera: &Camera) -> StepOutcome {
        let tuning = Tuning::default();
        let ctx = StepContext {
            solids,
            camera,
            viewport: Viewport::default(),
            goal_x: 5800.0,
            spawn: SPAWN,
            tuning: &tuning,
        };
        step_player(player, input, &ctx, DT)
    }

    #[test]
    fn test_run_and_friction_match_integration_formula() {
        let solids = [ground()];
        let camera = Camera::new();
        let mut player = Player::spawn(Vec2::new(0.0, GROUND_Y - PLAYER_HEIGHT));
        let mut input = InputState::new();

        input.key_down("d");
        for _ in 0..10 {
            step(&mut player, &mut input, &solids, &camera);
        }
        input.key_up("d");
        for _ in 0..5 {
            step(&mut player, &mut input, &solids, &camera);
        }

        // Reference: v = speed * dt while held, then v *= 0.8 per tick
        let tuning = Tuning::default();
        let mut x = 0.0f32;
        let mut v = 0.0f32;
        for tick in 0..15 {
            v = if tick < 10 { tuning.run_speed * DT } else { v * tuning.friction };
            x += v;
        }
        assert_eq!(player.pos.x, x);
        assert_eq!(player.vel.x, v);
        assert!(player.grounded);
        assert_eq!(player.pos.y, GROUND_Y - PLAYER_HEIGHT);
    }

    #[test]
    fn test_left_edge_clamp() {
        let solids = [ground()];
        let camera = Camera { x: 100.0, speed: 0.1 };
        let mut player = Player::spawn(Vec2::new(90.0, GROUND_Y - PLAYER_HEIGHT));
        let mut input = InputState::new();
        input.key_down("a");
        step(&mut player, &mut input, &solids, &camera);
        assert_eq!(player.pos.x, 100.0);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_right_overshoot_is_eased_back() {
        let solids = [ground()];
        let camera = Camera::new();
        let mut player = Player::spawn(Vec2::new(600.0, GROUND_Y - PLAYER_HEIGHT));
        let mut input = InputState::new();
        input.key_down("arrowright");
        step(&mut player, &mut input, &solids, &camera);

        // Line at 800 * 2/3 + 30; 30% of the overshoot removed, velocity damped
        let max_right = 800.0 * (2.0 / 3.0) + 30.0;
        let expected_v = 5.6 * 0.7;
        let expected_x = 600.0 - (600.0 - max_right) * 0.3 + expected_v;
        assert!((player.vel.x - expected_v).abs() < 1e-4);
        assert!((player.pos.x - expected_x).abs() < 1e-3);
        assert!(player.pos.x < 600.0);
    }

    #[test]
    fn test_goal_nearby_lifts_right_boundary() {
        let tuning = Tuning::default();
        let solids = [ground()];
        let camera = Camera::new();
        let mut player = Player::spawn(Vec2::new(600.0, GROUND_Y - PLAYER_HEIGHT));
        let mut input = InputState::new();
        input.key_down("d");
        let ctx = StepContext {
            solids: &solids,
            camera: &camera,
            viewport: Viewport::default(),
            goal_x: 1000.0,
            spawn: SPAWN,
            tuning: &tuning,
        };
        step_player(&mut player, &mut input, &ctx, DT);
        assert_eq!(player.pos.x, 600.0 + tuning.run_speed * DT);
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let solids = [ground()];
        let camera = Camera::new();
        let mut player = Player::spawn(SPAWN);
        let mut input = InputState::new();

        input.key_down(" ");
        step(&mut player, &mut input, &solids, &camera);
        assert!(!player.grounded);
        // -50 then one tick of gravity (0.15 * 16)
        assert_eq!(player.vel.y, -50.0 + 2.4);
        assert!(player.pos.y < SPAWN.y);
        assert!(!input.jump_pressed());

        // Holding the key until landing does not jump again
        for _ in 0..200 {
            step(&mut player, &mut input, &solids, &camera);
        }
        assert!(player.grounded);
        assert_eq!(player.pos.y, SPAWN.y);
        assert_eq!(player.vel.y, 0.0);
    }

    #[test]
    fn test_top_band_always_grounds() {
        let camera = Camera::new();
        let solids = [Solid::platform(&Platform::new(0.0, 400.0, 300.0, 20.0))];
        for offset in [-20.0f32, -7.5, 0.0, 4.0, 19.0] {
            for vy in [0.0f32, 1.0, 3.0] {
                let mut player = Player::spawn(Vec2::new(100.0, 400.0 - PLAYER_HEIGHT + offset));
                player.grounded = true;
                player.vel.y = vy;
                let mut input = InputState::new();
                step(&mut player, &mut input, &solids, &camera);
                assert_eq!(player.vel.y, 0.0, "offset {offset} vy {vy}");
                assert!(player.grounded);
                assert_eq!(player.bottom(), 400.0);
            }
        }
    }

    #[test]
    fn test_landing_from_fall() {
        let camera = Camera::new();
        let solids = [Solid::platform(&Platform::new(0.0, 400.0, 300.0, 20.0))];
        let mut player = Player::spawn(Vec2::new(100.0, 300.0));
        player.grounded = false;
        player.was_grounded = false;
        player.vel.y = 10.0;
        let mut input = InputState::new();

        let mut landed = false;
        for _ in 0..20 {
            landed |= step(&mut player, &mut input, &solids, &camera).landed;
        }
        assert!(landed);
        assert!(player.grounded);
        assert_eq!(player.bottom(), 400.0);
    }

    #[test]
    fn test_head_bump_pushes_below() {
        let camera = Camera::new();
        let solids = [Solid::platform(&Platform::new(0.0, 300.0, 300.0, 20.0))];
        let mut player = Player::spawn(Vec2::new(100.0, 296.0));
        player.grounded = false;
        player.vel.y = -12.0;
        let mut input = InputState::new();

        step(&mut player, &mut input, &solids, &camera);
        assert_eq!(player.pos.y, 320.0);
        assert_eq!(player.vel.y, 0.0);
        assert!(!player.grounded);
    }

    #[test]
    fn test_side_push_out_on_tall_solid() {
        let camera = Camera::new();
        let solids = [Solid::platform(&Platform::new(100.0, 300.0, 50.0, 200.0))];
        let mut player = Player::spawn(Vec2::new(75.0, 350.0));
        player.grounded = false;
        let mut input = InputState::new();
        input.key_down("d");

        step(&mut player, &mut input, &solids, &camera);
        assert_eq!(player.pos.x, 100.0 - PLAYER_WIDTH);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_chimney_cap_is_standable() {
        let camera = Camera::new();
        let house = House::new(200.0, GROUND_Y - HOUSE_HEIGHT);
        let cap = Solid::chimney(0, &house);
        let solids = [ground(), cap];
        let chimney = house.chimney_bounds();
        let mut player = Player::spawn(Vec2::new(chimney.x - 10.0, chimney.y - PLAYER_HEIGHT - 5.0));
        player.grounded = false;
        player.vel.y = 2.0;
        let mut input = InputState::new();

        step(&mut player, &mut input, &solids, &camera);
        assert!(player.grounded);
        assert_eq!(player.bottom(), chimney.y);
    }

    #[test]
    fn test_fall_out_resets_without_penalty() {
        let camera = Camera::new();
        let mut player = Player::spawn(Vec2::new(300.0, 720.0));
        player.grounded = false;
        player.vel.y = 20.0;
        let mut input = InputState::new();

        let outcome = step(&mut player, &mut input, &[], &camera);
        assert!(outcome.fell_out);
        assert!(!outcome.landed);
        assert_eq!(player.pos, SPAWN);
        assert_eq!(player.vel, Vec2::ZERO);
        assert!(player.grounded);
    }

    #[test]
    fn test_death_suspends_physics_then_respawns() {
        let solids = [ground()];
        let camera = Camera::new();
        let mut player = Player::spawn(Vec2::new(700.0, 200.0));
        player.start_death();
        let mut input = InputState::new();
        input.key_down("d");

        for _ in 0..62 {
            let outcome = step(&mut player, &mut input, &solids, &camera);
            assert!(!outcome.respawned);
        }
        assert_eq!(player.pos, Vec2::new(700.0, 200.0));

        // 63 * 16 = 1008 ms
        let outcome = step(&mut player, &mut input, &solids, &camera);
        assert!(outcome.respawned);
        assert!(!player.is_dead());
        assert_eq!(player.pos, SPAWN);
        assert!(player.grounded);
    }

    fn enemy_rect() -> Rect {
        Rect::new(500.0, 510.0, ENEMY_WIDTH, ENEMY_HEIGHT)
    }

    #[test]
    fn test_stomp_when_falling_onto_top() {
        let player = Rect::new(495.0, 510.0 - PLAYER_HEIGHT + 10.0, PLAYER_WIDTH, PLAYER_HEIGHT);
        assert_eq!(
            classify_enemy_contact(&player, 4.0, &enemy_rect()),
            Some(EnemyContact::Stomp)
        );
    }

    #[test]
    fn test_falling_too_deep_is_lethal() {
        let player = Rect::new(495.0, 510.0 - PLAYER_HEIGHT + 20.0, PLAYER_WIDTH, PLAYER_HEIGHT);
        assert_eq!(
            classify_enemy_contact(&player, 4.0, &enemy_rect()),
            Some(EnemyContact::Lethal)
        );
    }

    #[test]
    fn test_walking_into_enemy_is_lethal() {
        let player = Rect::new(480.0, 520.0, PLAYER_WIDTH, PLAYER_HEIGHT);
        assert_eq!(
            classify_enemy_contact(&player, 0.0, &enemy_rect()),
            Some(EnemyContact::Lethal)
        );
    }

    #[test]
    fn test_standing_at_enemy_top_is_forgiven() {
        let player = Rect::new(495.0, 510.0 - PLAYER_HEIGHT + 3.0, PLAYER_WIDTH, PLAYER_HEIGHT);
        assert_eq!(
            classify_enemy_contact(&player, 0.0, &enemy_rect()),
            Some(EnemyContact::PassOver)
        );
    }

    #[test]
    fn test_rising_from_below_is_lethal() {
        // Player top already below enemy bottom - 5
        let player = Rect::new(495.0, 557.0, PLAYER_WIDTH, PLAYER_HEIGHT);
        assert_eq!(
            classify_enemy_contact(&player, -3.0, &enemy_rect()),
            Some(EnemyContact::Lethal)
        );
    }

    #[test]
    fn test_no_overlap_no_contact() {
        let player = Rect::new(0.0, 0.0, PLAYER_WIDTH, PLAYER_HEIGHT);
        assert_eq!(classify_enemy_contact(&player, 5.0, &enemy_rect()), None);
    }

    #[test]
    fn test_chimney_entry_rules() {
        let mut house = House::new(1000.0, 500.0);
        let chimney = house.chimney_bounds();
        let mut player = Player::spawn(Vec2::new(chimney.center().x - 15.0, chimney.y - PLAYER_HEIGHT));
        player.vel.y = 0.0;
        assert!(chimney_entry(&player, &house));

        // Jumping away from it
        player.vel.y = -10.0;
        assert!(!chimney_entry(&player, &house));
        player.vel.y = -2.0;
        assert!(chimney_entry(&player, &house));

        // Too high above the cap
        player.pos.y -= 6.0;
        assert!(!chimney_entry(&player, &house));
        player.pos.y += 6.0;

        house.light_up();
        assert!(!chimney_entry(&player, &house));
    }

    proptest! {
        #[test]
        fn prop_rising_player_only_hurt_from_below(
            px in 440.0f32..540.0,
            py in 440.0f32..570.0,
            vy in -60.0f32..-0.001,
        ) {
            let enemy = enemy_rect();
            let player = Rect::new(px, py, PLAYER_WIDTH, PLAYER_HEIGHT);
            if let Some(contact) = classify_enemy_contact(&player, vy, &enemy) {
                prop_assert_ne!(contact, EnemyContact::Stomp);
                let lethal = contact == EnemyContact::Lethal;
                prop_assert_eq!(lethal, py > enemy.bottom() - HIT_MARGIN);
            }
        }

        #[test]
        fn prop_stomp_band_never_lethal(
            px in 475.0f32..525.0,
            depth in 0.5f32..STOMP_THRESHOLD,
            vy in 0.001f32..60.0,
        ) {
            let enemy = enemy_rect();
            let player = Rect::new(px, enemy.y + depth - PLAYER_HEIGHT, PLAYER_WIDTH, PLAYER_HEIGHT);
            prop_assert_eq!(
                classify_enemy_contact(&player, vy, &enemy),
                Some(EnemyContact::Stomp)
            );
        }
    }
}
