//! Game state and core simulation types
//!
//! Entities own their lifecycle (patrol, bob, smoke, one-way flags); the
//! tick owns the interactions between them.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::geometry::{Bounded, Rect, Solid};
use super::level;
use crate::Viewport;
use crate::consts::*;
use crate::settings::{NameConfig, Settings};
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Typing a player name
    NameEntry,
    /// Title screen, waiting for confirm
    Start,
    /// Active gameplay
    Playing,
    /// Out of lives
    GameOver,
    /// Reached the goal
    Victory,
}

/// Things the host may want to react to (effects, sounds, persistence)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player touched down after being airborne
    Landed { pos: Vec2 },
    /// Enemy stomped (center of the enemy)
    EnemyDefeated { pos: Vec2, name: String },
    /// Item picked up (center of the item)
    Collected { pos: Vec2, kind: CollectibleKind },
    /// Player dropped into a chimney (chimney top center)
    ChimneyEntered { pos: Vec2 },
    /// Player lost a life but has lives left
    LifeLost { lives: u32 },
    /// Run finished (game over or victory), emitted once per run
    RunEnded { victory: bool, score: u64 },
}

/// Death animation sub-state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Death {
    pub timer_ms: f32,
    /// Where the player died (drawn there while the animation plays)
    pub at: Vec2,
}

/// Time spent inside a house after dropping down its chimney
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseVisit {
    pub house: usize,
    pub timer_ms: f32,
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Per-tick velocity
    pub vel: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    pub was_grounded: bool,
    pub facing_right: bool,
    /// Walk animation phase (frames)
    pub walk_cycle: f32,
    /// Non-uniform scale for squash/stretch
    pub squash: Vec2,
    /// Countdown until `squash` resets
    pub squash_ms: f32,
    pub death: Option<Death>,
    pub visit: Option<HouseVisit>,
}

impl Player {
    /// Fresh player standing at a spawn point
    pub fn spawn(at: Vec2) -> Self {
        Self {
            pos: at,
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            grounded: true,
            was_grounded: true,
            facing_right: true,
            walk_cycle: 0.0,
            squash: Vec2::ONE,
            squash_ms: 0.0,
            death: None,
            visit: None,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn is_dead(&self) -> bool {
        self.death.is_some()
    }

    pub fn in_house(&self) -> bool {
        self.visit.is_some()
    }

    /// 0..1 through the death animation
    pub fn death_progress(&self, death_ms: f32) -> f32 {
        self.death
            .map(|d| (d.timer_ms / death_ms).min(1.0))
            .unwrap_or(0.0)
    }

    /// Current walk frame (0..4)
    pub fn walk_frame(&self) -> u32 {
        (self.walk_cycle.floor() as u32) % 4
    }

    /// Start the death animation in place
    pub fn start_death(&mut self) {
        self.death = Some(Death {
            timer_ms: 0.0,
            at: self.pos,
        });
        self.vel = Vec2::ZERO;
    }

    /// Back to the spawn point with all per-life timers cleared
    pub fn respawn(&mut self, at: Vec2) {
        self.pos = at;
        self.vel = Vec2::ZERO;
        self.grounded = true;
        self.death = None;
        self.visit = None;
        self.squash = Vec2::ONE;
        self.squash_ms = 0.0;
    }

    /// Apply a squash/stretch pose for a while
    pub fn set_squash(&mut self, x: f32, y: f32, ms: f32) {
        self.squash = Vec2::new(x, y);
        self.squash_ms = ms;
    }

    /// Count the squash pose down; restores neutral scale when done
    pub fn tick_squash(&mut self, dt: f32) {
        if self.squash_ms > 0.0 {
            self.squash_ms -= dt;
            if self.squash_ms <= 0.0 {
                self.squash_ms = 0.0;
                self.squash = Vec2::ONE;
            }
        }
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Rect {
        Rect::at(self.pos, self.size)
    }
}

/// Static platform (y is the top surface)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    rect: Rect,
}

impl Platform {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
        }
    }
}

impl Bounded for Platform {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// Snowman gender (selects name pool and look)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

/// Patrolling snowman
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Patrol anchor (spawn x)
    pub anchor_x: f32,
    /// +1 right, -1 left
    pub direction: f32,
    pub defeated: bool,
    /// Time since defeat
    pub defeat_ms: f32,
    pub gender: Gender,
    pub name: String,
}

impl Enemy {
    pub fn new(pos: Vec2, direction: f32, gender: Gender, name: String) -> Self {
        Self {
            pos,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            anchor_x: pos.x,
            direction,
            defeated: false,
            defeat_ms: 0.0,
            gender,
            name,
        }
    }

    /// Patrol, or count the fade-out once defeated
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        if self.defeated {
            self.defeat_ms += dt;
            return;
        }

        self.pos.x += tuning.enemy_speed * self.direction * dt;
        if (self.pos.x - self.anchor_x).abs() > tuning.enemy_patrol_distance {
            self.direction = -self.direction;
        }
    }

    /// Defeated snowmen linger briefly before vanishing
    pub fn visible(&self) -> bool {
        !self.defeated || self.defeat_ms <= ENEMY_FADE_MS
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Rect {
        Rect::at(self.pos, self.size)
    }
}

/// Collectible item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleKind {
    Present,
    Star,
}

impl CollectibleKind {
    /// Coin flip between the two kinds
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.random::<f32>() > 0.5 {
            CollectibleKind::Present
        } else {
            CollectibleKind::Star
        }
    }
}

/// Bobbing pickup. Collected items stay in the list but stop interacting.
#[derive(Debug, Clone)]
pub struct Collectible {
    /// Center of the item at rest
    pub pos: Vec2,
    pub kind: CollectibleKind,
    pub collected: bool,
    pub bob: f32,
    pub collect_ms: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl Collectible {
    pub fn new(pos: Vec2, kind: CollectibleKind) -> Self {
        Self {
            pos,
            kind,
            collected: false,
            bob: 0.0,
            collect_ms: 0.0,
            scale: 1.0,
            opacity: 1.0,
        }
    }

    /// Bob while idle, grow and fade once collected
    pub fn update(&mut self, dt: f32, clock_ms: f32) {
        if self.collected {
            self.collect_ms += dt;
            self.scale += 0.05 * dt;
            self.opacity -= 0.01 * dt;
            return;
        }
        self.bob = (clock_ms * BOB_SPEED).sin() * BOB_AMPLITUDE;
    }

    /// Mark collected. Returns false if it already was.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }

    pub fn visible(&self) -> bool {
        !self.collected || self.opacity > 0.0
    }
}

impl Bounded for Collectible {
    fn bounds(&self) -> Rect {
        let half = COLLECTIBLE_SIZE / 2.0;
        Rect::new(
            self.pos.x - half,
            self.pos.y - half + self.bob,
            COLLECTIBLE_SIZE,
            COLLECTIBLE_SIZE,
        )
    }
}

/// Ambient chimney smoke (visual only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmokePuff {
    pub pos: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub drift: f32,
}

/// House with a chimney the player can drop into once
#[derive(Debug, Clone)]
pub struct House {
    pub pos: Vec2,
    pub lights_on: bool,
    pub smoke_ms: f32,
    pub smoke: Vec<SmokePuff>,
}

impl House {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            lights_on: false,
            smoke_ms: 0.0,
            smoke: Vec::new(),
        }
    }

    /// Chimney column above the roof
    pub fn chimney_bounds(&self) -> Rect {
        Rect::new(
            self.pos.x + HOUSE_WIDTH / 2.0 - CHIMNEY_WIDTH / 2.0,
            self.pos.y - CHIMNEY_RISE,
            CHIMNEY_WIDTH,
            CHIMNEY_HEIGHT,
        )
    }

    /// Door the player leaves through
    pub fn door_bounds(&self) -> Rect {
        Rect::new(self.pos.x + HOUSE_WIDTH / 2.0 - 10.0, self.pos.y + 35.0, 20.0, 25.0)
    }

    /// One-way: returns false if the lights were already on
    pub fn light_up(&mut self) -> bool {
        if self.lights_on {
            return false;
        }
        self.lights_on = true;
        true
    }

    /// Emit and age smoke puffs
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        self.smoke_ms += dt;
        if self.smoke_ms > SMOKE_INTERVAL_MS {
            self.smoke_ms = 0.0;
            self.smoke.push(SmokePuff {
                pos: Vec2::new(self.pos.x + HOUSE_WIDTH / 2.0 + 5.0, self.pos.y - 10.0),
                size: 5.0,
                opacity: 0.6,
                drift: rng.random::<f32>() * 0.3 - 0.15,
            });
        }

        for puff in &mut self.smoke {
            puff.pos.y -= 0.5 * dt;
            puff.pos.x += puff.drift * dt;
            puff.size += 0.1 * dt;
            puff.opacity -= 0.002 * dt;
        }
        self.smoke.retain(|p| p.opacity > 0.0 && p.pos.y >= -50.0);
    }
}

impl Bounded for House {
    fn bounds(&self) -> Rect {
        Rect::at(self.pos, Vec2::new(HOUSE_WIDTH, HOUSE_HEIGHT))
    }
}

/// One generated level. Rebuilt wholesale on restart.
#[derive(Debug, Clone)]
pub struct World {
    pub length: f32,
    /// Top of the ground slab
    pub ground_y: f32,
    pub goal_x: f32,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub houses: Vec<House>,
}

impl World {
    /// Ground only, no content
    pub fn empty(length: f32, ground_y: f32) -> Self {
        Self {
            length,
            ground_y,
            goal_x: length - GOAL_INSET,
            platforms: vec![Platform::new(0.0, ground_y, length, GROUND_THICKNESS)],
            enemies: Vec::new(),
            collectibles: Vec::new(),
            houses: Vec::new(),
        }
    }

    /// Where the player (re)appears
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(SPAWN_X, self.ground_y - PLAYER_HEIGHT)
    }

    /// Platforms plus one cap per unlit chimney
    pub fn solids(&self) -> Vec<Solid> {
        let caps = self
            .houses
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.lights_on)
            .map(|(i, h)| Solid::chimney(i, h));
        self.platforms.iter().map(Solid::platform).chain(caps).collect()
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub world: World,
    pub player: Player,
    pub camera: Camera,
    pub score: u64,
    pub lives: u32,
    /// Submitted name (empty = scores are not saved)
    pub player_name: String,
    /// Name being typed
    pub name_input: String,
    /// Simulation clock (drives bobbing)
    pub clock_ms: f32,
    pub tuning: Tuning,
    pub names: NameConfig,
    pub starting_lives: u32,
    pub rng: Pcg32,
    /// Pending events, drained by the host
    pub events: Vec<GameEvent>,
    /// A name-entry key was handled; wait for all keys up
    pub name_key_latched: bool,
    /// Confirm was released since the last transition
    pub confirm_armed: bool,
}

impl GameState {
    /// New session in name entry, with a level already laid out
    pub fn new(settings: &Settings, viewport: Viewport, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = level::generate(
            LEVEL_LENGTH,
            viewport.height - GROUND_THICKNESS,
            &settings.names,
            &mut rng,
        );
        let player = Player::spawn(world.spawn_point());

        Self {
            phase: GamePhase::NameEntry,
            world,
            player,
            camera: Camera::new(),
            score: 0,
            lives: settings.starting_lives,
            player_name: String::new(),
            name_input: String::new(),
            clock_ms: 0.0,
            tuning: settings.tuning.clone(),
            names: settings.names.clone(),
            starting_lives: settings.starting_lives,
            rng,
            events: Vec::new(),
            name_key_latched: false,
            confirm_armed: false,
        }
    }

    /// Start a fresh run: new level, player, camera, score and lives
    pub fn restart(&mut self, viewport: Viewport) {
        self.world = level::generate(
            LEVEL_LENGTH,
            viewport.height - GROUND_THICKNESS,
            &self.names,
            &mut self.rng,
        );
        self.player = Player::spawn(self.world.spawn_point());
        self.camera = Camera::new();
        self.score = 0;
        self.lives = self.starting_lives;
        self.clock_ms = 0.0;
        self.phase = GamePhase::Playing;
        log::info!("Run started for {:?}", self.player_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_patrol_reverses() {
        let tuning = Tuning::default();
        let mut enemy = Enemy::new(Vec2::new(400.0, 500.0), 1.0, Gender::Male, "Jack".into());
        // 0.03 * 16 = 0.48 per tick, ~209 ticks to pass 100 units
        for _ in 0..220 {
            enemy.update(16.0, &tuning);
        }
        assert_eq!(enemy.direction, -1.0);
        assert!((enemy.pos.x - enemy.anchor_x).abs() <= 101.0);
    }

    #[test]
    fn test_defeated_enemy_freezes_then_hides() {
        let tuning = Tuning::default();
        let mut enemy = Enemy::new(Vec2::new(400.0, 500.0), 1.0, Gender::Female, "Ivy".into());
        enemy.defeated = true;
        enemy.update(300.0, &tuning);
        assert_eq!(enemy.pos.x, 400.0);
        assert!(enemy.visible());
        enemy.update(300.0, &tuning);
        assert!(!enemy.visible());
    }

    #[test]
    fn test_collect_is_one_way() {
        let mut item = Collectible::new(Vec2::new(10.0, 10.0), CollectibleKind::Star);
        assert!(item.collect());
        assert!(!item.collect());
        assert!(item.collected);
    }

    #[test]
    fn test_collected_item_fades_out() {
        let mut item = Collectible::new(Vec2::new(10.0, 10.0), CollectibleKind::Present);
        item.collect();
        item.update(50.0, 0.0);
        assert!(item.scale > 1.0);
        assert!(item.visible());
        item.update(60.0, 0.0);
        assert!(!item.visible());
    }

    #[test]
    fn test_bob_moves_hitbox() {
        let mut item = Collectible::new(Vec2::new(100.0, 100.0), CollectibleKind::Star);
        let rest = item.bounds();
        // sin(500 * 0.003) = sin(1.5) ~ 0.997
        item.update(16.0, 500.0);
        assert!(item.bounds().y > rest.y + 4.0);
    }

    #[test]
    fn test_house_lights_are_one_way() {
        let mut house = House::new(0.0, 0.0);
        assert!(house.light_up());
        assert!(!house.light_up());
    }

    #[test]
    fn test_house_emits_and_ages_smoke() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut house = House::new(0.0, 500.0);
        // 63 * 16 = 1008 ms crosses the interval
        for _ in 0..63 {
            house.update(16.0, &mut rng);
        }
        assert_eq!(house.smoke.len(), 1);
        for _ in 0..30 {
            house.update(16.0, &mut rng);
        }
        // 0.002 * 16 * 31 = 0.99 opacity lost: gone
        assert!(house.smoke.is_empty());
    }

    #[test]
    fn test_solids_skip_lit_houses() {
        let mut world = World::empty(6000.0, 560.0);
        world.houses.push(House::new(500.0, 500.0));
        world.houses.push(House::new(900.0, 500.0));
        assert_eq!(world.solids().len(), 3);
        world.houses[0].light_up();
        let solids = world.solids();
        assert_eq!(solids.len(), 2);
        assert!(matches!(solids[1], Solid::ChimneyCap { house: 1, .. }));
    }

    #[test]
    fn test_restart_resets_run() {
        let settings = Settings {
            seed: Some(3),
            ..Default::default()
        };
        let mut state = GameState::new(&settings, Viewport::default(), 3);
        state.score = 999;
        state.lives = 1;
        state.player.start_death();
        state.world.houses.iter_mut().for_each(|h| h.lights_on = true);

        state.restart(Viewport::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert!(!state.player.is_dead());
        assert!(state.world.houses.iter().all(|h| !h.lights_on));
    }
}
