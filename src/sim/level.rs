//! Procedural level layout
//!
//! Shape is fixed (ground, goal, walk from left to right); content is random.
//! Generation never fails: candidates that would crowd an existing platform
//! are dropped, so packing pressure only makes a level sparser.

use glam::Vec2;
use rand::Rng;

use super::geometry::Bounded;
use super::state::{Collectible, CollectibleKind, Enemy, Gender, House, Platform, World};
use crate::consts::*;
use crate::settings::NameConfig;

/// Vertical band floating platforms and free items are placed in
const MIN_PLATFORM_Y: f32 = 250.0;
const MAX_PLATFORM_Y: f32 = 480.0;
/// Walk step range
const MIN_SPACING: f32 = 150.0;
const MAX_SPACING: f32 = 350.0;
/// Walk start and how far before the level end it stops
const WALK_START_X: f32 = 300.0;
const WALK_END_MARGIN: f32 = 500.0;
/// Two platforms closer than this vertically may not share horizontal span
const MIN_VERTICAL_GAP: f32 = 50.0;
const PLATFORM_THICKNESS: f32 = 20.0;
/// Items float this far above the platform they sit on
const ITEM_LIFT: f32 = 50.0;
/// Minimum platform count (ground included) and the backfill layout
const PLATFORM_FLOOR: usize = 30;
const BACKFILL_START_X: f32 = 500.0;
const BACKFILL_STEP: f32 = 400.0;
const BACKFILL_WIDTH: f32 = 120.0;
/// First enemy x and the random gap range after each one
const ENEMY_START_X: f32 = 400.0;
const ENEMY_MIN_GAP: f32 = 200.0;
const ENEMY_GAP_SPREAD: f32 = 300.0;

/// Lay out a complete level
pub fn generate(
    level_length: f32,
    ground_y: f32,
    names: &NameConfig,
    rng: &mut impl Rng,
) -> World {
    let mut world = World::empty(level_length, ground_y);

    world.enemies = spawn_enemies(ground_y - ENEMY_HEIGHT, names, rng);

    // Floating platforms only; the ground never blocks placement
    let mut placed: Vec<Platform> = Vec::new();
    let mut x = WALK_START_X;
    while x < level_length - WALK_END_MARGIN {
        let roll = rng.random::<f32>();
        if roll < 0.5 {
            let y = random_platform_y(rng);
            let width = 100.0 + rng.random::<f32>() * 150.0;
            let candidate = Platform::new(x, y, width, PLATFORM_THICKNESS);
            if fits(&candidate, &placed) {
                placed.push(candidate);
                if rng.random::<f32>() > 0.4 {
                    let kind = CollectibleKind::random(rng);
                    world
                        .collectibles
                        .push(Collectible::new(Vec2::new(x + width / 2.0, y - ITEM_LIFT), kind));
                }
            }
        } else if roll < 0.75 {
            let y = random_platform_y(rng);
            let kind = CollectibleKind::random(rng);
            world.collectibles.push(Collectible::new(Vec2::new(x, y), kind));
        } else {
            world.houses.push(House::new(x, ground_y - HOUSE_HEIGHT));
        }

        x += MIN_SPACING + rng.random::<f32>() * (MAX_SPACING - MIN_SPACING);
    }

    let walked = placed.len();
    backfill(&mut placed, 1 + walked, rng);

    log::info!(
        "Level generated: {} platforms ({} backfilled), {} enemies, {} items, {} houses",
        placed.len() + 1,
        placed.len() - walked,
        world.enemies.len(),
        world.collectibles.len(),
        world.houses.len()
    );

    world.platforms.extend(placed);
    world
}

/// Whether a candidate keeps its distance from every placed platform
pub fn fits(candidate: &Platform, placed: &[Platform]) -> bool {
    let c = candidate.bounds();
    !placed.iter().any(|p| {
        let p = p.bounds();
        c.overlaps_x(&p) && (c.y - p.y).abs() < MIN_VERTICAL_GAP
    })
}

fn random_platform_y(rng: &mut impl Rng) -> f32 {
    MIN_PLATFORM_Y + rng.random::<f32>() * (MAX_PLATFORM_Y - MIN_PLATFORM_Y)
}

/// Top up to the platform floor at fixed spacing. One attempt per missing
/// platform; blocked slots are skipped, so the floor may not be reached.
fn backfill(placed: &mut Vec<Platform>, total: usize, rng: &mut impl Rng) {
    let mut x = BACKFILL_START_X;
    for _ in total..PLATFORM_FLOOR {
        let candidate = Platform::new(x, random_platform_y(rng), BACKFILL_WIDTH, PLATFORM_THICKNESS);
        if fits(&candidate, placed) {
            placed.push(candidate);
        }
        x += BACKFILL_STEP;
    }
}

/// One snowman per configured name, names drawn without replacement
fn spawn_enemies(y: f32, names: &NameConfig, rng: &mut impl Rng) -> Vec<Enemy> {
    let mut males: Vec<&String> = names.male.iter().collect();
    let mut females: Vec<&String> = names.female.iter().collect();
    let mut enemies = Vec::with_capacity(names.len());
    let mut x = ENEMY_START_X;

    for _ in 0..names.len() {
        let gender = if males.is_empty() {
            Gender::Female
        } else if females.is_empty() {
            Gender::Male
        } else if rng.random::<f32>() > 0.5 {
            Gender::Male
        } else {
            Gender::Female
        };

        let pool = match gender {
            Gender::Male => &mut males,
            Gender::Female => &mut females,
        };
        let pick = rng.random_range(0..pool.len());
        let name = pool.swap_remove(pick).clone();

        let direction = if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
        enemies.push(Enemy::new(Vec2::new(x, y), direction, gender, name));
        x += ENEMY_MIN_GAP + rng.random::<f32>() * ENEMY_GAP_SPREAD;
    }

    enemies
}
