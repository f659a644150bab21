//! Entity spawn factories for the simulation world.
//!
//! Creates squad members, independent spawns and enemy projectiles with
//! the appropriate component bundles.

use glam::DVec2;
use hecs::{Entity, World};

use wingstorm_core::components::*;
use wingstorm_core::config::DifficultyProfile;
use wingstorm_core::constants::*;
use wingstorm_core::enums::{Behavior, CraftKind};
use wingstorm_core::types::{Position, Rect, Velocity};

use crate::combat::FiredBy;

/// Minimum time between shots for a craft of `wave_number`.
pub fn shoot_interval_secs(wave_number: u32, profile: &DifficultyProfile) -> f64 {
    let base = (BASE_SHOOT_INTERVAL_SECS - SHOOT_INTERVAL_DECAY_PER_WAVE * wave_number as f64)
        .max(MIN_BASE_SHOOT_INTERVAL_SECS);
    (base * profile.shoot_interval_multiplier).max(MIN_SHOOT_INTERVAL_SECS)
}

/// Chance to fire on a tick once the interval has elapsed.
pub fn fire_chance(wave_number: u32) -> f64 {
    (FIRE_CHANCE_PER_WAVE * wave_number as f64).min(MAX_FIRE_CHANCE)
}

/// Gun cadence for a craft created at `now`.
pub fn gunnery_for(wave_number: u32, profile: &DifficultyProfile, now: f64) -> Gunnery {
    Gunnery {
        interval_secs: shoot_interval_secs(wave_number, profile),
        last_shot_at: now,
        fire_chance: fire_chance(wave_number),
    }
}

fn hull_and_hitbox(kind: CraftKind) -> (Hull, Hitbox) {
    match kind {
        CraftKind::Fighter => (
            Hull { hp: 1 },
            Hitbox {
                width: FIGHTER_WIDTH,
                height: FIGHTER_HEIGHT,
            },
        ),
        CraftKind::Jellyfish => (
            Hull { hp: JELLYFISH_HP },
            Hitbox {
                width: JELLYFISH_WIDTH,
                height: JELLYFISH_HEIGHT,
            },
        ),
        CraftKind::Bee => (
            Hull { hp: 1 },
            Hitbox {
                width: BEE_WIDTH,
                height: BEE_HEIGHT,
            },
        ),
    }
}

/// Spawn a squadron member flying in formation.
pub fn spawn_squad_member(
    world: &mut World,
    kind: CraftKind,
    wave_number: u32,
    pos: DVec2,
    gunnery: Gunnery,
) -> Entity {
    let (hull, hitbox) = hull_and_hitbox(kind);
    world.spawn((
        Craft { kind, wave_number },
        Position::from(pos),
        hitbox,
        hull,
        Behavior::Formation,
        gunnery,
    ))
}

/// Spawn an independent craft that wanders on its own.
pub fn spawn_bee(
    world: &mut World,
    wave_number: u32,
    pos: DVec2,
    gunnery: Gunnery,
    roam: Roam,
) -> Entity {
    let (hull, hitbox) = hull_and_hitbox(CraftKind::Bee);
    world.spawn((
        Craft {
            kind: CraftKind::Bee,
            wave_number,
        },
        Position::from(pos),
        hitbox,
        hull,
        Behavior::Roaming,
        gunnery,
        roam,
    ))
}

/// Spawn a bullet from the bottom centre of `owner_box`, heading down.
pub fn spawn_enemy_bullet(world: &mut World, owner: Entity, owner_box: Rect) -> Entity {
    let x = owner_box.x + owner_box.width / 2.0 - ENEMY_BULLET_SIZE / 2.0;
    let y = owner_box.bottom();
    world.spawn((
        Projectile {
            alive: true,
            damage: ENEMY_BULLET_DAMAGE,
        },
        Position::new(x, y),
        Velocity::new(0.0, ENEMY_BULLET_SPEED),
        Hitbox {
            width: ENEMY_BULLET_SIZE,
            height: ENEMY_BULLET_SIZE,
        },
        FiredBy(owner),
    ))
}
