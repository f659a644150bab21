//! Entity contract used by squadrons, the spawner and outside collaborators
//! (collision resolution, rendering).
//!
//! Every function tolerates a stale handle: a despawned entity reads as dead
//! and writes to it are dropped.

use glam::DVec2;
use hecs::{Entity, World};

use wingstorm_core::components::{Hitbox, Hull, Projectile};
use wingstorm_core::constants::OVERWHELMING_DAMAGE;
use wingstorm_core::enums::Behavior;
use wingstorm_core::types::{Position, Rect};

/// Links an enemy projectile to the craft that fired it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredBy(pub Entity);

pub fn is_alive(world: &World, entity: Entity) -> bool {
    world
        .get::<&Hull>(entity)
        .map(|hull| hull.hp > 0)
        .unwrap_or(false)
}

pub fn position(world: &World, entity: Entity) -> Option<DVec2> {
    world.get::<&Position>(entity).ok().map(|pos| pos.as_vec())
}

pub fn set_position(world: &mut World, entity: Entity, pos: DVec2) {
    if let Ok(mut current) = world.get::<&mut Position>(entity) {
        *current = Position::from(pos);
    }
}

pub fn behavior(world: &World, entity: Entity) -> Option<Behavior> {
    world.get::<&Behavior>(entity).ok().map(|b| *b)
}

pub fn set_behavior(world: &mut World, entity: Entity, behavior: Behavior) {
    if let Ok(mut current) = world.get::<&mut Behavior>(entity) {
        *current = behavior;
    }
}

/// Axis-aligned collision box, top-left at the entity's position.
pub fn bounding_box(world: &World, entity: Entity) -> Option<Rect> {
    let pos = world.get::<&Position>(entity).ok()?;
    let hitbox = world.get::<&Hitbox>(entity).ok()?;
    Some(Rect::new(pos.x, pos.y, hitbox.width, hitbox.height))
}

/// Subtract `amount` hit points. Returns true if this call killed the entity.
pub fn apply_damage(world: &mut World, entity: Entity, amount: i32) -> bool {
    let Ok(mut hull) = world.get::<&mut Hull>(entity) else {
        return false;
    };
    if hull.hp <= 0 {
        return false;
    }
    hull.hp = hull.hp.saturating_sub(amount.max(0)).max(0);
    hull.hp == 0
}

/// Kill outright. Safe to call on an already-dead or despawned entity.
pub fn force_kill(world: &mut World, entity: Entity) {
    apply_damage(world, entity, OVERWHELMING_DAMAGE);
}

/// Number of live projectiles fired by `owner`.
pub fn live_shots_from(world: &World, owner: Entity) -> usize {
    world
        .query::<(&Projectile, &FiredBy)>()
        .iter()
        .filter(|(_, (shot, fired_by))| shot.alive && fired_by.0 == owner)
        .count()
}
