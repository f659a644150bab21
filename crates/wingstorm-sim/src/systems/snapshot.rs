//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::{Entity, World};

use wingstorm_core::components::{Craft, Hitbox, Projectile};
use wingstorm_core::enums::{Difficulty, GamePhase};
use wingstorm_core::events::SimEvent;
use wingstorm_core::state::*;
use wingstorm_core::types::{Position, Rect, SimTime};

use crate::combat;
use crate::wave::Wave;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    difficulty: Difficulty,
    wave: Option<&Wave>,
    retiring: &[Wave],
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    let enemies = wave
        .into_iter()
        .chain(retiring.iter())
        .flat_map(|w| w.all_enemies())
        .filter_map(|entity| build_enemy(world, entity))
        .collect();

    GameStateSnapshot {
        time: *time,
        phase,
        difficulty,
        wave: wave.map(|w| w.view(world)),
        enemies,
        projectiles: build_projectiles(world),
        events,
    }
}

fn build_enemy(world: &World, entity: Entity) -> Option<EnemyView> {
    let craft = *world.get::<&Craft>(entity).ok()?;
    Some(EnemyView {
        id: entity.to_bits().get(),
        kind: craft.kind,
        behavior: combat::behavior(world, entity)?,
        bounds: combat::bounding_box(world, entity)?,
        alive: combat::is_alive(world, entity),
    })
}

/// Live enemy projectiles.
fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Position, &Hitbox, &Projectile)>()
        .iter()
        .filter(|(_, (_, _, shot))| shot.alive)
        .map(|(_, (pos, hitbox, _))| ProjectileView {
            bounds: Rect::new(pos.x, pos.y, hitbox.width, hitbox.height),
        })
        .collect()
}
