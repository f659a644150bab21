//! Cleanup system: removes projectiles that are no longer alive.
//!
//! Craft are never despawned here; their owning wave removes them.

use hecs::{Entity, World};

use wingstorm_core::components::Projectile;

/// Despawn dead projectiles. Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, shot) in world.query_mut::<&Projectile>() {
        if !shot.alive {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
