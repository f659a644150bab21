//! Projectile system.
//!
//! Moves live enemy projectiles by their velocity (px/tick) and retires
//! them once they leave the bottom of the play field.

use hecs::World;

use wingstorm_core::components::Projectile;
use wingstorm_core::config::ArenaConfig;
use wingstorm_core::types::{Position, Velocity};

pub fn run(world: &mut World, arena: &ArenaConfig) {
    for (_entity, (pos, vel, shot)) in
        world.query_mut::<(&mut Position, &Velocity, &mut Projectile)>()
    {
        if !shot.alive {
            continue;
        }
        pos.x += vel.x;
        pos.y += vel.y;
        if pos.y > arena.screen_height {
            shot.alive = false;
        }
    }
}
