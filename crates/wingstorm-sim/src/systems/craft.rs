//! Craft system: each enemy's own per-tick behaviour after formation
//! placement. Escaping craft climb off the top of the screen, roaming craft
//! wander, and every live on-screen craft may fire.

use hecs::{Entity, World};
use rand::Rng;

use wingstorm_core::components::{Gunnery, Hitbox, Hull, Roam};
use wingstorm_core::config::ArenaConfig;
use wingstorm_core::constants::{ESCAPE_SPEED, ROAM_AMPLITUDE_X, ROAM_BOB_Y, ROAM_RATE};
use wingstorm_core::enums::Behavior;
use wingstorm_core::types::{Position, Rect};

use crate::world_setup;

pub fn run<R: Rng + ?Sized>(world: &mut World, rng: &mut R, now: f64, arena: &ArenaConfig) {
    escape(world);
    roam(world, now, arena);
    fire(world, rng, now);
}

/// Climb at escape speed; dead once fully above the screen.
fn escape(world: &mut World) {
    for (_entity, (pos, hitbox, hull, behavior)) in
        world.query_mut::<(&mut Position, &Hitbox, &mut Hull, &Behavior)>()
    {
        if hull.hp <= 0 || *behavior != Behavior::Escaping {
            continue;
        }
        pos.y -= ESCAPE_SPEED;
        if pos.y + hitbox.height < 0.0 {
            hull.hp = 0;
        }
    }
}

/// Horizontal sinusoid around the spawn point with a slow vertical bob.
/// Starts exactly at the spawn point.
fn roam(world: &mut World, now: f64, arena: &ArenaConfig) {
    let (min_x, max_x) = (arena.min_anchor_x(), arena.max_anchor_x());
    for (_entity, (pos, hull, behavior, roam)) in
        world.query_mut::<(&mut Position, &Hull, &Behavior, &Roam)>()
    {
        if hull.hp <= 0 || *behavior != Behavior::Roaming {
            continue;
        }
        let t = (now - roam.spawned_at).max(0.0);
        let angle = t * ROAM_RATE + roam.phase_offset;
        let sway = angle.sin() - roam.phase_offset.sin();
        let bob = (angle * 0.5).sin() - (roam.phase_offset * 0.5).sin();

        pos.x = (roam.home_x + sway * ROAM_AMPLITUDE_X).max(min_x).min(max_x);
        pos.y = roam.home_y + bob * ROAM_BOB_Y;
    }
}

fn fire<R: Rng + ?Sized>(world: &mut World, rng: &mut R, now: f64) {
    let mut shots: Vec<(Entity, Rect)> = Vec::new();

    for (entity, (pos, hitbox, hull, behavior, gunnery)) in
        world.query_mut::<(&Position, &Hitbox, &Hull, &Behavior, &mut Gunnery)>()
    {
        if hull.hp <= 0 || *behavior == Behavior::Escaping || pos.y < 0.0 {
            continue;
        }
        if now - gunnery.last_shot_at < gunnery.interval_secs {
            continue;
        }
        if rng.gen::<f64>() >= gunnery.fire_chance {
            continue;
        }
        gunnery.last_shot_at = now;
        shots.push((entity, Rect::new(pos.x, pos.y, hitbox.width, hitbox.height)));
    }

    for (owner, bounds) in shots {
        world_setup::spawn_enemy_bullet(world, owner, bounds);
    }
}
