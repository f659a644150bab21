//! ECS components for hecs entities.
//!
//! Components are plain data structs with no game logic.
//! Game logic lives in systems and in the squadron/wave owners.
//! `Behavior` and `Position` are used as components too, and projectiles
//! carry a `Velocity`.

use serde::{Deserialize, Serialize};

use crate::enums::CraftKind;

/// Hit points. An entity is alive while `hp > 0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hull {
    pub hp: i32,
}

/// Collision box size; the box's top-left corner is the entity's `Position`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hitbox {
    pub width: f64,
    pub height: f64,
}

/// Identity of an enemy craft.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Craft {
    pub kind: CraftKind,
    /// Wave the craft was created for (drives fire chance).
    pub wave_number: u32,
}

/// Weapon cadence for an enemy craft.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Gunnery {
    /// Minimum time between shots (seconds).
    pub interval_secs: f64,
    /// Sim time of the last shot (or creation).
    pub last_shot_at: f64,
    /// Chance to fire on a tick once the interval has elapsed.
    pub fire_chance: f64,
}

/// Wander parameters for self-moving craft.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Roam {
    /// Horizontal centre of the wander.
    pub home_x: f64,
    /// Vertical centre of the bob.
    pub home_y: f64,
    /// Per-craft phase so neighbours don't move in lock-step.
    pub phase_offset: f64,
    /// Sim time the craft appeared.
    pub spawned_at: f64,
}

/// Enemy projectile state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub alive: bool,
    pub damage: i32,
}
