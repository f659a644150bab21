//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! Squadron and wave state lives in the owners; per-entity state lives in components.

pub mod cleanup;
pub mod craft;
pub mod projectile;
pub mod snapshot;
