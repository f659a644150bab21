//! Simulation engine for WINGSTORM.
//!
//! Owns the hecs ECS world, runs waves and systems at a fixed tick rate,
//! and produces GameStateSnapshots for renderers and other consumers.

pub mod clock;
pub mod combat;
pub mod engine;
pub mod spawner;
pub mod squadron;
pub mod systems;
pub mod wave;
pub mod world_setup;

pub use wingstorm_core as core;
pub use engine::{SimConfig, SimulationEngine};
pub use wave::Wave;

#[cfg(test)]
mod tests;
