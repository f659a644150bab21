//! WINGSTORM headless runner.
//!
//! Drives the simulation engine either in real time on a dedicated thread
//! fed by a command channel, or for a fixed number of ticks as fast as
//! possible.

pub mod game_loop;
pub mod logging;
pub mod state;

pub use wingstorm_core as core;
