//! Core types and definitions for the WINGSTORM simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, settings, state snapshots, events, and constants.
//! It has no dependency on the entity world or any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
