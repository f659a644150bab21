//! Game state snapshot: the complete visible state handed to renderers
//! and other read-only consumers after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Rect, SimTime};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub wave: Option<WaveView>,
    /// Squad members and independent spawns of the current and retiring waves.
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub events: Vec<SimEvent>,
}

/// Progress of the current wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveView {
    pub wave_number: u32,
    pub started_at: f64,
    pub duration_secs: f64,
    pub over: bool,
    pub squads: Vec<SquadView>,
}

/// One squadron's public state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadView {
    pub squad_id: u32,
    pub formation: FormationShape,
    pub movement: MovementStyle,
    pub phase: SquadPhase,
    pub spawned: bool,
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub members_alive: u32,
    pub members_diving: u32,
}

/// One enemy craft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    /// Stable entity id (bits of the world handle).
    pub id: u64,
    pub kind: CraftKind,
    pub behavior: Behavior,
    pub bounds: Rect,
    pub alive: bool,
}

/// One live enemy projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub bounds: Rect,
}
