//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Formation shape of a squadron.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormationShape {
    /// Staggered side-by-side row.
    #[default]
    Line,
    /// Single file, alternating slightly to the right.
    Column,
    /// Point-first wedge with a trailing tail.
    Triangle,
    /// Staggered diamond.
    Diamond,
}

impl FormationShape {
    pub const ALL: [FormationShape; 4] = [
        FormationShape::Line,
        FormationShape::Column,
        FormationShape::Triangle,
        FormationShape::Diamond,
    ];
}

/// Movement style applied on top of the phase machine's velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementStyle {
    /// Holds position, horizontal drift decays.
    #[default]
    Hover,
    /// Constant-speed left/right sweep between the boundaries.
    Sweep,
    /// Sweep plus a slight forward lean.
    Diagonal,
    /// Fast time-phased lateral oscillation.
    Zigzag,
    /// Slow lateral sway while pressing forward.
    Sway,
}

impl MovementStyle {
    /// Styles drawn for "complex" squads.
    pub const COMPLEX: [MovementStyle; 3] = [
        MovementStyle::Diagonal,
        MovementStyle::Zigzag,
        MovementStyle::Sway,
    ];
}

/// Squadron behaviour phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquadPhase {
    /// Flying in from above the screen.
    #[default]
    Enter,
    /// Loitering in the upper play field.
    Patrol,
    /// Pressing forward while members dive.
    Attack,
    /// Waiting for divers to come home.
    Regroup,
    /// Leaving through the bottom edge. Terminal.
    Exit,
}

/// Difficulty level key into the difficulty table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Newbie,
    Veteran,
    Impossible,
}

/// What kind of craft an enemy entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CraftKind {
    /// Standard squad member, dive-capable.
    Fighter,
    /// Squad member that drifts after its slot and never dives.
    Jellyfish,
    /// Independent spawn, not part of any squadron.
    Bee,
}

impl CraftKind {
    /// Whether squadron attack waves may pick this craft as a diver.
    pub fn can_dive(&self) -> bool {
        matches!(self, CraftKind::Fighter)
    }
}

/// Behaviour tag deciding who moves a craft each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Placed by its squadron.
    #[default]
    Formation,
    /// Moves itself (independent spawns).
    Roaming,
    /// Flees upward off the screen, then dies.
    Escaping,
}

/// Why a wave ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveEndReason {
    /// Duration elapsed; survivors escape.
    Timeout,
    /// Every squad and independent spawn was destroyed.
    Cleared,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
}
