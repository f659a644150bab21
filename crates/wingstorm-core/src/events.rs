//! Events emitted by the simulation for audio, UI and scoring consumers.

use serde::{Deserialize, Serialize};

use crate::enums::WaveEndReason;

/// Something noteworthy that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A new wave was constructed and its clock started.
    WaveStarted { wave_number: u32, squads: u32 },
    /// A squadron's members were created above the screen.
    SquadSpawned { wave_number: u32, squad_id: u32 },
    /// Every member of a squadron is dead.
    SquadDestroyed { wave_number: u32, squad_id: u32 },
    /// A squadron left through the bottom edge.
    SquadExited { wave_number: u32, squad_id: u32 },
    /// The wave is over.
    WaveEnded {
        wave_number: u32,
        reason: WaveEndReason,
    },
}
