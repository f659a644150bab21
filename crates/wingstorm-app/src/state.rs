//! State shared between the command line front end and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use wingstorm_core::commands::PlayerCommand;
use wingstorm_core::enums::WaveEndReason;
use wingstorm_core::events::SimEvent;
use wingstorm_core::state::GameStateSnapshot;

/// Commands sent from the front end to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

pub type CommandSender = mpsc::Sender<GameLoopCommand>;

/// Latest snapshot, written by the game loop after every tick.
pub type SharedSnapshot = Arc<Mutex<Option<GameStateSnapshot>>>;

/// Running tally of what happened during a run, built from snapshot events.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed_secs: f64,
    pub current_wave: u32,
    pub waves_started: u32,
    pub waves_cleared: u32,
    pub waves_timed_out: u32,
    pub squads_spawned: u32,
    pub squads_destroyed: u32,
    pub squads_exited: u32,
    /// Enemies on the field in the last recorded snapshot, dead ones included.
    pub enemies_on_field: usize,
}

impl RunSummary {
    pub fn record(&mut self, snapshot: &GameStateSnapshot) {
        self.ticks = snapshot.time.tick;
        self.elapsed_secs = snapshot.time.elapsed_secs;
        self.enemies_on_field = snapshot.enemies.len();
        if let Some(wave) = &snapshot.wave {
            self.current_wave = wave.wave_number;
        }

        for event in &snapshot.events {
            match event {
                SimEvent::WaveStarted { .. } => self.waves_started += 1,
                SimEvent::WaveEnded { reason, .. } => match reason {
                    WaveEndReason::Cleared => self.waves_cleared += 1,
                    WaveEndReason::Timeout => self.waves_timed_out += 1,
                },
                SimEvent::SquadSpawned { .. } => self.squads_spawned += 1,
                SimEvent::SquadDestroyed { .. } => self.squads_destroyed += 1,
                SimEvent::SquadExited { .. } => self.squads_exited += 1,
            }
        }
    }
}
