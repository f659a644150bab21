//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs the current wave and all systems, and produces `GameStateSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use wingstorm_core::commands::PlayerCommand;
use wingstorm_core::config::GameSettings;
use wingstorm_core::enums::{Difficulty, GamePhase};
use wingstorm_core::events::SimEvent;
use wingstorm_core::state::GameStateSnapshot;
use wingstorm_core::types::SimTime;

use crate::systems;
use crate::wave::Wave;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    /// Difficulty used when a run starts without one.
    pub difficulty: Difficulty,
    /// Tuned constants; assumed validated.
    pub settings: GameSettings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            difficulty: Difficulty::default(),
            settings: GameSettings::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    difficulty: Difficulty,
    time_scale: f64,
    rng: ChaCha8Rng,
    settings: GameSettings,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<SimEvent>,

    wave: Option<Wave>,
    /// Timed-out waves whose members are still escaping.
    retiring: Vec<Wave>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            difficulty: config.difficulty,
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            settings: config.settings,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            wave: None,
            retiring: Vec::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.difficulty,
            self.wave.as_ref(),
            &self.retiring,
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for external collaborators (collision resolution).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The wave currently being played.
    pub fn wave(&self) -> Option<&Wave> {
        self.wave.as_ref()
    }

    pub fn retiring_waves(&self) -> &[Wave] {
        &self.retiring
    }

    /// Apply queued commands without advancing time. `tick` does this first;
    /// a runner frozen at time scale 0 calls it directly.
    pub fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame { difficulty } => {
                if self.phase == GamePhase::MainMenu {
                    self.clear_field();
                    self.difficulty = difficulty;
                    self.time = SimTime::default();
                    self.phase = GamePhase::Active;
                    info!("Run started on {:?}", difficulty);
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = if scale.is_finite() {
                    scale.clamp(0.0, 4.0)
                } else {
                    1.0
                };
            }
            PlayerCommand::ReturnToMenu => {
                if self.phase != GamePhase::MainMenu {
                    self.clear_field();
                    self.phase = GamePhase::MainMenu;
                    info!("Run abandoned at {:.1}s", self.time.elapsed_secs);
                }
            }
        }
    }

    fn clear_field(&mut self) {
        self.world.clear();
        self.wave = None;
        self.retiring.clear();
        self.events.clear();
    }

    fn start_wave(&mut self, wave_number: u32, now: f64) {
        let wave = Wave::new(
            wave_number,
            self.difficulty,
            now,
            &self.settings,
            &mut self.rng,
        );
        info!(
            "Wave {} started: {} squads, {:.0}s, up to {} independents",
            wave_number,
            wave.squads().len(),
            wave.duration(),
            wave.spawner().max_spawns()
        );
        self.events.push(SimEvent::WaveStarted {
            wave_number,
            squads: wave.squads().len() as u32,
        });
        self.wave = Some(wave);
    }

    /// Run the wave and all systems in order.
    fn run_systems(&mut self) {
        let now = self.time.elapsed_secs;

        // 1. Endless mode: a run always has a current wave
        if self.wave.is_none() {
            self.start_wave(1, now);
        }

        // 2. Waves: spawn, phase machines, member placement
        if let Some(wave) = self.wave.as_mut() {
            wave.tick(now, &mut self.world, &mut self.rng, &mut self.events);
        }
        for wave in &mut self.retiring {
            wave.tick(now, &mut self.world, &mut self.rng, &mut self.events);
        }

        // 3. Per-craft behaviour: escape, roam, fire
        systems::craft::run(&mut self.world, &mut self.rng, now, &self.settings.arena);
        // 4. Projectile movement
        systems::projectile::run(&mut self.world, &self.settings.arena);
        // 5. Cleanup (dead projectiles)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);

        // 6. Roll over to the next wave
        if self.wave.as_ref().is_some_and(Wave::is_wave_over) {
            if let Some(finished) = self.wave.take() {
                let next = finished.wave_number() + 1;
                self.retiring.push(finished);
                self.start_wave(next, now);
            }
        }

        // 7. Drop waves with nobody left
        let world = &mut self.world;
        self.retiring.retain_mut(|wave| {
            if wave.is_settled(world) {
                wave.despawn(world);
                false
            } else {
                true
            }
        });
    }
}
