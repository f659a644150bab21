//! Game loop thread: runs the simulation engine against the wall clock.
//!
//! The engine is created inside the thread so it never crosses threads.
//! Commands arrive via `mpsc` channel and are applied at the next tick
//! boundary. Real elapsed time, scaled by the engine's time scale, feeds a
//! `FixedStep` accumulator that decides how many ticks to run per wake-up.
//! The latest snapshot is stored in shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use log::{debug, info};

use wingstorm_core::commands::PlayerCommand;
use wingstorm_core::state::GameStateSnapshot;
use wingstorm_sim::clock::FixedStep;
use wingstorm_sim::engine::{SimConfig, SimulationEngine};

use crate::state::{CommandSender, GameLoopCommand, RunSummary, SharedSnapshot};

/// Shortest nap between wake-ups.
const MIN_SLEEP: Duration = Duration::from_millis(1);

/// Handle to a running game loop thread.
pub struct GameLoopHandle {
    command_tx: CommandSender,
    latest_snapshot: SharedSnapshot,
    join: JoinHandle<RunSummary>,
}

impl GameLoopHandle {
    /// Forward a player command to the simulation.
    pub fn send(&self, command: PlayerCommand) -> anyhow::Result<()> {
        self.command_tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|_| anyhow!("game loop has stopped"))
    }

    /// The snapshot produced by the most recent tick, if any.
    pub fn latest_snapshot(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }

    /// Stop the loop and wait for it to finish.
    pub fn shutdown(self) -> anyhow::Result<RunSummary> {
        // The loop also stops on disconnect, so a failed send is fine
        let _ = self.command_tx.send(GameLoopCommand::Shutdown);
        self.join
            .join()
            .map_err(|_| anyhow!("game loop thread panicked"))
    }
}

/// Spawns the game loop in a new thread.
pub fn spawn_game_loop(config: SimConfig) -> anyhow::Result<GameLoopHandle> {
    let (command_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let latest_snapshot: SharedSnapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let join = std::thread::Builder::new()
        .name("wingstorm-game-loop".into())
        .spawn(move || run_game_loop(config, cmd_rx, &shared))
        .context("failed to spawn game loop thread")?;

    Ok(GameLoopHandle {
        command_tx,
        latest_snapshot,
        join,
    })
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> RunSummary {
    info!("Game loop started (seed {})", config.seed);
    let mut engine = SimulationEngine::new(config);
    let mut clock = FixedStep::default();
    let mut summary = RunSummary::default();
    let mut last_wake = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    debug!("Command: {:?}", cmd);
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!("Game loop stopped after {} ticks", summary.ticks);
                    return summary;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Run the ticks that real time says are due
        let now = Instant::now();
        let elapsed = now.duration_since(last_wake).as_secs_f64();
        last_wake = now;

        let time_scale = engine.time_scale();
        let steps = clock.advance(elapsed * time_scale);
        if steps == 0 {
            // A slow or frozen clock may not reach a tick boundary for a long
            // time, so commands are applied now
            engine.process_commands();
        }
        for _ in 0..steps {
            let snapshot = engine.tick();
            summary.record(&snapshot);
            if let Ok(mut lock) = latest_snapshot.lock() {
                *lock = Some(snapshot);
            }
        }

        // 3. Sleep until the next tick is due, never longer than one step so
        // commands and shutdown stay responsive
        let step = clock.step_secs();
        let until_next = if time_scale > 0.0 {
            (step - clock.remainder()) / time_scale
        } else {
            step
        };
        std::thread::sleep(Duration::from_secs_f64(until_next.clamp(0.0, step)).max(MIN_SLEEP));
    }
}

/// Result of a fixed-length run.
pub struct HeadlessRun {
    pub summary: RunSummary,
    pub last_snapshot: Option<GameStateSnapshot>,
}

/// Queue `commands`, then run exactly `ticks` ticks as fast as possible.
pub fn run_headless(
    config: SimConfig,
    commands: impl IntoIterator<Item = PlayerCommand>,
    ticks: u64,
) -> HeadlessRun {
    let mut engine = SimulationEngine::new(config);
    engine.queue_commands(commands);

    let mut summary = RunSummary::default();
    let mut last_snapshot = None;
    for _ in 0..ticks {
        let snapshot = engine.tick();
        summary.record(&snapshot);
        last_snapshot = Some(snapshot);
    }
    HeadlessRun {
        summary,
        last_snapshot,
    }
}
