use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use wingstorm_app::game_loop;
use wingstorm_app::logging;
use wingstorm_core::commands::PlayerCommand;
use wingstorm_core::config::GameSettings;
use wingstorm_core::enums::Difficulty;
use wingstorm_sim::engine::SimConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Newbie,
    Veteran,
    Impossible,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Newbie => Difficulty::Newbie,
            DifficultyArg::Veteran => Difficulty::Veteran,
            DifficultyArg::Impossible => Difficulty::Impossible,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "wingstorm")]
#[command(about = "Run the WINGSTORM enemy wave simulation headless")]
struct Args {
    /// RNG seed; the same seed replays the same run
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    #[arg(short, long, value_enum, default_value_t = DifficultyArg::Newbie)]
    difficulty: DifficultyArg,

    /// JSON settings file overriding the tuned defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run exactly this many ticks as fast as possible instead of in real time
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Real-time mode: wall-clock seconds to run for
    #[arg(long, default_value_t = 30.0)]
    seconds: f64,

    /// Simulation speed multiplier (0 to 4)
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::setup_logging(args.log_level).context("failed to install logger")?;

    let settings = match &args.config {
        Some(path) => GameSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => GameSettings::default(),
    };
    let difficulty = Difficulty::from(args.difficulty);
    let config = SimConfig {
        seed: args.seed,
        difficulty,
        settings,
        ..Default::default()
    };
    let commands = [
        PlayerCommand::SetTimeScale {
            scale: args.time_scale,
        },
        PlayerCommand::StartGame { difficulty },
    ];

    let summary = match args.ticks {
        Some(ticks) => {
            info!("Running {} ticks on {:?} (seed {})", ticks, difficulty, args.seed);
            game_loop::run_headless(config, commands, ticks).summary
        }
        None => {
            anyhow::ensure!(
                args.seconds.is_finite() && args.seconds >= 0.0,
                "--seconds must be a non-negative number"
            );
            info!(
                "Running {:.0}s in real time on {:?} (seed {})",
                args.seconds, difficulty, args.seed
            );
            let handle = game_loop::spawn_game_loop(config)?;
            for command in commands {
                handle.send(command)?;
            }
            std::thread::sleep(Duration::from_secs_f64(args.seconds));
            handle.shutdown()?
        }
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
