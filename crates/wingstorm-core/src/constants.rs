//! Simulation constants and fixed parameters.
//!
//! Values that were tuned by feel live in `config` as defaults instead, so
//! they can be overridden from a settings file.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Upper bound on ticks run for one real-clock frame before the backlog is dropped.
pub const MAX_CATCH_UP_TICKS: u32 = 5;

// --- Play field ---

/// Play field width in pixels.
pub const SCREEN_WIDTH: f64 = 800.0;

/// Play field height in pixels.
pub const SCREEN_HEIGHT: f64 = 850.0;

/// Horizontal margin the formation anchor must keep from either edge.
pub const BOUNDARY_PADDING: f64 = 50.0;

// --- Craft ---

/// Squad fighter hitbox (pixels).
pub const FIGHTER_WIDTH: f64 = 30.0;
pub const FIGHTER_HEIGHT: f64 = 40.0;

/// Jellyfish hitbox (pixels).
pub const JELLYFISH_WIDTH: f64 = 36.0;
pub const JELLYFISH_HEIGHT: f64 = 36.0;

/// Independent bee hitbox (pixels).
pub const BEE_WIDTH: f64 = 32.0;
pub const BEE_HEIGHT: f64 = 32.0;

/// Jellyfish hit points (fighters have one).
pub const JELLYFISH_HP: i32 = 2;

/// Damage used for forced removals (exit, off-screen, escape).
pub const OVERWHELMING_DAMAGE: i32 = 9999;

/// Upward speed of escaping craft (px/tick).
pub const ESCAPE_SPEED: f64 = 10.0;

/// Fraction of the remaining distance a jellyfish closes toward its slot per tick.
pub const JELLYFISH_FOLLOW_RATE: f64 = 0.25;

// --- Formation layout ---

/// Horizontal slot spacing (pixels).
pub const FORMATION_SPACING_X: f64 = 46.0;

/// Vertical slot spacing (pixels).
pub const FORMATION_SPACING_Y: f64 = 36.0;

/// Maximum members per squadron.
pub const MAX_SQUAD_MEMBERS: usize = 5;

// --- Lazy spawn placement ---

/// Nominal craft height used to push the spawn point above the screen.
pub const SPAWN_CRAFT_HEIGHT: f64 = 44.0;

/// How many craft heights of clearance above y = 0 a fresh squad gets.
pub const SPAWN_OUTSIDE_CRAFT_HEIGHTS: f64 = 3.0;

/// Spawn anchor x keeps this far inside the anchor band.
pub const SPAWN_X_INSET: f64 = 50.0;

// --- Projectiles ---

/// Enemy bullet edge length (pixels).
pub const ENEMY_BULLET_SIZE: f64 = 6.0;

/// Enemy bullet downward speed (px/tick).
pub const ENEMY_BULLET_SPEED: f64 = 5.0;

/// Enemy bullet damage.
pub const ENEMY_BULLET_DAMAGE: i32 = 1;

// --- Gunnery ---

/// Base shot interval at wave 0 (seconds); shrinks 0.2 s per wave.
pub const BASE_SHOOT_INTERVAL_SECS: f64 = 3.0;
pub const SHOOT_INTERVAL_DECAY_PER_WAVE: f64 = 0.2;
pub const MIN_BASE_SHOOT_INTERVAL_SECS: f64 = 0.8;

/// Floor after the difficulty multiplier is applied.
pub const MIN_SHOOT_INTERVAL_SECS: f64 = 0.2;

/// Chance to fire once the interval has elapsed: 0.1 per wave, capped.
pub const FIRE_CHANCE_PER_WAVE: f64 = 0.1;
pub const MAX_FIRE_CHANCE: f64 = 0.8;

// --- Independent spawns ---

/// Delay before the first independent spawn of a wave (seconds).
pub const INDEPENDENT_FIRST_SPAWN_SECS: f64 = 1.2;

/// Spawn height band for independent craft (pixels).
pub const INDEPENDENT_SPAWN_Y_MIN: f64 = 70.0;
pub const INDEPENDENT_SPAWN_Y_RANGE: f64 = 40.0;

/// Hard cap on independent spawns per wave.
pub const INDEPENDENT_MAX_PER_WAVE: u32 = 6;

/// Wander amplitude and angular rate of independent craft.
pub const ROAM_AMPLITUDE_X: f64 = 120.0;
pub const ROAM_RATE: f64 = 1.4;
pub const ROAM_BOB_Y: f64 = 12.0;
