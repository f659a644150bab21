//! Tunable settings: play field geometry, squadron pacing, wave pacing and
//! the difficulty table.
//!
//! Defaults are the tuned values the game ships with. A JSON settings file
//! may override any subset; missing fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::Difficulty;
use crate::error::ConfigError;

/// Closed numeric range `[min, max]` that a value is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Map a unit sample `u ∈ [0, 1)` into the range.
    pub fn lerp(&self, u: f64) -> f64 {
        self.min + (self.max - self.min) * u.clamp(0.0, 1.0)
    }

    fn check(&self, name: &str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(ConfigError::Invalid(format!(
                "{name}: range [{}, {}] is inverted or not finite",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Everything the simulation reads at construction time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub arena: ArenaConfig,
    pub squad: SquadTuning,
    pub wave: WaveTuning,
    pub difficulty: DifficultyTable,
}

impl GameSettings {
    /// Parse settings from JSON and validate them.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let settings: GameSettings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject inverted ranges, impossible geometry and out-of-range probabilities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena.validate()?;
        self.squad.validate()?;
        self.wave.validate()?;
        for difficulty in [
            Difficulty::Newbie,
            Difficulty::Veteran,
            Difficulty::Impossible,
        ] {
            self.difficulty.get(difficulty).validate(difficulty)?;
        }
        Ok(())
    }
}

/// Play field geometry and vertical zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub screen_width: f64,
    pub screen_height: f64,
    /// Horizontal margin the anchor keeps from each edge.
    pub boundary_padding: f64,
    /// Top of the band squads roam in outside ENTER/EXIT.
    pub roam_min_y: f64,
    /// Bottom of the roam band.
    pub roam_max_y: f64,
    /// Lowest anchor y outside EXIT, so squads never get point-blank.
    pub combat_max_y: f64,
    /// Lowest absolute y a dive may target.
    pub dive_max_y: f64,
    /// Highest anchor y outside ENTER.
    pub ceiling_y: f64,
    /// How far below the screen an anchor may travel before being pinned.
    pub floor_margin: f64,
    /// How far below the screen an exiting anchor must be before its members die.
    pub exit_margin: f64,
    /// Live members further than this below the screen are killed.
    pub member_kill_margin: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            boundary_padding: BOUNDARY_PADDING,
            roam_min_y: 70.0,
            roam_max_y: 320.0,
            combat_max_y: 700.0,
            dive_max_y: 760.0,
            ceiling_y: -200.0,
            floor_margin: 300.0,
            exit_margin: 70.0,
            member_kill_margin: 50.0,
        }
    }
}

impl ArenaConfig {
    pub fn min_anchor_x(&self) -> f64 {
        self.boundary_padding
    }

    pub fn max_anchor_x(&self) -> f64 {
        self.screen_width - self.boundary_padding
    }

    /// Range a fresh squad's anchor x is drawn from. Collapses to the middle
    /// of the anchor band when the field is too narrow for the inset.
    pub fn spawn_x_span(&self) -> Span {
        let min = self.min_anchor_x() + SPAWN_X_INSET;
        let max = self.max_anchor_x() - SPAWN_X_INSET;
        if min <= max {
            Span::new(min, max)
        } else {
            let mid = (self.min_anchor_x() + self.max_anchor_x()) / 2.0;
            Span::new(mid, mid)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width <= 2.0 * self.boundary_padding || self.screen_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "arena: {}x{} leaves no room inside padding {}",
                self.screen_width, self.screen_height, self.boundary_padding
            )));
        }
        Span::new(self.roam_min_y, self.roam_max_y).check("arena.roam_y")?;
        if self.dive_max_y > self.screen_height {
            return Err(ConfigError::Invalid(
                "arena.dive_max_y must keep dives on screen".into(),
            ));
        }
        Ok(())
    }
}

/// Squadron pacing: phase dwell times, smoothing, dive shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadTuning {
    /// Fraction of the gap to the target velocity closed per tick.
    pub velocity_smoothing: f64,
    /// Minimum time between two boundary bounces (seconds).
    pub bounce_cooldown_secs: f64,
    /// Minimum reflected x speed after a side bounce (px/tick).
    pub bounce_kick: f64,
    /// How far inside a limit a bounced anchor is placed (pixels).
    pub bounce_inset: f64,
    /// Damping applied to velocity and target after a bottom-of-band bounce.
    pub floor_velocity_damping: f64,
    pub floor_target_damping: f64,
    /// Wobble amplitudes (px/tick) and periods (seconds per radian).
    pub wobble_x: f64,
    pub wobble_y: f64,
    pub wobble_period_x_secs: f64,
    pub wobble_period_y_secs: f64,

    /// ENTER never completes before this much time has passed.
    pub enter_min_secs: f64,
    /// Per-tick progress increment of the entry path.
    pub enter_step: Span,
    /// Lateral swoop added to the entry path (pixels).
    pub enter_curve_amplitude: f64,
    /// On-screen y the entry path lands on.
    pub enter_target_y: Span,
    /// Anchor freeze right after ENTER.
    pub post_enter_hold_secs: f64,

    pub patrol_drift: f64,
    pub patrol_dwell_secs: Span,
    pub attack_ceiling_secs: f64,
    pub regroup_drift: f64,
    pub regroup_ceiling_secs: f64,
    /// Chance that a finished REGROUP leads to EXIT instead of PATROL.
    pub exit_probability: f64,

    /// Per-tick progress increment of each dive leg.
    pub dive_step: Span,
    /// Sideways displacement of a dive target (pixels, sign random).
    pub dive_lateral: Span,
    /// Downward displacement of a dive target (pixels).
    pub dive_depth: Span,
    /// Most members one attack wave may send.
    pub max_divers: usize,

    /// Jellyfish chance per slot: `base + per_wave * wave`, capped.
    pub jellyfish_chance_base: f64,
    pub jellyfish_chance_per_wave: f64,
    pub jellyfish_chance_max: f64,
    /// Chance of a complex movement style: `per_wave * wave`, capped.
    pub complex_style_chance_per_wave: f64,
    pub complex_style_chance_max: f64,
}

impl Default for SquadTuning {
    fn default() -> Self {
        Self {
            velocity_smoothing: 0.10,
            bounce_cooldown_secs: 0.09,
            bounce_kick: 0.3,
            bounce_inset: 0.8,
            floor_velocity_damping: 0.75,
            floor_target_damping: 0.55,
            wobble_x: 0.9,
            wobble_y: 0.35,
            wobble_period_x_secs: 0.52,
            wobble_period_y_secs: 0.9,
            enter_min_secs: 0.45,
            enter_step: Span::new(0.018, 0.028),
            enter_curve_amplitude: 10.0,
            enter_target_y: Span::new(50.0, 120.0),
            post_enter_hold_secs: 0.18,
            patrol_drift: 0.15,
            patrol_dwell_secs: Span::new(2.0, 4.0),
            attack_ceiling_secs: 3.5,
            regroup_drift: 0.10,
            regroup_ceiling_secs: 1.8,
            exit_probability: 0.2,
            dive_step: Span::new(0.010, 0.016),
            dive_lateral: Span::new(70.0, 190.0),
            dive_depth: Span::new(260.0, 460.0),
            max_divers: 3,
            jellyfish_chance_base: 0.10,
            jellyfish_chance_per_wave: 0.03,
            jellyfish_chance_max: 0.35,
            complex_style_chance_per_wave: 0.1,
            complex_style_chance_max: 0.9,
        }
    }
}

impl SquadTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        self.enter_step.check("squad.enter_step")?;
        self.enter_target_y.check("squad.enter_target_y")?;
        self.patrol_dwell_secs.check("squad.patrol_dwell_secs")?;
        self.dive_step.check("squad.dive_step")?;
        self.dive_lateral.check("squad.dive_lateral")?;
        self.dive_depth.check("squad.dive_depth")?;
        if self.enter_step.min <= 0.0 || self.dive_step.min <= 0.0 {
            return Err(ConfigError::Invalid(
                "squad: progress steps must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.velocity_smoothing) {
            return Err(ConfigError::Invalid(
                "squad.velocity_smoothing must be in [0, 1]".into(),
            ));
        }
        for (name, p) in [
            ("squad.exit_probability", self.exit_probability),
            ("squad.jellyfish_chance_max", self.jellyfish_chance_max),
            ("squad.complex_style_chance_max", self.complex_style_chance_max),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!("{name} must be in [0, 1]")));
            }
        }
        if self.max_divers == 0 {
            return Err(ConfigError::Invalid("squad.max_divers must be >= 1".into()));
        }
        Ok(())
    }
}

/// Wave pacing: duration, squad count and spawn gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub base_duration_secs: f64,
    pub duration_decay_per_wave_secs: f64,
    pub min_duration_secs: f64,

    /// Squad count before bonuses: `base_squads + wave / waves_per_extra_squad`.
    pub base_squads: u32,
    pub waves_per_extra_squad: u32,
    /// Squad count of wave 1.
    pub opening_squads: u32,
    /// Squad count floor for waves 2..=early_wave_limit.
    pub early_wave_squads: u32,
    pub early_wave_limit: u32,

    /// Gap between consecutive squad spawns in wave 1.
    pub opening_gap_secs: Span,
    /// Gap in waves 2..=early_wave_limit.
    pub early_gap_secs: Span,
    /// Later waves: `max(gap_floor, gap_base - gap_decay * wave)` plus jitter.
    pub late_gap_base_secs: f64,
    pub late_gap_decay_secs: f64,
    pub late_gap_floor_secs: f64,
    pub late_jitter_secs: f64,
    pub late_jitter_decay_secs: f64,
    pub late_jitter_floor_secs: f64,
    /// No two squads spawn closer than this, whatever the density.
    pub min_spawn_gap_secs: f64,

    /// Independent spawn interval shrinks `trim_per_wave * wave`, up to `trim_max`.
    pub independent_trim_per_wave_secs: f64,
    pub independent_trim_max_secs: f64,
    pub independent_min_interval_secs: f64,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_duration_secs: 40.0,
            duration_decay_per_wave_secs: 1.0,
            min_duration_secs: 15.0,
            base_squads: 3,
            waves_per_extra_squad: 3,
            opening_squads: 4,
            early_wave_squads: 5,
            early_wave_limit: 3,
            opening_gap_secs: Span::new(1.0, 1.6),
            early_gap_secs: Span::new(1.0, 2.0),
            late_gap_base_secs: 1.7,
            late_gap_decay_secs: 0.06,
            late_gap_floor_secs: 0.9,
            late_jitter_secs: 2.2,
            late_jitter_decay_secs: 0.04,
            late_jitter_floor_secs: 0.7,
            min_spawn_gap_secs: 0.25,
            independent_trim_per_wave_secs: 0.06,
            independent_trim_max_secs: 0.9,
            independent_min_interval_secs: 0.9,
        }
    }
}

impl WaveTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        self.opening_gap_secs.check("wave.opening_gap_secs")?;
        self.early_gap_secs.check("wave.early_gap_secs")?;
        if self.min_duration_secs <= 0.0 || self.base_duration_secs < self.min_duration_secs {
            return Err(ConfigError::Invalid(
                "wave: base duration must be at least the positive minimum".into(),
            ));
        }
        if self.waves_per_extra_squad == 0 {
            return Err(ConfigError::Invalid(
                "wave.waves_per_extra_squad must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Per-difficulty multipliers and bonuses, looked up opaquely by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Squad spawn gaps are divided by this (higher = denser).
    pub spawn_density: f64,
    /// Enemy shot interval is multiplied by this (lower = more fire).
    pub shoot_interval_multiplier: f64,
    /// Extra squads in waves 1 and 2.
    pub opening_squad_bonus: u32,
    /// Extra squads from wave 3 onward.
    pub squad_bonus: u32,
    /// Hard cap on squads per wave.
    pub max_squads: u32,
    /// Extra independent spawns per wave.
    pub independent_bonus: u32,
    /// Interval between independent spawns before the per-wave trim.
    pub independent_interval_secs: Span,
}

impl DifficultyProfile {
    fn validate(&self, difficulty: Difficulty) -> Result<(), ConfigError> {
        self.independent_interval_secs
            .check(&format!("difficulty.{difficulty:?}.independent_interval_secs"))?;
        if self.spawn_density <= 0.0 || self.shoot_interval_multiplier <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "difficulty.{difficulty:?}: multipliers must be positive"
            )));
        }
        if self.max_squads == 0 {
            return Err(ConfigError::Invalid(format!(
                "difficulty.{difficulty:?}.max_squads must be >= 1"
            )));
        }
        Ok(())
    }
}

/// Difficulty profiles keyed by level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub newbie: DifficultyProfile,
    pub veteran: DifficultyProfile,
    pub impossible: DifficultyProfile,
}

impl DifficultyTable {
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyProfile {
        match difficulty {
            Difficulty::Newbie => &self.newbie,
            Difficulty::Veteran => &self.veteran,
            Difficulty::Impossible => &self.impossible,
        }
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            newbie: DifficultyProfile {
                spawn_density: 1.0,
                shoot_interval_multiplier: 1.0,
                opening_squad_bonus: 0,
                squad_bonus: 0,
                max_squads: 7,
                independent_bonus: 0,
                independent_interval_secs: Span::new(2.8, 4.0),
            },
            veteran: DifficultyProfile {
                spawn_density: 1.0,
                shoot_interval_multiplier: 0.8,
                opening_squad_bonus: 0,
                squad_bonus: 0,
                max_squads: 7,
                independent_bonus: 1,
                independent_interval_secs: Span::new(2.1, 3.1),
            },
            impossible: DifficultyProfile {
                spawn_density: 1.22,
                shoot_interval_multiplier: 0.65,
                opening_squad_bonus: 1,
                squad_bonus: 2,
                max_squads: 9,
                independent_bonus: 2,
                independent_interval_secs: Span::new(1.6, 2.5),
            },
        }
    }
}
