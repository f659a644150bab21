//! Wave scheduler: one timed cohort of squadrons plus independent spawns.
//!
//! Squad count, spawn delays and duration are decided at construction from
//! the wave number, the difficulty profile and the seeded RNG. A wave ends
//! when its duration elapses (every live member escapes) or when nothing of
//! it is left alive.

use hecs::{Entity, World};
use log::info;
use rand::Rng;

use wingstorm_core::config::{DifficultyProfile, GameSettings, WaveTuning};
use wingstorm_core::enums::{Difficulty, WaveEndReason};
use wingstorm_core::events::SimEvent;
use wingstorm_core::state::WaveView;
use wingstorm_formation::sample_span;

use crate::combat;
use crate::spawner::IndependentSpawner;
use crate::squadron::Squadron;

/// Number of squadrons in a wave.
pub fn squad_count(wave_number: u32, profile: &DifficultyProfile, tuning: &WaveTuning) -> u32 {
    let per_extra = tuning.waves_per_extra_squad.max(1);
    let mut count = tuning.base_squads + wave_number / per_extra;
    if wave_number <= 1 {
        count = tuning.opening_squads;
    } else if wave_number <= tuning.early_wave_limit {
        count = count.max(tuning.early_wave_squads);
    }

    count += if wave_number <= 2 {
        profile.opening_squad_bonus
    } else {
        profile.squad_bonus
    };
    count.min(profile.max_squads)
}

/// Wave length in seconds.
pub fn duration_secs(wave_number: u32, tuning: &WaveTuning) -> f64 {
    (tuning.base_duration_secs - tuning.duration_decay_per_wave_secs * wave_number as f64)
        .max(tuning.min_duration_secs)
}

/// Gap between one squad's spawn and the next.
pub fn spawn_gap_secs<R: Rng + ?Sized>(
    rng: &mut R,
    wave_number: u32,
    profile: &DifficultyProfile,
    tuning: &WaveTuning,
) -> f64 {
    let gap = if wave_number <= 1 {
        sample_span(rng, &tuning.opening_gap_secs)
    } else if wave_number <= tuning.early_wave_limit {
        sample_span(rng, &tuning.early_gap_secs)
    } else {
        let w = wave_number as f64;
        let base = (tuning.late_gap_base_secs - tuning.late_gap_decay_secs * w)
            .max(tuning.late_gap_floor_secs);
        let jitter = (tuning.late_jitter_secs - tuning.late_jitter_decay_secs * w)
            .max(tuning.late_jitter_floor_secs);
        base + rng.gen::<f64>() * jitter
    };
    (gap / profile.spawn_density.max(f64::EPSILON)).max(tuning.min_spawn_gap_secs)
}

pub struct Wave {
    wave_number: u32,
    difficulty: Difficulty,
    started_at: f64,
    duration_secs: f64,
    squads: Vec<Squadron>,
    spawner: IndependentSpawner,
    end_reason: Option<WaveEndReason>,
    settings: GameSettings,
}

impl Wave {
    pub fn new<R: Rng + ?Sized>(
        wave_number: u32,
        difficulty: Difficulty,
        started_at: f64,
        settings: &GameSettings,
        rng: &mut R,
    ) -> Self {
        let profile = settings.difficulty.get(difficulty);
        let tuning = &settings.wave;

        let count = squad_count(wave_number, profile, tuning);
        let mut spawn_delay = 0.0;
        let squads = (0..count)
            .map(|i| {
                spawn_delay += spawn_gap_secs(rng, wave_number, profile, tuning);
                Squadron::new(i + 1, wave_number, spawn_delay, profile, settings, rng)
            })
            .collect();

        Self {
            wave_number,
            difficulty,
            started_at,
            duration_secs: duration_secs(wave_number, tuning),
            squads,
            spawner: IndependentSpawner::new(wave_number, started_at, profile),
            end_reason: None,
            settings: settings.clone(),
        }
    }

    /// Spawn every squadron whose delay has elapsed. Nothing spawns once the
    /// wave is over.
    pub fn check_spawn<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        world: &mut World,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) {
        if self.is_wave_over() {
            return;
        }
        for squad in &mut self.squads {
            squad.check_spawn(self.started_at, now, world, rng, &self.settings, events);
        }
    }

    /// Advance the wave by one tick.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        world: &mut World,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) {
        self.check_spawn(now, world, rng, events);
        for squad in &mut self.squads {
            squad.tick(now, world, rng, &self.settings, events);
        }
        self.spawner.tick(
            now,
            self.is_wave_over(),
            world,
            rng,
            &self.settings.arena,
            &self.settings.wave,
        );
        self.check_wave_over(now, world, events);
    }

    fn check_wave_over(&mut self, now: f64, world: &mut World, events: &mut Vec<SimEvent>) {
        if self.end_reason.is_some() {
            return;
        }

        let reason = if now - self.started_at >= self.duration_secs {
            for squad in &mut self.squads {
                squad.begin_escape(world);
            }
            self.spawner.begin_escape(world);
            WaveEndReason::Timeout
        } else if self.squads.iter().all(Squadron::is_all_dead)
            && self.spawner.live_count(world) == 0
        {
            WaveEndReason::Cleared
        } else {
            return;
        };

        info!(
            "Wave {} over ({:?}) at {:.1}s",
            self.wave_number, reason, now
        );
        self.end_reason = Some(reason);
        events.push(SimEvent::WaveEnded {
            wave_number: self.wave_number,
            reason,
        });
    }

    pub fn is_wave_over(&self) -> bool {
        self.end_reason.is_some()
    }

    pub fn end_reason(&self) -> Option<WaveEndReason> {
        self.end_reason
    }

    /// Every enemy the wave currently exposes: members of spawned squadrons,
    /// then retained independent spawns.
    pub fn all_enemies(&self) -> Vec<Entity> {
        self.squads
            .iter()
            .flat_map(|squad| squad.enemies().iter().copied())
            .chain(self.spawner.spawns().iter().copied())
            .collect()
    }

    pub fn independent_spawns(&self) -> &[Entity] {
        self.spawner.spawns()
    }

    pub fn spawner(&self) -> &IndependentSpawner {
        &self.spawner
    }

    pub fn squads(&self) -> &[Squadron] {
        &self.squads
    }

    pub fn wave_number(&self) -> u32 {
        self.wave_number
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn duration(&self) -> f64 {
        self.duration_secs
    }

    pub fn start_time(&self) -> f64 {
        self.started_at
    }

    /// No live member remains anywhere in the wave.
    pub fn is_settled(&self, world: &World) -> bool {
        self.all_enemies()
            .into_iter()
            .all(|entity| !combat::is_alive(world, entity))
    }

    /// Remove every entity the wave owns from the world.
    pub fn despawn(&mut self, world: &mut World) {
        for squad in &mut self.squads {
            squad.despawn(world);
        }
        self.spawner.despawn(world);
    }

    pub fn view(&self, world: &World) -> WaveView {
        WaveView {
            wave_number: self.wave_number,
            started_at: self.started_at,
            duration_secs: self.duration_secs,
            over: self.is_wave_over(),
            squads: self.squads.iter().map(|squad| squad.view(world)).collect(),
        }
    }
}
