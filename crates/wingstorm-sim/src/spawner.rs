//! Independent spawner: solitary craft that appear straight into the upper
//! play field on their own cadence, outside any formation.

use std::f64::consts::TAU;

use glam::DVec2;
use hecs::{Entity, World};
use log::debug;
use rand::Rng;

use wingstorm_core::components::Roam;
use wingstorm_core::config::{ArenaConfig, DifficultyProfile, WaveTuning};
use wingstorm_core::constants::*;
use wingstorm_core::enums::Behavior;
use wingstorm_formation::sample_span;

use crate::combat;
use crate::world_setup;

/// Cap on independent spawns for a wave.
pub fn max_per_wave(wave_number: u32, profile: &DifficultyProfile) -> u32 {
    let base = 1 + (wave_number / 4).min(2);
    (base + profile.independent_bonus).min(INDEPENDENT_MAX_PER_WAVE)
}

/// Delay until the next independent spawn.
pub fn next_interval_secs<R: Rng + ?Sized>(
    rng: &mut R,
    wave_number: u32,
    profile: &DifficultyProfile,
    tuning: &WaveTuning,
) -> f64 {
    let base = sample_span(rng, &profile.independent_interval_secs);
    let trim = (tuning.independent_trim_per_wave_secs * wave_number as f64)
        .min(tuning.independent_trim_max_secs);
    (base - trim).max(tuning.independent_min_interval_secs)
}

pub struct IndependentSpawner {
    wave_number: u32,
    profile: DifficultyProfile,
    max_per_wave: u32,
    spawned_count: u32,
    next_spawn_at: f64,
    spawns: Vec<Entity>,
}

impl IndependentSpawner {
    pub fn new(wave_number: u32, started_at: f64, profile: &DifficultyProfile) -> Self {
        Self {
            wave_number,
            profile: profile.clone(),
            max_per_wave: max_per_wave(wave_number, profile),
            spawned_count: 0,
            next_spawn_at: started_at + INDEPENDENT_FIRST_SPAWN_SECS,
            spawns: Vec::new(),
        }
    }

    /// Spawn when due (never once the wave is over), then drop dead spawns
    /// whose shots have all expired.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        wave_over: bool,
        world: &mut World,
        rng: &mut R,
        arena: &ArenaConfig,
        tuning: &WaveTuning,
    ) {
        if !wave_over && self.spawned_count < self.max_per_wave && now >= self.next_spawn_at {
            self.spawn_one(now, world, rng, arena);
            self.next_spawn_at = now + next_interval_secs(rng, self.wave_number, &self.profile, tuning);
        }

        self.spawns.retain(|&craft| {
            if combat::is_alive(world, craft) || combat::live_shots_from(world, craft) > 0 {
                return true;
            }
            let _ = world.despawn(craft);
            false
        });
    }

    fn spawn_one<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        world: &mut World,
        rng: &mut R,
        arena: &ArenaConfig,
    ) {
        let span = (arena.screen_width - 2.0 * arena.boundary_padding).max(0.0);
        let x = arena.boundary_padding + rng.gen::<f64>() * span;
        let y = INDEPENDENT_SPAWN_Y_MIN + rng.gen::<f64>() * INDEPENDENT_SPAWN_Y_RANGE;
        let roam = Roam {
            home_x: x,
            home_y: y,
            phase_offset: rng.gen::<f64>() * TAU,
            spawned_at: now,
        };
        let gunnery = world_setup::gunnery_for(self.wave_number, &self.profile, now);
        let craft = world_setup::spawn_bee(world, self.wave_number, DVec2::new(x, y), gunnery, roam);

        self.spawns.push(craft);
        self.spawned_count += 1;
        debug!(
            "Wave {} independent spawn {}/{} at ({x:.0}, {y:.0})",
            self.wave_number, self.spawned_count, self.max_per_wave
        );
    }

    /// Send every live spawn upward and off the screen.
    pub fn begin_escape(&mut self, world: &mut World) {
        for &craft in &self.spawns {
            if combat::is_alive(world, craft) {
                combat::set_behavior(world, craft, Behavior::Escaping);
            }
        }
    }

    /// Retained spawns, dead ones included until their shots expire.
    pub fn spawns(&self) -> &[Entity] {
        &self.spawns
    }

    pub fn live_count(&self, world: &World) -> usize {
        self.spawns
            .iter()
            .filter(|&&craft| combat::is_alive(world, craft))
            .count()
    }

    pub fn spawned_count(&self) -> u32 {
        self.spawned_count
    }

    pub fn max_spawns(&self) -> u32 {
        self.max_per_wave
    }

    pub fn next_spawn_at(&self) -> f64 {
        self.next_spawn_at
    }

    /// Remove every retained spawn from the world.
    pub fn despawn(&mut self, world: &mut World) {
        for craft in self.spawns.drain(..) {
            let _ = world.despawn(craft);
        }
    }

    /// Track an already-spawned craft (scenario setup).
    #[cfg(test)]
    pub(crate) fn adopt(&mut self, craft: Entity) {
        self.spawns.push(craft);
    }
}
