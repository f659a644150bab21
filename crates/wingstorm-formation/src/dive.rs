//! Dive controller.
//!
//! A dive is an out-and-back interpolation between a member's home slot and a
//! target point below the anchor. Targets are stored relative to the anchor
//! so a drifting squadron carries its divers along.

use glam::DVec2;
use rand::Rng;

use wingstorm_core::config::{ArenaConfig, Span, SquadTuning};

use crate::sample_span;

/// Per-slot dive state. Inert (all zero, not diving) when idle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiveInfo {
    pub is_diving: bool,
    pub is_returning: bool,
    pub progress: f64,
    pub progress_step: f64,
    /// Step for the return leg, rolled when the dive begins.
    pub return_step: f64,
    /// Dive target relative to the squadron anchor.
    pub target_offset: DVec2,
}

impl DiveInfo {
    pub fn inert() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::inert();
    }

    pub fn begin(&mut self, target_offset: DVec2, outbound_step: f64, return_step: f64) {
        self.is_diving = true;
        self.is_returning = false;
        self.progress = 0.0;
        self.progress_step = outbound_step;
        self.return_step = return_step;
        self.target_offset = target_offset;
    }

    /// Flip an outbound dive into its return leg. No-op otherwise.
    pub fn recall(&mut self) {
        if self.is_diving && !self.is_returning {
            self.start_return();
        }
    }

    fn start_return(&mut self) {
        self.is_returning = true;
        self.progress = 0.0;
        self.progress_step = self.return_step;
    }

    /// Advance one tick. `home` is the member's slot offset; returns the
    /// offset (relative to the anchor) the member should occupy this tick.
    pub fn advance(&mut self, home: DVec2) -> DVec2 {
        if !self.is_diving {
            return home;
        }

        self.progress = (self.progress + self.progress_step).min(1.0);
        let t = self.progress;

        if !self.is_returning {
            let offset = home.lerp(self.target_offset, t);
            if t >= 1.0 {
                self.start_return();
            }
            offset
        } else {
            let offset = self.target_offset.lerp(home, t);
            if t >= 1.0 {
                self.reset();
            }
            offset
        }
    }
}

/// Arena limits and random ranges for planning dives.
#[derive(Debug, Clone, PartialEq)]
pub struct DiveLimits {
    pub min_x: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub lateral: Span,
    pub depth: Span,
    pub step: Span,
    pub max_divers: usize,
}

impl DiveLimits {
    pub fn from_settings(arena: &ArenaConfig, tuning: &SquadTuning) -> Self {
        Self {
            min_x: arena.min_anchor_x(),
            max_x: arena.max_anchor_x(),
            max_y: arena.dive_max_y,
            lateral: tuning.dive_lateral,
            depth: tuning.dive_depth,
            step: tuning.dive_step,
            max_divers: tuning.max_divers.max(1),
        }
    }
}

/// Roll a fresh dive for a member of a squadron anchored at `anchor`.
pub fn plan_dive<R: Rng + ?Sized>(rng: &mut R, anchor: DVec2, limits: &DiveLimits) -> DiveInfo {
    let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let lateral = sample_span(rng, &limits.lateral) * side;
    let depth = sample_span(rng, &limits.depth);

    let target_x = (anchor.x + lateral).max(limits.min_x).min(limits.max_x);
    let target_y = (anchor.y + depth).min(limits.max_y);

    let outbound = sample_span(rng, &limits.step);
    let inbound = sample_span(rng, &limits.step);

    let mut info = DiveInfo::inert();
    info.begin(
        DVec2::new(target_x - anchor.x, target_y - anchor.y),
        outbound,
        inbound,
    );
    info
}

/// Start dives for up to `limits.max_divers` alive, dive-capable slots.
///
/// Slots are drawn with replacement; already-diving slots are skipped.
/// Returns the number of dives started.
pub fn begin_attack_wave<R: Rng + ?Sized>(
    rng: &mut R,
    dives: &mut [Option<DiveInfo>],
    alive: &[bool],
    anchor: DVec2,
    limits: &DiveLimits,
) -> usize {
    let eligible: Vec<usize> = dives
        .iter()
        .enumerate()
        .filter(|(i, d)| d.is_some() && alive.get(*i).copied().unwrap_or(false))
        .map(|(i, _)| i)
        .collect();
    if eligible.is_empty() {
        return 0;
    }

    let draws = rng.gen_range(1..=limits.max_divers.min(eligible.len()));
    let mut started = 0;
    for _ in 0..draws {
        let slot = eligible[rng.gen_range(0..eligible.len())];
        let Some(dive) = dives[slot].as_mut() else {
            continue;
        };
        if dive.is_diving {
            continue;
        }
        *dive = plan_dive(rng, anchor, limits);
        started += 1;
    }
    started
}

/// Send every outbound diver home.
pub fn recall_divers(dives: &mut [Option<DiveInfo>]) {
    for dive in dives.iter_mut().flatten() {
        dive.recall();
    }
}

pub fn any_diving(dives: &[Option<DiveInfo>]) -> bool {
    dives.iter().flatten().any(|d| d.is_diving)
}

pub fn count_diving(dives: &[Option<DiveInfo>]) -> usize {
    dives.iter().flatten().filter(|d| d.is_diving).count()
}
