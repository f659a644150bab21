//! Entry path: the anchor's flight from above the screen to its first
//! on-screen station.
//!
//! Position is a pure function of progress, so the path can neither
//! overshoot nor snap back.

use std::f64::consts::PI;

use glam::DVec2;

/// Smallest progress step accepted; keeps a zero step from stalling ENTER forever.
const MIN_STEP: f64 = 1e-3;

/// Hermite smoothstep on `[0, 1]`.
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Locked start/target pair plus eased progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryPath {
    start: DVec2,
    target: DVec2,
    progress: f64,
    step: f64,
    curve_amplitude: f64,
}

impl EntryPath {
    pub fn new(start: DVec2, target: DVec2, step: f64, curve_amplitude: f64) -> Self {
        Self {
            start,
            target,
            progress: 0.0,
            step: step.max(MIN_STEP),
            curve_amplitude,
        }
    }

    /// Advance one tick and return the new anchor position.
    pub fn advance(&mut self) -> DVec2 {
        self.progress = (self.progress + self.step).min(1.0);
        if self.progress >= 1.0 {
            return self.target;
        }

        let s = smoothstep(self.progress);
        let mut pos = self.start.lerp(self.target, s);
        pos.y += (PI * s).sin() * self.curve_amplitude;
        // Never dip below the landing height
        pos.y = pos.y.min(self.target.y);
        pos
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn start(&self) -> DVec2 {
        self.start
    }

    pub fn target(&self) -> DVec2 {
        self.target
    }
}
