//! Boundary governor: velocity smoothing, idle wobble, boundary bounce and
//! hard clamping for a squadron anchor.

use glam::DVec2;

use wingstorm_core::config::{ArenaConfig, SquadTuning};

/// Which vertical limits apply to the anchor this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalRegime {
    /// Flying in from above: no ceiling, no roam band, no wobble.
    Entering,
    /// Patrol, attack, regroup: full band and wobble.
    Combat,
    /// Leaving downward: no combat floor, no roam band, no wobble.
    Exiting,
}

/// Owns the anchor's velocity and target velocity and keeps the anchor in bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryGovernor {
    pub velocity: DVec2,
    pub target_velocity: DVec2,
    last_bounce_at: Option<f64>,

    min_x: f64,
    max_x: f64,
    band_top: f64,
    band_bottom: f64,
    ceiling_y: f64,
    combat_max_y: f64,
    floor_y: f64,

    smoothing: f64,
    cooldown_secs: f64,
    kick: f64,
    inset: f64,
    floor_velocity_damping: f64,
    floor_target_damping: f64,
    wobble: DVec2,
    wobble_period: DVec2,
}

impl BoundaryGovernor {
    pub fn new(arena: &ArenaConfig, tuning: &SquadTuning) -> Self {
        Self {
            velocity: DVec2::ZERO,
            target_velocity: DVec2::ZERO,
            last_bounce_at: None,
            min_x: arena.min_anchor_x(),
            max_x: arena.max_anchor_x(),
            band_top: arena.roam_min_y.max(arena.ceiling_y),
            band_bottom: arena.roam_max_y.min(arena.combat_max_y),
            ceiling_y: arena.ceiling_y,
            combat_max_y: arena.combat_max_y,
            floor_y: arena.screen_height + arena.floor_margin,
            smoothing: tuning.velocity_smoothing.clamp(0.0, 1.0),
            cooldown_secs: tuning.bounce_cooldown_secs.max(0.0),
            kick: tuning.bounce_kick.max(0.0),
            inset: tuning.bounce_inset,
            floor_velocity_damping: tuning.floor_velocity_damping,
            floor_target_damping: tuning.floor_target_damping,
            wobble: DVec2::new(tuning.wobble_x, tuning.wobble_y),
            wobble_period: DVec2::new(
                tuning.wobble_period_x_secs.max(f64::EPSILON),
                tuning.wobble_period_y_secs.max(f64::EPSILON),
            ),
        }
    }

    pub fn last_bounce_at(&self) -> Option<f64> {
        self.last_bounce_at
    }

    fn bounce_ready(&self, now: f64) -> bool {
        self.last_bounce_at
            .map_or(true, |at| now - at > self.cooldown_secs)
    }

    /// Move `anchor` by one tick. Returns true if a bounce fired.
    pub fn step(
        &mut self,
        anchor: &mut DVec2,
        now: f64,
        regime: VerticalRegime,
        phase_offset: f64,
    ) -> bool {
        let k = self.smoothing;
        self.velocity = self.velocity * (1.0 - k) + self.target_velocity * k;

        let wobble = if regime == VerticalRegime::Combat {
            DVec2::new(
                (now / self.wobble_period.x + phase_offset).sin() * self.wobble.x,
                (now / self.wobble_period.y + phase_offset).cos() * self.wobble.y,
            )
        } else {
            DVec2::ZERO
        };
        *anchor += self.velocity + wobble;

        let mut bounced = false;
        if self.bounce_ready(now) {
            if anchor.x < self.min_x {
                anchor.x = self.min_x + self.inset;
                self.velocity.x = self.velocity.x.abs().max(self.kick);
                self.target_velocity.x = self.target_velocity.x.abs();
                bounced = true;
            } else if anchor.x > self.max_x {
                anchor.x = self.max_x - self.inset;
                self.velocity.x = -self.velocity.x.abs().max(self.kick);
                self.target_velocity.x = -self.target_velocity.x.abs();
                bounced = true;
            }

            if regime == VerticalRegime::Combat {
                if anchor.y < self.band_top {
                    anchor.y = self.band_top + self.inset;
                    self.velocity.y = self.velocity.y.abs();
                    self.target_velocity.y = self.target_velocity.y.abs();
                    bounced = true;
                } else if anchor.y > self.band_bottom {
                    anchor.y = self.band_bottom - self.inset;
                    self.velocity.y = -self.velocity.y.abs() * self.floor_velocity_damping;
                    self.target_velocity.y =
                        -self.target_velocity.y.abs() * self.floor_target_damping;
                    bounced = true;
                }
            }

            if bounced {
                self.last_bounce_at = Some(now);
            }
        }

        self.clamp(anchor, regime);
        bounced
    }

    /// Hard limits that hold regardless of bounce cooldown.
    fn clamp(&self, anchor: &mut DVec2, regime: VerticalRegime) {
        anchor.x = anchor.x.max(self.min_x).min(self.max_x);
        anchor.y = anchor.y.min(self.floor_y);
        if regime != VerticalRegime::Entering {
            anchor.y = anchor.y.max(self.ceiling_y);
        }
        if regime != VerticalRegime::Exiting {
            anchor.y = anchor.y.min(self.combat_max_y);
        }
    }
}
