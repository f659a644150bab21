//! Squadron phase finite state machine.
//!
//! Pure functions that compute phase transitions and target velocity for a
//! squadron from its current phase and situation. Random decisions (patrol
//! dwell, exit roll) are made by the caller when a phase is entered and passed
//! back in through the context, so evaluation itself is deterministic.

use glam::DVec2;

use wingstorm_core::config::SquadTuning;
use wingstorm_core::enums::{MovementStyle, SquadPhase};

use crate::styles::steer;

/// Downward push while attacking: `max(ATTACK_MIN_DRIFT, speed * ATTACK_SPEED_FACTOR)`.
pub const ATTACK_MIN_DRIFT: f64 = 0.9;
pub const ATTACK_SPEED_FACTOR: f64 = 0.4;
/// Downward speed while exiting: `max(EXIT_MIN_SPEED, speed * EXIT_SPEED_FACTOR)`.
pub const EXIT_MIN_SPEED: f64 = 2.2;
pub const EXIT_SPEED_FACTOR: f64 = 0.65;
pub const EXIT_X_DAMPING: f64 = 0.9;

/// Input to the phase FSM for one squadron.
#[derive(Debug, Clone, Copy)]
pub struct PhaseContext {
    pub phase: SquadPhase,
    pub now_secs: f64,
    pub elapsed_in_phase_secs: f64,
    /// Anchor is frozen until this time after landing from ENTER.
    pub hold_until_secs: f64,
    pub anchor_y: f64,
    pub entry_complete: bool,
    pub any_diving: bool,
    /// Rolled on entering PATROL.
    pub patrol_dwell_secs: f64,
    /// Rolled on entering REGROUP: leave the field instead of patrolling again.
    pub exit_after_regroup: bool,
    pub move_speed: f64,
    pub target_velocity: DVec2,
    pub style: MovementStyle,
    pub phase_offset: f64,
    pub sweep_sign: f64,
}

/// Output from the phase FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseUpdate {
    pub new_phase: SquadPhase,
    pub phase_changed: bool,
    pub target_velocity: DVec2,
    /// Anchor does not move this tick.
    pub hold: bool,
    /// Zero the governor's velocities (landing from ENTER).
    pub reset_velocity: bool,
    pub begin_attack: bool,
    pub recall_divers: bool,
}

impl PhaseUpdate {
    fn stay(ctx: &PhaseContext, target_velocity: DVec2) -> Self {
        Self {
            new_phase: ctx.phase,
            phase_changed: false,
            target_velocity,
            hold: false,
            reset_velocity: false,
            begin_attack: false,
            recall_divers: false,
        }
    }

    fn go(ctx: &PhaseContext, phase: SquadPhase, target_velocity: DVec2) -> Self {
        Self {
            new_phase: phase,
            phase_changed: phase != ctx.phase,
            ..Self::stay(ctx, target_velocity)
        }
    }
}

/// Evaluate the FSM for one squadron.
pub fn evaluate(ctx: &PhaseContext, tuning: &SquadTuning) -> PhaseUpdate {
    let elapsed = ctx.elapsed_in_phase_secs.max(0.0);

    let mut update = match ctx.phase {
        SquadPhase::Enter => return evaluate_enter(ctx, elapsed, tuning),
        SquadPhase::Patrol => {
            if ctx.now_secs < ctx.hold_until_secs {
                let mut held = PhaseUpdate::stay(ctx, ctx.target_velocity);
                held.hold = true;
                return held;
            }
            evaluate_patrol(ctx, elapsed, tuning)
        }
        SquadPhase::Attack => evaluate_attack(ctx, elapsed, tuning),
        SquadPhase::Regroup => evaluate_regroup(ctx, elapsed, tuning),
        SquadPhase::Exit => {
            let mut target = ctx.target_velocity;
            target.y = EXIT_MIN_SPEED.max(ctx.move_speed * EXIT_SPEED_FACTOR);
            target.x *= EXIT_X_DAMPING;
            PhaseUpdate::stay(ctx, target)
        }
    };

    update.target_velocity = steer(
        ctx.style,
        update.target_velocity,
        ctx.now_secs,
        ctx.phase_offset,
        ctx.move_speed,
        ctx.sweep_sign,
    );
    update
}

fn evaluate_enter(ctx: &PhaseContext, elapsed: f64, tuning: &SquadTuning) -> PhaseUpdate {
    // Land only once the path is done, the minimum show time passed and the
    // anchor is on screen
    if ctx.entry_complete && elapsed >= tuning.enter_min_secs && ctx.anchor_y >= 0.0 {
        let mut update = PhaseUpdate::go(ctx, SquadPhase::Patrol, DVec2::ZERO);
        update.reset_velocity = true;
        update.hold = true;
        return update;
    }
    let mut update = PhaseUpdate::stay(ctx, ctx.target_velocity);
    update.hold = true;
    update
}

fn evaluate_patrol(ctx: &PhaseContext, elapsed: f64, tuning: &SquadTuning) -> PhaseUpdate {
    let mut target = ctx.target_velocity;
    target.y = tuning.patrol_drift;

    if elapsed > ctx.patrol_dwell_secs {
        let mut update = PhaseUpdate::go(ctx, SquadPhase::Attack, target);
        update.begin_attack = true;
        return update;
    }
    PhaseUpdate::stay(ctx, target)
}

fn evaluate_attack(ctx: &PhaseContext, elapsed: f64, tuning: &SquadTuning) -> PhaseUpdate {
    let mut target = ctx.target_velocity;
    target.y = ATTACK_MIN_DRIFT.max(ctx.move_speed * ATTACK_SPEED_FACTOR);

    if elapsed > tuning.attack_ceiling_secs || !ctx.any_diving {
        let mut update = PhaseUpdate::go(ctx, SquadPhase::Regroup, target);
        update.recall_divers = true;
        return update;
    }
    PhaseUpdate::stay(ctx, target)
}

fn evaluate_regroup(ctx: &PhaseContext, elapsed: f64, tuning: &SquadTuning) -> PhaseUpdate {
    let mut target = ctx.target_velocity;
    target.y = tuning.regroup_drift;

    if !ctx.any_diving || elapsed > tuning.regroup_ceiling_secs {
        let next = if ctx.exit_after_regroup {
            SquadPhase::Exit
        } else {
            SquadPhase::Patrol
        };
        return PhaseUpdate::go(ctx, next, target);
    }
    PhaseUpdate::stay(ctx, target)
}
