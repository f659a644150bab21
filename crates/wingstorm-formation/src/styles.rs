//! Movement-style steering profiles.
//!
//! Each style shapes the squadron's target velocity once per tick outside
//! ENTER. Speeds are px/tick; periods are seconds of simulation time.

use glam::DVec2;

use wingstorm_core::enums::MovementStyle;

/// Horizontal damping applied by HOVER each tick.
pub const HOVER_DAMPING: f64 = 0.9;

/// Steering parameters for one movement style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleProfile {
    /// Horizontal speed as a fraction of the squadron's move speed.
    pub speed_factor: f64,
    /// Floor on the horizontal speed.
    pub min_speed: f64,
    /// Oscillation period, `None` for constant-heading styles.
    pub period_secs: Option<f64>,
    /// Constant extra downward target velocity.
    pub forward_bias: f64,
    /// Extra downward target velocity as a fraction of move speed.
    pub forward_speed_factor: f64,
}

pub fn get_profile(style: MovementStyle) -> StyleProfile {
    match style {
        MovementStyle::Hover => StyleProfile {
            speed_factor: 0.0,
            min_speed: 0.0,
            period_secs: None,
            forward_bias: 0.0,
            forward_speed_factor: 0.0,
        },
        MovementStyle::Sweep => StyleProfile {
            speed_factor: 0.55,
            min_speed: 1.2,
            period_secs: None,
            forward_bias: 0.0,
            forward_speed_factor: 0.0,
        },
        MovementStyle::Diagonal => StyleProfile {
            speed_factor: 0.42,
            min_speed: 1.05,
            period_secs: None,
            forward_bias: 0.08,
            forward_speed_factor: 0.0,
        },
        MovementStyle::Zigzag => StyleProfile {
            speed_factor: 0.58,
            min_speed: 1.25,
            period_secs: Some(0.26),
            forward_bias: 0.0,
            forward_speed_factor: 0.0,
        },
        MovementStyle::Sway => StyleProfile {
            speed_factor: 0.55,
            min_speed: 0.0,
            period_secs: Some(0.52),
            forward_bias: 0.0,
            forward_speed_factor: 0.2,
        },
    }
}

/// Apply `style` to `target` for this tick.
///
/// `sweep_sign` seeds the heading of constant-heading styles when the target
/// has no horizontal component yet.
pub fn steer(
    style: MovementStyle,
    mut target: DVec2,
    now_secs: f64,
    phase_offset: f64,
    move_speed: f64,
    sweep_sign: f64,
) -> DVec2 {
    if style == MovementStyle::Hover {
        target.x *= HOVER_DAMPING;
        return target;
    }

    let profile = get_profile(style);
    let speed = (move_speed * profile.speed_factor).max(profile.min_speed);

    match profile.period_secs {
        Some(period) => {
            target.x = (now_secs / period + phase_offset).sin() * speed;
        }
        None => {
            if target.x.abs() < 0.1 {
                target.x = sweep_sign.signum() * speed;
            }
            target.x = speed.copysign(target.x);
        }
    }
    target.y += profile.forward_bias + move_speed * profile.forward_speed_factor;
    target
}
