//! Formation slot layouts.
//!
//! Offsets are relative to the squadron anchor, in pixels, y downward.
//! Slot 0 is always the leader at the anchor itself.

use glam::DVec2;

use wingstorm_core::constants::{FORMATION_SPACING_X, FORMATION_SPACING_Y, MAX_SQUAD_MEMBERS};
use wingstorm_core::enums::FormationShape;

/// Slot offsets for `count` members (clamped to 1..=MAX_SQUAD_MEMBERS).
pub fn formation_offsets(shape: FormationShape, count: usize) -> Vec<DVec2> {
    let count = count.clamp(1, MAX_SQUAD_MEMBERS);
    let half_x = (FORMATION_SPACING_X / 2.0).floor();
    let sy = FORMATION_SPACING_Y;

    match shape {
        FormationShape::Column => {
            let jog = (FORMATION_SPACING_X / 3.0).floor();
            (0..count)
                .map(|i| {
                    let ox = if i % 2 == 0 { 0.0 } else { jog };
                    DVec2::new(ox, i as f64 * sy)
                })
                .collect()
        }
        FormationShape::Triangle => {
            let wedge = [
                DVec2::new(0.0, 0.0),
                DVec2::new(-half_x, sy),
                DVec2::new(half_x, sy),
                DVec2::new(0.0, 2.0 * sy),
                DVec2::new(0.0, 3.0 * sy),
            ];
            wedge[..count].to_vec()
        }
        // Line and Diamond share the staggered chevron.
        FormationShape::Line | FormationShape::Diamond => {
            let stagger = [
                DVec2::new(0.0, 0.0),
                DVec2::new(-half_x, sy),
                DVec2::new(half_x, sy),
                DVec2::new(-half_x, 2.0 * sy),
                DVec2::new(half_x, 2.0 * sy),
            ];
            stagger[..count].to_vec()
        }
    }
}

/// Largest downward offset of any slot (0 for an empty layout).
pub fn max_offset_y(offsets: &[DVec2]) -> f64 {
    offsets.iter().map(|o| o.y).fold(0.0, f64::max)
}
