//! Formation flight for WINGSTORM squadrons.
//!
//! Pure math and state machines: slot layouts, the entry path, dive
//! interpolation, anchor boundary handling, the squadron phase FSM and
//! movement-style steering. No entity-world dependency; operates on plain data.

pub mod boundary;
pub mod dive;
pub mod entry;
pub mod fsm;
pub mod layout;
pub mod styles;

pub use wingstorm_core as core;

use rand::Rng;
use wingstorm_core::config::Span;

/// Draw a value uniformly from `span`. Never panics on degenerate ranges.
pub fn sample_span<R: Rng + ?Sized>(rng: &mut R, span: &Span) -> f64 {
    span.lerp(rng.gen::<f64>())
}
