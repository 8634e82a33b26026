//! Deterministic fixed-point mathematics.
//!
//! Every quantity the flow field and the steering integrator touch is stored
//! as fixed-point so a recompute with identical inputs yields a bit-identical
//! field, and agents tick identically on every platform.

use fixed::types::I48F16;

pub use vec2::FixedVec2;

mod vec2;

/// Fixed-point number type used throughout the simulation.
///
/// I48F16: 48 integer bits, 16 fractional bits (~0.000015 precision).
pub type FixedNum = I48F16;
