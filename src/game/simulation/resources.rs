/// Resource definitions for the simulation.

use bevy::prelude::*;
use crate::game::fixed_math::FixedNum;
use crate::game::structures::Grid;

// ============================================================================
// Tick Tracking
// ============================================================================

/// Number of fixed ticks simulated so far.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 += 1;
    }
}

// ============================================================================
// Field Resources
// ============================================================================

/// The navigation grid every agent samples.
///
/// Systems that edit or recompute it hold `ResMut<FlowGrid>`, so the scheduler
/// never lets an agent read a half-written field.
#[derive(Resource, Debug, Clone)]
pub struct FlowGrid(pub Grid);

// ============================================================================
// Simulation Configuration
// ============================================================================

/// Fixed-point view of the simulation parameters.
///
/// Converted once from [`InitialConfig`](crate::game::config::InitialConfig)
/// at startup; every system reads this instead of the float config.
#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    pub tick_rate: f64,
    pub max_speed: FixedNum,
    pub max_force: FixedNum,
    /// Ticks between status log lines, 0 disables them.
    pub report_interval: u64,
    /// Ticks after which the app exits, 0 runs forever.
    pub demo_ticks: u64,
}

impl SimConfig {
    /// Length of one fixed tick in seconds.
    pub fn delta(&self) -> FixedNum {
        FixedNum::from_num(1.0 / self.tick_rate)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_speed: FixedNum::from_num(50.0),
            max_force: FixedNum::from_num(40.0),
            report_interval: 120,
            demo_ticks: 0,
        }
    }
}
