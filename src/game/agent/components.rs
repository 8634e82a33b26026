use bevy::prelude::*;

use crate::game::fixed_math::FixedNum;

/// An entity steered by the flow field.
///
/// Position, velocity and heading live in the simulation components
/// ([`SimPosition`](crate::game::simulation::SimPosition) and friends); this
/// component only carries the agent's steering limits.
#[derive(Component, Debug, Clone, Copy)]
pub struct FlowAgent {
    pub max_speed: FixedNum,
    pub max_force: FixedNum,
}

impl FlowAgent {
    pub fn new(max_speed: FixedNum, max_force: FixedNum) -> Self {
        Self { max_speed, max_force }
    }

    /// Scale applied to `desired - velocity` to get the steering force.
    pub fn responsiveness(&self) -> FixedNum {
        if self.max_speed == FixedNum::ZERO {
            FixedNum::ZERO
        } else {
            self.max_force / self.max_speed
        }
    }
}
