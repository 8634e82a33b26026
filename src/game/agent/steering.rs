use bevy::prelude::*;
use wavefront_macros::profile;

use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::simulation::{FlowGrid, SimConfig, SimPosition, SimTick, SimVelocity};
use crate::game::structures::Grid;
use crate::profile_log;

use super::components::FlowAgent;

/// Direction used in place of a cell outside the grid: a unit vector pointing
/// back across the edge the cell fell off.
fn edge_fallback(grid: &Grid, coord: IVec2) -> FixedVec2 {
    let axis = |c: i32, len: usize| {
        if c < 0 {
            1
        } else if c >= len as i32 {
            -1
        } else {
            0
        }
    };
    let inward = IVec2::new(axis(coord.x, grid.width()), axis(coord.y, grid.height()));
    FixedVec2::from_ivec2(inward).normalize()
}

fn flow_or_fallback(grid: &Grid, coord: IVec2) -> FixedVec2 {
    match grid.cell(coord) {
        Some(cell) => cell.flow_direction(),
        None => edge_fallback(grid, coord),
    }
}

/// Samples the flow field at a continuous world position.
///
/// Bilinearly blends the directions of the four cells around the position
/// and normalises the result. Returns `ZERO` when the blend cancels out (or
/// every sampled cell has no direction). At an exact cell centre the cell's
/// stored direction is returned unchanged.
pub fn sample_flow(grid: &Grid, world_pos: FixedVec2) -> FixedVec2 {
    let grid_pos = grid.grid_position_of(world_pos);
    let origin = grid_pos.floor_to_ivec2();

    let f00 = flow_or_fallback(grid, origin);

    // Only leaves [0, 1) when the origin saturated at the i32 range.
    let weight = |g: FixedNum, o: i32| {
        g.saturating_sub(FixedNum::from_num(o)).clamp(FixedNum::ZERO, FixedNum::ONE)
    };
    let x_weight = weight(grid_pos.x, origin.x);
    let y_weight = weight(grid_pos.y, origin.y);
    if x_weight == FixedNum::ZERO && y_weight == FixedNum::ZERO {
        return f00;
    }

    let f01 = flow_or_fallback(grid, origin.saturating_add(IVec2::new(0, 1)));
    let f10 = flow_or_fallback(grid, origin.saturating_add(IVec2::new(1, 0)));
    let f11 = flow_or_fallback(grid, origin.saturating_add(IVec2::new(1, 1)));

    let top = f00.lerp(f10, x_weight);
    let bottom = f01.lerp(f11, x_weight);

    top.lerp(bottom, y_weight).normalize()
}

/// Force steering `velocity` toward the sampled flow at full speed.
///
/// With no direction available the desired velocity is zero, so the force
/// brakes whatever motion is left.
pub fn steering_force(
    grid: &Grid,
    agent: &FlowAgent,
    position: FixedVec2,
    velocity: FixedVec2,
) -> FixedVec2 {
    let desired = sample_flow(grid, position) * agent.max_speed;
    (desired - velocity) * agent.responsiveness()
}

/// Applies a force for one step and clamps the result to `max_speed`.
pub fn accelerate(
    velocity: FixedVec2,
    force: FixedVec2,
    max_speed: FixedNum,
    dt: FixedNum,
) -> FixedVec2 {
    let velocity = velocity + force * dt;
    let speed = velocity.length();
    if speed > max_speed {
        velocity.normalize() * max_speed
    } else {
        velocity
    }
}

/// Standalone agent for callers that drive the steering without an ECS world.
///
/// Borrows the grid only for the duration of [`Agent::update`], so the grid
/// can be edited and recomputed freely between ticks.
#[derive(Clone, Debug)]
pub struct Agent {
    pub position: FixedVec2,
    pub velocity: FixedVec2,
    /// Angle of the velocity in radians. Kept when the agent stops.
    pub heading: f32,
    steering: FlowAgent,
}

impl Agent {
    pub fn new(start: FixedVec2, max_speed: FixedNum, max_force: FixedNum) -> Self {
        Self {
            position: start,
            velocity: FixedVec2::ZERO,
            heading: 0.0,
            steering: FlowAgent::new(max_speed, max_force),
        }
    }

    pub fn max_speed(&self) -> FixedNum {
        self.steering.max_speed
    }

    pub fn max_force(&self) -> FixedNum {
        self.steering.max_force
    }

    pub fn update(&mut self, grid: &Grid, dt: FixedNum) {
        let force = steering_force(grid, &self.steering, self.position, self.velocity);
        self.velocity = accelerate(self.velocity, force, self.steering.max_speed, dt);
        if !self.velocity.is_zero() {
            self.heading = self.velocity.angle();
        }
        self.position += self.velocity * dt;
    }
}

/// Steers every flow agent along the current field.
///
/// Only velocities change here; positions are integrated afterwards in
/// [`SimSet::Integration`](crate::game::simulation::SimSet).
#[profile(2)]
pub fn follow_flow_field(
    mut query: Query<(&FlowAgent, &SimPosition, &mut SimVelocity)>,
    grid: Option<Res<FlowGrid>>,
    sim_config: Res<SimConfig>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let Some(grid) = grid else {
        return;
    };
    let delta = sim_config.delta();

    for (agent, pos, mut vel) in query.iter_mut() {
        let force = steering_force(&grid.0, agent, pos.0, vel.0);
        vel.0 = accelerate(vel.0, force, agent.max_speed, delta);
    }

    profile_log!(tick, "[FLOW_STEERING] Agents: {}", query.iter().len());
}

#[cfg(test)]
#[path = "steering_tests.rs"]
mod tests;
