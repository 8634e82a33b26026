mod components;
mod steering;

use bevy::prelude::*;
use crate::game::simulation::SimSet;

pub use components::FlowAgent;
pub use steering::{accelerate, follow_flow_field, sample_flow, steering_force, Agent};

/// Plugin that steers flow agents along the grid's field each fixed tick
pub struct AgentPlugin;

impl Plugin for AgentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, follow_flow_field.in_set(SimSet::Steering));
    }
}
