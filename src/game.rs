use bevy::prelude::*;

pub mod agent;
pub mod config;
pub mod fixed_math;
pub mod simulation;
pub mod structures;

use agent::AgentPlugin;
use config::GameConfigPlugin;
use simulation::SimulationPlugin;

/// Everything needed to run the flow field simulation headless: config
/// loading, the grid resource and its recompute, and agent steering.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((GameConfigPlugin, SimulationPlugin, AgentPlugin));
    }
}
