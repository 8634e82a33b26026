/// Simulation layer - deterministic fixed-tick logic around the flow field.
///
/// This module is organized into:
/// - **components**: Agent kinematics (position, velocity, heading)
/// - **resources**: The grid resource, tick counter and fixed-point config
/// - **events**: Grid edit, recompute and spawn messages
/// - **systems**: Startup, editing, recompute, integration and status systems

use bevy::prelude::*;
use crate::game::config::load_initial_config;

// Module declarations
pub mod components;
pub mod resources;
pub mod events;
pub mod systems;

// Re-export commonly used items
pub use components::*;
pub use resources::*;
pub use events::*;

pub use systems::{build_grid, sim_config_from};

// System sets for organizing execution order
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SimSet {
    Input,      // Grid edits and agent spawns
    Field,      // Flow field recompute
    Steering,   // Sampling the field into velocities
    Integration // Applying velocity to position
}

/// Main simulation plugin
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimConfig>();
        app.init_resource::<SimTick>();

        app.add_message::<GridEditCommand>();
        app.add_message::<RecomputeFlowField>();
        app.add_message::<FlowFieldRecomputed>();
        app.add_message::<SpawnAgentCommand>();

        app.configure_sets(FixedUpdate, (
            SimSet::Input,
            SimSet::Field,
            SimSet::Steering,
            SimSet::Integration,
        ).chain());

        app.add_systems(Startup, (
            systems::init_sim_config_from_initial,
            systems::init_flow_grid,
            systems::spawn_configured_agents,
        ).chain().after(load_initial_config));

        app.add_systems(FixedUpdate, (
            systems::increment_sim_tick.before(SimSet::Input),

            (systems::apply_grid_edits, systems::spawn_agents).in_set(SimSet::Input),

            systems::recompute_flow_field.in_set(SimSet::Field),

            systems::apply_velocity.in_set(SimSet::Integration),

            (systems::report_status, systems::exit_after_demo_ticks)
                .chain()
                .after(SimSet::Integration),
        ));
    }
}
