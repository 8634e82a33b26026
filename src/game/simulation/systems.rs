/// Core simulation systems.
///
/// This module contains systems for:
/// - Startup (config conversion, grid construction, initial agents)
/// - Grid edits and flow field recompute
/// - Agent spawning and position integration
/// - Tick bookkeeping and status reporting

use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use wavefront_macros::profile;

use crate::game::agent::FlowAgent;
use crate::game::config::InitialConfig;
use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::structures::{FlowFieldError, Grid};

use super::components::*;
use super::events::*;
use super::resources::*;

// ============================================================================
// Tick Management
// ============================================================================

/// Increment the global simulation tick counter.
///
/// Runs first in FixedUpdate so every other system sees the current tick.
pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.increment();
}

// ============================================================================
// Startup
// ============================================================================

/// Initialize SimConfig from InitialConfig at startup
pub fn init_sim_config_from_initial(
    mut sim_config: ResMut<SimConfig>,
    fixed_time: Option<ResMut<Time<Fixed>>>,
    initial_config: Option<Res<InitialConfig>>,
) {
    let config = match initial_config {
        Some(cfg) => cfg.clone(),
        None => {
            warn!("InitialConfig not found, using defaults");
            InitialConfig::default()
        }
    };

    *sim_config = sim_config_from(&config);
    let tick_rate = sim_config.tick_rate;

    if let Some(mut fixed_time) = fixed_time {
        fixed_time.set_timestep_hz(tick_rate);
    }

    info!(
        "SimConfig initialized: {} ticks/s, agent max speed {}, max force {}",
        tick_rate, sim_config.max_speed, sim_config.max_force
    );
}

/// Fixed-point simulation parameters from the float config.
///
/// Values that are not finite, negative, or do not fit a [`FixedNum`] are
/// logged and replaced by the [`SimConfig::default`] value.
pub fn sim_config_from(config: &InitialConfig) -> SimConfig {
    let defaults = SimConfig::default();

    // The tick length must be a positive FixedNum as well.
    let tick_rate_valid = config.tick_rate.is_finite()
        && config.tick_rate > 0.0
        && FixedNum::checked_from_num(1.0 / config.tick_rate)
            .is_some_and(|dt| dt > FixedNum::ZERO);
    let tick_rate = if tick_rate_valid {
        config.tick_rate
    } else {
        error!("Invalid tick_rate {}, using {}", config.tick_rate, defaults.tick_rate);
        defaults.tick_rate
    };

    SimConfig {
        tick_rate,
        max_speed: agent_limit("agent_max_speed", config.agent_max_speed, defaults.max_speed),
        max_force: agent_limit("agent_max_force", config.agent_max_force, defaults.max_force),
        report_interval: config.report_interval,
        demo_ticks: config.demo_ticks,
    }
}

fn agent_limit(name: &str, value: f32, default: FixedNum) -> FixedNum {
    match FixedNum::checked_from_num(value) {
        Some(limit) if limit >= FixedNum::ZERO => limit,
        _ => {
            error!("Invalid {} {}, using {}", name, value, default);
            default
        }
    }
}

/// Builds the grid described by the config and computes its first field.
pub fn build_grid(config: &InitialConfig) -> Result<Grid, FlowFieldError> {
    let cell_size =
        FixedNum::checked_from_num(config.cell_size).ok_or(FlowFieldError::InvalidCellSize)?;
    let mut grid =
        Grid::new(config.grid_width, config.grid_height, cell_size, config.obstacles())?;

    grid.set_goal(config.goal());
    if let Some(start) = config.start() {
        grid.set_start(start)?;
    }

    scatter_obstacles(&mut grid, config.random_obstacles, config.random_seed);
    grid.calculate_flow_field()?;
    Ok(grid)
}

/// Marks up to `count` random cells as obstacles, never the goal or start.
fn scatter_obstacles(grid: &mut Grid, count: usize, seed: u64) {
    if count == 0 {
        return;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut placed = 0;

    // Bounded so a nearly full grid cannot spin forever.
    for _ in 0..count.saturating_mul(8) {
        if placed == count {
            break;
        }
        let coord = IVec2::new(rng.random_range(0..width), rng.random_range(0..height));
        if coord == grid.goal() || Some(coord) == grid.start() {
            continue;
        }
        if let Ok(true) = grid.add_obstacle(coord.x, coord.y) {
            placed += 1;
        }
    }

    debug!("Scattered {} random obstacles (seed {})", placed, seed);
}

/// Insert the FlowGrid resource built from InitialConfig.
///
/// An invalid config is logged and replaced by the default layout.
pub fn init_flow_grid(mut commands: Commands, initial_config: Option<Res<InitialConfig>>) {
    let config = initial_config.map(|c| c.clone()).unwrap_or_default();

    let grid = match build_grid(&config) {
        Ok(grid) => grid,
        Err(e) => {
            error!("Invalid grid configuration: {}", e);
            error!("Using default grid layout");
            match build_grid(&InitialConfig::default()) {
                Ok(grid) => grid,
                Err(e) => {
                    error!("Default grid layout failed: {}", e);
                    return;
                }
            }
        }
    };

    let stats = grid.field_stats();
    info!(
        "FlowGrid initialized: {}x{} cells, goal ({}, {}), {} obstacles, {} reachable, max cost {}",
        grid.width(),
        grid.height(),
        stats.goal.x,
        stats.goal.y,
        grid.obstacle_count(),
        stats.reachable,
        stats.max_cost
    );

    commands.insert_resource(FlowGrid(grid));
}

/// Spawn the agents listed in InitialConfig at their cell centres.
pub fn spawn_configured_agents(
    mut commands: Commands,
    initial_config: Option<Res<InitialConfig>>,
    grid: Option<Res<FlowGrid>>,
    sim_config: Res<SimConfig>,
) {
    let (Some(config), Some(grid)) = (initial_config, grid) else {
        return;
    };

    for cell in config.agent_cells() {
        if !grid.0.contains(cell) {
            warn!("Skipping agent at ({}, {}): outside the grid", cell.x, cell.y);
            continue;
        }
        let spawn = SpawnAgentCommand::at(grid.0.cell_center(cell), &sim_config);
        spawn_agent(&mut commands, &spawn);
    }
}

// ============================================================================
// Grid Editing
// ============================================================================

/// Apply queued grid edits. Never recomputes the field.
pub fn apply_grid_edits(mut edits: MessageReader<GridEditCommand>, grid: Option<ResMut<FlowGrid>>) {
    let Some(mut grid) = grid else {
        edits.clear();
        return;
    };

    for edit in edits.read() {
        let result = match *edit {
            GridEditCommand::SetGoal(goal) => {
                grid.0.set_goal(goal);
                Ok(())
            }
            GridEditCommand::AddObstacle(c) => grid.0.add_obstacle(c.x, c.y).map(|_| ()),
            GridEditCommand::RemoveObstacle(c) => grid.0.remove_obstacle(c.x, c.y).map(|_| ()),
            GridEditCommand::ToggleObstacle(c) => grid.0.toggle_obstacle(c.x, c.y).map(|_| ()),
            GridEditCommand::SetStart(c) => grid.0.set_start(c),
        };

        match result {
            Ok(()) => debug!("Applied grid edit {:?}", edit),
            Err(e) => warn!("Ignoring grid edit {:?}: {}", edit, e),
        }
    }
}

/// Rebuild the field once if any recompute was requested this tick.
#[profile(4)]
pub fn recompute_flow_field(
    mut requests: MessageReader<RecomputeFlowField>,
    grid: Option<ResMut<FlowGrid>>,
    mut recomputed: MessageWriter<FlowFieldRecomputed>,
    tick: Res<SimTick>,
) {
    if requests.read().count() == 0 {
        return;
    }
    let Some(mut grid) = grid else {
        warn!("Recompute requested before the grid exists");
        return;
    };

    match grid.0.calculate_flow_field() {
        Ok(stats) => {
            info!(
                "[FLOW_FIELD] Tick {}: goal ({}, {}), {} reachable, {} unreachable, \
                 {} impassable, max cost {} (generation {})",
                tick.0,
                stats.goal.x,
                stats.goal.y,
                stats.reachable,
                stats.unreachable,
                stats.impassable,
                stats.max_cost,
                stats.generation
            );
            recomputed.write(FlowFieldRecomputed { stats });
        }
        Err(e) => error!("[FLOW_FIELD] Tick {}: recompute failed: {}", tick.0, e),
    }
}

// ============================================================================
// Agents
// ============================================================================

fn spawn_agent(commands: &mut Commands, spawn: &SpawnAgentCommand) -> Entity {
    let entity = commands
        .spawn((
            FlowAgent::new(spawn.max_speed, spawn.max_force),
            SimPosition(spawn.position),
            SimVelocity(FixedVec2::ZERO),
            SimHeading::default(),
        ))
        .id();
    debug!("Spawned agent {:?} at {:?}", entity, spawn.position.to_vec2());
    entity
}

/// Spawn queued flow agents.
pub fn spawn_agents(mut commands: Commands, mut spawns: MessageReader<SpawnAgentCommand>) {
    for spawn in spawns.read() {
        spawn_agent(&mut commands, spawn);
    }
}

/// Apply velocity to position and refresh the heading.
pub fn apply_velocity(
    sim_config: Res<SimConfig>,
    mut query: Query<(&mut SimPosition, &SimVelocity, &mut SimHeading)>,
) {
    let delta = sim_config.delta();

    for (mut pos, vel, mut heading) in query.iter_mut() {
        if vel.0.is_zero() {
            continue;
        }
        pos.0 += vel.0 * delta;
        heading.0 = vel.0.angle();
    }
}

// ============================================================================
// Status
// ============================================================================

/// Log simulation status every `report_interval` ticks.
pub fn report_status(
    tick: Res<SimTick>,
    sim_config: Res<SimConfig>,
    grid: Option<Res<FlowGrid>>,
    agents: Query<&SimPosition, With<FlowAgent>>,
) {
    if sim_config.report_interval == 0 || tick.0 % sim_config.report_interval != 0 {
        return;
    }
    let Some(grid) = grid else {
        return;
    };

    let goal = grid.0.cell_center(grid.0.goal());
    let count = agents.iter().len();
    let nearest = agents
        .iter()
        .map(|pos| pos.0.distance(goal))
        .min()
        .unwrap_or(FixedNum::ZERO);

    info!(
        "[SIM STATUS] Tick: {} | Agents: {} | Field generation: {} | Nearest agent to goal: {}",
        tick.0,
        count,
        grid.0.generation(),
        nearest
    );
}

/// Exit once `demo_ticks` fixed ticks have run, logging where everything ended up.
pub fn exit_after_demo_ticks(
    tick: Res<SimTick>,
    sim_config: Res<SimConfig>,
    grid: Option<Res<FlowGrid>>,
    agents: Query<(Entity, &SimPosition), With<FlowAgent>>,
    mut exit: MessageWriter<AppExit>,
) {
    if sim_config.demo_ticks == 0 || tick.0 < sim_config.demo_ticks {
        return;
    }

    if let Some(grid) = grid {
        let path = grid.0.path_from_start();
        info!("Path from start: {:?}", path.iter().map(|c| (c.x, c.y)).collect::<Vec<_>>());

        let goal = grid.0.cell_center(grid.0.goal());
        for (entity, pos) in agents.iter() {
            info!(
                "Agent {:?} finished at {:?}, {} from goal",
                entity,
                pos.0.to_vec2(),
                pos.0.distance(goal)
            );
        }
    }

    info!("Demo finished after {} ticks", tick.0);
    exit.write(AppExit::Success);
}
