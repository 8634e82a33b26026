use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Default location of the startup configuration, relative to the working directory.
pub const INITIAL_CONFIG_PATH: &str = "assets/initial_config.ron";

/// Static configuration loaded once at startup. Describes the grid, the
/// initial goal and obstacles, the agents to spawn and the tick rate.
/// Changing these after startup has no effect; edit the grid through
/// [`GridEditCommand`](crate::game::simulation::GridEditCommand) instead.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InitialConfig {
    // Simulation
    pub tick_rate: f64,
    pub demo_ticks: u64,
    pub report_interval: u64,

    // Grid
    pub grid_width: usize,
    pub grid_height: usize,
    pub cell_size: f32,
    pub goal: (i32, i32),
    pub start: Option<(i32, i32)>,
    pub obstacles: Vec<(i32, i32)>,

    // Random obstacle scatter (deterministic for a given seed)
    pub random_obstacles: usize,
    pub random_seed: u64,

    // Agents
    pub agent_max_speed: f32,
    pub agent_max_force: f32,
    /// Grid cells whose centres receive an agent at startup.
    pub agents: Vec<(i32, i32)>,
}

impl InitialConfig {
    pub fn goal(&self) -> IVec2 {
        IVec2::new(self.goal.0, self.goal.1)
    }

    pub fn start(&self) -> Option<IVec2> {
        self.start.map(|(x, y)| IVec2::new(x, y))
    }

    pub fn obstacles(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.obstacles.iter().map(|&(x, y)| IVec2::new(x, y))
    }

    pub fn agent_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.agents.iter().map(|&(x, y)| IVec2::new(x, y))
    }
}

pub struct GameConfigPlugin;

impl Plugin for GameConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_initial_config);
    }
}

/// Load static initial configuration synchronously at startup.
///
/// A config inserted by the host app before startup wins over the file.
/// Read or parse failures fall back to [`InitialConfig::default`].
pub fn load_initial_config(mut commands: Commands, existing: Option<Res<InitialConfig>>) {
    if existing.is_some() {
        info!("Using InitialConfig provided by the app");
        return;
    }

    commands.insert_resource(read_initial_config(INITIAL_CONFIG_PATH));
}

/// Reads and parses a RON config file, logging and defaulting on failure.
pub fn read_initial_config(path: &str) -> InitialConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match parse_initial_config(&contents) {
            Ok(config) => {
                info!("Loaded initial config from {}", path);
                config
            }
            Err(e) => {
                error!("Failed to parse initial config {}: {}", path, e);
                error!("Using default InitialConfig");
                InitialConfig::default()
            }
        },
        Err(e) => {
            error!("Failed to read {}: {}", path, e);
            error!("Using default InitialConfig");
            InitialConfig::default()
        }
    }
}

pub fn parse_initial_config(contents: &str) -> Result<InitialConfig, ron::error::SpannedError> {
    ron::from_str::<InitialConfig>(contents)
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            demo_ticks: 0,
            report_interval: 120,
            grid_width: 20,
            grid_height: 20,
            cell_size: 60.0,
            goal: (10, 10),
            start: Some((2, 2)),
            obstacles: vec![(5, 10), (10, 5)],
            random_obstacles: 0,
            random_seed: 0,
            agent_max_speed: 50.0,
            agent_max_force: 40.0,
            agents: vec![(2, 2)],
        }
    }
}
