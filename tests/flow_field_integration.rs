use bevy::prelude::*;
use wavefront::game::agent::FlowAgent;
use wavefront::game::config::InitialConfig;
use wavefront::game::fixed_math::FixedNum;
use wavefront::game::simulation::{
    build_grid, FlowGrid, GridEditCommand, RecomputeFlowField, SimConfig, SimHeading, SimPosition,
    SimTick, SimVelocity, SpawnAgentCommand,
};
use wavefront::game::structures::Grid;
use wavefront::game::GamePlugin;

/// Headless app with the given config, after startup has run.
fn setup_app(config: InitialConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(config);
    app.add_plugins(GamePlugin);
    app.update();
    app
}

fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

fn grid(app: &App) -> &Grid {
    &app.world().resource::<FlowGrid>().0
}

fn agent_positions(app: &mut App) -> Vec<(f32, f32)> {
    let mut query = app.world_mut().query_filtered::<&SimPosition, With<FlowAgent>>();
    query
        .iter(app.world())
        .map(|p| (p.0.x.to_num::<f32>(), p.0.y.to_num::<f32>()))
        .collect()
}

#[test]
fn test_startup_builds_grid_and_agents() {
    let config = InitialConfig::default();
    let mut app = setup_app(config.clone());

    let grid = grid(&app);
    assert_eq!((grid.width(), grid.height()), (20, 20));
    assert_eq!(grid.goal(), IVec2::new(10, 10));
    assert_eq!(grid.generation(), 1, "startup computes the first field");
    assert!(grid.is_obstacle(IVec2::new(5, 10)));
    assert!(grid.reaches_goal(IVec2::new(2, 2)));

    assert_eq!(agent_positions(&mut app).len(), config.agents.len());
}

#[test]
fn test_messages_match_direct_grid_calls() {
    let mut app = setup_app(InitialConfig::default());

    let edits = [
        GridEditCommand::AddObstacle(IVec2::new(9, 9)),
        GridEditCommand::ToggleObstacle(IVec2::new(5, 10)),
        GridEditCommand::SetGoal(IVec2::new(15, 4)),
        GridEditCommand::AddObstacle(IVec2::new(14, 4)),
    ];
    for edit in edits {
        app.world_mut().write_message(edit);
    }
    app.world_mut().write_message(RecomputeFlowField);
    run_ticks(&mut app, 1);

    let mut expected = build_grid(&InitialConfig::default()).unwrap();
    expected.add_obstacle(9, 9).unwrap();
    expected.toggle_obstacle(5, 10).unwrap();
    expected.set_goal(IVec2::new(15, 4));
    expected.add_obstacle(14, 4).unwrap();
    expected.calculate_flow_field().unwrap();

    let actual = grid(&app);
    assert_eq!(actual.goal(), expected.goal());
    assert_eq!(actual.generation(), expected.generation());
    assert_eq!(actual.cells(), expected.cells());
}

#[test]
fn test_edits_wait_for_recompute() {
    let mut app = setup_app(InitialConfig::default());
    let before = grid(&app).cells().to_vec();

    app.world_mut().write_message(GridEditCommand::SetGoal(IVec2::new(0, 0)));
    run_ticks(&mut app, 3);

    assert_eq!(grid(&app).goal(), IVec2::new(0, 0));
    assert_eq!(grid(&app).generation(), 1);
    assert_eq!(grid(&app).cells(), before.as_slice());

    app.world_mut().write_message(RecomputeFlowField);
    run_ticks(&mut app, 1);
    assert_eq!(grid(&app).generation(), 2);
    assert_eq!(grid(&app).cell_at(0, 0).unwrap().cost_distance(), 0);
}

#[test]
fn test_recompute_requests_coalesce() {
    let mut app = setup_app(InitialConfig::default());

    for _ in 0..5 {
        app.world_mut().write_message(RecomputeFlowField);
    }
    run_ticks(&mut app, 1);

    assert_eq!(grid(&app).generation(), 2);
}

#[test]
fn test_out_of_bounds_edit_is_ignored() {
    let mut app = setup_app(InitialConfig::default());
    let obstacles = grid(&app).obstacle_count();

    app.world_mut().write_message(GridEditCommand::AddObstacle(IVec2::new(40, 2)));
    app.world_mut().write_message(GridEditCommand::SetStart(IVec2::new(-1, 0)));
    run_ticks(&mut app, 1);

    assert_eq!(grid(&app).obstacle_count(), obstacles);
    assert_eq!(grid(&app).start(), Some(IVec2::new(2, 2)));
}

#[test]
fn test_out_of_bounds_goal_keeps_previous_field() {
    let mut app = setup_app(InitialConfig::default());
    let before = grid(&app).cells().to_vec();

    app.world_mut().write_message(GridEditCommand::SetGoal(IVec2::new(25, 25)));
    app.world_mut().write_message(RecomputeFlowField);
    run_ticks(&mut app, 1);

    assert_eq!(grid(&app).generation(), 1);
    assert_eq!(grid(&app).cells(), before.as_slice());
}

#[test]
fn test_spawned_agents_converge_on_goal() {
    let config = InitialConfig {
        agents: vec![(2, 2), (17, 3), (3, 16), (18, 18)],
        ..default()
    };
    let mut app = setup_app(config);

    let center = {
        let grid = grid(&app);
        grid.cell_center(IVec2::new(16, 12))
    };
    let spawn = SpawnAgentCommand::at(center, app.world().resource::<SimConfig>());
    app.world_mut().write_message(spawn);

    run_ticks(&mut app, 2400);

    let goal = {
        let grid = grid(&app);
        grid.cell_center(grid.goal())
    };
    let cell_size: f32 = grid(&app).cell_size().to_num();

    let mut query = app.world_mut().query::<(&SimPosition, &SimVelocity, &FlowAgent)>();
    let mut count = 0;
    for (pos, vel, agent) in query.iter(app.world()) {
        count += 1;
        let distance: f32 = pos.0.distance(goal).to_num();
        assert!(distance < 1.5 * cell_size, "agent ended {} from goal", distance);
        assert!(vel.0.length() <= agent.max_speed + FixedNum::from_num(0.01));
    }
    assert_eq!(count, 5);
}

#[test]
fn test_moving_goal_redirects_agents() {
    let config = InitialConfig {
        agents: vec![(10, 10)],
        ..default()
    };
    let mut app = setup_app(config);

    app.world_mut().write_message(GridEditCommand::SetGoal(IVec2::new(18, 10)));
    app.world_mut().write_message(RecomputeFlowField);
    run_ticks(&mut app, 60);

    let positions = agent_positions(&mut app);
    let start_x: f32 = grid(&app).cell_center(IVec2::new(10, 10)).x.to_num();
    assert!(positions[0].0 > start_x, "agent should head east, at {:?}", positions[0]);

    let mut headings = app.world_mut().query_filtered::<&SimHeading, With<FlowAgent>>();
    let heading = headings.single(app.world()).unwrap().0;
    assert!(heading.abs() < 1e-3, "heading should face east, got {}", heading);
}

#[test]
fn test_demo_ticks_request_exit() {
    let config = InitialConfig {
        demo_ticks: 30,
        ..default()
    };
    let mut app = setup_app(config);

    run_ticks(&mut app, 29);
    assert!(app.should_exit().is_none());

    run_ticks(&mut app, 1);
    assert_eq!(app.world().resource::<SimTick>().0, 30);
    assert_eq!(app.should_exit(), Some(AppExit::Success));
}

#[test]
fn test_invalid_config_falls_back_to_default_grid() {
    let config = InitialConfig {
        grid_width: 0,
        ..default()
    };
    let app = setup_app(config);

    assert_eq!(grid(&app).width(), InitialConfig::default().grid_width);
}

#[test]
fn test_non_finite_config_values_fall_back() {
    let config = InitialConfig {
        cell_size: f32::INFINITY,
        tick_rate: 1e-30,
        agent_max_speed: f32::NAN,
        ..default()
    };
    let mut app = setup_app(config);

    let defaults = InitialConfig::default();
    let cell_size: f32 = grid(&app).cell_size().to_num();
    assert_eq!(cell_size, defaults.cell_size);
    assert_eq!(grid(&app).generation(), 1);

    let sim = app.world().resource::<SimConfig>().clone();
    assert_eq!(sim.tick_rate, SimConfig::default().tick_rate);
    assert_eq!(sim.max_speed, SimConfig::default().max_speed);

    run_ticks(&mut app, 10);
    assert_eq!(app.world().resource::<SimTick>().0, 10);
}
