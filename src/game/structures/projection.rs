//! Read-only view of the grid for renderers and debug overlays.
//!
//! The core never draws. Whatever displays the field (heatmap, arrows, cost
//! text) consumes these plain values instead of reaching into [`Grid`].

use bevy::prelude::*;
use serde::Serialize;

use super::grid::Grid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CellKind {
    Goal,
    Obstacle,
    Open,
    Unreachable,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellView {
    pub coordinate: IVec2,
    pub center: Vec2,
    pub kind: CellKind,
    pub cost_distance: i32,
    pub integration_value: f32,
    pub flow_direction: Vec2,
    /// 1.0 at the goal falling to 0.0 at the farthest reachable cell.
    /// Always 0.0 for obstacles and unreachable cells.
    pub heat: f32,
}

/// Snapshot of every cell in arena order.
pub fn project_cells(grid: &Grid) -> Vec<CellView> {
    let max_cost = grid
        .cells()
        .iter()
        .filter(|cell| cell.is_routable())
        .map(|cell| cell.cost_distance())
        .max()
        .unwrap_or(0);

    grid.cells()
        .iter()
        .map(|cell| {
            let coordinate = cell.coordinate();
            let kind = if grid.is_obstacle(coordinate) {
                CellKind::Obstacle
            } else if cell.is_goal() {
                CellKind::Goal
            } else if cell.is_routable() {
                CellKind::Open
            } else {
                CellKind::Unreachable
            };

            let heat = match kind {
                CellKind::Goal => 1.0,
                CellKind::Open if max_cost > 0 => {
                    (max_cost - cell.cost_distance()) as f32 / max_cost as f32
                }
                _ => 0.0,
            };

            CellView {
                coordinate,
                center: grid.cell_center(coordinate).to_vec2(),
                kind,
                cost_distance: cell.cost_distance(),
                integration_value: cell.integration_value().to_num(),
                flow_direction: cell.flow_direction().to_vec2(),
                heat,
            }
        })
        .collect()
}
