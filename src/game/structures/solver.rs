//! Wavefront field generation for [`Grid`].

use bevy::prelude::*;
use std::collections::VecDeque;

use crate::game::fixed_math::{FixedNum, FixedVec2};

use super::cell::{COST_IMPASSABLE, COST_UNVISITED, INTEGRATION_HOP_WEIGHT};
use super::error::FlowFieldError;
use super::grid::Grid;

/// Summary of a completed recompute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldStats {
    pub goal: IVec2,
    pub reachable: usize,
    pub unreachable: usize,
    pub impassable: usize,
    /// Largest hop count in the field, 0 when only the goal is reachable.
    pub max_cost: i32,
    pub generation: u64,
}

impl Grid {
    /// Rebuilds the cost, integration and vector fields for the current goal
    /// and obstacle set. Every cell's three fields are overwritten.
    ///
    /// Fails with [`FlowFieldError::GoalOutOfBounds`] and leaves the previous
    /// field in place when the goal is not on the grid. A goal on an obstacle
    /// is not an error: the result is a field where nothing is reachable.
    pub fn calculate_flow_field(&mut self) -> Result<FieldStats, FlowFieldError> {
        let goal_idx = self.index_of(self.goal).ok_or(FlowFieldError::GoalOutOfBounds {
            goal: self.goal,
            width: self.width(),
            height: self.height(),
        })?;

        self.generate_cost_field(goal_idx);
        self.generate_integration_field(goal_idx);
        self.generate_vector_field();
        self.generation += 1;

        Ok(self.field_stats())
    }

    /// Phase 1: exact 4-connected hop count from the goal.
    fn generate_cost_field(&mut self, goal_idx: usize) {
        for (idx, cell) in self.cells.iter_mut().enumerate() {
            cell.reset();
            if self.obstacles.contains(idx) {
                cell.cost_distance = COST_IMPASSABLE;
            }
        }

        if self.cells[goal_idx].is_impassable() {
            return;
        }
        self.cells[goal_idx].cost_distance = 0;

        let mut queue = VecDeque::new();
        queue.push_back(goal_idx);

        while let Some(idx) = queue.pop_front() {
            let current = self.cells[idx].cost_distance;
            let coord = self.cells[idx].coordinate();

            for n in self.neighbors_of(coord, false) {
                let n_idx = self.get_index(n);
                let neighbor = &mut self.cells[n_idx];
                if neighbor.cost_distance == COST_UNVISITED {
                    neighbor.cost_distance = current + 1;
                    queue.push_back(n_idx);
                }
            }
        }
    }

    /// Phase 2: 8-connected flood assigning `hops * K + distance` once per cell.
    ///
    /// Distance is between cell centres in grid units, so the hop weight
    /// dominates regardless of cell size.
    fn generate_integration_field(&mut self, goal_idx: usize) {
        if !self.cells[goal_idx].is_routable() {
            return;
        }

        let goal = FixedVec2::from_ivec2(self.goal);
        let hop_weight = FixedNum::from_num(INTEGRATION_HOP_WEIGHT);
        self.cells[goal_idx].integration_value = FixedNum::ZERO;

        let mut queue = VecDeque::new();
        queue.push_back(goal_idx);

        while let Some(idx) = queue.pop_front() {
            let coord = self.cells[idx].coordinate();

            for n in self.neighbors_of(coord, true) {
                let n_idx = self.get_index(n);
                let neighbor = &mut self.cells[n_idx];
                if !neighbor.is_routable() || neighbor.has_integration_value() {
                    continue;
                }

                let distance = FixedVec2::from_ivec2(n).distance(goal);
                neighbor.integration_value =
                    FixedNum::from_num(neighbor.cost_distance) * hop_weight + distance;
                queue.push_back(n_idx);
            }
        }
    }

    /// Phase 3: point every routable, non-goal cell at its lowest-valued
    /// routable neighbour. The first neighbour in enumeration order wins ties.
    fn generate_vector_field(&mut self) {
        for idx in 0..self.cells.len() {
            let cell = &self.cells[idx];
            if !cell.is_routable() || cell.is_goal() {
                continue;
            }
            let coord = cell.coordinate();

            let mut best: Option<(FixedNum, IVec2)> = None;
            for n in self.neighbors_of(coord, true) {
                let neighbor = &self.cells[self.get_index(n)];
                if !neighbor.is_routable() {
                    continue;
                }
                let value = neighbor.integration_value();
                if best.is_none_or(|(best_value, _)| value < best_value) {
                    best = Some((value, n));
                }
            }

            if let Some((_, target)) = best {
                let direction = self.direction_between(coord, target);
                self.cells[idx].flow_direction = direction;
            }
        }
    }

    pub fn field_stats(&self) -> FieldStats {
        let mut stats = FieldStats {
            goal: self.goal,
            reachable: 0,
            unreachable: 0,
            impassable: 0,
            max_cost: 0,
            generation: self.generation,
        };

        for cell in &self.cells {
            if cell.is_routable() {
                stats.reachable += 1;
                stats.max_cost = stats.max_cost.max(cell.cost_distance());
            } else if cell.is_impassable() {
                stats.impassable += 1;
            } else {
                stats.unreachable += 1;
            }
        }

        stats
    }
}
