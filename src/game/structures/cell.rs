use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::fixed_math::{FixedNum, FixedVec2};

/// Cost distance of a cell the wavefront has not reached (yet).
pub const COST_UNVISITED: i32 = -1;
/// Cost distance reserved for obstacle cells.
pub const COST_IMPASSABLE: i32 = i32::MAX;

/// Weight of one BFS hop in the integration field. Large enough that the
/// Euclidean term only breaks ties between equal hop counts.
pub const INTEGRATION_HOP_WEIGHT: i32 = 100;

/// Integration value of a cell not yet assigned by the integration phase.
pub fn integration_unvisited() -> FixedNum {
    FixedNum::from_num(-1)
}

/// Per-cell state of the flow field.
///
/// Cells never reference each other or the grid; neighbours are looked up by
/// coordinate through [`super::Grid`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    coordinate: IVec2,
    /// BFS hop count to the goal, [`COST_UNVISITED`] or [`COST_IMPASSABLE`].
    pub(crate) cost_distance: i32,
    /// `cost_distance * 100 + distance to goal`, or -1 when unvisited.
    pub(crate) integration_value: FixedNum,
    /// Unit vector toward the best neighbour, zero when there is none.
    pub(crate) flow_direction: FixedVec2,
}

impl Cell {
    pub fn new(coordinate: IVec2) -> Self {
        Self {
            coordinate,
            cost_distance: COST_UNVISITED,
            integration_value: integration_unvisited(),
            flow_direction: FixedVec2::ZERO,
        }
    }

    pub fn coordinate(&self) -> IVec2 {
        self.coordinate
    }

    pub fn cost_distance(&self) -> i32 {
        self.cost_distance
    }

    pub fn integration_value(&self) -> FixedNum {
        self.integration_value
    }

    pub fn flow_direction(&self) -> FixedVec2 {
        self.flow_direction
    }

    pub fn is_impassable(&self) -> bool {
        self.cost_distance == COST_IMPASSABLE
    }

    /// Reached by the cost wavefront and not an obstacle.
    ///
    /// Unreachable and impassable cells are both excluded from routing.
    pub fn is_routable(&self) -> bool {
        self.cost_distance != COST_UNVISITED && self.cost_distance != COST_IMPASSABLE
    }

    pub fn has_integration_value(&self) -> bool {
        self.integration_value >= FixedNum::ZERO
    }

    pub fn is_goal(&self) -> bool {
        self.cost_distance == 0
    }

    pub(crate) fn reset(&mut self) {
        self.cost_distance = COST_UNVISITED;
        self.integration_value = integration_unvisited();
        self.flow_direction = FixedVec2::ZERO;
    }
}
