//! Discrete path tracing over a computed flow field.

use bevy::prelude::*;

use super::grid::Grid;

impl Grid {
    /// Follows stored flow directions from `start` until the goal.
    ///
    /// Each step moves to the neighbour whose direction from the current cell
    /// equals the current cell's flow direction exactly, so the trace agrees
    /// with the field the agents sample. The trace ends at the goal, at a cell
    /// with no direction, or after `width * height` steps. An out-of-grid start
    /// yields an empty path.
    pub fn trace_path(&self, start: IVec2) -> Vec<IVec2> {
        let Some(mut current) = self.cell(start) else {
            return Vec::new();
        };

        let mut path = vec![start];
        let max_steps = self.width() * self.height();

        while !current.is_goal() && path.len() <= max_steps {
            let direction = current.flow_direction();
            if direction.is_zero() {
                break;
            }

            let coord = current.coordinate();
            let next = self
                .neighbors_of(coord, true)
                .into_iter()
                .find(|&n| self.direction_between(coord, n) == direction)
                .and_then(|n| self.cell(n));

            match next {
                Some(cell) => {
                    path.push(cell.coordinate());
                    current = cell;
                }
                None => break,
            }
        }

        path
    }

    /// Path from the remembered start coordinate, empty if none is set.
    pub fn path_from_start(&self) -> Vec<IVec2> {
        self.start().map(|start| self.trace_path(start)).unwrap_or_default()
    }

    /// Whether following the field from `start` ends on the goal.
    pub fn reaches_goal(&self, start: IVec2) -> bool {
        self.trace_path(start)
            .last()
            .and_then(|&end| self.cell(end))
            .is_some_and(|cell| cell.is_goal())
    }
}
