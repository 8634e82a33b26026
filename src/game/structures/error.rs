//! Error types for grid construction, mutation and recompute.

use bevy::prelude::IVec2;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FlowFieldError {
    /// Recompute was requested while the goal lies outside the grid.
    GoalOutOfBounds {
        goal: IVec2,
        width: usize,
        height: usize,
    },
    /// A mutator addressed a coordinate outside the grid.
    CellOutOfBounds {
        coord: IVec2,
        width: usize,
        height: usize,
    },
    /// Width or height was zero or too large for `i32` coordinates.
    InvalidDimensions { width: usize, height: usize },
    /// Cell size was not positive, not a finite number, or too large for the
    /// grid's world extent to be representable.
    InvalidCellSize,
}

impl fmt::Display for FlowFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoalOutOfBounds { goal, width, height } => write!(
                f,
                "goal ({}, {}) is outside the {}x{} grid",
                goal.x, goal.y, width, height
            ),
            Self::CellOutOfBounds { coord, width, height } => write!(
                f,
                "cell ({}, {}) is outside the {}x{} grid",
                coord.x, coord.y, width, height
            ),
            Self::InvalidDimensions { width, height } => {
                write!(f, "grid dimensions must be positive, got {}x{}", width, height)
            }
            Self::InvalidCellSize => {
                write!(f, "cell size must be positive and keep the grid in range")
            }
        }
    }
}

impl std::error::Error for FlowFieldError {}
