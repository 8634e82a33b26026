//! Flow field core: the grid, its cells and the wavefront solver.
//!
//! Pure data and algorithms with no ECS dependencies beyond math types, so
//! the simulation layer, tests and external tools all drive the same code.

mod cell;
mod direction;
mod error;
mod grid;
mod path;
mod projection;
mod solver;

pub use cell::{
    integration_unvisited, Cell, COST_IMPASSABLE, COST_UNVISITED, INTEGRATION_HOP_WEIGHT,
};
pub use direction::ALL_EIGHT;
pub use error::FlowFieldError;
pub use grid::Grid;
pub use projection::{project_cells, CellKind, CellView};
pub use solver::FieldStats;
