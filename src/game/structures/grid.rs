use bevy::prelude::*;
use fixedbitset::FixedBitSet;
use smallvec::SmallVec;

use crate::game::fixed_math::{FixedNum, FixedVec2};

use super::cell::Cell;
use super::direction;
use super::error::FlowFieldError;

/// Goal-directed navigation grid.
///
/// Owns every [`Cell`] in a dense row-major arena (`index = x + width * y`),
/// the obstacle set and the goal coordinate. All cross references (neighbours,
/// paths, goal, start) are plain grid coordinates.
///
/// # Recompute
///
/// Mutators only record edits. The field is rebuilt by an explicit call to
/// [`Grid::calculate_flow_field`], which runs three phases in order:
///
/// 1. **Cost field:** 4-connected BFS hop count from the goal
/// 2. **Integration field:** `hops * 100 + distance to goal`, 8-connected flood
/// 3. **Vector field:** each cell points at its lowest-valued routable neighbour
///
/// # Coordinates
///
/// Cell `(x, y)` covers world `[x * cell_size, (x + 1) * cell_size)` and its
/// centre sits half a cell from that corner. World positions convert to grid
/// space with `(world - cell_size / 2) / cell_size`, so a cell centre maps to
/// exactly its integer coordinate.
///
/// # Example
///
/// ```rust,ignore
/// let mut grid = Grid::new(20, 20, FixedNum::from_num(60), [IVec2::new(5, 10)])?;
/// grid.set_goal(IVec2::new(10, 10));
/// grid.add_obstacle(3, 4)?;
/// let stats = grid.calculate_flow_field()?;
///
/// let dir = grid.cell_at(2, 2).map(|c| c.flow_direction());
/// ```
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cell_size: FixedNum,
    pub(super) cells: Vec<Cell>,
    pub(super) goal: IVec2,
    start: Option<IVec2>,
    pub(super) obstacles: FixedBitSet,
    pub(super) generation: u64,
}

impl Grid {
    pub fn new(
        width: usize,
        height: usize,
        cell_size: FixedNum,
        initial_obstacles: impl IntoIterator<Item = IVec2>,
    ) -> Result<Self, FlowFieldError> {
        // Coordinates are i32.
        let max_side = i32::MAX as usize;
        if width == 0 || height == 0 || width > max_side || height > max_side {
            return Err(FlowFieldError::InvalidDimensions { width, height });
        }
        if cell_size <= FixedNum::ZERO {
            return Err(FlowFieldError::InvalidCellSize);
        }
        // The far corner, one cell past the edge, must be representable.
        let span = FixedNum::checked_from_num(width.max(height) + 1)
            .and_then(|cells| cells.checked_mul(cell_size));
        if span.is_none() {
            return Err(FlowFieldError::InvalidCellSize);
        }

        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(IVec2::new(x as i32, y as i32)));
            }
        }

        let mut grid = Self {
            width,
            height,
            cell_size,
            cells,
            goal: IVec2::ZERO,
            start: None,
            obstacles: FixedBitSet::with_capacity(width * height),
            generation: 0,
        };

        for coord in initial_obstacles {
            grid.add_obstacle(coord.x, coord.y)?;
        }

        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> FixedNum {
        self.cell_size
    }

    /// Number of completed recomputes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, coord: IVec2) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Arena index of an in-bounds coordinate.
    pub(super) fn get_index(&self, coord: IVec2) -> usize {
        coord.x as usize + self.width * coord.y as usize
    }

    pub fn index_of(&self, coord: IVec2) -> Option<usize> {
        self.contains(coord).then(|| self.get_index(coord))
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    /// Cell at `(x, y)`, or `None` anywhere outside the grid.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        self.cell(IVec2::new(x, y))
    }

    pub fn cell(&self, coord: IVec2) -> Option<&Cell> {
        self.index_of(coord).map(|idx| &self.cells[idx])
    }

    pub fn cell_at_position(&self, world_pos: FixedVec2) -> Option<&Cell> {
        self.cell(self.grid_coordinate_of(world_pos))
    }

    /// Every cell in arena order, for overlays and diagnostics.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    // ------------------------------------------------------------------------
    // Coordinate conversion
    // ------------------------------------------------------------------------

    /// Fractional grid coordinates of a world position. Cell centres map to
    /// whole numbers.
    pub fn grid_position_of(&self, world_pos: FixedVec2) -> FixedVec2 {
        let half = self.cell_size / FixedNum::from_num(2);
        let axis = |w: FixedNum| w.saturating_sub(half).saturating_div(self.cell_size);
        FixedVec2::new(axis(world_pos.x), axis(world_pos.y))
    }

    /// Grid coordinate of a world position. May be out of bounds.
    pub fn grid_coordinate_of(&self, world_pos: FixedVec2) -> IVec2 {
        self.grid_position_of(world_pos).floor_to_ivec2()
    }

    /// World position of a cell's centre.
    pub fn cell_center(&self, coord: IVec2) -> FixedVec2 {
        let half = self.cell_size / FixedNum::from_num(2);
        FixedVec2::from_ivec2(coord) * self.cell_size + FixedVec2::new(half, half)
    }

    /// Unit vector from one cell centre to another.
    pub fn direction_between(&self, from: IVec2, to: IVec2) -> FixedVec2 {
        (self.cell_center(to) - self.cell_center(from)).normalize()
    }

    /// In-grid neighbours of `coord`: the cardinals, then the diagonals when
    /// requested, in the order of [`direction::ALL_EIGHT`].
    pub fn neighbors_of(&self, coord: IVec2, include_diagonals: bool) -> SmallVec<[IVec2; 8]> {
        direction::offsets(include_diagonals)
            .iter()
            .map(|&offset| coord + offset)
            .filter(|&n| self.contains(n))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Mutators (none of these recompute the field)
    // ------------------------------------------------------------------------

    pub fn goal(&self) -> IVec2 {
        self.goal
    }

    /// Accepts any coordinate; an out-of-bounds goal is rejected at recompute.
    pub fn set_goal(&mut self, goal: IVec2) {
        self.goal = goal;
    }

    pub fn start(&self) -> Option<IVec2> {
        self.start
    }

    pub fn set_start(&mut self, start: IVec2) -> Result<(), FlowFieldError> {
        self.check_bounds(start)?;
        self.start = Some(start);
        Ok(())
    }

    pub fn clear_start(&mut self) {
        self.start = None;
    }

    pub fn is_obstacle(&self, coord: IVec2) -> bool {
        self.index_of(coord).is_some_and(|idx| self.obstacles.contains(idx))
    }

    /// Marks `(x, y)` impassable. Returns `true` if it was not an obstacle before.
    pub fn add_obstacle(&mut self, x: i32, y: i32) -> Result<bool, FlowFieldError> {
        let idx = self.check_bounds(IVec2::new(x, y))?;
        let added = !self.obstacles.contains(idx);
        self.obstacles.insert(idx);
        Ok(added)
    }

    /// Clears `(x, y)`. Returns `true` if it was an obstacle.
    pub fn remove_obstacle(&mut self, x: i32, y: i32) -> Result<bool, FlowFieldError> {
        let idx = self.check_bounds(IVec2::new(x, y))?;
        let removed = self.obstacles.contains(idx);
        self.obstacles.set(idx, false);
        Ok(removed)
    }

    /// Flips `(x, y)`. Returns whether the cell is an obstacle afterwards.
    pub fn toggle_obstacle(&mut self, x: i32, y: i32) -> Result<bool, FlowFieldError> {
        let idx = self.check_bounds(IVec2::new(x, y))?;
        self.obstacles.toggle(idx);
        Ok(self.obstacles.contains(idx))
    }

    /// Obstacle coordinates in arena order.
    pub fn obstacles(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.obstacles.ones().map(|idx| self.cells[idx].coordinate())
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.count_ones(..)
    }

    fn check_bounds(&self, coord: IVec2) -> Result<usize, FlowFieldError> {
        self.index_of(coord).ok_or(FlowFieldError::CellOutOfBounds {
            coord,
            width: self.width,
            height: self.height,
        })
    }
}
