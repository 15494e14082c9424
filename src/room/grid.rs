//! # Occupancy Grid
//!
//! Row-major occupancy index for gridded rooms. The grid is derived from the
//! room's entity collections and is only ever written by the placement engine.

use super::{Cell, CellType, EntityId, Position};
use serde::Serialize;

/// Two-dimensional array of cells, `height` rows by `width` columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Creates an all-empty grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![Cell::empty(); width as usize]; height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Checks if a position lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Gets the cell at a position, or `None` when out of bounds.
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        if self.in_bounds(pos) {
            self.cells
                .get(pos.y as usize)
                .and_then(|row| row.get(pos.x as usize))
        } else {
            None
        }
    }

    fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if self.in_bounds(pos) {
            self.cells
                .get_mut(pos.y as usize)
                .and_then(|row| row.get_mut(pos.x as usize))
        } else {
            None
        }
    }

    /// Records an entity at a position. Out-of-bounds writes are ignored.
    pub(crate) fn occupy(&mut self, pos: Position, cell_type: CellType, entity_id: EntityId) {
        if let Some(cell) = self.get_mut(pos) {
            *cell = Cell::occupied(cell_type, entity_id);
        }
    }

    /// Resets a position to empty. Out-of-bounds writes are ignored.
    pub(crate) fn clear(&mut self, pos: Position) {
        if let Some(cell) = self.get_mut(pos) {
            *cell = Cell::empty();
        }
    }

    /// Iterates over every position and its cell in row-major order.
    pub fn enumerate(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, cell)| (Position::new(x as i32, y as i32), cell))
        })
    }

    /// Collects all empty positions in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.enumerate().filter(|(_, cell)| !cell.is_empty()).count()
    }
}
