//! # Room Module
//!
//! Room state, entity collections and the placement engine.
//!
//! This module contains the fundamental building blocks of an encounter room:
//! - Positions, cells and the optional occupancy grid
//! - Entity types and the `Placeable` capability shared by all of them
//! - The `Room` aggregate and its placement, batch and cleanup operations
//! - NPC inventory management

pub mod batch;
pub mod cleanup;
pub mod entities;
pub mod grid;
pub mod inventory;
pub mod placement;
pub mod state;

pub use batch::*;
pub use cleanup::*;
pub use entities::*;
pub use grid::*;
pub use state::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a 2D coordinate inside a room.
///
/// Positions carry no bounds of their own; whether a position is valid
/// depends on the room it is used with.
///
/// # Examples
///
/// ```
/// use encounter_room::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unique identifier for room entities.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

/// Unique identifier for rooms owned by the encounter service.
pub type RoomId = Uuid;

/// Kind of entity recorded in a grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    #[default]
    Empty,
    Monster,
    Item,
    Player,
    Npc,
    Obstacle,
}

/// One grid unit. Holds at most one entity's type and id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub cell_type: CellType,
    pub entity_id: Option<EntityId>,
}

impl Cell {
    /// An unoccupied cell.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A cell owned by the given entity.
    pub fn occupied(cell_type: CellType, entity_id: EntityId) -> Self {
        Self {
            cell_type,
            entity_id: Some(entity_id),
        }
    }

    /// Whether no entity owns this cell.
    pub fn is_empty(&self) -> bool {
        self.cell_type == CellType::Empty
    }
}

/// Ambient light in a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightLevel {
    #[default]
    Bright,
    Dim,
    Dark,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.x, 5);
        assert_eq!(pos.y, 10);
        assert_eq!(Position::origin(), Position::new(0, 0));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, -1).to_string(), "(3, -1)");
    }

    #[test]
    fn test_entity_id_uniqueness() {
        let id1 = new_entity_id();
        let id2 = new_entity_id();
        assert_ne!(id1, id2);
        assert!(!id1.is_nil());
    }

    #[test]
    fn test_cell_states() {
        let empty = Cell::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.entity_id, None);

        let id = new_entity_id();
        let cell = Cell::occupied(CellType::Monster, id);
        assert!(!cell.is_empty());
        assert_eq!(cell.entity_id, Some(id));
    }
}
