//! # Room State
//!
//! The `Room` aggregate: dimensions, ambience, per-type entity collections and
//! the optional occupancy grid derived from them.
//!
//! The collections are the authoritative store. In a gridded room every stored
//! entity owns exactly the cell at its position, and every occupied cell points
//! back at a stored entity. Fields are private so that only the placement
//! operations in this module tree can break or restore that invariant.

use super::{
    CellType, EntityId, Grid, Item, LightLevel, Monster, Npc, Obstacle, Placeable,
    PlaceableEntity, Player, Position,
};
use crate::{RoomError, RoomResult};
use serde::Serialize;

/// Bounded rectangular container for encounter entities.
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) light_level: LightLevel,
    pub(crate) description: String,
    pub(crate) monsters: Vec<Monster>,
    pub(crate) players: Vec<Player>,
    pub(crate) items: Vec<Item>,
    pub(crate) npcs: Vec<Npc>,
    pub(crate) obstacles: Vec<Obstacle>,
    #[serde(skip)]
    pub(crate) grid: Option<Grid>,
}

impl Room {
    /// Creates an empty room.
    ///
    /// With `use_grid` the room tracks occupancy and rejects collisions;
    /// without it positions are advisory only.
    ///
    /// # Examples
    ///
    /// ```
    /// use encounter_room::{LightLevel, Room};
    ///
    /// let room = Room::new(10, 8, LightLevel::Dim, true).unwrap();
    /// assert_eq!(room.width(), 10);
    /// assert_eq!(room.height(), 8);
    /// assert!(room.is_gridded());
    ///
    /// assert!(Room::new(0, 8, LightLevel::Dim, true).is_err());
    /// ```
    pub fn new(
        width: u32,
        height: u32,
        light_level: LightLevel,
        use_grid: bool,
    ) -> RoomResult<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(RoomError::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            light_level,
            description: String::new(),
            monsters: Vec::new(),
            players: Vec::new(),
            items: Vec::new(),
            npcs: Vec::new(),
            obstacles: Vec::new(),
            grid: use_grid.then(|| Grid::new(width, height)),
        })
    }

    /// Sets the room description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn light_level(&self) -> LightLevel {
        self.light_level
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the room tracks occupancy.
    pub fn is_gridded(&self) -> bool {
        self.grid.is_some()
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Checks if a position lies inside the room rectangle.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Gets the grid cell at a position. Always `None` for gridless rooms.
    pub fn cell(&self, pos: Position) -> Option<&super::Cell> {
        self.grid.as_ref().and_then(|grid| grid.get(pos))
    }

    /// Gets the id of the entity owning a cell, if the room is gridded.
    pub fn entity_at(&self, pos: Position) -> Option<EntityId> {
        self.cell(pos).and_then(|cell| cell.entity_id)
    }

    /// Iterates over every stored entity, in collection order.
    pub fn placeables(&self) -> impl Iterator<Item = &dyn Placeable> {
        self.monsters
            .iter()
            .map(|m| m as &dyn Placeable)
            .chain(self.players.iter().map(|p| p as &dyn Placeable))
            .chain(self.items.iter().map(|i| i as &dyn Placeable))
            .chain(self.npcs.iter().map(|n| n as &dyn Placeable))
            .chain(self.obstacles.iter().map(|o| o as &dyn Placeable))
    }

    /// Finds a stored entity by id in any collection.
    pub fn find_entity(&self, id: EntityId) -> Option<&dyn Placeable> {
        self.placeables().find(|entity| entity.id() == id)
    }

    /// Whether an id is already used by a stored entity or by an item an
    /// NPC carries.
    pub fn contains_id(&self, id: EntityId) -> bool {
        self.find_entity(id).is_some()
            || self
                .npcs
                .iter()
                .flat_map(|npc| npc.inventory.iter())
                .any(|item| item.id == id)
    }

    /// Total number of stored entities.
    pub fn entity_count(&self) -> usize {
        self.monsters.len()
            + self.players.len()
            + self.items.len()
            + self.npcs.len()
            + self.obstacles.len()
    }

    /// Number of stored entities of one type.
    pub fn count_of(&self, cell_type: CellType) -> usize {
        match cell_type {
            CellType::Monster => self.monsters.len(),
            CellType::Player => self.players.len(),
            CellType::Item => self.items.len(),
            CellType::Npc => self.npcs.len(),
            CellType::Obstacle => self.obstacles.len(),
            CellType::Empty => 0,
        }
    }

    /// Ids of all stored entities of one type, in collection order.
    pub fn ids_of(&self, cell_type: CellType) -> Vec<EntityId> {
        self.placeables()
            .filter(|entity| entity.cell_type() == cell_type)
            .map(|entity| entity.id())
            .collect()
    }

    /// Checks that the grid and the collections agree.
    ///
    /// Returns `InvalidState` describing the first mismatch. Gridless rooms
    /// carry no invariant and always pass.
    pub fn verify_grid_consistency(&self) -> RoomResult<()> {
        let Some(grid) = &self.grid else {
            return Ok(());
        };

        let mut claimed = 0usize;
        for entity in self.placeables() {
            let pos = entity.position();
            match grid.get(pos) {
                Some(cell)
                    if cell.entity_id == Some(entity.id())
                        && cell.cell_type == entity.cell_type() =>
                {
                    claimed += 1;
                }
                Some(cell) => {
                    return Err(RoomError::InvalidState(format!(
                        "entity {} at {} but cell holds {:?}",
                        entity.id(),
                        pos,
                        cell
                    )));
                }
                None => {
                    return Err(RoomError::InvalidState(format!(
                        "entity {} stored out of bounds at {}",
                        entity.id(),
                        pos
                    )));
                }
            }
        }

        let occupied = grid.occupied_count();
        if occupied != claimed {
            return Err(RoomError::InvalidState(format!(
                "{} occupied cells but {} placed entities",
                occupied, claimed
            )));
        }

        Ok(())
    }

    pub(crate) fn index_of(&self, cell_type: CellType, id: EntityId) -> Option<usize> {
        match cell_type {
            CellType::Monster => self.monsters.iter().position(|m| m.id == id),
            CellType::Player => self.players.iter().position(|p| p.id == id),
            CellType::Item => self.items.iter().position(|i| i.id == id),
            CellType::Npc => self.npcs.iter().position(|n| n.id == id),
            CellType::Obstacle => self.obstacles.iter().position(|o| o.id == id),
            CellType::Empty => None,
        }
    }

    pub(crate) fn position_at(&self, cell_type: CellType, index: usize) -> Option<Position> {
        match cell_type {
            CellType::Monster => self.monsters.get(index).map(|m| m.position),
            CellType::Player => self.players.get(index).map(|p| p.position),
            CellType::Item => self.items.get(index).map(|i| i.position),
            CellType::Npc => self.npcs.get(index).map(|n| n.position),
            CellType::Obstacle => self.obstacles.get(index).map(|o| o.position),
            CellType::Empty => None,
        }
    }

    pub(crate) fn set_position_at(
        &mut self,
        cell_type: CellType,
        index: usize,
        position: Position,
    ) {
        let slot: Option<&mut dyn Placeable> = match cell_type {
            CellType::Monster => self.monsters.get_mut(index).map(|m| m as &mut dyn Placeable),
            CellType::Player => self.players.get_mut(index).map(|p| p as &mut dyn Placeable),
            CellType::Item => self.items.get_mut(index).map(|i| i as &mut dyn Placeable),
            CellType::Npc => self.npcs.get_mut(index).map(|n| n as &mut dyn Placeable),
            CellType::Obstacle => self.obstacles.get_mut(index).map(|o| o as &mut dyn Placeable),
            CellType::Empty => None,
        };
        if let Some(entity) = slot {
            entity.set_position(position);
        }
    }

    pub(crate) fn push(&mut self, entity: PlaceableEntity) {
        match entity {
            PlaceableEntity::Monster(m) => self.monsters.push(m),
            PlaceableEntity::Player(p) => self.players.push(p),
            PlaceableEntity::Item(i) => self.items.push(i),
            PlaceableEntity::Npc(n) => self.npcs.push(n),
            PlaceableEntity::Obstacle(o) => self.obstacles.push(o),
        }
    }

    /// Removes by index, preserving the order of the remaining entries.
    pub(crate) fn remove_at(
        &mut self,
        cell_type: CellType,
        index: usize,
    ) -> Option<PlaceableEntity> {
        match cell_type {
            CellType::Monster if index < self.monsters.len() => {
                Some(self.monsters.remove(index).into())
            }
            CellType::Player if index < self.players.len() => {
                Some(self.players.remove(index).into())
            }
            CellType::Item if index < self.items.len() => {
                Some(self.items.remove(index).into())
            }
            CellType::Npc if index < self.npcs.len() => Some(self.npcs.remove(index).into()),
            CellType::Obstacle if index < self.obstacles.len() => {
                Some(self.obstacles.remove(index).into())
            }
            _ => None,
        }
    }
}
