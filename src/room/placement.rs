//! # Placement Engine
//!
//! Single-entity place, remove and move operations plus random empty-cell
//! selection. Every operation either fully applies or leaves the room
//! untouched.

use super::{CellType, EntityId, Placeable, PlaceableEntity, Position, Room};
use crate::{RoomError, RoomResult};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

impl Room {
    /// Places an entity at its own position.
    ///
    /// In a gridded room the position must be in bounds and the cell empty.
    /// Gridless rooms skip both checks and accept the entity as is.
    ///
    /// # Examples
    ///
    /// ```
    /// use encounter_room::{LightLevel, Monster, Position, Room};
    ///
    /// let mut room = Room::new(5, 5, LightLevel::Bright, true).unwrap();
    /// let goblin = Monster::new("goblin", "Goblin", 0.25, 50).at(Position::new(1, 1));
    /// let id = room.place_entity(goblin).unwrap();
    /// assert_eq!(room.entity_at(Position::new(1, 1)), Some(id));
    /// ```
    pub fn place_entity(&mut self, entity: impl Into<PlaceableEntity>) -> RoomResult<EntityId> {
        let entity = entity.into();
        let id = entity.id();
        let position = entity.position();
        let cell_type = entity.cell_type();

        if self.contains_id(id) {
            return Err(RoomError::DuplicateEntity(id));
        }
        if let PlaceableEntity::Npc(npc) = &entity {
            let mut carried = HashSet::from([id]);
            for item in &npc.inventory {
                if !carried.insert(item.id) || self.contains_id(item.id) {
                    return Err(RoomError::DuplicateEntity(item.id));
                }
            }
        }

        if let Some(grid) = &self.grid {
            let cell = grid.get(position).ok_or(RoomError::InvalidPosition {
                position,
                width: self.width,
                height: self.height,
            })?;
            if let Some(occupant) = cell.entity_id {
                return Err(RoomError::CellOccupied { position, occupant });
            }
        }

        if let Some(grid) = &mut self.grid {
            grid.occupy(position, cell_type, id);
        }
        debug!("Placed {:?} {} '{}' at {}", cell_type, id, entity.name(), position);
        self.push(entity);

        Ok(id)
    }

    /// Removes an entity of the given type and returns it.
    ///
    /// Returns `None` when no such entity is stored; absence is not an error.
    pub fn take_entity(&mut self, id: EntityId, cell_type: CellType) -> Option<PlaceableEntity> {
        let index = self.index_of(cell_type, id)?;
        let position = self.position_at(cell_type, index)?;

        if let Some(grid) = &mut self.grid {
            if grid.get(position).and_then(|cell| cell.entity_id) == Some(id) {
                grid.clear(position);
            }
        }

        let removed = self.remove_at(cell_type, index);
        debug!("Removed {:?} {} from {}", cell_type, id, position);
        removed
    }

    /// Removes an entity of the given type. Returns whether anything was removed.
    pub fn remove_entity(&mut self, id: EntityId, cell_type: CellType) -> bool {
        self.take_entity(id, cell_type).is_some()
    }

    /// Moves a stored entity, looked up by id, to a new position.
    ///
    /// Bounds are checked in every room; occupancy only in gridded rooms.
    /// Moving onto the entity's own cell is allowed. On error nothing changes.
    pub fn move_entity(&mut self, id: EntityId, new_position: Position) -> RoomResult<()> {
        let cell_type = self
            .find_entity(id)
            .map(|entity| entity.cell_type())
            .ok_or(RoomError::EntityNotFound(id))?;
        self.move_typed(id, cell_type, new_position)
    }

    /// Moves the stored copy of `entity` to a new position.
    pub fn move_placeable(
        &mut self,
        entity: &dyn Placeable,
        new_position: Position,
    ) -> RoomResult<()> {
        self.move_typed(entity.id(), entity.cell_type(), new_position)
    }

    fn move_typed(
        &mut self,
        id: EntityId,
        cell_type: CellType,
        new_position: Position,
    ) -> RoomResult<()> {
        let index = self
            .index_of(cell_type, id)
            .ok_or(RoomError::EntityNotFound(id))?;
        let old_position = self
            .position_at(cell_type, index)
            .ok_or(RoomError::EntityNotFound(id))?;

        if !self.in_bounds(new_position) {
            return Err(RoomError::InvalidPosition {
                position: new_position,
                width: self.width,
                height: self.height,
            });
        }

        if let Some(grid) = &mut self.grid {
            match grid.get(new_position).and_then(|cell| cell.entity_id) {
                Some(occupant) if occupant != id => {
                    return Err(RoomError::CellOccupied {
                        position: new_position,
                        occupant,
                    });
                }
                _ => {}
            }
            if grid.get(old_position).and_then(|cell| cell.entity_id) == Some(id) {
                grid.clear(old_position);
            }
            grid.occupy(new_position, cell_type, id);
        }

        self.set_position_at(cell_type, index, new_position);
        debug!("Moved {:?} {} from {} to {}", cell_type, id, old_position, new_position);
        Ok(())
    }

    /// Picks a random position for a new entity.
    ///
    /// Gridded rooms choose uniformly among empty cells and fail with
    /// `NoEmptyPositions` when there are none. Gridless rooms return any
    /// position inside the rectangle with no emptiness guarantee.
    pub fn find_empty_position<R: Rng + ?Sized>(&self, rng: &mut R) -> RoomResult<Position> {
        match &self.grid {
            Some(grid) => grid
                .empty_positions()
                .choose(rng)
                .copied()
                .ok_or(RoomError::NoEmptyPositions),
            None => Ok(Position::new(
                rng.gen_range(0..self.width as i32),
                rng.gen_range(0..self.height as i32),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Item, LightLevel, Monster, Npc, Obstacle, Player};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gridded(width: u32, height: u32) -> Room {
        Room::new(width, height, LightLevel::Bright, true).unwrap()
    }

    fn gridless(width: u32, height: u32) -> Room {
        Room::new(width, height, LightLevel::Bright, false).unwrap()
    }

    fn goblin_at(x: i32, y: i32) -> Monster {
        Monster::new("goblin", "Goblin", 0.25, 50).at(Position::new(x, y))
    }

    #[test]
    fn test_place_writes_grid_and_collection() {
        let mut room = gridded(5, 5);
        let id = room.place_entity(goblin_at(2, 3)).unwrap();

        assert_eq!(room.monsters().len(), 1);
        assert_eq!(room.monsters()[0].id, id);
        let cell = room.cell(Position::new(2, 3)).unwrap();
        assert_eq!(cell.cell_type, CellType::Monster);
        assert_eq!(cell.entity_id, Some(id));
        room.verify_grid_consistency().unwrap();
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut room = gridded(5, 5);
        for (x, y) in [(5, 0), (0, 5), (-1, 2), (2, -1)] {
            let result = room.place_entity(goblin_at(x, y));
            assert!(matches!(result, Err(RoomError::InvalidPosition { .. })));
        }
        assert_eq!(room.entity_count(), 0);
    }

    #[test]
    fn test_place_on_occupied_cell() {
        let mut room = gridded(5, 5);
        let first = room.place_entity(goblin_at(1, 1)).unwrap();
        let chest = Item::new("chest", "Chest", "container").at(Position::new(1, 1));

        match room.place_entity(chest) {
            Err(RoomError::CellOccupied { position, occupant }) => {
                assert_eq!(position, Position::new(1, 1));
                assert_eq!(occupant, first);
            }
            other => panic!("expected CellOccupied, got {:?}", other),
        }
        assert!(room.items().is_empty());
        room.verify_grid_consistency().unwrap();
    }

    #[test]
    fn test_place_duplicate_id() {
        let mut room = gridless(5, 5);
        let goblin = goblin_at(1, 1);
        room.place_entity(goblin.clone()).unwrap();
        assert!(matches!(
            room.place_entity(goblin.at(Position::new(2, 2))),
            Err(RoomError::DuplicateEntity(_))
        ));
        assert_eq!(room.monsters().len(), 1);
    }

    #[test]
    fn test_gridless_allows_stacking() {
        let mut room = gridless(5, 5);
        room.place_entity(goblin_at(1, 1)).unwrap();
        room.place_entity(Player::new("Aria", 3).at(Position::new(1, 1)))
            .unwrap();
        // Out-of-bounds positions are accepted too
        room.place_entity(Obstacle::new("pillar", "Pillar").at(Position::new(40, 40)))
            .unwrap();

        assert_eq!(room.entity_count(), 3);
    }

    #[test]
    fn test_place_then_remove_round_trip() {
        let mut room = gridded(5, 5);
        let keeper = room
            .place_entity(Npc::new("keeper", "Keeper").at(Position::new(0, 0)))
            .unwrap();
        let id = room.place_entity(goblin_at(3, 3)).unwrap();

        assert!(room.remove_entity(id, CellType::Monster));
        assert!(room.cell(Position::new(3, 3)).unwrap().is_empty());
        assert_eq!(room.entity_at(Position::new(0, 0)), Some(keeper));
        assert_eq!(room.npcs()[0].position, Position::new(0, 0));
        room.verify_grid_consistency().unwrap();
    }

    #[test]
    fn test_remove_missing_is_not_an_error() {
        let mut room = gridded(5, 5);
        let id = room.place_entity(goblin_at(3, 3)).unwrap();

        assert!(!room.remove_entity(crate::new_entity_id(), CellType::Monster));
        // Wrong collection
        assert!(!room.remove_entity(id, CellType::Item));
        assert_eq!(room.monsters().len(), 1);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut room = gridded(5, 5);
        let a = room.place_entity(goblin_at(0, 0)).unwrap();
        let b = room.place_entity(goblin_at(1, 0)).unwrap();
        let c = room.place_entity(goblin_at(2, 0)).unwrap();

        let taken = room.take_entity(b, CellType::Monster).unwrap();
        assert_eq!(taken.id(), b);
        assert_eq!(room.ids_of(CellType::Monster), vec![a, c]);
    }

    #[test]
    fn test_move_updates_grid_and_position() {
        let mut room = gridded(5, 5);
        let id = room.place_entity(goblin_at(0, 0)).unwrap();

        room.move_entity(id, Position::new(4, 4)).unwrap();
        assert!(room.cell(Position::new(0, 0)).unwrap().is_empty());
        assert_eq!(room.entity_at(Position::new(4, 4)), Some(id));
        assert_eq!(room.monsters()[0].position, Position::new(4, 4));
        room.verify_grid_consistency().unwrap();
    }

    #[test]
    fn test_move_onto_own_cell() {
        let mut room = gridded(5, 5);
        let id = room.place_entity(goblin_at(2, 2)).unwrap();
        room.move_entity(id, Position::new(2, 2)).unwrap();
        assert_eq!(room.entity_at(Position::new(2, 2)), Some(id));
        room.verify_grid_consistency().unwrap();
    }

    #[test]
    fn test_move_rejected_when_occupied() {
        let mut room = gridded(5, 5);
        let mover = room.place_entity(goblin_at(0, 0)).unwrap();
        let blocker = room
            .place_entity(Obstacle::new("boulder", "Boulder").at(Position::new(1, 0)))
            .unwrap();

        let result = room.move_entity(mover, Position::new(1, 0));
        assert!(matches!(
            result,
            Err(RoomError::CellOccupied { occupant, .. }) if occupant == blocker
        ));
        assert_eq!(room.monsters()[0].position, Position::new(0, 0));
        assert_eq!(room.obstacles()[0].position, Position::new(1, 0));
        assert_eq!(room.entity_at(Position::new(0, 0)), Some(mover));
        room.verify_grid_consistency().unwrap();
    }

    #[test]
    fn test_move_errors() {
        let mut room = gridded(5, 5);
        let id = room.place_entity(goblin_at(0, 0)).unwrap();

        assert!(matches!(
            room.move_entity(crate::new_entity_id(), Position::new(1, 1)),
            Err(RoomError::EntityNotFound(_))
        ));
        assert!(matches!(
            room.move_entity(id, Position::new(5, 1)),
            Err(RoomError::InvalidPosition { .. })
        ));
        assert_eq!(room.monsters()[0].position, Position::new(0, 0));
    }

    #[test]
    fn test_move_in_gridless_room() {
        let mut room = gridless(5, 5);
        let a = room.place_entity(goblin_at(0, 0)).unwrap();
        room.place_entity(goblin_at(3, 3)).unwrap();

        room.move_entity(a, Position::new(3, 3)).unwrap();
        assert_eq!(room.monsters()[0].position, Position::new(3, 3));
        assert!(room.move_entity(a, Position::new(9, 9)).is_err());
    }

    #[test]
    fn test_move_placeable_uses_entity_identity() {
        let mut room = gridded(5, 5);
        let player = Player::new("Brom", 2).at(Position::new(1, 1));
        room.place_entity(player.clone()).unwrap();

        room.move_placeable(&player, Position::new(2, 1)).unwrap();
        assert_eq!(room.players()[0].position, Position::new(2, 1));
        // The caller's copy is a value, not a handle
        assert_eq!(player.position, Position::new(1, 1));
    }

    #[test]
    fn test_find_empty_position_avoids_occupied() {
        let mut room = gridded(2, 2);
        room.place_entity(goblin_at(0, 0)).unwrap();
        room.place_entity(goblin_at(1, 0)).unwrap();
        room.place_entity(goblin_at(0, 1)).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(room.find_empty_position(&mut rng).unwrap(), Position::new(1, 1));
        }
    }

    #[test]
    fn test_find_empty_position_exhausted() {
        let mut room = gridded(2, 2);
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            room.place_entity(goblin_at(x, y)).unwrap();
        }
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            room.find_empty_position(&mut rng),
            Err(RoomError::NoEmptyPositions)
        ));
    }

    #[test]
    fn test_find_empty_position_gridless_stays_in_bounds() {
        let room = gridless(3, 7);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            let pos = room.find_empty_position(&mut rng).unwrap();
            assert!(room.in_bounds(pos));
        }
    }

    #[test]
    fn test_find_empty_position_is_seeded() {
        let room = gridded(10, 10);
        let a = room.find_empty_position(&mut StdRng::seed_from_u64(5)).unwrap();
        let b = room.find_empty_position(&mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }
}
