//! # Cleanup
//!
//! Bulk removal of one entity type with XP aggregation for monsters.

use super::{CellType, EntityId, Room};
use crate::{RoomError, RoomResult};
use log::debug;
use serde::Serialize;

/// Outcome of a cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Sum of monster XP over removed entities; 0 for other types
    pub total_xp: u32,
    /// Ids removed, in removal order
    pub removed: Vec<EntityId>,
    /// Requested ids that were not stored under the cell type
    pub not_removed: Vec<EntityId>,
}

impl Room {
    /// Removes entities of one type.
    ///
    /// An empty `ids` slice removes every entity of `cell_type`. Otherwise only
    /// the listed ids are removed and the ones not found are returned in
    /// `not_removed`. Grid cells are cleared exactly as by `remove_entity`.
    ///
    /// # Examples
    ///
    /// ```
    /// use encounter_room::{CellType, LightLevel, Monster, Position, Room};
    ///
    /// let mut room = Room::new(5, 5, LightLevel::Bright, true).unwrap();
    /// let goblin = Monster::new("goblin", "Goblin", 0.25, 50).at(Position::new(0, 0));
    /// room.place_entity(goblin).unwrap();
    /// room.place_entity(Monster::new("ogre", "Ogre", 2.0, 450).at(Position::new(1, 0))).unwrap();
    ///
    /// let report = room.cleanup(CellType::Monster, &[]).unwrap();
    /// assert_eq!(report.total_xp, 500);
    /// assert!(room.monsters().is_empty());
    /// ```
    pub fn cleanup(&mut self, cell_type: CellType, ids: &[EntityId]) -> RoomResult<CleanupReport> {
        if cell_type == CellType::Empty {
            return Err(RoomError::InvalidCellType(cell_type));
        }

        let targets = if ids.is_empty() {
            self.ids_of(cell_type)
        } else {
            ids.to_vec()
        };

        let mut report = CleanupReport::default();
        for id in targets {
            match self.take_entity(id, cell_type) {
                Some(entity) => {
                    report.total_xp = report.total_xp.saturating_add(entity.xp());
                    report.removed.push(id);
                }
                None => report.not_removed.push(id),
            }
        }

        debug!(
            "Cleanup of {:?}: removed {}, missing {}, xp {}",
            cell_type,
            report.removed.len(),
            report.not_removed.len(),
            report.total_xp
        );
        Ok(report)
    }
}
