//! # Batch Placement
//!
//! Places a mixed list of entities in one pass. Requests are bucketed by type
//! priority and each bucket is finished before the next one starts, so a
//! higher-priority entity always gets first claim on its requested cell.
//! An entity that loses a fixed-position conflict is displaced to a random
//! empty cell; once placed, nothing is moved again.

use super::{CellType, EntityId, Placeable, PlaceableEntity, Position, Room};
use crate::{RoomError, RoomResult};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Batch processing order, highest priority first.
pub const PLACEMENT_PRIORITY: [CellType; 5] = [
    CellType::Player,
    CellType::Monster,
    CellType::Npc,
    CellType::Obstacle,
    CellType::Item,
];

/// One placement request within a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceableConfig {
    pub entity: PlaceableEntity,
    /// Ignore `position` and pick a random empty cell
    pub random_place: bool,
    /// Requested cell when `random_place` is false
    pub position: Option<Position>,
}

impl PlaceableConfig {
    /// Requests placement at a random empty cell.
    pub fn random(entity: impl Into<PlaceableEntity>) -> Self {
        Self {
            entity: entity.into(),
            random_place: true,
            position: None,
        }
    }

    /// Requests placement at an exact cell.
    pub fn fixed(entity: impl Into<PlaceableEntity>, position: Position) -> Self {
        Self {
            entity: entity.into(),
            random_place: false,
            position: Some(position),
        }
    }

    fn validate(&self) -> RoomResult<()> {
        if !self.random_place && self.position.is_none() {
            return Err(RoomError::MalformedConfig(format!(
                "{:?} {} requests a fixed placement without a position",
                self.entity.cell_type(),
                self.entity.id()
            )));
        }
        Ok(())
    }
}

/// Outcome of a batch placement.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Ids placed, in processing order
    pub placed: Vec<EntityId>,
    /// Placed ids that did not get their requested cell
    pub displaced: Vec<EntityId>,
    /// Entities that could not be placed at all
    pub failed: Vec<(EntityId, RoomError)>,
}

impl BatchReport {
    /// Whether every request was placed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Whether a failed fixed placement should fall back to a random cell.
///
/// Conflicts and out-of-bounds requests degrade to random placement; anything
/// else is reported for that entity.
pub fn should_displace(error: &RoomError) -> bool {
    matches!(
        error,
        RoomError::CellOccupied { .. } | RoomError::InvalidPosition { .. }
    )
}

fn priority_rank(cell_type: CellType) -> usize {
    PLACEMENT_PRIORITY
        .iter()
        .position(|&t| t == cell_type)
        .unwrap_or(PLACEMENT_PRIORITY.len())
}

impl Room {
    /// Places a batch of entities, resolving same-cell conflicts by priority.
    ///
    /// The whole batch is validated before anything is placed; a malformed
    /// request aborts with `MalformedConfig` and leaves the room untouched.
    /// Per-entity failures never abort the batch and are listed in the report.
    pub fn add_placeables<R: Rng + ?Sized>(
        &mut self,
        configs: Vec<PlaceableConfig>,
        rng: &mut R,
    ) -> RoomResult<BatchReport> {
        for config in &configs {
            config.validate()?;
        }

        let mut buckets: Vec<Vec<PlaceableConfig>> = vec![Vec::new(); PLACEMENT_PRIORITY.len()];
        for config in configs {
            let rank = priority_rank(config.entity.cell_type());
            buckets[rank].push(config);
        }

        let mut report = BatchReport::default();
        for config in buckets.into_iter().flatten() {
            self.place_from_config(config, rng, &mut report);
        }

        debug!(
            "Batch placement: {} placed, {} displaced, {} failed",
            report.placed.len(),
            report.displaced.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn place_from_config<R: Rng + ?Sized>(
        &mut self,
        config: PlaceableConfig,
        rng: &mut R,
        report: &mut BatchReport,
    ) {
        let PlaceableConfig {
            mut entity,
            random_place,
            position,
        } = config;
        let id = entity.id();

        let result = match position.filter(|_| !random_place) {
            Some(requested) => {
                entity.set_position(requested);
                match self.place_entity(entity.clone()) {
                    Err(err) if should_displace(&err) => {
                        warn!(
                            "{:?} {} lost {} ({}), displacing",
                            entity.cell_type(),
                            id,
                            requested,
                            err
                        );
                        report.displaced.push(id);
                        self.place_randomly(entity, rng)
                    }
                    other => other,
                }
            }
            None => self.place_randomly(entity, rng),
        };

        match result {
            Ok(placed) => report.placed.push(placed),
            Err(err) => {
                warn!("Could not place {}: {}", id, err);
                report.displaced.retain(|&d| d != id);
                report.failed.push((id, err));
            }
        }
    }

    fn place_randomly<R: Rng + ?Sized>(
        &mut self,
        mut entity: PlaceableEntity,
        rng: &mut R,
    ) -> RoomResult<EntityId> {
        let position = self.find_empty_position(rng)?;
        entity.set_position(position);
        self.place_entity(entity)
    }
}
