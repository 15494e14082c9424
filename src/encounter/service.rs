//! # Encounter Service
//!
//! Owns rooms by id and turns encounter requests into populated rooms.
//!
//! The service is the single writer for its rooms: every mutation takes
//! `&mut self`, so concurrent callers must wrap the service in their own lock.
//! All randomness comes from one `StdRng` seeded from the configuration, which
//! makes a sequence of calls reproducible.

use super::{
    adjusted_xp, balance, EncounterConfig, EncounterRequest, ItemSource, MonsterGroup,
    MonsterSource, RoomSettings,
};
use crate::{
    new_entity_id, BatchReport, CellType, CleanupReport, EntityId, Placeable, PlaceableConfig,
    PlaceableEntity, Player, Position, Room, RoomError, RoomId, RoomResult,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

/// Summary of a `populate` call.
#[derive(Debug)]
pub struct PopulationReport {
    /// Monster groups after balancing
    pub monster_groups: Vec<MonsterGroup>,
    /// Party XP budget for the requested difficulty
    pub xp_budget: u32,
    /// Adjusted XP of the balanced groups
    pub adjusted_xp: u32,
    pub batch: BatchReport,
}

/// Outcome of defeating monsters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpAward {
    pub cleanup: CleanupReport,
    /// Share of the XP for each player in the room, rounded down
    pub xp_per_player: u32,
}

/// Coordinates content sources, the balancer and the rooms it owns.
pub struct EncounterService<S> {
    config: EncounterConfig,
    source: S,
    rooms: HashMap<RoomId, Room>,
    rng: StdRng,
}

impl<S> EncounterService<S>
where
    S: MonsterSource + ItemSource,
{
    /// Creates a service with no rooms.
    pub fn new(config: EncounterConfig, source: S) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            source,
            rooms: HashMap::new(),
            rng,
        }
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of rooms currently owned.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Creates a room and returns its id.
    pub fn create_room(&mut self, settings: &RoomSettings) -> RoomResult<RoomId> {
        let room = Room::new(
            settings.width,
            settings.height,
            settings.light_level,
            settings.use_grid,
        )?
        .with_description(settings.description.clone());
        let id = new_entity_id();
        info!(
            "Created {}x{} room {} ({})",
            settings.width,
            settings.height,
            id,
            if settings.use_grid { "gridded" } else { "gridless" }
        );
        self.rooms.insert(id, room);
        Ok(id)
    }

    /// Creates a room with the configured default settings.
    pub fn create_default_room(&mut self) -> RoomResult<RoomId> {
        let settings = self.config.room.clone();
        self.create_room(&settings)
    }

    pub fn room(&self, room_id: RoomId) -> RoomResult<&Room> {
        self.rooms.get(&room_id).ok_or(RoomError::RoomNotFound(room_id))
    }

    fn room_mut(&mut self, room_id: RoomId) -> RoomResult<&mut Room> {
        self.rooms
            .get_mut(&room_id)
            .ok_or(RoomError::RoomNotFound(room_id))
    }

    /// Drops a room and returns it.
    pub fn remove_room(&mut self, room_id: RoomId) -> Option<Room> {
        self.rooms.remove(&room_id)
    }

    /// Places one entity in a room.
    pub fn place(
        &mut self,
        room_id: RoomId,
        entity: impl Into<PlaceableEntity>,
    ) -> RoomResult<EntityId> {
        self.room_mut(room_id)?.place_entity(entity)
    }

    /// Places one entity at a random empty cell.
    pub fn place_randomly(
        &mut self,
        room_id: RoomId,
        entity: impl Into<PlaceableEntity>,
    ) -> RoomResult<EntityId> {
        let room = self.rooms.get_mut(&room_id).ok_or(RoomError::RoomNotFound(room_id))?;
        let mut entity = entity.into();
        entity.set_position(room.find_empty_position(&mut self.rng)?);
        room.place_entity(entity)
    }

    /// Moves an entity within a room.
    pub fn move_entity(&mut self, room_id: RoomId, id: EntityId, to: Position) -> RoomResult<()> {
        self.room_mut(room_id)?.move_entity(id, to)
    }

    /// Removes one entity. Absence is reported as `false`.
    pub fn remove(
        &mut self,
        room_id: RoomId,
        id: EntityId,
        cell_type: CellType,
    ) -> RoomResult<bool> {
        Ok(self.room_mut(room_id)?.remove_entity(id, cell_type))
    }

    /// Places a batch of entities in a room.
    pub fn add_placeables(
        &mut self,
        room_id: RoomId,
        configs: Vec<PlaceableConfig>,
    ) -> RoomResult<BatchReport> {
        let room = self.rooms.get_mut(&room_id).ok_or(RoomError::RoomNotFound(room_id))?;
        room.add_placeables(configs, &mut self.rng)
    }

    /// Removes entities of one type; see [`Room::cleanup`].
    pub fn cleanup(
        &mut self,
        room_id: RoomId,
        cell_type: CellType,
        ids: &[EntityId],
    ) -> RoomResult<CleanupReport> {
        self.room_mut(room_id)?.cleanup(cell_type, ids)
    }

    /// Removes defeated monsters and splits their XP among the room's players.
    ///
    /// An empty `ids` slice defeats every monster in the room.
    pub fn defeat_monsters(&mut self, room_id: RoomId, ids: &[EntityId]) -> RoomResult<XpAward> {
        let room = self.room_mut(room_id)?;
        let cleanup = room.cleanup(CellType::Monster, ids)?;
        let players = room.players().len() as u32;
        let xp_per_player = if players == 0 {
            0
        } else {
            cleanup.total_xp / players
        };
        info!(
            "Room {}: {} monsters defeated for {} XP ({} each)",
            room_id,
            cleanup.removed.len(),
            cleanup.total_xp,
            xp_per_player
        );
        Ok(XpAward {
            cleanup,
            xp_per_player,
        })
    }

    /// Creates a room for the request and populates it.
    pub fn generate(
        &mut self,
        request: &EncounterRequest,
    ) -> RoomResult<(RoomId, PopulationReport)> {
        let settings = request.room.clone().unwrap_or_else(|| self.config.room.clone());
        let room_id = self.create_room(&settings)?;
        match self.populate(room_id, request) {
            Ok(report) => Ok((room_id, report)),
            Err(err) => {
                self.rooms.remove(&room_id);
                Err(err)
            }
        }
    }

    /// Populates an existing room from a request.
    ///
    /// Monster groups are balanced against the party first; players, monsters,
    /// loot and hand-placed entities then go into the room in one batch.
    pub fn populate(
        &mut self,
        room_id: RoomId,
        request: &EncounterRequest,
    ) -> RoomResult<PopulationReport> {
        if !self.rooms.contains_key(&room_id) {
            return Err(RoomError::RoomNotFound(room_id));
        }

        let xp_budget = request.party.xp_budget(request.difficulty)?;
        let groups = request
            .monsters
            .iter()
            .map(|monster| {
                let xp = self.source.monster_xp(&monster.key)?;
                Ok(MonsterGroup::new(monster.key.clone(), xp, monster.count))
            })
            .collect::<RoomResult<Vec<_>>>()?;
        let monster_groups = balance(
            &request.party,
            request.difficulty,
            &groups,
            self.config.max_monsters,
        )?;

        let mut configs: Vec<PlaceableConfig> = request
            .party
            .members
            .iter()
            .map(|member| PlaceableConfig::random(Player::new(member.name.clone(), member.level)))
            .collect();

        for group in &monster_groups {
            for _ in 0..group.count {
                configs.push(PlaceableConfig::random(self.source.monster_by_key(&group.key)?));
            }
        }

        let item_count = request.item_count.unwrap_or(self.config.default_item_count) as usize;
        let items = match &request.item_category {
            Some(category) => self
                .source
                .random_items_by_category(category, item_count, &mut self.rng)?,
            None => self.source.random_items(item_count, &mut self.rng)?,
        };
        configs.extend(items.into_iter().map(PlaceableConfig::random));

        for placement in &request.placements {
            let mut placement = placement.clone();
            assign_missing_ids(&mut placement.entity);
            configs.push(placement);
        }

        let room = self.rooms.get_mut(&room_id).ok_or(RoomError::RoomNotFound(room_id))?;
        let batch = room.add_placeables(configs, &mut self.rng)?;
        if !batch.is_complete() {
            warn!("Room {}: {} entities could not be placed", room_id, batch.failed.len());
        }

        let report = PopulationReport {
            adjusted_xp: adjusted_xp(&monster_groups),
            monster_groups,
            xp_budget,
            batch,
        };
        info!(
            "Room {} populated for a {} encounter: {} entities, {} / {} adjusted XP",
            room_id,
            request.difficulty,
            report.batch.placed.len(),
            report.adjusted_xp,
            report.xp_budget
        );
        Ok(report)
    }
}

/// Mints ids for a hand-placed entity and, for NPCs, the items it carries.
fn assign_missing_ids(entity: &mut PlaceableEntity) {
    let slot = match entity {
        PlaceableEntity::Monster(m) => &mut m.id,
        PlaceableEntity::Player(p) => &mut p.id,
        PlaceableEntity::Item(i) => &mut i.id,
        PlaceableEntity::Npc(n) => {
            for item in n.inventory.iter_mut().filter(|item| item.id.is_nil()) {
                item.id = new_entity_id();
            }
            &mut n.id
        }
        PlaceableEntity::Obstacle(o) => &mut o.id,
    };
    if slot.is_nil() {
        *slot = new_entity_id();
    }
}
