//! # Encounter Module
//!
//! Everything around the room core that turns a request into a populated room:
//! balancing monsters against a party, looking up content, and the service
//! that owns rooms and drives the placement engine.

pub mod balancer;
pub mod service;
pub mod sources;

pub use balancer::*;
pub use service::*;
pub use sources::*;

use crate::config::{DEFAULT_MAX_MONSTERS, DEFAULT_ROOM_HEIGHT, DEFAULT_ROOM_WIDTH};
use crate::{LightLevel, PlaceableConfig, RoomResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the encounter service.
///
/// Controls randomness and the defaults used for rooms and encounters when a
/// request leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Random seed for reproducible placement
    pub seed: u64,
    /// Default room settings
    pub room: RoomSettings,
    /// Cap on monsters produced by the balancer
    pub max_monsters: u32,
    /// Loot items scattered when a request does not say
    pub default_item_count: u32,
}

impl EncounterConfig {
    /// Creates a default configuration with the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use encounter_room::EncounterConfig;
    ///
    /// let config = EncounterConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.room.use_grid);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            room: RoomSettings::default(),
            max_monsters: DEFAULT_MAX_MONSTERS,
            default_item_count: 2,
        }
    }

    /// Creates a configuration for testing with small rooms and few monsters.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            room: RoomSettings {
                width: 6,
                height: 6,
                ..RoomSettings::default()
            },
            max_monsters: 6,
            default_item_count: 1,
        }
    }

    /// Parses a configuration from JSON. Missing fields take default values.
    pub fn from_json_str(json: &str) -> RoomResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> RoomResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&contents)?;
        log::info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Shape and ambience of a room to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSettings {
    pub width: u32,
    pub height: u32,
    pub light_level: LightLevel,
    /// Track occupancy and reject collisions
    pub use_grid: bool,
    pub description: String,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_ROOM_WIDTH,
            height: DEFAULT_ROOM_HEIGHT,
            light_level: LightLevel::Bright,
            use_grid: true,
            description: String::new(),
        }
    }
}

/// Monsters of one kind requested for an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterRequest {
    /// Content key looked up in the monster source
    pub key: String,
    pub count: u32,
}

/// Everything needed to populate one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterRequest {
    /// Room to create; the configured defaults when absent
    #[serde(default)]
    pub room: Option<RoomSettings>,
    pub party: Party,
    pub difficulty: EncounterDifficulty,
    #[serde(default)]
    pub monsters: Vec<MonsterRequest>,
    /// Loot to scatter; the configured default when absent
    #[serde(default)]
    pub item_count: Option<u32>,
    /// Restrict scattered loot to one category
    #[serde(default)]
    pub item_category: Option<String>,
    /// Hand-placed entities such as NPCs and obstacles
    #[serde(default)]
    pub placements: Vec<PlaceableConfig>,
}

impl EncounterRequest {
    /// Creates a request with no monsters, loot or extra placements.
    pub fn new(party: Party, difficulty: EncounterDifficulty) -> Self {
        Self {
            room: None,
            party,
            difficulty,
            monsters: Vec::new(),
            item_count: None,
            item_category: None,
            placements: Vec::new(),
        }
    }

    /// Adds a monster group and returns the request.
    pub fn with_monsters(mut self, key: impl Into<String>, count: u32) -> Self {
        self.monsters.push(MonsterRequest {
            key: key.into(),
            count,
        });
        self
    }

    /// Parses a request from JSON.
    pub fn from_json_str(json: &str) -> RoomResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a request from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> RoomResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }
}
