//! # Room Entities
//!
//! The five entity kinds a room can hold and the `Placeable` capability that
//! lets the placement engine treat them uniformly.
//!
//! Entities deserialized from content data carry a nil id and the origin
//! position until a caller assigns them; the constructors here always mint a
//! fresh id.

use super::{new_entity_id, CellType, EntityId, Position};
use serde::{Deserialize, Serialize};

/// Identity and position accessors shared by every entity kind.
pub trait Placeable {
    /// Gets the entity's unique identifier.
    fn id(&self) -> EntityId;

    /// Gets the entity's current position.
    fn position(&self) -> Position;

    /// Sets the entity's position. Does not touch any room grid.
    fn set_position(&mut self, position: Position);

    /// Gets the grid cell type this entity occupies.
    fn cell_type(&self) -> CellType;
}

/// A hostile creature with reward semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    #[serde(default)]
    pub id: EntityId,
    /// Reference to external content
    pub key: String,
    pub name: String,
    pub challenge_rating: f32,
    /// Experience awarded when the monster is removed from play
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub hit_points: u32,
    #[serde(default)]
    pub armor_class: u32,
    #[serde(default)]
    pub position: Position,
}

impl Monster {
    /// Creates a monster with a fresh id at the origin.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        challenge_rating: f32,
        xp: u32,
    ) -> Self {
        Self {
            id: new_entity_id(),
            key: key.into(),
            name: name.into(),
            challenge_rating,
            xp,
            hit_points: 0,
            armor_class: 0,
            position: Position::origin(),
        }
    }

    /// Sets the starting position.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// A player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub position: Position,
}

impl Player {
    /// Creates a player with a fresh id at the origin.
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            level,
            class_name: None,
            position: Position::origin(),
        }
    }

    /// Sets the starting position.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// A piece of loot, either lying in the room or carried by an NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: EntityId,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Value in gold pieces
    #[serde(default)]
    pub value: u32,
    #[serde(default)]
    pub weight: f32,
    #[serde(default)]
    pub position: Position,
}

impl Item {
    /// Creates an item with a fresh id at the origin.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: new_entity_id(),
            key: key.into(),
            name: name.into(),
            category: category.into(),
            value: 0,
            weight: 0.0,
            position: Position::origin(),
        }
    }

    /// Sets the starting position.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// A non-player character carrying its own inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Carried items; never placed on the grid
    #[serde(default)]
    pub inventory: Vec<Item>,
    #[serde(default)]
    pub position: Position,
}

impl Npc {
    /// Creates an NPC with a fresh id and an empty inventory.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            key: key.into(),
            name: name.into(),
            description: String::new(),
            inventory: Vec::new(),
            position: Position::origin(),
        }
    }

    /// Sets the starting position.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// Static scenery that blocks a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub position: Position,
}

impl Obstacle {
    /// Creates an obstacle with a fresh id at the origin.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            key: key.into(),
            name: name.into(),
            description: String::new(),
            position: Position::origin(),
        }
    }

    /// Sets the starting position.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

macro_rules! impl_placeable {
    ($ty:ty, $cell:expr) => {
        impl Placeable for $ty {
            fn id(&self) -> EntityId {
                self.id
            }

            fn position(&self) -> Position {
                self.position
            }

            fn set_position(&mut self, position: Position) {
                self.position = position;
            }

            fn cell_type(&self) -> CellType {
                $cell
            }
        }
    };
}

impl_placeable!(Monster, CellType::Monster);
impl_placeable!(Player, CellType::Player);
impl_placeable!(Item, CellType::Item);
impl_placeable!(Npc, CellType::Npc);
impl_placeable!(Obstacle, CellType::Obstacle);

/// Closed set of everything that can be placed in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaceableEntity {
    Monster(Monster),
    Player(Player),
    Item(Item),
    Npc(Npc),
    Obstacle(Obstacle),
}

impl PlaceableEntity {
    fn as_placeable(&self) -> &dyn Placeable {
        match self {
            PlaceableEntity::Monster(m) => m,
            PlaceableEntity::Player(p) => p,
            PlaceableEntity::Item(i) => i,
            PlaceableEntity::Npc(n) => n,
            PlaceableEntity::Obstacle(o) => o,
        }
    }

    fn as_placeable_mut(&mut self) -> &mut dyn Placeable {
        match self {
            PlaceableEntity::Monster(m) => m,
            PlaceableEntity::Player(p) => p,
            PlaceableEntity::Item(i) => i,
            PlaceableEntity::Npc(n) => n,
            PlaceableEntity::Obstacle(o) => o,
        }
    }

    /// XP awarded when this entity is removed. Only monsters carry any.
    pub fn xp(&self) -> u32 {
        match self {
            PlaceableEntity::Monster(m) => m.xp,
            _ => 0,
        }
    }

    /// Human-readable name for logging.
    pub fn name(&self) -> &str {
        match self {
            PlaceableEntity::Monster(m) => &m.name,
            PlaceableEntity::Player(p) => &p.name,
            PlaceableEntity::Item(i) => &i.name,
            PlaceableEntity::Npc(n) => &n.name,
            PlaceableEntity::Obstacle(o) => &o.name,
        }
    }
}

impl Placeable for PlaceableEntity {
    fn id(&self) -> EntityId {
        self.as_placeable().id()
    }

    fn position(&self) -> Position {
        self.as_placeable().position()
    }

    fn set_position(&mut self, position: Position) {
        self.as_placeable_mut().set_position(position);
    }

    fn cell_type(&self) -> CellType {
        self.as_placeable().cell_type()
    }
}

impl From<Monster> for PlaceableEntity {
    fn from(monster: Monster) -> Self {
        PlaceableEntity::Monster(monster)
    }
}

impl From<Player> for PlaceableEntity {
    fn from(player: Player) -> Self {
        PlaceableEntity::Player(player)
    }
}

impl From<Item> for PlaceableEntity {
    fn from(item: Item) -> Self {
        PlaceableEntity::Item(item)
    }
}

impl From<Npc> for PlaceableEntity {
    fn from(npc: Npc) -> Self {
        PlaceableEntity::Npc(npc)
    }
}

impl From<Obstacle> for PlaceableEntity {
    fn from(obstacle: Obstacle) -> Self {
        PlaceableEntity::Obstacle(obstacle)
    }
}
