//! # Encounter Room
//!
//! Spatial and entity model for tabletop RPG encounter rooms.
//!
//! ## Architecture Overview
//!
//! The crate is built around a single owned aggregate, the [`Room`]:
//!
//! - **Room**: bounded rectangle holding per-type entity collections and an
//!   optional occupancy grid derived from them
//! - **Placement**: place, move, remove and find-empty operations that keep the
//!   grid and the collections in sync
//! - **Batch placement**: mixed placement requests resolved by type priority
//! - **Cleanup**: bulk removal with XP aggregation
//! - **Encounter**: balancer, content sources and a service layer that owns
//!   rooms and drives the placement engine
//!
//! ## Gridless rooms
//!
//! A room may be created without a grid. Such rooms accept any position and
//! never report collisions; entity positions are advisory only.

pub mod encounter;
pub mod room;

pub use encounter::*;
pub use room::*;

/// Core error type for the encounter room engine.
#[derive(thiserror::Error, Debug)]
pub enum RoomError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// No room is registered under the given id
    #[error("Room {0} not found")]
    RoomNotFound(RoomId),

    /// Position lies outside the room bounds
    #[error("Position ({}, {}) is outside a {width}x{height} room", .position.x, .position.y)]
    InvalidPosition {
        position: Position,
        width: u32,
        height: u32,
    },

    /// Target cell already holds an entity
    #[error("Cell ({}, {}) is occupied by {occupant}", .position.x, .position.y)]
    CellOccupied {
        position: Position,
        occupant: EntityId,
    },

    /// Every cell of a gridded room is taken
    #[error("No empty positions left in room")]
    NoEmptyPositions,

    /// Entity is not stored in the room
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// Entity id is already stored in the room
    #[error("Entity {0} is already in the room")]
    DuplicateEntity(EntityId),

    /// Item is not carried by the NPC
    #[error("Item {item} not found in inventory of NPC {npc}")]
    ItemNotInInventory { npc: EntityId, item: EntityId },

    /// Width or height is zero
    #[error("Invalid room dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Operation does not apply to this cell type
    #[error("Invalid cell type: {0:?}")]
    InvalidCellType(CellType),

    /// Placement request cannot be interpreted
    #[error("Malformed placement config: {0}")]
    MalformedConfig(String),

    /// Unknown encounter difficulty name
    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),

    /// Party has no members
    #[error("Party has no members")]
    EmptyParty,

    /// Character level outside 1..=20
    #[error("Invalid character level {0}")]
    InvalidLevel(u32),

    /// Challenge rating has no XP value
    #[error("Invalid challenge rating {0}")]
    InvalidChallengeRating(f32),

    /// Content source has no entry for the key or category
    #[error("Content not found: {0}")]
    ContentNotFound(String),

    /// Room state is invalid
    #[error("Invalid room state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the encounter room codebase.
pub type RoomResult<T> = Result<T, RoomError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate-wide default constants.
pub mod config {
    /// Default room width in cells
    pub const DEFAULT_ROOM_WIDTH: u32 = 10;

    /// Default room height in cells
    pub const DEFAULT_ROOM_HEIGHT: u32 = 10;

    /// Upper bound on monsters the balancer will put in one encounter
    pub const DEFAULT_MAX_MONSTERS: u32 = 20;

    /// Highest character level covered by the XP threshold table
    pub const MAX_CHARACTER_LEVEL: u32 = 20;
}
