use crate::types::{Direction, GridCoordinate, RoomId, RoomPhase};

use thiserror::Error;

/// Every failure a generation run can report. There is no partial dungeon:
/// when any of these is returned no room is exposed to the caller.
#[derive(Debug, Error)]
pub enum DungeonError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// A malformed dungeon configuration. Fatal and never retried.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(r#"dungeon config "{id}" has no room aliases"#)]
    EmptyAliasList { id: String },
    #[error(r#"dungeon config "{id}" has non-positive room counts (min {min}, max {max})"#)]
    NonPositiveRoomCount { id: String, min: u32, max: u32 },
    #[error(r#"dungeon config "{id}" has min rooms {min} greater than max rooms {max}"#)]
    MinExceedsMax { id: String, min: u32, max: u32 },
    #[error(r#"dungeon config "{id}" asks for up to {max} rooms, the limit is {limit}"#)]
    TooManyRooms { id: String, max: u32, limit: u32 },
    #[error(r#"can't find dungeon config with id "{0}""#)]
    UnknownConfig(String),
    #[error("malformed content document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Content referenced by a configuration is missing or unusable.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("no room templates are available")]
    NoTemplates,
    #[error(r#"can't resolve room template "{0}""#)]
    UnknownTemplate(String),
    #[error(r#"room template "{alias}" has an unusable footprint ({width} x {depth})"#)]
    InvalidFootprint { alias: String, width: f32, depth: f32 },
    #[error(r#"room {coordinate} ("{alias}") has no door facing {direction}"#)]
    MissingDoor {
        coordinate: GridCoordinate,
        alias: String,
        direction: Direction,
    },
}

/// A broken internal invariant. These indicate a logic bug in the generator.
#[derive(Debug, Error)]
pub enum InvariantViolation {
    #[error("no free cell next to the dungeon with {placed} rooms placed and {remaining} left")]
    EmptyFrontier { placed: usize, remaining: usize },
    #[error("{requested} rooms don't fit in a grid of side {side}")]
    GridCapacityExceeded { requested: usize, side: usize },
    #[error("cell {0} is outside the grid or already occupied")]
    CellUnavailable(GridCoordinate),
    #[error("rooms {room} and {neighbour} disagree on their neighbour relation")]
    AsymmetricNeighbours { room: RoomId, neighbour: RoomId },
    #[error("room {room} is {found:?} but {expected:?} was required")]
    PhaseOutOfOrder {
        room: RoomId,
        expected: RoomPhase,
        found: RoomPhase,
    },
    #[error("room {room} needs another connection but every neighbour is already linked")]
    NoUnlinkedNeighbour { room: RoomId },
    #[error("a group of {size} rooms has no closed link to the rest of the dungeon")]
    IsolatedGroup { size: usize },
    #[error("room {0} doesn't exist")]
    UnknownRoom(RoomId),
}
