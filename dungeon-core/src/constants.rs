use crate::types::Direction;

pub(crate) const DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

// Every cell touching a grid cell, diagonals included. Callers filter
// these down to orthogonal steps.
pub(crate) const SURROUNDING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

// Rooms with up to this many neighbours only need a single open doorway
pub(crate) const SPARSE_NEIGHBOUR_LIMIT: usize = 2;
pub(crate) const SPARSE_REQUIRED_CONNECTIONS: usize = 1;
pub(crate) const DENSE_REQUIRED_CONNECTIONS: usize = 2;

pub(crate) const LINK_DRAW_BUDGET: u32 = 32;

// Upper bound on `maxRooms`. The grid has `maxRooms`² cells and placement
// rescans all of them for every room.
pub(crate) const MAX_ROOMS: u32 = 256;

/// Id of the dungeon config the built-in content ships with.
pub const DEFAULT_DUNGEON_ID: &str = "conf_dungeon_1";
