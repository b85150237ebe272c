use crate::error::InvariantViolation;

use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

pub type RoomId = usize;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPosition {
    pub const ZERO: WorldPosition = WorldPosition::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        WorldPosition { x, y, z }
    }
}

impl Display for WorldPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// World-space width (x) and depth (z) taken up by a room template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f32,
    pub depth: f32,
}

impl Footprint {
    pub const fn new(width: f32, depth: f32) -> Self {
        Footprint { width, depth }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.depth.is_finite() && self.width > 0.0 && self.depth > 0.0
    }

    // The smallest footprint that contains both `self` and `other`
    pub fn union(&self, other: &Footprint) -> Footprint {
        Footprint {
            width: self.width.max(other.width),
            depth: self.depth.max(other.depth),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Grid delta of one step towards `self`. North grows `y`, east grows `x`.
    pub const fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    /// Maps a grid delta onto a cardinal direction. Anything that isn't exactly
    /// one orthogonal step away (diagonals included) has no direction.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        if dx.abs() + dy.abs() != 1 {
            return None;
        }

        match (dx, dy) {
            (0, 1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, -1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    pub fn reverse(&self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::North => write!(f, "north"),
            Direction::East => write!(f, "east"),
            Direction::South => write!(f, "south"),
            Direction::West => write!(f, "west"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridCoordinate {
    pub x: i32,
    pub y: i32,
}

impl GridCoordinate {
    pub const ORIGIN: GridCoordinate = GridCoordinate::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        GridCoordinate { x, y }
    }

    pub fn offset_by(&self, dx: i32, dy: i32) -> GridCoordinate {
        GridCoordinate {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn step(&self, direction: Direction) -> GridCoordinate {
        let (dx, dy) = direction.offset();
        self.offset_by(dx, dy)
    }

    pub fn distance(&self, other: &GridCoordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Direction from `self` towards `other` when both cells share an edge.
    pub fn direction_to(&self, other: &GridCoordinate) -> Option<Direction> {
        Direction::from_delta(other.x - self.x, other.y - self.y)
    }
}

impl Display for GridCoordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    #[default]
    Closed,
    Open,
}

/// A doorway on one side of a room. Doors start closed and can only be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DoorSlot {
    facing: Direction,
    state: DoorState,
}

impl DoorSlot {
    pub fn new(facing: Direction) -> Self {
        DoorSlot {
            facing,
            state: DoorState::Closed,
        }
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DoorState::Open
    }

    // Returns whether the door was closed before the call
    pub(crate) fn open(&mut self) -> bool {
        let was_closed = self.state == DoorState::Closed;
        self.state = DoorState::Open;
        was_closed
    }
}

/// Progress of a room through a generation run. Each builder phase moves every
/// room one step forward, and only from the step right before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub enum RoomPhase {
    #[default]
    Placed,
    NeighboursResolved,
    ConnectionsResolved,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomInstance {
    id: RoomId,
    coordinate: GridCoordinate,
    template: String,
    footprint: Footprint,
    world_position: WorldPosition,
    doors: Vec<DoorSlot>,
    neighbours: BTreeMap<Direction, RoomId>,
    #[serde(skip)]
    phase: RoomPhase,
}

impl RoomInstance {
    pub(crate) fn new(
        id: RoomId,
        coordinate: GridCoordinate,
        template: &str,
        footprint: Footprint,
        world_position: WorldPosition,
        door_directions: &[Direction],
    ) -> Self {
        let mut facings = door_directions.to_vec();
        facings.sort();
        facings.dedup();

        RoomInstance {
            id,
            coordinate,
            template: template.to_string(),
            footprint,
            world_position,
            doors: facings.into_iter().map(DoorSlot::new).collect(),
            neighbours: BTreeMap::new(),
            phase: RoomPhase::Placed,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn coordinate(&self) -> GridCoordinate {
        self.coordinate
    }

    pub fn template_alias(&self) -> &str {
        &self.template
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    pub fn world_position(&self) -> WorldPosition {
        self.world_position
    }

    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    pub fn doors(&self) -> &[DoorSlot] {
        &self.doors
    }

    pub fn door_facing(&self, direction: Direction) -> Option<&DoorSlot> {
        self.doors.iter().find(|door| door.facing == direction)
    }

    pub fn open_door_count(&self) -> usize {
        self.doors.iter().filter(|door| door.is_open()).count()
    }

    /// Neighbours in north, east, south, west order.
    pub fn neighbours(&self) -> impl Iterator<Item = (Direction, RoomId)> + '_ {
        self.neighbours.iter().map(|(direction, id)| (*direction, *id))
    }

    pub fn neighbour_count(&self) -> usize {
        self.neighbours.len()
    }

    pub fn neighbour_in(&self, direction: Direction) -> Option<RoomId> {
        self.neighbours.get(&direction).copied()
    }

    pub fn direction_to(&self, neighbour: RoomId) -> Option<Direction> {
        self.neighbours
            .iter()
            .find(|(_, id)| **id == neighbour)
            .map(|(direction, _)| *direction)
    }

    pub(crate) fn add_neighbour(&mut self, direction: Direction, neighbour: RoomId) {
        self.neighbours.insert(direction, neighbour);
    }

    // Returns `None` when the template has no door on that side
    pub(crate) fn open_door(&mut self, direction: Direction) -> Option<bool> {
        self.doors
            .iter_mut()
            .find(|door| door.facing == direction)
            .map(DoorSlot::open)
    }

    pub(crate) fn require_phase(&self, expected: RoomPhase) -> Result<(), InvariantViolation> {
        if self.phase != expected {
            return Err(InvariantViolation::PhaseOutOfOrder {
                room: self.id,
                expected,
                found: self.phase,
            });
        }

        Ok(())
    }

    pub(crate) fn advance_phase(
        &mut self,
        from: RoomPhase,
        to: RoomPhase,
    ) -> Result<(), InvariantViolation> {
        self.require_phase(from)?;
        self.phase = to;
        Ok(())
    }
}

impl Display for RoomInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} [{}]", self.id, self.coordinate, self.template)
    }
}
