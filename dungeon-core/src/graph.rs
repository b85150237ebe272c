use crate::{
    constants::DIRECTIONS,
    error::InvariantViolation,
    types::{Direction, Footprint, GridCoordinate, RoomId, RoomInstance},
};

use std::fmt::{Display, Formatter};

use serde::Serialize;

pub(crate) type VisitedSet = tinyset::SetUsize;

/// Square occupancy grid addressed from `(0, 0)`. Each cell holds the id of
/// the room placed on it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    side: usize,
    cells: Vec<Option<RoomId>>,
}

impl OccupancyGrid {
    pub(crate) fn new(side: usize) -> Self {
        OccupancyGrid {
            side,
            cells: vec![None; side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    fn index_of(&self, coordinate: GridCoordinate) -> Option<usize> {
        let x = usize::try_from(coordinate.x).ok()?;
        let y = usize::try_from(coordinate.y).ok()?;

        if x >= self.side || y >= self.side {
            return None;
        }

        Some(y * self.side + x)
    }

    pub fn get(&self, coordinate: GridCoordinate) -> Option<RoomId> {
        self.index_of(coordinate).and_then(|idx| self.cells[idx])
    }

    pub fn is_free(&self, coordinate: GridCoordinate) -> bool {
        self.index_of(coordinate)
            .is_some_and(|idx| self.cells[idx].is_none())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub(crate) fn occupy(
        &mut self,
        coordinate: GridCoordinate,
        room: RoomId,
    ) -> Result<(), InvariantViolation> {
        match self.index_of(coordinate) {
            Some(idx) if self.cells[idx].is_none() => {
                self.cells[idx] = Some(room);
                Ok(())
            }
            _ => Err(InvariantViolation::CellUnavailable(coordinate)),
        }
    }

    /// Every free cell sharing an edge with an occupied one, scanning the whole
    /// grid row by row from `(0, 0)`.
    pub fn frontier(&self) -> Vec<GridCoordinate> {
        let mut frontier = Vec::new();

        for y in 0..self.side {
            for x in 0..self.side {
                let coordinate = GridCoordinate::new(x as i32, y as i32);

                if !self.is_free(coordinate) {
                    continue;
                }

                if DIRECTIONS
                    .iter()
                    .any(|direction| self.get(coordinate.step(*direction)).is_some())
                {
                    frontier.push(coordinate);
                }
            }
        }

        frontier
    }
}

/// Whether `a` and `b` are neighbours with both facing doors open.
pub(crate) fn rooms_linked(rooms: &[RoomInstance], a: RoomId, b: RoomId) -> bool {
    let (Some(room_a), Some(room_b)) = (rooms.get(a), rooms.get(b)) else {
        return false;
    };

    let Some(direction) = room_a.direction_to(b) else {
        return false;
    };

    let door_open = |room: &RoomInstance, direction: Direction| {
        room.door_facing(direction)
            .is_some_and(|door| door.is_open())
    };

    door_open(room_a, direction) && door_open(room_b, direction.reverse())
}

/// Splits the rooms into groups reachable from each other through open links.
/// Groups are listed by their lowest room id, so the first one always holds
/// the seed room.
pub(crate) fn link_groups(rooms: &[RoomInstance]) -> Vec<Vec<RoomId>> {
    let mut visited = VisitedSet::new();
    let mut groups = Vec::new();

    for start in 0..rooms.len() {
        if visited.contains(start) {
            continue;
        }

        let mut group = Vec::new();
        let mut rooms_to_visit = vec![start];
        visited.insert(start);

        while let Some(room_id) = rooms_to_visit.pop() {
            group.push(room_id);

            for (_, neighbour_id) in rooms[room_id].neighbours() {
                if !visited.contains(neighbour_id) && rooms_linked(rooms, room_id, neighbour_id) {
                    visited.insert(neighbour_id);
                    rooms_to_visit.push(neighbour_id);
                }
            }
        }

        group.sort_unstable();
        groups.push(group);
    }

    groups
}

/// The finished dungeon: every placed room with its neighbours and doors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DungeonGraph {
    id: String,
    pitch: Footprint,
    rooms: Vec<RoomInstance>,
    #[serde(skip)]
    grid: OccupancyGrid,
}

impl DungeonGraph {
    pub(crate) fn new(
        id: &str,
        pitch: Footprint,
        grid: OccupancyGrid,
        rooms: Vec<RoomInstance>,
    ) -> Self {
        DungeonGraph {
            id: id.to_string(),
            pitch,
            rooms,
            grid,
        }
    }

    /// Id of the dungeon config this graph was generated from.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// World-space spacing between two adjacent grid cells.
    pub fn pitch(&self) -> Footprint {
        self.pitch
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn rooms(&self) -> &[RoomInstance] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn room(&self, id: RoomId) -> Option<&RoomInstance> {
        self.rooms.get(id)
    }

    pub fn get(&self, coordinate: GridCoordinate) -> Option<&RoomInstance> {
        self.grid.get(coordinate).and_then(|id| self.rooms.get(id))
    }

    pub fn neighbours_of(&self, id: RoomId) -> impl Iterator<Item = &RoomInstance> + '_ {
        self.rooms
            .get(id)
            .into_iter()
            .flat_map(|room| room.neighbours())
            .filter_map(move |(_, neighbour_id)| self.rooms.get(neighbour_id))
    }

    pub fn is_connected(&self, a: RoomId, b: RoomId) -> bool {
        rooms_linked(&self.rooms, a, b)
    }

    /// Number of neighbours `id` shares an open doorway with.
    pub fn connection_count(&self, id: RoomId) -> usize {
        self.rooms.get(id).map_or(0, |room| {
            room.neighbours()
                .filter(|(_, neighbour_id)| self.is_connected(id, *neighbour_id))
                .count()
        })
    }

    /// Every open link once, as `(lower id, higher id)` pairs.
    pub fn open_connections(&self) -> Vec<(RoomId, RoomId)> {
        self.rooms
            .iter()
            .flat_map(|room| {
                room.neighbours()
                    .filter(move |(_, neighbour_id)| room.id() < *neighbour_id)
                    .map(move |(_, neighbour_id)| (room.id(), neighbour_id))
            })
            .filter(|(a, b)| self.is_connected(*a, *b))
            .collect()
    }

    pub fn connected_groups(&self) -> Vec<Vec<RoomId>> {
        link_groups(&self.rooms)
    }

    pub fn is_fully_connected(&self) -> bool {
        self.connected_groups().len() <= 1
    }
}

// Draws the occupied part of the grid, north at the top. Rooms are `#` (the
// seed room is `@`) and open doorways are `-` or `|`.
impl Display for DungeonGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let max_x = self.rooms.iter().map(|r| r.coordinate().x).max().unwrap_or(0);
        let max_y = self.rooms.iter().map(|r| r.coordinate().y).max().unwrap_or(0);

        let linked = |coordinate: GridCoordinate, direction: Direction| {
            match (
                self.grid.get(coordinate),
                self.grid.get(coordinate.step(direction)),
            ) {
                (Some(a), Some(b)) => self.is_connected(a, b),
                _ => false,
            }
        };

        for y in (0..=max_y).rev() {
            let mut row = String::new();
            let mut below = String::new();

            for x in 0..=max_x {
                let coordinate = GridCoordinate::new(x, y);

                row.push(match self.grid.get(coordinate) {
                    Some(0) => '@',
                    Some(_) => '#',
                    None => '.',
                });

                below.push(if linked(coordinate, Direction::South) {
                    '|'
                } else {
                    ' '
                });

                if x < max_x {
                    row.push(if linked(coordinate, Direction::East) {
                        '-'
                    } else {
                        ' '
                    });
                    below.push(' ');
                }
            }

            writeln!(f, "{}", row.trim_end())?;
            if y > 0 {
                writeln!(f, "{}", below.trim_end())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::WorldPosition;

    fn rooms_on_grid(coordinates: &[(i32, i32)]) -> (OccupancyGrid, Vec<RoomInstance>) {
        let mut grid = OccupancyGrid::new(coordinates.len());
        let mut rooms = Vec::new();

        for (id, (x, y)) in coordinates.iter().enumerate() {
            let coordinate = GridCoordinate::new(*x, *y);
            grid.occupy(coordinate, id).unwrap();
            rooms.push(RoomInstance::new(
                id,
                coordinate,
                "stone_room_1",
                Footprint::new(1.0, 1.0),
                WorldPosition::ZERO,
                &DIRECTIONS,
            ));
        }

        for id in 0..rooms.len() {
            for direction in DIRECTIONS {
                if let Some(other) = grid.get(rooms[id].coordinate().step(direction)) {
                    rooms[id].add_neighbour(direction, other);
                }
            }
        }

        (grid, rooms)
    }

    fn link(rooms: &mut [RoomInstance], a: RoomId, b: RoomId) {
        let direction = rooms[a].direction_to(b).unwrap();
        rooms[a].open_door(direction).unwrap();
        rooms[b].open_door(direction.reverse()).unwrap();
    }

    #[test]
    fn test_grid_occupy_rejects_taken_and_outside_cells() {
        let mut grid = OccupancyGrid::new(3);

        assert!(grid.occupy(GridCoordinate::ORIGIN, 0).is_ok());
        assert!(matches!(
            grid.occupy(GridCoordinate::ORIGIN, 1),
            Err(InvariantViolation::CellUnavailable(_))
        ));
        assert!(grid.occupy(GridCoordinate::new(3, 0), 1).is_err());
        assert!(grid.occupy(GridCoordinate::new(-1, 0), 1).is_err());

        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(grid.get(GridCoordinate::ORIGIN), Some(0));
    }

    #[test]
    fn test_grid_frontier_is_row_major() {
        let mut grid = OccupancyGrid::new(4);
        grid.occupy(GridCoordinate::ORIGIN, 0).unwrap();
        grid.occupy(GridCoordinate::new(1, 0), 1).unwrap();

        assert_eq!(
            grid.frontier(),
            vec![
                GridCoordinate::new(2, 0),
                GridCoordinate::new(0, 1),
                GridCoordinate::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_grid_frontier_ignores_diagonal_cells() {
        let mut grid = OccupancyGrid::new(3);
        grid.occupy(GridCoordinate::new(1, 1), 0).unwrap();

        let frontier = grid.frontier();
        assert_eq!(frontier.len(), 4);
        assert!(!frontier.contains(&GridCoordinate::new(0, 0)));
        assert!(!frontier.contains(&GridCoordinate::new(2, 2)));
    }

    #[test]
    fn test_rooms_linked_needs_both_doors() {
        let (_, mut rooms) = rooms_on_grid(&[(0, 0), (1, 0)]);

        rooms[0].open_door(Direction::East).unwrap();
        assert!(!rooms_linked(&rooms, 0, 1));

        rooms[1].open_door(Direction::West).unwrap();
        assert!(rooms_linked(&rooms, 0, 1));
        assert!(rooms_linked(&rooms, 1, 0));
    }

    #[test]
    fn test_link_groups() {
        /*
           @ - #   #
                   |
           #   # - #
        */
        let (_, mut rooms) = rooms_on_grid(&[(0, 1), (1, 1), (2, 1), (2, 0), (1, 0), (0, 0)]);
        link(&mut rooms, 0, 1);
        link(&mut rooms, 2, 3);
        link(&mut rooms, 3, 4);

        let groups = link_groups(&rooms);
        assert_eq!(groups, vec![vec![0, 1], vec![2, 3, 4], vec![5]]);
    }

    #[test]
    fn test_dungeon_graph_queries() {
        let (grid, mut rooms) = rooms_on_grid(&[(0, 0), (1, 0), (1, 1)]);
        link(&mut rooms, 0, 1);

        let graph = DungeonGraph::new("test", Footprint::new(1.0, 1.0), grid, rooms);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.get(GridCoordinate::new(1, 1)).map(|r| r.id()), Some(2));
        assert!(graph.get(GridCoordinate::new(0, 1)).is_none());

        let neighbours = graph.neighbours_of(1).map(|r| r.id()).collect::<Vec<_>>();
        assert_eq!(neighbours, vec![2, 0]);

        assert!(graph.is_connected(0, 1));
        assert!(!graph.is_connected(1, 2));
        assert!(!graph.is_connected(0, 2));

        assert_eq!(graph.open_connections(), vec![(0, 1)]);
        assert_eq!(graph.connection_count(1), 1);
        assert!(!graph.is_fully_connected());
    }

    #[test]
    fn test_dungeon_graph_display() {
        let (grid, mut rooms) = rooms_on_grid(&[(0, 0), (1, 0), (1, 1)]);
        link(&mut rooms, 0, 1);
        link(&mut rooms, 1, 2);

        let graph = DungeonGraph::new("test", Footprint::new(1.0, 1.0), grid, rooms);

        assert_eq!(graph.to_string(), ". #\n  |\n@-#\n");
    }
}
