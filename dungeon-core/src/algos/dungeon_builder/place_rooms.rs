use super::DungeonBuilder;
use crate::{
    algos::RandomSource,
    error::{ContentError, DungeonError, InvariantViolation},
    graph::OccupancyGrid,
    types::{Footprint, GridCoordinate, RoomInstance, WorldPosition},
};

use tracing::{Level, event};

impl DungeonBuilder<'_> {
    /// Grows the dungeon from a seed room at `(0, 0)`. Every further room goes
    /// on a cell drawn uniformly from the whole frontier, which keeps the shape
    /// compact instead of snaking away from the last placed room.
    pub(super) fn place_rooms<R>(
        &self,
        random: &mut R,
    ) -> Result<(OccupancyGrid, Vec<RoomInstance>), DungeonError>
    where
        R: RandomSource + ?Sized,
    {
        let total_rooms = random.next_int(self.config.min_rooms, self.config.max_rooms) as usize;

        // A connected shape of N cells grown from a corner always fits in N x N
        let mut grid = OccupancyGrid::new(total_rooms);
        let mut rooms = Vec::with_capacity(total_rooms);
        let pitch = self.templates.pitch();

        self.place_room(GridCoordinate::ORIGIN, pitch, &mut grid, &mut rooms, random)?;

        // The seed room counts towards the total
        while rooms.len() < total_rooms {
            let frontier = grid.frontier();

            if frontier.is_empty() {
                return Err(InvariantViolation::EmptyFrontier {
                    placed: rooms.len(),
                    remaining: total_rooms - rooms.len(),
                }
                .into());
            }

            let coordinate = frontier[random.next_index(frontier.len())];
            self.place_room(coordinate, pitch, &mut grid, &mut rooms, random)?;
        }

        Ok((grid, rooms))
    }

    fn place_room<R>(
        &self,
        coordinate: GridCoordinate,
        pitch: Footprint,
        grid: &mut OccupancyGrid,
        rooms: &mut Vec<RoomInstance>,
        random: &mut R,
    ) -> Result<(), DungeonError>
    where
        R: RandomSource + ?Sized,
    {
        if rooms.len() >= grid.capacity() {
            return Err(InvariantViolation::GridCapacityExceeded {
                requested: rooms.len() + 1,
                side: grid.side(),
            }
            .into());
        }

        let resolved = self
            .templates
            .get(random.next_index(self.templates.len()))
            .ok_or(ContentError::NoTemplates)?;

        let room_id = rooms.len();
        grid.occupy(coordinate, room_id)?;

        let world_position = WorldPosition::new(
            coordinate.x as f32 * pitch.width,
            0.0,
            coordinate.y as f32 * pitch.depth,
        );

        let template = resolved.template();
        rooms.push(RoomInstance::new(
            room_id,
            coordinate,
            resolved.alias(),
            template.footprint(),
            world_position,
            &template.door_directions,
        ));

        event!(
            Level::TRACE,
            "Placed room {} ({}) at {}",
            room_id,
            resolved.alias(),
            coordinate
        );

        Ok(())
    }
}
