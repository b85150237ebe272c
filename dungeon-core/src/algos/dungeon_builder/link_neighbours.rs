use super::DungeonBuilder;
use crate::{
    constants::SURROUNDING_OFFSETS,
    error::{DungeonError, InvariantViolation},
    graph::OccupancyGrid,
    types::{RoomInstance, RoomPhase},
};

impl DungeonBuilder<'_> {
    pub(super) fn link_neighbours(
        grid: &OccupancyGrid,
        rooms: &mut [RoomInstance],
    ) -> Result<(), DungeonError> {
        for room in rooms.iter() {
            room.require_phase(RoomPhase::Placed)?;
        }

        // Each room looks at its own surroundings, so both sides of a
        // neighbour relation are derived independently
        for room in rooms.iter_mut() {
            let coordinate = room.coordinate();

            for (dx, dy) in SURROUNDING_OFFSETS {
                let candidate = coordinate.offset_by(dx, dy);

                // Only cells one orthogonal step away have a direction
                let Some(direction) = coordinate.direction_to(&candidate) else {
                    continue;
                };

                if let Some(neighbour_id) = grid.get(candidate) {
                    room.add_neighbour(direction, neighbour_id);
                }
            }
        }

        Self::check_symmetry(rooms)?;

        for room in rooms.iter_mut() {
            room.advance_phase(RoomPhase::Placed, RoomPhase::NeighboursResolved)?;
        }

        Ok(())
    }

    fn check_symmetry(rooms: &[RoomInstance]) -> Result<(), InvariantViolation> {
        for room in rooms.iter() {
            for (direction, neighbour_id) in room.neighbours() {
                let neighbour = rooms
                    .get(neighbour_id)
                    .ok_or(InvariantViolation::UnknownRoom(neighbour_id))?;

                if neighbour.neighbour_in(direction.reverse()) != Some(room.id()) {
                    return Err(InvariantViolation::AsymmetricNeighbours {
                        room: room.id(),
                        neighbour: neighbour_id,
                    });
                }
            }
        }

        Ok(())
    }
}
