use super::{ConnectivityMode, DungeonBuilder, DungeonBuilderConfig};
use crate::{
    algos::RandomSource,
    constants::{DENSE_REQUIRED_CONNECTIONS, SPARSE_NEIGHBOUR_LIMIT, SPARSE_REQUIRED_CONNECTIONS},
    error::{ContentError, DungeonError, InvariantViolation},
    graph::rooms_linked,
    types::{RoomId, RoomInstance, RoomPhase},
};

use tracing::{Level, event};

/// Minimum number of open doorways a room with `neighbour_count` neighbours
/// ends up with.
pub(crate) fn required_connections(neighbour_count: usize) -> usize {
    match neighbour_count {
        0 => 0,
        n if n <= SPARSE_NEIGHBOUR_LIMIT => SPARSE_REQUIRED_CONNECTIONS,
        _ => DENSE_REQUIRED_CONNECTIONS,
    }
}

impl DungeonBuilder<'_> {
    pub(super) fn open_connections<R>(
        rooms: &mut [RoomInstance],
        config: &DungeonBuilderConfig,
        random: &mut R,
    ) -> Result<(), DungeonError>
    where
        R: RandomSource + ?Sized,
    {
        for room in rooms.iter() {
            room.require_phase(RoomPhase::NeighboursResolved)?;
        }

        let mut neighbour_buffer = Vec::with_capacity(4);

        for room_id in 0..rooms.len() {
            neighbour_buffer.extend(rooms[room_id].neighbours().map(|(_, id)| id));

            let required = required_connections(neighbour_buffer.len());

            // Links opened while planning earlier rooms count here too
            let mut open = neighbour_buffer
                .iter()
                .filter(|neighbour_id| rooms_linked(rooms, room_id, **neighbour_id))
                .count();

            while open < required {
                let neighbour_id = Self::draw_unlinked_neighbour(
                    rooms,
                    room_id,
                    &neighbour_buffer,
                    config.link_draw_budget,
                    random,
                )?;

                Self::open_link(rooms, room_id, neighbour_id)?;
                open += 1;
            }

            neighbour_buffer.clear();
        }

        if config.connectivity == ConnectivityMode::Spanning {
            Self::join_groups(rooms, random)?;
        }

        for room in rooms.iter_mut() {
            room.advance_phase(RoomPhase::NeighboursResolved, RoomPhase::ConnectionsResolved)?;
        }

        Ok(())
    }

    // Draws neighbours uniformly until one isn't linked to `room_id` yet.
    fn draw_unlinked_neighbour<R>(
        rooms: &[RoomInstance],
        room_id: RoomId,
        neighbours: &[RoomId],
        draw_budget: u32,
        random: &mut R,
    ) -> Result<RoomId, InvariantViolation>
    where
        R: RandomSource + ?Sized,
    {
        let attempts = draw_budget as usize * neighbours.len();

        for _ in 0..attempts {
            let candidate = neighbours[random.next_index(neighbours.len())];

            if !rooms_linked(rooms, room_id, candidate) {
                return Ok(candidate);
            }
        }

        let unlinked = neighbours
            .iter()
            .copied()
            .filter(|neighbour_id| !rooms_linked(rooms, room_id, *neighbour_id))
            .collect::<Vec<_>>();

        if unlinked.is_empty() {
            return Err(InvariantViolation::NoUnlinkedNeighbour { room: room_id });
        }

        if attempts > 0 {
            event!(
                Level::WARN,
                "Room {} spent {} neighbour draws without a hit, drawing among {} unlinked",
                room_id,
                attempts,
                unlinked.len()
            );
        }

        Ok(unlinked[random.next_index(unlinked.len())])
    }

    /// Opens the pair of doors facing each other between two neighbours. Both
    /// doors are checked before either is touched.
    pub(super) fn open_link(
        rooms: &mut [RoomInstance],
        room_id: RoomId,
        neighbour_id: RoomId,
    ) -> Result<(), DungeonError> {
        let room = rooms
            .get(room_id)
            .ok_or(InvariantViolation::UnknownRoom(room_id))?;
        let neighbour = rooms
            .get(neighbour_id)
            .ok_or(InvariantViolation::UnknownRoom(neighbour_id))?;

        let direction =
            room.direction_to(neighbour_id)
                .ok_or(InvariantViolation::AsymmetricNeighbours {
                    room: room_id,
                    neighbour: neighbour_id,
                })?;

        for (side, facing) in [(room, direction), (neighbour, direction.reverse())] {
            if side.door_facing(facing).is_none() {
                return Err(ContentError::MissingDoor {
                    coordinate: side.coordinate(),
                    alias: side.template_alias().to_string(),
                    direction: facing,
                }
                .into());
            }
        }

        rooms[room_id].open_door(direction);
        rooms[neighbour_id].open_door(direction.reverse());

        event!(
            Level::TRACE,
            "Opened {} door of room {} towards room {}",
            direction,
            room_id,
            neighbour_id
        );

        Ok(())
    }
}
