use super::DungeonBuilder;
use crate::{
    algos::RandomSource,
    error::{DungeonError, InvariantViolation},
    graph::{VisitedSet, link_groups},
    types::{RoomId, RoomInstance},
};

use tracing::{Level, event};

impl DungeonBuilder<'_> {
    /// Opens extra links until every room can be reached from the seed room.
    /// Each round links the seed room's group to one room outside of it,
    /// drawn uniformly from every such neighbouring pair.
    pub(super) fn join_groups<R>(
        rooms: &mut [RoomInstance],
        random: &mut R,
    ) -> Result<(), DungeonError>
    where
        R: RandomSource + ?Sized,
    {
        let mut room_groups = link_groups(rooms);

        if room_groups.len() > 1 {
            event!(
                Level::DEBUG,
                "Joining {} disconnected groups of rooms",
                room_groups.len()
            );
        }

        let mut bridges: Vec<(RoomId, RoomId)> = Vec::new();

        while room_groups.len() > 1 {
            let mut seed_group = VisitedSet::new();
            for room_id in room_groups[0].iter() {
                seed_group.insert(*room_id);
            }

            for room_id in room_groups[0].iter().copied() {
                for (_, neighbour_id) in rooms[room_id].neighbours() {
                    if !seed_group.contains(neighbour_id) {
                        bridges.push((room_id, neighbour_id));
                    }
                }
            }

            if bridges.is_empty() {
                return Err(InvariantViolation::IsolatedGroup {
                    size: rooms.len() - room_groups[0].len(),
                }
                .into());
            }

            let (room_id, neighbour_id) = bridges[random.next_index(bridges.len())];
            Self::open_link(rooms, room_id, neighbour_id)?;
            bridges.clear();

            room_groups = link_groups(rooms);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::super::test_support::rooms_at;
    use super::*;
    use crate::{
        algos::{ConnectivityMode, DungeonBuilderConfig, RngSource, ScriptedRandom},
        graph::rooms_linked,
    };

    fn resolved(coordinates: &[(i32, i32)]) -> Vec<RoomInstance> {
        let (grid, mut rooms) = rooms_at(coordinates, None);
        DungeonBuilder::link_neighbours(&grid, &mut rooms).unwrap();
        rooms
    }

    #[test]
    fn test_join_unlinked_line() {
        let mut rooms = resolved(&[(0, 0), (1, 0), (2, 0)]);
        let mut random = ScriptedRandom::constant(0);

        DungeonBuilder::join_groups(&mut rooms, &mut random).unwrap();

        assert!(rooms_linked(&rooms, 0, 1));
        assert!(rooms_linked(&rooms, 1, 2));
        assert_eq!(link_groups(&rooms).len(), 1);
        assert_eq!(random.draws(), 2);
    }

    #[test]
    fn test_connected_rooms_need_no_draws() {
        let mut rooms = resolved(&[(0, 0)]);
        let mut random = ScriptedRandom::constant(0);

        DungeonBuilder::join_groups(&mut rooms, &mut random).unwrap();

        assert_eq!(random.draws(), 0);
        assert_eq!(rooms[0].open_door_count(), 0);
    }

    #[test]
    fn test_unreachable_room_is_reported() {
        // Nothing touches (2, 0) so it can never be linked
        let mut rooms = resolved(&[(0, 0), (2, 0)]);

        let result = DungeonBuilder::join_groups(&mut rooms, &mut ScriptedRandom::constant(0));

        assert!(matches!(
            result,
            Err(DungeonError::Invariant(InvariantViolation::IsolatedGroup { size: 1 }))
        ));
    }

    #[test]
    fn test_spanning_mode_reaches_every_room() {
        /*
           # # #
           # . #
           @ # #
        */
        let coordinates = [
            (0, 0),
            (1, 0),
            (2, 0),
            (0, 1),
            (2, 1),
            (0, 2),
            (1, 2),
            (2, 2),
        ];
        let config = DungeonBuilderConfig::with_connectivity(ConnectivityMode::Spanning);

        for seed in 0..30 {
            let mut rooms = resolved(&coordinates);

            DungeonBuilder::open_connections(&mut rooms, &config, &mut RngSource::seeded(seed))
                .unwrap();

            assert_eq!(link_groups(&rooms).len(), 1);
        }
    }
}
