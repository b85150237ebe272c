use super::RandomSource;
use crate::{
    content::{DungeonConfig, TemplateSet},
    error::DungeonError,
    graph::DungeonGraph,
};

use tracing::{Level, event};

mod builder_config;
mod join_groups;
mod link_neighbours;
mod open_connections;
mod place_rooms;

pub use builder_config::{ConnectivityMode, DungeonBuilderConfig};

/// Runs one generation: placement, then neighbour resolution, then door
/// planning. Each phase consumes the complete output of the previous one.
/// The config must already be validated.
pub(crate) struct DungeonBuilder<'a> {
    config: &'a DungeonConfig,
    templates: &'a TemplateSet,
}

impl<'a> DungeonBuilder<'a> {
    pub(crate) fn new(config: &'a DungeonConfig, templates: &'a TemplateSet) -> Self {
        DungeonBuilder { config, templates }
    }

    pub(crate) fn build<R>(
        &self,
        builder_config: &DungeonBuilderConfig,
        random: &mut R,
    ) -> Result<DungeonGraph, DungeonError>
    where
        R: RandomSource + ?Sized,
    {
        let build_start = std::time::Instant::now();

        let (grid, mut rooms) = self.place_rooms(random)?;

        let placement_time = std::time::Instant::now();
        event!(
            Level::DEBUG,
            "Placed {} rooms on a grid of side {} in {:.2}ms",
            rooms.len(),
            grid.side(),
            placement_time.duration_since(build_start).as_millis()
        );

        Self::link_neighbours(&grid, &mut rooms)?;

        let neighbours_time = std::time::Instant::now();
        event!(
            Level::DEBUG,
            "Resolved neighbours in {:.2}ms",
            neighbours_time.duration_since(placement_time).as_millis()
        );

        Self::open_connections(&mut rooms, builder_config, random)?;

        let connections_time = std::time::Instant::now();
        event!(
            Level::DEBUG,
            "Opened connections in {:.2}ms",
            connections_time.duration_since(neighbours_time).as_millis()
        );

        let graph = DungeonGraph::new(&self.config.id, self.templates.pitch(), grid, rooms);

        event!(
            Level::DEBUG,
            "Built dungeon {} with {} rooms and {} connections in {:.2}ms total",
            graph.id(),
            graph.len(),
            graph.open_connections().len(),
            connections_time.duration_since(build_start).as_millis()
        );

        Ok(graph)
    }
}

#[cfg(test)]
pub(super) mod test_support {
    use crate::{
        constants::DIRECTIONS,
        graph::OccupancyGrid,
        types::{Direction, Footprint, GridCoordinate, RoomInstance, WorldPosition},
    };

    /// Places rooms on the given cells in order, every room with a door on
    /// each side unless `doors` says otherwise.
    pub fn rooms_at(
        coordinates: &[(i32, i32)],
        doors: Option<&[Direction]>,
    ) -> (OccupancyGrid, Vec<RoomInstance>) {
        let mut grid = OccupancyGrid::new(coordinates.len().max(3));
        let mut rooms = Vec::with_capacity(coordinates.len());

        for (id, (x, y)) in coordinates.iter().enumerate() {
            let coordinate = GridCoordinate::new(*x, *y);
            grid.occupy(coordinate, id).unwrap();
            rooms.push(RoomInstance::new(
                id,
                coordinate,
                "stone_room_1",
                Footprint::new(1.0, 1.0),
                WorldPosition::ZERO,
                doors.unwrap_or(&DIRECTIONS),
            ));
        }

        (grid, rooms)
    }
}
