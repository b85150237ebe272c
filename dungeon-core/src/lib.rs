mod algos;
mod constants;
mod content;
mod error;
mod graph;
mod types;

use tracing::{Level, event, span};

pub use algos::{ConnectivityMode, DungeonBuilderConfig, RandomSource, RngSource, ScriptedRandom};
pub use constants::DEFAULT_DUNGEON_ID;
pub use content::{
    ContentFile, DungeonConfig, ResolvedTemplate, RoomCatalog, RoomTemplate, StaticCatalog,
    TemplateSet,
};
pub use error::{ConfigurationError, ContentError, DungeonError, InvariantViolation};
pub use graph::{DungeonGraph, OccupancyGrid};
pub use types::{
    Direction, DoorSlot, DoorState, Footprint, GridCoordinate, RoomId, RoomInstance, RoomPhase,
    WorldPosition,
};

/// Generates one dungeon for `config`, local connectivity only.
pub fn create_dungeon<C, R>(
    config: &DungeonConfig,
    catalog: &C,
    random: &mut R,
) -> Result<DungeonGraph, DungeonError>
where
    C: RoomCatalog + ?Sized,
    R: RandomSource + ?Sized,
{
    create_dungeon_with(config, catalog, random, &DungeonBuilderConfig::default())
}

/// Generates one dungeon for `config`. The result is a pure function of the
/// config, the templates `catalog` resolves and the values `random` yields.
pub fn create_dungeon_with<C, R>(
    config: &DungeonConfig,
    catalog: &C,
    random: &mut R,
    builder_config: &DungeonBuilderConfig,
) -> Result<DungeonGraph, DungeonError>
where
    C: RoomCatalog + ?Sized,
    R: RandomSource + ?Sized,
{
    let span = span!(Level::DEBUG, "create_dungeon", id = config.id.as_str());
    let _guard = span.enter();

    config.validate()?;

    let templates = TemplateSet::resolve(config, catalog)?;
    event!(
        Level::DEBUG,
        "Resolved {} room templates for dungeon {}",
        templates.len(),
        config.id
    );

    algos::DungeonBuilder::new(config, &templates).build(builder_config, random)
}
