use crate::constants::LINK_DRAW_BUDGET;

use serde::{Deserialize, Serialize};

/// How far the door planner goes in connecting the dungeon.
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectivityMode {
    /// Every room gets its minimum number of open doorways, nothing more.
    /// Parts of the dungeon may end up unreachable from each other.
    #[default]
    LocalMinimum,
    /// On top of the local minimum, doors are opened between groups until
    /// every room is reachable from the seed room.
    Spanning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DungeonBuilderConfig {
    pub connectivity: ConnectivityMode,
    // Random neighbour draws allowed per neighbour of a room before the
    // planner picks straight from the neighbours that aren't linked yet.
    pub link_draw_budget: u32,
}

impl Default for DungeonBuilderConfig {
    fn default() -> Self {
        DungeonBuilderConfig {
            connectivity: ConnectivityMode::default(),
            link_draw_budget: LINK_DRAW_BUDGET,
        }
    }
}

impl DungeonBuilderConfig {
    pub fn with_connectivity(connectivity: ConnectivityMode) -> Self {
        DungeonBuilderConfig {
            connectivity,
            ..Self::default()
        }
    }
}
