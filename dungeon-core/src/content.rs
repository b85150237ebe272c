use crate::{
    constants::MAX_ROOMS,
    error::{ConfigurationError, ContentError},
    types::{Direction, Footprint},
};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{Level, event};

/// Which rooms a dungeon may use and how many of them to place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DungeonConfig {
    pub id: String,
    pub room_aliases: Vec<String>,
    pub min_rooms: u32,
    pub max_rooms: u32,
}

impl DungeonConfig {
    pub fn new(id: &str, room_aliases: &[&str], min_rooms: u32, max_rooms: u32) -> Self {
        DungeonConfig {
            id: id.to_string(),
            room_aliases: room_aliases.iter().map(|alias| alias.to_string()).collect(),
            min_rooms,
            max_rooms,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.room_aliases.is_empty() {
            return Err(ConfigurationError::EmptyAliasList {
                id: self.id.clone(),
            });
        }

        if self.min_rooms == 0 || self.max_rooms == 0 {
            return Err(ConfigurationError::NonPositiveRoomCount {
                id: self.id.clone(),
                min: self.min_rooms,
                max: self.max_rooms,
            });
        }

        if self.min_rooms > self.max_rooms {
            return Err(ConfigurationError::MinExceedsMax {
                id: self.id.clone(),
                min: self.min_rooms,
                max: self.max_rooms,
            });
        }

        if self.max_rooms > MAX_ROOMS {
            return Err(ConfigurationError::TooManyRooms {
                id: self.id.clone(),
                max: self.max_rooms,
                limit: MAX_ROOMS,
            });
        }

        Ok(())
    }
}

/// What the generator needs to know about a room's visual template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTemplate {
    pub footprint_width: f32,
    pub footprint_depth: f32,
    pub door_directions: Vec<Direction>,
}

impl RoomTemplate {
    pub fn new(footprint_width: f32, footprint_depth: f32, door_directions: &[Direction]) -> Self {
        RoomTemplate {
            footprint_width,
            footprint_depth,
            door_directions: door_directions.to_vec(),
        }
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.footprint_width, self.footprint_depth)
    }
}

/// Resolves room aliases into templates.
pub trait RoomCatalog {
    fn resolve_template(&self, alias: &str) -> Result<RoomTemplate, ContentError>;
}

impl<C: RoomCatalog + ?Sized> RoomCatalog for &C {
    fn resolve_template(&self, alias: &str) -> Result<RoomTemplate, ContentError> {
        (**self).resolve_template(alias)
    }
}

/// In-memory [RoomCatalog] keyed by alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticCatalog {
    templates: BTreeMap<String, RoomTemplate>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, alias: &str, template: RoomTemplate) -> Self {
        self.insert(alias, template);
        self
    }

    pub fn insert(&mut self, alias: &str, template: RoomTemplate) -> Option<RoomTemplate> {
        self.templates.insert(alias.to_string(), template)
    }
}

impl RoomCatalog for StaticCatalog {
    fn resolve_template(&self, alias: &str) -> Result<RoomTemplate, ContentError> {
        self.templates
            .get(alias)
            .cloned()
            .ok_or_else(|| ContentError::UnknownTemplate(alias.to_string()))
    }
}

/// A content document: the registry of dungeon configs plus the room
/// templates they refer to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub dungeons: Vec<DungeonConfig>,
    #[serde(default)]
    pub rooms: StaticCatalog,
}

impl ContentFile {
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get_config(&self, id: &str) -> Result<&DungeonConfig, ConfigurationError> {
        self.dungeons
            .iter()
            .find(|config| config.id == id)
            .ok_or_else(|| ConfigurationError::UnknownConfig(id.to_string()))
    }
}

impl RoomCatalog for ContentFile {
    fn resolve_template(&self, alias: &str) -> Result<RoomTemplate, ContentError> {
        self.rooms.resolve_template(alias)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTemplate {
    alias: String,
    template: RoomTemplate,
}

impl ResolvedTemplate {
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn template(&self) -> &RoomTemplate {
        &self.template
    }
}

/// The templates a generation run picks rooms from, each alias resolved once.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSet {
    templates: Vec<ResolvedTemplate>,
}

impl TemplateSet {
    /// Resolves every alias of `config` through `catalog`. Aliases listed more
    /// than once are resolved a single time and keep their first position.
    pub fn resolve<C>(config: &DungeonConfig, catalog: &C) -> Result<Self, ContentError>
    where
        C: RoomCatalog + ?Sized,
    {
        let mut resolved: Vec<(String, RoomTemplate)> =
            Vec::with_capacity(config.room_aliases.len());

        for alias in config.room_aliases.iter() {
            if resolved.iter().any(|(seen, _)| seen == alias) {
                continue;
            }

            let template = catalog.resolve_template(alias)?;
            event!(
                Level::TRACE,
                "Resolved room template {} ({} x {}, {} doors)",
                alias,
                template.footprint_width,
                template.footprint_depth,
                template.door_directions.len()
            );

            resolved.push((alias.clone(), template));
        }

        Self::from_templates(resolved)
    }

    /// Builds a set from templates the caller already loaded, e.g. through an
    /// asynchronous asset provider.
    pub fn from_templates<I>(templates: I) -> Result<Self, ContentError>
    where
        I: IntoIterator<Item = (String, RoomTemplate)>,
    {
        let templates = templates
            .into_iter()
            .map(|(alias, template)| {
                let footprint = template.footprint();

                if !footprint.is_valid() {
                    return Err(ContentError::InvalidFootprint {
                        alias,
                        width: footprint.width,
                        depth: footprint.depth,
                    });
                }

                Ok(ResolvedTemplate { alias, template })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if templates.is_empty() {
            return Err(ContentError::NoTemplates);
        }

        Ok(TemplateSet { templates })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResolvedTemplate> {
        self.templates.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedTemplate> {
        self.templates.iter()
    }

    /// Grid spacing large enough for any template in the set.
    pub fn pitch(&self) -> Footprint {
        self.templates
            .iter()
            .map(|resolved| resolved.template.footprint())
            .fold(Footprint::new(0.0, 0.0), |acc, footprint| {
                acc.union(&footprint)
            })
    }
}

#[cfg(test)]
pub(crate) fn test_templates() -> TemplateSet {
    use crate::constants::DIRECTIONS;

    TemplateSet::from_templates([(
        "stone_room_1".to_string(),
        RoomTemplate::new(12.0, 10.0, &DIRECTIONS),
    )])
    .unwrap()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::DIRECTIONS;

    const CONTENT: &str = r#"{
        "dungeons": [
            {
                "id": "conf_dungeon_1",
                "roomAliases": ["stone_room_1", "stone_room_2", "stone_room_1"],
                "minRooms": 10,
                "maxRooms": 20
            }
        ],
        "rooms": {
            "stone_room_1": {
                "footprintWidth": 12.0,
                "footprintDepth": 12.0,
                "doorDirections": ["north", "east", "south", "west"]
            },
            "stone_room_2": {
                "footprintWidth": 16.0,
                "footprintDepth": 8.0,
                "doorDirections": ["east", "west"]
            }
        }
    }"#;

    #[test]
    fn test_validate_config() {
        assert!(DungeonConfig::new("ok", &["a"], 1, 1).validate().is_ok());

        assert!(matches!(
            DungeonConfig::new("empty", &[], 1, 2).validate(),
            Err(ConfigurationError::EmptyAliasList { .. })
        ));
        assert!(matches!(
            DungeonConfig::new("zero", &["a"], 0, 2).validate(),
            Err(ConfigurationError::NonPositiveRoomCount { .. })
        ));
        assert!(matches!(
            DungeonConfig::new("inverted", &["a"], 5, 3).validate(),
            Err(ConfigurationError::MinExceedsMax { min: 5, max: 3, .. })
        ));

        assert!(DungeonConfig::new("largest", &["a"], 1, MAX_ROOMS).validate().is_ok());
        assert!(matches!(
            DungeonConfig::new("huge", &["a"], u32::MAX, u32::MAX).validate(),
            Err(ConfigurationError::TooManyRooms { max: u32::MAX, limit: MAX_ROOMS, .. })
        ));
        assert!(matches!(
            DungeonConfig::new("over", &["a"], 10, MAX_ROOMS + 1).validate(),
            Err(ConfigurationError::TooManyRooms { .. })
        ));
    }

    #[test]
    fn test_content_file_lookup() {
        let content = ContentFile::from_json(CONTENT).unwrap();

        let config = content.get_config("conf_dungeon_1").unwrap();
        assert_eq!(config.min_rooms, 10);
        assert_eq!(config.max_rooms, 20);

        assert!(matches!(
            content.get_config("conf_dungeon_2"),
            Err(ConfigurationError::UnknownConfig(id)) if id == "conf_dungeon_2"
        ));

        let template = content.resolve_template("stone_room_2").unwrap();
        assert_eq!(template.door_directions, vec![Direction::East, Direction::West]);
    }

    #[test]
    fn test_content_file_rejects_malformed_json() {
        let result = ContentFile::from_json(r#"{ "dungeons": [ { "id": 3 } ] }"#);
        assert!(matches!(result, Err(ConfigurationError::Malformed(_))));
    }

    #[test]
    fn test_template_set_resolves_each_alias_once() {
        let content = ContentFile::from_json(CONTENT).unwrap();
        let config = content.get_config("conf_dungeon_1").unwrap();

        let templates = TemplateSet::resolve(config, &content).unwrap();

        assert!(!templates.is_empty());
        let aliases = templates.iter().map(|t| t.alias()).collect::<Vec<_>>();
        assert_eq!(aliases, vec!["stone_room_1", "stone_room_2"]);
        assert_eq!(templates.pitch(), Footprint::new(16.0, 12.0));
    }

    #[test]
    fn test_template_set_unknown_alias() {
        let catalog = StaticCatalog::new()
            .with_template("stone_room_1", RoomTemplate::new(1.0, 1.0, &DIRECTIONS));
        let config = DungeonConfig::new("test", &["stone_room_1", "lava_room"], 1, 3);

        let result = TemplateSet::resolve(&config, &catalog);
        assert!(matches!(
            result,
            Err(ContentError::UnknownTemplate(alias)) if alias == "lava_room"
        ));
    }

    #[test]
    fn test_template_set_rejects_invalid_footprint() {
        let result = TemplateSet::from_templates([(
            "flat_room".to_string(),
            RoomTemplate::new(0.0, 4.0, &DIRECTIONS),
        )]);
        assert!(matches!(result, Err(ContentError::InvalidFootprint { .. })));

        let result = TemplateSet::from_templates([(
            "nan_room".to_string(),
            RoomTemplate::new(f32::NAN, 4.0, &DIRECTIONS),
        )]);
        assert!(matches!(result, Err(ContentError::InvalidFootprint { .. })));
    }

    #[test]
    fn test_template_set_requires_templates() {
        let result = TemplateSet::from_templates(Vec::new());
        assert!(matches!(result, Err(ContentError::NoTemplates)));
    }
}
