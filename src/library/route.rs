//! Path based classification of instance documents.
//!
//! Routing never looks at the payload: the category and nesting level of a
//! document are fully determined by its logical path.

use crate::models::LogicalPath;

/// Where a document belongs inside the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Term { terminology: String, basename: String },
    ContentType { basename: String },
    License { basename: String },
    Common { common_type: String, basename: String },
    BrainAtlas { atlas: String, slot: AtlasSlot },
    CoordinateSpace { space: String, slot: SpaceSlot },
}

/// Position of a document inside a brain atlas group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtlasSlot {
    Definition,
    ParcellationEntity(String),
    Version { version: String, slot: VersionSlot },
    /// The group is referenced but the document fits no slot.
    GroupOnly,
}

/// Position of a document inside a brain atlas version group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSlot {
    Definition,
    ParcellationEntity(String),
    GroupOnly,
}

/// Position of a document inside a coordinate space group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceSlot {
    Definition,
    Version(String),
    GroupOnly,
}

/// Classify a logical path. Returns `None` for unknown categories.
pub fn classify(path: &LogicalPath) -> Option<Route> {
    let basename = path.basename().to_string();

    match (path.segment(0)?, path.segment(1)) {
        ("terminologies", Some(terminology)) => Some(Route::Term {
            terminology: terminology.to_string(),
            basename,
        }),
        ("contentTypes", _) => Some(Route::ContentType { basename }),
        ("licenses", _) => Some(Route::License { basename }),
        ("graphStructures", Some("common")) => Some(Route::Common {
            common_type: path.segment(2)?.to_string(),
            basename,
        }),
        ("graphStructures", Some("brainAtlases")) => classify_brain_atlas(path),
        ("graphStructures", Some("commonCoordinateSpaces")) => classify_coordinate_space(path),
        _ => None,
    }
}

fn classify_brain_atlas(path: &LogicalPath) -> Option<Route> {
    let atlas = path.segment(2)?.to_string();
    let basename = path.basename();

    let slot = if basename == atlas {
        AtlasSlot::Definition
    } else if path.contains(&format!("/parcellationEntities/{}", atlas)) {
        AtlasSlot::ParcellationEntity(basename.to_string())
    } else if path.contains(&format!("/versions/{}", atlas)) {
        match path.segment(4) {
            Some(version) => AtlasSlot::Version {
                version: version.to_string(),
                slot: classify_atlas_version(path, version),
            },
            None => AtlasSlot::GroupOnly,
        }
    } else {
        AtlasSlot::GroupOnly
    };

    Some(Route::BrainAtlas { atlas, slot })
}

fn classify_atlas_version(path: &LogicalPath, version: &str) -> VersionSlot {
    let basename = path.basename();
    let version_id = version.rsplit('_').next().unwrap_or(version);

    if basename == version {
        VersionSlot::Definition
    } else if path.contains(&format!("/parcellationEntities_{}/", version_id)) {
        VersionSlot::ParcellationEntity(basename.to_string())
    } else {
        VersionSlot::GroupOnly
    }
}

fn classify_coordinate_space(path: &LogicalPath) -> Option<Route> {
    let space = path.segment(2)?.to_string();
    let basename = path.basename();

    let slot = if basename == space {
        SpaceSlot::Definition
    } else if path.contains(&format!("versions/{}", space)) {
        SpaceSlot::Version(basename.to_string())
    } else {
        SpaceSlot::GroupOnly
    };

    Some(Route::CoordinateSpace { space, slot })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(path: &str) -> Option<Route> {
        classify(&LogicalPath::parse(path))
    }

    #[test]
    fn test_classify_flat_categories() {
        assert_eq!(
            route("terminologies/species/mouse"),
            Some(Route::Term {
                terminology: "species".to_string(),
                basename: "mouse".to_string()
            })
        );
        assert_eq!(
            route("contentTypes/application_json"),
            Some(Route::ContentType {
                basename: "application_json".to_string()
            })
        );
        assert_eq!(
            route("licenses/CC-BY-4.0"),
            Some(Route::License {
                basename: "CC-BY-4.0".to_string()
            })
        );
    }

    #[test]
    fn test_classify_unknown_prefix() {
        assert_eq!(route("schemas/core/person"), None);
        assert_eq!(route("graphStructures/unknown/x/y"), None);
        assert_eq!(route("terminologiesExtra/species/mouse"), None);
        assert_eq!(route(""), None);
    }

    #[test]
    fn test_classify_common_does_not_match_coordinate_spaces() {
        assert_eq!(
            route("graphStructures/common/organization/ebrains"),
            Some(Route::Common {
                common_type: "organization".to_string(),
                basename: "ebrains".to_string()
            })
        );
        assert!(matches!(
            route("graphStructures/commonCoordinateSpaces/MNI/MNI"),
            Some(Route::CoordinateSpace { .. })
        ));
    }

    #[test]
    fn test_classify_brain_atlas_levels() {
        assert_eq!(
            route("graphStructures/brainAtlases/Allen/Allen"),
            Some(Route::BrainAtlas {
                atlas: "Allen".to_string(),
                slot: AtlasSlot::Definition
            })
        );
        assert_eq!(
            route("graphStructures/brainAtlases/Allen/parcellationEntities/Allen_CA1"),
            Some(Route::BrainAtlas {
                atlas: "Allen".to_string(),
                slot: AtlasSlot::ParcellationEntity("Allen_CA1".to_string())
            })
        );
        assert_eq!(
            route("graphStructures/brainAtlases/Allen/versions/Allen_v1/Allen_v1"),
            Some(Route::BrainAtlas {
                atlas: "Allen".to_string(),
                slot: AtlasSlot::Version {
                    version: "Allen_v1".to_string(),
                    slot: VersionSlot::Definition
                }
            })
        );
        assert_eq!(
            route("graphStructures/brainAtlases/Allen/versions/Allen_v1/parcellationEntities_v1/Allen_v1_CA1"),
            Some(Route::BrainAtlas {
                atlas: "Allen".to_string(),
                slot: AtlasSlot::Version {
                    version: "Allen_v1".to_string(),
                    slot: VersionSlot::ParcellationEntity("Allen_v1_CA1".to_string())
                }
            })
        );
    }

    #[test]
    fn test_classify_brain_atlas_unmatched_child_keeps_group() {
        assert_eq!(
            route("graphStructures/brainAtlases/Allen/other/thing"),
            Some(Route::BrainAtlas {
                atlas: "Allen".to_string(),
                slot: AtlasSlot::GroupOnly
            })
        );
        assert_eq!(
            route("graphStructures/brainAtlases/Allen/versions/Allen_v2/notes/readme"),
            Some(Route::BrainAtlas {
                atlas: "Allen".to_string(),
                slot: AtlasSlot::Version {
                    version: "Allen_v2".to_string(),
                    slot: VersionSlot::GroupOnly
                }
            })
        );
    }

    #[test]
    fn test_classify_coordinate_space() {
        assert_eq!(
            route("graphStructures/commonCoordinateSpaces/MNI152/MNI152"),
            Some(Route::CoordinateSpace {
                space: "MNI152".to_string(),
                slot: SpaceSlot::Definition
            })
        );
        assert_eq!(
            route("graphStructures/commonCoordinateSpaces/MNI152/versions/MNI152_2009a"),
            Some(Route::CoordinateSpace {
                space: "MNI152".to_string(),
                slot: SpaceSlot::Version("MNI152_2009a".to_string())
            })
        );
    }
}
