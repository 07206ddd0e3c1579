//! Folding instance documents into the library aggregate.

use super::route::{classify, AtlasSlot, Route, SpaceSlot, VersionSlot};
use crate::models::InputDocument;
use std::collections::BTreeMap;
use tracing::debug;

/// Documents keyed by basename.
pub type DocumentMap = BTreeMap<String, InputDocument>;

/// A brain atlas with its parcellation entities and versions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtlasGroup {
    pub atlas: Option<InputDocument>,
    pub parcellation_entities: DocumentMap,
    pub versions: BTreeMap<String, AtlasVersionGroup>,
}

/// One version of a brain atlas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtlasVersionGroup {
    pub atlas: Option<InputDocument>,
    pub parcellation_entities: DocumentMap,
}

/// A common coordinate space with its versions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpaceGroup {
    pub space: Option<InputDocument>,
    pub versions: DocumentMap,
}

/// The aggregate of all ingested documents, grouped by category.
///
/// Every map is a `BTreeMap`, so iteration is lexicographic regardless of
/// the order files were ingested in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    pub terminologies: BTreeMap<String, DocumentMap>,
    pub content_types: DocumentMap,
    pub licenses: DocumentMap,
    pub brain_atlases: BTreeMap<String, AtlasGroup>,
    pub common_coordinate_spaces: BTreeMap<String, SpaceGroup>,
    pub common: BTreeMap<String, DocumentMap>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a common type so its documents are collected.
    ///
    /// Documents under `graphStructures/common/<type>` are only kept for
    /// types registered here.
    pub fn seed_common_type(&mut self, common_type: impl Into<String>) {
        self.common.entry(common_type.into()).or_default();
    }

    /// Classify a document by its path and store it in its slot.
    ///
    /// Documents outside the known categories are dropped.
    pub fn ingest(&mut self, document: InputDocument) {
        let Some(route) = classify(&document.path) else {
            debug!("Skipping unclassified document: {}", document.path);
            return;
        };

        debug!("Routing {} -> {:?}", document.path, route);

        match route {
            Route::Term {
                terminology,
                basename,
            } => {
                self.terminologies
                    .entry(terminology)
                    .or_default()
                    .insert(basename, document);
            }
            Route::ContentType { basename } => {
                self.content_types.insert(basename, document);
            }
            Route::License { basename } => {
                self.licenses.insert(basename, document);
            }
            Route::Common {
                common_type,
                basename,
            } => match self.common.get_mut(&common_type) {
                Some(documents) => {
                    documents.insert(basename, document);
                }
                None => debug!("Common type `{}` not registered, dropping {}", common_type, basename),
            },
            Route::BrainAtlas { atlas, slot } => {
                let group = self.brain_atlases.entry(atlas).or_default();
                match slot {
                    AtlasSlot::Definition => group.atlas = Some(document),
                    AtlasSlot::ParcellationEntity(basename) => {
                        group.parcellation_entities.insert(basename, document);
                    }
                    AtlasSlot::Version { version, slot } => {
                        let version_group = group.versions.entry(version).or_default();
                        match slot {
                            VersionSlot::Definition => version_group.atlas = Some(document),
                            VersionSlot::ParcellationEntity(basename) => {
                                version_group.parcellation_entities.insert(basename, document);
                            }
                            VersionSlot::GroupOnly => {}
                        }
                    }
                    AtlasSlot::GroupOnly => {}
                }
            }
            Route::CoordinateSpace { space, slot } => {
                let group = self.common_coordinate_spaces.entry(space).or_default();
                match slot {
                    SpaceSlot::Definition => group.space = Some(document),
                    SpaceSlot::Version(basename) => {
                        group.versions.insert(basename, document);
                    }
                    SpaceSlot::GroupOnly => {}
                }
            }
        }
    }

    /// Number of documents per category, for summaries.
    pub fn counts(&self) -> LibraryCounts {
        let atlas_versions = self.brain_atlases.values().flat_map(|g| g.versions.values());

        LibraryCounts {
            terminologies: self.terminologies.len(),
            terms: self.terminologies.values().map(BTreeMap::len).sum(),
            content_types: self.content_types.len(),
            licenses: self.licenses.len(),
            brain_atlases: self.brain_atlases.len(),
            atlas_versions: atlas_versions.clone().count(),
            parcellation_entities: self
                .brain_atlases
                .values()
                .map(|g| g.parcellation_entities.len())
                .chain(atlas_versions.map(|v| v.parcellation_entities.len()))
                .sum(),
            common_coordinate_spaces: self.common_coordinate_spaces.len(),
            space_versions: self
                .common_coordinate_spaces
                .values()
                .map(|g| g.versions.len())
                .sum(),
        }
    }

    /// Groups whose defining document was never ingested, as
    /// `category/name` (or `category/name/version`) labels.
    pub fn incomplete_groups(&self) -> Vec<String> {
        let mut missing = Vec::new();

        for (name, group) in &self.brain_atlases {
            if group.atlas.is_none() {
                missing.push(format!("brainAtlases/{}", name));
            }
            for (version, version_group) in &group.versions {
                if version_group.atlas.is_none() {
                    missing.push(format!("brainAtlases/{}/{}", name, version));
                }
            }
        }

        for (name, group) in &self.common_coordinate_spaces {
            if group.space.is_none() {
                missing.push(format!("commonCoordinateSpaces/{}", name));
            }
        }

        missing
    }
}

/// Summary statistics of a library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryCounts {
    pub terminologies: usize,
    pub terms: usize,
    pub content_types: usize,
    pub licenses: usize,
    pub brain_atlases: usize,
    pub atlas_versions: usize,
    pub parcellation_entities: usize,
    pub common_coordinate_spaces: usize,
    pub space_versions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogicalPath;
    use serde_json::json;

    fn doc(path: &str) -> InputDocument {
        InputDocument::new(
            LogicalPath::parse(path),
            json!({ "@id": format!("https://example.org/{}", path) }),
        )
    }

    #[test]
    fn test_ingest_terminology_term() {
        let mut library = Library::new();
        library.ingest(doc("terminologies/species/mouse"));
        library.ingest(doc("terminologies/species/rat"));

        let species = &library.terminologies["species"];
        assert_eq!(species.len(), 2);
        assert!(species.contains_key("mouse"));
        assert!(species.contains_key("rat"));
    }

    #[test]
    fn test_ingest_is_idempotent() {
        let mut once = Library::new();
        once.ingest(doc("licenses/CC0"));

        let mut twice = Library::new();
        twice.ingest(doc("licenses/CC0"));
        twice.ingest(doc("licenses/CC0"));

        assert_eq!(once, twice);
        assert_eq!(twice.licenses.len(), 1);
    }

    #[test]
    fn test_ingest_unknown_prefix_is_dropped() {
        let mut library = Library::new();
        library.ingest(doc("schemas/core/person"));
        assert_eq!(library, Library::new());
    }

    #[test]
    fn test_common_requires_seeded_type() {
        let mut library = Library::new();
        library.ingest(doc("graphStructures/common/organization/ebrains"));
        assert!(library.common.is_empty());

        library.seed_common_type("organization");
        library.ingest(doc("graphStructures/common/organization/ebrains"));
        assert!(library.common["organization"].contains_key("ebrains"));
    }

    #[test]
    fn test_atlas_definer_and_version_in_any_order() {
        let definer = "graphStructures/brainAtlases/Allen/Allen";
        let version = "graphStructures/brainAtlases/Allen/versions/Allen_v1/Allen_v1";

        let mut forward = Library::new();
        forward.ingest(doc(definer));
        forward.ingest(doc(version));

        let mut backward = Library::new();
        backward.ingest(doc(version));
        backward.ingest(doc(definer));

        for library in [&forward, &backward] {
            let group = &library.brain_atlases["Allen"];
            assert!(group.atlas.is_some());
            assert!(group.versions["Allen_v1"].atlas.is_some());
        }
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_atlas_group_created_by_child_only() {
        let mut library = Library::new();
        library.ingest(doc(
            "graphStructures/brainAtlases/Allen/parcellationEntities/Allen_CA1",
        ));

        let group = &library.brain_atlases["Allen"];
        assert!(group.atlas.is_none());
        assert!(group.parcellation_entities.contains_key("Allen_CA1"));
    }

    #[test]
    fn test_atlas_version_parcellation_entities() {
        let mut library = Library::new();
        library.ingest(doc(
            "graphStructures/brainAtlases/Allen/versions/Allen_v3/parcellationEntities_v3/Allen_v3_CA1",
        ));

        let version = &library.brain_atlases["Allen"].versions["Allen_v3"];
        assert!(version.atlas.is_none());
        assert!(version.parcellation_entities.contains_key("Allen_v3_CA1"));
    }

    #[test]
    fn test_coordinate_space_versions() {
        let mut library = Library::new();
        library.ingest(doc("graphStructures/commonCoordinateSpaces/MNI152/versions/MNI152_2009a"));
        library.ingest(doc("graphStructures/commonCoordinateSpaces/MNI152/MNI152"));

        let group = &library.common_coordinate_spaces["MNI152"];
        assert!(group.space.is_some());
        assert!(group.versions.contains_key("MNI152_2009a"));
    }

    #[test]
    fn test_counts() {
        let mut library = Library::new();
        library.ingest(doc("terminologies/species/mouse"));
        library.ingest(doc("terminologies/dataType/voxelData"));
        library.ingest(doc("terminologies/dataType/table"));
        library.ingest(doc("contentTypes/nifti"));

        let counts = library.counts();
        assert_eq!(counts.terminologies, 2);
        assert_eq!(counts.terms, 3);
        assert_eq!(counts.content_types, 1);
        assert_eq!(counts.licenses, 0);
    }

    #[test]
    fn test_counts_nested_groups() {
        let mut library = Library::new();
        library.ingest(doc("graphStructures/brainAtlases/Allen/Allen"));
        library.ingest(doc("graphStructures/brainAtlases/Allen/parcellationEntities/Allen_CA1"));
        library.ingest(doc("graphStructures/brainAtlases/Allen/versions/Allen_v1/Allen_v1"));
        library.ingest(doc(
            "graphStructures/brainAtlases/Allen/versions/Allen_v1/parcellationEntities_v1/Allen_v1_CA1",
        ));
        library.ingest(doc("graphStructures/commonCoordinateSpaces/MNI152/versions/MNI152_2009a"));

        let counts = library.counts();
        assert_eq!(counts.brain_atlases, 1);
        assert_eq!(counts.atlas_versions, 1);
        assert_eq!(counts.parcellation_entities, 2);
        assert_eq!(counts.common_coordinate_spaces, 1);
        assert_eq!(counts.space_versions, 1);
    }

    #[test]
    fn test_incomplete_groups() {
        let mut library = Library::new();
        library.ingest(doc("graphStructures/brainAtlases/Allen/Allen"));
        library.ingest(doc(
            "graphStructures/brainAtlases/Allen/versions/Allen_v2/parcellationEntities_v2/Allen_v2_CA1",
        ));
        library.ingest(doc("graphStructures/commonCoordinateSpaces/MNI152/versions/MNI152_2009a"));

        assert_eq!(
            library.incomplete_groups(),
            vec![
                "brainAtlases/Allen/Allen_v2".to_string(),
                "commonCoordinateSpaces/MNI152".to_string(),
            ]
        );
    }
}
