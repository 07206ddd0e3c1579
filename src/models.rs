//! Data models for instance documents.
//!
//! This module contains the loaded input document with its logical path,
//! and the typed payload records the renderer reads fields from.

use crate::error::{DocError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Path of a document relative to the input root, extension stripped.
///
/// The root's own first-level folder is dropped, so segment 0 is the
/// category marker (`terminologies`, `graphStructures`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalPath {
    segments: Vec<String>,
}

impl LogicalPath {
    /// Build a logical path from already split segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a slash-separated logical path such as `licenses/CC-BY-4.0`.
    #[cfg(test)]
    pub fn parse(path: &str) -> Self {
        Self::new(path.split('/').filter(|s| !s.is_empty()))
    }

    /// Derive the logical path of `file` relative to `root`.
    pub fn from_file(file: &Path, root: &Path) -> Result<Self> {
        let relative = file
            .strip_prefix(root)
            .map_err(|_| DocError::OutsideRoot {
                path: file.to_path_buf(),
                root: root.to_path_buf(),
            })?;

        let mut segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();

        if let Some(stem) = relative.file_stem() {
            if let Some(last) = segments.last_mut() {
                *last = stem.to_string_lossy().to_string();
            }
        }

        // The first folder under the root only carries the instances version.
        if !segments.is_empty() {
            segments.remove(0);
        }

        Ok(Self::new(segments))
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// Last segment, i.e. the file name without extension.
    pub fn basename(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Substring test against the slash-joined path.
    pub fn contains(&self, needle: &str) -> bool {
        self.to_string().contains(needle)
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// A parsed instance file together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDocument {
    pub path: LogicalPath,
    pub payload: Value,
}

impl InputDocument {
    pub fn new(path: LogicalPath, payload: Value) -> Self {
        Self { path, payload }
    }

    /// Read and parse `file`, deriving its logical path from `root`.
    pub fn load(file: &Path, root: &Path) -> Result<Self> {
        let path = LogicalPath::from_file(file, root)?;
        let content = std::fs::read_to_string(file).map_err(|e| DocError::io(file, e))?;
        let payload = serde_json::from_str(&content).map_err(|source| DocError::Json {
            path: file.to_path_buf(),
            source,
        })?;

        Ok(Self::new(path, payload))
    }

    /// Interpret the payload as a typed record.
    pub fn parse<T: Record>(&self) -> Result<T> {
        T::deserialize(&self.payload).map_err(|e| DocError::InvalidPayload {
            kind: T::KIND,
            document: self.path.to_string(),
            reason: e.to_string(),
        })
    }
}

/// A payload record type with a human readable kind for error messages.
pub trait Record: DeserializeOwned {
    const KIND: &'static str;
}

/// Values treated as missing when empty.
trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Blank for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for Literal {
    fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl Blank for TermReference {
    fn is_blank(&self) -> bool {
        self.id.trim().is_empty()
    }
}

/// Deserialize an optional field, mapping `null`, `""` and `[]` to `None`.
fn non_empty<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Blank,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_blank()))
}

/// A JSON-LD link to another instance, e.g. `{"@id": ".../species/musMusculus"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TermReference {
    #[serde(rename = "@id")]
    pub id: String,
}

impl TermReference {
    /// The trailing identifier after the last `/` or `#`.
    pub fn last_segment(&self) -> &str {
        self.id
            .rsplit(['/', '#'])
            .next()
            .unwrap_or(self.id.as_str())
    }
}

/// A field that is either plain text or a reference to another instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Text(String),
    Reference(TermReference),
}

impl Literal {
    pub fn as_str(&self) -> &str {
        match self {
            Literal::Text(text) => text,
            Literal::Reference(reference) => &reference.id,
        }
    }
}

/// An entry of a controlled terminology.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub definition: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub synonym: Option<Vec<String>>,
    #[serde(default, deserialize_with = "non_empty")]
    pub preferred_ontology_identifier: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub interlex_identifier: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub knowledge_space_link: Option<String>,
}

impl Record for Term {
    const KIND: &'static str = "terminology term";
}

/// A file format / media descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub display_label: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub file_extension: Option<Vec<String>>,
    #[serde(default, deserialize_with = "non_empty")]
    pub synonym: Option<Vec<String>>,
    #[serde(default, deserialize_with = "non_empty")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub specification: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub data_type: Option<Vec<TermReference>>,
    #[serde(default, deserialize_with = "non_empty")]
    pub related_media_type: Option<Literal>,
}

impl Record for ContentType {
    const KIND: &'static str = "content type";
}

/// A license record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    #[serde(rename = "@id")]
    pub id: String,
    pub short_name: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub legal_code: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub webpage: Option<Vec<String>>,
}

impl Record for License {
    const KIND: &'static str = "license";
}

/// Top-level brain atlas definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrainAtlas {
    #[serde(rename = "@id")]
    pub id: String,
    pub short_name: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub abbreviation: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub used_species: Option<TermReference>,
    #[serde(default, deserialize_with = "non_empty")]
    pub digital_identifier: Option<Literal>,
    #[serde(default, deserialize_with = "non_empty")]
    pub ontology_identifier: Option<Literal>,
    #[serde(default, deserialize_with = "non_empty")]
    pub homepage: Option<Literal>,
    #[serde(default, deserialize_with = "non_empty")]
    pub how_to_cite: Option<String>,
}

impl Record for BrainAtlas {
    const KIND: &'static str = "brain atlas";
}

/// Top-level common coordinate space definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateSpace {
    #[serde(rename = "@id")]
    pub id: String,
    pub short_name: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub abbreviation: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub used_species: Option<TermReference>,
    #[serde(default, deserialize_with = "non_empty")]
    pub digital_identifier: Option<Literal>,
    #[serde(default, deserialize_with = "non_empty")]
    pub ontology_identifier: Option<Literal>,
    #[serde(default, deserialize_with = "non_empty")]
    pub homepage: Option<Literal>,
    #[serde(default, deserialize_with = "non_empty")]
    pub how_to_cite: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub has_version: Option<Vec<TermReference>>,
}

impl Record for CoordinateSpace {
    const KIND: &'static str = "common coordinate space";
}

/// One version of a common coordinate space.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceVersion {
    #[serde(rename = "@id")]
    pub id: String,
    pub short_name: String,
    pub version_identifier: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub abbreviation: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub digital_identifier: Option<Literal>,
    #[serde(default, deserialize_with = "non_empty")]
    pub ontology_identifier: Option<Literal>,
    #[serde(default, deserialize_with = "non_empty")]
    pub homepage: Option<Literal>,
    #[serde(default, deserialize_with = "non_empty")]
    pub how_to_cite: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub accessibility: Option<TermReference>,
}

impl Record for SpaceVersion {
    const KIND: &'static str = "common coordinate space version";
}
