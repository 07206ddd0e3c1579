//! reStructuredText documentation generation.
//!
//! This module renders the aggregated library into one document per
//! terminology, content types, licenses, brain atlas and coordinate space.

use super::links::{DocsUrl, Linker};
use super::rst::RstWriter;
use crate::error::{DocError, Result};
use crate::library::{AtlasGroup, DocumentMap, Library, SpaceGroup};
use crate::models::{
    BrainAtlas, ContentType, CoordinateSpace, License, Literal, SpaceVersion, Term,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rendered in place of a missing optional value.
pub const PLACEHOLDER: &str = "\\-";

const FIELD_INDENT: usize = 3;
const RULE: &str = "------------";

/// Options controlling where documents go and how links are built.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Instances version, used in output paths and link URLs.
    pub version: String,
    /// Root of the published documentation site.
    pub base_url: String,
    /// Output root; documents land in `<output_dir>/<version>/docs/libraries`.
    pub output_dir: PathBuf,
}

/// A rendered document and its path below the libraries folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDoc {
    /// Relative path without extension, e.g. `terminologies/species`.
    pub name: String,
    pub content: String,
}

/// Renders a completed [`Library`].
pub struct DocBuilder<'a> {
    library: &'a Library,
    options: BuildOptions,
    urls: DocsUrl,
}

impl<'a> DocBuilder<'a> {
    pub fn new(library: &'a Library, options: BuildOptions) -> Self {
        let urls = DocsUrl::new(&options.base_url, &options.version);
        Self {
            library,
            options,
            urls,
        }
    }

    /// Render and write every document, stopping at the first failure.
    ///
    /// Returns the written file paths in generation order.
    pub fn build(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for doc in self.render_all()? {
            written.push(self.write(&doc)?);
        }
        info!("Wrote {} documents", written.len());
        Ok(written)
    }

    /// Render every document without touching the file system.
    pub fn render_all(&self) -> Result<Vec<RenderedDoc>> {
        let linker = Linker::new(&self.urls, self.library);
        let mut docs = Vec::new();

        for (name, terms) in &self.library.terminologies {
            docs.push(RenderedDoc {
                name: format!("terminologies/{}", name),
                content: self.render_terminology(name, terms)?,
            });
        }

        docs.push(RenderedDoc {
            name: "contentTypes".to_string(),
            content: self.render_content_types(&linker)?,
        });

        docs.push(RenderedDoc {
            name: "licenses".to_string(),
            content: self.render_licenses()?,
        });

        for (name, group) in &self.library.brain_atlases {
            docs.push(self.render_brain_atlas(name, group, &linker)?);
        }

        for (name, group) in &self.library.common_coordinate_spaces {
            docs.push(self.render_coordinate_space(name, group, &linker)?);
        }

        Ok(docs)
    }

    /// `<output_dir>/<version>/docs/libraries/<name>.rst`
    pub fn target_file(&self, name: &str) -> PathBuf {
        self.options
            .output_dir
            .join(&self.options.version)
            .join("docs")
            .join("libraries")
            .join(format!("{}.rst", name))
    }

    fn write(&self, doc: &RenderedDoc) -> Result<PathBuf> {
        let path = self.target_file(&doc.name);
        write_document(&path, &doc.content)?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    fn render_terminology(&self, name: &str, terms: &DocumentMap) -> Result<String> {
        let title = capitalize(name);
        let schema_link = self.urls.page(&[
            "specifications",
            "controlledTerms",
            &format!("{}.html", name),
        ]);

        let mut doc = RstWriter::new();
        doc.heading(&title, '#', true);
        doc.newline();
        doc.content(
            &format!(
                "All instances listed below can be validated against the `{} <{}>`_ schema specification.",
                title, schema_link
            ),
            0,
        );
        doc.newline();
        doc.content(RULE, 0);
        doc.newline();
        doc.content(RULE, 0);
        doc.newline();

        for document in terms.values() {
            let term: Term = document.parse()?;

            doc.heading(&term.name, '-', false);
            doc.newline();
            doc.directive("admonition", "metadata sheet");
            doc.newline();
            doc.field("semantic name", &term.id, FIELD_INDENT);
            doc.field("definition", text(term.definition.as_deref()), FIELD_INDENT);
            doc.field("description", text(term.description.as_deref()), FIELD_INDENT);
            doc.field("synonyms", &list(term.synonym.as_deref()), FIELD_INDENT);
            doc.content(RULE, FIELD_INDENT);
            doc.field(
                "preferred ontology ID",
                text(term.preferred_ontology_identifier.as_deref()),
                FIELD_INDENT,
            );
            doc.field(
                "InterLex ID",
                text(term.interlex_identifier.as_deref()),
                FIELD_INDENT,
            );
            doc.field(
                "KnowledgeSpace entry",
                text(term.knowledge_space_link.as_deref()),
                FIELD_INDENT,
            );
            close_entry(&mut doc, name);
        }

        Ok(doc.finish())
    }

    fn render_content_types(&self, linker: &Linker<'_>) -> Result<String> {
        let mut doc = RstWriter::new();
        doc.heading("ContentTypes", '#', true);
        doc.newline();

        for document in self.library.content_types.values() {
            let content_type: ContentType = document.parse()?;
            let data_types = match &content_type.data_type {
                Some(references) => linker.term_links(references, "dataType")?,
                None => PLACEHOLDER.to_string(),
            };

            doc.heading(&content_type.name, '-', false);
            doc.newline();
            doc.directive("admonition", "metadata sheet");
            doc.newline();
            doc.field("semantic name", &content_type.id, FIELD_INDENT);
            doc.field(
                "display label",
                text(content_type.display_label.as_deref()),
                FIELD_INDENT,
            );
            doc.field(
                "file extensions",
                &list(content_type.file_extension.as_deref()),
                FIELD_INDENT,
            );
            doc.field("synonyms", &list(content_type.synonym.as_deref()), FIELD_INDENT);
            doc.field(
                "description",
                text(content_type.description.as_deref()),
                FIELD_INDENT,
            );
            doc.field(
                "specification",
                text(content_type.specification.as_deref()),
                FIELD_INDENT,
            );
            doc.field("data types", &data_types, FIELD_INDENT);
            doc.field(
                "related media type",
                literal(content_type.related_media_type.as_ref()),
                FIELD_INDENT,
            );
            close_entry(&mut doc, "ContentTypes");
        }

        Ok(doc.finish())
    }

    fn render_licenses(&self) -> Result<String> {
        let field_name = "webpages";
        let continuation_indent = field_name.len() + 3 + FIELD_INDENT;

        let mut doc = RstWriter::new();
        doc.heading("Licenses", '#', true);
        doc.newline();

        for document in self.library.licenses.values() {
            let license: License = document.parse()?;

            doc.heading(&license.short_name, '-', false);
            doc.newline();
            doc.directive("admonition", "metadata sheet");
            doc.newline();
            doc.field("semantic name", &license.id, FIELD_INDENT);
            doc.field("full name", text(license.full_name.as_deref()), FIELD_INDENT);
            doc.field("legal code", text(license.legal_code.as_deref()), FIELD_INDENT);
            match license.webpage.as_deref() {
                Some([first, rest @ ..]) => {
                    doc.field(field_name, first, FIELD_INDENT);
                    for page in rest {
                        doc.content(page, continuation_indent);
                    }
                }
                _ => doc.field(field_name, PLACEHOLDER, FIELD_INDENT),
            }
            close_entry(&mut doc, "Licenses");
        }

        Ok(doc.finish())
    }

    fn render_brain_atlas(
        &self,
        name: &str,
        group: &AtlasGroup,
        linker: &Linker<'_>,
    ) -> Result<RenderedDoc> {
        let document = group.atlas.as_ref().ok_or_else(|| DocError::IncompleteGroup {
            category: "brain atlas",
            name: name.to_string(),
        })?;
        let atlas: BrainAtlas = document.parse()?;
        let used_species = match &atlas.used_species {
            Some(reference) => linker.term_link(reference, "species")?,
            None => PLACEHOLDER.to_string(),
        };

        let mut doc = RstWriter::new();
        doc.heading(&atlas.short_name, '#', true);
        doc.newline();
        doc.directive("admonition", "metadata sheet");
        doc.newline();
        doc.field("semantic name", &atlas.id, FIELD_INDENT);
        doc.field("full name", text(atlas.full_name.as_deref()), FIELD_INDENT);
        doc.field("abbreviation", text(atlas.abbreviation.as_deref()), FIELD_INDENT);
        doc.field("used species", &used_species, FIELD_INDENT);
        doc.field(
            "digital ID",
            literal(atlas.digital_identifier.as_ref()),
            FIELD_INDENT,
        );
        doc.field(
            "ontology ID",
            literal(atlas.ontology_identifier.as_ref()),
            FIELD_INDENT,
        );
        doc.field("homepage", literal(atlas.homepage.as_ref()), FIELD_INDENT);
        doc.field("howToCite", text(atlas.how_to_cite.as_deref()), FIELD_INDENT);

        Ok(RenderedDoc {
            name: format!("brainAtlases/{}", atlas.short_name),
            content: doc.finish(),
        })
    }

    fn render_coordinate_space(
        &self,
        name: &str,
        group: &SpaceGroup,
        linker: &Linker<'_>,
    ) -> Result<RenderedDoc> {
        let document = group.space.as_ref().ok_or_else(|| DocError::IncompleteGroup {
            category: "common coordinate space",
            name: name.to_string(),
        })?;
        let space: CoordinateSpace = document.parse()?;
        let title = space.short_name.as_str();
        let used_species = match &space.used_species {
            Some(reference) => linker.term_link(reference, "species")?,
            None => PLACEHOLDER.to_string(),
        };

        let full_name = text(space.full_name.as_deref());
        let abbreviation = text(space.abbreviation.as_deref());
        let homepage = literal(space.homepage.as_ref());

        let mut doc = RstWriter::new();
        doc.heading(title, '#', true);
        doc.newline();
        doc.directive("admonition", "metadata sheet");
        doc.newline();
        doc.field("semantic name", &space.id, FIELD_INDENT);
        doc.field("full name", full_name, FIELD_INDENT);
        doc.field("abbreviation", abbreviation, FIELD_INDENT);
        doc.field("used species", &used_species, FIELD_INDENT);
        doc.field(
            "digital ID",
            literal(space.digital_identifier.as_ref()),
            FIELD_INDENT,
        );
        doc.field(
            "ontology ID",
            literal(space.ontology_identifier.as_ref()),
            FIELD_INDENT,
        );
        doc.field("homepage", homepage, FIELD_INDENT);
        doc.field("howToCite", text(space.how_to_cite.as_deref()), FIELD_INDENT);

        if space.has_version.is_some() {
            let versions = group
                .versions
                .values()
                .map(|document| document.parse::<SpaceVersion>())
                .collect::<Result<Vec<_>>>()?;

            let version_links = if versions.is_empty() {
                PLACEHOLDER.to_string()
            } else {
                versions
                    .iter()
                    .map(|v| {
                        linker.version_link(
                            "commonCoordinateSpaces",
                            &v.short_name,
                            &v.version_identifier,
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            doc.field("has versions", &version_links, FIELD_INDENT);
            doc.newline();
            doc.content(RULE, 0);
            doc.newline();
            doc.content(RULE, 0);
            doc.newline();
            doc.heading("Versions", '#', false);

            for version in &versions {
                doc.heading(&version.version_identifier, '*', true);
                doc.newline();
                doc.directive("admonition", "metadata sheet");
                doc.newline();
                doc.field("semantic name", &version.id, FIELD_INDENT);
                doc.newline();

                // Inherited values are only repeated when the version overrides them.
                let version_full_name = text(version.full_name.as_deref());
                if version_full_name != full_name {
                    doc.field("full name", version_full_name, FIELD_INDENT);
                }
                let version_abbreviation = text(version.abbreviation.as_deref());
                if version_abbreviation != abbreviation {
                    doc.field("abbreviation", version_abbreviation, FIELD_INDENT);
                }
                doc.field(
                    "digital ID",
                    literal(version.digital_identifier.as_ref()),
                    FIELD_INDENT,
                );
                doc.field(
                    "ontology ID",
                    literal(version.ontology_identifier.as_ref()),
                    FIELD_INDENT,
                );
                let version_homepage = literal(version.homepage.as_ref());
                if version_homepage != homepage {
                    doc.field("homepage", version_homepage, FIELD_INDENT);
                }
                doc.field(
                    "howToCite",
                    text(version.how_to_cite.as_deref()),
                    FIELD_INDENT,
                );
                doc.content(RULE, FIELD_INDENT);
                let accessibility = match &version.accessibility {
                    Some(reference) => linker.term_link(reference, "accessibility")?,
                    None => PLACEHOLDER.to_string(),
                };
                doc.field("accessibility", &accessibility, FIELD_INDENT);
                close_entry(&mut doc, title);
            }
        }

        Ok(RenderedDoc {
            name: format!("commonCoordinateSpaces/{}", title),
            content: doc.finish(),
        })
    }
}

/// Write one document, creating its parent directories.
fn write_document(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DocError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| DocError::io(path, e))
}

/// Back-to-top link and separator closing an entry.
fn close_entry(doc: &mut RstWriter, top: &str) {
    doc.newline();
    doc.content(&format!("`BACK TO TOP <{}_>`_", top), 0);
    doc.newline();
    doc.content(RULE, 0);
    doc.newline();
}

fn text(value: Option<&str>) -> &str {
    value.unwrap_or(PLACEHOLDER)
}

fn literal(value: Option<&Literal>) -> &str {
    value.map(Literal::as_str).unwrap_or(PLACEHOLDER)
}

fn list(values: Option<&[String]>) -> String {
    match values {
        Some(values) => values.join(", "),
        None => PLACEHOLDER.to_string(),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
