//! Cross-reference links into the published documentation.

use super::rst::link;
use crate::error::{DocError, Result};
use crate::library::Library;
use crate::models::{InputDocument, Term, TermReference};
use std::collections::HashMap;

/// URL builder for pages of one documentation version.
#[derive(Debug, Clone)]
pub struct DocsUrl {
    base_url: String,
    version: String,
}

impl DocsUrl {
    pub fn new(base_url: &str, version: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            version: version.to_string(),
        }
    }

    /// `<base>/<version>/<segments...>`
    pub fn page(&self, segments: &[&str]) -> String {
        let mut url = format!("{}/{}", self.base_url, self.version);
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    /// `<base>/<version>/libraries/<category>/<page>`
    pub fn library_page(&self, category: &str, page: &str) -> String {
        self.page(&["libraries", category, page])
    }
}

/// Heading anchor of a term or section title.
pub fn anchor(title: &str) -> String {
    title.replace(' ', "-")
}

/// A term reference resolved against the terminology library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTerm<'a> {
    pub terminology: &'a str,
    pub name: String,
}

/// Lookup of ingested terms for link construction.
pub struct TermIndex<'a> {
    library: &'a Library,
    by_id: HashMap<&'a str, (&'a str, &'a InputDocument)>,
}

impl<'a> TermIndex<'a> {
    pub fn new(library: &'a Library) -> Self {
        let mut by_id = HashMap::new();

        for (terminology, terms) in &library.terminologies {
            for document in terms.values() {
                if let Some(id) = document.payload.get("@id").and_then(|v| v.as_str()) {
                    by_id
                        .entry(id)
                        .or_insert((terminology.as_str(), document));
                }
            }
        }

        Self { library, by_id }
    }

    /// Resolve by exact `@id` first, then by the id's last segment inside
    /// `default_terminology`.
    pub fn resolve(
        &self,
        reference: &TermReference,
        default_terminology: &str,
    ) -> Result<ResolvedTerm<'a>> {
        let library: &'a Library = self.library;
        let found = self
            .by_id
            .get(reference.id.as_str())
            .copied()
            .or_else(|| {
                library
                    .terminologies
                    .get_key_value(default_terminology)
                    .and_then(|(terminology, terms)| {
                        terms
                            .get(reference.last_segment())
                            .map(|document| (terminology.as_str(), document))
                    })
            });

        let (terminology, document) = found.ok_or_else(|| DocError::UnresolvedReference {
            id: reference.id.clone(),
            terminology: default_terminology.to_string(),
        })?;

        let term: Term = document.parse()?;
        Ok(ResolvedTerm {
            terminology,
            name: term.name,
        })
    }
}

/// Builds the inline links rendered into field values.
pub struct Linker<'a> {
    urls: &'a DocsUrl,
    terms: TermIndex<'a>,
}

impl<'a> Linker<'a> {
    pub fn new(urls: &'a DocsUrl, library: &'a Library) -> Self {
        Self {
            urls,
            terms: TermIndex::new(library),
        }
    }

    /// Link to a single term's heading in its terminology page.
    pub fn term_link(&self, reference: &TermReference, terminology: &str) -> Result<String> {
        let term = self.terms.resolve(reference, terminology)?;
        let url = self.urls.library_page(
            "terminologies",
            &format!("{}.html#{}", term.terminology, anchor(&term.name)),
        );
        Ok(link(&term.name, &url))
    }

    /// Comma-joined links to several terms.
    pub fn term_links(&self, references: &[TermReference], terminology: &str) -> Result<String> {
        let links = references
            .iter()
            .map(|reference| self.term_link(reference, terminology))
            .collect::<Result<Vec<_>>>()?;
        Ok(links.join(", "))
    }

    /// Link to a product version section, e.g. `MNI152.html#version-2009a`.
    pub fn version_link(&self, category: &str, short_name: &str, version_identifier: &str) -> String {
        let page = format!(
            "{}.html#version-{}",
            short_name.replace(' ', "%20"),
            anchor(version_identifier)
        );
        link(version_identifier, &self.urls.library_page(category, &page))
    }
}
