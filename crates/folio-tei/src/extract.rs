//! Section extraction: walks the known TEI paths of a GROBID document and
//! flattens each into a single cleaned string.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::{collect_text, TeiValue};
use crate::TeiError;

/// Maximum element nesting accepted in a document tree. Real GROBID output
/// stays in the low tens; anything beyond this is treated as a malformed
/// document and fails the whole extraction.
pub const MAX_TREE_DEPTH: usize = 64;

/// The fixed set of sections the extractor knows how to locate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Title,
    Authors,
    Abstract,
    Body,
    References,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Title,
        Section::Authors,
        Section::Abstract,
        Section::Body,
        Section::References,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Title => "title",
            Section::Authors => "authors",
            Section::Abstract => "abstract",
            Section::Body => "body",
            Section::References => "references",
        }
    }

    /// Parse a lowercase section name as used in output and requests.
    pub fn from_name(name: &str) -> Option<Section> {
        match name {
            "title" => Some(Section::Title),
            "authors" => Some(Section::Authors),
            "abstract" => Some(Section::Abstract),
            "body" => Some(Section::Body),
            "references" => Some(Section::References),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat mapping of section name to cleaned text. A key is present only when
/// the section was found and yielded non-empty text.
pub type Sections = BTreeMap<Section, String>;

/// Extract the known sections from a parsed TEI document.
///
/// `doc` is the top-level wrapper produced by [`crate::parse_tei`]. A
/// missing `TEI` root is a recoverable degraded case and yields an empty
/// mapping; a tree nested beyond [`MAX_TREE_DEPTH`] fails the whole call,
/// and no partial mapping is returned in that case. Fields that are missing
/// or flatten to nothing are silently omitted.
pub fn extract_sections(doc: &TeiValue) -> Result<Sections, TeiError> {
    let mut sections = Sections::new();

    let Some(tei) = doc.child("TEI") else {
        tracing::warn!("TEI root element not found in parsed document");
        return Ok(sections);
    };

    if doc.depth() > MAX_TREE_DEPTH {
        return Err(TeiError::DepthExceeded(MAX_TREE_DEPTH));
    }

    let header = tei.child("teiHeader");
    let title_stmt = header
        .and_then(|h| h.child("fileDesc"))
        .and_then(|f| f.child("titleStmt"));

    if let Some(title) = title_stmt
        .and_then(|t| t.child("title"))
        .and_then(TeiValue::own_text)
    {
        if !title.is_empty() {
            sections.insert(Section::Title, title.to_string());
        }
    }

    if let Some(authors) = title_stmt.and_then(|t| t.child("author")) {
        let names: Vec<String> = authors.as_items().iter().filter_map(author_name).collect();
        if !names.is_empty() {
            sections.insert(Section::Authors, names.join("; "));
        }
    }

    if let Some(abstract_node) = header
        .and_then(|h| h.child("profileDesc"))
        .and_then(|p| p.child("abstract"))
    {
        let text = collect_text(Some(abstract_node));
        if !text.is_empty() {
            sections.insert(Section::Abstract, text);
        }
    }

    if let Some(body) = tei.child("text").and_then(|t| t.child("body")) {
        let text = collect_text(Some(body));
        if !text.is_empty() {
            sections.insert(Section::Body, text);
        }
    }

    if let Some(entries) = tei
        .child("text")
        .and_then(|t| t.child("back"))
        .and_then(|b| b.child("div"))
        .and_then(|d| d.as_items().first())
        .and_then(|d| d.child("listBibl"))
        .and_then(|l| l.child("biblStruct"))
    {
        let refs: Vec<String> = entries
            .as_items()
            .iter()
            .map(|entry| collect_text(Some(entry)))
            .filter(|text| !text.is_empty())
            .collect();
        if !refs.is_empty() {
            sections.insert(Section::References, refs.join("\n\n"));
        }
    }

    tracing::debug!(
        sections = ?sections.keys().map(|s| s.as_str()).collect::<Vec<_>>(),
        "TEI section extraction complete"
    );

    Ok(sections)
}

/// Display name for one author: persName forename and surname, trimmed and
/// joined by a single space. An author with no usable name yields `None`.
fn author_name(author: &TeiValue) -> Option<String> {
    let pers_name = author.child("persName")?;
    let forename = pers_name
        .child("forename")
        .and_then(TeiValue::own_text)
        .unwrap_or("")
        .trim();
    let surname = pers_name
        .child("surname")
        .and_then(TeiValue::own_text)
        .unwrap_or("")
        .trim();

    let full = format!("{forename} {surname}").trim().to_string();
    if full.is_empty() { None } else { Some(full) }
}
