//! TEI document tree model and flat section extraction.
//!
//! GROBID's `processFulltextDocument` endpoint returns a TEI XML document.
//! This crate converts that XML into a loosely-typed tree ([`TeiValue`]) in
//! which an element occurring once is a bare node and an element occurring
//! repeatedly is a list, then walks the known TEI paths to produce a flat
//! mapping of section name to cleaned text (title, authors, abstract, body,
//! references).

use thiserror::Error;

pub mod extract;
pub mod tree;
pub mod xml;

pub use extract::{extract_sections, Section, Sections, MAX_TREE_DEPTH};
pub use tree::{collect_text, TeiElement, TeiValue};
pub use xml::parse_tei;

#[derive(Error, Debug)]
pub enum TeiError {
    /// The TEI XML could not be parsed into a document tree.
    #[error("failed to parse TEI XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Element nesting beyond any realistic document structure.
    #[error("failed during TEI section extraction: element nesting exceeds {0} levels")]
    DepthExceeded(usize),
}
