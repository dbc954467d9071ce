//! TEI XML to document-tree conversion.
//!
//! SAX-style event loop over the raw XML returned by GROBID, building the
//! [`TeiValue`] graph with the conventions the extractor expects: an element
//! occurring once under its parent is a bare node, a repeated element
//! becomes a list merged under one child entry, direct text lands in the
//! element's `text` field, and attributes are kept apart from text. An
//! element carrying only text collapses to a plain text node.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::extract::MAX_TREE_DEPTH;
use crate::tree::{TeiElement, TeiValue};
use crate::TeiError;

/// Parse raw TEI XML into a document tree.
///
/// Returns the top-level wrapper node; for well-formed GROBID output its
/// single child is the `TEI` root element. Whitespace-only text chunks are
/// skipped, multiple text chunks around child elements are joined with one
/// space, and nesting beyond [`MAX_TREE_DEPTH`] is rejected.
pub fn parse_tei(xml: &str) -> Result<TeiValue, TeiError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut root = TeiElement::default();
    let mut stack: Vec<(String, TeiElement)> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let mut element = TeiElement::default();
                read_attributes(e, &mut element);
                stack.push((name, element));
                if stack.len() + 1 > MAX_TREE_DEPTH {
                    return Err(TeiError::DepthExceeded(MAX_TREE_DEPTH));
                }
            }

            Event::Empty(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let mut element = TeiElement::default();
                read_attributes(e, &mut element);
                attach(&mut root, &mut stack, name, TeiValue::Element(element));
            }

            Event::Text(ref e) => {
                if let Ok(text) = e.unescape() {
                    append_text(&mut stack, &text);
                }
            }

            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                append_text(&mut stack, &text);
            }

            Event::End(_) => {
                if let Some((name, element)) = stack.pop() {
                    attach(&mut root, &mut stack, name, finish_element(element));
                }
            }

            Event::Eof => break,
            _ => {}
        }
    }

    Ok(TeiValue::Element(root))
}

fn read_attributes(e: &quick_xml::events::BytesStart<'_>, element: &mut TeiElement) {
    for attr in e.attributes().flatten() {
        element.attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            String::from_utf8_lossy(&attr.value).into_owned(),
        ));
    }
}

fn append_text(stack: &mut [(String, TeiElement)], text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    if let Some((_, element)) = stack.last_mut() {
        match element.text.as_mut() {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(trimmed);
            }
            None => element.text = Some(trimmed.to_string()),
        }
    }
}

fn attach(
    root: &mut TeiElement,
    stack: &mut [(String, TeiElement)],
    name: String,
    value: TeiValue,
) {
    match stack.last_mut() {
        Some((_, parent)) => parent.push_child(name, value),
        None => root.push_child(name, value),
    }
}

/// Collapse a closed element to its final node shape: text-only elements
/// become plain text nodes, everything else stays an element.
fn finish_element(element: TeiElement) -> TeiValue {
    if element.attributes.is_empty() && element.children.is_empty() {
        if let Some(text) = element.text {
            return TeiValue::Text(text);
        }
    }
    TeiValue::Element(element)
}
