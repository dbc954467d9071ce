//! The loosely-typed TEI document tree and the text normalizer that
//! flattens any subtree into a single cleaned string.

use once_cell::sync::Lazy;
use regex::Regex;

/// A single node in the parsed TEI document tree.
///
/// Mirrors the shape produced by collapsing XML into objects: an element
/// that occurred once under its parent is a bare node, an element that
/// occurred repeatedly is a [`TeiValue::List`]. Any child may therefore be
/// either, and traversal must treat a bare node and a one-element list as
/// equivalent (see [`TeiValue::as_items`]).
#[derive(Debug, Clone, PartialEq)]
pub enum TeiValue {
    /// Pure text content with no element structure.
    Text(String),
    /// An element with optional direct text, attributes, and children.
    Element(TeiElement),
    /// The same element repeated under one parent, in document order.
    List(Vec<TeiValue>),
}

/// An element node: direct text, attributes, and named children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeiElement {
    /// Direct text content of the element, exclusive of its children's text.
    pub text: Option<String>,
    /// Attributes in document order. Never part of extracted section text.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order. A name maps to a [`TeiValue::List`]
    /// when the element occurred more than once under this parent.
    pub children: Vec<(String, TeiValue)>,
}

impl TeiElement {
    /// Look up a child element by name.
    pub fn child(&self, name: &str) -> Option<&TeiValue> {
        self.children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Attach a child, merging repeated names into a list.
    pub fn push_child(&mut self, name: String, value: TeiValue) {
        match self.children.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => match existing {
                TeiValue::List(items) => items.push(value),
                _ => {
                    let first = std::mem::replace(existing, TeiValue::List(Vec::new()));
                    if let TeiValue::List(items) = existing {
                        items.push(first);
                        items.push(value);
                    }
                }
            },
            None => self.children.push((name, value)),
        }
    }
}

impl TeiValue {
    /// Look up a child element by name. Text and list nodes have no named
    /// children, so the lookup fails on them.
    pub fn child(&self, name: &str) -> Option<&TeiValue> {
        match self {
            TeiValue::Element(el) => el.child(name),
            _ => None,
        }
    }

    /// The node's own direct text, if any. A list has no own text.
    pub fn own_text(&self) -> Option<&str> {
        match self {
            TeiValue::Text(s) => Some(s),
            TeiValue::Element(el) => el.text.as_deref(),
            TeiValue::List(_) => None,
        }
    }

    /// View this node as a sequence: a list yields its items, anything else
    /// yields itself as a one-element slice. Callers iterate this instead of
    /// branching on cardinality.
    pub fn as_items(&self) -> &[TeiValue] {
        match self {
            TeiValue::List(items) => items,
            single => std::slice::from_ref(single),
        }
    }

    /// Maximum element nesting depth of the tree rooted at this node.
    /// A repeated element (list) sits at the same level as its siblings.
    pub fn depth(&self) -> usize {
        let mut max = 0usize;
        let mut stack: Vec<(&TeiValue, usize)> = vec![(self, 1)];
        while let Some((node, d)) = stack.pop() {
            max = max.max(d);
            match node {
                TeiValue::Text(_) => {}
                TeiValue::List(items) => {
                    for item in items {
                        stack.push((item, d));
                    }
                }
                TeiValue::Element(el) => {
                    for (_, child) in &el.children {
                        stack.push((child, d + 1));
                    }
                }
            }
        }
        max
    }
}

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collect all textual content beneath `node` into one cleaned string.
///
/// Depth-first, document order: an element's own text precedes its
/// children's text, attributes are never inspected. Each fragment is
/// trimmed, whitespace-only fragments are dropped, fragments are joined by
/// a single space, and the result is collapsed so no run of whitespace
/// survives. Absent input yields the empty string; the function is total
/// over the tree domain and uses an explicit stack, so even pathological
/// nesting cannot overflow it.
pub fn collect_text(node: Option<&TeiValue>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let mut stack: Vec<&TeiValue> = Vec::new();
    if let Some(node) = node {
        stack.push(node);
    }

    while let Some(value) = stack.pop() {
        match value {
            TeiValue::Text(s) => {
                let trimmed = s.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed);
                }
            }
            TeiValue::List(items) => {
                for item in items.iter().rev() {
                    stack.push(item);
                }
            }
            TeiValue::Element(el) => {
                if let Some(text) = el.text.as_deref() {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed);
                    }
                }
                for (_, child) in el.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
    }

    let joined = parts.join(" ");
    WHITESPACE_RUN.replace_all(&joined, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> TeiValue {
        TeiValue::Text(s.to_string())
    }

    fn element(text: Option<&str>, children: Vec<(&str, TeiValue)>) -> TeiValue {
        TeiValue::Element(TeiElement {
            text: text.map(str::to_string),
            attributes: Vec::new(),
            children: children
                .into_iter()
                .map(|(n, v)| (n.to_string(), v))
                .collect(),
        })
    }

    #[test]
    fn absent_yields_empty_string() {
        assert_eq!(collect_text(None), "");
    }

    #[test]
    fn own_text_precedes_children() {
        let node = element(Some("A"), vec![("x", text("B"))]);
        assert_eq!(collect_text(Some(&node)), "A B");
    }

    #[test]
    fn children_in_document_order() {
        let node = element(None, vec![("x", text("one")), ("y", text("two")), ("z", text("three"))]);
        assert_eq!(collect_text(Some(&node)), "one two three");
    }

    #[test]
    fn list_items_in_order() {
        let node = TeiValue::List(vec![text("first"), text("second")]);
        assert_eq!(collect_text(Some(&node)), "first second");
    }

    #[test]
    fn attributes_contribute_nothing() {
        let node = TeiValue::Element(TeiElement {
            text: None,
            attributes: vec![("type".to_string(), "main".to_string())],
            children: Vec::new(),
        });
        assert_eq!(collect_text(Some(&node)), "");
    }

    #[test]
    fn whitespace_only_fragments_dropped() {
        let node = element(Some("   "), vec![("p", text("\n\t ")), ("q", text("kept"))]);
        assert_eq!(collect_text(Some(&node)), "kept");
    }

    #[test]
    fn internal_whitespace_runs_collapse() {
        let node = element(Some("a  b"), vec![("p", text("c\n\nd"))]);
        assert_eq!(collect_text(Some(&node)), "a b c d");
    }

    #[test]
    fn result_has_no_leading_or_trailing_whitespace() {
        let node = element(Some("  padded  "), vec![]);
        assert_eq!(collect_text(Some(&node)), "padded");
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let mut node = text("leaf");
        for _ in 0..10_000 {
            node = element(None, vec![("div", node)]);
        }
        assert_eq!(collect_text(Some(&node)), "leaf");

        // Tear down level by level; the generated recursive drop would
        // overflow the stack long before collect_text would.
        let mut current = node;
        while let TeiValue::Element(el) = current {
            current = el
                .children
                .into_iter()
                .next()
                .map(|(_, v)| v)
                .unwrap_or(TeiValue::Text(String::new()));
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let node = element(Some("A"), vec![("x", TeiValue::List(vec![text("B"), text("C")]))]);
        let first = collect_text(Some(&node));
        assert_eq!(first, collect_text(Some(&node)));
        assert_eq!(first, "A B C");
    }

    #[test]
    fn push_child_merges_repeats_into_list() {
        let mut el = TeiElement::default();
        el.push_child("author".to_string(), text("one"));
        el.push_child("author".to_string(), text("two"));
        el.push_child("title".to_string(), text("t"));

        assert_eq!(el.children.len(), 2);
        assert_eq!(
            el.child("author"),
            Some(&TeiValue::List(vec![text("one"), text("two")]))
        );
        assert_eq!(el.child("title"), Some(&text("t")));
    }

    #[test]
    fn as_items_treats_bare_node_as_one_element_sequence() {
        let bare = text("only");
        assert_eq!(bare.as_items().len(), 1);

        let list = TeiValue::List(vec![text("a"), text("b")]);
        assert_eq!(list.as_items().len(), 2);
    }

    #[test]
    fn depth_counts_element_nesting() {
        let node = element(None, vec![("a", element(None, vec![("b", text("x"))]))]);
        assert_eq!(node.depth(), 3);

        // A list does not add a level of its own.
        let node = element(None, vec![("a", TeiValue::List(vec![text("x"), text("y")]))]);
        assert_eq!(node.depth(), 2);
    }
}
