//! In-scope namespace tracking while walking a document tree.

use crate::node::{split_qualified, Element};

/// Stack of namespace bindings, one frame per open element.
///
/// Push an element before looking at its attributes and pop it after its
/// children are done; lookups see the innermost binding for a prefix.
#[derive(Debug, Default, Clone)]
pub struct NamespaceScope {
    bindings: Vec<(String, String)>,
    frames: Vec<usize>,
}

impl NamespaceScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter an element, recording its namespace declarations.
    pub fn push(&mut self, element: &Element) {
        self.frames.push(self.bindings.len());
        for (prefix, uri) in element.namespace_declarations() {
            self.bindings.push((prefix.to_string(), uri.to_string()));
        }
    }

    /// Leave the innermost element.
    pub fn pop(&mut self) {
        if let Some(len) = self.frames.pop() {
            self.bindings.truncate(len);
        }
    }

    /// The URI bound to `prefix` (empty prefix = default namespace).
    pub fn uri_for(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Whether a qualified attribute name is `local_name` in namespace `uri`.
    ///
    /// Unprefixed attributes are never in a namespace.
    pub fn attribute_matches(&self, qualified: &str, uri: &str, local_name: &str) -> bool {
        let (prefix, local) = split_qualified(qualified);
        if prefix.is_empty() || prefix == "xmlns" || local != local_name {
            return false;
        }
        self.uri_for(prefix) == Some(uri)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
