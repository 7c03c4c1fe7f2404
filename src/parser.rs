//! Markup parsing into the owned [`Element`] tree.
//!
//! The grammar is XML (well-formed XHTML); tokenizing is delegated to
//! `roxmltree`, and this module only reshapes its read-only tree into owned
//! nodes that can be rewritten during annotation.

use crate::errors::{DocumentError, DocumentResult};
use crate::node::{Attribute, Element, Node};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Parse markup text into its root element.
///
/// Element and attribute order are preserved. Namespace declarations are
/// kept as `xmlns` attributes on the element that introduces them. Comments
/// and processing instructions are dropped.
pub fn parse_element(text: &str) -> DocumentResult<Element> {
    let mut options = roxmltree::ParsingOptions::default();
    options.allow_dtd = true;

    let document = roxmltree::Document::parse_with_options(text, options).map_err(|e| {
        let pos = e.pos();
        DocumentError::Malformed {
            message: e.to_string(),
            line: pos.row,
            column: pos.col,
        }
    })?;

    Ok(convert(document.root_element()))
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let mut element = Element::new(qualify(node, tag.namespace(), tag.name(), true));

    for (prefix, uri) in declared_namespaces(node) {
        let name = match prefix {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        element.attributes.push(Attribute { name, value: uri });
    }

    for attr in node.attributes() {
        element.attributes.push(Attribute {
            name: qualify(node, attr.namespace(), attr.name(), false),
            value: attr.value().to_string(),
        });
    }

    for child in node.children() {
        if child.is_element() {
            element.children.push(Node::Element(convert(child)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.children.push(Node::Text(text.to_string()));
            }
        }
    }

    element
}

/// Bindings in scope on `node` that its parent element did not already have.
fn declared_namespaces(node: roxmltree::Node<'_, '_>) -> Vec<(Option<String>, String)> {
    let bindings = |n: roxmltree::Node<'_, '_>| -> Vec<(Option<String>, String)> {
        n.namespaces()
            .filter(|ns| ns.uri() != XML_NAMESPACE)
            .map(|ns| (ns.name().map(str::to_string), ns.uri().to_string()))
            .collect()
    };

    let inherited = node.parent_element().map(bindings).unwrap_or_default();
    bindings(node)
        .into_iter()
        .filter(|binding| !inherited.contains(binding))
        .collect()
}

/// Rebuild a qualified name from an expanded one.
///
/// Elements may use the default namespace; attributes need a prefix.
fn qualify(
    node: roxmltree::Node<'_, '_>,
    namespace: Option<&str>,
    local: &str,
    allow_default: bool,
) -> String {
    let uri = match namespace {
        Some(uri) => uri,
        None => return local.to_string(),
    };
    if uri == XML_NAMESPACE {
        return format!("xml:{}", local);
    }

    let mut prefixed = None;
    for ns in node.namespaces().filter(|ns| ns.uri() == uri) {
        match ns.name() {
            None if allow_default => return local.to_string(),
            None => {}
            Some(prefix) => {
                if prefixed.is_none() {
                    prefixed = Some(prefix.to_string());
                }
            }
        }
    }

    match prefixed {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order() {
        let root = parse_element(r#"<p b="2" a="1">one<i>two</i>three</p>"#).unwrap();
        assert_eq!(root.name, "p");
        let names: Vec<_> = root.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0], Node::text("one"));
        assert_eq!(root.text_content(), "onetwothree");
    }

    #[test]
    fn test_parse_keeps_namespace_prefixes() {
        let root = parse_element(
            r#"<html xmlns:spec="urn:specdoc:commands"><body><span spec:assertEquals="getGreeting()">Hi</span></body></html>"#,
        )
        .unwrap();
        assert_eq!(root.attribute("xmlns:spec"), Some("urn:specdoc:commands"));

        let span = root.descendants().find(|e| e.name == "span").unwrap();
        assert_eq!(span.attribute("spec:assertEquals"), Some("getGreeting()"));
        // Declarations are not repeated on descendants.
        assert!(span.namespace_declarations().next().is_none());
    }

    #[test]
    fn test_parse_default_namespace() {
        let root = parse_element(
            r#"<html xmlns="http://www.w3.org/1999/xhtml"><body/></html>"#,
        )
        .unwrap();
        assert_eq!(root.name, "html");
        assert_eq!(root.attribute("xmlns"), Some("http://www.w3.org/1999/xhtml"));
        assert_eq!(root.child_elements().next().unwrap().name, "body");
    }

    #[test]
    fn test_parse_drops_comments() {
        let root = parse_element("<p><!-- note -->text</p>").unwrap();
        assert_eq!(root.children, vec![Node::text("text")]);
    }

    #[test]
    fn test_parse_allows_doctype() {
        let root = parse_element("<!DOCTYPE html>\n<html><body/></html>").unwrap();
        assert_eq!(root.name, "html");
    }

    #[test]
    fn test_malformed_input() {
        let err = parse_element("<html><body></html>").unwrap_err();
        match err {
            DocumentError::Malformed { line, .. } => assert_eq!(line, 1),
        }
        assert!(parse_element("").is_err());
        assert!(parse_element("just text").is_err());
    }
}
