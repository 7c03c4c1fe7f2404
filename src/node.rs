//! The document tree: elements with ordered attributes and children, and text.

/// A node in a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A single attribute; `name` is the qualified name as written (`spec:set`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An element with its qualified name, attributes in document order, and
/// children in document order.
///
/// Namespace declarations are ordinary `xmlns` / `xmlns:prefix` attributes
/// on the element that declares them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Element(element) => element.text_content(),
            Node::Text(text) => text.clone(),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder-style text appender.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Replace an attribute's value in place, or append it.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// The local part of the qualified name.
    pub fn local_name(&self) -> &str {
        split_qualified(&self.name).1
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map_or(false, |v| v.split_whitespace().any(|c| c == class))
    }

    /// Add a class to the space-separated `class` attribute.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let value = match self.attribute("class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class)
            }
            _ => class.to_string(),
        };
        self.set_attribute("class", value);
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// This element and every descendant element, in pre-order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Descendant elements (including `self`) with the given local name and
    /// class, in document order.
    pub fn find_by_class<'a>(&'a self, local_name: &'a str, class: &'a str) -> Vec<&'a Element> {
        self.descendants()
            .filter(|e| e.local_name() == local_name && e.has_class(class))
            .collect()
    }

    /// Namespace declarations made on this element, as `(prefix, uri)`.
    /// The default namespace has an empty prefix.
    pub fn namespace_declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().filter_map(|a| {
            if a.name == "xmlns" {
                Some(("", a.value.as_str()))
            } else {
                a.name
                    .strip_prefix("xmlns:")
                    .map(|prefix| (prefix, a.value.as_str()))
            }
        })
    }
}

/// Split `prefix:local` into its parts; unprefixed names have an empty prefix.
pub fn split_qualified(name: &str) -> (&str, &str) {
    match name.find(':') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("", name),
    }
}

fn collect_text(children: &[Node], out: &mut String) {
    for child in children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// Pre-order iterator over an element and its descendant elements.
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack
            .extend(element.children.iter().rev().filter_map(Node::as_element));
        Some(element)
    }
}
