use crate::errors::DocumentResult;
use crate::markup::to_markup;
use crate::node::Element;
use crate::parser::parse_element;

/// A parsed specification document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    /// Parse markup text.
    pub fn parse(text: &str) -> DocumentResult<Self> {
        Ok(Self {
            root: parse_element(text)?,
        })
    }

    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    /// Serialize back to markup.
    pub fn to_markup(&self) -> String {
        to_markup(&self.root)
    }
}
