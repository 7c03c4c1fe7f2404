//! Serializing an [`Element`] tree back to markup text.

use crate::node::{Element, Node};
use std::fmt::{self, Write};

/// Serialize an element and its subtree.
///
/// Childless elements are written self-closing. Text escapes `&`, `<`, `>`;
/// attribute values additionally escape `"`.
pub fn to_markup(element: &Element) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_element(&mut out, element);
    out
}

fn write_element(out: &mut impl Write, element: &Element) -> fmt::Result {
    write!(out, "<{}", element.name)?;
    for attr in &element.attributes {
        write!(out, " {}=\"", attr.name)?;
        write_escaped(out, &attr.value, true)?;
        out.write_char('"')?;
    }

    if element.children.is_empty() {
        return out.write_str("/>");
    }

    out.write_char('>')?;
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(out, child)?,
            Node::Text(text) => write_escaped(out, text, false)?,
        }
    }
    write!(out, "</{}>", element.name)
}

fn write_escaped(out: &mut impl Write, text: &str, in_attribute: bool) -> fmt::Result {
    for ch in text.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' if in_attribute => out.write_str("&quot;")?,
            other => out.write_char(other)?,
        }
    }
    Ok(())
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_element(f, self)
    }
}
