#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/specdoc/main/assets/specdoc.svg",
    issue_tracker_base_url = "https://github.com/storyscript/specdoc/issues/"
)]

//! Core building blocks for executable specification documents.
//!
//! A specification is an XHTML document with embedded commands. This crate
//! knows how to name such documents ([`Resource`]), read them into an owned
//! tree ([`Document`], [`Element`], [`Node`]), write that tree back out, and
//! move text in and out of storage ([`Source`], [`Target`]). Running the
//! commands lives in `specdoc-runner`.
//!
//! ## Example
//!
//! ```
//! use specdoc::{Document, Resource};
//!
//! let doc = Document::parse(r#"<html><body><p class="x">Hi</p></body></html>"#).unwrap();
//! let p = doc.root.descendants().find(|e| e.name == "p").unwrap();
//! assert_eq!(p.text_content(), "Hi");
//!
//! let resource = Resource::from_type_name("example.Fixture", "html");
//! assert_eq!(resource.path(), "/example/Fixture.html");
//! ```

mod document;
mod errors;
mod markup;
mod namespace;
mod node;
mod parser;
mod port;
mod resource;

pub use document::Document;
pub use errors::{DocumentError, DocumentResult, SourceError};
pub use markup::to_markup;
pub use namespace::NamespaceScope;
pub use node::{split_qualified, Attribute, Descendants, Element, Node};
pub use port::{FileSource, FileTarget, MemorySource, MemoryTarget, Source, Target};
pub use resource::Resource;
