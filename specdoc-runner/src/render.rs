//! Annotating a document with evaluation outcomes.

use crate::assertion::Outcome;
use crate::evaluator::RecordedOutcome;
use specdoc::{Element, Node};
use std::collections::HashMap;

/// Styles for the result classes, embedded into rendered documents.
pub const STYLESHEET: &str = "\
.success { background-color: #afa; }
.failure { background-color: #ffb0b0; }
.failure del.expected { text-decoration: line-through; color: #700; }
.failure ins.actual { text-decoration: none; color: #070; margin-left: 0.5em; }
.exception { background-color: #fdd; }
.exceptionMessage { display: block; color: #a00; font-weight: bold; }
pre.stackTrace { font-size: 0.8em; color: #555; margin: 0.25em 0; }
";

/// Render one outcome onto a copy of the element it belongs to.
pub fn render(outcome: &Outcome, original: &Element) -> Element {
    let mut element = original.clone();
    element.add_class(outcome.status().as_str());

    match outcome {
        Outcome::Success => {}
        Outcome::Failure { expected, actual } => {
            let mut del = Element::new("del").with_attribute("class", "expected");
            // Nested elements may carry outcomes of their own; keep them.
            if element.children.iter().any(|child| matches!(child, Node::Element(_))) {
                del.children = std::mem::take(&mut element.children);
            } else {
                del = del.with_text(expected.as_str());
            }
            element.children = vec![
                del.into(),
                Node::text(" "),
                Element::new("ins")
                    .with_attribute("class", "actual")
                    .with_text(actual.as_str())
                    .into(),
            ];
        }
        Outcome::Exception(cause) => {
            element.children.push(
                Element::new("span")
                    .with_attribute("class", "exceptionMessage")
                    .with_text(cause.message.as_str())
                    .into(),
            );
            if !cause.context.is_empty() {
                element.children.push(
                    Element::new("pre")
                        .with_attribute("class", "stackTrace")
                        .with_text(cause.context.join("\n"))
                        .into(),
                );
            }
        }
    }

    element
}

/// Rebuild `root` with every recorded outcome rendered at its path.
pub fn annotate(root: &Element, outcomes: &[RecordedOutcome]) -> Element {
    let by_path: HashMap<&[usize], &Outcome> = outcomes
        .iter()
        .map(|recorded| (recorded.path.as_slice(), &recorded.outcome))
        .collect();
    let mut path = Vec::new();
    rebuild(root, &mut path, &by_path)
}

fn rebuild(element: &Element, path: &mut Vec<usize>, outcomes: &HashMap<&[usize], &Outcome>) -> Element {
    let mut rebuilt = Element {
        name: element.name.clone(),
        attributes: element.attributes.clone(),
        children: Vec::with_capacity(element.children.len()),
    };
    for (index, child) in element.children.iter().enumerate() {
        let child = match child {
            Node::Element(child) => {
                path.push(index);
                let child = rebuild(child, path, outcomes);
                path.pop();
                Node::Element(child)
            }
            Node::Text(text) => Node::Text(text.clone()),
        };
        rebuilt.children.push(child);
    }

    match outcomes.get(path.as_slice()) {
        Some(outcome) => render(outcome, &rebuilt),
        None => rebuilt,
    }
}

/// Append the result stylesheet to the document's `<head>`, if it has one.
pub fn with_stylesheet(mut root: Element) -> Element {
    let head = root.children.iter_mut().find_map(|child| match child {
        Node::Element(element) if element.local_name() == "head" => Some(element),
        _ => None,
    });
    if let Some(head) = head {
        head.children.push(
            Element::new("style")
                .with_attribute("type", "text/css")
                .with_text(STYLESHEET)
                .into(),
        );
    }
    root
}
