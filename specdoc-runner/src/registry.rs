//! Ordered mapping from matchers to commands.

use crate::assertion::Comparator;
use crate::commands::{AssertBoolean, AssertEquals, Command, CommandCall, Execute, Link, Set};
use crate::matcher::{AttributeMatcher, Matcher};
use specdoc::{Element, NamespaceScope};
use std::sync::Arc;
use tracing::debug;

/// Default namespace URI for command attributes.
pub const COMMAND_NAMESPACE: &str = "urn:specdoc:commands";

struct Entry {
    matcher: Box<dyn Matcher>,
    command: Box<dyn Command>,
}

/// Commands in registration order. The first matching entry wins.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<Entry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in command set bound to `namespace`.
    pub fn standard(namespace: &str, comparator: Arc<dyn Comparator>) -> Self {
        let mut registry = Self::new();
        registry.register_standard(namespace, comparator);
        registry
    }

    pub fn register(&mut self, matcher: impl Matcher + 'static, command: impl Command + 'static) -> &mut Self {
        self.register_boxed(Box::new(matcher), Box::new(command))
    }

    pub fn register_boxed(&mut self, matcher: Box<dyn Matcher>, command: Box<dyn Command>) -> &mut Self {
        self.entries.push(Entry { matcher, command });
        self
    }

    /// Append the built-in commands after anything already registered.
    pub fn register_standard(&mut self, namespace: &str, comparator: Arc<dyn Comparator>) -> &mut Self {
        self.register(AttributeMatcher::new(namespace, "set"), Set)
            .register(AttributeMatcher::new(namespace, "execute"), Execute)
            .register(
                AttributeMatcher::new(namespace, "assertEquals"),
                AssertEquals::new(comparator),
            )
            .register(AttributeMatcher::new(namespace, "assertTrue"), AssertBoolean::assert_true())
            .register(AttributeMatcher::new(namespace, "assertFalse"), AssertBoolean::assert_false())
            .register(AttributeMatcher::new(namespace, "link"), Link)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The command governing `element`, if any.
    pub fn resolve<'a>(&'a self, element: &'a Element, scope: &NamespaceScope) -> Option<CommandCall<'a>> {
        let mut matches = self.entries.iter().filter_map(|entry| {
            entry
                .matcher
                .matches(element, scope)
                .map(|expression| (entry, expression))
        });

        let (entry, expression) = matches.next()?;
        for (ignored, _) in matches {
            debug!(
                element = %element.name,
                used = entry.command.name(),
                ignored = ignored.command.name(),
                "element matches more than one command"
            );
        }

        Some(CommandCall {
            command: entry.command.as_ref(),
            element,
            expression,
        })
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.command.name()))
            .finish()
    }
}
