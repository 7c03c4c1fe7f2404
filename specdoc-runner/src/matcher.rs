//! Matching elements to commands.

use specdoc::{Element, NamespaceScope};

/// Recognizes the elements a command governs.
///
/// Returns the command's expression (usually an attribute value) when the
/// element matches.
pub trait Matcher: Send + Sync {
    fn matches(&self, element: &Element, scope: &NamespaceScope) -> Option<String>;
}

impl<F> Matcher for F
where
    F: Fn(&Element, &NamespaceScope) -> Option<String> + Send + Sync,
{
    fn matches(&self, element: &Element, scope: &NamespaceScope) -> Option<String> {
        self(element, scope)
    }
}

/// Matches an attribute by namespace URI and local name, whatever prefix
/// the document binds to that URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatcher {
    pub namespace: String,
    pub local_name: String,
}

impl AttributeMatcher {
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }
}

impl Matcher for AttributeMatcher {
    fn matches(&self, element: &Element, scope: &NamespaceScope) -> Option<String> {
        element
            .attributes
            .iter()
            .find(|attr| scope.attribute_matches(&attr.name, &self.namespace, &self.local_name))
            .map(|attr| attr.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "urn:specdoc:commands";

    #[test]
    fn test_attribute_matcher_follows_prefix_binding() {
        let root = Element::new("html").with_attribute("xmlns:c", NS);
        let span = Element::new("span").with_attribute("c:assertEquals", "getGreeting()");
        let mut scope = NamespaceScope::new();
        scope.push(&root);
        scope.push(&span);

        let matcher = AttributeMatcher::new(NS, "assertEquals");
        assert_eq!(matcher.matches(&span, &scope).as_deref(), Some("getGreeting()"));
        assert_eq!(AttributeMatcher::new(NS, "execute").matches(&span, &scope), None);
        assert_eq!(AttributeMatcher::new("urn:other", "assertEquals").matches(&span, &scope), None);
    }

    #[test]
    fn test_unbound_prefix_does_not_match() {
        let span = Element::new("span").with_attribute("c:assertEquals", "x");
        let mut scope = NamespaceScope::new();
        scope.push(&span);
        assert_eq!(AttributeMatcher::new(NS, "assertEquals").matches(&span, &scope), None);
    }

    #[test]
    fn test_closure_matcher() {
        let matcher = |element: &Element, _: &NamespaceScope| {
            element.attribute("data-check").map(str::to_string)
        };
        let el = Element::new("p").with_attribute("data-check", "ok()");
        assert_eq!(matcher.matches(&el, &NamespaceScope::new()).as_deref(), Some("ok()"));
    }
}
