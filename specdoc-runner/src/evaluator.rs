//! Walks a document tree and runs the commands it contains.

use crate::assertion::Outcome;
use crate::context::{EvaluationContext, LinkReference};
use crate::fixture::Fixture;
use crate::registry::CommandRegistry;
use crate::summary::ResultSummary;
use specdoc::{Element, NamespaceScope, Node, Resource};
use tracing::debug;

/// An outcome together with where in the tree it belongs.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedOutcome {
    /// Child indices from the root element to the command's element.
    pub path: Vec<usize>,
    pub command: &'static str,
    pub expression: String,
    pub outcome: Outcome,
}

/// Everything one evaluation pass produced.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub outcomes: Vec<RecordedOutcome>,
    pub links: Vec<LinkReference>,
    pub summary: ResultSummary,
}

pub struct Evaluator<'r> {
    registry: &'r CommandRegistry,
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r CommandRegistry) -> Self {
        Self { registry }
    }

    /// Run every command in `root`, depth-first in document order.
    ///
    /// Failures never stop the walk; every visible command contributes
    /// exactly one outcome.
    pub fn evaluate(&self, root: &Element, fixture: &mut dyn Fixture, resource: &Resource) -> Evaluation {
        let mut ctx = EvaluationContext::new(fixture, resource.clone());
        let mut walk = Walk {
            registry: self.registry,
            scope: NamespaceScope::new(),
            path: Vec::new(),
            outcomes: Vec::new(),
        };
        walk.visit(root, &mut ctx);

        let mut summary = ResultSummary::new(resource.clone());
        for recorded in &walk.outcomes {
            summary.record(recorded.outcome.status());
        }

        Evaluation {
            outcomes: walk.outcomes,
            links: ctx.take_links(),
            summary,
        }
    }
}

struct Walk<'r> {
    registry: &'r CommandRegistry,
    scope: NamespaceScope,
    path: Vec<usize>,
    outcomes: Vec<RecordedOutcome>,
}

impl Walk<'_> {
    fn visit(&mut self, element: &Element, ctx: &mut EvaluationContext<'_>) {
        self.scope.push(element);

        let registry = self.registry;
        if let Some(call) = registry.resolve(element, &self.scope) {
            for child in element.child_elements() {
                self.set_up(child, ctx);
            }
            debug!(command = call.command.name(), path = ?self.path, "executing command");
            if let Some(outcome) = call.command.execute(&call, ctx) {
                self.outcomes.push(RecordedOutcome {
                    path: self.path.clone(),
                    command: call.command.name(),
                    expression: call.expression.clone(),
                    outcome,
                });
            }
        }

        for (index, child) in element.children.iter().enumerate() {
            if let Node::Element(child) = child {
                self.path.push(index);
                self.visit(child, ctx);
                self.path.pop();
            }
        }

        self.scope.pop();
    }

    /// Set-up phase: give every command below a command element a chance
    /// to prepare state before the enclosing command runs.
    fn set_up(&mut self, element: &Element, ctx: &mut EvaluationContext<'_>) {
        self.scope.push(element);
        if let Some(call) = self.registry.resolve(element, &self.scope) {
            call.command.set_up(&call, ctx);
        }
        for child in element.child_elements() {
            self.set_up(child, ctx);
        }
        self.scope.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::NormalizedComparator;
    use crate::fixture::{MethodFixture, ParamType};
    use crate::registry::COMMAND_NAMESPACE;
    use specdoc::Document;
    use std::sync::Arc;

    fn evaluate(markup: &str) -> Evaluation {
        let registry = CommandRegistry::standard(COMMAND_NAMESPACE, Arc::new(NormalizedComparator));
        let doc = Document::parse(markup).unwrap();
        let mut fixture = MethodFixture::new("example.Greeter", ())
            .method("getGreeting", &[], |_, _| Ok("Hello Bob!"))
            .method("greetingFor", &[("name", ParamType::Text)], |_, args| {
                Ok(format!("Hello {}!", args[0]))
            });
        Evaluator::new(&registry).evaluate(&doc.root, &mut fixture, &Resource::new("/spec/Greeter.html"))
    }

    #[test]
    fn test_outcomes_carry_paths_in_document_order() {
        let eval = evaluate(
            r#"<html xmlns:s="urn:specdoc:commands"><body>
                <p s:assertEquals="getGreeting()">Hello Bob!</p>
                <p s:assertEquals="getGreeting()">Hello Bo!</p>
                <p s:assertEquals="nope()">x</p>
            </body></html>"#,
        );
        let paths: Vec<_> = eval.outcomes.iter().map(|o| o.path.clone()).collect();
        assert_eq!(paths, vec![vec![0, 1], vec![0, 3], vec![0, 5]]);
        let totals = eval.summary.totals();
        assert_eq!((totals.successes, totals.failures, totals.exceptions), (1, 1, 1));
    }

    #[test]
    fn test_set_up_runs_before_enclosing_command() {
        let eval = evaluate(
            r##"<html xmlns:s="urn:specdoc:commands"><body>
                <p s:assertEquals="greetingFor(#name)">Hello <b s:set="#name">Bob</b>!</p>
            </body></html>"##,
        );
        assert_eq!(eval.outcomes.len(), 1);
        assert_eq!(eval.outcomes[0].outcome, Outcome::Success);
    }

    #[test]
    fn test_execute_result_feeds_later_assertion() {
        let eval = evaluate(
            r##"<html xmlns:s="urn:specdoc:commands"><body>
                <p s:execute="#greeting = greetingFor(#TEXT)">Ann</p>
                <p s:assertEquals="#greeting">Hello Ann!</p>
            </body></html>"##,
        );
        assert_eq!(eval.outcomes.len(), 1);
        assert_eq!(eval.outcomes[0].command, "assertEquals");
        assert!(eval.summary.is_satisfied());
    }

    #[test]
    fn test_links_are_collected_with_resolved_targets() {
        let eval = evaluate(
            r#"<html xmlns:s="urn:specdoc:commands"><body>
                <a s:link="" href="child/A.html">A</a>
                <a s:link="/B.html">B</a>
            </body></html>"#,
        );
        let targets: Vec<_> = eval.links.iter().map(|l| l.target.path().to_string()).collect();
        assert_eq!(targets, vec!["/spec/child/A.html", "/B.html"]);
        assert!(eval.outcomes.is_empty());
    }

    #[test]
    fn test_namespace_scope_is_respected() {
        let eval = evaluate(
            r#"<html><body>
                <div xmlns:s="urn:specdoc:commands"><p s:assertEquals="getGreeting()">Hello Bob!</p></div>
                <div xmlns:s="urn:other"><p s:assertEquals="getGreeting()">nope</p></div>
            </body></html>"#,
        );
        assert_eq!(eval.outcomes.len(), 1);
    }
}
