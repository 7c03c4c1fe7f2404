use super::{Command, CommandCall};
use crate::assertion::{Comparator, NormalizedComparator, Outcome};
use crate::context::EvaluationContext;
use std::sync::Arc;
use tracing::debug;

/// Compares the element's text with the value of its expression.
pub struct AssertEquals {
    comparator: Arc<dyn Comparator>,
}

impl AssertEquals {
    pub fn new(comparator: Arc<dyn Comparator>) -> Self {
        Self { comparator }
    }
}

impl Default for AssertEquals {
    fn default() -> Self {
        Self::new(Arc::new(NormalizedComparator))
    }
}

impl Command for AssertEquals {
    fn name(&self) -> &'static str {
        "assertEquals"
    }

    fn execute(&self, call: &CommandCall<'_>, ctx: &mut EvaluationContext<'_>) -> Option<Outcome> {
        let expected = call.element.text_content();
        let outcome = match ctx.evaluate_str(&call.expression, call.element) {
            Ok(actual) if self.comparator.matches(&expected, &actual) => Outcome::Success,
            Ok(actual) => Outcome::failure(expected, actual.to_string()),
            Err(err) => Outcome::Exception(err.into_cause(&call.expression)),
        };
        debug!(expression = %call.expression, status = %outcome.status(), "assertEquals");
        Some(outcome)
    }
}

impl std::fmt::Debug for AssertEquals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AssertEquals")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::ExactComparator;
    use crate::fixture::MethodFixture;
    use specdoc::{Element, Resource};

    fn check(command: &AssertEquals, text: &str, expression: &str) -> Outcome {
        let mut fixture = MethodFixture::new("example.Greeter", ())
            .method("getGreeting", &[], |_, _| Ok("Hello  Bob!"));
        let mut ctx = EvaluationContext::new(&mut fixture, Resource::new("/Greeter.html"));
        let element = Element::new("span").with_text(text);
        let call = CommandCall {
            command,
            element: &element,
            expression: expression.to_string(),
        };
        command.execute(&call, &mut ctx).unwrap()
    }

    #[test]
    fn test_success_and_failure() {
        let command = AssertEquals::default();
        assert_eq!(check(&command, "Hello Bob!", "getGreeting()"), Outcome::Success);
        assert_eq!(
            check(&command, "Hello Bo!", "greeting"),
            Outcome::failure("Hello Bo!", "Hello  Bob!")
        );
    }

    #[test]
    fn test_comparator_is_pluggable() {
        let command = AssertEquals::new(Arc::new(ExactComparator));
        assert_eq!(
            check(&command, "Hello Bob!", "getGreeting()"),
            Outcome::failure("Hello Bob!", "Hello  Bob!")
        );
    }

    #[test]
    fn test_missing_operation_is_exception() {
        let command = AssertEquals::default();
        match check(&command, "x", "nothing()") {
            Outcome::Exception(cause) => {
                assert_eq!(cause.expression, "nothing()");
                assert!(cause.message.contains("nothing"));
            }
            other => panic!("expected exception, got {:?}", other),
        }
    }
}
