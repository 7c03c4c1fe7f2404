use super::{Command, CommandCall};
use crate::assertion::{ExceptionCause, Outcome};
use crate::context::EvaluationContext;
use tracing::debug;

/// `assertTrue` / `assertFalse`: the expression must yield the given boolean.
#[derive(Debug, Clone, Copy)]
pub struct AssertBoolean {
    expect: bool,
}

impl AssertBoolean {
    pub fn assert_true() -> Self {
        Self { expect: true }
    }

    pub fn assert_false() -> Self {
        Self { expect: false }
    }
}

impl Command for AssertBoolean {
    fn name(&self) -> &'static str {
        if self.expect {
            "assertTrue"
        } else {
            "assertFalse"
        }
    }

    fn execute(&self, call: &CommandCall<'_>, ctx: &mut EvaluationContext<'_>) -> Option<Outcome> {
        let outcome = match ctx.evaluate_str(&call.expression, call.element) {
            Ok(value) => match value.as_bool() {
                Some(b) if b == self.expect => Outcome::Success,
                Some(b) => Outcome::failure(call.element.text_content(), format!("== {}", b)),
                None => Outcome::Exception(ExceptionCause::new(
                    call.expression.as_str(),
                    format!("expected a boolean but got {} '{}'", value.kind(), value),
                )),
            },
            Err(err) => Outcome::Exception(err.into_cause(&call.expression)),
        };
        debug!(command = self.name(), expression = %call.expression, status = %outcome.status());
        Some(outcome)
    }
}
