use super::{Command, CommandCall};
use crate::assertion::Outcome;
use crate::context::EvaluationContext;
use tracing::debug;

/// Evaluates an expression for its side effects; `#var = op()` keeps the
/// result. Reports only failures.
#[derive(Debug, Default, Clone, Copy)]
pub struct Execute;

impl Command for Execute {
    fn name(&self) -> &'static str {
        "execute"
    }

    fn execute(&self, call: &CommandCall<'_>, ctx: &mut EvaluationContext<'_>) -> Option<Outcome> {
        match ctx.evaluate_str(&call.expression, call.element) {
            Ok(value) => {
                debug!(expression = %call.expression, result = %value, "execute");
                None
            }
            Err(err) => Some(Outcome::Exception(err.into_cause(&call.expression))),
        }
    }
}
