use super::{Command, CommandCall};
use crate::assertion::{normalize_whitespace, ExceptionCause, Outcome};
use crate::context::EvaluationContext;
use crate::fixture::Value;
use crate::parser::{parse_expression, Expression};

/// Stores the element's text in a `#variable`.
///
/// Runs during the set-up phase of an enclosing command so that the value
/// is available when that command executes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Set;

fn target_variable(expression: &str) -> Result<String, ExceptionCause> {
    match parse_expression(expression) {
        Ok(Expression::Variable(name)) => Ok(name),
        Ok(_) => Err(ExceptionCause::new(
            expression,
            "set expects a variable such as #name",
        )),
        Err(err) => Err(ExceptionCause::new(expression, err.to_string())),
    }
}

impl Command for Set {
    fn name(&self) -> &'static str {
        "set"
    }

    fn set_up(&self, call: &CommandCall<'_>, ctx: &mut EvaluationContext<'_>) {
        if let Ok(name) = target_variable(&call.expression) {
            ctx.set_variable(name, Value::Text(normalize_whitespace(&call.element.text_content())));
        }
    }

    fn execute(&self, call: &CommandCall<'_>, ctx: &mut EvaluationContext<'_>) -> Option<Outcome> {
        match target_variable(&call.expression) {
            Ok(name) => {
                ctx.set_variable(name, Value::Text(normalize_whitespace(&call.element.text_content())));
                None
            }
            Err(cause) => Some(Outcome::Exception(cause)),
        }
    }
}
