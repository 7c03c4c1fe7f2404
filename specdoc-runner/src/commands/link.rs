use super::{Command, CommandCall};
use crate::assertion::{ExceptionCause, Outcome};
use crate::context::EvaluationContext;
use tracing::debug;

/// Registers another document to process after this one.
///
/// The target is the command value, or the element's `href` when the value
/// is empty, resolved against the current document.
#[derive(Debug, Default, Clone, Copy)]
pub struct Link;

impl Command for Link {
    fn name(&self) -> &'static str {
        "link"
    }

    fn execute(&self, call: &CommandCall<'_>, ctx: &mut EvaluationContext<'_>) -> Option<Outcome> {
        let reference = Some(call.expression.trim())
            .filter(|value| !value.is_empty())
            .or_else(|| call.element.attribute("href").map(str::trim))
            .filter(|value| !value.is_empty());

        match reference {
            Some(reference) => {
                let target = ctx.resource().resolve(reference);
                debug!(source = %ctx.resource(), target = %target, "link");
                ctx.add_link(target);
                None
            }
            None => Some(Outcome::Exception(ExceptionCause::new(
                call.expression.as_str(),
                "link has no target",
            ))),
        }
    }
}
