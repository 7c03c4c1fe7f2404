//! Built-in commands.

mod assert_boolean;
mod assert_equals;
mod execute;
mod link;
mod set;

pub use assert_boolean::AssertBoolean;
pub use assert_equals::AssertEquals;
pub use execute::Execute;
pub use link::Link;
pub use set::Set;

use crate::assertion::Outcome;
use crate::context::EvaluationContext;
use specdoc::Element;

/// A command matched to one element.
#[derive(Clone)]
pub struct CommandCall<'a> {
    pub command: &'a dyn Command,
    pub element: &'a Element,
    /// The matched expression, usually the command attribute's value.
    pub expression: String,
}

/// A unit of verification bound to a markup construct.
///
/// Commands are stateless and shared by every evaluation; all per-document
/// state lives in the [`EvaluationContext`].
pub trait Command: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Runs before the command whose element contains this one executes.
    fn set_up(&self, _call: &CommandCall<'_>, _ctx: &mut EvaluationContext<'_>) {}

    /// Run the command. `None` means the command has no visible result.
    fn execute(&self, call: &CommandCall<'_>, ctx: &mut EvaluationContext<'_>) -> Option<Outcome>;
}

impl std::fmt::Debug for CommandCall<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandCall")
            .field("command", &self.command.name())
            .field("element", &self.element.name)
            .field("expression", &self.expression)
            .finish()
    }
}
