//! Mutable state shared by the commands of one document evaluation.

use crate::assertion::{normalize_whitespace, ExceptionCause};
use crate::fixture::{Fixture, Value};
use crate::invoker::{Argument, FixtureInvoker, InvocationError};
use crate::parser::{parse_expression, Expression, ExpressionError, Operand};
use serde::Serialize;
use specdoc::{Element, Resource};
use std::collections::HashMap;
use thiserror::Error;

/// Name of the variable holding the current element's text.
pub const TEXT_VARIABLE: &str = "TEXT";

/// A link discovered while evaluating a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LinkReference {
    pub target: Resource,
    /// The document the link was found in.
    pub source: Resource,
}

/// Why an expression could not be evaluated.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvaluationError {
    #[error(transparent)]
    Expression(#[from] ExpressionError),
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

impl EvaluationError {
    /// Convert into an exception cause for `expression`.
    pub fn into_cause(self, expression: &str) -> ExceptionCause {
        let context = match &self {
            EvaluationError::Invocation(err) => err.context(),
            EvaluationError::Expression(_) => Vec::new(),
        };
        ExceptionCause::new(expression, self.to_string()).with_context(context)
    }
}

/// Fixture, variables, and discovered links for one document.
pub struct EvaluationContext<'f> {
    fixture: &'f mut dyn Fixture,
    resource: Resource,
    invoker: FixtureInvoker,
    variables: HashMap<String, Value>,
    links: Vec<LinkReference>,
}

impl<'f> EvaluationContext<'f> {
    pub fn new(fixture: &'f mut dyn Fixture, resource: Resource) -> Self {
        Self {
            fixture,
            resource,
            invoker: FixtureInvoker,
            variables: HashMap::new(),
            links: Vec::new(),
        }
    }

    /// The document being evaluated.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Parse and evaluate a command expression against `element`.
    pub fn evaluate_str(&mut self, expression: &str, element: &Element) -> Result<Value, EvaluationError> {
        let parsed = parse_expression(expression)?;
        self.evaluate(&parsed, element)
    }

    pub fn evaluate(&mut self, expression: &Expression, element: &Element) -> Result<Value, EvaluationError> {
        match expression {
            Expression::Variable(name) => Ok(self.lookup(name, element)),
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| Argument {
                        name: arg.name.clone(),
                        value: self.operand(&arg.value, element),
                    })
                    .collect();
                Ok(self.invoker.invoke(&mut *self.fixture, name, args)?)
            }
            Expression::Assign { variable, value } => {
                let value = self.evaluate(value, element)?;
                self.set_variable(variable.clone(), value.clone());
                Ok(value)
            }
        }
    }

    fn operand(&self, operand: &Operand, element: &Element) -> Value {
        match operand {
            Operand::Variable(name) => self.lookup(name, element),
            Operand::Literal(value) => value.clone(),
        }
    }

    /// Undefined variables read as `Null`.
    fn lookup(&self, name: &str, element: &Element) -> Value {
        if name == TEXT_VARIABLE {
            return Value::Text(normalize_whitespace(&element.text_content()));
        }
        self.variables.get(name).cloned().unwrap_or(Value::Null)
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Record a link to `target`, already resolved against this document.
    pub fn add_link(&mut self, target: Resource) {
        self.links.push(LinkReference {
            target,
            source: self.resource.clone(),
        });
    }

    pub fn take_links(&mut self) -> Vec<LinkReference> {
        std::mem::take(&mut self.links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{MethodFixture, ParamType};

    fn greeter() -> MethodFixture<()> {
        MethodFixture::new("example.Greeter", ()).method(
            "greetingFor",
            &[("name", ParamType::Text)],
            |_, args| Ok(format!("Hello {}!", args[0])),
        )
    }

    #[test]
    fn test_assignment_then_variable() {
        let mut fixture = greeter();
        let mut ctx = EvaluationContext::new(&mut fixture, Resource::new("/Greeter.html"));
        let element = Element::new("span").with_text("  Bob\n ");

        let value = ctx.evaluate_str("#greeting = greetingFor(#TEXT)", &element).unwrap();
        assert_eq!(value, Value::from("Hello Bob!"));
        assert_eq!(ctx.variable("greeting"), Some(&Value::from("Hello Bob!")));
        assert_eq!(
            ctx.evaluate_str("#greeting", &element).unwrap(),
            Value::from("Hello Bob!")
        );
    }

    #[test]
    fn test_undefined_variable_is_null() {
        let mut fixture = greeter();
        let mut ctx = EvaluationContext::new(&mut fixture, Resource::new("/Greeter.html"));
        let element = Element::new("span");
        assert_eq!(ctx.evaluate_str("#missing", &element).unwrap(), Value::Null);
        assert_eq!(
            ctx.evaluate_str("greetingFor(#missing)", &element).unwrap(),
            Value::from("Hello (null)!")
        );
    }

    #[test]
    fn test_errors_become_causes() {
        let mut fixture = greeter();
        let mut ctx = EvaluationContext::new(&mut fixture, Resource::new("/Greeter.html"));
        let element = Element::new("span");

        let cause = ctx
            .evaluate_str("farewell()", &element)
            .unwrap_err()
            .into_cause("farewell()");
        assert_eq!(cause.expression, "farewell()");
        assert_eq!(
            cause.message,
            "No operation named 'farewell' on fixture example.Greeter"
        );

        let cause = ctx.evaluate_str("a b", &element).unwrap_err().into_cause("a b");
        assert!(cause.message.starts_with("Parse error"));
    }

    #[test]
    fn test_links_carry_source() {
        let mut fixture = greeter();
        let mut ctx = EvaluationContext::new(&mut fixture, Resource::new("/spec/A.html"));
        ctx.add_link(Resource::new("/spec/B.html"));
        let links = ctx.take_links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].source, Resource::new("/spec/A.html"));
        assert!(ctx.take_links().is_empty());
    }
}
