//! Name-based invocation of fixture operations.
//!
//! Everything that can go wrong between "the document names an operation"
//! and "the operation returned" ends up as an [`InvocationError`]; the
//! evaluator turns those into exception outcomes.

use crate::fixture::{Fixture, FixtureError, ParamType, Signature, Value};
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::debug;

/// One argument after its expression has been evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Parameter name for named arguments.
    pub name: Option<String>,
    pub value: Value,
}

impl Argument {
    pub fn positional(value: impl Into<Value>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }

    pub fn named(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
        }
    }
}

/// Why an operation could not produce a value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvocationError {
    #[error("No operation named '{operation}' on fixture {fixture}")]
    OperationNotFound { operation: String, fixture: String },

    #[error("'{operation}' expects {expected} argument(s) but {actual} were given")]
    Arity {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("'{operation}' has no parameter named '{parameter}'")]
    UnknownParameter { operation: String, parameter: String },

    #[error("parameter '{parameter}' of '{operation}' was given more than once")]
    DuplicateParameter { operation: String, parameter: String },

    #[error("cannot convert {value} ({kind}) to {expected} for parameter '{parameter}' of '{operation}'")]
    Coercion {
        operation: String,
        parameter: String,
        expected: ParamType,
        value: String,
        kind: &'static str,
    },

    #[error("{operation} failed: {message}")]
    Raised {
        operation: String,
        message: String,
        /// The error's `source()` chain, outermost first.
        context: Vec<String>,
    },

    #[error("{operation} panicked: {message}")]
    Panicked { operation: String, message: String },
}

impl InvocationError {
    /// Supporting lines for rendering beneath the message.
    pub fn context(&self) -> Vec<String> {
        match self {
            InvocationError::Raised { context, .. } => context.clone(),
            _ => Vec::new(),
        }
    }
}

/// Resolves, binds, coerces, and calls fixture operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInvoker;

impl FixtureInvoker {
    /// Invoke `operation` on `fixture` with evaluated arguments.
    ///
    /// When the name is not found and no arguments are given, property
    /// accessors `get<Name>` and `is<Name>` are tried as well.
    pub fn invoke(
        &self,
        fixture: &mut dyn Fixture,
        operation: &str,
        args: Vec<Argument>,
    ) -> Result<Value, InvocationError> {
        let signature = resolve(fixture, operation, args.is_empty()).ok_or_else(|| {
            InvocationError::OperationNotFound {
                operation: operation.to_string(),
                fixture: fixture.type_name().to_string(),
            }
        })?;

        let values = bind(&signature, args)?;
        debug!(operation = %signature.name, args = values.len(), "invoking fixture operation");

        let name = signature.name.clone();
        let called = panic::catch_unwind(AssertUnwindSafe(|| fixture.call(&name, values)));
        match called {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(raised(name, err)),
            Err(payload) => Err(InvocationError::Panicked {
                operation: name,
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

fn resolve(fixture: &dyn Fixture, operation: &str, accessor: bool) -> Option<Signature> {
    if let Some(signature) = fixture.resolve(operation) {
        return Some(signature.clone());
    }
    if !accessor {
        return None;
    }
    let mut chars = operation.chars();
    let first = chars.next()?;
    let capitalized: String = first.to_uppercase().chain(chars).collect();
    ["get", "is"]
        .iter()
        .map(|prefix| format!("{}{}", prefix, capitalized))
        .find_map(|name| fixture.resolve(&name).cloned())
        .filter(|signature| signature.params.is_empty())
}

/// Place positional then named arguments into parameter slots and coerce.
fn bind(signature: &Signature, args: Vec<Argument>) -> Result<Vec<Value>, InvocationError> {
    let operation = &signature.name;
    let expected = signature.params.len();
    let actual = args.len();
    let mut slots: Vec<Option<Value>> = vec![None; expected];
    let mut next_positional = 0;

    for arg in args {
        let index = match &arg.name {
            Some(name) => signature.param_index(name).ok_or_else(|| {
                InvocationError::UnknownParameter {
                    operation: operation.clone(),
                    parameter: name.clone(),
                }
            })?,
            None => {
                let index = next_positional;
                next_positional += 1;
                index
            }
        };
        let slot = slots.get_mut(index).ok_or_else(|| InvocationError::Arity {
            operation: operation.clone(),
            expected,
            actual,
        })?;
        if slot.is_some() {
            return Err(InvocationError::DuplicateParameter {
                operation: operation.clone(),
                parameter: signature.params[index].name.clone(),
            });
        }
        *slot = Some(arg.value);
    }

    slots
        .into_iter()
        .zip(&signature.params)
        .map(|(slot, param)| {
            let value = slot.ok_or_else(|| InvocationError::Arity {
                operation: operation.clone(),
                expected,
                actual,
            })?;
            coerce(value, param.ty).map_err(|value| InvocationError::Coercion {
                operation: operation.clone(),
                parameter: param.name.clone(),
                expected: param.ty,
                kind: value.kind(),
                value: value.to_string(),
            })
        })
        .collect()
}

/// Convert a value to the declared type, returning the original on failure.
pub fn coerce(value: Value, ty: ParamType) -> Result<Value, Value> {
    match (ty, value) {
        (ParamType::Any, value) => Ok(value),
        (ParamType::Text, Value::Null) => Ok(Value::Null),
        (ParamType::Text, value @ Value::Text(_)) => Ok(value),
        (ParamType::Text, value) => Ok(Value::Text(value.to_string())),
        (ParamType::Int, value @ Value::Int(_)) => Ok(value),
        (ParamType::Int, Value::Float(f))
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
        {
            Ok(Value::Int(f as i64))
        }
        (ParamType::Int, Value::Text(text)) => match text.trim().parse::<i64>() {
            Ok(n) => Ok(Value::Int(n)),
            Err(_) => Err(Value::Text(text)),
        },
        (ParamType::Float, value @ Value::Float(_)) => Ok(value),
        (ParamType::Float, Value::Int(n)) => Ok(Value::Float(n as f64)),
        (ParamType::Float, Value::Text(text)) => match text.trim().parse::<f64>() {
            Ok(n) => Ok(Value::Float(n)),
            Err(_) => Err(Value::Text(text)),
        },
        (ParamType::Bool, value) => match value.as_bool() {
            Some(b) => Ok(Value::Bool(b)),
            None => Err(value),
        },
        (_, value) => Err(value),
    }
}

fn raised(operation: String, err: FixtureError) -> InvocationError {
    let mut context = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        context.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    InvocationError::Raised {
        operation,
        message: err.to_string(),
        context,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::MethodFixture;
    use std::fmt;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "disk unavailable")
        }
    }

    impl std::error::Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "could not load greeting")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    fn fixture() -> MethodFixture<()> {
        MethodFixture::new("example.Fixture", ())
            .method("getGreeting", &[], |_, _| Ok("Hello Bob!"))
            .method("isPolite", &[], |_, _| Ok(true))
            .method(
                "add",
                &[("a", ParamType::Int), ("b", ParamType::Int)],
                |_, args| match (&args[0], &args[1]) {
                    (Value::Int(a), Value::Int(b)) => Ok(a + b),
                    _ => Err("expected ints".into()),
                },
            )
            .method("fail", &[], |_, _| -> Result<Value, FixtureError> {
                Err(Box::new(Outer(Inner)))
            })
            .method("explode", &[], |_, _| -> Result<Value, FixtureError> {
                panic!("boom")
            })
    }

    #[test]
    fn test_invoke_by_name() {
        let mut f = fixture();
        let value = FixtureInvoker.invoke(&mut f, "getGreeting", vec![]).unwrap();
        assert_eq!(value, Value::from("Hello Bob!"));
    }

    #[test]
    fn test_property_accessors() {
        let mut f = fixture();
        assert_eq!(
            FixtureInvoker.invoke(&mut f, "greeting", vec![]).unwrap(),
            Value::from("Hello Bob!")
        );
        assert_eq!(
            FixtureInvoker.invoke(&mut f, "polite", vec![]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_operation_not_found() {
        let mut f = fixture();
        let err = FixtureInvoker.invoke(&mut f, "missing", vec![]).unwrap_err();
        assert_eq!(
            err,
            InvocationError::OperationNotFound {
                operation: "missing".to_string(),
                fixture: "example.Fixture".to_string(),
            }
        );
    }

    #[test]
    fn test_coerces_text_arguments() {
        let mut f = fixture();
        let value = FixtureInvoker
            .invoke(
                &mut f,
                "add",
                vec![Argument::positional("2"), Argument::named("b", " 40 ")],
            )
            .unwrap();
        assert_eq!(value, Value::Int(42));
    }

    #[test]
    fn test_named_arguments_fill_slots() {
        let mut f = fixture();
        let value = FixtureInvoker
            .invoke(
                &mut f,
                "add",
                vec![Argument::named("b", 1_i64), Argument::named("a", 2_i64)],
            )
            .unwrap();
        assert_eq!(value, Value::Int(3));
    }

    #[test]
    fn test_binding_errors() {
        let mut f = fixture();
        let err = FixtureInvoker
            .invoke(&mut f, "add", vec![Argument::positional(1_i64)])
            .unwrap_err();
        assert!(matches!(err, InvocationError::Arity { expected: 2, actual: 1, .. }));

        let err = FixtureInvoker
            .invoke(&mut f, "add", vec![Argument::positional("two"), Argument::positional(1_i64)])
            .unwrap_err();
        assert!(matches!(err, InvocationError::Coercion { expected: ParamType::Int, .. }));

        let err = FixtureInvoker
            .invoke(&mut f, "add", vec![Argument::positional(1_i64), Argument::named("c", 1_i64)])
            .unwrap_err();
        assert!(matches!(err, InvocationError::UnknownParameter { .. }));

        let err = FixtureInvoker
            .invoke(&mut f, "add", vec![Argument::positional(1_i64), Argument::named("a", 1_i64)])
            .unwrap_err();
        assert!(matches!(err, InvocationError::DuplicateParameter { .. }));
    }

    #[test]
    fn test_raised_errors_keep_source_chain() {
        let mut f = fixture();
        let err = FixtureInvoker.invoke(&mut f, "fail", vec![]).unwrap_err();
        assert_eq!(err.to_string(), "fail failed: could not load greeting");
        assert_eq!(err.context(), vec!["caused by: disk unavailable".to_string()]);
    }

    #[test]
    fn test_panics_are_captured() {
        let mut f = fixture();
        let err = FixtureInvoker.invoke(&mut f, "explode", vec![]).unwrap_err();
        assert_eq!(
            err,
            InvocationError::Panicked {
                operation: "explode".to_string(),
                message: "boom".to_string(),
            }
        );
    }

    #[test]
    fn test_coerce_rules() {
        assert_eq!(coerce(Value::Int(3), ParamType::Text), Ok(Value::from("3")));
        assert_eq!(coerce(Value::Float(2.0), ParamType::Int), Ok(Value::Int(2)));
        assert_eq!(coerce(Value::Float(2.5), ParamType::Int), Err(Value::Float(2.5)));
        assert_eq!(coerce(Value::Float(1e300), ParamType::Int), Err(Value::Float(1e300)));
        assert_eq!(coerce(Value::Float(-1e19), ParamType::Int), Err(Value::Float(-1e19)));
        assert_eq!(coerce(Value::Int(2), ParamType::Float), Ok(Value::Float(2.0)));
        assert_eq!(coerce(Value::from("yes"), ParamType::Bool), Err(Value::from("yes")));
        assert_eq!(coerce(Value::Null, ParamType::Int), Err(Value::Null));
    }
}
