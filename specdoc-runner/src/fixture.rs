//! The fixture model: dynamic values, operation signatures, and the
//! [`Fixture`] capability the runner invokes by name.

use std::fmt;

/// Error type fixture operations return; any error converts with `?`.
pub type FixtureError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A dynamically typed value passed to or returned from a fixture operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Booleans, or the text `true` / `false` in any case.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "(null)"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n).map(Value::Int).unwrap_or(Value::Float(n as f64))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Declared type of an operation parameter; arguments are coerced to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Int,
    Float,
    Bool,
    /// Accepts the argument unchanged.
    Any,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::Text => "text",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::Bool => "bool",
            ParamType::Any => "any",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: ParamType,
}

/// Name and declared parameters of one fixture operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub params: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>, params: &[(&str, ParamType)]) -> Self {
        Self {
            name: name.into(),
            params: params
                .iter()
                .map(|(name, ty)| Param {
                    name: (*name).to_string(),
                    ty: *ty,
                })
                .collect(),
        }
    }

    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }
}

/// An object whose named operations a specification document invokes.
///
/// The runner never assumes a concrete shape: it asks [`Fixture::resolve`]
/// for an operation by name, coerces arguments to the declared parameter
/// types, then calls it. Most fixtures are built with [`MethodFixture`].
pub trait Fixture {
    /// Fully qualified type name, used to derive the document resource.
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Look up an operation by name.
    fn resolve(&self, operation: &str) -> Option<&Signature>;

    /// Call a resolved operation. `args` already match the signature.
    fn call(&mut self, operation: &str, args: Vec<Value>) -> Result<Value, FixtureError>;
}

type MethodBody<T> = Box<dyn Fn(&mut T, &[Value]) -> Result<Value, FixtureError>>;

struct Method<T> {
    signature: Signature,
    body: MethodBody<T>,
}

/// A [`Fixture`] assembled from a state value and named closures.
///
/// ```
/// use specdoc_runner::{Fixture, MethodFixture, ParamType, Value};
///
/// let mut fixture = MethodFixture::new("example.Greeter", String::from("Hello"))
///     .method("greetingFor", &[("name", ParamType::Text)], |salutation, args| {
///         Ok(format!("{} {}!", salutation, args[0]))
///     });
///
/// assert!(fixture.resolve("greetingFor").is_some());
/// let value = fixture.call("greetingFor", vec![Value::from("Bob")]).unwrap();
/// assert_eq!(value, Value::from("Hello Bob!"));
/// ```
pub struct MethodFixture<T> {
    type_name: String,
    state: T,
    methods: Vec<Method<T>>,
}

impl<T> MethodFixture<T> {
    pub fn new(type_name: impl Into<String>, state: T) -> Self {
        Self {
            type_name: type_name.into(),
            state,
            methods: Vec::new(),
        }
    }

    /// Register an operation. A later registration with the same name
    /// replaces the earlier one.
    pub fn method<F, R>(mut self, name: &str, params: &[(&str, ParamType)], body: F) -> Self
    where
        F: Fn(&mut T, &[Value]) -> Result<R, FixtureError> + 'static,
        R: Into<Value>,
    {
        self.methods.retain(|m| m.signature.name != name);
        self.methods.push(Method {
            signature: Signature::new(name, params),
            body: Box::new(move |state, args| body(state, args).map(Into::into)),
        });
        self
    }

    pub fn state(&self) -> &T {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut T {
        &mut self.state
    }

    pub fn into_state(self) -> T {
        self.state
    }
}

impl<T> Fixture for MethodFixture<T> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn resolve(&self, operation: &str) -> Option<&Signature> {
        self.methods
            .iter()
            .find(|m| m.signature.name == operation)
            .map(|m| &m.signature)
    }

    fn call(&mut self, operation: &str, args: Vec<Value>) -> Result<Value, FixtureError> {
        let method = self
            .methods
            .iter()
            .find(|m| m.signature.name == operation)
            .ok_or_else(|| format!("no operation named '{}'", operation))?;
        (method.body)(&mut self.state, &args)
    }
}

impl<T> fmt::Debug for MethodFixture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodFixture")
            .field("type_name", &self.type_name)
            .field(
                "methods",
                &self
                    .methods
                    .iter()
                    .map(|m| m.signature.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Fixture for Plain {
        fn resolve(&self, _operation: &str) -> Option<&Signature> {
            None
        }

        fn call(&mut self, operation: &str, _args: Vec<Value>) -> Result<Value, FixtureError> {
            Err(format!("no {}", operation).into())
        }
    }

    #[test]
    fn test_default_type_name_is_rust_path() {
        let plain = Plain;
        assert!(plain.type_name().ends_with("fixture::tests::Plain"));
    }

    #[test]
    fn test_method_fixture_mutates_state() {
        let mut fixture = MethodFixture::new("example.Counter", 0_i64)
            .method("increment", &[("by", ParamType::Int)], |count, args| {
                if let Value::Int(by) = args[0] {
                    *count += by;
                }
                Ok(*count)
            });

        fixture.call("increment", vec![Value::Int(2)]).unwrap();
        let value = fixture.call("increment", vec![Value::Int(3)]).unwrap();
        assert_eq!(value, Value::Int(5));
        assert_eq!(*fixture.state(), 5);
        assert_eq!(fixture.type_name(), "example.Counter");
    }

    #[test]
    fn test_method_replaces_same_name() {
        let fixture = MethodFixture::new("example.F", ())
            .method("op", &[], |_, _| Ok("one"))
            .method("op", &[("x", ParamType::Any)], |_, _| Ok("two"));
        assert_eq!(fixture.resolve("op").unwrap().params.len(), 1);
    }

    #[test]
    fn test_value_display_and_bool() {
        assert_eq!(Value::Null.to_string(), "(null)");
        assert_eq!(Value::from(Some(3_i64)).to_string(), "3");
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(" TRUE ").as_bool(), Some(true));
        assert_eq!(Value::Int(1).as_bool(), None);
    }
}
