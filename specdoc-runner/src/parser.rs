//! Parser for command expressions.
//!
//! Command attributes carry small expressions:
//!
//! - `#name` reads a variable (`#TEXT` is the current element's text)
//! - `#name = expr` evaluates `expr` and stores the result
//! - `op` or `op(arg, param=arg, ...)` invokes a fixture operation
//! - `'text'`, `"text"`, `42`, `1.5`, `true`, `false`, `null` are literals
//!
//! Arguments are variables or literals; calls do not nest.

use crate::fixture::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^#([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*)$").expect("valid assignment regex")
});

static VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([A-Za-z_][A-Za-z0-9_]*)$").expect("valid variable regex"));

static CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^([A-Za-z_][A-Za-z0-9_]*)\s*(?:\((.*)\))?$").expect("valid call regex")
});

static NAMED_ARGUMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*)$").expect("valid named argument regex")
});

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid number regex"));

/// A parsed command expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Variable(String),
    Literal(Value),
    Call {
        name: String,
        args: Vec<ArgumentExpr>,
    },
    Assign {
        variable: String,
        value: Box<Expression>,
    },
}

/// One argument in a call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentExpr {
    pub name: Option<String>,
    pub value: Operand,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Variable(String),
    Literal(Value),
}

/// Error parsing an expression.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Parse error at position {position}: {message}")]
pub struct ExpressionError {
    pub message: String,
    /// Byte offset into the expression text.
    pub position: usize,
}

impl ExpressionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: 0,
        }
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }
}

/// Parse a command attribute value into an [`Expression`].
pub fn parse_expression(input: &str) -> Result<Expression, ExpressionError> {
    let (text, offset) = trimmed(input, 0);
    if text.is_empty() {
        return Err(ExpressionError::new("empty expression").at(offset));
    }

    if let Some(caps) = ASSIGNMENT.captures(text) {
        let variable = caps[1].to_string();
        let rest = caps.get(2).map_or(("", text.len()), |m| (m.as_str(), m.start()));
        let value = parse_value(rest.0, offset + rest.1)?;
        return Ok(Expression::Assign {
            variable,
            value: Box::new(value),
        });
    }

    parse_value(text, offset)
}

fn parse_value(input: &str, offset: usize) -> Result<Expression, ExpressionError> {
    let (text, offset) = trimmed(input, offset);
    if text.is_empty() {
        return Err(ExpressionError::new("expected a value").at(offset));
    }

    if text.starts_with('#') {
        return variable_name(text, offset).map(Expression::Variable);
    }
    if let Some(value) = literal(text, offset)? {
        return Ok(Expression::Literal(value));
    }

    let caps = CALL
        .captures(text)
        .ok_or_else(|| ExpressionError::new(format!("unsupported expression '{}'", text)).at(offset))?;
    let name = caps[1].to_string();
    let args = match caps.get(2) {
        Some(m) if !m.as_str().trim().is_empty() => {
            parse_arguments(m.as_str(), offset + m.start())?
        }
        _ => Vec::new(),
    };
    Ok(Expression::Call { name, args })
}

fn parse_arguments(input: &str, offset: usize) -> Result<Vec<ArgumentExpr>, ExpressionError> {
    split_arguments(input, offset)?
        .into_iter()
        .map(|(piece, start)| parse_argument(piece, start))
        .collect()
}

fn parse_argument(input: &str, offset: usize) -> Result<ArgumentExpr, ExpressionError> {
    let (text, offset) = trimmed(input, offset);
    match NAMED_ARGUMENT.captures(text) {
        Some(caps) => {
            let value = caps.get(2).map_or(("", text.len()), |m| (m.as_str(), m.start()));
            Ok(ArgumentExpr {
                name: Some(caps[1].to_string()),
                value: parse_operand(value.0, offset + value.1)?,
            })
        }
        None => Ok(ArgumentExpr {
            name: None,
            value: parse_operand(text, offset)?,
        }),
    }
}

fn parse_operand(input: &str, offset: usize) -> Result<Operand, ExpressionError> {
    let (text, offset) = trimmed(input, offset);
    if text.is_empty() {
        return Err(ExpressionError::new("empty argument").at(offset));
    }
    if text.starts_with('#') {
        return variable_name(text, offset).map(Operand::Variable);
    }
    literal(text, offset)?
        .map(Operand::Literal)
        .ok_or_else(|| ExpressionError::new(format!("unsupported argument '{}'", text)).at(offset))
}

/// Literal value, `Ok(None)` when the text is not literal syntax at all.
fn literal(text: &str, offset: usize) -> Result<Option<Value>, ExpressionError> {
    if let Some(quote) = text.chars().next().filter(|c| *c == '\'' || *c == '"') {
        let inner = &text[1..];
        return match inner.find(quote) {
            Some(end) if end + 1 == inner.len() => Ok(Some(Value::Text(inner[..end].to_string()))),
            Some(end) => Err(ExpressionError::new("unexpected text after string literal")
                .at(offset + end + 2)),
            None => Err(ExpressionError::new("unterminated string literal").at(offset)),
        };
    }

    match text {
        "true" => return Ok(Some(Value::Bool(true))),
        "false" => return Ok(Some(Value::Bool(false))),
        "null" => return Ok(Some(Value::Null)),
        _ => {}
    }

    if NUMBER.is_match(text) {
        let value = match text.parse::<i64>() {
            Ok(n) => Value::Int(n),
            Err(_) => text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| ExpressionError::new(format!("invalid number '{}': {}", text, e)).at(offset))?,
        };
        return Ok(Some(value));
    }

    Ok(None)
}

fn variable_name(text: &str, offset: usize) -> Result<String, ExpressionError> {
    VARIABLE
        .captures(text)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| ExpressionError::new(format!("invalid variable '{}'", text)).at(offset))
}

/// Split on top-level commas, keeping quoted commas. Returns each piece with
/// its byte offset.
fn split_arguments(input: &str, offset: usize) -> Result<Vec<(&str, usize)>, ExpressionError> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut quote: Option<(char, usize)> = None;

    for (pos, ch) in input.char_indices() {
        match quote {
            Some((open, _)) if ch == open => quote = None,
            Some(_) => {}
            None if ch == '\'' || ch == '"' => quote = Some((ch, pos)),
            None if ch == ',' => {
                pieces.push((&input[start..pos], offset + start));
                start = pos + 1;
            }
            None => {}
        }
    }

    if let Some((_, pos)) = quote {
        return Err(ExpressionError::new("unterminated string literal").at(offset + pos));
    }
    pieces.push((&input[start..], offset + start));
    Ok(pieces)
}

fn trimmed(input: &str, offset: usize) -> (&str, usize) {
    let start = input.len() - input.trim_start().len();
    (input.trim(), offset + start)
}
