//! Entity identifier expressions
//!
//! A deliberately small, read-only path language for pulling an entity id out
//! of an invocation's arguments or its result:
//!
//! ```text
//! #id                 argument `id`
//! result.id           field `id` of the returned value
//! #command.items[0]   first element of an array field
//! #payload['user-id'] field with a name that is not an identifier
//! #order?.customer.id `?.` is accepted and behaves like `.`
//! ```
//!
//! The leading `#` is optional. `result` is reserved and always refers to the
//! operation's return value (null before the operation has run). Expressions
//! are parsed once and can only walk existing values: there are no calls,
//! operators or assignments.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use super::arguments::Arguments;

/// Reserved variable bound to the operation's return value
pub const RESULT_VARIABLE: &str = "result";

static NULL: Value = Value::Null;

/// Why an expression failed to parse or resolve
///
/// These never escape [`evaluate`] or [`EntityIdExpression::resolve`]; they
/// are only surfaced by the lower-level [`PathExpression`] API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// The expression text is not valid syntax
    #[error("malformed expression at offset {offset}: {message}")]
    Malformed {
        /// Byte offset of the problem
        offset: usize,
        /// What was expected
        message: String,
    },

    /// The root variable is neither an argument nor `result`
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// A segment was applied to a null value
    #[error("cannot read {0} of null")]
    NullDereference(String),

    /// An object has no such field or an array no such element
    #[error("no value at {0}")]
    Missing(String),

    /// A segment does not apply to the value's type
    #[error("cannot read {segment} of {kind}")]
    TypeMismatch {
        /// The offending segment
        segment: String,
        /// JSON type of the value it was applied to
        kind: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
    Key(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, ".{}", name),
            Self::Index(index) => write!(f, "[{}]", index),
            Self::Key(key) => write!(f, "['{}']", key),
        }
    }
}

/// A parsed path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    root: String,
    segments: Vec<Segment>,
}

impl PathExpression {
    /// Parse expression text
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        Parser::new(source.trim()).parse()
    }

    /// Name of the root variable
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Whether the expression reads the operation's result
    pub fn reads_result(&self) -> bool {
        self.root == RESULT_VARIABLE
    }

    /// Walk the bindings and stringify whatever the path lands on
    ///
    /// `Ok(None)` means the path resolved to null.
    pub fn evaluate(
        &self,
        args: &Arguments,
        result: Option<&Value>,
    ) -> Result<Option<String>, ExpressionError> {
        let mut current = if self.reads_result() {
            result.unwrap_or(&NULL)
        } else {
            args.get(&self.root)
                .ok_or_else(|| ExpressionError::UnknownVariable(self.root.clone()))?
        };

        for segment in &self.segments {
            current = match (current, segment) {
                (Value::Null, _) => {
                    return Err(ExpressionError::NullDereference(segment.to_string()))
                }
                (Value::Object(map), Segment::Field(name) | Segment::Key(name)) => map
                    .get(name)
                    .ok_or_else(|| ExpressionError::Missing(segment.to_string()))?,
                (Value::Array(items), Segment::Index(index)) => items
                    .get(*index)
                    .ok_or_else(|| ExpressionError::Missing(segment.to_string()))?,
                (other, _) => {
                    return Err(ExpressionError::TypeMismatch {
                        segment: segment.to_string(),
                        kind: json_kind(other),
                    })
                }
            };
        }

        Ok(stringify(current))
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.root)?;
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// An entity id expression compiled once at registration time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntityIdExpression {
    /// No expression: the entity id is always absent
    #[default]
    Empty,
    /// A valid path
    Path(PathExpression),
    /// Text that failed to parse; resolves to nothing
    Invalid {
        /// Original text
        source: String,
        /// Parse failure
        error: ExpressionError,
    },
}

impl EntityIdExpression {
    /// Compile expression text; blank text yields [`EntityIdExpression::Empty`]
    pub fn compile(source: &str) -> Self {
        if source.trim().is_empty() {
            return Self::Empty;
        }
        match PathExpression::parse(source) {
            Ok(path) => Self::Path(path),
            Err(error) => Self::Invalid {
                source: source.to_string(),
                error,
            },
        }
    }

    /// Whether there is no expression at all
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Resolve against the bindings; every failure becomes `None`
    pub fn resolve(&self, args: &Arguments, result: Option<&Value>) -> Option<String> {
        match self {
            Self::Empty | Self::Invalid { .. } => None,
            Self::Path(path) => match path.evaluate(args, result) {
                Ok(value) => value,
                Err(e) => {
                    tracing::debug!(
                        expression = %path,
                        error = %e,
                        "Entity id expression did not resolve"
                    );
                    None
                }
            },
        }
    }
}

/// Evaluate expression text against named arguments and an optional result
///
/// Blank text returns `None` without evaluating. Parse and resolution failures
/// also return `None`.
pub fn evaluate(expression: &str, args: &Arguments, result: Option<&Value>) -> Option<String> {
    EntityIdExpression::compile(expression).resolve(args, result)
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn parse(mut self) -> Result<PathExpression, ExpressionError> {
        if self.peek() == Some(b'#') {
            self.pos += 1;
        }
        let root = self.identifier()?;

        let mut segments = Vec::new();
        while let Some(byte) = self.peek() {
            let segment = match byte {
                b'.' => {
                    self.pos += 1;
                    Segment::Field(self.identifier()?)
                }
                b'?' => {
                    self.pos += 1;
                    self.expect(b'.')?;
                    Segment::Field(self.identifier()?)
                }
                b'[' => {
                    self.pos += 1;
                    self.bracket()?
                }
                _ => return Err(self.malformed("expected '.', '?.' or '['")),
            };
            segments.push(segment);
        }

        Ok(PathExpression { root, segments })
    }

    fn identifier(&mut self) -> Result<String, ExpressionError> {
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => self.pos += 1,
            _ => return Err(self.malformed("expected identifier")),
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
        {
            self.pos += 1;
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn bracket(&mut self) -> Result<Segment, ExpressionError> {
        let segment = match self.peek() {
            Some(quote @ (b'\'' | b'"')) => {
                self.pos += 1;
                let start = self.pos;
                while matches!(self.peek(), Some(b) if b != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(self.malformed("unterminated quoted key"));
                }
                let key = self.src[start..self.pos].to_string();
                self.pos += 1;
                Segment::Key(key)
            }
            Some(b) if b.is_ascii_digit() => {
                let start = self.pos;
                while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
                let index = self.src[start..self.pos]
                    .parse::<usize>()
                    .map_err(|_| self.malformed("index out of range"))?;
                Segment::Index(index)
            }
            _ => return Err(self.malformed("expected index or quoted key")),
        };
        self.expect(b']')?;
        Ok(segment)
    }

    fn expect(&mut self, byte: u8) -> Result<(), ExpressionError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.malformed(&format!("expected '{}'", byte as char)))
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn malformed(&self, message: &str) -> ExpressionError {
        ExpressionError::Malformed {
            offset: self.pos,
            message: message.to_string(),
        }
    }
}
