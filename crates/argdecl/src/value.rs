use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single converted token.
///
/// Converters registered with a [`TypeRegistry`](crate::TypeRegistry) always
/// produce one of these variants, whatever their type tag is called.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
    Path(PathBuf),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Self::UInt(n) => Some(*n),
            Self::Int(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p.as_path()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Str(s) => f.write_str(s),
            Self::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::UInt(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<PathBuf> for Value {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

/// What one match of an argument writes into a [`ResultSet`](crate::ResultSet).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Scalar(Value),
    Sequence(Vec<Value>),
}

impl ArgValue {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Scalar(_) => None,
            Self::Sequence(v) => Some(v.as_slice()),
        }
    }

    pub(crate) fn fits(&self, shape: Shape) -> bool {
        match (shape, self) {
            (Shape::Flag, Self::Scalar(v)) => v.as_bool().is_some(),
            (Shape::Single, Self::Scalar(_)) | (Shape::Sequence, Self::Sequence(_)) => true,
            _ => false,
        }
    }
}

impl From<Value> for ArgValue {
    fn from(v: Value) -> Self {
        Self::Scalar(v)
    }
}

macro_rules! scalar_arg_value {
    ($($ty: ty),*) => {
        $(
            impl From<$ty> for ArgValue {
                fn from(v: $ty) -> Self {
                    Self::Scalar(Value::from(v))
                }
            }
        )*
    }
}

scalar_arg_value!(bool, i64, u64, f64, char, String, &str, PathBuf);

impl From<Vec<Value>> for ArgValue {
    fn from(v: Vec<Value>) -> Self {
        Self::Sequence(v)
    }
}

/// The form an argument's value takes, fixed when the argument is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Labeled, no values: presence means `true`.
    Flag,
    /// Positional: one converted token.
    Single,
    /// Fixed arity above zero, or remainder mode.
    Sequence,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flag => "flag",
            Self::Single => "single-value",
            Self::Sequence => "multi-value",
        })
    }
}
