//! Type tags and the converters registered for them.
//!
//! A [`TypeRegistry`] maps an opaque [`TypeTag`] to a [`Converter`]. Every
//! converter has the same contract: take one token, return a [`Value`] or a
//! [`ConversionError`]. Nothing here panics on bad input.

use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ConversionError;
use crate::value::Value;

/// Name of a value type known to a [`TypeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(Cow<'static, str>);

impl TypeTag {
    pub const STRING: TypeTag = TypeTag(Cow::Borrowed("string"));
    pub const BOOL: TypeTag = TypeTag(Cow::Borrowed("bool"));
    pub const INT: TypeTag = TypeTag(Cow::Borrowed("int"));
    pub const UINT: TypeTag = TypeTag(Cow::Borrowed("uint"));
    pub const FLOAT: TypeTag = TypeTag(Cow::Borrowed("float"));
    pub const CHAR: TypeTag = TypeTag(Cow::Borrowed("char"));
    pub const PATH: TypeTag = TypeTag(Cow::Borrowed("path"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TypeTag {
    fn default() -> Self {
        Self::STRING
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeTag {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// Turns one token into a [`Value`].
pub trait Converter: Send + Sync {
    fn convert(&self, token: &str) -> Result<Value, ConversionError>;
}

impl<F> Converter for F
where
    F: Fn(&str) -> Result<Value, ConversionError> + Send + Sync,
{
    fn convert(&self, token: &str) -> Result<Value, ConversionError> {
        self(token)
    }
}

/// Converters keyed by type tag, in registration order.
#[derive(Clone)]
pub struct TypeRegistry {
    converters: IndexMap<TypeTag, Arc<dyn Converter>>,
}

impl TypeRegistry {
    /// A registry holding the built-in converters: `string`, `bool`, `int`,
    /// `uint`, `float`, `char` and `path`.
    pub fn new() -> Self {
        let mut registry = Self {
            converters: IndexMap::new(),
        };
        registry
            .register(TypeTag::STRING, convert_string)
            .register(TypeTag::BOOL, convert_bool)
            .register(TypeTag::INT, convert_int)
            .register(TypeTag::UINT, convert_uint)
            .register(TypeTag::FLOAT, convert_float)
            .register(TypeTag::CHAR, convert_char)
            .register(TypeTag::PATH, convert_path);
        registry
    }

    /// Register (or replace) the converter for `tag`.
    pub fn register(
        &mut self,
        tag: impl Into<TypeTag>,
        converter: impl Converter + 'static,
    ) -> &mut Self {
        let tag = tag.into();
        tracing::trace!(tag = %tag, "registering converter");
        self.converters.insert(tag, Arc::new(converter));
        self
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.converters.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &TypeTag> {
        self.converters.keys()
    }

    pub fn try_convert(&self, token: &str, tag: &TypeTag) -> Result<Value, ConversionError> {
        match self.converters.get(tag) {
            Some(converter) => converter.convert(token),
            None => Err(ConversionError::UnknownType(tag.clone())),
        }
    }

    pub(crate) fn converter(&self, tag: &TypeTag) -> Option<Arc<dyn Converter>> {
        self.converters.get(tag).cloned()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.converters.keys()).finish()
    }
}

fn convert_string(token: &str) -> Result<Value, ConversionError> {
    Ok(Value::Str(token.to_string()))
}

fn convert_bool(token: &str) -> Result<Value, ConversionError> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
        "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
        _ => Err(ConversionError::invalid(token, "expected true or false")),
    }
}

fn convert_int(token: &str) -> Result<Value, ConversionError> {
    token
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|e| ConversionError::invalid(token, e))
}

fn convert_uint(token: &str) -> Result<Value, ConversionError> {
    token
        .parse::<u64>()
        .map(Value::UInt)
        .map_err(|e| ConversionError::invalid(token, e))
}

fn convert_float(token: &str) -> Result<Value, ConversionError> {
    token
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|e| ConversionError::invalid(token, e))
}

fn convert_char(token: &str) -> Result<Value, ConversionError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::Char(c)),
        _ => Err(ConversionError::invalid(token, "expected exactly one character")),
    }
}

fn convert_path(token: &str) -> Result<Value, ConversionError> {
    if token.is_empty() {
        return Err(ConversionError::invalid(token, "path is empty"));
    }
    Ok(Value::Path(PathBuf::from(token)))
}
