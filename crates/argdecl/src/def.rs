//! Argument definitions and the consumption algorithm.
//!
//! An [`ArgDef`] is what callers declare. Resolving it against a
//! [`TypeRegistry`] validates the declaration and yields an immutable [`Arg`].
//! Everything that changes during a parse run lives in an [`ArgState`], so a
//! resolved `Arg` can be shared between runs (and threads) freely.

use std::fmt;
use std::sync::Arc;

use crate::cursor::TokenCursor;
use crate::error::{ConfigError, CursorError};
use crate::results::ResultSet;
use crate::types::{Converter, TypeRegistry, TypeTag};
use crate::value::{ArgValue, Shape, Value};

/// Declaration of one argument.
///
/// An argument with no labels is *ordered*: it is matched by position rather
/// than by a label token.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgDef {
    name: Option<String>,
    labels: Vec<String>,
    label_prefixes: Vec<char>,
    arg_count: usize,
    remainder: bool,
    value_type: TypeTag,
    default_value: Option<ArgValue>,
    help: String,
    min_instances: usize,
    max_instances: usize,
}

impl Default for ArgDef {
    fn default() -> Self {
        Self {
            name: None,
            labels: Vec::new(),
            label_prefixes: vec!['-'],
            arg_count: 0,
            remainder: false,
            value_type: TypeTag::STRING,
            default_value: None,
            help: String::new(),
            min_instances: 0,
            max_instances: 1,
        }
    }
}

impl ArgDef {
    /// An empty declaration: ordered, unnamed, `string`, optional.
    pub fn new() -> Self {
        Self::default()
    }

    /// An ordered (positional) argument.
    pub fn ordered(name: impl Into<String>) -> Self {
        Self::new().name(name)
    }

    /// A labeled argument matched by any of `labels`.
    pub fn labeled<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut def = Self::new();
        for label in labels {
            def = def.label(label);
        }
        def
    }

    /// Name the results are stored under. Derived from the labels when unset.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a label. Labels already present are ignored.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !self.labels.contains(&label) {
            self.labels.push(label);
        }
        self
    }

    /// Characters stripped from labels when deriving a name. Defaults to `-`.
    pub fn label_prefixes(mut self, prefixes: impl IntoIterator<Item = char>) -> Self {
        self.label_prefixes = prefixes.into_iter().collect();
        self
    }

    /// Number of value tokens following the label. Zero makes a flag.
    pub fn arg_count(mut self, count: usize) -> Self {
        self.arg_count = count;
        self
    }

    /// Capture every remaining token instead of a fixed count.
    pub fn remainder(mut self, remainder: bool) -> Self {
        self.remainder = remainder;
        self
    }

    /// Type every value token is converted with. Defaults to `string`.
    pub fn value_type(mut self, tag: impl Into<TypeTag>) -> Self {
        self.value_type = tag.into();
        self
    }

    /// Value injected when the argument never appears.
    ///
    /// A single value for a multi-value argument is stored as a one-element
    /// sequence.
    pub fn default_value(mut self, value: impl Into<ArgValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Text shown next to the argument in usage output.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Fewest times a labeled argument must appear. Ignored for ordered ones.
    pub fn min_instances(mut self, min: usize) -> Self {
        self.min_instances = min;
        self
    }

    /// Most times a labeled argument may appear. Ignored for ordered ones.
    pub fn max_instances(mut self, max: usize) -> Self {
        self.max_instances = max;
        self
    }

    /// Shorthand for `min_instances(1)`.
    pub fn required(self) -> Self {
        self.min_instances(1)
    }

    /// Whether this is matched by position, i.e. has no labels.
    pub fn is_ordered(&self) -> bool {
        self.labels.is_empty()
    }

    /// Validate the declaration and produce a resolved [`Arg`].
    pub fn resolve(&self, registry: &TypeRegistry) -> Result<Arg, ConfigError> {
        let Some(mut converter) = registry.converter(&self.value_type) else {
            return Err(ConfigError::UnknownType {
                tag: self.value_type.clone(),
            });
        };

        let name = match &self.name {
            Some(name) => name.clone(),
            None => self.name_from_labels().ok_or(ConfigError::Unnamed)?,
        };

        if self.labels.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::EmptyLabel { name });
        }

        let mut value_type = self.value_type.clone();
        let mut arg_count = if self.remainder { 0 } else { self.arg_count };
        let (min_instances, max_instances, shape) = if self.is_ordered() {
            arg_count = 0;
            let shape = if self.remainder {
                Shape::Sequence
            } else {
                Shape::Single
            };
            (1, 1, shape)
        } else {
            if self.max_instances == 0 || self.max_instances < self.min_instances {
                return Err(ConfigError::InstanceBounds {
                    name,
                    min: self.min_instances,
                    max: self.max_instances,
                });
            }
            let shape = if arg_count == 0 && !self.remainder {
                if value_type == TypeTag::STRING {
                    value_type = TypeTag::BOOL;
                    converter = registry.converter(&value_type).ok_or_else(|| {
                        ConfigError::UnknownType {
                            tag: TypeTag::BOOL,
                        }
                    })?;
                } else if value_type != TypeTag::BOOL {
                    return Err(ConfigError::NonBoolFlag {
                        name,
                        tag: value_type,
                    });
                }
                Shape::Flag
            } else {
                Shape::Sequence
            };
            (self.min_instances, self.max_instances, shape)
        };

        let default_value = match (&self.default_value, shape) {
            // A single default value for a multi-value argument becomes a one-element sequence.
            (Some(ArgValue::Scalar(value)), Shape::Sequence) => {
                Some(ArgValue::Sequence(vec![value.clone()]))
            }
            (Some(value), _) if !value.fits(shape) => {
                return Err(ConfigError::DefaultShape {
                    name,
                    expected: shape,
                });
            }
            (Some(value), _) => Some(value.clone()),
            (None, Shape::Flag) => Some(ArgValue::Scalar(Value::Bool(false))),
            (None, _) => None,
        };

        tracing::debug!(
            name = %name,
            shape = %shape,
            value_type = %value_type,
            arg_count,
            "resolved argument"
        );

        Ok(Arg {
            name,
            labels: self.labels.clone(),
            arg_count,
            remainder: self.remainder,
            value_type,
            converter,
            shape,
            default_value,
            help: self.help.clone(),
            min_instances,
            max_instances,
        })
    }

    /// The longest label with its prefix characters stripped.
    ///
    /// Ties go to the label declared first.
    fn name_from_labels(&self) -> Option<String> {
        let mut best: Option<&str> = None;
        for label in &self.labels {
            let trimmed = label.trim_matches(self.label_prefixes.as_slice());
            if trimmed.is_empty() {
                continue;
            }
            if best.is_none_or(|b| trimmed.len() > b.len()) {
                best = Some(trimmed);
            }
        }
        best.map(str::to_string)
    }
}

/// A resolved argument definition.
///
/// Immutable: all per-run bookkeeping lives in [`ArgState`].
#[derive(Clone)]
pub struct Arg {
    name: String,
    labels: Vec<String>,
    arg_count: usize,
    remainder: bool,
    value_type: TypeTag,
    converter: Arc<dyn Converter>,
    shape: Shape,
    default_value: Option<ArgValue>,
    help: String,
    min_instances: usize,
    max_instances: usize,
}

impl Arg {
    /// Key the results are stored under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label tokens, in declaration order. Empty for ordered arguments.
    pub fn labels(&self) -> &[String] {
        self.labels.as_slice()
    }

    /// Value tokens taken after the label; 0 for flags and remainder or ordered arguments.
    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    pub fn is_remainder(&self) -> bool {
        self.remainder
    }

    /// Effective type, after a zero-arity `string` option is turned into `bool`.
    pub fn value_type(&self) -> &TypeTag {
        &self.value_type
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Value injected by [`Arg::finish`] when the argument was never matched.
    pub fn default_value(&self) -> Option<&ArgValue> {
        self.default_value.as_ref()
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Minimum number of instances; always 1 for ordered arguments.
    pub fn min_instances(&self) -> usize {
        self.min_instances
    }

    /// Maximum number of instances; always 1 for ordered arguments.
    pub fn max_instances(&self) -> usize {
        self.max_instances
    }

    pub fn is_ordered(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_required(&self) -> bool {
        self.min_instances > 0
    }

    /// Whether `token` is exactly one of this argument's labels.
    pub fn matches_label(&self, token: &str) -> bool {
        self.labels.iter().any(|l| l == token)
    }

    /// Fresh per-run state for this argument.
    pub fn new_state(&self) -> ArgState {
        ArgState::default()
    }

    /// Try to consume this argument at the head of `cursor`.
    ///
    /// Returns `Ok(false)` when the head is not this argument, or when it is
    /// but the instance was rejected; rejections are recorded in `state`.
    /// On `Ok(true)` the value has been added to `results` and the cursor
    /// advanced past the label or position and its values.
    pub fn consume<T: AsRef<str>>(
        &self,
        state: &mut ArgState,
        cursor: &mut TokenCursor<'_, T>,
        results: &mut ResultSet,
    ) -> Result<bool, CursorError> {
        let Some(head) = cursor.head() else {
            return Err(CursorError::Empty);
        };

        if !self.is_ordered() && !self.matches_label(head.as_ref()) {
            return Ok(false);
        }

        state.instance_count += 1;
        if state.instance_count > self.max_instances {
            tracing::debug!(name = %self.name, "rejected: too many instances");
            state.errors.push(format!(
                "Encountered the option '{}' too many times (only allowed {} time(s)).",
                self.name, self.max_instances
            ));
            return Ok(false);
        }

        if !self.remainder && cursor.len() < self.arg_count + 1 {
            tracing::debug!(name = %self.name, "rejected: not enough values");
            state.errors.push(format!(
                "The option '{}' expects {} following argument(s), only {} were encountered.",
                self.name,
                self.arg_count,
                cursor.len() - 1
            ));
            return Ok(false);
        }

        let value = match self.extract(cursor) {
            Ok(value) => value,
            Err(token) => {
                tracing::debug!(name = %self.name, token = %token, "rejected: conversion failed");
                state.errors.push(format!(
                    "The '{}' argument expects a value of type '{}', unable to parse '{}'.",
                    self.name, self.value_type, token
                ));
                return Ok(false);
            }
        };

        tracing::trace!(name = %self.name, instance = state.instance_count, "matched");
        results.add(&self.name, value);

        if self.remainder {
            cursor.advance_to_end();
        } else {
            cursor.advance(self.arg_count + 1)?;
        }
        Ok(true)
    }

    /// Enforce the minimum instance count and apply the default.
    pub fn finish(&self, state: &mut ArgState, results: &mut ResultSet) {
        if state.instance_count < self.min_instances {
            let message = if self.min_instances == 1 {
                format!("The '{}' argument is required.", self.name)
            } else {
                format!(
                    "The '{}' argument must be provided at least {} times.",
                    self.name, self.min_instances
                )
            };
            state.errors.push(message);
            return;
        }

        if state.instance_count == 0 {
            if let Some(default) = &self.default_value {
                tracing::trace!(name = %self.name, "applying default");
                results.add(&self.name, default.clone());
            }
        }
    }

    /// Render this argument for a usage line.
    pub fn usage(&self, include_help: bool) -> String {
        crate::usage::render(self, include_help)
    }

    /// Convert the value tokens at the head of `cursor`.
    ///
    /// The caller has already checked that enough tokens are available. On
    /// failure the offending token is returned.
    fn extract<T: AsRef<str>>(&self, cursor: &TokenCursor<'_, T>) -> Result<ArgValue, String> {
        match self.shape {
            Shape::Flag => Ok(ArgValue::Scalar(Value::Bool(true))),
            Shape::Single => self.convert(cursor[0].as_ref()).map(ArgValue::Scalar),
            Shape::Sequence => {
                let tokens = cursor.as_slice();
                let values = if self.is_ordered() {
                    tokens
                } else if self.remainder {
                    &tokens[1..]
                } else {
                    &tokens[1..=self.arg_count]
                };
                values
                    .iter()
                    .map(|token| self.convert(token.as_ref()))
                    .collect::<Result<Vec<_>, _>>()
                    .map(ArgValue::Sequence)
            }
        }
    }

    fn convert(&self, token: &str) -> Result<Value, String> {
        self.converter
            .convert(token)
            .map_err(|_| token.to_string())
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arg")
            .field("name", &self.name)
            .field("labels", &self.labels)
            .field("arg_count", &self.arg_count)
            .field("remainder", &self.remainder)
            .field("value_type", &self.value_type)
            .field("shape", &self.shape)
            .field("default_value", &self.default_value)
            .field("min_instances", &self.min_instances)
            .field("max_instances", &self.max_instances)
            .finish_non_exhaustive()
    }
}

/// Per-run bookkeeping for one [`Arg`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgState {
    instance_count: usize,
    errors: Vec<String>,
}

impl ArgState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything from a previous run.
    pub fn reset(&mut self) {
        self.instance_count = 0;
        self.errors.clear();
    }

    /// How many times the argument was encountered, including rejected
    /// instances.
    pub fn instance_count(&self) -> usize {
        self.instance_count
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        self.errors.as_slice()
    }
}
