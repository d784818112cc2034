use thiserror::Error;

use crate::types::TypeTag;
use crate::value::Shape;

/// A mistake in how an argument was declared.
///
/// These are returned from resolution and never accumulated: a definition that
/// fails to resolve cannot take part in a parse run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("can't use type '{tag}': no converter registered")]
    UnknownType { tag: TypeTag },
    #[error("at least one label or a name must be provided")]
    Unnamed,
    #[error("argument '{name}' has an empty label")]
    EmptyLabel { name: String },
    #[error(
        "argument '{name}': only type 'bool' is allowed for labeled arguments without values (declared '{tag}')"
    )]
    NonBoolFlag { name: String, tag: TypeTag },
    #[error(
        "argument '{name}': max instances ({max}) must be at least 1 and not below min instances ({min})"
    )]
    InstanceBounds {
        name: String,
        min: usize,
        max: usize,
    },
    #[error("argument '{name}': default value does not fit a {expected} argument")]
    DefaultShape { name: String, expected: Shape },
    #[error("duplicate argument name '{0}'")]
    DuplicateName(String),
    #[error("label '{label}' is claimed by both '{first}' and '{second}'")]
    LabelConflict {
        label: String,
        first: String,
        second: String,
    },
}

/// Misuse of a [`TokenCursor`](crate::TokenCursor) by the code driving a parse.
///
/// Seeing one of these means the driver is broken, not that the user typed
/// something wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("cursor must hold at least one token when an argument consumes from it")]
    Empty,
    #[error("cannot advance cursor by {by}: only {remaining} token(s) remain")]
    Overrun { by: usize, remaining: usize },
    #[error("cursor window {start}..{end} does not fit {len} token(s)")]
    Window {
        start: usize,
        end: usize,
        len: usize,
    },
}

/// Failure to turn a token into a [`Value`](crate::Value).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("no converter registered for type '{0}'")]
    UnknownType(TypeTag),
    #[error("unable to parse '{token}': {reason}")]
    Invalid { token: String, reason: String },
}

impl ConversionError {
    pub fn invalid(token: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            token: token.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Every user-facing problem found during one parse run, in report order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join("\n"))]
pub struct InputErrors {
    messages: Vec<String>,
}

impl InputErrors {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[String] {
        self.messages.as_slice()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Cursor(#[from] CursorError),
    #[error(transparent)]
    Input(#[from] InputErrors),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
