//! Declarative argument definitions and typed token consumption.
//!
//! The pieces, leaf first:
//! - [`TypeRegistry`]: converters from a token to a [`Value`], keyed by [`TypeTag`]
//! - [`TokenCursor`]: a sliding window over the raw tokens
//! - [`ArgDef`] / [`Arg`]: declaration, resolution and the per-argument
//!   consume/finish steps, with per-run bookkeeping in [`ArgState`]
//! - [`ResultSet`]: parsed values by name, in consumption order
//! - [`ArgParser`]: a thin driver tying them together
//!
//! User mistakes (bad tokens, missing or repeated arguments) are collected and
//! reported together. Declaration mistakes fail resolution with a
//! [`ConfigError`].

pub mod cursor;
pub mod def;
pub mod error;
pub mod parser;
pub mod results;
pub mod types;
pub mod usage;
pub mod value;

pub use cursor::TokenCursor;
pub use def::{Arg, ArgDef, ArgState};
pub use error::{ConfigError, ConversionError, CursorError, Error, InputErrors, Result};
pub use parser::ArgParser;
pub use results::ResultSet;
pub use types::{Converter, TypeRegistry, TypeTag};
pub use value::{ArgValue, Shape, Value};
