//! A thin driver running a set of arguments over a token sequence.

use indexmap::IndexMap;

use crate::cursor::TokenCursor;
use crate::def::{Arg, ArgDef, ArgState};
use crate::error::{ConfigError, Error, InputErrors};
use crate::results::ResultSet;
use crate::types::TypeRegistry;

/// A resolved set of arguments.
#[derive(Debug, Clone)]
pub struct ArgParser {
    args: Vec<Arg>,
}

impl ArgParser {
    /// Resolve every definition.
    ///
    /// Names must be unique, and a label may belong to only one argument.
    pub fn new<I>(defs: I, registry: &TypeRegistry) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = ArgDef>,
    {
        let mut args: Vec<Arg> = Vec::new();
        let mut label_owner: IndexMap<String, String> = IndexMap::new();

        for def in defs {
            let arg = def.resolve(registry)?;
            if args.iter().any(|a| a.name() == arg.name()) {
                return Err(ConfigError::DuplicateName(arg.name().to_string()));
            }
            for label in arg.labels() {
                if let Some(first) = label_owner.get(label) {
                    return Err(ConfigError::LabelConflict {
                        label: label.clone(),
                        first: first.clone(),
                        second: arg.name().to_string(),
                    });
                }
                label_owner.insert(label.clone(), arg.name().to_string());
            }
            args.push(arg);
        }

        tracing::debug!(count = args.len(), "argument set resolved");
        Ok(Self { args })
    }

    pub fn args(&self) -> &[Arg] {
        self.args.as_slice()
    }

    pub fn get(&self, name: &str) -> Option<&Arg> {
        self.args.iter().find(|a| a.name() == name)
    }

    /// Parse `tokens`.
    ///
    /// Every problem found is reported together: argument errors in
    /// declaration order, then unrecognized tokens.
    pub fn parse<T: AsRef<str>>(&self, tokens: &[T]) -> Result<ResultSet, Error> {
        let mut states: Vec<ArgState> = self.args.iter().map(Arg::new_state).collect();
        let mut results = ResultSet::new();
        let mut cursor = TokenCursor::new(tokens);
        let mut unrecognized: Vec<String> = Vec::new();

        while let Some(head) = cursor.head() {
            match self.step(&mut states, &mut cursor, &mut results)? {
                Step::Matched => {}
                Step::Rejected { skip } => cursor.advance(skip)?,
                Step::Declined => {
                    tracing::debug!(token = head.as_ref(), "unrecognized argument");
                    unrecognized.push(format!("Unrecognized argument '{}'.", head.as_ref()));
                    cursor.advance(1)?;
                }
            }
        }

        for (arg, state) in self.args.iter().zip(states.iter_mut()) {
            arg.finish(state, &mut results);
        }

        let messages: Vec<String> = states
            .iter()
            .flat_map(|s| s.errors().iter().cloned())
            .chain(unrecognized)
            .collect();
        if messages.is_empty() {
            Ok(results)
        } else {
            Err(InputErrors::new(messages).into())
        }
    }

    /// Render the usage line for every argument.
    pub fn usage(&self, include_help: bool) -> String {
        crate::usage::render_all(&self.args, include_help)
    }

    /// Offer the head token to labeled arguments, then to the next ordered
    /// argument that has not matched yet.
    ///
    /// Stops as soon as an argument matched or rejected the head. A rejected
    /// labeled instance skips its label and the values it would have taken,
    /// so they are not mistaken for positionals.
    fn step<T: AsRef<str>>(
        &self,
        states: &mut [ArgState],
        cursor: &mut TokenCursor<'_, T>,
        results: &mut ResultSet,
    ) -> Result<Step, Error> {
        for (arg, state) in self.args.iter().zip(states.iter_mut()) {
            if arg.is_ordered() {
                continue;
            }
            let errors_before = state.errors().len();
            if arg.consume(state, cursor, results)? {
                return Ok(Step::Matched);
            }
            if state.errors().len() > errors_before {
                let skip = if arg.is_remainder() {
                    cursor.len()
                } else {
                    cursor.len().min(arg.arg_count() + 1)
                };
                return Ok(Step::Rejected { skip });
            }
        }

        let next_ordered = self
            .args
            .iter()
            .zip(states.iter_mut())
            .find(|(arg, state)| arg.is_ordered() && state.instance_count() == 0);
        let Some((arg, state)) = next_ordered else {
            return Ok(Step::Declined);
        };
        if arg.consume(state, cursor, results)? {
            Ok(Step::Matched)
        } else {
            Ok(Step::Rejected { skip: 1 })
        }
    }
}

enum Step {
    Matched,
    Rejected { skip: usize },
    Declined,
}
