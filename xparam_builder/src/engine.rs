use std::collections::HashSet;
use thiserror::Error;

use crate::model::ConfigError;
use crate::param::Param;
use crate::types::TypeError;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Errors while matching `name=value` tokens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    /// No parameter is named by the token.
    #[error("unknown parameter '{token}'.")]
    UnknownParameter {
        /// The whole `name=value` token.
        token: String,
    },

    /// The value does not convert to the parameter's type.
    #[error("invalid value '{text}' for parameter '{name}': {source}")]
    InvalidValue {
        /// The parameter name.
        name: String,
        /// The text after the `=`.
        text: String,
        /// The conversion failure.
        source: TypeError,
    },

    /// The converted value falls outside the parameter's range.
    #[error("value '{text}' for parameter '{name}' is out of range: {source}")]
    OutOfRange {
        /// The parameter name.
        name: String,
        /// The text after the `=`.
        text: String,
        /// The range failure.
        source: TypeError,
    },
}

/// A parameter was given too few or too many times.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("parameter '{name}' given {given} time(s), expected between {min} and {max}.")]
pub struct OccurrenceError {
    /// The parameter name.
    pub name: String,
    /// The minimum number of occurrences.
    pub min: u32,
    /// The maximum number of occurrences.
    pub max: u32,
    /// The number of successful occurrences.
    pub given: u32,
}

impl OccurrenceError {
    /// Write the message into a fixed size buffer, returning the number of bytes written.
    ///
    /// The message is silently truncated (on a character boundary) when `buf` is too small.
    pub fn write_truncated(&self, buf: &mut [u8]) -> usize {
        let message = self.to_string();
        let mut length = std::cmp::min(message.len(), buf.len());

        while !message.is_char_boundary(length) {
            length -= 1;
        }

        buf[..length].copy_from_slice(&message.as_bytes()[..length]);
        length
    }
}

/// The validated set of parameters for one command.
///
/// ```
/// # use xparam_builder::*;
/// let mut size: u64 = 0;
/// let mut verbose = false;
/// let mut table = ParamTable::new(vec![
///     Param::u64_size(&mut size, "size"),
///     Param::bool(&mut verbose, "verbose"),
/// ])
/// .unwrap();
///
/// let next_arg = table
///     .process_params(&["size=10M", "verbose=true", "extra"])
///     .unwrap();
/// table.verify_params().unwrap();
/// drop(table);
///
/// assert_eq!(next_arg, 2);
/// assert_eq!(size, 10 * 1024 * 1024);
/// assert!(verbose);
/// ```
#[derive(Debug)]
pub struct ParamTable<'a> {
    params: Vec<Param<'a>>,
}

impl<'a> ParamTable<'a> {
    /// Validate and assemble the parameters.
    ///
    /// Each name must be unique, non-empty, and free of `=`.
    /// Each variable must match its parameter's type, and each occurrence bound must be ordered.
    pub fn new(params: Vec<Param<'a>>) -> Result<Self, ConfigError> {
        let mut names = HashSet::new();

        for param in &params {
            let name = param.name();

            if name.is_empty() || name.contains('=') {
                return Err(ConfigError(format!("Invalid parameter name '{name}'.")));
            }

            if !names.insert(name) {
                return Err(ConfigError(format!(
                    "Cannot duplicate the parameter '{name}'."
                )));
            }

            if !param.slot_matches() {
                return Err(ConfigError(format!(
                    "Parameter '{name}' of type {} is bound to a variable of the wrong type.",
                    param.param_type().tag()
                )));
            }

            if param.param_type().unchecked_range() {
                return Err(ConfigError(format!(
                    "Parameter '{name}' of type {} cannot be range checked.",
                    param.param_type().tag()
                )));
            }

            if param.given_min() > param.given_max() {
                return Err(ConfigError(format!(
                    "Parameter '{name}' must be given at least {} but at most {} times.",
                    param.given_min(),
                    param.given_max()
                )));
            }
        }

        Ok(Self { params })
    }

    /// The parameters, in declaration order.
    pub fn params(&self) -> &[Param<'a>] {
        &self.params
    }

    /// Release the parameters, for re-assembly into a larger table.
    pub fn into_params(self) -> Vec<Param<'a>> {
        self.params
    }

    /// Find a parameter by its exact name.
    pub fn get(&self, name: &str) -> Option<&Param<'a>> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// Consume the leading `name=value` tokens of `args`.
    ///
    /// Scanning stops at the first token without an `=`, whose index is returned (the "next arg").
    /// When every token is a parameter, `args.len()` is returned.
    ///
    /// Names match exactly; a repeated parameter overwrites its variable and is counted again.
    /// On error, variables converted by earlier tokens keep their new values.
    pub fn process_params<S: AsRef<str>>(&mut self, args: &[S]) -> Result<usize, ParamError> {
        for (index, token) in args.iter().enumerate() {
            let token = token.as_ref();
            let (name, text) = match token.split_once('=') {
                Some(pair) => pair,
                None => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Token '{token}' is not a parameter, stopping at {index}.");
                    }

                    return Ok(index);
                }
            };

            let param = self
                .params
                .iter_mut()
                .find(|p| p.name() == name)
                .ok_or_else(|| ParamError::UnknownParameter {
                    token: token.to_string(),
                })?;

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Matched parameter '{name}' with '{text}'.");
            }

            param
                .convert(text)
                .map_err(|source| ParamError::InvalidValue {
                    name: name.to_string(),
                    text: text.to_string(),
                    source,
                })?;
            param.check().map_err(|source| ParamError::OutOfRange {
                name: name.to_string(),
                text: text.to_string(),
                source,
            })?;
            param.accept();
        }

        Ok(args.len())
    }

    /// Check every parameter was given within its occurrence bounds.
    ///
    /// Reports the first violation, in declaration order.
    pub fn verify_params(&self) -> Result<(), OccurrenceError> {
        for param in &self.params {
            #[cfg(feature = "tracing_debug")]
            {
                debug!(
                    "Parameter '{}' given {} in [{}, {}].",
                    param.name(),
                    param.count(),
                    param.given_min(),
                    param.given_max()
                );
            }

            if param.count() < param.given_min() || param.count() > param.given_max() {
                return Err(OccurrenceError {
                    name: param.name().to_string(),
                    min: param.given_min(),
                    max: param.given_max(),
                    given: param.count(),
                });
            }
        }

        Ok(())
    }
}
