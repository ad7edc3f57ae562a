use thiserror::Error;

/// An invalid flag or parameter table.
///
/// These are errors in the program's configuration, rather than in its command line input.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

/// A command line input error, as printed to the user.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Parse error: {0}")]
pub struct ParseError(pub(crate) String);

impl From<crate::flag::FlagError> for ParseError {
    fn from(error: crate::flag::FlagError) -> Self {
        ParseError(error.to_string())
    }
}

impl From<crate::engine::ParamError> for ParseError {
    fn from(error: crate::engine::ParamError) -> Self {
        ParseError(error.to_string())
    }
}

impl From<crate::engine::OccurrenceError> for ParseError {
    fn from(error: crate::engine::OccurrenceError) -> Self {
        ParseError(error.to_string())
    }
}
