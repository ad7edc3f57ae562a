use std::collections::HashSet;
use thiserror::Error;

use crate::model::ConfigError;
use crate::types::{ParamType, Slot, TypeError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Errors while parsing `-x` / `--long` flags.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagError {
    /// The token names no active flag.
    #[error("unknown option '{option}'.")]
    UnknownOption {
        /// The flag as written (ex: `-x`, `--bogus`).
        option: String,
    },

    /// A flag taking an argument ended the token list.
    #[error("option '{option}' requires an argument.")]
    MissingArgument {
        /// The flag label.
        option: String,
    },

    /// A `--name=value` was given for a flag without an argument.
    #[error("option '{option}' does not take an argument.")]
    UnexpectedArgument {
        /// The flag label.
        option: String,
    },

    /// Two mutually exclusive flags were both given.
    #[error("option '{option}' cannot be used with '{excluded}'.")]
    OptionConflict {
        /// The flag label seen second.
        option: String,
        /// The flag label seen first.
        excluded: String,
    },

    /// The flag argument does not convert, or is out of range.
    #[error("invalid argument '{text}' for option '{option}': {source}")]
    InvalidValue {
        /// The flag label.
        option: String,
        /// The argument text.
        text: String,
        /// The conversion or range failure.
        source: TypeError,
    },
}

/// An extended flag: a short option, optionally with a long name, exclusions, a counter, and a typed argument.
///
/// ```
/// # use xparam_builder::*;
/// let mut verbose: u32 = 0;
/// let option = XOption::new('v')
///     .long("verbose")
///     .help("Increase verbosity.")
///     .counter(&mut verbose);
/// assert_eq!(option.label(), "-v/--verbose");
/// ```
#[derive(Debug)]
pub struct XOption<'a> {
    short: char,
    long: Option<String>,
    excludes: Vec<char>,
    help: Option<String>,
    counter: Option<&'a mut u32>,
    hidden: bool,
    argument: Option<(ParamType, Slot<'a>)>,
    meta: Option<String>,
}

impl<'a> XOption<'a> {
    /// Create a flag matched by `-short`.
    pub fn new(short: char) -> Self {
        Self {
            short,
            long: None,
            excludes: Vec::default(),
            help: None,
            counter: None,
            hidden: false,
            argument: None,
            meta: None,
        }
    }

    /// Also match the flag by `--name`.
    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.long.replace(name.into());
        self
    }

    /// The flags (by short option) which may not be combined with this one.
    pub fn excludes(mut self, shorts: &str) -> Self {
        self.excludes.extend(shorts.chars());
        self
    }

    /// Document the flag in the usage output.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// Increment `counter` each time the flag is given.
    pub fn counter(mut self, counter: &'a mut u32) -> Self {
        self.counter.replace(counter);
        self
    }

    /// Exclude the flag from default usage output.
    /// It remains parseable.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Require an argument, converted into `slot` with `param_type`.
    pub fn argument(mut self, param_type: ParamType, slot: impl Into<Slot<'a>>) -> Self {
        self.argument.replace((param_type, slot.into()));
        self
    }

    /// Set the argument's name in the usage output (defaults to `<type>`).
    pub fn meta(mut self, meta: impl Into<String>) -> Self {
        self.meta.replace(meta.into());
        self
    }

    /// The short option character.
    pub fn short(&self) -> char {
        self.short
    }

    /// The long option name, without the leading `--`.
    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// The help text.
    pub fn description(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Whether the flag is left out of default usage.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the flag requires an argument.
    pub fn takes_argument(&self) -> bool {
        self.argument.is_some()
    }

    /// The argument's type, if the flag requires an argument.
    pub fn argument_type(&self) -> Option<&ParamType> {
        self.argument.as_ref().map(|(param_type, _)| param_type)
    }

    /// The argument's name for usage output.
    pub fn argument_meta(&self) -> Option<String> {
        match (&self.meta, &self.argument) {
            (Some(meta), Some(_)) => Some(meta.clone()),
            (None, Some((param_type, _))) => Some(format!("<{}>", param_type.tag())),
            (_, None) => None,
        }
    }

    /// Render the current value of the argument's variable.
    pub fn render_argument(&self) -> Option<Result<String, TypeError>> {
        self.argument
            .as_ref()
            .map(|(param_type, slot)| param_type.render(&slot.value()))
    }

    /// The flag as named in errors: `-v` or `-v/--verbose`.
    pub fn label(&self) -> String {
        match &self.long {
            Some(long) => format!("-{}/--{long}", self.short),
            None => format!("-{}", self.short),
        }
    }

    fn conflicts(&self, other: &XOption<'_>) -> bool {
        self.excludes.contains(&other.short) || other.excludes.contains(&self.short)
    }
}

/// A long option entry, as derived from the [`XOptions`] table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongOption {
    /// The name, without the leading `--`.
    pub name: String,
    /// Whether the option requires an argument.
    pub has_arg: bool,
    /// The short option this long option aliases.
    pub short: char,
}

/// The validated flag table of a program.
///
/// The optstring and long option table are derived from the flags, rather than maintained separately.
#[derive(Debug)]
pub struct XOptions<'a> {
    options: Vec<XOption<'a>>,
}

impl<'a> XOptions<'a> {
    /// Validate and assemble the flags.
    ///
    /// Short options must be printable, unique, and not `-` or `:`.
    /// Long names must be unique, and exclusions must name flags of this table.
    pub fn new(options: Vec<XOption<'a>>) -> Result<Self, ConfigError> {
        let mut shorts = HashSet::new();
        let mut longs = HashSet::new();

        for option in &options {
            let short = option.short;

            if !short.is_ascii_graphic() || short == '-' || short == ':' {
                return Err(ConfigError(format!("Invalid short option '{short}'.")));
            }

            if !shorts.insert(short) {
                return Err(ConfigError(format!(
                    "Cannot duplicate the short option '-{short}'."
                )));
            }

            if let Some(long) = &option.long {
                if long.is_empty() || long.starts_with('-') || long.contains('=') {
                    return Err(ConfigError(format!("Invalid long option '--{long}'.")));
                }

                if !longs.insert(long.as_str()) {
                    return Err(ConfigError(format!(
                        "Cannot duplicate the long option '--{long}'."
                    )));
                }
            }

            if let Some((param_type, slot)) = &option.argument {
                if slot.kind() != param_type.slot_kind() || param_type.unchecked_range() {
                    return Err(ConfigError(format!(
                        "Option '-{short}' of type {} is bound to an invalid variable.",
                        param_type.tag()
                    )));
                }
            }
        }

        for option in &options {
            if let Some(excluded) = option.excludes.iter().find(|e| !shorts.contains(*e)) {
                return Err(ConfigError(format!(
                    "Option '-{}' excludes the unknown option '-{excluded}'.",
                    option.short
                )));
            }
        }

        Ok(Self { options })
    }

    /// The flags, in declaration order.
    pub fn options(&self) -> &[XOption<'a>] {
        &self.options
    }

    /// Find a flag by its short option.
    pub fn get(&self, short: char) -> Option<&XOption<'a>> {
        self.options.iter().find(|o| o.short == short)
    }

    /// The getopt style optstring of the whole table (ex: `hs:v`).
    pub fn optstring(&self) -> String {
        let mut optstring = String::default();

        for option in &self.options {
            optstring.push(option.short);

            if option.takes_argument() {
                optstring.push(':');
            }
        }

        optstring
    }

    /// The long option table of the whole table.
    pub fn long_options(&self) -> Vec<LongOption> {
        self.options
            .iter()
            .filter_map(|option| {
                option.long.as_ref().map(|name| LongOption {
                    name: name.clone(),
                    has_arg: option.takes_argument(),
                    short: option.short,
                })
            })
            .collect()
    }

    /// Resolve the flags selected by `optstring`, in optstring order.
    ///
    /// `:` markers are accepted but ignored; whether a flag takes an argument comes from the table.
    pub(crate) fn select(&self, optstring: &str) -> Result<Vec<usize>, ConfigError> {
        let mut selected = Vec::default();

        for short in optstring.chars().filter(|c| *c != ':') {
            let index = self
                .options
                .iter()
                .position(|o| o.short == short)
                .ok_or_else(|| {
                    ConfigError(format!("Optstring names the unknown option '-{short}'."))
                })?;

            if !selected.contains(&index) {
                selected.push(index);
            }
        }

        Ok(selected)
    }

    /// Start parsing `args` for the flags selected by `optstring`.
    ///
    /// `args` excludes the program name.
    /// ```
    /// # use xparam_builder::*;
    /// let mut verbose: u32 = 0;
    /// let mut options = XOptions::new(vec![XOption::new('v').counter(&mut verbose)]).unwrap();
    /// let mut getopt = options.xgetopt(&["-vv", "size=1"], "v").unwrap();
    ///
    /// assert_eq!(getopt.next(), Some(Ok('v')));
    /// assert_eq!(getopt.next(), Some(Ok('v')));
    /// assert_eq!(getopt.next(), None);
    /// assert_eq!(getopt.optind(), 1);
    /// drop(getopt);
    /// drop(options);
    /// assert_eq!(verbose, 2);
    /// ```
    pub fn xgetopt<'x, 't, S: AsRef<str>>(
        &'x mut self,
        args: &'t [S],
        optstring: &str,
    ) -> Result<XGetopt<'x, 'a, 't, S>, ConfigError> {
        let active = self.select(optstring)?;
        let seen = vec![0; self.options.len()];

        Ok(XGetopt {
            options: self,
            active,
            seen,
            args,
            optind: 0,
            cluster: 0,
            done: false,
        })
    }
}

/// An in-progress parse of the flags; yields one short option per matched flag.
///
/// Parsing ends (`None`) at `--` (which is consumed), or at the first token which is not a flag (which is not).
/// After an error, the iterator is exhausted.
pub struct XGetopt<'x, 'a, 't, S> {
    options: &'x mut XOptions<'a>,
    active: Vec<usize>,
    seen: Vec<u32>,
    args: &'t [S],
    optind: usize,
    // Byte offset into `args[optind]` while within a cluster of short flags (ex: `-vf`), otherwise 0.
    cluster: usize,
    done: bool,
}

impl<'x, 'a, 't, S> std::fmt::Debug for XGetopt<'x, 'a, 't, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XGetopt")
            .field("optind", &self.optind)
            .field("cluster", &self.cluster)
            .field("done", &self.done)
            .finish()
    }
}

impl<'x, 'a, 't, S: AsRef<str>> XGetopt<'x, 'a, 't, S> {
    /// The index of the first token not consumed by the flags.
    pub fn optind(&self) -> usize {
        self.optind
    }

    /// The tokens not consumed by the flags.
    pub fn remaining(&self) -> &'t [S] {
        &self.args[std::cmp::min(self.optind, self.args.len())..]
    }

    /// The number of times the flag `short` has been matched by this parse.
    pub fn occurrences(&self, short: char) -> u32 {
        self.options
            .options
            .iter()
            .position(|o| o.short == short)
            .map(|index| self.seen[index])
            .unwrap_or(0)
    }

    fn arg(&self, index: usize) -> Option<&'t str> {
        self.args.get(index).map(|arg| arg.as_ref())
    }

    fn find_short(&self, short: char) -> Option<usize> {
        self.active
            .iter()
            .copied()
            .find(|index| self.options.options[*index].short == short)
    }

    fn find_long(&self, name: &str) -> Option<usize> {
        self.active
            .iter()
            .copied()
            .find(|index| self.options.options[*index].long.as_deref() == Some(name))
    }

    fn short_flag(&mut self, token: &'t str) -> Result<char, FlagError> {
        let short = token[self.cluster..]
            .chars()
            .next()
            .expect("internal error - cluster must be within the token");
        self.cluster += short.len_utf8();
        let at_end = self.cluster >= token.len();
        let index = self.find_short(short).ok_or_else(|| FlagError::UnknownOption {
            option: format!("-{short}"),
        })?;

        let argument = if self.options.options[index].takes_argument() {
            let argument = if at_end {
                self.optind += 1;
                self.arg(self.optind)
                    .ok_or_else(|| FlagError::MissingArgument {
                        option: format!("-{short}"),
                    })?
            } else {
                &token[self.cluster..]
            };
            self.optind += 1;
            self.cluster = 0;
            Some(argument)
        } else {
            if at_end {
                self.optind += 1;
                self.cluster = 0;
            }

            None
        };

        self.matched(index, argument)
    }

    fn long_flag(&mut self, body: &'t str) -> Result<char, FlagError> {
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let index = self.find_long(name).ok_or_else(|| FlagError::UnknownOption {
            option: format!("--{name}"),
        })?;
        self.optind += 1;

        let argument = match (self.options.options[index].takes_argument(), inline) {
            (true, Some(value)) => Some(value),
            (true, None) => {
                let value = self
                    .arg(self.optind)
                    .ok_or_else(|| FlagError::MissingArgument {
                        option: format!("--{name}"),
                    })?;
                self.optind += 1;
                Some(value)
            }
            (false, Some(_)) => {
                return Err(FlagError::UnexpectedArgument {
                    option: format!("--{name}"),
                });
            }
            (false, None) => None,
        };

        self.matched(index, argument)
    }

    fn matched(&mut self, index: usize, argument: Option<&str>) -> Result<char, FlagError> {
        let options = &mut self.options.options;

        if let Some(excluded) = options
            .iter()
            .enumerate()
            .find(|(j, other)| self.seen[*j] > 0 && options[index].conflicts(other))
            .map(|(_, other)| other.label())
        {
            return Err(FlagError::OptionConflict {
                option: options[index].label(),
                excluded,
            });
        }

        let option = &mut options[index];

        if let (Some((param_type, slot)), Some(text)) = (option.argument.as_mut(), argument) {
            let invalid = |source| FlagError::InvalidValue {
                option: format!("-{}", option.short),
                text: text.to_string(),
                source,
            };
            param_type.get(text, slot).map_err(invalid)?;
            param_type.check(&slot.value()).map_err(invalid)?;
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Matched option '{}' with {argument:?}.", option.label());
        }

        self.seen[index] += 1;

        if let Some(counter) = option.counter.as_mut() {
            **counter += 1;
        }

        Ok(option.short)
    }

    fn advance(&mut self) -> Option<Result<char, FlagError>> {
        let token = self.arg(self.optind)?;

        if self.cluster > 0 {
            return Some(self.short_flag(token));
        }

        if token == "--" {
            self.optind += 1;
            return None;
        }

        if let Some(body) = token.strip_prefix("--") {
            return Some(self.long_flag(body));
        }

        if token.len() > 1 && token.starts_with('-') {
            self.cluster = 1;
            return Some(self.short_flag(token));
        }

        None
    }
}

impl<'x, 'a, 't, S: AsRef<str>> Iterator for XGetopt<'x, 'a, 't, S> {
    type Item = Result<char, FlagError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = self.advance();

        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }

        item
    }
}
