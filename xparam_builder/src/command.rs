use std::env;

use crate::engine::ParamTable;
use crate::flag::{XOption, XOptions};
use crate::interface::{ConsoleInterface, UserInterface};
use crate::model::{ConfigError, ParseError};
use crate::param::Param;
use crate::usage::{option_rows, param_rows, render_rows, UsageConfig};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

const HELP_MESSAGE: &str = "Show this help message and exit.";
const REVEAL_MESSAGE: &str = "Include hidden flags and parameters in the help message.";

/// The command line builder: flags, then `name=value` parameters.
///
/// ```
/// # use xparam_builder::*;
/// let mut verbose: u32 = 0;
/// let mut size: u64 = 0;
/// let parser = CommandLine::new("mpool")
///     .option(XOption::new('v').long("verbose").counter(&mut verbose))
///     .param(Param::u64_size(&mut size, "size").required())
///     .build();
///
/// let next_arg = parser.parse_tokens(&["-v", "size=1G", "mp1"]).unwrap();
/// assert_eq!(next_arg, 2);
/// assert_eq!(verbose, 1);
/// assert_eq!(size, 1 << 30);
/// ```
pub struct CommandLine<'a> {
    program: String,
    about: Option<String>,
    options: Vec<XOption<'a>>,
    optstring: Option<String>,
    params: Vec<Param<'a>>,
    reveal: Option<char>,
    usage: UsageConfig,
}

impl<'a> CommandLine<'a> {
    /// Create a command line for `program`.
    /// The help flag `-h`/`--help` is always available.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            about: None,
            options: Vec::default(),
            optstring: None,
            params: Vec::default(),
            reveal: None,
            usage: UsageConfig::terminal(),
        }
    }

    /// Document the program in the help message.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Add a flag.
    pub fn option(mut self, option: XOption<'a>) -> Self {
        self.options.push(option);
        self
    }

    /// Add a `name=value` parameter.
    pub fn param(mut self, param: Param<'a>) -> Self {
        self.params.push(param);
        self
    }

    /// Add every parameter of `table` (ex: from `#[derive(ParamTable)]`).
    pub fn table(mut self, table: ParamTable<'a>) -> Self {
        self.params.extend(table.into_params());
        self
    }

    /// Only accept (and document) the flags named in `optstring`, in its order.
    /// By default, every flag is accepted in declaration order.
    pub fn optstring(mut self, optstring: impl Into<String>) -> Self {
        self.optstring.replace(optstring.into());
        self
    }

    /// Add a hidden flag `-short` which reveals hidden flags and parameters in the help message.
    pub fn reveal_flag(mut self, short: char) -> Self {
        self.reveal.replace(short);
        self
    }

    /// Configure the help message layout.
    pub fn usage(mut self, usage: UsageConfig) -> Self {
        self.usage = usage;
        self
    }

    fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<CommandLineParser<'a>, ConfigError> {
        let CommandLine {
            program,
            about,
            mut options,
            optstring,
            params,
            reveal,
            usage,
        } = self;
        let mut optstring = match optstring {
            Some(optstring) => optstring,
            None => options.iter().map(XOption::short).collect(),
        };

        options.push(XOption::new('h').long("help").help(HELP_MESSAGE));
        optstring.push('h');

        if let Some(short) = reveal {
            options.push(XOption::new(short).hidden().help(REVEAL_MESSAGE));
            optstring.push(short);
        }

        let options = XOptions::new(options)?;
        options.select(&optstring)?;
        let table = ParamTable::new(params)?;

        Ok(CommandLineParser {
            program,
            about,
            options,
            optstring,
            table,
            reveal,
            usage,
            user_interface,
        })
    }

    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Build the parser with a custom [`UserInterface`] (ex: [`crate::InMemoryInterface`]).
    #[cfg(feature = "unit_test")]
    pub fn build_with(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<CommandLineParser<'a>, ConfigError> {
        self.build_with_interface(user_interface)
    }

    /// Build the parser as a Result.
    /// This validates the flags and parameters (ex: a repeated parameter name).
    pub fn build_parser(self) -> Result<CommandLineParser<'a>, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the parser.
    /// This validates the flags and parameters (ex: a repeated parameter name).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> CommandLineParser<'a> {
        match self.build_parser() {
            Ok(parser) => parser,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

/// The configured command line parser.
/// Built via [`CommandLine::build`].
pub struct CommandLineParser<'a> {
    program: String,
    about: Option<String>,
    options: XOptions<'a>,
    optstring: String,
    table: ParamTable<'a>,
    reveal: Option<char>,
    usage: UsageConfig,
    user_interface: Box<dyn UserInterface>,
}

enum Outcome {
    Continue(usize),
    PrintHelp { show_hidden: bool },
}

impl<'a> CommandLineParser<'a> {
    fn consume_flags(&mut self, tokens: &[&str]) -> Result<Outcome, ParseError> {
        let reveal = self.reveal;
        let mut getopt = self
            .options
            .xgetopt(tokens, &self.optstring)
            .expect("internal error - optstring must have been validated");

        while let Some(short) = getopt.next() {
            if short? == 'h' {
                let show_hidden = match reveal {
                    Some(r) => getopt.occurrences(r) > 0,
                    None => false,
                };
                return Ok(Outcome::PrintHelp { show_hidden });
            }
        }

        Ok(Outcome::Continue(getopt.optind()))
    }

    fn print_help(&self, show_hidden: bool) {
        let config = UsageConfig {
            show_hidden: show_hidden || self.usage.show_hidden,
            width: self.usage.width,
        };
        let mut summary = format!("usage: {} [options]", self.program);

        if !self.table.params().is_empty() {
            summary.push_str(" [name=value ...]");
        }

        self.user_interface.print(summary);

        if let Some(about) = &self.about {
            self.user_interface.print("".to_string());
            self.user_interface.print(about.clone());
        }

        let active = self
            .options
            .select(&self.optstring)
            .expect("internal error - optstring must have been validated");
        let option_lines = render_rows(
            &option_rows(active.iter().map(|i| &self.options.options()[*i]), &config),
            &config,
        );
        self.user_interface.print("".to_string());
        self.user_interface.print("options:".to_string());

        for line in option_lines {
            self.user_interface.print(line);
        }

        let param_lines = render_rows(&param_rows(&self.table, &config), &config);

        if !param_lines.is_empty() {
            self.user_interface.print("".to_string());
            self.user_interface.print("parameters:".to_string());

            for line in param_lines {
                self.user_interface.print(line);
            }
        }
    }

    /// Run the parser against the input tokens (excluding the program name).
    ///
    /// Parsing happens in three phases:
    /// 1. Flags are consumed until `--` or the first non-flag token.
    /// 2. `name=value` parameters are consumed until the first token without an `=`.
    /// 3. Each parameter's occurrence count is verified.
    ///
    /// On success, returns the index of the first unconsumed token (the "next arg").
    ///
    /// If at any point the parser encounters an error (ex: an unknown flag, an out of range value, etc), it will print the error and return with `Err(1)`.
    /// Variables captured before the error keep their new values.
    ///
    /// If the help flag (`-h` or `--help`) is encountered, the parser will display the help message and return with `Err(0)`.
    pub fn parse_tokens(mut self, tokens: &[&str]) -> Result<usize, i32> {
        let offset = match self.consume_flags(tokens) {
            Ok(Outcome::Continue(offset)) => offset,
            Ok(Outcome::PrintHelp { show_hidden }) => {
                self.print_help(show_hidden);
                return Err(0);
            }
            Err(error) => {
                self.user_interface.print_error(error);
                return Err(1);
            }
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Flags consumed {offset} token(s).");
        }

        let next_arg = match self.table.process_params(&tokens[offset..]) {
            Ok(next_arg) => offset + next_arg,
            Err(error) => {
                self.user_interface.print_error(error.into());
                return Err(1);
            }
        };

        if let Err(error) = self.table.verify_params() {
            self.user_interface.print_error(error.into());
            return Err(1);
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Parameters consumed up to {next_arg}.");
        }

        Ok(next_arg)
    }

    /// Run the parser against the Cli [`env::args`].
    ///
    /// Returns the index of the first unconsumed token, relative to the arguments after the program name.
    ///
    /// If at any point the parser encounters an error, it will exit with error code `1` (via [`std::process::exit`]).
    /// If the help flag is encountered, it will display the help message and exit with error code `0`.
    pub fn parse(self) -> usize {
        let command_input: Vec<String> = env::args().skip(1).collect();

        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(next_arg) => next_arg,
            Err(exit_code) => {
                std::process::exit(exit_code);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::InMemoryInterface;
    use crate::test::assert_contains;
    use crate::types::{ParamType, TypeTag};
    use rstest::rstest;

    fn narrow() -> UsageConfig {
        UsageConfig {
            show_hidden: false,
            width: None,
        }
    }

    #[test]
    fn end_to_end() {
        // Setup
        let interface = InMemoryInterface::default();
        let mut verbose: u32 = 0;
        let mut force: u32 = 0;
        let mut capacity: u64 = 0;
        let mut mode: u32 = 0o600;
        let mut uid: u32 = 0;
        let parser = CommandLine::new("mpool")
            .option(XOption::new('v').counter(&mut verbose))
            .option(XOption::new('f').counter(&mut force))
            .option(
                XOption::new('c')
                    .long("capacity")
                    .argument(ParamType::of(TypeTag::U64Size), &mut capacity),
            )
            .param(Param::mode(&mut mode, "mode"))
            .param(Param::uid(&mut uid, "uid"))
            .usage(narrow())
            .build_with_interface(Box::new(interface.clone()))
            .unwrap();

        // Execute
        let next_arg = parser
            .parse_tokens(&["-vv", "--capacity=1536K", "mode=0644", "uid=17", "mp1", "-f"])
            .unwrap();

        // Verify
        assert_eq!(next_arg, 4);
        assert_eq!(verbose, 2);
        assert_eq!(force, 0);
        assert_eq!(capacity, 1536 * 1024);
        assert_eq!(mode, 0o644);
        assert_eq!(uid, 17);
        assert_eq!(interface.message(), None);
        assert_eq!(interface.error(), None);
    }

    #[test]
    fn empty_tokens() {
        let mut size: u64 = 7;
        let parser = CommandLine::new("program")
            .param(Param::u64_size(&mut size, "size"))
            .build_with_interface(Box::new(InMemoryInterface::default()))
            .unwrap();
        let tokens: &[&str] = &[];

        assert_eq!(parser.parse_tokens(tokens), Ok(0));
        assert_eq!(size, 7);
    }

    #[rstest]
    #[case(vec!["-x"], "Parse error: unknown option '-x'.")]
    #[case(vec!["-a", "-b"], "Parse error: option '-b' cannot be used with '-a'.")]
    #[case(vec!["-s"], "Parse error: option '-s' requires an argument.")]
    #[case(vec!["bogus=1"], "Parse error: unknown parameter 'bogus=1'.")]
    #[case(vec!["pct=x"], "Parse error: invalid value 'x' for parameter 'pct'")]
    #[case(vec!["pct=101"], "Parse error: value '101' for parameter 'pct' is out of range")]
    #[case(vec!["pct=1", "pct=2"], "Parse error: parameter 'pct' given 2 time(s), expected between 0 and 1.")]
    fn errors(#[case] tokens: Vec<&str>, #[case] expected: &str) {
        // Setup
        let interface = InMemoryInterface::default();
        let mut size: u64 = 0;
        let mut pct: u8 = 0;
        let parser = CommandLine::new("program")
            .option(XOption::new('a').excludes("b"))
            .option(XOption::new('b'))
            .option(XOption::new('s').argument(ParamType::of(TypeTag::U64Size), &mut size))
            .param(Param::pct(&mut pct, "pct"))
            .build_with_interface(Box::new(interface.clone()))
            .unwrap();

        // Execute
        let exit_code = parser.parse_tokens(tokens.as_slice()).unwrap_err();

        // Verify
        assert_eq!(exit_code, 1);
        assert_contains!(interface.error().unwrap(), expected);
        assert_eq!(interface.message(), None);
    }

    #[test]
    fn required_missing() {
        let interface = InMemoryInterface::default();
        let mut name = String::default();
        let parser = CommandLine::new("program")
            .param(Param::string(&mut name, 32, "name").required())
            .build_with_interface(Box::new(interface.clone()))
            .unwrap();

        let exit_code = parser.parse_tokens(&["mp1"]).unwrap_err();

        assert_eq!(exit_code, 1);
        assert_eq!(
            interface.error(),
            Some(
                "Parse error: parameter 'name' given 0 time(s), expected between 1 and 1."
                    .to_string()
            )
        );
    }

    #[rstest]
    #[case(vec!["-h"], false)]
    #[case(vec!["--help"], false)]
    #[case(vec!["-v", "--help", "-x"], false)]
    #[case(vec!["-T", "-h"], true)]
    #[case(vec!["-Th"], true)]
    #[case(vec!["-h", "-T"], false)]
    fn help(#[case] tokens: Vec<&str>, #[case] show_hidden: bool) {
        // Setup
        let interface = InMemoryInterface::default();
        let mut verbose: u32 = 0;
        let mut size: u64 = 1 << 20;
        let mut debug = false;
        let parser = CommandLine::new("program")
            .about("Create a pool.")
            .option(
                XOption::new('v')
                    .long("verbose")
                    .help("Be chatty.")
                    .counter(&mut verbose),
            )
            .param(Param::u64_size(&mut size, "size").help("Pool size."))
            .param(Param::bool(&mut debug, "debug").help("Debug mode.").hidden())
            .reveal_flag('T')
            .usage(narrow())
            .build_with_interface(Box::new(interface.clone()))
            .unwrap();

        // Execute
        let exit_code = parser.parse_tokens(tokens.as_slice()).unwrap_err();

        // Verify
        assert_eq!(exit_code, 0);
        assert_eq!(interface.error(), None);
        let message = interface.message().unwrap();
        assert_contains!(
            message,
            "usage: program [options] [name=value ...]

Create a pool.

options:
 -v, --verbose   Be chatty.
 -h, --help      Show this help message and exit.
"
        );
        assert_contains!(message, "parameters:\n size=<u64_size>   Pool size.");
        assert_contains!(message, "   1M");
        assert_eq!(message.contains("debug=<bool>"), show_hidden);
        assert_eq!(message.contains(" -T "), show_hidden);
    }

    #[test]
    fn help_without_params() {
        let interface = InMemoryInterface::default();
        let parser = CommandLine::new("program")
            .usage(narrow())
            .build_with_interface(Box::new(interface.clone()))
            .unwrap();

        assert_eq!(parser.parse_tokens(&["-h"]), Err(0));
        assert_eq!(
            interface.message(),
            Some(
                "usage: program [options]

options:
 -h, --help   Show this help message and exit."
                    .to_string()
            )
        );
    }

    #[rstest]
    #[case(vec!["-v"], 0)]
    #[case(vec!["-q"], 1)]
    #[case(vec!["-qv"], 1)]
    fn optstring_subset(#[case] tokens: Vec<&str>, #[case] expected_exit: i32) {
        let interface = InMemoryInterface::default();
        let parser = CommandLine::new("program")
            .option(XOption::new('q'))
            .option(XOption::new('v'))
            .optstring("v")
            .build_with_interface(Box::new(interface.clone()))
            .unwrap();

        let result = parser.parse_tokens(tokens.as_slice());

        if expected_exit == 0 {
            assert_eq!(result, Ok(1));
        } else {
            assert_eq!(result, Err(expected_exit));
            assert_eq!(
                interface.error(),
                Some("Parse error: unknown option '-q'.".to_string())
            );
        }
    }

    #[test]
    fn dash_dash() {
        let mut size: u64 = 0;
        let parser = CommandLine::new("program")
            .param(Param::u64_size(&mut size, "size"))
            .build_with_interface(Box::new(InMemoryInterface::default()))
            .unwrap();

        assert_eq!(parser.parse_tokens(&["--", "size=4k", "-v"]), Ok(2));
        assert_eq!(size, 4096);
    }

    #[rstest]
    #[case(CommandLine::new("p").option(XOption::new('h')), "Cannot duplicate the short option '-h'.")]
    #[case(CommandLine::new("p").option(XOption::new('a')).optstring("ab"), "unknown option '-b'")]
    #[case(CommandLine::new("p").reveal_flag('h'), "Cannot duplicate the short option '-h'.")]
    fn config_errors(#[case] command_line: CommandLine<'static>, #[case] message: &str) {
        let error = command_line.build_parser().err().unwrap();
        assert_contains!(error.to_string(), message);
    }

    #[test]
    fn config_error_params() {
        let mut a: u64 = 0;
        let mut b: u64 = 0;
        let error = CommandLine::new("p")
            .param(Param::u64(&mut a, "size"))
            .param(Param::u64(&mut b, "size"))
            .build_parser()
            .err()
            .unwrap();
        assert_eq!(
            error.to_string(),
            "Config error: Cannot duplicate the parameter 'size'."
        );
    }
}
