//! Usage output for flag and parameter tables.
use std::io;
use terminal_size::{terminal_size, Width};

use crate::engine::ParamTable;
use crate::flag::{XOption, XOptions};
use crate::interface::{
    width_of, ColumnRenderer, LeftWidth, MiddleWidth, PaddingWidth, RightWidth, TotalWidth,
};

const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;

/// Controls what usage output shows, and how wide it may be.
///
/// ```
/// # use xparam_builder::*;
/// let config = UsageConfig {
///     show_hidden: true,
///     ..UsageConfig::default()
/// };
/// assert_eq!(config.width, None);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UsageConfig {
    /// Include hidden flags and parameters.
    pub show_hidden: bool,
    /// Wrap descriptions to fit this many columns.
    /// `None` never wraps.
    pub width: Option<usize>,
}

impl UsageConfig {
    /// Wrap to the width of the current terminal, if there is one.
    pub fn terminal() -> Self {
        let width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self {
            show_hidden: false,
            width,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Row {
    left: String,
    middle: String,
    right: Option<String>,
}

pub(crate) fn param_rows(table: &ParamTable<'_>, config: &UsageConfig) -> Vec<Row> {
    table
        .params()
        .iter()
        .filter(|param| config.show_hidden || !param.is_hidden())
        .map(|param| Row {
            left: param.token(),
            middle: param.description().unwrap_or_default().to_string(),
            right: param.render().ok(),
        })
        .collect()
}

pub(crate) fn option_rows<'o, 'a: 'o>(
    options: impl Iterator<Item = &'o XOption<'a>>,
    config: &UsageConfig,
) -> Vec<Row> {
    options
        .filter(|option| config.show_hidden || !option.is_hidden())
        .map(|option| {
            let mut left = match option.long_name() {
                Some(long) => format!("-{}, --{long}", option.short()),
                None => format!("-{}", option.short()),
            };

            if let Some(meta) = option.argument_meta() {
                left.push(' ');
                left.push_str(&meta);
            }

            Row {
                left,
                middle: option.description().unwrap_or_default().to_string(),
                right: option.render_argument().and_then(Result::ok),
            }
        })
        .collect()
}

pub(crate) fn render_rows(rows: &[Row], config: &UsageConfig) -> Vec<String> {
    if rows.is_empty() {
        return Vec::default();
    }

    let left_width = rows.iter().map(|r| width_of(&r.left)).max().unwrap_or(1);
    let middle_width = rows.iter().map(|r| width_of(&r.middle)).max().unwrap_or(0);
    let right_width = rows
        .iter()
        .filter_map(|r| r.right.as_deref().map(width_of))
        .max();
    let padding = || PaddingWidth::new(PADDING_WIDTH).expect("internal error - padding is positive");
    let left = LeftWidth::new(std::cmp::max(1, left_width))
        .expect("internal error - left must be at least 1");
    let middle = MiddleWidth::new(std::cmp::max(2, middle_width + MAIN_INDENT))
        .expect("internal error - middle must be at least 2");
    let rights = match right_width {
        Some(width) => vec![RightWidth::new(std::cmp::max(1, width))
            .expect("internal error - right must be at least 1")],
        None => Vec::default(),
    };
    let column_renderer = match config.width {
        Some(total) => ColumnRenderer::guided(padding(), left, middle, rights, TotalWidth(total)),
        None => ColumnRenderer::new(padding(), left, middle, rights),
    };

    rows.iter()
        .flat_map(|row| {
            let rights: Vec<String> = row.right.iter().cloned().collect();
            column_renderer.render(MAIN_INDENT, &row.left, &row.middle, &rights)
        })
        .collect()
}

/// Write the visible parameters of `table`, with their current (default) values.
///
/// ```
/// # use xparam_builder::*;
/// let mut size: u64 = 10 << 20;
/// let table = ParamTable::new(vec![Param::u64_size(&mut size, "size").help("Pool size.")]).unwrap();
/// let mut out = Vec::default();
///
/// show_default_params(&table, &UsageConfig::default(), &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), " size=<u64_size>   Pool size.   10M\n");
/// ```
pub fn show_default_params(
    table: &ParamTable<'_>,
    config: &UsageConfig,
    out: &mut impl io::Write,
) -> io::Result<()> {
    for line in render_rows(&param_rows(table, config), config) {
        writeln!(out, "{line}")?;
    }

    Ok(())
}

/// Write the visible flags selected by `optstring`, in optstring order.
///
/// Fails with [`io::ErrorKind::InvalidInput`] when `optstring` names a flag missing from `options`.
pub fn xgetopt_usage(
    optstring: &str,
    options: &XOptions<'_>,
    config: &UsageConfig,
    out: &mut impl io::Write,
) -> io::Result<()> {
    let active = options
        .select(optstring)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
    let rows = option_rows(active.iter().map(|i| &options.options()[*i]), config);

    for line in render_rows(&rows, config) {
        writeln!(out, "{line}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Param;
    use crate::types::{ParamType, TypeTag};
    use rstest::rstest;

    fn written(write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::default();
        write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[rstest]
    #[case(false, " size=<u64_size>   Pool size.   10M\n")]
    #[case(
        true,
        " size=<u64_size>   Pool size.   10M
 verbose=<bool>    Be chatty.   false
"
    )]
    fn default_params(#[case] show_hidden: bool, #[case] expected: &str) {
        // Setup
        let mut size: u64 = 10 << 20;
        let mut verbose = false;
        let table = ParamTable::new(vec![
            Param::u64_size(&mut size, "size").help("Pool size."),
            Param::bool(&mut verbose, "verbose").help("Be chatty.").hidden(),
        ])
        .unwrap();
        let config = UsageConfig {
            show_hidden,
            width: None,
        };

        // Execute
        let output = written(|out| show_default_params(&table, &config, out));

        // Verify
        assert_eq!(output, expected);
    }

    #[test]
    fn default_params_meta() {
        let mut mode: u32 = 0o755;
        let mut name = String::from("mp1");
        let mut capacity: u64 = 0;
        let table = ParamTable::new(vec![
            Param::mode(&mut mode, "mode").meta("mode=OCTAL"),
            Param::string(&mut name, 32, "name"),
            Param::u64(&mut capacity, "capacity").hex(),
        ])
        .unwrap();

        let output = written(|out| show_default_params(&table, &UsageConfig::default(), out));

        assert_eq!(
            output,
            " mode=OCTAL            0755
 name=<string>         mp1
 capacity=<u64>        0x0
"
        );
    }

    #[test]
    fn default_params_empty() {
        let table = ParamTable::new(Vec::default()).unwrap();
        let output = written(|out| show_default_params(&table, &UsageConfig::default(), out));
        assert_eq!(output, "");
    }

    #[test]
    fn default_params_wrapped() {
        let mut size: u64 = 0;
        let table = ParamTable::new(vec![Param::u64(&mut size, "size")
            .help("The size of the pool, which is rounded up to a whole number of media blocks.")])
        .unwrap();
        let config = UsageConfig {
            show_hidden: false,
            width: Some(50),
        };

        let output = written(|out| show_default_params(&table, &config, out));
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| width_of(line) <= 50), "{lines:?}");
        assert!(lines[0].starts_with(" size=<u64>   The size of the pool"));
        assert!(lines[0].ends_with("   0"));
    }

    #[rstest]
    #[case(
        "hsv",
        false,
        " -h, --help              Show this help.
 -s, --size <u64_size>   Pool size.        0
"
    )]
    #[case(
        "vsh",
        true,
        " -v, --verbose           Be chatty.
 -s, --size <u64_size>   Pool size.        0
 -h, --help              Show this help.
"
    )]
    #[case("v", false, "")]
    fn flags(#[case] optstring: &str, #[case] show_hidden: bool, #[case] expected: &str) {
        let mut size: u64 = 0;
        let options = XOptions::new(vec![
            XOption::new('h').long("help").help("Show this help."),
            XOption::new('s')
                .long("size")
                .help("Pool size.")
                .argument(ParamType::of(TypeTag::U64Size), &mut size),
            XOption::new('v').long("verbose").help("Be chatty.").hidden(),
        ])
        .unwrap();
        let config = UsageConfig {
            show_hidden,
            width: None,
        };

        let output = written(|out| xgetopt_usage(optstring, &options, &config, out));

        assert_eq!(output, expected);
    }

    #[test]
    fn flags_unknown() {
        let options = XOptions::new(vec![XOption::new('h')]).unwrap();
        let mut out = Vec::default();

        let error = xgetopt_usage("hx", &options, &UsageConfig::default(), &mut out).unwrap_err();

        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
        assert!(out.is_empty());
    }
}
