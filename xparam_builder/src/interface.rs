use crate::model::ParseError;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug)]
pub(crate) struct PaddingWidth(usize);

impl PaddingWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // padding must be at least 1
        if width >= 1 {
            Ok(PaddingWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug)]
pub(crate) struct LeftWidth(usize);

impl LeftWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // left must be at least 1
        if width >= 1 {
            Ok(LeftWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug)]
pub(crate) struct MiddleWidth(usize);

impl MiddleWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        // middle must be at least 2 (so we can hyphenate)
        if width >= 2 {
            Ok(MiddleWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RightWidth(usize);

impl RightWidth {
    pub(crate) fn new(width: usize) -> Result<Self, ()> {
        if width >= 1 {
            Ok(RightWidth(width))
        } else {
            Err(())
        }
    }
}

#[derive(Debug)]
pub(crate) struct TotalWidth(pub usize);

/// Lays out rows of `left | middle | rights...`, wrapping the middle column.
#[derive(Debug)]
pub(crate) struct ColumnRenderer {
    padding: PaddingWidth,
    left: LeftWidth,
    middle: MiddleWidth,
    rights: Vec<RightWidth>,
}

// Target 95% of the total width, so the renderer doesn't literally use the full line.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Assuming an average word length of 5, 17 allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

impl ColumnRenderer {
    /// Produce a renderer which fits the middle column to `total_width`, when possible.
    pub(crate) fn guided(
        padding: PaddingWidth,
        left: LeftWidth,
        middle: MiddleWidth,
        rights: Vec<RightWidth>,
        total_width: TotalWidth,
    ) -> Self {
        // There is always a left and a middle (and a padding between them).
        let mut non_middle: usize = left.0 + padding.0;

        if !rights.is_empty() {
            non_middle +=
                padding.0 + rights.iter().map(|r| r.0).sum::<usize>() + ((rights.len() - 1) * padding.0);
        }

        let target_total_width = (total_width.0 as f64 * TARGET_TOTAL_FACTOR) as usize;
        let guided_middle = std::cmp::max(middle.0, MINIMUM_MIDDLE_WIDTH);

        if guided_middle + non_middle <= target_total_width {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} and middle fit within the target total {target_total_width}.  Selecting middle: {guided_middle}.");
            }

            Self::new(padding, left, MiddleWidth(guided_middle), rights)
        } else if non_middle < total_width.0 {
            let calculated_middle =
                std::cmp::max(total_width.0 - non_middle, MINIMUM_MIDDLE_WIDTH);
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} fit within the total {}.  Selecting middle: {calculated_middle}.", total_width.0);
            }

            Self::new(padding, left, MiddleWidth(calculated_middle), rights)
        } else {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} do not fit within the total {}.  Selecting middle: {MINIMUM_MIDDLE_WIDTH}.", total_width.0);
            }

            Self::new(padding, left, MiddleWidth(MINIMUM_MIDDLE_WIDTH), rights)
        }
    }

    pub(crate) fn new(
        padding: PaddingWidth,
        left: LeftWidth,
        middle: MiddleWidth,
        rights: Vec<RightWidth>,
    ) -> Self {
        Self {
            padding,
            left,
            middle,
            rights,
        }
    }

    pub(crate) fn render(
        &self,
        indent: usize,
        left: &str,
        middle: &str,
        rights: &[String],
    ) -> Vec<String> {
        assert!(rights.len() <= self.rights.len());
        let padding = self.padding.0;
        let padding = format!("{:padding$}", "");
        let mut right = String::default();

        if !rights.is_empty() {
            right = padding.clone();

            for (i, item) in rights.iter().enumerate() {
                let width = self.rights[i].0;
                assert!(width_of(item) <= width);

                if i + 1 < rights.len() {
                    right.push_str(format!("{item:width$}{padding}").as_str());
                } else {
                    right.push_str(item);
                }
            }
        }

        let left_column_width = self.left.0;
        assert!(width_of(left) <= left_column_width);
        let middle_column_width = self.middle.0.saturating_sub(indent).max(2);
        let middle_parts = chunk(middle, middle_column_width);
        let mut out = Vec::default();

        for (i, part) in middle_parts.iter().enumerate() {
            if i == 0 && !right.is_empty() {
                out.push(format!(
                    "{:indent$}{:left_column_width$}{padding}{:middle_column_width$}{right}",
                    "", left, part
                ));
            } else if i == 0 {
                out.push(format!(
                    "{:indent$}{:left_column_width$}{padding}{}",
                    "", left, part
                ));
            } else {
                out.push(format!(
                    "{:indent$}{:left_column_width$}{padding}{}",
                    "", "", part
                ));
            }
        }

        if out.is_empty() {
            if right.is_empty() {
                out.push(format!("{:indent$}{}", "", left));
            } else {
                out.push(format!(
                    "{:indent$}{:left_column_width$}{padding}{:middle_column_width$}{right}",
                    "", left, ""
                ));
            }
        }

        out
    }
}

pub(crate) fn width_of(text: &str) -> usize {
    text.chars().count()
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if width_of(&current) + width_of(word) < width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = String::default();
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut left = 0;
    let mut right = increment;

    while right + 1 < characters.len() {
        let part: String = characters[left..right].iter().collect();
        lines.push(format!("{part}-"));
        left += increment;
        right += increment;
    }

    current.extend(characters[left..].iter());
}

/// The destination of a command line's help and error output.
pub trait UserInterface {
    /// Print one line of regular output.
    fn print(&self, message: String);

    /// Print an input error.
    fn print_error(&self, error: ParseError);
}

/// Prints to stdout and stderr.
#[derive(Debug, Default)]
pub struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: ParseError) {
        eprintln!("{error}");
    }
}

#[cfg(any(test, feature = "unit_test"))]
pub use util::InMemoryInterface;

#[cfg(any(test, feature = "unit_test"))]
mod util {
    use super::UserInterface;
    use crate::model::ParseError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Captures output in memory, for asserting in tests.
    ///
    /// Clones share the same buffers, so one clone can be handed to a [`crate::CommandLine`] and the other inspected.
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryInterface {
        messages: Rc<RefCell<Vec<String>>>,
        errors: Rc<RefCell<Vec<String>>>,
    }

    impl UserInterface for InMemoryInterface {
        fn print(&self, message: String) {
            self.messages.borrow_mut().push(message);
        }

        fn print_error(&self, error: ParseError) {
            self.errors.borrow_mut().push(error.to_string());
        }
    }

    impl InMemoryInterface {
        /// The printed lines, joined by newlines (`None` if nothing was printed).
        pub fn message(&self) -> Option<String> {
            let messages = self.messages.borrow();

            if messages.is_empty() {
                None
            } else {
                Some(messages.join("\n"))
            }
        }

        /// The printed errors, joined by newlines (`None` if nothing was printed).
        pub fn error(&self) -> Option<String> {
            let errors = self.errors.borrow();

            if errors.is_empty() {
                None
            } else {
                Some(errors.join("\n"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn renderer(left: usize, middle: usize, rights: Vec<usize>) -> ColumnRenderer {
        ColumnRenderer::new(
            PaddingWidth::new(2).unwrap(),
            LeftWidth::new(left).unwrap(),
            MiddleWidth::new(middle).unwrap(),
            rights
                .into_iter()
                .map(|r| RightWidth::new(r).unwrap())
                .collect(),
        )
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    fn padding_width(#[case] width: usize) {
        assert_eq!(PaddingWidth::new(width).is_ok(), width >= 1);
        assert_eq!(LeftWidth::new(width).is_ok(), width >= 1);
        assert_eq!(MiddleWidth::new(width).is_ok(), width >= 2);
        assert_eq!(RightWidth::new(width).is_ok(), width >= 1);
    }

    #[rstest]
    #[case("", 5, vec![])]
    #[case("a", 5, vec!["a"])]
    #[case("a b", 5, vec!["a b"])]
    #[case("ab cd", 5, vec!["ab cd"])]
    #[case("ab cde", 5, vec!["ab", "cde"])]
    #[case("abcde", 5, vec!["abcde"])]
    #[case("abcdef", 5, vec!["abcd-", "ef"])]
    #[case("abcdefghi", 5, vec!["abcd-", "efghi"])]
    #[case("  a   b  ", 5, vec!["a b"])]
    #[case("üüüüüü", 5, vec!["üüüü-", "üü"])]
    fn chunk_paragraph(#[case] paragraph: &str, #[case] width: usize, #[case] expected: Vec<&str>) {
        assert_eq!(chunk(paragraph, width), expected);
    }

    #[test]
    fn render_columns() {
        let renderer = renderer(6, 10, vec![4]);

        assert_eq!(
            renderer.render(1, "-s", "Pool size in bytes.", &["10M".to_string()]),
            vec![
                " -s      Pool size  10M",
                "         in bytes.",
            ]
        );
        assert_eq!(
            renderer.render(1, "-v", "", &[]),
            vec![" -v"]
        );
        assert_eq!(
            renderer.render(1, "-v", "", &["1".to_string()]),
            vec![" -v                 1"]
        );
        assert_eq!(renderer.render(0, "-v", "Verbose.", &[]), vec!["-v      Verbose."]);
    }

    #[rstest]
    #[case(None, MINIMUM_MIDDLE_WIDTH)]
    #[case(Some(100), 30)]
    #[case(Some(40), 24)]
    #[case(Some(10), MINIMUM_MIDDLE_WIDTH)]
    fn guided_middle(#[case] total: Option<usize>, #[case] expected: usize) {
        let padding = || PaddingWidth::new(2).unwrap();
        let left = || LeftWidth::new(10).unwrap();
        let renderer = match total {
            Some(total) => ColumnRenderer::guided(
                padding(),
                left(),
                MiddleWidth::new(30).unwrap(),
                vec![RightWidth::new(2).unwrap()],
                TotalWidth(total),
            ),
            None => ColumnRenderer::new(
                padding(),
                left(),
                MiddleWidth::new(MINIMUM_MIDDLE_WIDTH).unwrap(),
                vec![],
            ),
        };

        assert_eq!(renderer.middle.0, expected);
    }

    #[test]
    fn in_memory_interface() {
        let interface = InMemoryInterface::default();
        let shared = interface.clone();
        assert_eq!(interface.message(), None);

        shared.print("a".to_string());
        shared.print("b".to_string());
        shared.print_error(ParseError("c".to_string()));

        assert_eq!(interface.message(), Some("a\nb".to_string()));
        assert_eq!(interface.error(), Some("Parse error: c".to_string()));
    }
}
