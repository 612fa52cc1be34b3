//! Transformation steps as written on the command line.
//!
//! A step is `NAME START SIZE [ARGS...]`. `START` is a block index, or
//! `BLOCK.INLINE` to address inline units inside a block.

use std::fmt;
use std::str::{FromStr, SplitWhitespace};

use boxwalk_dom::{Attributes, QualName};
use boxwalk_transform::{Fragment, TransformError, Transformer};
use thiserror::Error;

/// A step that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseStepError {
    /// Nothing but white space.
    #[error("empty step")]
    Empty,
    /// The first word names no transformation.
    #[error("unknown transformation '{0}'")]
    UnknownAction(String),
    /// A number was expected.
    #[error("'{0}' is not a number")]
    Number(String),
    /// A required argument is absent.
    #[error("missing {0}")]
    Missing(&'static str),
    /// A keyword argument has a value it does not take.
    #[error("'{value}' is not one of {expected}")]
    Keyword {
        /// What was given.
        value: String,
        /// What is accepted.
        expected: &'static str,
    },
    /// More arguments than the transformation takes.
    #[error("unexpected argument '{0}'")]
    Unexpected(String),
    /// The fragment is empty.
    #[error(transparent)]
    Fragment(#[from] TransformError),
}

/// What a step does to its fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `table START SIZE single|rows`
    Table {
        /// Require the table to have one row.
        single_row: bool,
    },
    /// `heading START SIZE ELEMENT`
    Heading(QualName),
    /// `image BLOCK.INLINE 1`
    RemoveImage,
    /// `list START SIZE LIST [ITEM]`
    List {
        /// List element.
        list: QualName,
        /// Item element, `li` unless given.
        item: QualName,
    },
    /// `poem START SIZE`
    Poem,
    /// `nav START SIZE`
    NavList,
    /// `wrap-list START SIZE PRE-CONTENT WRAPPER`
    WrapList {
        /// Blocks before the list that go into the wrapper.
        pre_content_blocks: usize,
        /// Wrapper element.
        wrapper: QualName,
    },
    /// `wrap-list-in-previous START SIZE`
    WrapListInPrevious,
    /// `figure START SIZE CAPTION before|after`
    Figure {
        /// Blocks of caption, 0 for none.
        caption_blocks: usize,
        /// Whether the caption comes first.
        caption_before: bool,
    },
    /// `hidden START SIZE`
    RemoveHiddenBox,
    /// `page-break START SIZE`
    PageBreak,
}

/// One transformation of one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The boxes to transform.
    pub fragment: Fragment,
    /// The transformation.
    pub action: Action,
    source: String,
}

impl Step {
    /// Run the step on `transformer`.
    ///
    /// # Errors
    ///
    /// The transformation's error. The transformer's tree is unchanged.
    pub fn apply(&self, transformer: &mut Transformer) -> Result<(), TransformError> {
        let transformer = transformer.move_to(self.fragment);
        let _ = match &self.action {
            Action::Table { single_row } => transformer.transform_table(*single_row)?,
            Action::Heading(name) => transformer.markup_heading(name)?,
            Action::RemoveImage => transformer.remove_image()?,
            Action::List { list, item } => transformer.convert_to_list(list, Attributes::new(), item)?,
            Action::Poem => transformer.convert_to_poem()?,
            Action::NavList => transformer.transform_nav_list()?,
            Action::WrapList {
                pre_content_blocks,
                wrapper,
            } => transformer.wrap_list(*pre_content_blocks, wrapper)?,
            Action::WrapListInPrevious => transformer.wrap_list_in_previous()?,
            Action::Figure {
                caption_blocks,
                caption_before,
            } => transformer.wrap_in_figure(*caption_blocks, *caption_before)?,
            Action::RemoveHiddenBox => transformer.remove_hidden_box()?,
            Action::PageBreak => transformer.markup_page_break()?,
        };
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Words<'a>(SplitWhitespace<'a>);

impl<'a> Words<'a> {
    fn next(&mut self, what: &'static str) -> Result<&'a str, ParseStepError> {
        self.0.next().ok_or(ParseStepError::Missing(what))
    }

    fn number(&mut self, what: &'static str) -> Result<usize, ParseStepError> {
        let word = self.next(what)?;
        word.parse().map_err(|_| ParseStepError::Number(word.to_owned()))
    }

    fn keyword(&mut self, what: &'static str, yes: &str, no: &str) -> Result<bool, ParseStepError> {
        match self.next(what)? {
            word if word == yes => Ok(true),
            word if word == no => Ok(false),
            word => Err(ParseStepError::Keyword {
                value: word.to_owned(),
                expected: what,
            }),
        }
    }

    fn element(&mut self, what: &'static str) -> Result<QualName, ParseStepError> {
        self.next(what).map(QualName::html)
    }

    fn end(mut self) -> Result<(), ParseStepError> {
        self.0
            .next()
            .map_or(Ok(()), |word| Err(ParseStepError::Unexpected(word.to_owned())))
    }
}

fn parse_start(word: &str) -> Result<(usize, Option<usize>), ParseStepError> {
    let number = |text: &str| text.parse().map_err(|_| ParseStepError::Number(word.to_owned()));
    match word.split_once('.') {
        Some((block, inline)) => Ok((number(block)?, Some(number(inline)?))),
        None => Ok((number(word)?, None)),
    }
}

impl FromStr for Step {
    type Err = ParseStepError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut words = Words(source.split_whitespace());
        let name = words.0.next().ok_or(ParseStepError::Empty)?;
        let (start_block, start_inline) = parse_start(words.next("start")?)?;
        let size = words.number("size")?;
        let fragment = Fragment::new(start_block, start_inline, size)?;

        let action = match name {
            "table" => Action::Table {
                single_row: words.keyword("single|rows", "single", "rows")?,
            },
            "heading" => Action::Heading(words.element("heading element")?),
            "image" => Action::RemoveImage,
            "list" => {
                let list = words.element("list element")?;
                let item = words.0.next().map_or_else(|| QualName::html("li"), QualName::html);
                Action::List { list, item }
            }
            "poem" => Action::Poem,
            "nav" => Action::NavList,
            "wrap-list" => Action::WrapList {
                pre_content_blocks: words.number("pre-content blocks")?,
                wrapper: words.element("wrapper element")?,
            },
            "wrap-list-in-previous" => Action::WrapListInPrevious,
            "figure" => Action::Figure {
                caption_blocks: words.number("caption blocks")?,
                caption_before: words.keyword("before|after", "before", "after")?,
            },
            "hidden" => Action::RemoveHiddenBox,
            "page-break" => Action::PageBreak,
            other => return Err(ParseStepError::UnknownAction(other.to_owned())),
        };
        words.end()?;
        Ok(Self {
            fragment,
            action,
            source: source.split_whitespace().collect::<Vec<_>>().join(" "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Step, ParseStepError> {
        source.parse()
    }

    #[test]
    fn test_parse_table() {
        let step = parse("table 0 3 single").unwrap();
        assert_eq!(step.fragment, Fragment::blocks(0, 3).unwrap());
        assert_eq!(step.action, Action::Table { single_row: true });
        assert_eq!(step.to_string(), "table 0 3 single");
    }

    #[test]
    fn test_parse_inline_start() {
        let step = parse("  image   2.1 1 ").unwrap();
        assert_eq!(step.fragment, Fragment::new(2, Some(1), 1).unwrap());
        assert_eq!(step.action, Action::RemoveImage);
        assert_eq!(step.to_string(), "image 2.1 1");
    }

    #[test]
    fn test_parse_list_item_defaults_to_li() {
        let step = parse("list 1 2 ol").unwrap();
        assert_eq!(
            step.action,
            Action::List {
                list: QualName::html("ol"),
                item: QualName::html("li"),
            }
        );
        let step = parse("list 1 2 div p").unwrap();
        assert_eq!(
            step.action,
            Action::List {
                list: QualName::html("div"),
                item: QualName::html("p"),
            }
        );
    }

    #[test]
    fn test_parse_figure_and_wrap_list() {
        assert_eq!(
            parse("figure 4 2 1 after").unwrap().action,
            Action::Figure {
                caption_blocks: 1,
                caption_before: false,
            }
        );
        assert_eq!(
            parse("wrap-list 0 3 1 section").unwrap().action,
            Action::WrapList {
                pre_content_blocks: 1,
                wrapper: QualName::html("section"),
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("   "), Err(ParseStepError::Empty));
        assert_eq!(parse("shuffle 0 1"), Err(ParseStepError::UnknownAction("shuffle".to_owned())));
        assert_eq!(parse("poem x 1"), Err(ParseStepError::Number("x".to_owned())));
        assert_eq!(parse("poem 0"), Err(ParseStepError::Missing("size")));
        assert_eq!(parse("poem 0 0"), Err(ParseStepError::Fragment(TransformError::EmptyFragment)));
        assert_eq!(parse("poem 0 1 extra"), Err(ParseStepError::Unexpected("extra".to_owned())));
        assert_eq!(
            parse("table 0 1 maybe"),
            Err(ParseStepError::Keyword {
                value: "maybe".to_owned(),
                expected: "single|rows",
            })
        );
    }
}
