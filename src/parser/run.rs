use super::parser::Parser;
use super::state::{FailureKind, PResult, State};
use crate::position::Position;

use thiserror::Error;
use tracing::{debug, trace};

/// How a whole parse run ended.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseResult<'s, T> {
    /// The parsed value, and the input that was left unconsumed.
    Ok(T, &'s str),
    Error(ParseError),
}

/// A parse run that failed, with the failure it ended on.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("[{line}:{column}] {reason}")]
pub struct ParseError {
    pub kind: FailureKind,
    pub reason: String,
    /// Byte offset into the input.
    pub position: usize,
    pub line: usize,
    pub column: usize,
}

impl<'s, T> ParseResult<'s, T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, ParseResult::Ok(..))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            ParseResult::Ok(value, _) => Some(value),
            ParseResult::Error(_) => None,
        }
    }

    pub fn into_result(self) -> Result<(T, &'s str), ParseError> {
        match self {
            ParseResult::Ok(value, rest) => Ok((value, rest)),
            ParseResult::Error(error) => Err(error),
        }
    }
}

impl<T> Parser<'_, T> {
    /// Run on `input` from its start. With `skip_whitespace`, leading
    /// whitespace is skipped first, once.
    pub fn parse<'s>(&self, input: &'s str, skip_whitespace: bool) -> ParseResult<'s, T> {
        self.parse_state(&mut State::new(input), skip_whitespace)
    }

    /// Run on an existing state, from its cursor. The state is left where the
    /// parser stopped.
    pub fn parse_state<'s>(
        &self,
        state: &mut State<'s>,
        skip_whitespace: bool,
    ) -> ParseResult<'s, T> {
        invoke(state, self.name(), |state| {
            if skip_whitespace {
                state.skip_whitespace();
            }
            self.run(state)
        })
    }

    /// Like [`Parser::parse`], but the whole input must be consumed. With
    /// `ignore_whitespace`, whitespace before and after is allowed.
    pub fn parse_to_end<'s>(&self, input: &'s str, ignore_whitespace: bool) -> ParseResult<'s, T> {
        let mut state = State::new(input);
        invoke(&mut state, self.name(), |state| {
            if ignore_whitespace {
                state.skip_whitespace();
            }
            let value = self.run(state)?;
            if ignore_whitespace {
                state.skip_whitespace();
            }
            state.eof()?;
            Ok(value)
        })
    }
}

fn invoke<'s, T>(
    state: &mut State<'s>,
    name: &str,
    run: impl FnOnce(&mut State<'s>) -> PResult<T>,
) -> ParseResult<'s, T> {
    trace!(parser = name, position = state.position(), "parse started");
    match run(state) {
        Ok(value) => ParseResult::Ok(value, state.rest()),
        Err(_) => {
            let failure = state.failure();
            let position = Position::new(state.text(), failure.position);
            let error = ParseError {
                kind: failure.kind,
                reason: failure.reason.clone(),
                position: failure.position,
                line: position.line(),
                column: position.column(),
            };
            debug!(
                parser = name,
                position = error.position,
                line = error.line,
                column = error.column,
                reason = %error.reason,
                "parse failed"
            );
            ParseResult::Error(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{literal, parser};
    use super::*;
    use indoc::indoc;

    #[test]
    fn error_has_line_and_column() {
        let p = parser(|state| {
            state.literal("hello\ntiny")?;
            state.fail::<()>("no world here")
        });
        let input = indoc! {"
            hello
            tiny world
        "};
        let ParseResult::Error(error) = p.parse(input, false) else {
            panic!("parsed {input:?}");
        };
        assert_eq!((error.position, error.line, error.column), (10, 2, 5));
        assert_eq!(error.to_string(), "[2:5] no world here");
    }

    #[test]
    fn skip_whitespace_skips_only_leading_whitespace() {
        assert_eq!(
            literal("hel").parse(" \n hello ", true),
            ParseResult::Ok("hel", "lo ")
        );
        assert!(!literal("hel").parse(" hello", false).is_ok());
    }

    #[test]
    fn parse_state_continues_from_the_cursor() {
        let mut state = State::new("hello world");
        assert_eq!(
            literal("hello").parse_state(&mut state, false),
            ParseResult::Ok("hello", " world")
        );
        assert_eq!(
            literal("world").parse_state(&mut state, true),
            ParseResult::Ok("world", "")
        );
        assert_eq!(state.position(), 11);
    }

    #[test]
    fn parse_to_end_rejects_leftovers() {
        let ParseResult::Error(error) = literal("hello").parse_to_end("hello\n", false) else {
            panic!("parsed the newline");
        };
        assert_eq!(error.kind, FailureKind::ExpectedEof);
        assert_eq!((error.position, error.line, error.column), (5, 1, 6));
    }

    #[test]
    fn parse_to_end_can_ignore_whitespace() {
        assert_eq!(
            literal("hello").parse_to_end(" hello ", true),
            ParseResult::Ok("hello", "")
        );
        let ParseResult::Error(error) = literal("hello").parse_to_end(" hello", false) else {
            panic!("parsed the leading space");
        };
        assert_eq!(error.position, 0);
    }

    #[test]
    fn result_helpers() {
        assert_eq!(literal("a").parse("ab", false).ok(), Some("a"));
        assert_eq!(
            literal("a").parse("ab", false).into_result(),
            Ok(("a", "b"))
        );
        assert!(literal("b").parse("ab", false).into_result().is_err());
    }
}
