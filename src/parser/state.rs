use super::primitives::Pattern;

use derive_more::Display;
use std::fmt::{self, Write};

/// What kind of "no match here" a failure was. Every kind is recoverable by
/// backtracking.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Tried to read past the end of the input.
    #[display("unexpected end of input")]
    UnexpectedEof,
    #[display("literal mismatch")]
    LiteralMismatch,
    #[display("pattern mismatch")]
    PatternMismatch,
    /// Input remained where none was allowed.
    #[display("expected end of input")]
    ExpectedEof,
    /// An explicit `fail`.
    #[default]
    #[display("failure")]
    UserFail,
    #[display("no alternative matched")]
    NoAlternativeMatched,
    /// Zero elements where at least one was required.
    #[display("empty repetition")]
    EmptyRepetition,
}

/// Returned by a parser that did not match. It carries nothing: the details
/// live in the [`State`] the parser ran on, see [`State::failure`].
///
/// Only a [`State`] can create one, so an `Err(Fail)` always has a failure
/// recorded behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fail(());

/// The result of running a parser on a [`State`].
pub type PResult<T> = Result<T, Fail>;

/// The last failure of a parse run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub reason: String,
    /// Byte offset into the input.
    pub position: usize,
}

/// A cursor over the input of a single parse run.
///
/// The state also owns the one failure slot of the run. Failing overwrites
/// the slot in place, reusing the buffer of the reason text, so failing and
/// backtracking do not allocate once the buffer is warm.
#[derive(Clone, Debug)]
pub struct State<'source> {
    text: &'source str,
    pos: usize,
    failure: Failure,
}

impl<'source> State<'source> {
    pub fn new(text: &'source str) -> Self {
        State {
            text,
            pos: 0,
            failure: Failure::default(),
        }
    }

    /// The whole input.
    pub fn text(&self) -> &'source str {
        self.text
    }

    /// Byte offset of the cursor. Always on a character boundary.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor back (or forward) to a position previously returned by
    /// [`State::position`].
    pub fn restore(&mut self, position: usize) {
        debug_assert!(
            self.text.is_char_boundary(position),
            "position {position} is not a character boundary of the input"
        );
        self.pos = position;
    }

    pub fn failure(&self) -> &Failure {
        &self.failure
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// The rest of the input. Empty at the end of the input.
    pub fn rest(&self) -> &'source str {
        &self.text[self.pos..]
    }

    /// The character under the cursor, without advancing.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> PResult<char> {
        match self.rest().chars().next() {
            Some(c) => Ok(c),
            None => self.fail_with(
                FailureKind::UnexpectedEof,
                format_args!("Expected character, but got EOF."),
            ),
        }
    }

    /// Read one character.
    pub fn char(&mut self) -> PResult<char> {
        let c = self.next()?;
        self.pos += c.len_utf8();
        Ok(c)
    }

    /// Read exactly `expected`. Does not advance on failure.
    pub fn literal<'e>(&mut self, expected: &'e str) -> PResult<&'e str> {
        let rest = self.rest();
        if rest.starts_with(expected) {
            self.pos += expected.len();
            return Ok(expected);
        }
        // `expected` is not empty here, the empty string is a prefix of anything.
        let width = expected.chars().count();
        match rest.char_indices().nth(width - 1) {
            Some((i, c)) => {
                let actual = &rest[..i + c.len_utf8()];
                self.fail_with(
                    FailureKind::LiteralMismatch,
                    format_args!("Expected '{expected}', but got '{actual}'."),
                )
            }
            None => self.fail_with(
                FailureKind::LiteralMismatch,
                format_args!("Expected '{expected}', but got EOF."),
            ),
        }
    }

    /// Match `pattern` right at the cursor and return the matched text, which
    /// may be empty. Does not advance on failure.
    pub fn match_pattern(&mut self, pattern: &Pattern) -> PResult<&'source str> {
        let rest = self.rest();
        match pattern.find(rest) {
            Some(matched) => {
                self.pos += matched.len();
                Ok(matched)
            }
            None => self.fail_with(
                FailureKind::PatternMismatch,
                format_args!("Expected pattern '{pattern}', but there was no match."),
            ),
        }
    }

    /// Succeed only at the end of the input.
    pub fn eof(&mut self) -> PResult<()> {
        match self.rest().chars().next() {
            None => Ok(()),
            Some(c) => self.fail_with(
                FailureKind::ExpectedEof,
                format_args!("Expected EOF, but got '{c}'."),
            ),
        }
    }

    /// Fail here, with the given reason.
    pub fn fail<T>(&mut self, reason: impl fmt::Display) -> PResult<T> {
        self.fail_with(FailureKind::UserFail, format_args!("{reason}"))
    }

    /// Skip any whitespace under the cursor and return it.
    pub fn skip_whitespace(&mut self) -> &'source str {
        let rest = self.rest();
        let skipped = rest.len() - rest.trim_start().len();
        self.pos += skipped;
        &rest[..skipped]
    }

    pub(crate) fn fail_with<T>(&mut self, kind: FailureKind, reason: fmt::Arguments) -> PResult<T> {
        self.failure.kind = kind;
        self.failure.position = self.pos;
        self.failure.reason.clear();
        // Writing to a `String` only fails if a `Display` impl does.
        let _ = self.failure.reason.write_fmt(reason);
        Err(Fail(()))
    }

    /// Report the last failure at `position` instead of where it happened.
    pub(crate) fn relocate_failure(&mut self, position: usize) {
        self.failure.position = position;
    }

    pub(crate) fn replace_reason(&mut self, reason: &str) {
        self.failure.reason.clear();
        self.failure.reason.push_str(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_does_not_advance() {
        let mut state = State::new("hello");
        assert_eq!(state.next(), Ok('h'));
        assert_eq!(state.position(), 0);
        assert_eq!(state.char(), Ok('h'));
        assert_eq!(state.next(), Ok('e'));
        assert_eq!(state.position(), 1);
    }

    #[test]
    fn next_fails_at_eof() {
        let mut state = State::new("hello");
        state.literal("hello").unwrap();
        assert!(state.next().is_err());
        assert_eq!(state.failure().kind, FailureKind::UnexpectedEof);
        assert_eq!(state.failure().position, 5);
    }

    #[test]
    fn rest_never_fails() {
        let mut state = State::new("hello");
        assert_eq!(state.rest(), "hello");
        state.char().unwrap();
        assert_eq!(state.rest(), "ello");
        state.literal("ello").unwrap();
        assert_eq!(state.rest(), "");
    }

    #[test]
    fn char_reads_whole_characters() {
        let mut state = State::new("żx");
        assert_eq!(state.char(), Ok('ż'));
        assert_eq!(state.position(), 'ż'.len_utf8());
        assert_eq!(state.char(), Ok('x'));
        assert!(state.char().is_err());
    }

    #[test]
    fn literal_mismatch_does_not_advance() {
        let mut state = State::new("bar");
        assert!(state.literal("foo").is_err());
        assert_eq!(state.position(), 0);
        assert_eq!(state.failure().kind, FailureKind::LiteralMismatch);
        assert_eq!(state.failure().reason, "Expected 'foo', but got 'bar'.");
    }

    #[test]
    fn literal_too_long_for_the_input() {
        let mut state = State::new("hell");
        assert!(state.literal("hello").is_err());
        assert_eq!(state.failure().reason, "Expected 'hello', but got EOF.");
    }

    #[test]
    fn eof_only_at_the_end() {
        let mut state = State::new("hej");
        assert!(state.eof().is_err());
        assert_eq!(state.failure().reason, "Expected EOF, but got 'h'.");
        state.literal("hej").unwrap();
        assert_eq!(state.eof(), Ok(()));
        assert_eq!(state.position(), 3);
    }

    #[test]
    fn fail_reports_the_cursor() {
        let mut state = State::new("hello");
        state.literal("hel").unwrap();
        assert_eq!(state.fail::<()>("That's enough."), Err(Fail(())));
        assert_eq!(
            state.failure(),
            &Failure {
                kind: FailureKind::UserFail,
                reason: "That's enough.".to_string(),
                position: 3,
            }
        );
    }

    #[test]
    fn failing_reuses_the_reason_buffer() {
        let mut state = State::new("");
        let _ = state.fail::<()>("a fairly long reason, long enough for both");
        let buffer = state.failure().reason.as_ptr();
        let _ = state.next();
        assert_eq!(state.failure().reason.as_ptr(), buffer);
    }

    #[test]
    fn skip_whitespace_skips_only_leading_whitespace() {
        let mut state = State::new(" \r\n\t x ");
        assert_eq!(state.skip_whitespace(), " \r\n\t ");
        assert_eq!(state.rest(), "x ");
        assert_eq!(state.skip_whitespace(), "");
    }
}
