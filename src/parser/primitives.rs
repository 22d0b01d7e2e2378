use super::parser::Parser;
use super::state::FailureKind;

use derive_more::Display;
use regex::Regex;
use thiserror::Error;

/// A regular expression that only matches right at the cursor.
#[derive(Clone, Debug, Display)]
#[display("{source}")]
pub struct Pattern {
    source: String,
    anchored: Regex,
}

#[derive(Debug, Error)]
#[error("invalid pattern '{pattern}': {error}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub error: regex::Error,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, PatternError> {
        match Regex::new(&format!("^(?:{source})")) {
            Ok(anchored) => Ok(Pattern {
                source: source.to_owned(),
                anchored,
            }),
            Err(error) => Err(PatternError {
                pattern: source.to_owned(),
                error,
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The match at the very start of `haystack`, if any.
    pub fn find<'h>(&self, haystack: &'h str) -> Option<&'h str> {
        self.anchored.find(haystack).map(|m| m.as_str())
    }
}

impl std::str::FromStr for Pattern {
    type Err = PatternError;

    fn from_str(source: &str) -> Result<Self, PatternError> {
        Pattern::new(source)
    }
}

/// Items joined by ", ".
pub(crate) struct Listed<'l, T>(pub &'l [T]);

impl<T: std::fmt::Display> std::fmt::Display for Listed<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Any single character.
pub fn any_char<'a>() -> Parser<'a, char> {
    Parser::from_fn("AnyChar", |state| state.char())
}

/// Exactly the character `expected`.
pub fn char<'a>(expected: char) -> Parser<'a, char> {
    let name = format!("Char({expected:?})");
    Parser::from_fn(name, move |state| {
        let c = state.next()?;
        if c != expected {
            return state.fail_with(
                FailureKind::LiteralMismatch,
                format_args!("Expected '{expected}', but got '{c}'."),
            );
        }
        state.char()
    })
}

/// One character out of `expected`. An empty set accepts any character.
pub fn char_in<'a>(expected: impl IntoIterator<Item = char>) -> Parser<'a, char> {
    let expected: Vec<char> = expected.into_iter().collect();
    let name = format!("CharIn({expected:?})");
    Parser::from_fn(name, move |state| {
        let c = state.next()?;
        if !expected.is_empty() && !expected.contains(&c) {
            return state.fail_with(
                FailureKind::LiteralMismatch,
                format_args!("Expected one of {}, but got '{c}'.", Listed(&expected)),
            );
        }
        state.char()
    })
}

/// Exactly the text `expected`.
pub fn literal<'a>(expected: &'a str) -> Parser<'a, &'a str> {
    let name = format!("Literal({expected:?})");
    Parser::from_fn(name, move |state| state.literal(expected))
}

/// Text matching `pattern` at the cursor.
pub fn pattern<'a>(pattern: Pattern) -> Parser<'a, String> {
    let name = format!("Pattern({:?})", pattern.as_str());
    Parser::from_fn(name, move |state| {
        state.match_pattern(&pattern).map(str::to_owned)
    })
}

/// Shorthand for [`pattern`] from regex source.
pub fn regex<'a>(source: &str) -> Result<Parser<'a, String>, PatternError> {
    Ok(pattern(Pattern::new(source)?))
}

/// The end of the input.
pub fn eof<'a>() -> Parser<'a, ()> {
    Parser::from_fn("Eof", |state| state.eof())
}

/// The character under the cursor, without consuming it.
pub fn peek<'a>() -> Parser<'a, char> {
    Parser::from_fn("Peek", |state| state.next())
}

/// The rest of the input, without consuming it.
pub fn rest<'a>() -> Parser<'a, String> {
    Parser::from_fn("Rest", |state| Ok(state.rest().to_owned()))
}

/// Always fails with `reason`.
pub fn fail<'a, T: 'a>(reason: impl Into<String>) -> Parser<'a, T> {
    Parser::fail(reason)
}

#[cfg(test)]
mod tests {
    use super::super::{FailureKind, ParseResult, parser};
    use super::*;

    fn error<T: std::fmt::Debug>(result: ParseResult<T>) -> super::super::ParseError {
        match result {
            ParseResult::Error(error) => error,
            ParseResult::Ok(value, rest) => panic!("parsed {value:?}, leaving {rest:?}"),
        }
    }

    #[test]
    fn any_char_reads_one_character() {
        assert_eq!(any_char().parse("xyz", false), ParseResult::Ok('x', "yz"));
        assert_eq!(
            error(any_char().parse("", false)).kind,
            FailureKind::UnexpectedEof,
        );
    }

    #[test]
    fn char_accepts_only_the_expected_one() {
        assert_eq!(char('x').parse("xyz", false), ParseResult::Ok('x', "yz"));
        let e = error(char('a').parse("xyz", false));
        assert_eq!(e.reason, "Expected 'a', but got 'x'.");
        assert_eq!(e.position, 0);
    }

    #[test]
    fn char_in_accepts_any_listed_character() {
        let p = char_in(['a', 'b', 'x', 'y']);
        assert_eq!(p.parse("xyz", false), ParseResult::Ok('x', "yz"));
        let e = error(char_in(['a', 'b', 'c']).parse("xyz", false));
        assert_eq!(e.reason, "Expected one of a, b, c, but got 'x'.");
    }

    #[test]
    fn char_in_with_no_characters_accepts_anything() {
        assert_eq!(char_in([]).parse("xyz", false), ParseResult::Ok('x', "yz"));
        assert!(!char_in([]).parse("", false).is_ok());
    }

    #[test]
    fn literal_consumes_exactly_itself() {
        assert_eq!(
            literal("hello").parse("hello world", false),
            ParseResult::Ok("hello", " world")
        );
        assert_eq!(
            literal("foo").parse("foobar", false),
            ParseResult::Ok("foo", "bar"),
        );
    }

    #[test]
    fn literal_fails_on_other_text_or_eof() {
        assert_eq!(
            error(literal("foo").parse("bar", false)).kind,
            FailureKind::LiteralMismatch,
        );
        assert!(!literal("hello").parse("", false).is_ok());
        assert!(!literal("hello").parse("hell", false).is_ok());
    }

    #[test]
    fn pattern_matches_at_the_cursor() {
        let p = parser(|state| {
            let matched = state.match_pattern(&Pattern::new("f[o]*o").unwrap())?;
            assert_eq!(state.position(), 7);
            Ok(matched.to_owned())
        });
        assert_eq!(
            p.parse("foooooobar", false),
            ParseResult::Ok("foooooo".to_string(), "bar")
        );
    }

    #[test]
    fn pattern_does_not_search_ahead() {
        let p = regex("b[oy]ar").unwrap();
        assert_eq!(
            error(p.parse("bar", false)).kind,
            FailureKind::PatternMismatch,
        );
        let e = error(regex("world").unwrap().parse("hello world", false));
        assert_eq!(
            e.reason,
            "Expected pattern 'world', but there was no match.",
        );
        assert_eq!(e.position, 0);
    }

    #[test]
    fn pattern_needs_input_unless_it_can_match_nothing() {
        assert!(!regex(".").unwrap().parse("", false).is_ok());
        assert!(!regex("hello").unwrap().parse("hell", false).is_ok());
        assert_eq!(
            regex("yes|(nope)?").unwrap().parse("", false),
            ParseResult::Ok(String::new(), "")
        );
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let e = Pattern::new("(unclosed").unwrap_err();
        assert_eq!(e.pattern, "(unclosed");
        assert!(e.to_string().starts_with("invalid pattern '(unclosed'"));
    }

    #[test]
    fn eof_parser() {
        assert_eq!(eof().parse("", false), ParseResult::Ok((), ""));
        let p = literal("hej").then(eof());
        assert_eq!(p.parse("hej", false), ParseResult::Ok(("hej", ()), ""));
        assert_eq!(
            error(literal("he").then(eof()).parse("hej", false)).kind,
            FailureKind::ExpectedEof,
        );
    }

    #[test]
    fn peek_and_rest_consume_nothing() {
        assert_eq!(peek().parse("hello", false), ParseResult::Ok('h', "hello"));
        assert_eq!(
            rest().parse("hello", false),
            ParseResult::Ok("hello".to_string(), "hello")
        );
        let e = error(literal("hello").then(peek()).parse("hello", false));
        assert_eq!(e.position, 5);
    }

    #[test]
    fn fail_fails_where_it_is() {
        let message = "I just don't feel like parsing today.";
        let e = error(fail::<()>(message).parse("hello", false));
        assert_eq!((e.reason.as_str(), e.position), (message, 0));
        let p = literal("hel").then(fail::<()>("That's enough."));
        let e = error(p.parse("hello", false));
        assert_eq!((e.reason.as_str(), e.position), ("That's enough.", 3));
    }
}
