//! Parsers for common tokens: whitespace, numbers, booleans and quoted strings.
//!
//! Each constructor compiles its own pattern, so the returned parser owns
//! everything it needs. Construct these once and clone them.

use crate::parser::{Parser, Pattern, pattern};

fn builtin(source: &str) -> Pattern {
    Pattern::new(source).expect("built-in patterns are valid regular expressions")
}

/// Zero or more whitespace characters.
pub fn whitespace<'a>() -> Parser<'a, String> {
    pattern(builtin(r"\s*"))
}

/// One or more whitespace characters.
pub fn whitespace1<'a>() -> Parser<'a, String> {
    pattern(builtin(r"\s+"))
}

/// A base 10, 64-bit signed integer, with an optional sign.
///
/// Digits that are out of the range of an `i64` are a failure, reported after
/// the digits.
pub fn integer<'a>() -> Parser<'a, i64> {
    let digits = builtin(r"[+\-]?[0-9]+");
    Parser::from_fn("Integer", move |state| {
        let text = state.match_pattern(&digits)?;
        match text.parse() {
            Ok(n) => Ok(n),
            Err(_) => state.fail(format_args!(
                "Expected a 64-bit integer, but '{text}' is outside its representable range."
            )),
        }
    })
}

/// A floating point number, in decimal or scientific notation.
///
/// Numbers too large for an `f64`, like `1e999`, are a failure, reported after
/// the number.
pub fn decimal<'a>() -> Parser<'a, f64> {
    let number = builtin(r"[+\-]?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+\-]?\d+)?");
    Parser::from_fn("Decimal", move |state| {
        let text = state.match_pattern(&number)?;
        match text.parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(x),
            _ => state.fail(format_args!(
                "Expected a decimal number, but '{text}' is outside its representable range."
            )),
        }
    })
}

/// `true` or `false`, not followed by a word character. Case-sensitive.
pub fn boolean<'a>() -> Parser<'a, bool> {
    let boolean = builtin(r"(?:true|false)\b");
    Parser::from_fn("Boolean", move |state| {
        Ok(state.match_pattern(&boolean)? == "true")
    })
}

/// A string in double quotes. Supports the escapes `\\`, `\"`, `\n`, `\r`,
/// `\t` and `\b`.
pub fn double_quoted_string<'a>() -> Parser<'a, String> {
    quoted_string("DoubleQuotedString", r#""[^\\"]*(?:\\["nrtb\\][^\\"]*)*""#)
}

/// A string in single quotes. Supports the escapes `\\`, `\'`, `\n`, `\r`,
/// `\t` and `\b`.
pub fn single_quoted_string<'a>() -> Parser<'a, String> {
    quoted_string("SingleQuotedString", r#"'[^\\']*(?:\\['nrtb\\][^\\']*)*'"#)
}

fn quoted_string<'a>(name: &str, source: &str) -> Parser<'a, String> {
    let quoted = builtin(source);
    Parser::from_fn(name, move |state| {
        let matched = state.match_pattern(&quoted)?;
        Ok(unescape(&matched[1..matched.len() - 1]))
    })
}

/// Decode the escapes of a quoted string, left to right.
fn unescape(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
