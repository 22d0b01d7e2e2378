//! Provides a backtracking parser combinator engine, for writing
//! recursive-descent parsers over string input.

/// The parser type, the state it runs on, and the combinators.
pub mod parser;
/// Line and column of an offset into some text.
pub mod position;
/// Prebuilt parsers for common tokens.
pub mod atoms;
pub mod json;


// Re-export
pub mod prelude {
    pub use crate::atoms::{
        boolean, decimal, double_quoted_string, integer, single_quoted_string, whitespace,
        whitespace1,
    };
    pub use crate::json;
    pub use crate::one_of;
    pub use crate::parser::{
        Chain, PResult, ParseError, ParseResult, Parser, Pattern, State, any_char, atomically,
        bracket, chain, chain1, chainl, chainr, char, eof, fail, literal, many, many1, one_of,
        parser, pattern, recursive, regex, try_parse,
    };
    pub use crate::position::Position;
}
