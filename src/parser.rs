//! This module is responsible for declaring the parser type, the state a
//! parser runs on, and the combinators that build bigger parsers out of
//! smaller ones. It knows nothing about any particular format.

mod chain;
mod combinators;
#[allow(clippy::module_inception)]
mod parser;
mod primitives;
mod run;
mod state;

pub use chain::{Chain, chain, chain1, chainl, chainr};
pub use combinators::{
    atomically, bracket, many, many1, one_of, one_of_labeled, recursive, try_parse,
};
pub use parser::{Parser, parser};
pub use primitives::{
    Pattern, PatternError, any_char, char, char_in, eof, fail, literal, pattern, peek, regex, rest,
};
pub use run::{ParseError, ParseResult};
pub use state::{Fail, Failure, FailureKind, PResult, State};
