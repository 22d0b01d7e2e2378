//! A JSON grammar built out of the parser combinators.

use crate::atoms::{boolean, decimal, double_quoted_string};
use crate::one_of;
use crate::parser::{Chain, ParseError, Parser, bracket, chain, literal, parser, recursive};

use derive_more::{Display, From};
use functionality::Mutate;
use std::collections::BTreeMap;
use std::fmt::Write;

fn display_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn display_array(items: &[Value]) -> String {
    let items: Vec<String> = items.iter().map(Value::to_string).collect();
    items.join(",")
}

fn display_object(members: &BTreeMap<String, Value>) -> String {
    let mut out = String::new();
    for (i, (key, value)) in members.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}:{value}", display_string(key));
    }
    out
}

/// A parsed JSON value. Displays as compact JSON.
#[derive(Clone, Debug, Display, From, PartialEq)]
pub enum Value {
    #[from]
    #[display("null")]
    Null,
    #[from]
    #[display("{_0}")]
    Bool(bool),
    #[from(f64, i32)]
    #[display("{_0}")]
    Number(f64),
    #[from(String, &str)]
    #[display("{}", display_string(_0))]
    String(String),
    #[from]
    #[display("[{}]", display_array(_0))]
    Array(Vec<Value>),
    /// When a key appears more than once, the last value wins.
    #[from]
    #[display("{{{}}}", display_object(_0))]
    Object(BTreeMap<String, Value>),
}

/// `symbol`, with any whitespace around it.
fn punctuation<'a>(symbol: &'static str) -> Parser<'a, ()> {
    Parser::from_fn(format!("Punctuation({symbol:?})"), move |state| {
        state.skip_whitespace();
        state.literal(symbol)?;
        state.skip_whitespace();
        Ok(())
    })
}

/// A parser for any JSON value. Whitespace is allowed around punctuation.
///
/// Arrays and objects are parsed by recursion on the call stack, so the
/// nesting depth this can handle is bounded by the thread's stack size.
/// Input from an untrusted source should have its depth limited beforehand,
/// or be parsed on a thread with a large enough stack.
pub fn value<'a>() -> Parser<'a, Value> {
    recursive(|value: Parser<'a, Value>| {
        let array = bracket(
            punctuation("["),
            punctuation("]"),
            chain(value.clone(), punctuation(",")),
        )
        .map(|items| Value::Array(items.into_terms()));

        let member = parser({
            let key = double_quoted_string();
            let colon = punctuation(":");
            let value = value.clone();
            move |state| {
                let key = key.run(state)?;
                colon.run(state)?;
                Ok((key, value.run(state)?))
            }
        });
        let object = bracket(
            punctuation("{"),
            punctuation("}"),
            chain(member, punctuation(",")),
        )
        .map(|members: Chain<(String, Value), ()>| {
            let members = members.into_terms();
            Value::Object(BTreeMap::new().mutate(|object| object.extend(members)))
        });

        one_of![
            "a number" => decimal().map(Value::Number),
            "a string" => double_quoted_string().map(Value::String),
            "a boolean" => boolean().map(Value::Bool),
            "null" => literal("null").map(|_| Value::Null),
            "an object" => object,
            "an array" => array,
        ]
    })
}

/// Parse `text` as a single JSON value, with optional surrounding whitespace.
/// Nesting depth is limited as described for [`value`].
pub fn parse(text: &str) -> Result<Value, ParseError> {
    let (value, _) = value().parse_to_end(text, true).into_result()?;
    Ok(value)
}
