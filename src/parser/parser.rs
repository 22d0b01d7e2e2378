use super::state::{PResult, State};

use std::sync::Arc;

type ParseFn<'a, T> = dyn Fn(&mut State<'_>) -> PResult<T> + Send + Sync + 'a;

/// A reusable parsing function: runs on a [`State`] and either produces a `T`,
/// having advanced the cursor past what it consumed, or fails.
///
/// Parsers hold no per-run state. Cloning one is cheap, and the same parser
/// may run on many threads at once as long as every run has its own `State`.
pub struct Parser<'a, T> {
    name: Arc<str>,
    parse: Arc<ParseFn<'a, T>>,
}

impl<T> Clone for Parser<'_, T> {
    fn clone(&self) -> Self {
        Parser {
            name: Arc::clone(&self.name),
            parse: Arc::clone(&self.parse),
        }
    }
}

impl<T> std::fmt::Debug for Parser<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Parser").field("name", &self.name).finish()
    }
}

// How a parser is used

impl<T> Parser<'_, T> {
    /// Run on `state`, starting at its cursor.
    pub fn run(&self, state: &mut State) -> PResult<T> {
        (self.parse)(state)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// Basic constructors

impl<'a, T: 'a> Parser<'a, T> {
    pub fn from_fn<Func>(name: impl Into<String>, func: Func) -> Self
    where
        Func: Fn(&mut State<'_>) -> PResult<T> + Send + Sync + 'a,
    {
        Parser {
            name: name.into().into(),
            parse: Arc::new(func),
        }
    }

    /// Succeed with `value` without consuming anything.
    pub fn ret(value: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        Parser::from_fn("Ret", move |_| Ok(value.clone()))
    }

    /// Fail with `reason` without consuming anything.
    pub fn fail(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Parser::from_fn("Fail", move |state| state.fail(&reason))
    }
}

/// Make a parser out of a parsing function. Sub-parsers called one after
/// another with `?` form a sequence that is *not* atomic: when a later step
/// fails, the cursor stays where the failing step left it. Wrap the result in
/// [`atomically`](super::atomically) to undo the whole sequence instead.
pub fn parser<'a, T: 'a, Func>(func: Func) -> Parser<'a, T>
where
    Func: Fn(&mut State<'_>) -> PResult<T> + Send + Sync + 'a,
{
    Parser::from_fn("Parser", func)
}

// Combinators that transform a single parser

impl<'a, T: 'a> Parser<'a, T> {
    pub fn map<U, Func>(self, f: Func) -> Parser<'a, U>
    where
        U: 'a,
        Func: Fn(T) -> U + Send + Sync + 'a,
    {
        let name = format!("Map({})", self.name);
        Parser::from_fn(name, move |state| self.run(state).map(&f))
    }

    /// Run `self`, then `other`. Not atomic.
    pub fn then<U: 'a>(self, other: Parser<'a, U>) -> Parser<'a, (T, U)> {
        let name = format!("Then({}, {})", self.name, other.name);
        Parser::from_fn(name, move |state| {
            let a = self.run(state)?;
            let b = other.run(state)?;
            Ok((a, b))
        })
    }

    /// Run `self`, then the parser `f` picks from its result. Not atomic.
    pub fn and_then<U, Func>(self, f: Func) -> Parser<'a, U>
    where
        U: 'a,
        Func: Fn(T) -> Parser<'a, U> + Send + Sync + 'a,
    {
        let name = format!("AndThen({})", self.name);
        Parser::from_fn(name, move |state| {
            let a = self.run(state)?;
            f(a).run(state)
        })
    }

    /// Fail with `reason` when `pred` rejects the parsed value. The failure is
    /// reported after the value, and the value stays consumed.
    pub fn filter<Pred>(self, pred: Pred, reason: impl Into<String>) -> Parser<'a, T>
    where
        Pred: Fn(&T) -> bool + Send + Sync + 'a,
    {
        let name = format!("Filter({})", self.name);
        let reason = reason.into();
        Parser::from_fn(name, move |state| {
            let value = self.run(state)?;
            if pred(&value) {
                Ok(value)
            } else {
                state.fail(&reason)
            }
        })
    }

    /// Replace the reason of any failure with `reason`. The failure keeps its
    /// kind and its position.
    pub fn fails_with(self, reason: impl Into<String>) -> Parser<'a, T> {
        let name = self.name.to_string();
        let reason = reason.into();
        Parser::from_fn(name, move |state| match self.run(state) {
            Ok(value) => Ok(value),
            Err(fail) => {
                state.replace_reason(&reason);
                Err(fail)
            }
        })
    }
}
