//! Combinators that backtrack. Each one exists twice: as a method on
//! [`State`], to call inline from a parsing function, and as a free function
//! that builds a [`Parser`].

use super::parser::Parser;
use super::primitives::Listed;
use super::state::{FailureKind, PResult, State};

use std::sync::{Arc, OnceLock};

impl State<'_> {
    /// Run `f`. If it fails, move the cursor back to where `f` started and
    /// report the failure there too.
    pub fn atomically<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let start = self.position();
        match f(self) {
            Ok(value) => Ok(value),
            Err(fail) => {
                self.restore(start);
                self.relocate_failure(start);
                Err(fail)
            }
        }
    }

    /// Run `f`, turning failure into `None`. Nothing is consumed on failure.
    pub fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> Option<T> {
        self.atomically(f).ok()
    }

    /// Run `f` until it fails, collecting what it parsed. The failing attempt
    /// is undone. Never fails; loops forever if `f` succeeds without
    /// consuming input.
    pub fn many<T>(&mut self, mut f: impl FnMut(&mut Self) -> PResult<T>) -> Vec<T> {
        let mut items = vec![];
        loop {
            let before = self.position();
            match f(self) {
                Ok(item) => items.push(item),
                Err(_) => {
                    self.restore(before);
                    return items;
                }
            }
        }
    }

    /// Like [`State::many`], but fails, consuming nothing, unless at least one
    /// item was parsed.
    pub fn many1<T>(&mut self, f: impl FnMut(&mut Self) -> PResult<T>) -> PResult<Vec<T>> {
        self.atomically(|state| {
            let items = state.many(f);
            if items.is_empty() {
                return state.fail_with(
                    FailureKind::EmptyRepetition,
                    format_args!("Expected at least one element, but got none."),
                );
            }
            Ok(items)
        })
    }

    /// The result of the first alternative to succeed. Every alternative starts
    /// from the same position. If all of them fail, so does this, with the
    /// failure of the last one.
    pub fn one_of<T>(&mut self, alternatives: &[Parser<T>]) -> PResult<T> {
        let start = self.position();
        let mut last = None;
        for alternative in alternatives {
            match alternative.run(self) {
                Ok(value) => return Ok(value),
                Err(fail) => {
                    self.restore(start);
                    last = Some(fail);
                }
            }
        }
        match last {
            Some(fail) => Err(fail),
            None => self.fail_with(
                FailureKind::NoAlternativeMatched,
                format_args!("Expected one of nothing, but there were no alternatives."),
            ),
        }
    }

    /// Like [`State::one_of`], but when every alternative fails, the failure
    /// names all the labels and is reported where the alternatives started.
    pub fn one_of_labeled<T, L: AsRef<str>>(
        &mut self,
        alternatives: &[(L, Parser<T>)],
    ) -> PResult<T> {
        let start = self.position();
        for (_, alternative) in alternatives {
            match alternative.run(self) {
                Ok(value) => return Ok(value),
                Err(_) => self.restore(start),
            }
        }
        let labels: Labels<L, T> = Labels(alternatives);
        self.fail_with(
            FailureKind::NoAlternativeMatched,
            format_args!("Expected one of {labels}, but none of them matched."),
        )
    }

    /// `before`, `inside` and `after`, atomically. Returns what `inside` parsed.
    pub fn bracket<B, A, T>(
        &mut self,
        before: impl FnOnce(&mut Self) -> PResult<B>,
        after: impl FnOnce(&mut Self) -> PResult<A>,
        inside: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        self.atomically(|state| {
            before(state)?;
            let value = inside(state)?;
            after(state)?;
            Ok(value)
        })
    }
}

struct Labels<'l, 'p, L, T>(&'l [(L, Parser<'p, T>)]);

impl<L: AsRef<str>, T> std::fmt::Display for Labels<'_, '_, L, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let labels: Vec<&str> = self.0.iter().map(|(label, _)| label.as_ref()).collect();
        write!(f, "{}", Listed(&labels))
    }
}

pub fn atomically<'a, T: 'a>(p: Parser<'a, T>) -> Parser<'a, T> {
    let name = format!("Atomically({})", p.name());
    Parser::from_fn(name, move |state| state.atomically(|state| p.run(state)))
}

pub fn try_parse<'a, T: 'a>(p: Parser<'a, T>) -> Parser<'a, Option<T>> {
    let name = format!("TryParse({})", p.name());
    Parser::from_fn(name, move |state| Ok(state.try_parse(|state| p.run(state))))
}

pub fn many<'a, T: 'a>(p: Parser<'a, T>) -> Parser<'a, Vec<T>> {
    let name = format!("Many({})", p.name());
    Parser::from_fn(name, move |state| Ok(state.many(|state| p.run(state))))
}

pub fn many1<'a, T: 'a>(p: Parser<'a, T>) -> Parser<'a, Vec<T>> {
    let name = format!("Many1({})", p.name());
    Parser::from_fn(name, move |state| state.many1(|state| p.run(state)))
}

pub fn one_of<'a, T: 'a>(alternatives: impl IntoIterator<Item = Parser<'a, T>>) -> Parser<'a, T> {
    let alternatives: Vec<_> = alternatives.into_iter().collect();
    let names: Vec<&str> = alternatives.iter().map(Parser::name).collect();
    let name = format!("OneOf({})", names.join(" | "));
    Parser::from_fn(name, move |state| state.one_of(&alternatives))
}

/// [`one_of`] where each alternative has a human-readable label, used in the
/// failure message when none of them match.
pub fn one_of_labeled<'a, T: 'a, L: Into<String>>(
    alternatives: impl IntoIterator<Item = (L, Parser<'a, T>)>,
) -> Parser<'a, T> {
    let alternatives: Vec<(String, Parser<'a, T>)> = alternatives
        .into_iter()
        .map(|(label, parser)| (label.into(), parser))
        .collect();
    let labels: Vec<&str> = alternatives
        .iter()
        .map(|(label, _)| label.as_str())
        .collect();
    let name = format!("OneOf({})", labels.join(" | "));
    Parser::from_fn(name, move |state| state.one_of_labeled(&alternatives))
}

/// `one_of![a, b, c]` tries `a`, `b` and `c` in order.
/// `one_of!["a" => a, "b" => b]` does the same with labeled alternatives.
#[macro_export]
macro_rules! one_of {
    ($($label:literal => $parser:expr),+ $(,)?) => {
        $crate::parser::one_of_labeled([$(($label, $parser)),+])
    };
    ($($parser:expr),+ $(,)?) => {
        $crate::parser::one_of([$($parser),+])
    };
}

pub fn bracket<'a, B: 'a, A: 'a, T: 'a>(
    before: Parser<'a, B>,
    after: Parser<'a, A>,
    inside: Parser<'a, T>,
) -> Parser<'a, T> {
    let name = format!(
        "Bracket({}, {}, {})",
        before.name(),
        inside.name(),
        after.name()
    );
    Parser::from_fn(name, move |state| {
        state.bracket(
            |state| before.run(state),
            |state| after.run(state),
            |state| inside.run(state),
        )
    })
}

/// A parser that refers to itself. `define` receives a stand-in for the parser
/// being defined and returns its definition.
///
/// The stand-in only holds a weak reference to the definition, so there is no
/// reference cycle. It fails if it outlives every clone of the returned parser.
pub fn recursive<'a, T: 'a>(define: impl FnOnce(Parser<'a, T>) -> Parser<'a, T>) -> Parser<'a, T> {
    let cell: Arc<OnceLock<Parser<'a, T>>> = Arc::new(OnceLock::new());
    let weak = Arc::downgrade(&cell);
    let stand_in = Parser::from_fn("Recursive", move |state| {
        match weak.upgrade().as_deref().and_then(OnceLock::get) {
            Some(definition) => definition.run(state),
            None => state.fail("Recursive parser was used outside of its definition."),
        }
    });
    let definition = define(stand_in);
    let name = definition.name().to_owned();
    let _ = cell.set(definition);
    Parser::from_fn(name, move |state| match cell.get() {
        Some(definition) => definition.run(state),
        None => state.fail("Recursive parser was used outside of its definition."),
    })
}
