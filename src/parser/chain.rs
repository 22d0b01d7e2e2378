use super::parser::Parser;
use super::state::{FailureKind, PResult, State};

/// Terms separated by separators, like `1 + 2 - 3`.
///
/// There is always one separator less than there are terms, except when the
/// chain is empty, in which case both are empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Chain<T, S> {
    terms: Vec<T>,
    separators: Vec<S>,
}

impl<T, S> Default for Chain<T, S> {
    fn default() -> Self {
        Chain::empty()
    }
}

impl<T, S> Chain<T, S> {
    pub const fn empty() -> Self {
        Chain {
            terms: vec![],
            separators: vec![],
        }
    }

    pub fn terms(&self) -> &[T] {
        &self.terms
    }

    pub fn separators(&self) -> &[S] {
        &self.separators
    }

    pub fn into_terms(self) -> Vec<T> {
        self.terms
    }

    pub fn into_parts(self) -> (Vec<T>, Vec<S>) {
        (self.terms, self.separators)
    }

    /// The number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// `((t0 s0 t1) s1 t2) ...`, calling `combine(lhs, rhs, separator)`.
    /// `None` for the empty chain.
    pub fn fold_left(self, mut combine: impl FnMut(T, T, S) -> T) -> Option<T> {
        let mut terms = self.terms.into_iter();
        let first = terms.next()?;
        Some(
            terms
                .zip(self.separators)
                .fold(first, |lhs, (rhs, separator)| combine(lhs, rhs, separator)),
        )
    }

    /// `... t0 s0 (t1 s1 (t2 s2 t3))`, calling `combine(lhs, rhs, separator)`.
    /// `None` for the empty chain.
    pub fn fold_right(self, mut combine: impl FnMut(T, T, S) -> T) -> Option<T> {
        let mut terms = self.terms;
        let last = terms.pop()?;
        Some(
            terms
                .into_iter()
                .zip(self.separators)
                .rev()
                .fold(last, |rhs, (lhs, separator)| combine(lhs, rhs, separator)),
        )
    }
}

impl State<'_> {
    /// One `term`, then any number of `separator` and `term` pairs. Atomic.
    /// A separator that is not followed by a term is left unconsumed. Without
    /// a first term, fails with [`FailureKind::EmptyRepetition`].
    pub fn chain1<T, S>(
        &mut self,
        mut term: impl FnMut(&mut Self) -> PResult<T>,
        mut separator: impl FnMut(&mut Self) -> PResult<S>,
    ) -> PResult<Chain<T, S>> {
        self.atomically(|state| {
            let Ok(head) = term(state) else {
                return state.empty_chain();
            };
            let tail = state.many(|state| {
                let s = separator(state)?;
                let t = term(state)?;
                Ok((s, t))
            });
            let mut chain = Chain {
                terms: Vec::with_capacity(tail.len() + 1),
                separators: Vec::with_capacity(tail.len()),
            };
            chain.terms.push(head);
            for (s, t) in tail {
                chain.separators.push(s);
                chain.terms.push(t);
            }
            Ok(chain)
        })
    }

    /// Like [`State::chain1`], but an empty chain where that fails.
    pub fn chain<T, S>(
        &mut self,
        term: impl FnMut(&mut Self) -> PResult<T>,
        separator: impl FnMut(&mut Self) -> PResult<S>,
    ) -> Chain<T, S> {
        self.try_parse(|state| state.chain1(term, separator))
            .unwrap_or_default()
    }

    /// A chain folded from the left with `combine`. Fails on an empty chain.
    pub fn chainl<T, S>(
        &mut self,
        term: impl FnMut(&mut Self) -> PResult<T>,
        separator: impl FnMut(&mut Self) -> PResult<S>,
        combine: impl FnMut(T, T, S) -> T,
    ) -> PResult<T> {
        match self.chain(term, separator).fold_left(combine) {
            Some(value) => Ok(value),
            None => self.empty_chain(),
        }
    }

    /// A chain folded from the right with `combine`. Fails on an empty chain.
    pub fn chainr<T, S>(
        &mut self,
        term: impl FnMut(&mut Self) -> PResult<T>,
        separator: impl FnMut(&mut Self) -> PResult<S>,
        combine: impl FnMut(T, T, S) -> T,
    ) -> PResult<T> {
        match self.chain(term, separator).fold_right(combine) {
            Some(value) => Ok(value),
            None => self.empty_chain(),
        }
    }

    fn empty_chain<T>(&mut self) -> PResult<T> {
        self.fail_with(
            FailureKind::EmptyRepetition,
            format_args!("Chain did not match any elements."),
        )
    }
}

pub fn chain1<'a, T: 'a, S: 'a>(
    term: Parser<'a, T>,
    separator: Parser<'a, S>,
) -> Parser<'a, Chain<T, S>> {
    let name = format!("Chain1({}, {})", term.name(), separator.name());
    Parser::from_fn(name, move |state| {
        state.chain1(|state| term.run(state), |state| separator.run(state))
    })
}

pub fn chain<'a, T: 'a, S: 'a>(
    term: Parser<'a, T>,
    separator: Parser<'a, S>,
) -> Parser<'a, Chain<T, S>> {
    let name = format!("Chain({}, {})", term.name(), separator.name());
    Parser::from_fn(name, move |state| {
        Ok(state.chain(
            |state| term.run(state),
            |state| separator.run(state),
        ))
    })
}

pub fn chainl<'a, T: 'a, S: 'a, Func>(
    term: Parser<'a, T>,
    separator: Parser<'a, S>,
    combine: Func,
) -> Parser<'a, T>
where
    Func: Fn(T, T, S) -> T + Send + Sync + 'a,
{
    let name = format!("ChainL({}, {})", term.name(), separator.name());
    Parser::from_fn(name, move |state| {
        state.chainl(
            |state| term.run(state),
            |state| separator.run(state),
            &combine,
        )
    })
}

pub fn chainr<'a, T: 'a, S: 'a, Func>(
    term: Parser<'a, T>,
    separator: Parser<'a, S>,
    combine: Func,
) -> Parser<'a, T>
where
    Func: Fn(T, T, S) -> T + Send + Sync + 'a,
{
    let name = format!("ChainR({}, {})", term.name(), separator.name());
    Parser::from_fn(name, move |state| {
        state.chainr(
            |state| term.run(state),
            |state| separator.run(state),
            &combine,
        )
    })
}
