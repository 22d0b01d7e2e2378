use derive_more::Display;

/// An offset into some text, able to tell its line and column.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[display("[{}:{}]", self.line(), self.column())]
pub struct Position<'a> {
    pub text: &'a str,
    /// A byte offset. Starts at 0.
    pub offset: usize,
}

impl<'a> Position<'a> {
    pub const fn new(text: &'a str, offset: usize) -> Self {
        Self { text, offset }
    }

    /// Starts at 1.
    pub fn line(&self) -> usize {
        self.consumed().chars().filter(|&c| c == '\n').count() + 1
    }

    /// Starts at 1. Counted in characters, not bytes.
    pub fn column(&self) -> usize {
        self.consumed()
            .chars()
            .rev()
            .take_while(|&c| c != '\n')
            .count()
            + 1
    }

    fn consumed(&self) -> &'a str {
        &self.text[..self.offset.min(self.text.len())]
    }
}
