//! Position-tracking character reader with one-character pushback.

use crate::token::Position;

/// Character reader over the source text.
///
/// Every index the cursor has visited keeps the line and column that
/// were current there, so [`Cursor::back`] restores the exact location
/// even when stepping back over a newline.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
    marks: Vec<Position>,
}

impl Cursor {
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            line: 0,
            column: 0,
            marks: vec![Position::default()],
        }
    }

    /// Un-consume the last character. A no-op at the start of input.
    pub fn back(&mut self) {
        self.index = self.index.saturating_sub(1);
        let mark = self.marks[self.index];
        self.line = mark.line;
        self.column = mark.column;
    }

    /// Current location, without consuming anything.
    #[must_use]
    pub const fn mark(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }
}

/// Consumes and returns the next character, `None` at end of input.
impl Iterator for Cursor {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let ch = *self.chars.get(self.index)?;
        self.index += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        let mark = self.mark();
        if self.index < self.marks.len() {
            self.marks[self.index] = mark;
        } else {
            self.marks.push(mark);
        }
        Some(ch)
    }
}
