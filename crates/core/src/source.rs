//! In-memory source buffer with single-character read/peek.
//!
//! Diagrams are small, so the whole text is held as a `Vec<char>`; the
//! reader tracks the 1-based line and column of the *next* character.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

pub struct SourceReader {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl SourceReader {
    pub fn new(src: &str) -> Self {
        SourceReader {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the next character and advances past it.
    pub fn read_next(&mut self) -> Option<char> {
        let c = *self.chars.get(self.pos)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Returns the next character without advancing.
    pub fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn end_of_input(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Position of the next character to be read.
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }
}
