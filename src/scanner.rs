//! Rune scanner over a raw byte buffer.
//!
//! The scanner decodes UTF-8 one code point at a time and keeps a checkpoint at the
//! start of the token in progress. [`Scanner::take`] hands out the text between the
//! checkpoint and the current position. When a recognizer confirms a token on the rune
//! *after* its last character, `take` leaves that rune cached so the next call to
//! [`Scanner::next`] offers it again.

use crate::error::{Error, Result};

const BOM: &[u8] = "\u{feff}".as_bytes();

/// A decoded code point or one of the two sentinels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rune {
    Char(char),
    Eof,
    Invalid,
}

impl Rune {
    pub(crate) fn is(self, c: char) -> bool {
        self == Rune::Char(c)
    }
}

/// Cursor over the input with a one-rune lookahead cache.
#[derive(Debug)]
pub struct Scanner<'a> {
    buf: &'a [u8],
    origin: usize,
    start: usize,
    offset: usize,
    last: usize,
    rune: Rune,
    cached: bool,
    eof: bool,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner; a leading byte-order mark is skipped.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        let origin = if buf.starts_with(BOM) { BOM.len() } else { 0 };
        Scanner {
            buf,
            origin,
            start: origin,
            offset: origin,
            last: 0,
            rune: Rune::Eof,
            cached: false,
            eof: false,
        }
    }

    /// Advances and returns the next rune.
    ///
    /// Returns [`Rune::Eof`] at the end of input, repeatedly, and [`Rune::Invalid`]
    /// on a byte sequence that is not UTF-8. Neither sentinel advances the cursor.
    pub fn next(&mut self) -> Rune {
        if self.cached {
            self.cached = false;
            return self.rune;
        }
        if self.offset >= self.buf.len() {
            self.eof = true;
            self.last = 0;
            self.rune = Rune::Eof;
            return self.rune;
        }

        let rest = &self.buf[self.offset..];
        let window = &rest[..rest.len().min(4)];
        let valid = match std::str::from_utf8(window) {
            Ok(s) => s,
            Err(e) => std::str::from_utf8(&window[..e.valid_up_to()]).unwrap_or_default(),
        };

        match valid.chars().next() {
            Some(c) => {
                self.last = c.len_utf8();
                self.offset += self.last;
                self.rune = Rune::Char(c);
            }
            None => {
                self.last = 0;
                self.rune = Rune::Invalid;
            }
        }
        self.rune
    }

    /// Returns the text consumed since the last checkpoint and moves the checkpoint.
    ///
    /// The most recent rune is excluded and cached unless it is the only rune
    /// consumed. At end of input the whole remainder is returned.
    pub fn take(&mut self) -> Result<&'a str> {
        let end = if self.eof {
            self.buf.len()
        } else if self.offset <= self.start {
            return Err(Error::internal("take called before next"));
        } else if self.offset - self.last == self.start {
            self.cached = false;
            self.offset
        } else {
            self.cached = true;
            self.offset - self.last
        };

        let text = &self.buf[self.start..end];
        self.start = end;
        std::str::from_utf8(text).map_err(|_| Error::Encoding)
    }

    /// True once [`Scanner::next`] has returned [`Rune::Eof`].
    #[must_use]
    pub fn at_eof(&self) -> bool {
        self.eof
    }

    /// Byte offset of the token in progress.
    #[must_use]
    pub fn checkpoint(&self) -> usize {
        self.start
    }

    /// Byte offset of the rune most recently returned by [`Scanner::next`].
    #[must_use]
    pub fn position(&self) -> usize {
        self.offset - self.last
    }

    /// Returns the 1-based line and column of a byte offset and the text of its line.
    #[must_use]
    pub fn location(&self, pos: usize) -> (usize, usize, String) {
        let pos = pos.clamp(self.origin, self.buf.len());
        let before = &self.buf[self.origin..pos];

        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(self.origin, |i| self.origin + i + 1);
        let line_end = self.buf[pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.buf.len(), |i| pos + i);

        let col = String::from_utf8_lossy(&self.buf[line_start..pos])
            .chars()
            .count()
            + 1;
        let context = String::from_utf8_lossy(&self.buf[line_start..line_end])
            .trim_end_matches('\r')
            .to_string();

        (line, col, context)
    }
}
