//! Per-class token automata.
//!
//! A recognizer is a pure function of the current rune, its own state from the
//! previous rune (0 before the first rune) and whether another recognizer of the
//! same stage is still tentatively matching. States returned through
//! [`Step::Maybe`] are always non-zero.
//!
//! A recognizer confirms most tokens on the rune *after* the token, so that rune
//! must be offered again to the next stage. The scanner takes care of that.

use crate::scanner::Rune;
use crate::token::TokenKind;

/// Outcome of feeding one rune to a recognizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Out of the race.
    No,
    /// Consumed; the token is not complete yet.
    Maybe(u8),
    /// The token is complete.
    Yes,
    /// The input is a malformed token of this class.
    Invalid,
}

const BOOLEAN: &[u8] = b"truefalse";
const DATETIME: &[u8] = b"0000-00-00T00:00:00Z";

pub(crate) fn is_whitespace(r: Rune) -> bool {
    r.is(' ') || r.is('\t')
}

pub(crate) fn is_newline(r: Rune) -> bool {
    r.is('\n') || r.is('\r') || r.is('\u{1e}')
}

fn is_digit(r: Rune) -> bool {
    matches!(r, Rune::Char(c) if c.is_ascii_digit())
}

/// A value literal just ended: whitespace, newline, EOF, `#`, `,` or `]`.
pub(crate) fn is_value_suffix(r: Rune) -> bool {
    is_whitespace(r) || is_newline(r) || r == Rune::Eof || r.is('#') || r.is(',') || r.is(']')
}

/// Feeds one rune to the recognizer of `token`.
pub(crate) fn step(token: TokenKind, r: Rune, state: u8, racing: bool) -> Step {
    match token {
        TokenKind::Eof => eof(r),
        TokenKind::Whitespace => whitespace(r, state, racing),
        TokenKind::NewLine => newline(r),
        TokenKind::Comment => comment(r, state, racing),
        TokenKind::String => string(r, state, racing),
        TokenKind::Integer => integer(r, state),
        TokenKind::Float => float(r, state),
        TokenKind::Boolean => boolean(r, state, racing),
        TokenKind::Datetime => datetime(r, state),
        TokenKind::TableName => table_name(r, state, racing),
        TokenKind::ArrayOfTables => array_of_tables(r, state),
        TokenKind::Key => key(r, state, racing),
        TokenKind::Equal => punct(r, '=', state, racing),
        TokenKind::Comma => punct(r, ',', state, racing),
        TokenKind::ArrayLeftBrack => punct(r, '[', state, racing),
        TokenKind::ArrayRightBrack => punct(r, ']', state, racing),
    }
}

fn eof(r: Rune) -> Step {
    if r == Rune::Eof {
        Step::Yes
    } else {
        Step::No
    }
}

fn whitespace(r: Rune, state: u8, racing: bool) -> Step {
    match state {
        0 if !racing && is_whitespace(r) => Step::Maybe(1),
        1 if is_whitespace(r) => Step::Maybe(1),
        1 => Step::Yes,
        _ => Step::No,
    }
}

fn newline(r: Rune) -> Step {
    if is_newline(r) {
        Step::Yes
    } else {
        Step::No
    }
}

fn comment(r: Rune, state: u8, racing: bool) -> Step {
    match state {
        0 if !racing && r.is('#') => Step::Maybe(1),
        1 if is_newline(r) || r == Rune::Eof => Step::Yes,
        1 => Step::Maybe(1),
        _ => Step::No,
    }
}

// 1: after a backslash, 2: inside, 3: after the closing quote
fn string(r: Rune, state: u8, racing: bool) -> Step {
    match state {
        0 if !racing && r.is('"') => Step::Maybe(2),
        0 => Step::No,
        _ if is_newline(r) || r == Rune::Eof => Step::Invalid,
        1 => Step::Maybe(2),
        2 if r.is('\\') => Step::Maybe(1),
        2 if r.is('"') => Step::Maybe(3),
        2 => Step::Maybe(2),
        3 if is_value_suffix(r) => Step::Yes,
        _ => Step::Invalid,
    }
}

// 1: after the sign, 2: digits
fn integer(r: Rune, state: u8) -> Step {
    match state {
        0 if r.is('-') => Step::Maybe(1),
        0 | 1 | 2 if is_digit(r) => Step::Maybe(2),
        2 if is_value_suffix(r) => Step::Yes,
        _ => Step::No,
    }
}

// 1: sign, 2: integer part, 3: dot, 4: fraction
fn float(r: Rune, state: u8) -> Step {
    match state {
        0 if r.is('-') => Step::Maybe(1),
        0 | 1 | 2 if is_digit(r) => Step::Maybe(2),
        2 if r.is('.') => Step::Maybe(3),
        3 | 4 if is_digit(r) => Step::Maybe(4),
        3 => Step::Invalid,
        4 if is_value_suffix(r) => Step::Yes,
        _ => Step::No,
    }
}

// state indexes the next expected byte of "truefalse"
fn boolean(r: Rune, state: u8, racing: bool) -> Step {
    match state {
        0 if racing => Step::No,
        0 if r.is('t') => Step::Maybe(1),
        0 if r.is('f') => Step::Maybe(5),
        4 | 9 if is_value_suffix(r) => Step::Yes,
        1..=3 | 5..=8 if r.is(char::from(BOOLEAN[usize::from(state)])) => Step::Maybe(state + 1),
        _ => Step::No,
    }
}

// state indexes the template; a mismatch inside the year is a plain non-match
fn datetime(r: Rune, state: u8) -> Step {
    let i = usize::from(state);
    if let Some(&expected) = DATETIME.get(i) {
        let accepted = if expected == b'0' {
            is_digit(r)
        } else {
            r.is(char::from(expected))
        };
        return match (accepted, state) {
            (true, _) => Step::Maybe(state + 1),
            (false, 0..=4) => Step::No,
            (false, _) => Step::Invalid,
        };
    }
    if is_value_suffix(r) {
        Step::Yes
    } else {
        Step::Invalid
    }
}

// 1: after `[`, 2: name, 3: after `]`
fn table_name(r: Rune, state: u8, racing: bool) -> Step {
    match state {
        0 if !racing && r.is('[') => Step::Maybe(1),
        1 if r.is('[') => Step::No,
        1 if r.is(']') => Step::Invalid,
        1 | 2 if is_whitespace(r) || is_newline(r) || r == Rune::Eof => Step::Invalid,
        2 if r.is(']') => Step::Maybe(3),
        1 | 2 => Step::Maybe(2),
        3 => Step::Yes,
        _ => Step::No,
    }
}

// 1: `[`, 2: `[[`, 3: name, 4: first `]`, 5: `]]`
fn array_of_tables(r: Rune, state: u8) -> Step {
    match state {
        0 | 1 if r.is('[') => Step::Maybe(state + 1),
        2 if r.is(']') => Step::Invalid,
        2 | 3 if is_whitespace(r) || is_newline(r) || r == Rune::Eof => Step::Invalid,
        3 if r.is(']') => Step::Maybe(4),
        2 | 3 => Step::Maybe(3),
        4 if r.is(']') => Step::Maybe(5),
        4 => Step::Invalid,
        5 => Step::Yes,
        _ => Step::No,
    }
}

fn key(r: Rune, state: u8, racing: bool) -> Step {
    match state {
        0 if racing || r == Rune::Eof || r.is('=') => Step::No,
        0 => Step::Maybe(1),
        _ if is_newline(r) || r == Rune::Eof => Step::Invalid,
        _ if r.is('=') || is_whitespace(r) => Step::Yes,
        _ => Step::Maybe(1),
    }
}

// single-rune tokens confirm on the following rune
fn punct(r: Rune, c: char, state: u8, racing: bool) -> Step {
    match state {
        0 if !racing && r.is(c) => Step::Maybe(1),
        0 => Step::No,
        _ => Step::Yes,
    }
}
