//! Quote and parenthesis aware scanning of raw SQL text.
//!
//! Every splitter in this crate works on top of [`Scanner`], a small state
//! machine that walks the input byte by byte and knows, for each offset,
//! whether it sits inside a quoted literal or inside parentheses. An offset
//! that is neither is *top-level*: only top-level keywords, commas and `=`
//! signs are treated as structure.
//!
//! A quote character opens a literal of its kind unless already inside the
//! other kind, and the next quote of the same kind closes it. A doubled quote
//! (`'it''s'`) therefore closes and immediately reopens the literal, so no
//! top-level offset ever falls between the two quote characters. Backslash
//! escapes are not recognized.

use alloc::vec::Vec;
use core::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InSingleQuote,
    InDoubleQuote,
}

/// Nesting information for a single byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset in the input.
    pub offset: usize,
    /// Whether the byte is inside a quoted literal (closing quote included,
    /// opening quote excluded).
    pub quoted: bool,
    /// Parenthesis depth before the byte is consumed.
    pub depth: usize,
}

impl Position {
    /// Returns whether the byte is outside every quote and parenthesis.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        !self.quoted && self.depth == 0
    }
}

/// Walks SQL text tracking quote and parenthesis nesting.
///
/// Yields one [`Position`] per byte of the input.
#[derive(Debug, Clone)]
pub struct Scanner<'input> {
    bytes: &'input [u8],
    pos: usize,
    state: State,
    depth: usize,
}

impl<'input> Scanner<'input> {
    /// Create a new scanner positioned at the start of `input`.
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
            state: State::Normal,
            depth: 0,
        }
    }

    /// Consume bytes until the next yielded position is `offset`.
    pub(crate) fn advance_to(&mut self, offset: usize) {
        while self.pos < offset && self.next().is_some() {}
    }

    fn step(&mut self, byte: u8) {
        match (self.state, byte) {
            (State::Normal, b'\'') => self.state = State::InSingleQuote,
            (State::Normal, b'"') => self.state = State::InDoubleQuote,
            (State::Normal, b'(') => self.depth += 1,
            (State::Normal, b')') => self.depth = self.depth.saturating_sub(1),
            (State::InSingleQuote, b'\'') | (State::InDoubleQuote, b'"') => {
                self.state = State::Normal;
            }
            _ => {}
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        let &byte = self.bytes.get(self.pos)?;
        let position = Position {
            offset: self.pos,
            quoted: self.state != State::Normal,
            depth: self.depth,
        };
        self.step(byte);
        self.pos += 1;
        Some(position)
    }
}

/// Bytes that glue a keyword to its surroundings, so that `FROM` inside
/// `from_date` or `t.from` is not taken for a keyword. A closing quote does
/// not glue: `'x'FROM` is a literal followed by FROM.
fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || !byte.is_ascii() || matches!(byte, b'_' | b'$' | b'.' | b'`')
}

/// Match a (possibly multi-word) keyword starting exactly at `start`.
///
/// Returns the end offset of the match.
fn match_keyword_at(bytes: &[u8], start: usize, keyword: &str) -> Option<usize> {
    if start > 0 && is_word_byte(bytes[start - 1]) {
        return None;
    }
    let mut pos = start;
    for (i, word) in keyword.split_ascii_whitespace().enumerate() {
        if i > 0 {
            let gap = bytes[pos..]
                .iter()
                .take_while(|b| b.is_ascii_whitespace())
                .count();
            if gap == 0 {
                return None;
            }
            pos += gap;
        }
        let candidate = bytes.get(pos..pos + word.len())?;
        if !candidate.eq_ignore_ascii_case(word.as_bytes()) {
            return None;
        }
        pos += word.len();
    }
    match bytes.get(pos) {
        Some(&b) if is_word_byte(b) => None,
        _ => Some(pos),
    }
}

/// Returns whether `offset` is outside every quote and parenthesis.
///
/// Offsets past the end of the input are never top-level.
#[must_use]
pub fn is_top_level(input: &str, offset: usize) -> bool {
    Scanner::new(input)
        .nth(offset)
        .is_some_and(|p| p.is_top_level())
}

/// Find the first top-level occurrence of `token` at or after `from`.
///
/// Matching is ASCII case-insensitive and does not look at word boundaries.
#[must_use]
pub fn find_top_level(input: &str, token: &str, from: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let needle = token.as_bytes();
    if needle.is_empty() {
        return None;
    }
    Scanner::new(input)
        .skip(from)
        .filter(Position::is_top_level)
        .find(|p| {
            bytes
                .get(p.offset..p.offset + needle.len())
                .is_some_and(|window| window.eq_ignore_ascii_case(needle))
        })
        .map(|p| p.offset)
}

/// Find the first top-level occurrence of `keyword` at or after `from`.
///
/// The keyword must be delimited on both sides by whitespace, punctuation or
/// the ends of the input. Words of a multi-word keyword such as `GROUP BY` may
/// be separated by any run of whitespace. Returns the byte span of the match.
#[must_use]
pub fn find_keyword(input: &str, keyword: &str, from: usize) -> Option<Range<usize>> {
    let bytes = input.as_bytes();
    Scanner::new(input)
        .skip(from)
        .filter(Position::is_top_level)
        .find_map(|p| match_keyword_at(bytes, p.offset, keyword).map(|end| p.offset..end))
}

/// If `input` starts with `keyword`, return what follows it.
///
/// The remainder is returned untrimmed.
#[must_use]
pub fn strip_keyword<'input>(input: &'input str, keyword: &str) -> Option<&'input str> {
    match_keyword_at(input.as_bytes(), 0, keyword).map(|end| &input[end..])
}

/// Split `input` on every top-level occurrence of the ASCII `separator`.
///
/// Pieces are trimmed; empty pieces are kept so callers can reject them.
/// Blank input yields no pieces at all.
#[must_use]
pub fn split_top_level(input: &str, separator: u8) -> Vec<&str> {
    debug_assert!(separator.is_ascii());
    let bytes = input.as_bytes();
    let mut pieces = Vec::new();
    if input.trim().is_empty() {
        return pieces;
    }
    let mut start = 0;
    for p in Scanner::new(input) {
        if p.is_top_level() && bytes[p.offset] == separator {
            pieces.push(input[start..p.offset].trim());
            start = p.offset + 1;
        }
    }
    pieces.push(input[start..].trim());
    pieces
}

/// Split `input` into words separated by top-level whitespace.
///
/// Quoted literals and parenthesized groups stay inside a single word.
#[must_use]
pub fn split_words(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut words = Vec::new();
    let mut start = None;
    for p in Scanner::new(input) {
        let separator = p.is_top_level() && bytes[p.offset].is_ascii_whitespace();
        match (separator, start) {
            (true, Some(s)) => {
                words.push(&input[s..p.offset]);
                start = None;
            }
            (false, None) => start = Some(p.offset),
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push(&input[s..]);
    }
    words
}

/// Split a leading parenthesized group off `input`.
///
/// `input` must start with `(`. Returns the text between the parentheses and
/// the remainder after the matching `)`, or `None` if it is never closed.
#[must_use]
pub fn take_parenthesized(input: &str) -> Option<(&str, &str)> {
    if !input.starts_with('(') {
        return None;
    }
    let bytes = input.as_bytes();
    Scanner::new(input)
        .find(|p| !p.quoted && p.depth == 1 && bytes[p.offset] == b')')
        .map(|p| (&input[1..p.offset], &input[p.offset + 1..]))
}

/// Clause regions of a piece of SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clauses<'input> {
    /// Text before the first clause keyword found, trimmed.
    pub head: &'input str,
    /// Body of each clause, keyword excluded and trimmed, in the order the
    /// keywords were requested. `None` when the keyword is absent or its body
    /// is empty.
    pub bodies: Vec<Option<&'input str>>,
}

impl<'input> Clauses<'input> {
    /// Body of the clause for the `index`-th requested keyword.
    #[must_use]
    pub fn body(&self, index: usize) -> Option<&'input str> {
        self.bodies.get(index).copied().flatten()
    }
}

/// Slice `input` at the first top-level occurrence of each keyword.
///
/// A clause body runs from the end of its keyword to the start of the
/// nearest clause keyword found after it, or to the end of the input. Only
/// the first occurrence of each keyword counts.
#[must_use]
pub fn split_clauses<'input>(input: &'input str, keywords: &[&str]) -> Clauses<'input> {
    let spans: Vec<Option<Range<usize>>> = keywords
        .iter()
        .map(|keyword| find_keyword(input, keyword, 0))
        .collect();

    let head_end = spans
        .iter()
        .flatten()
        .map(|span| span.start)
        .min()
        .unwrap_or(input.len());

    let bodies = spans
        .iter()
        .map(|span| {
            let span = span.as_ref()?;
            let end = spans
                .iter()
                .flatten()
                .map(|other| other.start)
                .filter(|&start| start >= span.end)
                .min()
                .unwrap_or(input.len());
            let body = input[span.end..end].trim();
            (!body.is_empty()).then_some(body)
        })
        .collect();

    Clauses {
        head: input[..head_end].trim(),
        bodies,
    }
}
