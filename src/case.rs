//! Identifier case conversion between `snake_case` and `camelCase`.
//!
//! The two conversions are not inverses of each other. They round-trip only
//! for identifiers made of lower-case letters and digits separated by single
//! underscores: `HTTPCode` becomes `h_t_t_p_code` and then `hTTPCode`, and
//! leading or doubled underscores are lost on the way to camel case.

use alloc::string::String;

use crate::scan::Scanner;

/// Target style of an identifier conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaseStyle {
    /// `snake_case` to `camelCase`.
    Camel,
    /// `camelCase` to `snake_case`.
    Snake,
}

impl CaseStyle {
    /// Convert a single identifier segment (no `.`) to this style.
    #[must_use]
    pub fn apply(self, segment: &str) -> String {
        match self {
            CaseStyle::Camel => snake_to_camel(segment),
            CaseStyle::Snake => camel_to_snake(segment),
        }
    }
}

/// Convert a `snake_case` segment to `camelCase`.
///
/// The segment is split on `_`. The first part is lower-cased, every following
/// non-empty part gets an upper-case first character and a lower-cased rest.
///
/// ```
/// use sql_reshape::case::snake_to_camel;
///
/// assert_eq!(snake_to_camel("user_id"), "userId");
/// assert_eq!(snake_to_camel("CREATE_TIME"), "createTime");
/// ```
#[must_use]
pub fn snake_to_camel(segment: &str) -> String {
    let mut camel = String::with_capacity(segment.len());
    for (i, part) in segment.split('_').enumerate() {
        if i == 0 {
            camel.extend(part.chars().flat_map(char::to_lowercase));
            continue;
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            camel.extend(first.to_uppercase());
            camel.extend(chars.flat_map(char::to_lowercase));
        }
    }
    camel
}

/// Convert a `camelCase` segment to `snake_case`.
///
/// An `_` is inserted before every upper-case character except the first one,
/// then the whole result is lower-cased.
///
/// ```
/// use sql_reshape::case::camel_to_snake;
///
/// assert_eq!(camel_to_snake("userId"), "user_id");
/// assert_eq!(camel_to_snake("HTTPCode"), "h_t_t_p_code");
/// ```
#[must_use]
pub fn camel_to_snake(segment: &str) -> String {
    let mut snake = String::with_capacity(segment.len() + 4);
    for (i, c) in segment.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            snake.push('_');
        }
        snake.extend(c.to_lowercase());
    }
    snake
}

/// Convert the last segment of a dotted identifier, keeping its qualifiers.
///
/// ```
/// use sql_reshape::case::{CaseStyle, convert_identifier};
///
/// assert_eq!(convert_identifier("u.user_name", CaseStyle::Camel), "u.userName");
/// assert_eq!(convert_identifier("db.t.userName", CaseStyle::Snake), "db.t.user_name");
/// ```
#[must_use]
pub fn convert_identifier(identifier: &str, style: CaseStyle) -> String {
    match identifier.rsplit_once('.') {
        Some((qualifier, segment)) => {
            let mut converted = String::with_capacity(identifier.len() + 4);
            converted.push_str(qualifier);
            converted.push('.');
            converted.push_str(&style.apply(segment));
            converted
        }
        None => style.apply(identifier),
    }
}

/// Words left alone by [`rewrite_identifiers`] even though they look like
/// identifiers: keywords, collation names, date/time constants and the usual
/// type names of `CAST`.
const RESERVED_WORDS: &[&str] = &[
    "ALL", "AND", "ANY", "AS", "ASC", "BETWEEN", "BIGINT", "BINARY", "BLOB", "BOOLEAN", "BY",
    "CASE", "CAST", "CHAR", "COLLATE", "CROSS", "CURRENT_DATE", "CURRENT_TIME",
    "CURRENT_TIMESTAMP", "DATE", "DECIMAL", "DESC", "DISTINCT", "DOUBLE", "ELSE", "END", "ESCAPE",
    "EXCEPT", "EXISTS", "FALSE", "FIRST", "FLOAT", "FROM", "FULL", "GLOB", "GROUP", "HAVING",
    "ILIKE", "IN", "INNER", "INT", "INTEGER", "INTERSECT", "INTERVAL", "IS", "ISNULL", "JOIN",
    "LAST", "LEFT", "LIKE", "LIMIT", "MATCH", "NATURAL", "NOCASE", "NOT", "NOTNULL", "NULL",
    "NULLS", "NUMERIC", "OFFSET", "ON", "OR", "ORDER", "OUTER", "REAL", "REGEXP", "RIGHT", "RTRIM",
    "SELECT", "SMALLINT", "SOME", "TEXT", "THEN", "TIMESTAMP", "TRUE", "UNION", "USING",
    "VARCHAR", "WHEN", "WHERE",
];

/// Returns whether `word` is one of the SQL words never treated as a column.
pub(crate) fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(word))
}

fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

/// Non-ASCII bytes belong to the identifier they appear in.
fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || !byte.is_ascii()
}

/// Returns whether `text` is a bare identifier, optionally dotted, such as
/// `user_id` or `u.user_id`.
#[must_use]
pub fn is_plain_identifier(text: &str) -> bool {
    text.split('.').all(|segment| {
        segment.bytes().next().is_some_and(is_identifier_start)
            && segment.bytes().all(is_identifier_byte)
    })
}

/// End offset of the dotted identifier token starting at `start`.
fn token_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() {
        if is_identifier_byte(bytes[end]) {
            end += 1;
        } else if bytes[end] == b'.' && bytes.get(end + 1).copied().is_some_and(is_identifier_start)
        {
            end += 1;
        } else {
            break;
        }
    }
    end
}

/// Decide whether the token `bytes[start..end]` names a column.
fn is_column_token(bytes: &[u8], start: usize, end: usize) -> bool {
    if !is_identifier_start(bytes[start]) {
        return false;
    }
    // Bind parameters, variables and `::type` casts.
    if start > 0 && matches!(bytes[start - 1], b':' | b'@' | b'$' | b'#') {
        return false;
    }
    // Function calls and qualifiers of `t.*` or `t."Col"`.
    let next = bytes[end..].iter().find(|b| !b.is_ascii_whitespace());
    if next == Some(&b'(') || bytes.get(end) == Some(&b'.') {
        return false;
    }
    !RESERVED_WORDS
        .iter()
        .any(|word| word.as_bytes().eq_ignore_ascii_case(&bytes[start..end]))
}

/// Convert every column-like identifier in a free-form SQL fragment.
///
/// This is a lexical rewrite, not an expression parser: each token made of
/// letters, digits and underscores (optionally dotted) has its last segment
/// converted. Quoted literals, numbers, function names, bind parameters,
/// common SQL keywords and the type following `AS` are left untouched.
///
/// ```
/// use sql_reshape::case::{CaseStyle, rewrite_identifiers};
///
/// assert_eq!(
///     rewrite_identifiers("u.user_id = 1 AND COUNT(order_id) > 'n_a'", CaseStyle::Camel),
///     "u.userId = 1 AND COUNT(orderId) > 'n_a'"
/// );
/// ```
#[must_use]
pub fn rewrite_identifiers(text: &str, style: CaseStyle) -> String {
    let bytes = text.as_bytes();
    let mut rewritten = String::with_capacity(text.len());
    let mut copied = 0;
    let mut after_as = false;
    let mut scanner = Scanner::new(text);
    while let Some(p) = scanner.next() {
        let start = p.offset;
        if p.quoted || !is_identifier_byte(bytes[start]) {
            continue;
        }
        let end = token_end(bytes, start);
        scanner.advance_to(end);
        // `CAST(x AS type)`: the word after AS names a type.
        let is_as = text[start..end].eq_ignore_ascii_case("AS");
        let follows_as = core::mem::replace(&mut after_as, is_as);
        if follows_as || !is_column_token(bytes, start, end) {
            continue;
        }
        rewritten.push_str(&text[copied..start]);
        rewritten.push_str(&convert_identifier(&text[start..end], style));
        copied = end;
    }
    rewritten.push_str(&text[copied..]);
    rewritten
}
