//! SELECT statements.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::TableRef;
use crate::case::{
    CaseStyle, convert_identifier, is_plain_identifier, is_reserved_word, rewrite_identifiers,
    snake_to_camel,
};
use crate::errors::ParseError;
use crate::scan::{find_keyword, split_clauses, split_top_level, split_words, strip_keyword};

/// Clause keywords following the table list, in rendering order.
const CLAUSE_KEYWORDS: [&str; 5] = ["WHERE", "GROUP BY", "HAVING", "ORDER BY", "LIMIT"];

/// Reserved words that complete an expression, so a bare alias may follow.
const EXPRESSION_ENDS: &[&str] = &[
    "END", "NULL", "TRUE", "FALSE", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "BINARY",
    "NOCASE", "RTRIM",
];

/// Words that may precede `JOIN` in a join operator.
const JOIN_MODIFIERS: &[&str] = &["LEFT", "RIGHT", "FULL", "INNER", "OUTER", "CROSS", "NATURAL"];

/// A projected field: an expression with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldRef {
    /// The expression as written, such as `u.user_id`, `COUNT(*)` or `*`.
    pub expression: String,
    /// Alias, written with or without `AS`.
    pub alias: Option<String>,
}

impl FieldRef {
    /// Create a field without alias.
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            alias: None,
        }
    }

    /// Set the alias of this field.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Split a projection item at its last top-level `AS`, or before a
    /// trailing bare alias.
    fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        let mut last_as = None;
        let mut from = 0;
        while let Some(span) = find_keyword(text, "AS", from) {
            from = span.end;
            last_as = Some(span);
        }
        if let Some(span) = last_as {
            let expression = text[..span.start].trim_end();
            let alias = text[span.end..].trim();
            if !expression.is_empty() && !alias.is_empty() {
                return Some(Self::new(expression).with_alias(alias));
            }
        }
        Some(Self::split_bare_alias(text).unwrap_or_else(|| Self::new(text)))
    }

    /// `COUNT(*) total` or `name "Full Name"`.
    fn split_bare_alias(text: &str) -> Option<Self> {
        let words = split_words(text);
        let [.., operand, alias] = words.as_slice() else {
            return None;
        };
        if !is_alias_word(alias) || !ends_operand(operand) {
            return None;
        }
        let expression = text[..text.len() - alias.len()].trim_end();
        Some(Self::new(expression).with_alias(*alias))
    }

    fn convert(&mut self, style: CaseStyle) {
        self.expression = if is_plain_identifier(&self.expression) {
            convert_identifier(&self.expression, style)
        } else {
            rewrite_identifiers(&self.expression, style)
        };
    }
}

/// How a table joins the one before it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Join {
    /// The join operator as written, such as `JOIN` or `LEFT OUTER JOIN`.
    pub operator: String,
    /// The join condition, if any.
    pub constraint: Option<JoinConstraint>,
}

/// Condition attached to a join.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinConstraint {
    /// `ON <condition>`
    On(String),
    /// `USING (<columns>)`
    Using(String),
}

impl JoinConstraint {
    fn convert(&mut self, style: CaseStyle) {
        let (JoinConstraint::On(text) | JoinConstraint::Using(text)) = self;
        *text = rewrite_identifiers(text, style);
    }
}

/// A SELECT statement.
///
/// Clause bodies are kept as opaque text; only the projection and the table
/// list are decomposed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Select {
    /// Whether the projection starts with `DISTINCT`.
    pub distinct: bool,
    /// Projected fields, never empty.
    pub fields: Vec<FieldRef>,
    /// Tables of the FROM clause, never empty.
    pub tables: Vec<TableRef>,
    /// WHERE condition.
    pub where_clause: Option<String>,
    /// GROUP BY list.
    pub group_by: Option<String>,
    /// HAVING condition.
    pub having: Option<String>,
    /// ORDER BY list.
    pub order_by: Option<String>,
    /// LIMIT expression, OFFSET included.
    pub limit: Option<String>,
}

impl Select {
    /// Parse the text following the SELECT keyword.
    pub(super) fn parse(body: &str) -> Result<Self, ParseError> {
        let from = find_keyword(body, "FROM", 0).ok_or(ParseError::MissingFrom)?;
        let projection = body[..from.start].trim();
        let (distinct, projection) = strip_keyword(projection, "DISTINCT")
            .map_or((false, projection), |rest| (true, rest.trim_start()));

        let fields = split_top_level(projection, b',')
            .into_iter()
            .map(FieldRef::parse)
            .collect::<Option<Vec<_>>>()
            .filter(|fields| !fields.is_empty())
            .ok_or(ParseError::EmptyFieldList)?;

        let clauses = split_clauses(&body[from.end..], &CLAUSE_KEYWORDS);
        let tables = parse_tables(clauses.head)?;
        let clause = |index: usize| clauses.body(index).map(String::from);

        Ok(Self {
            distinct,
            fields,
            tables,
            where_clause: clause(0),
            group_by: clause(1),
            having: clause(2),
            order_by: clause(3),
            limit: clause(4),
        })
    }

    /// The optional clauses paired with their keyword, in rendering order.
    pub(crate) fn clauses(&self) -> [(&'static str, Option<&str>); 5] {
        [
            (CLAUSE_KEYWORDS[0], self.where_clause.as_deref()),
            (CLAUSE_KEYWORDS[1], self.group_by.as_deref()),
            (CLAUSE_KEYWORDS[2], self.having.as_deref()),
            (CLAUSE_KEYWORDS[3], self.order_by.as_deref()),
            (CLAUSE_KEYWORDS[4], self.limit.as_deref()),
        ]
    }

    pub(super) fn convert_identifiers(&mut self, style: CaseStyle) {
        for field in &mut self.fields {
            field.convert(style);
        }
        for table in &mut self.tables {
            let constraint = table.join.as_mut().and_then(|join| join.constraint.as_mut());
            if let Some(constraint) = constraint {
                constraint.convert(style);
            }
        }
        for clause in [
            &mut self.where_clause,
            &mut self.group_by,
            &mut self.having,
            &mut self.order_by,
        ] {
            if let Some(text) = clause {
                *text = rewrite_identifiers(text, style);
            }
        }
    }

    pub(super) fn inject_aliases(&mut self) {
        for field in &mut self.fields {
            if field.alias.is_some() || !is_plain_identifier(&field.expression) {
                continue;
            }
            let column = field
                .expression
                .rsplit_once('.')
                .map_or(field.expression.as_str(), |(_, column)| column);
            let camel = snake_to_camel(column);
            if camel != column {
                field.alias = Some(camel);
            }
        }
    }
}

fn is_alias_word(word: &str) -> bool {
    let quoted = word.len() >= 2 && word.starts_with('"') && word.ends_with('"');
    quoted || (is_plain_identifier(word) && !word.contains('.') && !is_reserved_word(word))
}

/// Whether `word` can be the last word of an expression.
fn ends_operand(word: &str) -> bool {
    let closes = word.bytes().last().is_some_and(|b| {
        b.is_ascii_alphanumeric() || !b.is_ascii() || matches!(b, b'_' | b')' | b'\'' | b'"')
    });
    let completes = !is_reserved_word(word)
        || EXPRESSION_ENDS
            .iter()
            .any(|end| end.eq_ignore_ascii_case(word));
    closes && completes
}

fn is_constraint_keyword(word: &str) -> bool {
    word.eq_ignore_ascii_case("ON") || word.eq_ignore_ascii_case("USING")
}

/// Number of words of the join operator starting at `words[at]`, if any.
fn join_operator_len(words: &[&str], at: usize) -> Option<usize> {
    let mut len = 0;
    while let Some(word) = words.get(at + len) {
        if word.eq_ignore_ascii_case("JOIN") {
            return Some(len + 1);
        }
        if !JOIN_MODIFIERS.iter().any(|m| word.eq_ignore_ascii_case(m)) {
            return None;
        }
        len += 1;
    }
    None
}

/// Parse the FROM clause into table references.
fn parse_tables(region: &str) -> Result<Vec<TableRef>, ParseError> {
    if region.is_empty() {
        return Err(ParseError::EmptyTableList);
    }
    let mut tables = Vec::new();
    for group in split_top_level(region, b',') {
        parse_join_chain(&split_words(group), &mut tables)
            .ok_or_else(|| ParseError::MalformedTableList(group.to_string()))?;
    }
    Ok(tables)
}

/// Parse `table [alias] { join-operator table [alias] [ON ..|USING ..] }`.
fn parse_join_chain(words: &[&str], tables: &mut Vec<TableRef>) -> Option<()> {
    let mut i = 0;
    let mut operator: Option<String> = None;
    loop {
        let name = *words.get(i)?;
        if is_constraint_keyword(name) || join_operator_len(words, i).is_some() {
            return None;
        }
        i += 1;

        let mut table = TableRef::new(name);
        if let Some(word) = words.get(i) {
            if word.eq_ignore_ascii_case("AS") {
                table.alias = Some((*words.get(i + 1)?).to_string());
                i += 2;
            } else if !is_constraint_keyword(word) && join_operator_len(words, i).is_none() {
                table.alias = Some((*word).to_string());
                i += 1;
            }
        }

        let mut constraint = None;
        if let Some(&word) = words.get(i).filter(|word| is_constraint_keyword(word)) {
            let start = i + 1;
            let mut end = start;
            while end < words.len() && join_operator_len(words, end).is_none() {
                end += 1;
            }
            if end == start {
                return None;
            }
            let text = words[start..end].join(" ");
            constraint = Some(if word.eq_ignore_ascii_case("ON") {
                JoinConstraint::On(text)
            } else {
                JoinConstraint::Using(text)
            });
            i = end;
        }

        table.join = match (operator.take(), constraint) {
            (Some(operator), constraint) => Some(Join {
                operator,
                constraint,
            }),
            (None, Some(_)) => return None,
            (None, None) => None,
        };
        tables.push(table);

        if i == words.len() {
            return Some(());
        }
        let len = join_operator_len(words, i)?;
        operator = Some(words[i..i + len].join(" "));
        i += len;
    }
}
