//! UPDATE statements.

use alloc::string::String;

use indexmap::IndexMap;

use super::{TableRef, convert_field_name};
use crate::case::{CaseStyle, rewrite_identifiers};
use crate::errors::ParseError;
use crate::scan::{find_keyword, find_top_level, split_clauses, split_top_level};

/// Ordered `field -> value` assignments of an UPDATE statement.
pub type Assignments = IndexMap<String, String, hashbrown::DefaultHashBuilder>;

/// An `UPDATE table SET field = value, .. [WHERE condition]` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Update {
    /// Target table.
    pub table: TableRef,
    /// Assignments in source order, keyed by field name.
    pub assignments: Assignments,
    /// WHERE condition.
    pub where_clause: Option<String>,
}

impl Update {
    /// Parse the text following the UPDATE keyword.
    pub(super) fn parse(body: &str) -> Result<Self, ParseError> {
        Self::parse_parts(body).ok_or(ParseError::MalformedUpdate)
    }

    fn parse_parts(body: &str) -> Option<Self> {
        let set = find_keyword(body, "SET", 0)?;
        if find_keyword(body, "WHERE", 0).is_some_and(|span| span.start < set.start) {
            return None;
        }
        let clauses = split_clauses(body, &["SET", "WHERE"]);
        let table = TableRef::parse_target(clauses.head)?;

        let mut assignments = Assignments::default();
        for item in split_top_level(clauses.body(0)?, b',') {
            let eq = find_top_level(item, "=", 0)?;
            let field = item[..eq].trim();
            let value = item[eq + 1..].trim();
            if field.is_empty() || value.is_empty() || assignments.contains_key(field) {
                return None;
            }
            assignments.insert(field.into(), value.into());
        }

        Some(Self {
            table,
            assignments,
            where_clause: clauses.body(1).map(String::from),
        })
    }

    /// Convert assignment keys and the WHERE condition.
    ///
    /// Keys are left untouched when two of them would convert to the same
    /// name.
    pub(super) fn convert_identifiers(&mut self, style: CaseStyle) {
        let converted: Assignments = self
            .assignments
            .iter()
            .map(|(field, value)| (convert_field_name(field, style), value.clone()))
            .collect();
        if converted.len() == self.assignments.len() {
            self.assignments = converted;
        } else {
            tracing::warn!(
                table = %self.table.name,
                "assignment keys collide after conversion, keeping them unchanged"
            );
        }
        if let Some(condition) = &mut self.where_clause {
            *condition = rewrite_identifiers(condition, style);
        }
    }
}
