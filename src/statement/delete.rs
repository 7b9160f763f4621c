//! DELETE statements.

use alloc::string::String;

use super::TableRef;
use crate::case::{CaseStyle, rewrite_identifiers};
use crate::errors::ParseError;
use crate::scan::{split_clauses, strip_keyword};

/// A `DELETE FROM table [WHERE condition]` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delete {
    /// Target table.
    pub table: TableRef,
    /// WHERE condition.
    pub where_clause: Option<String>,
}

impl Delete {
    /// Parse the text following the DELETE keyword.
    pub(super) fn parse(body: &str) -> Result<Self, ParseError> {
        let rest = strip_keyword(body.trim_start(), "FROM").ok_or(ParseError::MalformedDelete)?;
        let clauses = split_clauses(rest, &["WHERE"]);
        let table = TableRef::parse_target(clauses.head).ok_or(ParseError::MalformedDelete)?;
        Ok(Self {
            table,
            where_clause: clauses.body(0).map(String::from),
        })
    }

    pub(super) fn convert_identifiers(&mut self, style: CaseStyle) {
        if let Some(condition) = &mut self.where_clause {
            *condition = rewrite_identifiers(condition, style);
        }
    }
}
