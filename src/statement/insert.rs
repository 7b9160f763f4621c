//! INSERT statements.

use alloc::string::String;
use alloc::vec::Vec;

use super::{TableRef, convert_field_name, split_items};
use crate::case::CaseStyle;
use crate::errors::ParseError;
use crate::scan::{strip_keyword, take_parenthesized};

/// An `INSERT INTO table (fields) VALUES (values)` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insert {
    /// Target table.
    pub table: TableRef,
    /// Column names, in order.
    pub fields: Vec<String>,
    /// Value expressions as written, one per column.
    pub values: Vec<String>,
}

impl Insert {
    /// Parse the text following the INSERT keyword.
    pub(super) fn parse(body: &str) -> Result<Self, ParseError> {
        Self::parse_parts(body).ok_or(ParseError::MalformedInsert)
    }

    fn parse_parts(body: &str) -> Option<Self> {
        let rest = strip_keyword(body.trim_start(), "INTO")?.trim_start();
        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '(')
            .unwrap_or(rest.len());
        let (name, rest) = rest.split_at(name_end);
        if name.is_empty() {
            return None;
        }

        let (fields, rest) = take_parenthesized(rest.trim_start())?;
        let rest = strip_keyword(rest.trim_start(), "VALUES")?;
        let (values, rest) = take_parenthesized(rest.trim_start())?;
        if !rest.trim().is_empty() {
            return None;
        }

        let fields = split_items(fields)?;
        let values = split_items(values)?;
        if fields.len() != values.len() {
            return None;
        }

        Some(Self {
            table: TableRef::new(name),
            fields,
            values,
        })
    }

    pub(super) fn convert_identifiers(&mut self, style: CaseStyle) {
        for field in &mut self.fields {
            *field = convert_field_name(field, style);
        }
    }
}
