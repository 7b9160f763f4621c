//! Submodule defining the errors used across the crate.

use alloc::string::String;

/// Errors that can occur while parsing a SQL statement.
///
/// `UnsupportedStatementKind`, `EmptyStatement`, `MissingFrom`, `EmptyFieldList`,
/// `EmptyTableList` and `MalformedTableList` are fatal: no statement is produced.
/// The `Malformed*` statement errors are not fatal and end up as the reason of a
/// [`Degraded`](crate::Degraded) statement, see [`ParseError::is_degradable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseError {
    /// The input is empty or only whitespace.
    #[error("Empty SQL statement")]
    EmptyStatement,
    /// The leading keyword is none of SELECT, INSERT, UPDATE or DELETE.
    #[error("Unsupported statement kind: '{0}'")]
    UnsupportedStatementKind(String),
    /// A SELECT statement has no top-level FROM keyword.
    #[error("Invalid SELECT statement: missing FROM")]
    MissingFrom,
    /// A SELECT statement has an empty projection, or an empty item in it.
    #[error("Invalid SELECT statement: empty field list")]
    EmptyFieldList,
    /// A SELECT statement has nothing between FROM and the next clause.
    #[error("Invalid SELECT statement: empty table list")]
    EmptyTableList,
    /// A table expression in the FROM clause could not be decomposed.
    #[error("Unsupported table expression in FROM clause: '{0}'")]
    MalformedTableList(String),
    /// The INSERT body does not match `INSERT INTO t (..) VALUES (..)`.
    #[error("Unable to parse INSERT statement")]
    MalformedInsert,
    /// The UPDATE body does not match `UPDATE t SET a = b, .. [WHERE ..]`.
    #[error("Unable to parse UPDATE statement")]
    MalformedUpdate,
    /// The DELETE body does not match `DELETE FROM t [WHERE ..]`.
    #[error("Unable to parse DELETE statement")]
    MalformedDelete,
}

impl ParseError {
    /// Returns whether this error yields a degraded statement instead of
    /// failing the parse.
    #[must_use]
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            Self::MalformedInsert | Self::MalformedUpdate | Self::MalformedDelete
        )
    }
}
