//! Clause-level model of a single SQL statement.
//!
//! Parsing goes text to [`Statement`], rendering goes back through
//! [`FormatSql`](crate::FormatSql) or `Display`. In between, the structural
//! edits of this crate mutate the model in place.

mod delete;
mod insert;
mod select;
mod update;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

pub use delete::Delete;
pub use insert::Insert;
pub use select::{FieldRef, Join, JoinConstraint, Select};
pub use update::{Assignments, Update};

use crate::case::{CaseStyle, convert_identifier, is_plain_identifier};
use crate::errors::ParseError;
use crate::renames::TableRenames;
use crate::scan::{split_top_level, split_words, strip_keyword};

/// Kind of a SQL statement, taken from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatementKind {
    /// `SELECT ...`
    Select,
    /// `INSERT INTO ...`
    Insert,
    /// `UPDATE ...`
    Update,
    /// `DELETE FROM ...`
    Delete,
}

impl StatementKind {
    const ALL: [StatementKind; 4] = [
        StatementKind::Select,
        StatementKind::Insert,
        StatementKind::Update,
        StatementKind::Delete,
    ];

    /// The leading keyword of statements of this kind.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }

    /// Detect the kind of `sql` and return it with the text after the
    /// leading keyword.
    fn detect(sql: &str) -> Result<(Self, &str), ParseError> {
        Self::ALL
            .into_iter()
            .find_map(|kind| strip_keyword(sql, kind.keyword()).map(|rest| (kind, rest)))
            .ok_or_else(|| {
                let word = sql.split_whitespace().next().unwrap_or_default();
                ParseError::UnsupportedStatementKind(word.to_string())
            })
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A table reference: a name with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRef {
    /// Table name as written, qualifiers included (`db.users`).
    pub name: String,
    /// Alias, without the optional `AS`.
    pub alias: Option<String>,
    /// How this table joins the previous one in a SELECT. `None` for the
    /// first table and for comma-separated tables.
    pub join: Option<Join>,
}

impl TableRef {
    /// Create a table reference without alias.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            join: None,
        }
    }

    /// Set the alias of this table reference.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Parse the single target table of an UPDATE or DELETE:
    /// `name`, `name alias` or `name AS alias`.
    fn parse_target(text: &str) -> Option<Self> {
        match split_words(text).as_slice() {
            [name] => Some(Self::new(*name)),
            [name, alias] if !alias.eq_ignore_ascii_case("AS") => {
                Some(Self::new(*name).with_alias(*alias))
            }
            [name, as_keyword, alias] if as_keyword.eq_ignore_ascii_case("AS") => {
                Some(Self::new(*name).with_alias(*alias))
            }
            _ => None,
        }
    }

    /// Returns whether this reference names `table`, ignoring case.
    #[must_use]
    pub fn is_named(&self, table: &str) -> bool {
        self.name.to_lowercase() == table.to_lowercase()
    }
}

/// A statement whose structure could not be parsed.
///
/// It keeps the original input so that rendering reproduces it verbatim,
/// and ignores every structural edit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Degraded {
    /// The kind announced by the leading keyword.
    pub kind: StatementKind,
    /// The input text, exactly as given to the parser.
    pub original: String,
    /// Why the structure could not be parsed.
    pub reason: ParseError,
}

/// A parsed SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    /// SELECT statement.
    Select(Select),
    /// INSERT statement.
    Insert(Insert),
    /// UPDATE statement.
    Update(Update),
    /// DELETE statement.
    Delete(Delete),
    /// INSERT, UPDATE or DELETE statement that failed structural parsing.
    Degraded(Degraded),
}

impl Statement {
    /// Parse a single SQL statement.
    ///
    /// Leading and trailing whitespace and one trailing `;` are ignored.
    /// An INSERT, UPDATE or DELETE that does not match its expected shape is
    /// returned as [`Statement::Degraded`] rather than as an error.
    ///
    /// # Errors
    ///
    /// * [`ParseError::EmptyStatement`] if `sql` is blank.
    /// * [`ParseError::UnsupportedStatementKind`] if `sql` does not start
    ///   with SELECT, INSERT, UPDATE or DELETE.
    /// * [`ParseError::MissingFrom`], [`ParseError::EmptyFieldList`],
    ///   [`ParseError::EmptyTableList`] or [`ParseError::MalformedTableList`]
    ///   for SELECT statements that cannot be decomposed.
    pub fn parse(sql: &str) -> Result<Self, ParseError> {
        let body = sql.trim();
        let body = body.strip_suffix(';').map_or(body, str::trim_end);
        if body.is_empty() {
            return Err(ParseError::EmptyStatement);
        }

        let (kind, rest) = StatementKind::detect(body)?;
        let parsed = match kind {
            StatementKind::Select => Select::parse(rest).map(Statement::Select),
            StatementKind::Insert => Insert::parse(rest).map(Statement::Insert),
            StatementKind::Update => Update::parse(rest).map(Statement::Update),
            StatementKind::Delete => Delete::parse(rest).map(Statement::Delete),
        };

        match parsed {
            Err(reason) if reason.is_degradable() => {
                tracing::debug!(%kind, %reason, "keeping original text of unparsable statement");
                Ok(Statement::Degraded(Degraded {
                    kind,
                    original: sql.to_string(),
                    reason,
                }))
            }
            other => other,
        }
    }

    /// Parse a statement and apply every rename registered in `renames`.
    ///
    /// # Errors
    ///
    /// Same as [`Statement::parse`].
    pub fn parse_with(sql: &str, renames: &TableRenames) -> Result<Self, ParseError> {
        let mut statement = Self::parse(sql)?;
        statement.apply_renames(renames);
        Ok(statement)
    }

    /// The kind of this statement.
    #[must_use]
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Select(_) => StatementKind::Select,
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Update(_) => StatementKind::Update,
            Statement::Delete(_) => StatementKind::Delete,
            Statement::Degraded(degraded) => degraded.kind,
        }
    }

    /// Returns `true` if structural parsing failed and only the original text
    /// is kept.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Statement::Degraded(_))
    }

    /// The reason structural parsing failed, for degraded statements.
    #[must_use]
    pub fn degraded_reason(&self) -> Option<&ParseError> {
        match self {
            Statement::Degraded(degraded) => Some(&degraded.reason),
            _ => None,
        }
    }

    /// Tables referenced by this statement, in order. Empty when degraded.
    #[must_use]
    pub fn tables(&self) -> &[TableRef] {
        match self {
            Statement::Select(select) => &select.tables,
            Statement::Insert(insert) => core::slice::from_ref(&insert.table),
            Statement::Update(update) => core::slice::from_ref(&update.table),
            Statement::Delete(delete) => core::slice::from_ref(&delete.table),
            Statement::Degraded(_) => &[],
        }
    }

    fn tables_mut(&mut self) -> &mut [TableRef] {
        match self {
            Statement::Select(select) => &mut select.tables,
            Statement::Insert(insert) => core::slice::from_mut(&mut insert.table),
            Statement::Update(update) => core::slice::from_mut(&mut update.table),
            Statement::Delete(delete) => core::slice::from_mut(&mut delete.table),
            Statement::Degraded(_) => &mut [],
        }
    }

    /// The raw WHERE condition, if the statement has one.
    #[must_use]
    pub fn where_clause(&self) -> Option<&str> {
        match self {
            Statement::Select(select) => select.where_clause.as_deref(),
            Statement::Update(update) => update.where_clause.as_deref(),
            Statement::Delete(delete) => delete.where_clause.as_deref(),
            Statement::Insert(_) | Statement::Degraded(_) => None,
        }
    }

    /// Replace the WHERE condition with opaque text, for instance one
    /// produced by an external condition compiler. `None` removes it.
    ///
    /// Returns `false`, leaving the statement untouched, for INSERT and
    /// degraded statements.
    pub fn set_where(&mut self, condition: Option<String>) -> bool {
        let condition = condition.filter(|text| !text.trim().is_empty());
        let slot = match self {
            Statement::Select(select) => &mut select.where_clause,
            Statement::Update(update) => &mut update.where_clause,
            Statement::Delete(delete) => &mut delete.where_clause,
            Statement::Insert(_) | Statement::Degraded(_) => return false,
        };
        *slot = condition;
        true
    }

    /// Convert field identifiers to `style`.
    ///
    /// Only a field's own segment (after the last `.`) changes: qualifiers,
    /// aliases, values and quoted literals are kept. For SELECT, UPDATE and
    /// DELETE the free-form condition clauses are rewritten lexically with
    /// [`rewrite_identifiers`](crate::case::rewrite_identifiers).
    pub fn convert_identifiers(&mut self, style: CaseStyle) {
        match self {
            Statement::Select(select) => select.convert_identifiers(style),
            Statement::Insert(insert) => insert.convert_identifiers(style),
            Statement::Update(update) => update.convert_identifiers(style),
            Statement::Delete(delete) => delete.convert_identifiers(style),
            Statement::Degraded(degraded) => {
                tracing::debug!(kind = %degraded.kind, "skipping identifier conversion of degraded statement");
            }
        }
    }

    /// Rename every table named `old` (ignoring case) to `new`.
    ///
    /// Aliases are kept. Returns whether any table was renamed.
    pub fn rename_table(&mut self, old: &str, new: &str) -> bool {
        let mut renamed = false;
        for table in self.tables_mut() {
            if table.is_named(old) {
                tracing::debug!(from = %table.name, to = new, "renaming table");
                table.name = new.to_string();
                renamed = true;
            }
        }
        renamed
    }

    /// Apply every rename of `renames` to the tables of this statement.
    ///
    /// Each table is looked up once, so renames do not chain.
    /// Returns whether any table was renamed.
    pub fn apply_renames(&mut self, renames: &TableRenames) -> bool {
        if renames.is_empty() {
            return false;
        }
        let mut renamed = false;
        for table in self.tables_mut() {
            if let Some(new) = renames.get(&table.name) {
                tracing::debug!(from = %table.name, to = new, "renaming table");
                table.name = new.to_string();
                renamed = true;
            }
        }
        renamed
    }

    /// Append a camelCase alias to every SELECT field that is a plain column
    /// without alias, when the alias differs from the column name.
    ///
    /// Does nothing for other statement kinds.
    pub fn inject_select_aliases(&mut self) {
        if let Statement::Select(select) = self {
            select.inject_aliases();
        }
    }
}

impl FromStr for Statement {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split a parenthesized list on top-level commas, rejecting empty items.
fn split_items(list: &str) -> Option<Vec<String>> {
    let items = split_top_level(list, b',');
    if items.is_empty() || items.iter().any(|item| item.is_empty()) {
        return None;
    }
    Some(items.into_iter().map(String::from).collect())
}

/// Convert a bare field name, leaving quoted or computed names alone.
fn convert_field_name(field: &str, style: CaseStyle) -> String {
    if is_plain_identifier(field) {
        convert_identifier(field, style)
    } else {
        field.to_string()
    }
}
