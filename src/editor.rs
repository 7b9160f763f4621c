//! Stateful editing session over one statement at a time.

use alloc::string::String;

use crate::case::CaseStyle;
use crate::errors::ParseError;
use crate::format::FormatSql;
use crate::renames::TableRenames;
use crate::statement::Statement;

/// Holds the current statement and the table renames registered so far.
///
/// Every statement loaded into the editor gets all accumulated renames
/// applied, so a rename registered once keeps applying to later statements.
///
/// ```
/// use sql_reshape::{CaseStyle, Editor};
///
/// let mut editor = Editor::new();
/// editor.add_table_rename("user_info", "t_user");
/// editor.load("SELECT user_id FROM user_info")?;
/// editor.convert_identifiers(CaseStyle::Camel);
/// assert_eq!(editor.to_sql(), "SELECT userId FROM t_user");
/// # Ok::<(), sql_reshape::ParseError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Editor {
    renames: TableRenames,
    current: Option<Statement>,
}

impl Editor {
    /// Create an editor with no statement and no renames.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor starting from an existing rename map.
    #[must_use]
    pub fn with_renames(renames: TableRenames) -> Self {
        Self {
            renames,
            current: None,
        }
    }

    /// Parse `sql` into the current statement, applying registered renames.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] of [`Statement::parse`]. The previous
    /// statement is dropped in that case.
    pub fn load(&mut self, sql: &str) -> Result<&Statement, ParseError> {
        self.current = None;
        let statement = Statement::parse_with(sql, &self.renames)?;
        Ok(self.current.insert(statement))
    }

    /// The current statement, if one is loaded.
    #[must_use]
    pub fn statement(&self) -> Option<&Statement> {
        self.current.as_ref()
    }

    /// Mutable access to the current statement, for edits such as
    /// [`Statement::set_where`].
    pub fn statement_mut(&mut self) -> Option<&mut Statement> {
        self.current.as_mut()
    }

    /// Remove the current statement from the editor and return it.
    pub fn take_statement(&mut self) -> Option<Statement> {
        self.current.take()
    }

    /// The registered renames.
    #[must_use]
    pub fn renames(&self) -> &TableRenames {
        &self.renames
    }

    /// Render the current statement, or an empty string when none is loaded.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.current
            .as_ref()
            .map(FormatSql::format_sql)
            .unwrap_or_default()
    }

    /// Convert the field identifiers of the current statement.
    pub fn convert_identifiers(&mut self, style: CaseStyle) -> &mut Self {
        if let Some(statement) = &mut self.current {
            statement.convert_identifiers(style);
        }
        self
    }

    /// Add camelCase aliases to the fields of the current SELECT.
    pub fn inject_select_aliases(&mut self) -> &mut Self {
        if let Some(statement) = &mut self.current {
            statement.inject_select_aliases();
        }
        self
    }

    /// Register a table rename and apply the whole rename map to the current
    /// statement.
    pub fn add_table_rename(&mut self, old: &str, new: impl Into<String>) -> &mut Self {
        self.renames.insert(old, new);
        if let Some(statement) = &mut self.current {
            statement.apply_renames(&self.renames);
        }
        self
    }
}
