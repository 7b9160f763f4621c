//! SQL output formatting.

use alloc::string::{String, ToString};
use core::fmt::{self, Display};

use crate::statement::{
    Degraded, Delete, FieldRef, Insert, JoinConstraint, Select, Statement, TableRef, Update,
};

/// Trait for types that can be formatted as SQL statements.
pub trait FormatSql {
    /// Format this value as a SQL string.
    fn format_sql(&self) -> String;
}

/// Write `items` separated by `", "`.
fn write_list<T: Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

/// Renders `name[ alias]`. The join operator and constraint belong to the
/// enclosing SELECT.
impl Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(alias) = &self.alias {
            write!(f, " {alias}")?;
        }
        Ok(())
    }
}

impl Display for JoinConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinConstraint::On(condition) => write!(f, "ON {condition}"),
            JoinConstraint::Using(columns) => write!(f, "USING {columns}"),
        }
    }
}

impl Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        write_list(f, &self.fields)?;

        f.write_str(" FROM ")?;
        for (i, table) in self.tables.iter().enumerate() {
            match &table.join {
                Some(join) => write!(f, " {} ", join.operator)?,
                None if i > 0 => f.write_str(", ")?,
                None => {}
            }
            write!(f, "{table}")?;
            let constraint = table.join.as_ref().and_then(|join| join.constraint.as_ref());
            if let Some(constraint) = constraint {
                write!(f, " {constraint}")?;
            }
        }

        for (keyword, body) in self.clauses() {
            if let Some(body) = body {
                write!(f, " {keyword} {body}")?;
            }
        }
        Ok(())
    }
}

impl Display for Insert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {} (", self.table)?;
        write_list(f, &self.fields)?;
        f.write_str(") VALUES (")?;
        write_list(f, &self.values)?;
        f.write_str(")")
    }
}

impl Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UPDATE {} SET ", self.table)?;
        for (i, (field, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field} = {value}")?;
        }
        if let Some(condition) = &self.where_clause {
            write!(f, " WHERE {condition}")?;
        }
        Ok(())
    }
}

impl Display for Delete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.table)?;
        if let Some(condition) = &self.where_clause {
            write!(f, " WHERE {condition}")?;
        }
        Ok(())
    }
}

/// Renders the original input verbatim.
impl Display for Degraded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Select(select) => Display::fmt(select, f),
            Statement::Insert(insert) => Display::fmt(insert, f),
            Statement::Update(update) => Display::fmt(update, f),
            Statement::Delete(delete) => Display::fmt(delete, f),
            Statement::Degraded(degraded) => Display::fmt(degraded, f),
        }
    }
}

impl FormatSql for Statement {
    fn format_sql(&self) -> String {
        self.to_string()
    }
}

impl FormatSql for Select {
    fn format_sql(&self) -> String {
        self.to_string()
    }
}

impl FormatSql for Insert {
    fn format_sql(&self) -> String {
        self.to_string()
    }
}

impl FormatSql for Update {
    fn format_sql(&self) -> String {
        self.to_string()
    }
}

impl FormatSql for Delete {
    fn format_sql(&self) -> String {
        self.to_string()
    }
}
