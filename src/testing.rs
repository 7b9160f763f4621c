//! Testing utilities shared by integration tests and fuzz targets.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`assert_render_idempotent`]: rendering a parsed statement and parsing the
//!   result again yields the same statement
//! - [`FuzzQuery`]: structured generator of well-formed statements, with the
//!   schema they run against
//! - [`assert_structured_roundtrip`]: exact rendering, case round trip and
//!   SQLite acceptance of a [`FuzzQuery`]
//! - [`sqlite_accepts`]: prepare a statement against an in-memory SQLite schema
//! - [`run_crash_dir_regression`]: replay saved fuzz crash inputs

extern crate std;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write};

use arbitrary::{Arbitrary, Unstructured};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::{CaseStyle, FormatSql, Statement};

/// Assert that rendering `sql` is stable.
///
/// Inputs rejected by the parser are ignored. Degraded statements must render
/// to `sql` exactly; any other statement must render to text that parses back
/// into an equal statement.
///
/// # Panics
///
/// Panics with both renderings if the invariant does not hold.
pub fn assert_render_idempotent(sql: &str) {
    let Ok(statement) = Statement::parse(sql) else {
        return;
    };
    let rendered = statement.format_sql();
    if statement.is_degraded() {
        assert_eq!(rendered, sql, "degraded statement must keep its input");
        return;
    }
    let reparsed = Statement::parse(&rendered)
        .unwrap_or_else(|error| panic!("rendered SQL fails to parse ({error}):\n{rendered}"));
    assert_eq!(
        reparsed, statement,
        "render is not idempotent\ninput:    {sql}\nrendered: {rendered}"
    );
}

/// Prepare `sql` against a fresh in-memory database created from `schema`.
///
/// # Errors
///
/// Returns the SQLite error if the schema or the statement is rejected.
pub fn sqlite_accepts(schema: &str, sql: &str) -> Result<(), rusqlite::Error> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(schema)?;
    conn.prepare(sql)?;
    Ok(())
}

/// A lower-case `snake_case` identifier body.
///
/// Every underscore-separated segment starts with a letter, so camel case
/// conversion round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuzzIdent(pub String);

impl FuzzIdent {
    /// Column name built from this identifier.
    #[must_use]
    pub fn column(&self) -> String {
        format!("c_{}", self.0)
    }

    /// Table name built from this identifier.
    #[must_use]
    pub fn table(&self) -> String {
        format!("t_{}", self.0)
    }
}

impl<'a> Arbitrary<'a> for FuzzIdent {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        const HEAD: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
        const TAIL: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
        let mut ident = String::new();
        for i in 0..u.int_in_range(1..=3)? {
            if i > 0 {
                ident.push('_');
            }
            ident.push(char::from(*u.choose(HEAD)?));
            for _ in 0..u.int_in_range(0..=4)? {
                ident.push(char::from(*u.choose(TAIL)?));
            }
        }
        Ok(Self(ident))
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuzzValue {
    /// Integer literal.
    Integer(i64),
    /// String literal, rendered with doubled quotes.
    Text(String),
}

impl<'a> Arbitrary<'a> for FuzzValue {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        const TEXT: &[u8] = b"ab_ ,=()'%;";
        if u.arbitrary()? {
            return Ok(Self::Integer(u.arbitrary()?));
        }
        let mut text = String::new();
        for _ in 0..u.int_in_range(0..=8)? {
            text.push(char::from(*u.choose(TEXT)?));
        }
        Ok(Self::Text(text))
    }
}

impl fmt::Display for FuzzValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuzzValue::Integer(value) => write!(f, "{value}"),
            FuzzValue::Text(text) => write!(f, "'{}'", text.replace('\'', "''")),
        }
    }
}

/// A `column = value` condition.
pub type FuzzFilter = (FuzzIdent, FuzzValue);

/// A well-formed statement over a single table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuzzQuery {
    /// `SELECT columns FROM table [WHERE filter] [LIMIT n]`
    Select {
        /// Source table.
        table: FuzzIdent,
        /// Distinct projected columns.
        columns: Vec<FuzzIdent>,
        /// Optional condition.
        filter: Option<FuzzFilter>,
        /// Optional row limit.
        limit: Option<u8>,
    },
    /// `INSERT INTO table (columns) VALUES (values)`
    Insert {
        /// Target table.
        table: FuzzIdent,
        /// Distinct columns with their values.
        row: Vec<(FuzzIdent, FuzzValue)>,
    },
    /// `UPDATE table SET assignments [WHERE filter]`
    Update {
        /// Target table.
        table: FuzzIdent,
        /// Distinct columns with their new values.
        row: Vec<(FuzzIdent, FuzzValue)>,
        /// Optional condition.
        filter: Option<FuzzFilter>,
    },
    /// `DELETE FROM table [WHERE filter]`
    Delete {
        /// Target table.
        table: FuzzIdent,
        /// Optional condition.
        filter: Option<FuzzFilter>,
    },
}

/// Between one and four distinct identifiers.
fn distinct_idents(u: &mut Unstructured<'_>) -> arbitrary::Result<Vec<FuzzIdent>> {
    let mut idents: Vec<FuzzIdent> = Vec::new();
    for _ in 0..u.int_in_range(1..=4)? {
        let ident: FuzzIdent = u.arbitrary()?;
        if !idents.contains(&ident) {
            idents.push(ident);
        }
    }
    Ok(idents)
}

fn row(u: &mut Unstructured<'_>) -> arbitrary::Result<Vec<(FuzzIdent, FuzzValue)>> {
    let mut row = Vec::new();
    for column in distinct_idents(u)? {
        row.push((column, u.arbitrary()?));
    }
    Ok(row)
}

impl<'a> Arbitrary<'a> for FuzzQuery {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let table = u.arbitrary()?;
        Ok(match u.int_in_range(0..=3)? {
            0 => Self::Select {
                table,
                columns: distinct_idents(u)?,
                filter: u.arbitrary()?,
                limit: u.arbitrary()?,
            },
            1 => Self::Insert { table, row: row(u)? },
            2 => Self::Update {
                table,
                row: row(u)?,
                filter: u.arbitrary()?,
            },
            _ => Self::Delete {
                table,
                filter: u.arbitrary()?,
            },
        })
    }
}

impl FuzzQuery {
    fn table(&self) -> &FuzzIdent {
        match self {
            Self::Select { table, .. }
            | Self::Insert { table, .. }
            | Self::Update { table, .. }
            | Self::Delete { table, .. } => table,
        }
    }

    fn filter(&self) -> Option<&FuzzFilter> {
        match self {
            Self::Select { filter, .. } | Self::Update { filter, .. } | Self::Delete { filter, .. } => {
                filter.as_ref()
            }
            Self::Insert { .. } => None,
        }
    }

    /// Every column the statement mentions, without duplicates.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        let mentioned: Vec<&FuzzIdent> = match self {
            Self::Select { columns, .. } => columns.iter().collect(),
            Self::Insert { row, .. } | Self::Update { row, .. } => {
                row.iter().map(|(column, _)| column).collect()
            }
            Self::Delete { .. } => Vec::new(),
        };
        let mut columns: Vec<String> = Vec::new();
        for ident in mentioned.into_iter().chain(self.filter().map(|(column, _)| column)) {
            let column = ident.column();
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }

    /// `CREATE TABLE` statement for the table this query runs against.
    #[must_use]
    pub fn schema(&self) -> String {
        let mut columns = self.columns();
        if columns.is_empty() {
            columns.push(String::from("id"));
        }
        format!("CREATE TABLE {} ({});", self.table().table(), columns.join(", "))
    }

    /// The statement in the canonical form produced by [`FormatSql`].
    #[must_use]
    pub fn to_sql(&self) -> String {
        let table = self.table().table();
        let assignments = |row: &[(FuzzIdent, FuzzValue)]| {
            row.iter()
                .map(|(column, value)| format!("{} = {value}", column.column()))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut sql = match self {
            Self::Select { columns, .. } => {
                let columns: Vec<String> = columns.iter().map(FuzzIdent::column).collect();
                format!("SELECT {} FROM {table}", columns.join(", "))
            }
            Self::Insert { row, .. } => {
                let columns: Vec<String> = row.iter().map(|(column, _)| column.column()).collect();
                let values: Vec<String> = row.iter().map(|(_, value)| format!("{value}")).collect();
                format!(
                    "INSERT INTO {table} ({}) VALUES ({})",
                    columns.join(", "),
                    values.join(", ")
                )
            }
            Self::Update { row, .. } => format!("UPDATE {table} SET {}", assignments(row)),
            Self::Delete { .. } => format!("DELETE FROM {table}"),
        };
        if let Some((column, value)) = self.filter() {
            let _ = write!(sql, " WHERE {} = {value}", column.column());
        }
        if let Self::Select {
            limit: Some(limit), ..
        } = self
        {
            let _ = write!(sql, " LIMIT {limit}");
        }
        sql
    }
}

/// Check the structural invariants on a generated statement.
///
/// * it parses without degrading and renders back to the exact same text,
/// * converting to camel case and back to snake case restores it,
/// * SQLite accepts the rendering, alias injection included.
///
/// # Panics
///
/// Panics if any invariant is violated.
pub fn assert_structured_roundtrip(query: &FuzzQuery) {
    let sql = query.to_sql();
    let statement = Statement::parse(&sql)
        .unwrap_or_else(|error| panic!("generated SQL fails to parse ({error}):\n{sql}"));
    assert!(!statement.is_degraded(), "generated SQL degraded:\n{sql}");
    assert_eq!(statement.format_sql(), sql);

    let mut converted = statement.clone();
    converted.convert_identifiers(CaseStyle::Camel);
    converted.convert_identifiers(CaseStyle::Snake);
    assert_eq!(converted, statement, "camel/snake round trip changed:\n{sql}");

    let schema = query.schema();
    if let Err(error) = sqlite_accepts(&schema, &sql) {
        panic!("SQLite rejects rendered SQL ({error}):\n{schema}\n{sql}");
    }
    let mut aliased = statement;
    aliased.inject_select_aliases();
    let aliased_sql = aliased.format_sql();
    if let Err(error) = sqlite_accepts(&schema, &aliased_sql) {
        panic!("SQLite rejects aliased SQL ({error}):\n{schema}\n{aliased_sql}");
    }
}

/// Check raw fuzz bytes: valid UTF-8 input must render idempotently.
pub fn test_roundtrip(data: &[u8]) {
    if let Ok(sql) = core::str::from_utf8(data) {
        assert_render_idempotent(sql);
    }
}

/// Check `arbitrary`-encoded fuzz bytes as a [`FuzzQuery`].
///
/// Bytes that do not decode are skipped.
pub fn test_structured(data: &[u8]) {
    if let Ok(query) = Unstructured::new(data).arbitrary::<FuzzQuery>() {
        assert_structured_roundtrip(&query);
    }
}

/// Replay every file of `crash_dir` through `check`.
///
/// New `.fuzz` files found in the honggfuzz `workspace_dir` are copied into
/// `crash_dir` first, so crashes become regression inputs. Each replay must
/// finish within `limit`.
///
/// # Panics
///
/// Panics if a file cannot be read or copied, if `check` panics, or if a
/// replay exceeds `limit`.
pub fn run_crash_dir_regression(
    crash_dir: &str,
    workspace_dir: &str,
    limit: Duration,
    check: impl Fn(&[u8]),
) {
    let crash_dir = Path::new(crash_dir);
    if let Ok(entries) = fs::read_dir(workspace_dir) {
        fs::create_dir_all(crash_dir).expect("Failed to create crash input directory");
        for path in entries.flatten().map(|entry| entry.path()) {
            let Some(name) = path.file_name() else {
                continue;
            };
            let target = crash_dir.join(name);
            if path.extension().is_some_and(|ext| ext == "fuzz") && !target.exists() {
                fs::copy(&path, &target).expect("Failed to copy crash input");
            }
        }
    }

    let Ok(entries) = fs::read_dir(crash_dir) else {
        return;
    };
    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    for path in paths {
        let data = fs::read(&path).expect("Failed to read crash input");
        let started = Instant::now();
        check(&data);
        let elapsed = started.elapsed();
        assert!(
            elapsed <= limit,
            "{} took {elapsed:?}, limit is {limit:?}",
            path.display()
        );
    }
}
