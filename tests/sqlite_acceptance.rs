//! Rendered SQL must still be valid SQLite.
//!
//! Every statement is parsed, edited and rendered, then prepared against an
//! in-memory schema with rusqlite.

use rusqlite::Connection;
use sql_reshape::{CaseStyle, FormatSql, Statement, TableRenames};

const SNAKE_SCHEMA: &str = "
    CREATE TABLE t_user (user_id INTEGER PRIMARY KEY, user_name TEXT, update_time TEXT);
    CREATE TABLE t_order (order_id INTEGER PRIMARY KEY, user_id INTEGER, total REAL);
";

const CAMEL_SCHEMA: &str = "
    CREATE TABLE user_info (userId INTEGER PRIMARY KEY, userName TEXT, updateTime TEXT);
    CREATE TABLE orders (orderId INTEGER PRIMARY KEY, userId INTEGER, total REAL);
";

fn prepare(schema: &str, sql: &str) {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(schema).unwrap();
    if let Err(error) = conn.prepare(sql) {
        panic!("SQLite rejected {sql:?}: {error}");
    }
}

const STATEMENTS: &[&str] = &[
    "SELECT user_id, user_name FROM user_info WHERE user_id = 1",
    "SELECT DISTINCT u.user_name, COUNT(o.order_id) AS order_count FROM user_info u LEFT JOIN orders o ON u.user_id = o.user_id GROUP BY u.user_name HAVING COUNT(o.order_id) > 1 ORDER BY u.user_name LIMIT 10",
    "SELECT * FROM user_info WHERE user_name = 'it''s, FROM' ORDER BY update_time DESC",
    "INSERT INTO user_info (user_id, user_name, update_time) VALUES (1, 'Jane', datetime('now'))",
    "UPDATE user_info SET user_name = 'Jane', update_time = '2024-01-02' WHERE user_id = 1",
    "DELETE FROM orders WHERE total < 0 AND user_id IN (1, 2)",
    "SELECT CAST(user_id AS TEXT) uid, user_name FROM user_info WHERE update_time < CURRENT_TIMESTAMP AND user_name GLOB 'a*' ORDER BY user_name COLLATE NOCASE",
];

#[test]
fn test_renamed_statements_are_accepted() {
    let renames: TableRenames = [("user_info", "t_user"), ("orders", "t_order")]
        .into_iter()
        .collect();
    for sql in STATEMENTS {
        let statement = Statement::parse_with(sql, &renames).unwrap();
        assert!(!statement.is_degraded(), "{sql}");
        prepare(SNAKE_SCHEMA, &statement.format_sql());
    }
}

#[test]
fn test_camel_statements_are_accepted() {
    for sql in STATEMENTS {
        let mut statement = Statement::parse(sql).unwrap();
        statement.convert_identifiers(CaseStyle::Camel);
        prepare(CAMEL_SCHEMA, &statement.format_sql());
    }
}

#[test]
fn test_snake_statements_are_accepted() {
    let renames: TableRenames = [("user_info", "t_user"), ("orders", "t_order")]
        .into_iter()
        .collect();
    for sql in STATEMENTS {
        let mut statement = Statement::parse_with(sql, &renames).unwrap();
        statement.convert_identifiers(CaseStyle::Camel);
        statement.convert_identifiers(CaseStyle::Snake);
        prepare(SNAKE_SCHEMA, &statement.format_sql());
    }

    let mut statement = Statement::parse(
        "SELECT CAST(userId AS INTEGER) AS id, userName FROM t_user WHERE userName GLOB 'a*' AND updateTime <= CURRENT_DATE ORDER BY userName COLLATE NOCASE",
    )
    .unwrap();
    statement.convert_identifiers(CaseStyle::Snake);
    let sql = statement.format_sql();
    assert_eq!(
        sql,
        "SELECT CAST(user_id AS INTEGER) AS id, user_name FROM t_user WHERE user_name GLOB 'a*' AND update_time <= CURRENT_DATE ORDER BY user_name COLLATE NOCASE"
    );
    prepare(SNAKE_SCHEMA, &sql);
}

#[test]
fn test_aliased_select_is_accepted() {
    let mut statement = Statement::parse("SELECT user_id, t_user.user_name, * FROM t_user").unwrap();
    statement.inject_select_aliases();
    let sql = statement.format_sql();
    assert_eq!(
        sql,
        "SELECT user_id AS userId, t_user.user_name AS userName, * FROM t_user"
    );
    prepare(SNAKE_SCHEMA, &sql);
}
