//! Integration tests for SELECT parsing, conversion and rendering.

use sql_reshape::{
    CaseStyle, FieldRef, FormatSql, ParseError, Statement, StatementKind, TableRef,
};

fn parse(sql: &str) -> Statement {
    Statement::parse(sql).expect("Failed to parse SQL")
}

fn select_fields(statement: &Statement) -> Vec<FieldRef> {
    match statement {
        Statement::Select(select) => select.fields.clone(),
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

// =============================================================================
// Identifier conversion
// =============================================================================

#[test]
fn test_select_to_camel() {
    let mut statement = parse("SELECT user_id, user_name FROM user_info WHERE user_id = 1");
    statement.convert_identifiers(CaseStyle::Camel);
    assert_eq!(
        statement.format_sql(),
        "SELECT userId, userName FROM user_info WHERE userId = 1"
    );
}

#[test]
fn test_select_to_snake() {
    let mut statement =
        parse("SELECT u.userId AS userId, COUNT(orderId) FROM users u GROUP BY u.userId");
    statement.convert_identifiers(CaseStyle::Snake);
    assert_eq!(
        statement.format_sql(),
        "SELECT u.user_id AS userId, COUNT(order_id) FROM users u GROUP BY u.user_id"
    );
}

#[test]
fn test_conversion_leaves_literals_and_qualifiers() {
    let mut statement = parse(
        "SELECT my_table.first_name FROM my_table WHERE my_table.last_name = 'van_dyke' AND age > 18",
    );
    statement.convert_identifiers(CaseStyle::Camel);
    assert_eq!(
        statement.format_sql(),
        "SELECT my_table.firstName FROM my_table WHERE my_table.lastName = 'van_dyke' AND age > 18"
    );
}

#[test]
fn test_camel_then_snake_restores_lower_snake_case() {
    let sql = "SELECT a.order_id, b.item_count FROM orders a, items b WHERE a.order_id = b.order_id ORDER BY a.created_at DESC";
    let original = parse(sql);
    let mut statement = original.clone();
    statement.convert_identifiers(CaseStyle::Camel);
    assert_ne!(statement, original);
    statement.convert_identifiers(CaseStyle::Snake);
    assert_eq!(statement, original);
    assert_eq!(statement.format_sql(), sql);
}

// =============================================================================
// Keyword detection
// =============================================================================

#[test]
fn test_keywords_inside_identifiers_and_literals() {
    let statement = parse(
        "SELECT from_date, 'a FROM b' AS note FROM events WHERE label = 'ORDER BY x' ORDER BY from_date",
    );
    let Statement::Select(select) = &statement else {
        panic!("Expected SELECT");
    };
    assert_eq!(
        select.fields,
        vec![
            FieldRef::new("from_date"),
            FieldRef::new("'a FROM b'").with_alias("note"),
        ]
    );
    assert_eq!(select.tables, vec![TableRef::new("events")]);
    assert_eq!(select.where_clause.as_deref(), Some("label = 'ORDER BY x'"));
    assert_eq!(select.order_by.as_deref(), Some("from_date"));
}

#[test]
fn test_subquery_in_where_is_opaque() {
    let sql = "SELECT id FROM users WHERE id IN (SELECT user_id FROM orders WHERE total > 10) ORDER BY id";
    let statement = parse(sql);
    assert_eq!(
        statement.where_clause(),
        Some("id IN (SELECT user_id FROM orders WHERE total > 10)")
    );
    assert_eq!(statement.tables(), &[TableRef::new("users")]);
    assert_eq!(statement.format_sql(), sql);
}

#[test]
fn test_multiline_and_lowercase() {
    let statement = parse("select distinct\n  a,\n  b\nfrom t\nwhere a = 1\ngroup  by b;");
    assert_eq!(
        statement.format_sql(),
        "SELECT DISTINCT a, b FROM t WHERE a = 1 GROUP BY b"
    );
}

#[test]
fn test_select_errors() {
    assert_eq!(Statement::parse("SELECT 1"), Err(ParseError::MissingFrom));
    assert_eq!(
        Statement::parse("SELECT 'FROM' "),
        Err(ParseError::MissingFrom)
    );
    assert_eq!(
        Statement::parse("SELECT FROM users"),
        Err(ParseError::EmptyFieldList)
    );
    assert_eq!(Statement::parse(""), Err(ParseError::EmptyStatement));
    assert_eq!(
        Statement::parse("WITH x AS (SELECT 1) SELECT * FROM x"),
        Err(ParseError::UnsupportedStatementKind("WITH".into()))
    );
}

// =============================================================================
// Alias injection
// =============================================================================

#[test]
fn test_inject_aliases_on_plain_fields() {
    let mut statement = parse("SELECT user_id, user_name FROM user_info");
    statement.inject_select_aliases();
    assert_eq!(
        select_fields(&statement),
        vec![
            FieldRef::new("user_id").with_alias("userId"),
            FieldRef::new("user_name").with_alias("userName"),
        ]
    );
    assert_eq!(
        statement.format_sql(),
        "SELECT user_id AS userId, user_name AS userName FROM user_info"
    );
}

#[test]
fn test_inject_aliases_keeps_existing_alias() {
    let mut statement = parse("SELECT user_id AS id FROM user_info");
    statement.inject_select_aliases();
    assert_eq!(
        select_fields(&statement),
        vec![FieldRef::new("user_id").with_alias("id")]
    );
}

#[test]
fn test_inject_aliases_skips_star() {
    let mut statement = parse("SELECT * FROM user_info");
    statement.inject_select_aliases();
    assert_eq!(statement.format_sql(), "SELECT * FROM user_info");
}

#[test]
fn test_inject_aliases_is_select_only() {
    let sql = "UPDATE user_info SET user_name = 'x'";
    let mut statement = parse(sql);
    statement.inject_select_aliases();
    assert_eq!(statement.kind(), StatementKind::Update);
    assert_eq!(statement.format_sql(), sql);
}

// =============================================================================
// Renames
// =============================================================================

#[test]
fn test_rename_in_joins_keeps_aliases() {
    let mut statement = parse(
        "SELECT u.id, o.id FROM user_info u INNER JOIN orders o ON u.id = o.user_id WHERE u.id > 0",
    );
    assert!(statement.rename_table("user_info", "t_user"));
    assert!(statement.rename_table("ORDERS", "t_order"));
    assert_eq!(
        statement.format_sql(),
        "SELECT u.id, o.id FROM t_user u INNER JOIN t_order o ON u.id = o.user_id WHERE u.id > 0"
    );
}
