//! Integration tests for the stateful [`Editor`].

use sql_reshape::{CaseStyle, Editor, ParseError, Statement, TableRenames};
use tracing_subscriber::EnvFilter;

/// Route `tracing` events to the test output, filtered by `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_full_editing_session() {
    init_tracing();
    let mut editor = Editor::new();

    editor
        .load("UPDATE user_info SET user_name = 'Jane', update_time = '2024-01-02' WHERE user_id = 1")
        .expect("Failed to parse SQL");
    editor.add_table_rename("user_info", "t_user");
    assert_eq!(
        editor.to_sql(),
        "UPDATE t_user SET user_name = 'Jane', update_time = '2024-01-02' WHERE user_id = 1"
    );

    editor
        .load("SELECT user_id, user_name FROM user_info WHERE user_id = 1")
        .expect("Failed to parse SQL");
    editor.convert_identifiers(CaseStyle::Camel);
    assert_eq!(
        editor.to_sql(),
        "SELECT userId, userName FROM t_user WHERE userId = 1"
    );
}

#[test]
fn test_alias_injection_before_conversion() {
    init_tracing();
    let mut editor = Editor::new();
    editor
        .load("SELECT u.user_id, u.user_name AS name FROM user_info u")
        .expect("Failed to parse SQL");
    editor.inject_select_aliases();
    assert_eq!(
        editor.to_sql(),
        "SELECT u.user_id AS userId, u.user_name AS name FROM user_info u"
    );
}

#[test]
fn test_renames_accumulate_and_overwrite() {
    init_tracing();
    let mut editor = Editor::with_renames([("orders", "t_order")].into_iter().collect());
    editor.add_table_rename("users", "t_user");
    editor.add_table_rename("USERS", "t_member");
    assert_eq!(editor.renames().len(), 2);

    editor
        .load("SELECT * FROM users, orders")
        .expect("Failed to parse SQL");
    assert_eq!(editor.to_sql(), "SELECT * FROM t_member, t_order");
}

#[test]
fn test_degraded_statement_in_editor() {
    init_tracing();
    let sql = "UPDATE user_info user_name = 'x'";
    let mut editor = Editor::with_renames(TableRenames::new());
    editor.load(sql).expect("Degraded statements still load");
    editor
        .convert_identifiers(CaseStyle::Camel)
        .add_table_rename("user_info", "t_user");
    assert_eq!(editor.to_sql(), sql);
    assert_eq!(
        editor.statement().and_then(Statement::degraded_reason),
        Some(&ParseError::MalformedUpdate)
    );
}

#[test]
fn test_unsupported_statement() {
    let mut editor = Editor::new();
    assert_eq!(
        editor.load("DROP TABLE users").err(),
        Some(ParseError::UnsupportedStatementKind("DROP".into()))
    );
    assert_eq!(editor.to_sql(), "");
}
