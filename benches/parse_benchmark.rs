//! Benchmark for statement parsing, editing and rendering.
//!
//! Measures the performance of:
//! 1. Parsing each statement kind
//! 2. Identifier conversion and rendering of a parsed statement
//! 3. Parsing throughput as the projection grows wider

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sql_reshape::{CaseStyle, FormatSql, Statement, TableRenames};
use std::fmt::Write;
use std::hint::black_box;

const SELECT_JOIN: &str = "SELECT DISTINCT u.user_id, u.user_name, COUNT(o.order_id) AS order_count \
    FROM user_info u LEFT JOIN orders o ON u.user_id = o.user_id \
    WHERE u.user_name <> 'FROM, WHERE' AND o.total > 10 \
    GROUP BY u.user_id, u.user_name HAVING COUNT(o.order_id) > 1 ORDER BY order_count DESC LIMIT 20";
const INSERT: &str =
    "INSERT INTO user_info (user_id, user_name, update_time) VALUES (1, 'Jane', datetime('now'))";
const UPDATE: &str =
    "UPDATE user_info SET user_name = 'Jane', update_time = '2024-01-02' WHERE user_id = 1";
const DELETE: &str = "DELETE FROM user_info WHERE user_id IN (1, 2, 3) AND user_name IS NULL";

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, sql) in [
        ("select_join", SELECT_JOIN),
        ("insert", INSERT),
        ("update", UPDATE),
        ("delete", DELETE),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(Statement::parse(black_box(sql)).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_edit_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_and_render");
    let renames: TableRenames = [("user_info", "t_user"), ("orders", "t_order")]
        .into_iter()
        .collect();
    let statement = Statement::parse(SELECT_JOIN).unwrap();

    group.bench_function("to_camel", |b| {
        b.iter(|| {
            let mut statement = statement.clone();
            statement.convert_identifiers(CaseStyle::Camel);
            black_box(statement.format_sql())
        });
    });

    group.bench_function("parse_with_renames", |b| {
        b.iter(|| {
            let statement = Statement::parse_with(black_box(SELECT_JOIN), &renames).unwrap();
            black_box(statement.format_sql())
        });
    });

    group.bench_function("inject_aliases", |b| {
        b.iter(|| {
            let mut statement = statement.clone();
            statement.inject_select_aliases();
            black_box(statement.format_sql())
        });
    });

    group.finish();
}

fn wide_select(columns: usize) -> String {
    let mut sql = String::from("SELECT ");
    for i in 0..columns {
        if i > 0 {
            sql.push_str(", ");
        }
        let _ = write!(sql, "t.column_number_{i}");
    }
    sql.push_str(" FROM wide_table t WHERE t.column_number_0 = 'x'");
    sql
}

fn benchmark_wide_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_projection");

    for columns in [10, 100, 1000] {
        let sql = wide_select(columns);
        group.throughput(Throughput::Bytes(sql.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", columns), &sql, |b, sql| {
            b.iter(|| black_box(Statement::parse(sql).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parsing,
    benchmark_edit_and_render,
    benchmark_wide_projection,
);
criterion_main!(benches);
