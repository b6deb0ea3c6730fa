// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use std::{sync::Arc, thread};

use tabledesk_core::{Error, Row, Value, interface::PreImage};
use tabledesk_engine::{BatchUpdate, DEFAULT_OPERATOR, Engine};
use tabledesk_query::{Condition, compile::ColumnSpec};
use tabledesk_store_sqlite::{SqliteBackend, SqliteConfig};
use tabledesk_testing::{fixture, tempdir::temp_dir};

use crate::{BrokenAudit, engine, read, recording_engine, seeded, text};

fn request(condition: &str, table: &str, field: &str, value: Value) -> BatchUpdate {
	BatchUpdate {
		condition: Condition::parse(condition),
		table: table.to_string(),
		field: field.to_string(),
		value,
		operator: None,
	}
}

#[test]
fn test_updates_and_records_pre_images() {
	let engine = engine();
	let outcome = engine.batch_update(request("orders.status='open'", "orders", "status", text("shipped"))).unwrap();

	assert_eq!(outcome.affected, 3);
	assert_eq!(outcome.old_values.len(), 3);
	assert!(outcome.old_values.iter().all(|p| p.value == text("open")));
	let mut ids: Vec<Value> = outcome.old_values.iter().map(|p| p.id.clone()).collect();
	ids.sort_by_key(|id| id.to_string());
	assert_eq!(ids, vec![Value::Int(10), Value::Int(12), Value::Int(13)]);
	assert_eq!(outcome.operator, DEFAULT_OPERATOR);

	let rows = read(&engine, "SELECT COUNT(*) AS n FROM orders WHERE status = 'shipped'");
	assert_eq!(rows[0].get("n"), Some(&Value::Int(3)));

	let log = engine.update_logs().unwrap();
	assert_eq!(log.len(), 1);
	assert_eq!(log[0].id, Some(outcome.log_id));
	assert_eq!(log[0].condition, "orders.status='open'");
	assert_eq!(log[0].count, 3);
	assert_eq!(log[0].result, "success");
	assert_eq!(log[0].old_values, outcome.old_values);
	assert_eq!(log[0].new_value, text("shipped"));
}

#[test]
fn test_only_clauses_for_the_target_table_apply() {
	let engine = engine();
	let mut request = request("customer.city='Oslo' AND Orders.status='open'", "orders", "total", Value::Float(0.0));
	request.operator = Some("dana".to_string());

	let outcome = engine.batch_update(request).unwrap();
	assert_eq!(outcome.affected, 3);
	assert_eq!(outcome.operator, "dana");
}

#[test]
fn test_zero_matches_still_logged() {
	let engine = engine();
	let outcome = engine.batch_update(request("orders.status='lost'", "orders", "status", text("found"))).unwrap();
	assert_eq!(outcome.affected, 0);
	assert!(outcome.old_values.is_empty());
	assert_eq!(engine.update_logs().unwrap()[0].count, 0);
}

#[test]
fn test_key_column_rejected_without_statements() {
	let (engine, store) = recording_engine();
	let err = engine.batch_update(request("orders.status='open'", "orders", "id", Value::Int(1))).unwrap_err();
	assert!(matches!(err, Error::Validation(_)));
	assert!(store.labels().is_empty());
	assert!(engine.update_logs().unwrap().is_empty());
}

#[test]
fn test_every_composite_key_column_rejected() {
	let engine = engine();
	let column = |name: &str, primary_key: bool| ColumnSpec {
		name: name.to_string(),
		data_type: "INTEGER".to_string(),
		primary_key,
		not_null: false,
		references: None,
	};
	engine
		.create_table("line", &[column("order_id", true), column("line_no", true), column("qty", false)])
		.unwrap();
	let mut row = Row::new();
	row.insert("order_id", Value::Int(10));
	row.insert("line_no", Value::Int(1));
	row.insert("qty", Value::Int(7));
	engine.insert_row("line", row).unwrap();

	for field in ["order_id", "line_no"] {
		let err = engine.batch_update(request("line.qty='7'", "line", field, Value::Int(2))).unwrap_err();
		assert!(matches!(err, Error::Validation(ref m) if m.contains("key column")), "{field}: {err:?}");
	}

	let rows = read(&engine, "SELECT order_id, line_no FROM line");
	assert_eq!(rows[0].get("line_no"), Some(&Value::Int(1)));
	assert!(engine.update_logs().unwrap().is_empty());

	// non-key columns of the same table stay updatable
	let outcome = engine.batch_update(request("line.qty='7'", "line", "qty", Value::Int(8))).unwrap();
	assert_eq!(outcome.affected, 1);
}

#[test]
fn test_preconditions() {
	let (engine, store) = recording_engine();

	let err = engine.batch_update(request("customer.city='Oslo'", "orders", "status", text("x"))).unwrap_err();
	assert!(matches!(err, Error::Validation(ref m) if m.contains("no effective condition")));

	let err = engine.batch_update(request("orders.status='open'", "orders", "colour", text("x"))).unwrap_err();
	assert!(matches!(err, Error::Validation(_)));

	let err = engine.batch_update(request("orders.status='open'", "orders;", "status", text("x"))).unwrap_err();
	assert!(matches!(err, Error::Validation(_)));

	let err = engine.batch_update(request("missing.a='1'", "missing", "a", text("x"))).unwrap_err();
	assert!(matches!(err, Error::UnknownTable(_)));

	let err = engine.batch_update(request("update_log.field='x'", "update_log", "field", text("y"))).unwrap_err();
	assert!(matches!(err, Error::Validation(_)));

	assert!(store.labels().is_empty());
}

#[test]
fn test_table_without_primary_key_uses_first_column() {
	let engine = engine();
	engine
		.store()
		.execute(&tabledesk_core::interface::Statement::execute(
			"create",
			"CREATE TABLE tag (label TEXT, colour TEXT)",
			vec![],
		))
		.unwrap();
	engine
		.store()
		.execute(&tabledesk_core::interface::Statement::execute(
			"insert",
			"INSERT INTO tag VALUES ('urgent', 'red'), ('later', 'grey')",
			vec![],
		))
		.unwrap();

	let outcome = engine.batch_update(request("tag.colour='red'", "tag", "colour", text("orange"))).unwrap();
	assert_eq!(
		outcome.old_values,
		vec![PreImage {
			id: text("urgent"),
			value: text("red"),
		}]
	);

	let err = engine.batch_update(request("tag.colour='grey'", "tag", "label", text("x"))).unwrap_err();
	assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_failed_update_rolls_back_and_logs_nothing() {
	let engine = engine();
	// status is NOT NULL
	let err = engine.batch_update(request("orders.status='open'", "orders", "status", Value::Null)).unwrap_err();
	assert!(matches!(err, Error::Constraint { .. }));

	let rows = read(&engine, "SELECT COUNT(*) AS n FROM orders WHERE status = 'open'");
	assert_eq!(rows[0].get("n"), Some(&Value::Int(3)));
	assert!(engine.update_logs().unwrap().is_empty());
}

#[test]
fn test_audit_failure_reports_committed_count() {
	let backend = Arc::new(seeded());
	let engine = Engine::new(backend.clone(), backend.clone(), Arc::new(BrokenAudit));

	let err = engine.batch_update(request("orders.status='open'", "orders", "status", text("held"))).unwrap_err();
	let Error::LoggedFailure {
		affected,
		..
	} = &err
	else {
		panic!("expected a logged failure, got {err:?}");
	};
	assert_eq!(*affected, 3);
	assert_eq!(err.code(), "LOGGED_FAILURE");

	// the update itself stays committed
	let rows = read(&engine, "SELECT COUNT(*) AS n FROM orders WHERE status = 'held'");
	assert_eq!(rows[0].get("n"), Some(&Value::Int(3)));
}

#[test]
fn test_concurrent_disjoint_updates() {
	temp_dir(|path| {
		let backend = SqliteBackend::new(SqliteConfig::new(path.join("shop.db")).max_pool_size(4)).unwrap();
		fixture::create_schema(&backend).unwrap();
		let engine = Engine::sqlite(backend);

		for batch in 0..4i64 {
			for n in 0..25i64 {
				engine
					.store()
					.execute(&tabledesk_core::interface::Statement::execute(
						"insert",
						"INSERT INTO orders (id, status) VALUES (?1, ?2)",
						vec![Value::Int(batch * 100 + n), Value::Text(format!("batch{batch}"))],
					))
					.unwrap();
			}
		}

		let handles: Vec<_> = (0..4i64)
			.map(|batch| {
				let engine = engine.clone();
				thread::spawn(move || {
					engine.batch_update(request(
						&format!("orders.status='batch{batch}'"),
						"orders",
						"total",
						Value::Int(batch),
					))
				})
			})
			.collect();

		for handle in handles {
			let outcome = handle.join().unwrap().unwrap();
			assert_eq!(outcome.affected, 25);
			assert_eq!(outcome.old_values.len(), 25);
		}
		assert_eq!(engine.update_logs().unwrap().len(), 4);
	})
	.unwrap();
}
