// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use tabledesk_core::Value;
use tabledesk_query::Condition;

use crate::{engine, recording_engine, text};

#[test]
fn test_empty_condition_touches_nothing() {
	let (engine, store) = recording_engine();
	let preview = engine.preview(&Condition::parse("show me everything")).unwrap();
	assert_eq!(preview.count, 0);
	assert!(preview.preview.is_empty());
	assert!(preview.fields.is_empty());
	assert!(preview.message.is_none());
	assert!(store.labels().is_empty());
}

#[test]
fn test_single_table() {
	let engine = engine();
	let preview = engine.preview(&Condition::parse("orders.status='open'")).unwrap();
	assert_eq!(preview.count, 3);
	assert_eq!(preview.fields, vec!["id", "customer_id", "sku", "status", "total"]);
}

#[test]
fn test_join_follows_foreign_keys() {
	let engine = engine();
	let preview = engine.preview(&Condition::parse("orders.status='open' AND customer.city='Oslo'")).unwrap();
	assert_eq!(preview.count, 1);
	let row = &preview.preview[0];
	assert_eq!(row.get("status"), Some(&text("open")));
	assert_eq!(row.get("name"), Some(&text("alice")));
	assert!(preview.fields.contains(&"city".to_string()));
}

#[test]
fn test_rows_with_null_foreign_key_survive_the_join() {
	let engine = engine();
	// order 13 has no customer
	let preview = engine.preview(&Condition::parse("orders.status='open' product.title='teapot'")).unwrap();
	assert_eq!(preview.count, 1);
	assert_eq!(preview.preview[0].get("id"), Some(&Value::Int(13)));
	assert_eq!(preview.preview[0].get("customer_id"), Some(&Value::Null));

	let preview = engine.preview(&Condition::parse("orders.id='13' customer.id='1'")).unwrap();
	assert_eq!(preview.count, 0);
}

#[test]
fn test_disconnected_tables_issue_no_join_query() {
	let (engine, store) = recording_engine();
	let preview = engine.preview(&Condition::parse("orders.status='open' region.code='eu'")).unwrap();
	assert_eq!(preview.count, 0);
	assert!(preview.preview.is_empty());
	assert!(preview.fields.is_empty());
	assert!(preview.message.unwrap().contains("region"));
	assert!(store.labels().is_empty());
}

#[test]
fn test_preview_is_limited() {
	let engine = engine();
	for id in 100..250 {
		engine
			.store()
			.execute(&tabledesk_core::interface::Statement::execute(
				"insert",
				"INSERT INTO orders (id, customer_id, sku, status) VALUES (?1, 2, 'p1', 'bulk')",
				vec![Value::Int(id)],
			))
			.unwrap();
	}
	let preview = engine.preview(&Condition::parse("orders.status='bulk'")).unwrap();
	assert_eq!(preview.count, 100);
}
