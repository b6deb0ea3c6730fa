// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use tabledesk_core::{Error, Row, Value};
use tabledesk_engine::RowUpdate;
use tabledesk_query::compile::{ColumnSpec, Reference};

use crate::{engine, text};

fn column(name: &str, data_type: &str) -> ColumnSpec {
	ColumnSpec {
		name: name.to_string(),
		data_type: data_type.to_string(),
		primary_key: false,
		not_null: false,
		references: None,
	}
}

fn row(values: &[(&str, Value)]) -> Row {
	values.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[test]
fn test_list_and_describe() {
	let engine = engine();
	assert_eq!(engine.list_tables().unwrap(), vec!["customer", "orders", "product", "region"]);
	let columns = engine.describe("customer").unwrap();
	assert_eq!(columns.len(), 3);
	assert!(matches!(engine.describe("nope"), Err(Error::UnknownTable(_))));
	assert!(matches!(engine.describe("bad name"), Err(Error::Validation(_))));
}

#[test]
fn test_relations_cover_both_sides() {
	let engine = engine();
	assert_eq!(engine.relations("orders").unwrap().len(), 2);
	let customer = engine.relations("customer").unwrap();
	assert_eq!(customer.len(), 1);
	assert_eq!(customer[0].child_table, "orders");
	assert!(engine.relations("region").unwrap().is_empty());
}

#[test]
fn test_create_table_with_reference() {
	let engine = engine();
	let mut id = column("id", "integer");
	id.primary_key = true;
	let mut order_id = column("order_id", "INTEGER");
	order_id.references = Some(Reference {
		table: "orders".to_string(),
		column: "id".to_string(),
	});
	let mut note = column("note", "varchar(200)");
	note.not_null = true;

	engine.create_table("shipment", &[id, order_id, note]).unwrap();

	let columns = engine.describe("shipment").unwrap();
	assert_eq!(columns[0].data_type, "INTEGER");
	assert!(columns[0].primary_key);
	assert_eq!(columns[2].data_type, "VARCHAR(200)");
	assert!(columns[2].not_null);

	let edges = engine.relations("shipment").unwrap();
	assert_eq!(edges.len(), 1);
	assert_eq!(edges[0].parent_table, "orders");
}

#[test]
fn test_create_table_requires_primary_key() {
	let engine = engine();
	let err = engine.create_table("loose", &[column("a", "TEXT")]).unwrap_err();
	assert!(matches!(err, Error::Validation(_)));
	assert!(matches!(engine.describe("loose"), Err(Error::UnknownTable(_))));
}

#[test]
fn test_drop_referenced_table_is_refused() {
	let engine = engine();
	let err = engine.drop_table("customer").unwrap_err();
	let Error::Dependent {
		dependents,
		..
	} = &err
	else {
		panic!("expected dependents, got {err:?}");
	};
	assert_eq!(dependents, &vec!["orders".to_string()]);
	assert!(engine.describe("customer").is_ok());

	engine.drop_table("region").unwrap();
	assert!(!engine.list_tables().unwrap().contains(&"region".to_string()));
}

#[test]
fn test_audit_table_is_reserved() {
	let engine = engine();
	assert!(matches!(engine.drop_table("update_log"), Err(Error::Validation(_))));
	assert!(matches!(engine.insert_row("update_log", row(&[("field", text("x"))])), Err(Error::Validation(_))));
}

#[test]
fn test_column_changes() {
	let engine = engine();
	engine.add_column("region", &column("population", "INTEGER")).unwrap();
	engine.rename_column("region", "label", "title").unwrap();
	engine.drop_column("region", "population").unwrap();

	let names: Vec<String> = engine.describe("region").unwrap().into_iter().map(|c| c.name).collect();
	assert_eq!(names, vec!["code", "title"]);

	let mut key = column("extra", "TEXT");
	key.primary_key = true;
	assert!(matches!(engine.add_column("region", &key), Err(Error::Validation(_))));
}

#[test]
fn test_insert_then_read_back() {
	let engine = engine();
	let data = row(&[("code", text("as")), ("label", text("亚洲"))]);
	assert_eq!(engine.insert_row("region", data).unwrap(), 1);

	let rows = engine.rows("region").unwrap();
	let inserted = rows.iter().find(|r| r.get("code") == Some(&text("as"))).unwrap();
	assert_eq!(inserted.get("label"), Some(&text("亚洲")));
}

#[test]
fn test_insert_violating_foreign_key() {
	let engine = engine();
	let data = row(&[("id", Value::Int(50)), ("customer_id", Value::Int(404)), ("status", text("open"))]);
	assert!(matches!(engine.insert_row("orders", data), Err(Error::Constraint { .. })));
}

#[test]
fn test_update_row_key_resolution() {
	let engine = engine();

	// key value taken from the data itself
	let update = RowUpdate {
		data: row(&[("code", text("eu")), ("label", text("Europa"))]),
		..RowUpdate::default()
	};
	assert_eq!(engine.update_row("region", update).unwrap(), 1);

	// falls back to the id
	let update = RowUpdate {
		data: row(&[("label", text("Sudamérica"))]),
		id: Some(text("sa")),
		..RowUpdate::default()
	};
	assert_eq!(engine.update_row("region", update).unwrap(), 1);

	// explicit key column and value
	let update = RowUpdate {
		data: row(&[("city", text("Bergen"))]),
		key: Some("name".to_string()),
		key_value: Some(text("alice")),
		..RowUpdate::default()
	};
	assert_eq!(engine.update_row("customer", update).unwrap(), 1);

	let labels: Vec<Value> =
		engine.rows("region").unwrap().into_iter().filter_map(|r| r.get("label").cloned()).collect();
	assert_eq!(labels, vec![text("Europa"), text("Sudamérica")]);
}

#[test]
fn test_update_row_rejections() {
	let engine = engine();
	let missing_key = RowUpdate {
		data: row(&[("label", text("x"))]),
		..RowUpdate::default()
	};
	assert!(matches!(engine.update_row("region", missing_key), Err(Error::Validation(_))));

	let only_key = RowUpdate {
		data: row(&[("code", text("eu"))]),
		..RowUpdate::default()
	};
	assert!(matches!(engine.update_row("region", only_key), Err(Error::Validation(_))));
}

#[test]
fn test_delete_row() {
	let engine = engine();
	assert_eq!(engine.delete_row("region", text("eu")).unwrap(), 1);
	assert_eq!(engine.delete_row("region", text("eu")).unwrap(), 0);

	// an order still references customer 2
	assert!(matches!(engine.delete_row("customer", text("2")), Err(Error::Constraint { .. })));
	assert_eq!(engine.delete_row("customer", text("3")).unwrap(), 1);
}
