// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! A small order-management schema used across the test suites.
//!
//! ```text
//! customer <- orders -> product        region (no keys to anything)
//! ```

use tabledesk_core::{
	Result,
	interface::{RelationalStore, Statement},
};

pub const SCHEMA: &[&str] = &[
	"CREATE TABLE customer (id INTEGER PRIMARY KEY, name TEXT NOT NULL, city TEXT)",
	"CREATE TABLE product (sku TEXT PRIMARY KEY, title TEXT NOT NULL, price REAL)",
	"CREATE TABLE orders (
		id INTEGER PRIMARY KEY,
		customer_id INTEGER REFERENCES customer (id),
		sku TEXT REFERENCES product,
		status TEXT NOT NULL,
		total REAL
	)",
	"CREATE TABLE region (code TEXT PRIMARY KEY, label TEXT)",
];

pub const DATA: &[&str] = &[
	"INSERT INTO customer (id, name, city) VALUES (1, 'alice', 'Oslo'), (2, 'bob', 'Lima'), (3, 'carol', 'Oslo')",
	"INSERT INTO product (sku, title, price) VALUES ('p1', 'kettle', 20.0), ('p2', 'teapot', 35.5)",
	"INSERT INTO orders (id, customer_id, sku, status, total) VALUES
		(10, 1, 'p1', 'open', 20.0),
		(11, 1, 'p2', 'paid', 35.5),
		(12, 2, 'p1', 'open', 20.0),
		(13, NULL, 'p2', 'open', 35.5)",
	"INSERT INTO region (code, label) VALUES ('eu', 'Europe'), ('sa', 'South America')",
];

/// Creates the fixture tables without rows.
pub fn create_schema(store: &dyn RelationalStore) -> Result<()> {
	for sql in SCHEMA {
		store.execute(&Statement::execute("create fixture table", *sql, vec![]))?;
	}
	Ok(())
}

/// Creates the fixture tables and fills them.
pub fn seed(store: &dyn RelationalStore) -> Result<()> {
	create_schema(store)?;
	for sql in DATA {
		store.execute(&Statement::execute("insert fixture rows", *sql, vec![]))?;
	}
	Ok(())
}
