// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use tabledesk_core::{Error, Ident, Result, Value, interface::Statement};

use super::{bind, quote_name};

pub fn select_rows(table: &Ident) -> Statement {
	Statement::query("read rows", format!("SELECT * FROM {}", table.quoted()), vec![])
}

pub fn insert_row(table: &Ident, data: Vec<(Ident, Value)>) -> Result<Statement> {
	if data.is_empty() {
		return Err(Error::validation("no values to insert"));
	}
	let mut params = Vec::with_capacity(data.len());
	let mut columns = Vec::with_capacity(data.len());
	let mut placeholders = Vec::with_capacity(data.len());
	for (column, value) in data {
		columns.push(column.quoted());
		placeholders.push(bind(&mut params, value));
	}
	let sql = format!("INSERT INTO {} ({}) VALUES ({})", table.quoted(), columns.join(", "), placeholders.join(", "));
	Ok(Statement::execute("insert row", sql, params))
}

/// Updates the row identified by `key = key_value`. The key column itself is never assigned.
pub fn update_row(table: &Ident, key: &str, key_value: Value, data: Vec<(Ident, Value)>) -> Result<Statement> {
	let mut params = Vec::with_capacity(data.len() + 1);
	let assignments: Vec<String> = data
		.into_iter()
		.filter(|(column, _)| column.as_str() != key)
		.map(|(column, value)| format!("{} = {}", column.quoted(), bind(&mut params, value)))
		.collect();
	if assignments.is_empty() {
		return Err(Error::validation("no updatable fields"));
	}
	let filter = bind(&mut params, key_value);
	let sql = format!("UPDATE {} SET {} WHERE {} = {filter}", table.quoted(), assignments.join(", "), quote_name(key));
	Ok(Statement::execute("update row", sql, params))
}

pub fn delete_row(table: &Ident, key: &str, key_value: Value) -> Statement {
	let mut params = Vec::with_capacity(1);
	let filter = bind(&mut params, key_value);
	let sql = format!("DELETE FROM {} WHERE {} = {filter}", table.quoted(), quote_name(key));
	Statement::execute("delete row", sql, params)
}
