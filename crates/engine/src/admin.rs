// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use tabledesk_core::{
	Error, Ident, Result, Row, Value,
	interface::{AUDIT_TABLE, ColumnDef, ForeignKey, key_column},
};
use tabledesk_query::compile::{self, ColumnSpec};
use tracing::{info, instrument};

use crate::Engine;

/// A single-row update.
///
/// The row is located by `key = key_value`. `key` defaults to the table's key column; the value
/// falls back to the key's entry in `data`, then to `id`.
#[derive(Debug, Clone, Default)]
pub struct RowUpdate {
	pub data: Row,
	pub key: Option<String>,
	pub key_value: Option<Value>,
	pub id: Option<Value>,
}

/// A user table name. The audit table is never administered directly.
fn user_table(name: &str) -> Result<Ident> {
	let table = Ident::new(name)?;
	if table.matches_loosely(AUDIT_TABLE) {
		return Err(Error::validation(format!("table {AUDIT_TABLE} is reserved")));
	}
	Ok(table)
}

fn columns_of(data: Row) -> Result<Vec<(Ident, Value)>> {
	data.into_iter().map(|(column, value)| Ok((Ident::new(column)?, value))).collect()
}

impl Engine {
	pub fn list_tables(&self) -> Result<Vec<String>> {
		self.catalog.list_tables()
	}

	pub fn describe(&self, table: &str) -> Result<Vec<ColumnDef>> {
		self.catalog.describe(&Ident::new(table)?)
	}

	/// Foreign keys in which `table` takes either side.
	pub fn relations(&self, table: &str) -> Result<Vec<ForeignKey>> {
		let table = Ident::new(table)?;
		self.catalog.describe(&table)?;
		self.catalog.foreign_keys(std::slice::from_ref(&table))
	}

	#[instrument(name = "engine::create_table", level = "info", skip(self, columns), fields(columns = columns.len()))]
	pub fn create_table(&self, table: &str, columns: &[ColumnSpec]) -> Result<()> {
		let table = user_table(table)?;
		self.store.execute(&compile::create_table(&table, columns)?)?;
		info!(%table, "table created");
		Ok(())
	}

	/// Refuses with [`Error::Dependent`] while another table's foreign key references `table`.
	#[instrument(name = "engine::drop_table", level = "info", skip(self))]
	pub fn drop_table(&self, table: &str) -> Result<()> {
		let table = user_table(table)?;
		self.catalog.describe(&table)?;

		let mut dependents: Vec<String> = Vec::new();
		for edge in self.catalog.foreign_keys(std::slice::from_ref(&table))? {
			if table == edge.parent_table.as_str()
				&& table != edge.child_table.as_str()
				&& !dependents.contains(&edge.child_table)
			{
				dependents.push(edge.child_table);
			}
		}
		if !dependents.is_empty() {
			return Err(Error::Dependent {
				table: table.to_string(),
				dependents,
			});
		}

		self.store.execute(&compile::drop_table(&table))?;
		info!(%table, "table dropped");
		Ok(())
	}

	#[instrument(name = "engine::add_column", level = "info", skip(self, column), fields(column = %column.name))]
	pub fn add_column(&self, table: &str, column: &ColumnSpec) -> Result<()> {
		let table = user_table(table)?;
		self.catalog.describe(&table)?;
		self.store.execute(&compile::add_column(&table, column)?)?;
		Ok(())
	}

	#[instrument(name = "engine::drop_column", level = "info", skip(self))]
	pub fn drop_column(&self, table: &str, column: &str) -> Result<()> {
		let table = user_table(table)?;
		let column = Ident::new(column)?;
		self.catalog.describe(&table)?;
		self.store.execute(&compile::drop_column(&table, &column))?;
		Ok(())
	}

	#[instrument(name = "engine::rename_column", level = "info", skip(self))]
	pub fn rename_column(&self, table: &str, from: &str, to: &str) -> Result<()> {
		let table = user_table(table)?;
		let from = Ident::new(from)?;
		let to = Ident::new(to)?;
		self.catalog.describe(&table)?;
		self.store.execute(&compile::rename_column(&table, &from, &to))?;
		Ok(())
	}

	pub fn rows(&self, table: &str) -> Result<Vec<Row>> {
		let table = Ident::new(table)?;
		self.catalog.describe(&table)?;
		self.store.query(&compile::select_rows(&table))
	}

	#[instrument(name = "engine::insert_row", level = "debug", skip(self, data), fields(columns = data.len()))]
	pub fn insert_row(&self, table: &str, data: Row) -> Result<usize> {
		let table = user_table(table)?;
		self.catalog.describe(&table)?;
		self.store.execute(&compile::insert_row(&table, columns_of(data)?)?)
	}

	#[instrument(name = "engine::update_row", level = "debug", skip(self, update))]
	pub fn update_row(&self, table: &str, update: RowUpdate) -> Result<usize> {
		let table = user_table(table)?;
		let columns = self.catalog.describe(&table)?;
		let key = match update.key {
			Some(key) => Ident::new(key)?.to_string(),
			None => key_column(&columns).map(|c| c.name.clone()).ok_or_else(|| Error::UnknownTable(table.to_string()))?,
		};

		let Some(key_value) = update.key_value.or_else(|| update.data.get(&key).cloned()).or(update.id) else {
			return Err(Error::validation(format!("no value given for key column {key}")));
		};

		self.store.execute(&compile::update_row(&table, &key, key_value, columns_of(update.data)?)?)
	}

	#[instrument(name = "engine::delete_row", level = "debug", skip(self, id))]
	pub fn delete_row(&self, table: &str, id: Value) -> Result<usize> {
		let table = user_table(table)?;
		let columns = self.catalog.describe(&table)?;
		let Some(key) = key_column(&columns) else {
			return Err(Error::UnknownTable(table.to_string()));
		};
		self.store.execute(&compile::delete_row(&table, &key.name, id))
	}
}
