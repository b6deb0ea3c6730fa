// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use serde::{Deserialize, Serialize};

use crate::{Ident, Result};

/// One declared column, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
	pub name: String,
	#[serde(rename = "type")]
	pub data_type: String,
	#[serde(rename = "isPrimaryKey")]
	pub primary_key: bool,
	#[serde(rename = "notNull")]
	pub not_null: bool,
}

/// A foreign-key edge discovered from schema metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
	pub constraint_name: String,
	pub child_table: String,
	pub child_column: String,
	pub parent_table: String,
	pub parent_column: String,
}

impl ForeignKey {
	/// True when the edge links `a` and `b`, in either direction.
	pub fn connects(&self, a: &str, b: &str) -> bool {
		(self.child_table == a && self.parent_table == b) || (self.child_table == b && self.parent_table == a)
	}
}

/// The column that identifies a row: the declared primary key, or the first column when the
/// table declares none.
pub fn key_column(columns: &[ColumnDef]) -> Option<&ColumnDef> {
	columns.iter().find(|c| c.primary_key).or_else(|| columns.first())
}

pub trait SchemaCatalog: Send + Sync {
	/// User tables, sorted by name.
	fn list_tables(&self) -> Result<Vec<String>>;

	/// Columns of `table` in declaration order; `Error::UnknownTable` when it does not exist.
	fn describe(&self, table: &Ident) -> Result<Vec<ColumnDef>>;

	/// Every edge whose child or parent table is one of `tables`, fetched in a single round trip.
	fn foreign_keys(&self, tables: &[Ident]) -> Result<Vec<ForeignKey>>;
}
