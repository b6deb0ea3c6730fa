// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use r2d2_sqlite::rusqlite::{params, params_from_iter};
use tabledesk_core::{
	Error, Ident, Result,
	interface::{AUDIT_TABLE, ColumnDef, ForeignKey, SchemaCatalog},
};
use tracing::{debug, instrument};

use crate::SqliteBackend;

const LIST_TABLES: &str = "SELECT name FROM sqlite_master \
	WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name <> ?1 \
	ORDER BY name";

const DESCRIBE: &str = "SELECT name, type, pk, \"notnull\" FROM pragma_table_info(?1) ORDER BY cid";

/// Builds the foreign-key discovery query for `count` table names bound as `?1..?count`.
///
/// A foreign key declared without a target column references the parent's primary key, so the
/// target is resolved from the parent's table info in that case. Edges come back in table
/// creation order, then in declaration order within a table.
fn foreign_key_query(count: usize) -> String {
	let placeholders = (1..=count).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ");
	format!(
		"SELECT m.name, fk.\"from\", fk.\"table\", \
			COALESCE(fk.\"to\", (SELECT p.name FROM pragma_table_info(fk.\"table\") p WHERE p.pk = 1)) \
		FROM sqlite_master m JOIN pragma_foreign_key_list(m.name) fk \
		WHERE m.type = 'table' AND (m.name IN ({placeholders}) OR fk.\"table\" IN ({placeholders})) \
		ORDER BY m.rowid, fk.id, fk.seq"
	)
}

impl SchemaCatalog for SqliteBackend {
	#[instrument(name = "store::sqlite::list_tables", level = "debug", skip(self))]
	fn list_tables(&self) -> Result<Vec<String>> {
		let conn = self.conn()?;
		let mut stmt = conn.prepare_cached(LIST_TABLES).map_err(|e| Error::schema("list tables", e))?;
		let tables = stmt
			.query_map(params![AUDIT_TABLE], |row| row.get::<_, String>(0))
			.and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>())
			.map_err(|e| Error::schema("list tables", e))?;
		Ok(tables)
	}

	#[instrument(name = "store::sqlite::describe", level = "debug", skip(self), fields(table = %table))]
	fn describe(&self, table: &Ident) -> Result<Vec<ColumnDef>> {
		let conn = self.conn()?;
		let mut stmt = conn.prepare_cached(DESCRIBE).map_err(|e| Error::schema("describe table", e))?;
		let columns = stmt
			.query_map(params![table.as_str()], |row| {
				Ok(ColumnDef {
					name: row.get(0)?,
					data_type: row.get(1)?,
					primary_key: row.get::<_, i64>(2)? > 0,
					not_null: row.get::<_, i64>(3)? != 0,
				})
			})
			.and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>())
			.map_err(|e| Error::schema("describe table", e))?;

		if columns.is_empty() {
			return Err(Error::UnknownTable(table.to_string()));
		}
		Ok(columns)
	}

	#[instrument(name = "store::sqlite::foreign_keys", level = "debug", skip(self), fields(tables = tables.len()))]
	fn foreign_keys(&self, tables: &[Ident]) -> Result<Vec<ForeignKey>> {
		if tables.is_empty() {
			return Ok(Vec::new());
		}

		let conn = self.conn()?;
		let sql = foreign_key_query(tables.len());
		let mut stmt = conn.prepare(&sql).map_err(|e| Error::schema("discover foreign keys", e))?;
		let edges = stmt
			.query_map(params_from_iter(tables.iter().map(Ident::as_str)), |row| {
				let child_table: String = row.get(0)?;
				let child_column: String = row.get(1)?;
				let parent_table: String = row.get(2)?;
				// a parent without a primary key leaves the target unresolved
				let parent_column: Option<String> = row.get(3)?;
				Ok((child_table, child_column, parent_table, parent_column))
			})
			.and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>())
			.map_err(|e| Error::schema("discover foreign keys", e))?;

		let edges: Vec<ForeignKey> = edges
			.into_iter()
			.filter_map(|(child_table, child_column, parent_table, parent_column)| {
				let parent_column = parent_column?;
				Some(ForeignKey {
					constraint_name: format!("fk_{child_table}_{child_column}_{parent_table}_{parent_column}"),
					child_table,
					child_column,
					parent_table,
					parent_column,
				})
			})
			.collect();

		debug!(edges = edges.len(), "foreign keys discovered");
		Ok(edges)
	}
}
