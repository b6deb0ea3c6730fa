// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tabledesk_core::{Error, Ident, Result, interface::Statement};

/// `TEXT`, `DOUBLE PRECISION`, `VARCHAR(255)`, `DECIMAL(10, 2)`
static COLUMN_TYPE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[A-Za-z]+( [A-Za-z]+)?(\(\d+(,\s*\d+)?\))?$").expect("type pattern is valid"));

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reference {
	pub table: String,
	pub column: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
	pub name: String,
	#[serde(rename = "type")]
	pub data_type: String,
	#[serde(default)]
	pub primary_key: bool,
	#[serde(default)]
	pub not_null: bool,
	#[serde(default)]
	pub references: Option<Reference>,
}

impl ColumnSpec {
	fn name(&self) -> Result<Ident> {
		Ident::new(self.name.as_str())
	}

	/// Column definition without the primary-key clause.
	fn render(&self) -> Result<String> {
		let name = self.name()?;
		let data_type = self.data_type.trim();
		if !COLUMN_TYPE.is_match(data_type) {
			return Err(Error::validation(format!("column type {data_type:?} is not allowed")));
		}
		let mut definition = format!("{} {}", name.quoted(), data_type.to_ascii_uppercase());
		if self.not_null {
			definition.push_str(" NOT NULL");
		}
		if let Some(reference) = &self.references {
			let table = Ident::new(reference.table.as_str())?;
			let column = Ident::new(reference.column.as_str())?;
			definition.push_str(&format!(
				" REFERENCES {}({}) ON UPDATE CASCADE ON DELETE RESTRICT",
				table.quoted(),
				column.quoted()
			));
		}
		Ok(definition)
	}
}

pub fn create_table(table: &Ident, columns: &[ColumnSpec]) -> Result<Statement> {
	if columns.is_empty() {
		return Err(Error::validation("a table needs at least one column"));
	}

	let mut seen = HashSet::new();
	for column in columns {
		if !seen.insert(column.name()?) {
			return Err(Error::validation(format!("column {} is declared twice", column.name)));
		}
	}

	let keys: Vec<Ident> = columns.iter().filter(|c| c.primary_key).map(ColumnSpec::name).collect::<Result<_>>()?;
	if keys.is_empty() {
		return Err(Error::validation("at least one column must be the primary key"));
	}

	let mut definitions = Vec::with_capacity(columns.len() + 1);
	for column in columns {
		let mut definition = column.render()?;
		if keys.len() == 1 && column.primary_key {
			definition.push_str(" PRIMARY KEY");
		}
		definitions.push(definition);
	}
	if keys.len() > 1 {
		let keys: Vec<String> = keys.iter().map(Ident::quoted).collect();
		definitions.push(format!("PRIMARY KEY ({})", keys.join(", ")));
	}

	Ok(Statement::execute("create table", format!("CREATE TABLE {} ({})", table.quoted(), definitions.join(", ")), vec![]))
}

pub fn drop_table(table: &Ident) -> Statement {
	Statement::execute("drop table", format!("DROP TABLE IF EXISTS {}", table.quoted()), vec![])
}

pub fn add_column(table: &Ident, column: &ColumnSpec) -> Result<Statement> {
	if column.primary_key {
		return Err(Error::validation("a primary-key column cannot be added to an existing table"));
	}
	let sql = format!("ALTER TABLE {} ADD COLUMN {}", table.quoted(), column.render()?);
	Ok(Statement::execute("add column", sql, vec![]))
}

pub fn drop_column(table: &Ident, column: &Ident) -> Statement {
	let sql = format!("ALTER TABLE {} DROP COLUMN {}", table.quoted(), column.quoted());
	Statement::execute("drop column", sql, vec![])
}

pub fn rename_column(table: &Ident, from: &Ident, to: &Ident) -> Statement {
	let sql = format!("ALTER TABLE {} RENAME COLUMN {} TO {}", table.quoted(), from.quoted(), to.quoted());
	Statement::execute("rename column", sql, vec![])
}
