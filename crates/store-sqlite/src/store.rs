// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use r2d2_sqlite::rusqlite::{
	self, Connection, ErrorCode, TransactionBehavior, params_from_iter,
	types::{Value as SqlValue, ValueRef},
};
use tabledesk_core::{
	Error, Result, Row, Value,
	interface::{Outcome, RelationalStore, Statement, StatementKind},
};
use tracing::{debug, instrument};

use crate::SqliteBackend;

pub(crate) fn to_sql(value: &Value) -> SqlValue {
	match value {
		Value::Null => SqlValue::Null,
		Value::Boolean(b) => SqlValue::Integer(i64::from(*b)),
		Value::Int(i) => SqlValue::Integer(*i),
		Value::Float(f) => SqlValue::Real(*f),
		Value::Text(s) => SqlValue::Text(s.clone()),
		Value::Blob(b) => SqlValue::Blob(b.clone()),
	}
}

pub(crate) fn from_sql(value: ValueRef<'_>) -> Value {
	match value {
		ValueRef::Null => Value::Null,
		ValueRef::Integer(i) => Value::Int(i),
		ValueRef::Real(f) => Value::Float(f),
		ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
		ValueRef::Blob(b) => Value::Blob(b.to_vec()),
	}
}

/// Constraint violations are reported separately; everything else is an opaque store failure.
fn classify(label: &str, err: rusqlite::Error) -> Error {
	match err.sqlite_error_code() {
		Some(ErrorCode::ConstraintViolation) => Error::constraint(label, err),
		_ => Error::store(label, err),
	}
}

pub(crate) fn query_rows(conn: &Connection, statement: &Statement) -> Result<Vec<Row>> {
	let label = statement.label;
	let mut stmt = conn.prepare(&statement.sql).map_err(|e| classify(label, e))?;
	let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

	let mut rows = stmt.query(params_from_iter(statement.params.iter().map(to_sql))).map_err(|e| classify(label, e))?;
	let mut result = Vec::new();
	while let Some(row) = rows.next().map_err(|e| classify(label, e))? {
		let mut values = Row::new();
		for (index, column) in columns.iter().enumerate() {
			let value = row.get_ref(index).map_err(|e| classify(label, e))?;
			values.insert(column.as_str(), from_sql(value));
		}
		result.push(values);
	}
	Ok(result)
}

pub(crate) fn execute(conn: &Connection, statement: &Statement) -> Result<usize> {
	conn.execute(&statement.sql, params_from_iter(statement.params.iter().map(to_sql)))
		.map_err(|e| classify(statement.label, e))
}

fn run(conn: &Connection, statement: &Statement) -> Result<Outcome> {
	match statement.kind {
		StatementKind::Query => query_rows(conn, statement).map(Outcome::Rows),
		StatementKind::Execute => execute(conn, statement).map(Outcome::Affected),
	}
}

impl RelationalStore for SqliteBackend {
	#[instrument(name = "store::sqlite::query", level = "debug", skip(self, statement), fields(label = statement.label, params = statement.params.len()))]
	fn query(&self, statement: &Statement) -> Result<Vec<Row>> {
		let conn = self.conn()?;
		let rows = query_rows(&conn, statement)?;
		debug!(rows = rows.len(), "query finished");
		Ok(rows)
	}

	#[instrument(name = "store::sqlite::execute", level = "debug", skip(self, statement), fields(label = statement.label, params = statement.params.len()))]
	fn execute(&self, statement: &Statement) -> Result<usize> {
		let conn = self.conn()?;
		execute(&conn, statement)
	}

	/// `BEGIN IMMEDIATE` takes the database write lock before the first statement runs, so rows
	/// read inside the transaction cannot change until it commits.
	#[instrument(name = "store::sqlite::transaction", level = "debug", skip(self, statements), fields(statements = statements.len()))]
	fn transaction(&self, statements: &[Statement]) -> Result<Vec<Outcome>> {
		let mut conn = self.conn()?;
		let tx = conn
			.transaction_with_behavior(TransactionBehavior::Immediate)
			.map_err(|e| Error::store("begin transaction", e))?;

		let mut outcomes = Vec::with_capacity(statements.len());
		for statement in statements {
			// dropping `tx` on error rolls back
			outcomes.push(run(&tx, statement)?);
		}

		tx.commit().map_err(|e| Error::store("commit transaction", e))?;
		Ok(outcomes)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn backend() -> SqliteBackend {
		let backend = SqliteBackend::in_memory().unwrap();
		backend
			.execute(&Statement::execute(
				"setup",
				"CREATE TABLE item (id INTEGER PRIMARY KEY, name TEXT NOT NULL, price REAL, data BLOB)",
				vec![],
			))
			.unwrap();
		backend
	}

	#[test]
	fn test_round_trip_values() {
		let backend = backend();
		let inserted = backend
			.execute(&Statement::execute(
				"insert",
				"INSERT INTO item (id, name, price, data) VALUES (?1, ?2, ?3, ?4)",
				vec![Value::Int(1), Value::from("茶杯"), Value::Float(2.5), Value::Blob(vec![1, 2])],
			))
			.unwrap();
		assert_eq!(inserted, 1);

		let rows = backend.query(&Statement::query("read", "SELECT * FROM item", vec![])).unwrap();
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["id", "name", "price", "data"]);
		assert_eq!(rows[0].get("name"), Some(&Value::from("茶杯")));
		assert_eq!(rows[0].get("price"), Some(&Value::Float(2.5)));
		assert_eq!(rows[0].get("data"), Some(&Value::Blob(vec![1, 2])));
	}

	#[test]
	fn test_transaction_rolls_back_on_failure() {
		let backend = backend();
		let result = backend.transaction(&[
			Statement::execute("insert", "INSERT INTO item (id, name) VALUES (1, 'a')", vec![]),
			Statement::execute("insert", "INSERT INTO item (id, name) VALUES (2, NULL)", vec![]),
		]);
		assert!(matches!(result, Err(Error::Constraint { .. })));

		let rows = backend.query(&Statement::query("read", "SELECT * FROM item", vec![])).unwrap();
		assert!(rows.is_empty());
	}

	#[test]
	fn test_transaction_returns_outcomes_in_order() {
		let backend = backend();
		let outcomes = backend
			.transaction(&[
				Statement::execute("insert", "INSERT INTO item (id, name) VALUES (1, 'a'), (2, 'b')", vec![]),
				Statement::query("read", "SELECT name FROM item ORDER BY id", vec![]),
			])
			.unwrap();
		assert_eq!(outcomes[0], Outcome::Affected(2));
		assert_eq!(outcomes[1].affected(), 2);
	}

	#[test]
	fn test_store_error_does_not_leak_sql() {
		let backend = backend();
		let err = backend.query(&Statement::query("cross-table preview", "SELECT * FROM missing", vec![])).unwrap_err();
		assert_eq!(err.to_string(), "cross-table preview failed");
	}
}
