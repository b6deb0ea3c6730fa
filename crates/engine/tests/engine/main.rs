// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! Engine operations against a seeded SQLite backend.

use std::sync::Arc;

use parking_lot::Mutex;
use tabledesk_core::{
	Error, Result, Row, Value,
	interface::{AuditLog, Outcome, RelationalStore, Statement, UpdateLogEntry},
};
use tabledesk_engine::Engine;
use tabledesk_store_sqlite::SqliteBackend;
use tabledesk_testing::fixture;

mod admin;
mod batch_update;
mod preview;

/// Passes statements through to SQLite and remembers the label of each one.
pub struct RecordingStore {
	inner: SqliteBackend,
	labels: Mutex<Vec<&'static str>>,
}

impl RecordingStore {
	pub fn labels(&self) -> Vec<&'static str> {
		self.labels.lock().clone()
	}
}

impl RelationalStore for RecordingStore {
	fn query(&self, statement: &Statement) -> Result<Vec<Row>> {
		self.labels.lock().push(statement.label);
		self.inner.query(statement)
	}

	fn execute(&self, statement: &Statement) -> Result<usize> {
		self.labels.lock().push(statement.label);
		self.inner.execute(statement)
	}

	fn transaction(&self, statements: &[Statement]) -> Result<Vec<Outcome>> {
		self.labels.lock().extend(statements.iter().map(|s| s.label));
		self.inner.transaction(statements)
	}
}

/// An audit log whose storage is unavailable.
pub struct BrokenAudit;

impl AuditLog for BrokenAudit {
	fn append(&self, _entry: &UpdateLogEntry) -> Result<i64> {
		Err(Error::store("append update log", "disk full"))
	}

	fn list(&self) -> Result<Vec<UpdateLogEntry>> {
		Ok(Vec::new())
	}
}

pub fn seeded() -> SqliteBackend {
	let backend = SqliteBackend::in_memory().unwrap();
	fixture::seed(&backend).unwrap();
	backend
}

pub fn engine() -> Engine {
	Engine::sqlite(seeded())
}

/// An engine whose store records every statement it is handed.
pub fn recording_engine() -> (Engine, Arc<RecordingStore>) {
	let backend = seeded();
	let store = Arc::new(RecordingStore {
		inner: backend.clone(),
		labels: Mutex::new(Vec::new()),
	});
	let backend = Arc::new(backend);
	(Engine::new(backend.clone(), store.clone(), backend), store)
}

pub fn read(engine: &Engine, sql: &str) -> Vec<Row> {
	engine.store().query(&Statement::query("read", sql, vec![])).unwrap()
}

pub fn text(value: &str) -> Value {
	Value::from(value)
}
