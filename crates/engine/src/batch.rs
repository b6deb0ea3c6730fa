// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use chrono::{DateTime, Utc};
use tabledesk_core::{
	Error, Ident, Result, Value,
	interface::{AUDIT_TABLE, Outcome, PreImage, UpdateLogEntry, key_column},
};
use tabledesk_query::{Condition, compile};
use tracing::{debug, error, instrument};

use crate::Engine;

pub const DEFAULT_OPERATOR: &str = "administrator";

const SUCCESS: &str = "success";

/// Sets one column to one value on every row of `table` matched by the condition's clauses for
/// that table.
#[derive(Debug, Clone)]
pub struct BatchUpdate {
	pub condition: Condition,
	pub table: String,
	pub field: String,
	pub value: Value,
	pub operator: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchUpdateOutcome {
	pub affected: usize,
	pub old_values: Vec<PreImage>,
	pub time: DateTime<Utc>,
	pub operator: String,
	pub log_id: i64,
}

impl Engine {
	/// Runs a batch update and records it in the audit log.
	///
	/// Every precondition is checked against the request and the catalog before the store sees
	/// a statement. The pre-image read and the update share one write-locked transaction, so the
	/// captured values are exactly the ones overwritten.
	#[instrument(name = "engine::batch_update", level = "info", skip(self, request), fields(table = %request.table, field = %request.field))]
	pub fn batch_update(&self, request: BatchUpdate) -> Result<BatchUpdateOutcome> {
		let table = Ident::new(request.table.as_str())?;
		let field = Ident::new(request.field.as_str())?;
		if table.matches_loosely(AUDIT_TABLE) {
			return Err(Error::validation(format!("table {AUDIT_TABLE} is reserved")));
		}

		let predicates = request.condition.predicates_matching(&table);
		if predicates.is_empty() {
			return Err(Error::validation(format!("no effective condition for table {table}")));
		}

		let columns = self.catalog.describe(&table)?;
		if !columns.iter().any(|c| field == c.name.as_str()) {
			return Err(Error::validation(format!("field {field} does not exist on table {table}")));
		}
		let Some(key) = key_column(&columns) else {
			return Err(Error::UnknownTable(table.to_string()));
		};
		// every column of a composite key is protected, not only the one identifying pre-images
		if field == key.name.as_str() || columns.iter().any(|c| c.primary_key && field == c.name.as_str()) {
			return Err(Error::validation(format!("key column {field} cannot be batch updated")));
		}

		let statements = [
			compile::pre_image(&table, &key.name, &field, &predicates),
			compile::batch_update(&table, &field, request.value.clone(), &predicates),
		];
		let mut outcomes = self.store.transaction(&statements)?.into_iter();
		let old_values: Vec<PreImage> = outcomes
			.next()
			.map(Outcome::into_rows)
			.unwrap_or_default()
			.into_iter()
			.map(|row| PreImage {
				id: row.get("id").cloned().unwrap_or(Value::Null),
				value: row.get("value").cloned().unwrap_or(Value::Null),
			})
			.collect();
		let affected = outcomes.next().map(|o| o.affected()).unwrap_or_default();
		debug!(affected, captured = old_values.len(), "batch update committed");

		let operator = request.operator.filter(|o| !o.trim().is_empty()).unwrap_or_else(|| DEFAULT_OPERATOR.to_string());
		let entry = UpdateLogEntry {
			id: None,
			time: Utc::now(),
			operator,
			condition: request.condition.text().to_string(),
			table_name: table.to_string(),
			field: field.to_string(),
			old_values,
			new_value: request.value,
			count: affected,
			result: SUCCESS.to_string(),
		};

		let log_id = match self.audit.append(&entry) {
			Ok(id) => id,
			Err(cause) => {
				error!(affected, error = %cause, "batch update committed but the audit record was not written");
				return Err(Error::LoggedFailure {
					affected,
					cause: Box::new(cause),
				});
			}
		};

		Ok(BatchUpdateOutcome {
			affected,
			old_values: entry.old_values,
			time: entry.time,
			operator: entry.operator,
			log_id,
		})
	}

	/// The audit log, newest entry first.
	#[instrument(name = "engine::update_logs", level = "debug", skip(self))]
	pub fn update_logs(&self) -> Result<Vec<UpdateLogEntry>> {
		self.audit.list()
	}
}
