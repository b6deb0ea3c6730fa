// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use serde::Serialize;
use tabledesk_core::{Result, Row};
use tabledesk_query::{Condition, PlanOutcome, compile, plan};
use tracing::{debug, instrument};

use crate::Engine;

/// At most [`compile::PREVIEW_LIMIT`] joined rows matching a condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Preview {
	pub count: usize,
	pub preview: Vec<Row>,
	/// Column names of the first row, empty when nothing matched.
	pub fields: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl Preview {
	fn from_rows(rows: Vec<Row>) -> Self {
		let fields = rows.first().map(|row| row.columns().map(String::from).collect()).unwrap_or_default();
		Self {
			count: rows.len(),
			preview: rows,
			fields,
			message: None,
		}
	}

	fn with_message(message: impl Into<String>) -> Self {
		Self {
			message: Some(message.into()),
			..Self::default()
		}
	}
}

impl Engine {
	/// Joins every table the condition mentions along foreign keys and returns the matching rows.
	///
	/// Tables that cannot be reached from the first mentioned table produce an empty preview
	/// with an explanatory message; no data query is issued in that case.
	#[instrument(name = "engine::preview", level = "debug", skip(self, condition), fields(tables = condition.tables().len()))]
	pub fn preview(&self, condition: &Condition) -> Result<Preview> {
		let tables = condition.tables();
		if tables.is_empty() {
			return Ok(Preview::default());
		}

		let edges = if tables.len() > 1 {
			self.catalog.foreign_keys(tables.as_slice())?
		} else {
			Vec::new()
		};

		let join_plan = match plan(tables, &edges) {
			PlanOutcome::Empty => return Ok(Preview::default()),
			PlanOutcome::Planned(join_plan) => join_plan,
			PlanOutcome::Disconnected {
				base_table,
				unreachable,
			} => {
				let unreachable: Vec<&str> = unreachable.iter().map(|t| t.as_str()).collect();
				return Ok(Preview::with_message(format!(
					"no foreign-key path joins {} to {base_table}; the tables cannot be joined automatically",
					unreachable.join(", ")
				)));
			}
		};

		let statement = compile::preview(condition, &join_plan);
		debug!(base = %join_plan.base_table, joins = join_plan.steps.len(), params = statement.params.len(), "preview compiled");
		let rows = self.store.query(&statement)?;
		Ok(Preview::from_rows(rows))
	}
}
