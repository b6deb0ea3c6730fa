// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use tabledesk_core::interface::Statement;
use tracing::debug;

use super::{quote_name, render_predicates};
use crate::{Condition, JoinPlan};

/// Upper bound on rows returned by a preview.
pub const PREVIEW_LIMIT: usize = 100;

/// Joins every table of `plan` with outer joins, so base rows without a match on a joined table
/// are kept, and filters on every predicate of `condition`.
pub fn preview(condition: &Condition, plan: &JoinPlan) -> Statement {
	let mut params = Vec::new();
	let mut sql = format!("SELECT * FROM {}", plan.base_table.quoted());

	for step in &plan.steps {
		sql.push_str(&format!(
			" LEFT JOIN {joined} ON {anchor}.{anchor_column} = {joined}.{joined_column}",
			joined = step.joined_table.quoted(),
			anchor = step.anchor_table.quoted(),
			anchor_column = quote_name(&step.anchor_column),
			joined_column = quote_name(&step.joined_column),
		));
	}

	let filters: Vec<String> = condition
		.tables()
		.iter()
		.flat_map(|table| render_predicates(condition.predicates(table), Some(table), &mut params))
		.collect();
	if !filters.is_empty() {
		sql.push_str(" WHERE ");
		sql.push_str(&filters.join(" AND "));
	}

	sql.push_str(&format!(" LIMIT {PREVIEW_LIMIT}"));
	debug!(tables = plan.steps.len() + 1, params = params.len(), "compiled preview");
	Statement::query("cross-table preview", sql, params)
}
