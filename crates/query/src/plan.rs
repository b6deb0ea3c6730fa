// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! Greedy spanning-tree join planning over foreign-key edges.
//!
//! Tables are few and the key graph is sparse, so the planner makes no attempt at cost-based
//! ordering. Each round it looks for the first (joined table, new table) pair linked by an edge,
//! scanning both sides in table-set order and the edges in metadata order, and attaches the new
//! table to the plan. The result is fully determined by those two orders.

use tabledesk_core::{Ident, interface::ForeignKey};
use tracing::debug;

use crate::TableSet;

/// `LEFT JOIN joined_table ON anchor_table.anchor_column = joined_table.joined_column`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinStep {
	pub joined_table: Ident,
	pub anchor_table: Ident,
	pub anchor_column: String,
	pub joined_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPlan {
	pub base_table: Ident,
	pub steps: Vec<JoinStep>,
}

impl JoinPlan {
	/// Tables in join order, base first.
	pub fn tables(&self) -> impl Iterator<Item = &Ident> {
		std::iter::once(&self.base_table).chain(self.steps.iter().map(|s| &s.joined_table))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
	/// No tables were referenced.
	Empty,
	/// Every table is reachable from the base table.
	Planned(JoinPlan),
	/// Some tables share no foreign-key path with the base table.
	Disconnected {
		base_table: Ident,
		unreachable: Vec<Ident>,
	},
}

pub fn plan(tables: &TableSet, edges: &[ForeignKey]) -> PlanOutcome {
	let Some(base_table) = tables.base() else {
		return PlanOutcome::Empty;
	};

	let mut used = vec![false; tables.len()];
	used[0] = true;
	let mut steps = Vec::with_capacity(tables.len() - 1);

	for _ in 1..tables.len() {
		let Some((index, step)) = next_step(tables, &used, edges) else {
			break;
		};
		used[index] = true;
		steps.push(step);
	}

	if steps.len() + 1 < tables.len() {
		let unreachable: Vec<Ident> =
			tables.iter().zip(&used).filter(|(_, used)| !**used).map(|(t, _)| t.clone()).collect();
		debug!(base = %base_table, ?unreachable, "join plan is disconnected");
		return PlanOutcome::Disconnected {
			base_table: base_table.clone(),
			unreachable,
		};
	}

	PlanOutcome::Planned(JoinPlan {
		base_table: base_table.clone(),
		steps,
	})
}

fn next_step(tables: &TableSet, used: &[bool], edges: &[ForeignKey]) -> Option<(usize, JoinStep)> {
	for (anchor, _) in tables.iter().zip(used).filter(|(_, used)| **used) {
		for (index, candidate) in tables.iter().enumerate().filter(|(i, _)| !used[*i]) {
			let Some(edge) = edges.iter().find(|e| e.connects(anchor.as_str(), candidate.as_str())) else {
				continue;
			};
			let (anchor_column, joined_column) = if edge.child_table == anchor.as_str() {
				(&edge.child_column, &edge.parent_column)
			} else {
				(&edge.parent_column, &edge.child_column)
			};
			return Some((
				index,
				JoinStep {
					joined_table: candidate.clone(),
					anchor_table: anchor.clone(),
					anchor_column: anchor_column.clone(),
					joined_column: joined_column.clone(),
				},
			));
		}
	}
	None
}
