// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use crate::{Result, Row, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
	/// Returns rows.
	Query,
	/// Returns an affected-row count.
	Execute,
}

/// SQL text plus its positional parameters (`?1`, `?2`, ...).
///
/// `label` names the operation in error reports so that callers never see SQL or driver text.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
	pub label: &'static str,
	pub sql: String,
	pub params: Vec<Value>,
	pub kind: StatementKind,
}

impl Statement {
	pub fn query(label: &'static str, sql: impl Into<String>, params: Vec<Value>) -> Self {
		Self {
			label,
			sql: sql.into(),
			params,
			kind: StatementKind::Query,
		}
	}

	pub fn execute(label: &'static str, sql: impl Into<String>, params: Vec<Value>) -> Self {
		Self {
			label,
			sql: sql.into(),
			params,
			kind: StatementKind::Execute,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
	Rows(Vec<Row>),
	Affected(usize),
}

impl Outcome {
	pub fn into_rows(self) -> Vec<Row> {
		match self {
			Outcome::Rows(rows) => rows,
			Outcome::Affected(_) => Vec::new(),
		}
	}

	pub fn affected(&self) -> usize {
		match self {
			Outcome::Rows(rows) => rows.len(),
			Outcome::Affected(n) => *n,
		}
	}
}

pub trait RelationalStore: Send + Sync {
	fn query(&self, statement: &Statement) -> Result<Vec<Row>>;

	fn execute(&self, statement: &Statement) -> Result<usize>;

	/// Runs `statements` in order inside one write-locked transaction. Either every statement
	/// commits or none does.
	fn transaction(&self, statements: &[Statement]) -> Result<Vec<Outcome>>;
}
