// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tabledesk_core::{Error, Ident, Result, Value};

/// `table<sep>field='value'`, where `<sep>` is the ASCII period or one of its look-alikes that
/// CJK input methods produce.
static CLAUSE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"([A-Za-z0-9_\x{4e00}-\x{9fa5}]+)[.．｡。·•●]([A-Za-z0-9_\x{4e00}-\x{9fa5}]+)\s*=\s*'([^']*)'")
		.expect("clause pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
	Eq,
	NotEq,
	Lt,
	LtEq,
	Gt,
	GtEq,
	Like,
}

impl Operator {
	pub fn parse(s: &str) -> Result<Self> {
		match s.trim() {
			"=" | "==" => Ok(Operator::Eq),
			"!=" | "<>" => Ok(Operator::NotEq),
			"<" => Ok(Operator::Lt),
			"<=" => Ok(Operator::LtEq),
			">" => Ok(Operator::Gt),
			">=" => Ok(Operator::GtEq),
			op if op.eq_ignore_ascii_case("like") => Ok(Operator::Like),
			op => Err(Error::validation(format!("operator {op:?} is not allowed"))),
		}
	}

	pub fn as_sql(&self) -> &'static str {
		match self {
			Operator::Eq => "=",
			Operator::NotEq => "<>",
			Operator::Lt => "<",
			Operator::LtEq => "<=",
			Operator::Gt => ">",
			Operator::GtEq => ">=",
			Operator::Like => "LIKE",
		}
	}
}

impl Display for Operator {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Operator::Like => f.write_str(" LIKE "),
			op => f.write_str(op.as_sql()),
		}
	}
}

/// One predicate on a single column; the table it belongs to is implied by context.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
	pub field: Ident,
	pub op: Operator,
	pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionClause {
	pub table: Ident,
	pub field: Ident,
	pub op: Operator,
	pub value: Value,
}

impl ConditionClause {
	pub fn predicate(&self) -> Predicate {
		Predicate {
			field: self.field.clone(),
			op: self.op,
			value: self.value.clone(),
		}
	}
}

impl Display for ConditionClause {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}{}'{}'", self.table, self.field, self.op, self.value)
	}
}

/// A structured clause as supplied by a caller, validated by [`Condition::from_clauses`].
#[derive(Debug, Clone, Deserialize)]
pub struct ClauseInput {
	pub table: String,
	pub field: String,
	#[serde(default)]
	pub op: Option<String>,
	pub value: serde_json::Value,
}

impl TryFrom<ClauseInput> for ConditionClause {
	type Error = Error;

	fn try_from(input: ClauseInput) -> Result<Self> {
		let op = match input.op.as_deref() {
			Some(op) => Operator::parse(op)?,
			None => Operator::Eq,
		};
		Ok(Self {
			table: Ident::new(input.table)?,
			field: Ident::new(input.field)?,
			op,
			value: Value::try_from(input.value)?,
		})
	}
}

/// Distinct table names in the order they were first mentioned. The first one is the base table
/// of any join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSet(Vec<Ident>);

impl TableSet {
	fn push(&mut self, table: &Ident) {
		if !self.0.contains(table) {
			self.0.push(table.clone());
		}
	}

	pub fn base(&self) -> Option<&Ident> {
		self.0.first()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Ident> {
		self.0.iter()
	}

	pub fn as_slice(&self) -> &[Ident] {
		&self.0
	}

	pub fn position(&self, table: &str) -> Option<usize> {
		self.0.iter().position(|t| t == table)
	}
}

impl<'a> IntoIterator for &'a TableSet {
	type Item = &'a Ident;
	type IntoIter = std::slice::Iter<'a, Ident>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

/// An AND-combination of clauses, grouped per table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
	text: String,
	clauses: Vec<ConditionClause>,
	tables: TableSet,
	predicates: IndexMap<Ident, Vec<Predicate>>,
}

impl Condition {
	/// Extracts every `table.field='value'` clause from free text. Text between clauses is
	/// ignored; input with no clause yields an empty condition.
	pub fn parse(text: &str) -> Self {
		let clauses = CLAUSE
			.captures_iter(text)
			.filter_map(|captures| {
				// the pattern only admits identifier characters, so these never fail
				let table = Ident::new(&captures[1]).ok()?;
				let field = Ident::new(&captures[2]).ok()?;
				Some(ConditionClause {
					table,
					field,
					op: Operator::Eq,
					value: Value::Text(captures[3].to_string()),
				})
			})
			.collect();
		Self::build(text.to_string(), clauses)
	}

	/// Validates structured clauses. The condition text becomes their canonical rendering.
	pub fn from_clauses(inputs: Vec<ClauseInput>) -> Result<Self> {
		let clauses = inputs.into_iter().map(ConditionClause::try_from).collect::<Result<Vec<_>>>()?;
		let text = clauses.iter().map(ToString::to_string).collect::<Vec<_>>().join(" AND ");
		Ok(Self::build(text, clauses))
	}

	fn build(text: String, clauses: Vec<ConditionClause>) -> Self {
		let mut tables = TableSet::default();
		let mut predicates: IndexMap<Ident, Vec<Predicate>> = IndexMap::new();
		for clause in &clauses {
			tables.push(&clause.table);
			predicates.entry(clause.table.clone()).or_default().push(clause.predicate());
		}
		Self {
			text,
			clauses,
			tables,
			predicates,
		}
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn is_empty(&self) -> bool {
		self.clauses.is_empty()
	}

	pub fn tables(&self) -> &TableSet {
		&self.tables
	}

	pub fn clauses(&self) -> &[ConditionClause] {
		&self.clauses
	}

	pub fn predicates(&self, table: &Ident) -> &[Predicate] {
		self.predicates.get(table).map(Vec::as_slice).unwrap_or_default()
	}

	/// Predicates of every clause whose table equals `table` ignoring case and whitespace, in
	/// the order the clauses appeared.
	pub fn predicates_matching(&self, table: &Ident) -> Vec<Predicate> {
		self.clauses.iter().filter(|c| table.matches_loosely(c.table.as_str())).map(ConditionClause::predicate).collect()
	}
}
