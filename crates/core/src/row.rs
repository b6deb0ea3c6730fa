// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Value;

/// One result row, column name to value, in the column order of the statement.
///
/// A later column with a name that is already present replaces the earlier value but keeps the
/// earlier position, so `SELECT *` over a join yields one entry per distinct column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, Value>);

impl Row {
	pub fn new() -> Self {
		Self(IndexMap::new())
	}

	pub fn insert(&mut self, column: impl Into<String>, value: Value) {
		self.0.insert(column.into(), value);
	}

	pub fn get(&self, column: &str) -> Option<&Value> {
		self.0.get(column)
	}

	pub fn columns(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}
}

impl IntoIterator for Row {
	type Item = (String, Value);
	type IntoIter = indexmap::map::IntoIter<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl FromIterator<(String, Value)> for Row {
	fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}
