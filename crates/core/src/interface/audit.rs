// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, Value};

/// Name of the table that holds update log entries. It is reserved and never administered.
pub const AUDIT_TABLE: &str = "update_log";

/// The value a column held right before a batch update, keyed by the row's key column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreImage {
	pub id: Value,
	pub value: Value,
}

/// The permanent record of one batch update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateLogEntry {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<i64>,
	pub time: DateTime<Utc>,
	pub operator: String,
	pub condition: String,
	pub table_name: String,
	pub field: String,
	pub old_values: Vec<PreImage>,
	pub new_value: Value,
	pub count: usize,
	pub result: String,
}

/// Append-only ledger. Entries are never modified or removed once appended.
pub trait AuditLog: Send + Sync {
	/// Persists `entry` and returns the id assigned to it.
	fn append(&self, entry: &UpdateLogEntry) -> Result<i64>;

	/// All entries, newest first.
	fn list(&self) -> Result<Vec<UpdateLogEntry>>;
}
