// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure an engine operation can report.
///
/// The `Display` form of each variant is safe to hand to a caller. Driver detail is only ever
/// reachable through `source()`.
#[derive(Debug, Error)]
pub enum Error {
	/// Rejected before any data statement was issued.
	#[error("{0}")]
	Validation(String),

	#[error("table {0} does not exist")]
	UnknownTable(String),

	/// Metadata lookup failed.
	#[error("{operation} failed")]
	Schema {
		operation: String,
		#[source]
		cause: BoxError,
	},

	/// Statement execution failed; the surrounding transaction was rolled back.
	#[error("{operation} failed")]
	Store {
		operation: String,
		#[source]
		cause: BoxError,
	},

	/// The store refused the statement because of a declared constraint.
	#[error("{operation} violates a table constraint")]
	Constraint {
		operation: String,
		#[source]
		cause: BoxError,
	},

	/// The drop target is still referenced by foreign keys of other tables.
	#[error("table {table} is referenced by {}", dependents.join(", "))]
	Dependent {
		table: String,
		dependents: Vec<String>,
	},

	/// The mutation committed but its audit record could not be written.
	#[error("{affected} rows were updated but the audit record could not be written")]
	LoggedFailure {
		affected: usize,
		#[source]
		cause: Box<Error>,
	},
}

impl Error {
	pub fn validation(message: impl Into<String>) -> Self {
		Error::Validation(message.into())
	}

	pub fn schema(operation: impl Into<String>, cause: impl Into<BoxError>) -> Self {
		Error::Schema {
			operation: operation.into(),
			cause: cause.into(),
		}
	}

	pub fn store(operation: impl Into<String>, cause: impl Into<BoxError>) -> Self {
		Error::Store {
			operation: operation.into(),
			cause: cause.into(),
		}
	}

	pub fn constraint(operation: impl Into<String>, cause: impl Into<BoxError>) -> Self {
		Error::Constraint {
			operation: operation.into(),
			cause: cause.into(),
		}
	}

	/// Machine-readable code used on the wire.
	pub fn code(&self) -> &'static str {
		match self {
			Error::Validation(_) => "VALIDATION_ERROR",
			Error::UnknownTable(_) => "UNKNOWN_TABLE",
			Error::Schema {
				..
			} => "SCHEMA_ERROR",
			Error::Store {
				..
			} => "STORE_ERROR",
			Error::Constraint {
				..
			} => "CONSTRAINT_VIOLATION",
			Error::Dependent {
				..
			} => "TABLE_REFERENCED",
			Error::LoggedFailure {
				..
			} => "LOGGED_FAILURE",
		}
	}
}
