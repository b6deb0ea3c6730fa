// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! Contracts between the engine and whatever backs it.

pub use audit::{AUDIT_TABLE, AuditLog, PreImage, UpdateLogEntry};
pub use catalog::{ColumnDef, ForeignKey, SchemaCatalog, key_column};
pub use store::{Outcome, RelationalStore, Statement, StatementKind};

mod audit;
mod catalog;
mod store;
