// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! Shared building blocks for tabledesk.
//!
//! Everything the query compiler, the storage backend and the engine have to agree on lives
//! here: scalar values and rows, the identifier grammar, the error taxonomy and the three
//! collaborator interfaces (`SchemaCatalog`, `RelationalStore`, `AuditLog`).

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use error::{BoxError, Error, Result};
pub use ident::{Ident, is_identifier};
pub use row::Row;
pub use value::Value;

mod error;
mod ident;
pub mod interface;
mod row;
mod value;
