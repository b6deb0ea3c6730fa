// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use std::{ops::Deref, sync::Arc};

use tabledesk_core::interface::{AuditLog, RelationalStore, SchemaCatalog};
use tabledesk_store_sqlite::SqliteBackend;

/// Shared handle to the three collaborators every operation works through.
///
/// Cloning is cheap. The engine holds no state of its own; concurrent operations coordinate
/// only through the store's transactions.
#[derive(Clone)]
pub struct Engine(Arc<EngineInner>);

pub struct EngineInner {
	pub(crate) catalog: Arc<dyn SchemaCatalog>,
	pub(crate) store: Arc<dyn RelationalStore>,
	pub(crate) audit: Arc<dyn AuditLog>,
}

impl Deref for Engine {
	type Target = EngineInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Engine {
	pub fn new(catalog: Arc<dyn SchemaCatalog>, store: Arc<dyn RelationalStore>, audit: Arc<dyn AuditLog>) -> Self {
		Self(Arc::new(EngineInner {
			catalog,
			store,
			audit,
		}))
	}

	/// One SQLite backend in all three roles.
	pub fn sqlite(backend: SqliteBackend) -> Self {
		let backend = Arc::new(backend);
		Self::new(backend.clone(), backend.clone(), backend)
	}
}

impl EngineInner {
	pub fn store(&self) -> &dyn RelationalStore {
		self.store.as_ref()
	}
}
