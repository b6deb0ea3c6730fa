// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tabledesk_core::{Error, Result};
use tracing::instrument;

use crate::{SqliteConfig, audit, connection::build_pool};

/// SQLite-backed catalog, store and audit log.
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone)]
pub struct SqliteBackend {
	inner: Arc<SqliteBackendInner>,
}

struct SqliteBackendInner {
	pool: Pool<SqliteConnectionManager>,
}

impl SqliteBackend {
	#[instrument(name = "store::sqlite::new", level = "info", skip(config), fields(
		db_path = ?config.path,
		journal_mode = %config.journal_mode.as_str(),
		pool = config.max_pool_size
	))]
	pub fn new(config: SqliteConfig) -> Result<Self> {
		let pool = build_pool(&config)?;
		let backend = Self {
			inner: Arc::new(SqliteBackendInner {
				pool,
			}),
		};
		audit::ensure_table(&*backend.conn()?)?;
		Ok(backend)
	}

	/// Create an in-memory SQLite backend for testing.
	pub fn in_memory() -> Result<Self> {
		Self::new(SqliteConfig::in_memory())
	}

	/// Checks a connection out of the pool. It goes back when the guard drops.
	pub(crate) fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
		self.inner.pool.get().map_err(|e| Error::store("acquire connection", e))
	}
}
