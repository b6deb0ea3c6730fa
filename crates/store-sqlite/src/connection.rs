// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! Pool construction.

use std::path::PathBuf;

use r2d2::Pool;
use r2d2_sqlite::{SqliteConnectionManager, rusqlite};
use tabledesk_core::{Error, Result};
use tracing::debug;

use crate::{DbPath, OpenFlags, SqliteConfig};

/// Resolve the database file, creating parent directories as needed.
pub(crate) fn resolve_db_path(path: &DbPath) -> Option<PathBuf> {
	match path {
		DbPath::Memory => None,
		DbPath::File(config_path) => {
			if config_path.is_dir() || config_path.extension().is_none() {
				std::fs::create_dir_all(config_path).ok();
				Some(config_path.join("tabledesk.db"))
			} else {
				if let Some(parent) = config_path.parent() {
					std::fs::create_dir_all(parent).ok();
				}
				Some(config_path.clone())
			}
		}
	}
}

/// Convert our OpenFlags to rusqlite OpenFlags.
pub(crate) fn convert_flags(flags: &OpenFlags) -> rusqlite::OpenFlags {
	let mut rusqlite_flags = rusqlite::OpenFlags::empty();

	if flags.read_write {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE;
	}
	if flags.create {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_CREATE;
	}
	if flags.full_mutex {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_FULL_MUTEX;
	}
	if flags.no_mutex {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX;
	}
	if flags.uri {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_URI;
	}

	rusqlite_flags
}

/// Builds the pool. Every connection enforces foreign keys and waits `busy_timeout` on locks.
pub(crate) fn build_pool(config: &SqliteConfig) -> Result<Pool<SqliteConnectionManager>> {
	let busy_timeout = config.busy_timeout;
	let synchronous = config.synchronous_mode.as_str();

	let (manager, max_size) = match resolve_db_path(&config.path) {
		Some(path) => (SqliteConnectionManager::file(path), config.max_pool_size.max(1)),
		// each connection to ":memory:" is its own database, so exactly one may exist
		None => (SqliteConnectionManager::memory(), 1),
	};
	let manager = manager.with_flags(convert_flags(&config.flags)).with_init(move |conn| {
		conn.busy_timeout(busy_timeout)?;
		conn.pragma_update(None, "foreign_keys", "ON")?;
		conn.pragma_update(None, "synchronous", synchronous)?;
		Ok(())
	});

	let pool = Pool::builder()
		.max_size(max_size)
		.min_idle(Some(1))
		.idle_timeout(None)
		.max_lifetime(None)
		.build(manager)
		.map_err(|e| Error::store("open database", e))?;

	let conn = pool.get().map_err(|e| Error::store("open database", e))?;
	let journal_mode: String = conn
		.pragma_update_and_check(None, "journal_mode", config.journal_mode.as_str(), |row| row.get(0))
		.map_err(|e| Error::store("configure journal mode", e))?;
	debug!(%journal_mode, max_size, "sqlite pool ready");

	Ok(pool)
}
