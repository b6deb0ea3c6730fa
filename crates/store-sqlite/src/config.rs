// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use std::{path::PathBuf, time::Duration};

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbPath {
	/// A database file, or a directory that will hold `tabledesk.db`.
	File(PathBuf),
	/// A private in-memory database, kept alive by a single pooled connection.
	Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFlags {
	pub read_write: bool,
	pub create: bool,
	pub full_mutex: bool,
	pub no_mutex: bool,
	pub uri: bool,
}

impl Default for OpenFlags {
	fn default() -> Self {
		Self {
			read_write: true,
			create: true,
			full_mutex: false,
			no_mutex: true,
			uri: false,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
	Delete,
	Truncate,
	Wal,
	Memory,
}

impl JournalMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			JournalMode::Delete => "DELETE",
			JournalMode::Truncate => "TRUNCATE",
			JournalMode::Wal => "WAL",
			JournalMode::Memory => "MEMORY",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynchronousMode {
	Off,
	Normal,
	Full,
}

impl SynchronousMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			SynchronousMode::Off => "OFF",
			SynchronousMode::Normal => "NORMAL",
			SynchronousMode::Full => "FULL",
		}
	}
}

/// Configuration for [`SqliteBackend`](crate::SqliteBackend).
#[derive(Debug, Clone)]
pub struct SqliteConfig {
	pub path: DbPath,
	pub flags: OpenFlags,
	pub journal_mode: JournalMode,
	pub synchronous_mode: SynchronousMode,
	/// How long a statement waits for another connection's lock before failing.
	pub busy_timeout: Duration,
	pub max_pool_size: u32,
}

impl SqliteConfig {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: DbPath::File(path.into()),
			flags: OpenFlags::default(),
			journal_mode: JournalMode::Wal,
			synchronous_mode: SynchronousMode::Full,
			busy_timeout: Duration::from_secs(5),
			max_pool_size: 8,
		}
	}

	/// Relaxed durability for tests and scratch databases.
	pub fn fast(path: impl Into<PathBuf>) -> Self {
		Self {
			synchronous_mode: SynchronousMode::Off,
			..Self::new(path)
		}
	}

	pub fn in_memory() -> Self {
		Self {
			path: DbPath::Memory,
			journal_mode: JournalMode::Memory,
			synchronous_mode: SynchronousMode::Off,
			max_pool_size: 1,
			..Self::new("")
		}
	}

	pub fn journal_mode(mut self, mode: JournalMode) -> Self {
		self.journal_mode = mode;
		self
	}

	pub fn synchronous_mode(mut self, mode: SynchronousMode) -> Self {
		self.synchronous_mode = mode;
		self
	}

	pub fn busy_timeout(mut self, timeout: Duration) -> Self {
		self.busy_timeout = timeout;
		self
	}

	pub fn max_pool_size(mut self, size: u32) -> Self {
		self.max_pool_size = size.max(1);
		self
	}
}

impl Default for SqliteConfig {
	fn default() -> Self {
		Self::new("data")
	}
}
