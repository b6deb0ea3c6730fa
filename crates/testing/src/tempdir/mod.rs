// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use uuid::Uuid;

struct Cleanup(PathBuf);

impl Drop for Cleanup {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.0);
	}
}

/// Runs `f` with a fresh directory that is removed afterwards, also when `f` panics.
pub fn temp_dir<F, T>(f: F) -> std::io::Result<T>
where
	F: FnOnce(&Path) -> T,
{
	let mut path = env::temp_dir();
	path.push(format!("tabledesk-{}", Uuid::new_v4()));

	fs::create_dir(&path)?;
	let cleanup = Cleanup(path);
	Ok(f(&cleanup.0))
}
