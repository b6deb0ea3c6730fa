// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use std::{env, path::PathBuf, time::Duration};

use tabledesk_store_sqlite::SqliteConfig;

pub const BIND_ADDR_ENV: &str = "TABLEDESK_BIND_ADDR";
pub const DATABASE_ENV: &str = "TABLEDESK_DATABASE";
pub const BUSY_TIMEOUT_ENV: &str = "TABLEDESK_BUSY_TIMEOUT_MS";

#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub bind_addr: String,
	pub sqlite: SqliteConfig,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			bind_addr: "0.0.0.0:3000".to_string(),
			sqlite: SqliteConfig::default(),
		}
	}
}

impl ServerConfig {
	/// Defaults overridden by whichever `TABLEDESK_*` variables are set.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let mut config = Self::default();
		if let Some(addr) = lookup(BIND_ADDR_ENV) {
			config.bind_addr = addr;
		}
		if let Some(path) = lookup(DATABASE_ENV) {
			config.sqlite = match path.as_str() {
				":memory:" => SqliteConfig::in_memory(),
				_ => SqliteConfig::new(PathBuf::from(path)),
			};
		}
		if let Some(millis) = lookup(BUSY_TIMEOUT_ENV) {
			let millis: u64 = millis.parse().map_err(|_| ConfigError::Invalid {
				key: BUSY_TIMEOUT_ENV,
				value: millis.clone(),
			})?;
			config.sqlite = config.sqlite.busy_timeout(Duration::from_millis(millis));
		}
		Ok(config)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("{key} has an invalid value: {value:?}")]
	Invalid {
		key: &'static str,
		value: String,
	},
}
