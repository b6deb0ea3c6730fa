// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

mod config;

use tabledesk_engine::Engine;
use tabledesk_store_sqlite::SqliteBackend;
use tabledesk_sub_server_http::{AppState, HttpSubsystem};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let config = ServerConfig::from_env()?;
	let backend = SqliteBackend::new(config.sqlite.clone())?;
	let state = AppState::new(Engine::sqlite(backend));

	let mut http = HttpSubsystem::new(config.bind_addr.clone(), state);
	let addr = http.start().await?;
	tracing::info!(%addr, "tabledesk server started");

	tokio::signal::ctrl_c().await?;
	tracing::info!("shutting down");
	http.shutdown().await;
	Ok(())
}
