// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! Lifecycle of the HTTP server: startup, health, and graceful shutdown.

use std::{
	io,
	net::SocketAddr,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};

use parking_lot::RwLock;
use tokio::{net::TcpListener, sync::oneshot};

use crate::{routes::router, state::AppState};

/// HTTP server subsystem.
///
/// ```ignore
/// let mut http = HttpSubsystem::new("0.0.0.0:3000", state);
///
/// http.start().await?;
/// // Server is now accepting connections
///
/// http.shutdown().await;
/// // Server has gracefully stopped
/// ```
pub struct HttpSubsystem {
	/// Address to bind the server to.
	bind_addr: String,
	/// Actual bound address (available after start).
	actual_addr: RwLock<Option<SocketAddr>>,
	state: AppState,
	running: Arc<AtomicBool>,
	shutdown_tx: Option<oneshot::Sender<()>>,
	shutdown_complete_rx: Option<oneshot::Receiver<()>>,
}

impl HttpSubsystem {
	pub fn new(bind_addr: impl Into<String>, state: AppState) -> Self {
		Self {
			bind_addr: bind_addr.into(),
			actual_addr: RwLock::new(None),
			state,
			running: Arc::new(AtomicBool::new(false)),
			shutdown_tx: None,
			shutdown_complete_rx: None,
		}
	}

	/// Get the actual bound address (available after start).
	pub fn local_addr(&self) -> Option<SocketAddr> {
		*self.actual_addr.read()
	}

	pub fn port(&self) -> Option<u16> {
		self.local_addr().map(|a| a.port())
	}

	pub fn is_running(&self) -> bool {
		self.running.load(Ordering::SeqCst)
	}

	/// Binds the listener and spawns the server onto the current runtime. Calling it again
	/// while started is a no-op.
	pub async fn start(&mut self) -> io::Result<SocketAddr> {
		if let Some(addr) = self.local_addr().filter(|_| self.shutdown_tx.is_some()) {
			return Ok(addr);
		}

		let listener = TcpListener::bind(&self.bind_addr).await?;
		let actual_addr = listener.local_addr()?;
		*self.actual_addr.write() = Some(actual_addr);
		tracing::info!("HTTP server bound to {}", actual_addr);

		let (shutdown_tx, shutdown_rx) = oneshot::channel();
		let (complete_tx, complete_rx) = oneshot::channel();

		let app = router(self.state.clone());
		let running = self.running.clone();
		running.store(true, Ordering::SeqCst);

		tokio::spawn(async move {
			let server = axum::serve(listener, app).with_graceful_shutdown(async {
				shutdown_rx.await.ok();
				tracing::info!("HTTP server received shutdown signal");
			});

			if let Err(e) = server.await {
				tracing::error!("HTTP server error: {}", e);
			}

			running.store(false, Ordering::SeqCst);
			let _ = complete_tx.send(());
			tracing::info!("HTTP server stopped");
		});

		self.shutdown_tx = Some(shutdown_tx);
		self.shutdown_complete_rx = Some(complete_rx);
		Ok(actual_addr)
	}

	/// Stops accepting connections and waits for in-flight requests to finish.
	pub async fn shutdown(&mut self) {
		if let Some(tx) = self.shutdown_tx.take() {
			let _ = tx.send(());
		}
		if let Some(rx) = self.shutdown_complete_rx.take() {
			let _ = rx.await;
		}
	}
}
