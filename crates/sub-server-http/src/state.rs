// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use tabledesk_engine::Engine;

pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 64;

/// Shared by every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
	engine: Engine,
	max_concurrent_requests: usize,
}

impl AppState {
	pub fn new(engine: Engine) -> Self {
		Self {
			engine,
			max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
		}
	}

	pub fn with_max_concurrent_requests(mut self, max: usize) -> Self {
		self.max_concurrent_requests = max;
		self
	}

	pub fn engine_clone(&self) -> Engine {
		self.engine.clone()
	}

	pub fn max_concurrent_requests(&self) -> usize {
		self.max_concurrent_requests
	}
}
