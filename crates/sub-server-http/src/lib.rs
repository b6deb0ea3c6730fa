// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! HTTP subsystem for tabledesk.
//!
//! An Axum server exposing the engine as JSON under `/api/tableManager`. Engine calls are
//! synchronous and run on tokio's blocking pool, one task per request.
//!
//! # Endpoints
//!
//! - `GET /health`
//! - `POST /api/tableManager/crossTablePreview`
//! - `POST /api/tableManager/crossTableBatchUpdate`
//! - `GET /api/tableManager/updateLogs`
//! - table and row administration under the same prefix, see [`routes::router`]
//!
//! # Example
//!
//! ```ignore
//! let engine = Engine::sqlite(SqliteBackend::new(SqliteConfig::new("data"))?);
//! let mut http = HttpSubsystem::new("0.0.0.0:3000", AppState::new(engine));
//! http.start().await?;
//! // ...
//! http.shutdown().await;
//! ```

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod subsystem;

pub use error::{AppError, ErrorResponse};
pub use routes::router;
pub use state::AppState;
pub use subsystem::HttpSubsystem;
