// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

//! HTTP error handling and response formatting.
//!
//! Only the sanitized `Display` text of an engine error reaches the client. The source chain,
//! which may carry driver messages, is logged and dropped.

use std::error::Error as _;

use axum::{
	Json,
	extract::rejection::JsonRejection,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::Serialize;
use tabledesk_core::Error;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	/// Human-readable error message.
	pub error: String,
	/// Machine-readable error code.
	pub code: String,
	/// Tables still referencing a table that could not be dropped.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dependencies: Option<Vec<String>>,
	/// Rows changed by a batch update whose audit record was lost.
	#[serde(rename = "affectedRows", skip_serializing_if = "Option::is_none")]
	pub affected_rows: Option<usize>,
}

impl ErrorResponse {
	pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
		Self {
			code: code.into(),
			error: error.into(),
			dependencies: None,
			affected_rows: None,
		}
	}
}

/// Application error type that converts to HTTP responses.
#[derive(Debug)]
pub enum AppError {
	/// The engine rejected or failed the operation.
	Engine(Error),
	/// Request parsing error.
	BadRequest(String),
	/// The blocking task running the engine call panicked.
	TaskPanic(String),
}

impl From<Error> for AppError {
	fn from(e: Error) -> Self {
		AppError::Engine(e)
	}
}

impl From<JsonRejection> for AppError {
	fn from(rejection: JsonRejection) -> Self {
		AppError::BadRequest(rejection.body_text())
	}
}

impl std::fmt::Display for AppError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			AppError::Engine(e) => write!(f, "{}", e),
			AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
			AppError::TaskPanic(msg) => write!(f, "Task panicked: {}", msg),
		}
	}
}

impl std::error::Error for AppError {}

fn source_chain(error: &Error) -> String {
	let mut chain = Vec::new();
	let mut source = error.source();
	while let Some(cause) = source {
		chain.push(cause.to_string());
		source = cause.source();
	}
	chain.join(": ")
}

fn status_of(error: &Error) -> StatusCode {
	match error {
		Error::Validation(_) | Error::Dependent { .. } => StatusCode::BAD_REQUEST,
		Error::UnknownTable(_) => StatusCode::NOT_FOUND,
		Error::Constraint { .. } => StatusCode::CONFLICT,
		Error::Schema { .. } | Error::Store { .. } | Error::LoggedFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		let (status, body) = match self {
			AppError::Engine(error) => {
				let status = status_of(&error);
				if status.is_server_error() {
					tracing::error!(code = error.code(), cause = %source_chain(&error), "{}", error);
				} else {
					tracing::debug!(code = error.code(), cause = %source_chain(&error), "{}", error);
				}

				let mut body = ErrorResponse::new(error.code(), error.to_string());
				match error {
					Error::Dependent {
						dependents,
						..
					} => body.dependencies = Some(dependents),
					Error::LoggedFailure {
						affected,
						..
					} => body.affected_rows = Some(affected),
					_ => {}
				}
				(status, body)
			}
			AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new("BAD_REQUEST", msg)),
			AppError::TaskPanic(msg) => {
				tracing::error!("Engine task panicked: {}", msg);
				(StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new("INTERNAL_ERROR", "Internal server error"))
			}
		};

		(status, Json(body)).into_response()
	}
}
