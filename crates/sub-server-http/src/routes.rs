// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 tabledesk contributors

use axum::{
	Router,
	routing::{delete, get, post, put},
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, state::AppState};

pub const API_PREFIX: &str = "/api/tableManager";

/// The application router with every endpoint and the shared middleware stack.
pub fn router(state: AppState) -> Router {
	let api = Router::new()
		.route("/crossTablePreview", post(handlers::cross_table_preview))
		.route("/crossTableBatchUpdate", post(handlers::cross_table_batch_update))
		.route("/updateLogs", get(handlers::update_logs))
		.route("/create", post(handlers::create_table))
		.route("/delete/{table}", delete(handlers::drop_table))
		.route("/list", get(handlers::list_tables))
		.route("/structure/{table}", get(handlers::table_structure))
		.route("/addField", post(handlers::add_field))
		.route("/deleteField", post(handlers::delete_field))
		.route("/modifyField", post(handlers::modify_field))
		.route("/relations/{table}", get(handlers::relations))
		.route("/data/insert", post(handlers::insert_row))
		.route("/data/update", put(handlers::update_row))
		.route("/data/{table}", get(handlers::table_rows))
		.route("/data/{table}/{id}", delete(handlers::delete_row));

	let max_concurrent_requests = state.max_concurrent_requests();
	Router::new()
		.route("/health", get(handlers::health))
		.nest(API_PREFIX, api)
		.with_state(state)
		.layer(ConcurrencyLimitLayer::new(max_concurrent_requests))
		.layer(CorsLayer::permissive())
		.layer(TraceLayer::new_for_http())
}
